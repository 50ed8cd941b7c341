use realworld_core::db::{open_db, open_db_in_memory};
use realworld_core::{
    ErrorKind, FollowRepository, NewUser, ProfileId, RepoError, SocialService, SqliteStore,
    UserRepository, UserService, Viewer,
};
use std::sync::{Arc, Barrier};
use std::thread;

fn register(store: SqliteStore<'_>, username: &str) -> ProfileId {
    UserService::new(store)
        .register(&NewUser::new(
            format!("{username}@example.com"),
            username,
            "hash",
        ))
        .unwrap();
    store
        .get_profile_by_username(username)
        .unwrap()
        .unwrap()
        .id
}

#[test]
fn follow_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");
    let celeb = register(store, "celeb");

    social.follow(jake, celeb).unwrap();
    social.follow(jake, celeb).unwrap();

    assert!(social.is_following(jake, celeb).unwrap());
    let edges: i64 = conn
        .query_row("SELECT COUNT(*) FROM follows;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(edges, 1);
}

#[test]
fn follow_is_directed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");
    let celeb = register(store, "celeb");

    social.follow(jake, celeb).unwrap();

    assert!(social.is_following(jake, celeb).unwrap());
    assert!(!social.is_following(celeb, jake).unwrap());
}

#[test]
fn unfollow_without_edge_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");
    let celeb = register(store, "celeb");

    social.unfollow(jake, celeb).unwrap();
    social.follow(jake, celeb).unwrap();
    social.unfollow(jake, celeb).unwrap();
    social.unfollow(jake, celeb).unwrap();

    assert!(!social.is_following(jake, celeb).unwrap());
}

#[test]
fn self_follow_is_invalid_operation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");

    let err = social.follow(jake, jake).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    assert!(!store.is_following(jake, jake).unwrap());
}

#[test]
fn follow_unknown_profile_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");

    let err = social.follow(jake, 9_999).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn get_profile_is_decorated_for_viewer() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");
    let celeb = register(store, "celeb");
    social.follow(jake, celeb).unwrap();

    let as_follower = social
        .get_profile("celeb", Viewer::Authenticated(jake))
        .unwrap();
    assert_eq!(as_follower.username, "celeb");
    assert!(as_follower.following);

    let anonymous = social.get_profile("celeb", Viewer::Anonymous).unwrap();
    assert!(!anonymous.following);

    let own = social
        .get_profile("celeb", Viewer::Authenticated(celeb))
        .unwrap();
    assert!(!own.following);
}

#[test]
fn get_unknown_profile_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let social = SocialService::new(SqliteStore::try_new(&conn).unwrap());

    let err = social
        .get_profile("doesnotexist", Viewer::Anonymous)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn follow_profile_by_username_returns_decorated_view() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");
    register(store, "celeb");

    let followed = social
        .follow_profile(Viewer::Authenticated(jake), "celeb")
        .unwrap();
    assert!(followed.following);

    let unfollowed = social
        .unfollow_profile(Viewer::Authenticated(jake), "celeb")
        .unwrap();
    assert!(!unfollowed.following);

    let err = social
        .follow_profile(Viewer::Anonymous, "celeb")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn follow_profile_self_by_username_is_invalid_operation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");

    let err = social
        .follow_profile(Viewer::Authenticated(jake), "jake")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn deleting_a_user_removes_its_follow_edges() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let social = SocialService::new(store);
    let jake = register(store, "jake");
    let celeb = register(store, "celeb");
    social.follow(jake, celeb).unwrap();
    social.follow(celeb, jake).unwrap();

    let celeb_user = store.get_profile(celeb).unwrap().unwrap().user_id;
    UserService::new(store).delete_user(celeb_user).unwrap();

    let edges: i64 = conn
        .query_row("SELECT COUNT(*) FROM follows;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(edges, 0);
}

#[test]
fn follow_from_missing_profile_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let celeb = register(store, "celeb");

    let err = store.insert_follow(9_999, celeb).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }), "got {err:?}");

    let err = SocialService::new(store).follow(9_999, celeb).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn concurrent_follows_on_separate_connections_store_one_edge() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("follows.db");
    let (jake, celeb) = {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        (register(store, "jake"), register(store, "celeb"))
    };

    let barrier = Arc::new(Barrier::new(2));
    let workers: Vec<_> = (0..2)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let social = SocialService::new(SqliteStore::try_new(&conn).unwrap());
                barrier.wait();
                social.follow(jake, celeb).map_err(|err| err.kind())
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let edges: i64 = conn
        .query_row("SELECT COUNT(*) FROM follows;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(edges, 1);
}
