use realworld_core::db::open_db_in_memory;
use realworld_core::{
    ArticleFilters, ArticleListQuery, ArticleRepository, ArticleService, CoreConfig, ErrorKind,
    FeedService, NewArticle, NewUser, Page, SocialService, SqliteStore, UserRepository,
    UserService, Viewer,
};

fn register(store: SqliteStore<'_>, username: &str) -> Viewer {
    UserService::new(store)
        .register(&NewUser::new(
            format!("{username}@example.com"),
            username,
            "hash",
        ))
        .unwrap();
    let profile = store.get_profile_by_username(username).unwrap().unwrap();
    Viewer::Authenticated(profile.id)
}

fn publish(store: SqliteStore<'_>, author: Viewer, title: &str, tags: &[&str]) -> String {
    ArticleService::new(store)
        .create_article(
            author,
            &NewArticle::new(title, "description", "body").with_tags(tags.iter().copied()),
        )
        .unwrap()
        .slug
}

fn titles(list: &realworld_core::ArticleList) -> Vec<&str> {
    list.articles
        .iter()
        .map(|article| article.title.as_str())
        .collect()
}

#[test]
fn list_is_newest_first_and_paginated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let jake = register(store, "jake");
    for title in ["a", "b", "c"] {
        publish(store, jake, title, &[]);
    }

    let page = feed
        .list(&ArticleFilters::default(), Page::new(0, 2), Viewer::Anonymous)
        .unwrap();
    assert_eq!(titles(&page), vec!["c", "b"]);
    assert_eq!(page.articles_count, 3);
    assert_eq!(page.applied_limit, 2);

    let rest = feed
        .list(&ArticleFilters::default(), Page::new(2, 2), Viewer::Anonymous)
        .unwrap();
    assert_eq!(titles(&rest), vec!["a"]);
    assert_eq!(rest.articles_count, 3);
}

#[test]
fn page_and_total_come_from_one_read() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let jake = register(store, "jake");
    for title in ["a", "b", "c"] {
        publish(store, jake, title, &["shared"]);
    }
    let query = ArticleListQuery {
        tag: Some("shared".to_string()),
        limit: 2,
        offset: 1,
        ..ArticleListQuery::default()
    };

    let (records, total) = store.list_articles_page(&query).unwrap();
    let page_titles: Vec<_> = records
        .iter()
        .map(|record| record.article.title.as_str())
        .collect();
    assert_eq!(page_titles, vec!["b", "a"]);
    assert_eq!(total, 3);
    assert_eq!(total, store.count_articles(&query).unwrap());
    assert!(conn.is_autocommit());
}

#[test]
fn zero_limit_yields_empty_page_with_count() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let jake = register(store, "jake");
    publish(store, jake, "a", &[]);

    let page = feed
        .list(&ArticleFilters::default(), Page::new(0, 0), Viewer::Anonymous)
        .unwrap();
    assert!(page.articles.is_empty());
    assert_eq!(page.articles_count, 1);
    assert_eq!(page.applied_limit, 0);
}

#[test]
fn limit_defaults_and_caps_follow_config() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let config = CoreConfig {
        default_page_limit: 2,
        max_page_limit: 3,
        ..CoreConfig::default()
    };
    let feed = FeedService::with_config(store, config);
    let jake = register(store, "jake");
    for title in ["a", "b", "c", "d", "e"] {
        publish(store, jake, title, &[]);
    }

    let defaulted = feed
        .list(&ArticleFilters::default(), Page::default(), Viewer::Anonymous)
        .unwrap();
    assert_eq!(titles(&defaulted), vec!["e", "d"]);
    assert_eq!(defaulted.applied_limit, 2);

    let capped = feed
        .list(&ArticleFilters::default(), Page::new(0, 500), Viewer::Anonymous)
        .unwrap();
    assert_eq!(titles(&capped), vec!["e", "d", "c"]);
    assert_eq!(capped.applied_limit, 3);
    assert_eq!(capped.articles_count, 5);
}

#[test]
fn filters_compose_with_and() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let articles = ArticleService::new(store);
    let jake = register(store, "jake");
    let celeb = register(store, "celeb");
    let fan = register(store, "fan");
    let jake_dragons = publish(store, jake, "jake dragons", &["dragons"]);
    publish(store, jake, "jake cats", &["cats"]);
    let celeb_dragons = publish(store, celeb, "celeb dragons", &["dragons"]);
    articles.favorite_article(fan, &jake_dragons).unwrap();
    articles.favorite_article(fan, &celeb_dragons).unwrap();

    let by_tag = feed
        .list(
            &ArticleFilters::default().tag("dragons"),
            Page::default(),
            Viewer::Anonymous,
        )
        .unwrap();
    assert_eq!(titles(&by_tag), vec!["celeb dragons", "jake dragons"]);

    let by_author = feed
        .list(
            &ArticleFilters::default().author("jake"),
            Page::default(),
            Viewer::Anonymous,
        )
        .unwrap();
    assert_eq!(titles(&by_author), vec!["jake cats", "jake dragons"]);

    let combined = feed
        .list(
            &ArticleFilters::default()
                .tag("dragons")
                .author("jake")
                .favorited_by("fan"),
            Page::default(),
            Viewer::Anonymous,
        )
        .unwrap();
    assert_eq!(titles(&combined), vec!["jake dragons"]);
    assert_eq!(combined.articles_count, 1);
    assert_eq!(combined.articles[0].tag_list, vec!["dragons"]);
}

#[test]
fn unknown_author_or_favoriter_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);

    let author = feed
        .list(
            &ArticleFilters::default().author("doesnotexist"),
            Page::default(),
            Viewer::Anonymous,
        )
        .unwrap_err();
    assert_eq!(author.kind(), ErrorKind::NotFound);

    let favorited = feed
        .list(
            &ArticleFilters::default().favorited_by("doesnotexist"),
            Page::default(),
            Viewer::Anonymous,
        )
        .unwrap_err();
    assert_eq!(favorited.kind(), ErrorKind::NotFound);
}

#[test]
fn unknown_tag_yields_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let jake = register(store, "jake");
    publish(store, jake, "a", &["known"]);

    let page = feed
        .list(
            &ArticleFilters::default().tag("unknown"),
            Page::default(),
            Viewer::Anonymous,
        )
        .unwrap();
    assert!(page.articles.is_empty());
    assert_eq!(page.articles_count, 0);
}

#[test]
fn favorited_flag_depends_on_viewer() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let p1 = register(store, "p1");
    let p2 = register(store, "p2");
    let a = publish(store, p1, "a", &[]);
    publish(store, p1, "b", &[]);
    ArticleService::new(store).favorite_article(p2, &a).unwrap();

    let as_p2 = feed
        .list(&ArticleFilters::default(), Page::default(), p2)
        .unwrap();
    let a_for_p2 = as_p2.articles.iter().find(|view| view.slug == a).unwrap();
    assert!(a_for_p2.favorited);
    assert_eq!(a_for_p2.favorites_count, 1);
    assert!(as_p2
        .articles
        .iter()
        .filter(|view| view.slug != a)
        .all(|view| !view.favorited));

    let anonymous = feed
        .list(&ArticleFilters::default(), Page::default(), Viewer::Anonymous)
        .unwrap();
    assert!(anonymous.articles.iter().all(|view| !view.favorited));
}

#[test]
fn follow_feed_contains_only_followed_authors() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let p1 = register(store, "p1");
    let p2 = register(store, "p2");
    let p3 = register(store, "p3");
    publish(store, p1, "p1 first", &[]);
    publish(store, p3, "p3 unrelated", &[]);
    publish(store, p1, "p1 second", &[]);
    publish(store, p2, "p2 own", &[]);
    SocialService::new(store).follow_profile(p2, "p1").unwrap();

    let page = feed.feed_for(p2, Page::default()).unwrap();
    assert_eq!(titles(&page), vec!["p1 second", "p1 first"]);
    assert_eq!(page.articles_count, 2);
    assert!(page.articles.iter().all(|view| view.author.following));
    assert!(page.articles.iter().all(|view| view.author.username == "p1"));
}

#[test]
fn follow_feed_is_empty_without_follows_and_requires_auth() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let p1 = register(store, "p1");
    publish(store, p1, "own", &[]);

    let page = feed.feed_for(p1, Page::default()).unwrap();
    assert!(page.articles.is_empty());
    assert_eq!(page.articles_count, 0);

    let err = feed
        .feed_for(Viewer::Anonymous, Page::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn list_decorates_author_following_for_viewer() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let p1 = register(store, "p1");
    let p2 = register(store, "p2");
    publish(store, p1, "by p1", &[]);
    publish(store, p2, "by p2", &[]);
    SocialService::new(store).follow_profile(p2, "p1").unwrap();

    let page = feed
        .list(&ArticleFilters::default(), Page::default(), p2)
        .unwrap();
    for view in &page.articles {
        let expected = view.author.username == "p1";
        assert_eq!(view.author.following, expected, "article `{}`", view.title);
    }
}

#[test]
fn article_list_serializes_without_applied_limit() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let feed = FeedService::new(store);
    let jake = register(store, "jake");
    publish(store, jake, "a", &["x"]);

    let page = feed
        .list(&ArticleFilters::default(), Page::default(), Viewer::Anonymous)
        .unwrap();
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["articlesCount"], 1);
    assert_eq!(json["articles"][0]["tagList"], serde_json::json!(["x"]));
    assert!(json.get("appliedLimit").is_none());
}
