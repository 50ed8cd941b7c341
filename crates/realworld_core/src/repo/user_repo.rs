//! User/profile persistence.
//!
//! # Invariants
//! - A user row and its profile row are inserted in the same transaction.
//! - Deleting a user cascades to its profile through the foreign key.
//! - Email/username uniqueness is enforced by the unique indexes only.

use crate::model::user::{NewUser, Profile, ProfileId, User, UserChanges, UserId};
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, OptionalExtension, Row, Transaction, TransactionBehavior};

pub(crate) const PROFILE_SELECT_SQL: &str = "SELECT
    p.id AS profile_id,
    p.user_id AS user_id,
    u.username AS username,
    p.bio AS bio,
    p.image AS image
FROM profiles p
INNER JOIN users u ON u.id = p.user_id";

const USER_SELECT_SQL: &str = "SELECT id, email, username, password_hash, created_at FROM users";

/// Repository interface for the identity model.
pub trait UserRepository {
    /// Inserts a user and its empty profile atomically.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Applies non-`None` fields of `changes` to the user and its profile.
    fn update_user(&self, id: UserId, changes: &UserChanges) -> RepoResult<()>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>>;
    fn get_profile_by_user(&self, user_id: UserId) -> RepoResult<Option<Profile>>;
    fn get_profile_by_username(&self, username: &str) -> RepoResult<Option<Profile>>;
}

impl UserRepository for SqliteStore<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        let tx = Transaction::new_unchecked(self.connection(), TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO users (email, username, password_hash) VALUES (?1, ?2, ?3);",
            params![
                user.email.as_str(),
                user.username.as_str(),
                user.password_hash.as_str()
            ],
        )?;
        let user_id = tx.last_insert_rowid();
        tx.execute("INSERT INTO profiles (user_id) VALUES (?1);", [user_id])?;
        let created = tx
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [user_id],
                parse_user_row,
            )
            .optional()?
            .ok_or_else(|| RepoError::InvalidData("user missing after insert".to_string()))?;
        tx.commit()?;
        Ok(created)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .connection()
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = self
            .connection()
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
                [email],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn update_user(&self, id: UserId, changes: &UserChanges) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.connection(), TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE users
             SET
                email = COALESCE(?2, email),
                username = COALESCE(?3, username),
                password_hash = COALESCE(?4, password_hash)
             WHERE id = ?1;",
            params![
                id,
                changes.email.as_deref(),
                changes.username.as_deref(),
                changes.password_hash.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("user", id));
        }

        // NULL keeps the stored value; an empty string clears it.
        tx.execute(
            "UPDATE profiles
             SET
                bio = CASE WHEN ?2 IS NULL THEN bio ELSE NULLIF(?2, '') END,
                image = CASE WHEN ?3 IS NULL THEN image ELSE NULLIF(?3, '') END
             WHERE user_id = ?1;",
            params![id, changes.bio.as_deref(), changes.image.as_deref()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .connection()
            .execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("user", id));
        }
        Ok(())
    }

    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let profile = self
            .connection()
            .query_row(
                &format!("{PROFILE_SELECT_SQL} WHERE p.id = ?1;"),
                [id],
                parse_profile_row,
            )
            .optional()?;
        Ok(profile)
    }

    fn get_profile_by_user(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        let profile = self
            .connection()
            .query_row(
                &format!("{PROFILE_SELECT_SQL} WHERE p.user_id = ?1;"),
                [user_id],
                parse_profile_row,
            )
            .optional()?;
        Ok(profile)
    }

    fn get_profile_by_username(&self, username: &str) -> RepoResult<Option<Profile>> {
        let profile = self
            .connection()
            .query_row(
                &format!("{PROFILE_SELECT_SQL} WHERE u.username = ?1;"),
                [username],
                parse_profile_row,
            )
            .optional()?;
        Ok(profile)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}

/// Maps the `PROFILE_SELECT_SQL` column aliases; reused by joined queries.
pub(crate) fn parse_profile_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get("profile_id")?,
        user_id: row.get("user_id")?,
        username: row.get("username")?,
        bio: row.get("bio")?,
        image: row.get("image")?,
    })
}
