use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::models::{Session, User, UserPublic, UserSettings};
use crate::errors::Error;
use crate::utils::random_hex;

/// Repository for accounts, sessions and per-user settings.
pub struct UserRepository<'a> {
    pub conn: &'a mut SqliteConnection,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl<'a> UserRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        UserRepository { conn }
    }

    /// Registers an account and its default settings row.
    /// A duplicate email is a store error surfaced as 409 by the API layer.
    pub fn create_user(&mut self, email: &str, password: &str) -> Result<UserPublic, Error> {
        use crate::schema::{user_settings, users};

        let email = email.trim().to_lowercase();
        let existing = users::table
            .filter(users::email.eq(&email))
            .first::<User>(self.conn)
            .optional()?;
        if existing.is_some() {
            return Err(Error::StoreError("Email is already registered".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let salt = random_hex(16);
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(&salt, password),
            password_salt: salt,
            created_at: now.clone(),
        };
        diesel::insert_into(users::table)
            .values(&user)
            .execute(self.conn)?;

        let defaults = UserSettings {
            user_id: user.id.clone(),
            name: String::new(),
            brand_name: String::new(),
            brand_url: String::new(),
            brief_prompt_override: String::new(),
            writer_prompt_override: String::new(),
            updated_at: now,
        };
        diesel::insert_into(user_settings::table)
            .values(&defaults)
            .execute(self.conn)?;

        Ok(user.into_public())
    }

    /// Checks credentials; `None` on unknown email or wrong password.
    pub fn authenticate_user(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserPublic>, Error> {
        use crate::schema::users;

        let email = email.trim().to_lowercase();
        let user = users::table
            .filter(users::email.eq(&email))
            .first::<User>(self.conn)
            .optional()?;

        let Some(user) = user else {
            return Ok(None);
        };
        if hash_password(&user.password_salt, password) != user.password_hash {
            return Ok(None);
        }
        Ok(Some(user.into_public()))
    }

    /// Creates an opaque session token valid for `ttl_days`.
    pub fn create_session(&mut self, user_id: &str, ttl_days: i64) -> Result<String, Error> {
        use crate::schema::sessions;

        let now = Utc::now();
        let session = Session {
            token: random_hex(32),
            user_id: user_id.to_string(),
            created_at: now.to_rfc3339(),
            expires_at: (now + Duration::days(ttl_days)).to_rfc3339(),
        };
        diesel::insert_into(sessions::table)
            .values(&session)
            .execute(self.conn)?;
        Ok(session.token)
    }

    pub fn delete_session(&mut self, token: &str) -> Result<(), Error> {
        use crate::schema::sessions;

        diesel::delete(sessions::table.filter(sessions::token.eq(token))).execute(self.conn)?;
        Ok(())
    }

    /// Resolves a session token to its user. Expired sessions are deleted on
    /// sight and treated as absent.
    pub fn get_user_by_session(&mut self, token: &str) -> Result<Option<UserPublic>, Error> {
        use crate::schema::{sessions, users};

        let session = sessions::table
            .filter(sessions::token.eq(token))
            .first::<Session>(self.conn)
            .optional()?;
        let Some(session) = session else {
            return Ok(None);
        };

        let expired = DateTime::parse_from_rfc3339(&session.expires_at)
            .map(|exp| exp.with_timezone(&Utc) < Utc::now())
            .unwrap_or(true);
        if expired {
            self.delete_session(token)?;
            return Ok(None);
        }

        let user = users::table
            .filter(users::id.eq(&session.user_id))
            .first::<User>(self.conn)
            .optional()?;
        Ok(user.map(User::into_public))
    }

    pub fn get_user_settings(&mut self, user_id: &str) -> Result<Option<UserSettings>, Error> {
        use crate::schema::user_settings;

        let settings = user_settings::table
            .filter(user_settings::user_id.eq(user_id))
            .first::<UserSettings>(self.conn)
            .optional()?;
        Ok(settings)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update_user_settings(
        &mut self,
        user_id: &str,
        name: &str,
        brand_name: &str,
        brand_url: &str,
        brief_prompt_override: &str,
        writer_prompt_override: &str,
    ) -> Result<UserSettings, Error> {
        use crate::schema::user_settings;

        let updated = UserSettings {
            user_id: user_id.to_string(),
            name: name.to_string(),
            brand_name: brand_name.to_string(),
            brand_url: brand_url.to_string(),
            brief_prompt_override: brief_prompt_override.to_string(),
            writer_prompt_override: writer_prompt_override.to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };
        diesel::update(user_settings::table.filter(user_settings::user_id.eq(user_id)))
            .set(&updated)
            .execute(self.conn)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn register_login_and_session_round_trip() {
        let db = Database::new(":memory:");
        let mut conn = db.get_conn().unwrap();
        let mut repo = UserRepository::new(&mut conn);

        let user = repo.create_user("Editor@Example.com", "hunter22").unwrap();
        assert_eq!(user.email, "editor@example.com");

        assert!(repo
            .authenticate_user("editor@example.com", "wrong")
            .unwrap()
            .is_none());
        let authed = repo
            .authenticate_user("editor@example.com", "hunter22")
            .unwrap()
            .unwrap();
        assert_eq!(authed.id, user.id);

        let token = repo.create_session(&user.id, 7).unwrap();
        let resolved = repo.get_user_by_session(&token).unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        repo.delete_session(&token).unwrap();
        assert!(repo.get_user_by_session(&token).unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = Database::new(":memory:");
        let mut conn = db.get_conn().unwrap();
        let mut repo = UserRepository::new(&mut conn);

        repo.create_user("a@b.com", "password1").unwrap();
        let err = repo.create_user("a@b.com", "password2").unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn registration_seeds_default_settings() {
        let db = Database::new(":memory:");
        let mut conn = db.get_conn().unwrap();
        let mut repo = UserRepository::new(&mut conn);

        let user = repo.create_user("a@b.com", "password1").unwrap();
        let settings = repo.get_user_settings(&user.id).unwrap().unwrap();
        assert_eq!(settings.brand_name, "");

        let updated = repo
            .update_user_settings(&user.id, "Ana", "Acme", "https://acme.test", "", "")
            .unwrap();
        assert_eq!(updated.brand_name, "Acme");
        assert_eq!(
            repo.get_user_settings(&user.id).unwrap().unwrap().brand_name,
            "Acme"
        );
    }
}
