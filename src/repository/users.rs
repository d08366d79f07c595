//! User and refresh-token operations

use chrono::{DateTime, Utc};

use super::errors::{RepositoryError, RepositoryResult};
use super::Repository;
use crate::observability::Logger;
use crate::store::User;

/// A refresh token and the moment it stops being valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Fields written by [`Repository::update_user`]
#[derive(Debug, Clone)]
pub struct UserUpdate {
    /// Always overwrites the stored email
    pub email: String,

    /// Always overwrites the stored hash
    pub password_hash: String,

    /// Recorded only when the user holds no refresh token yet
    pub session: Option<RefreshSession>,
}

impl Repository {
    /// Register a user; emails are unique (case-sensitive)
    pub fn create_user(&self, email: &str, password_hash: &str) -> RepositoryResult<User> {
        let user = self.store.update(|doc| -> RepositoryResult<User> {
            if doc.users.values().any(|u| u.email == email) {
                return Err(RepositoryError::Conflict("Email already in use".to_string()));
            }

            let user = User {
                id: doc.allocate_user_id(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                refresh_token: String::new(),
                expires_at: None,
                is_upgraded: false,
            };
            doc.users.insert(user.id, user.clone());
            Ok(user)
        })?;

        let user_id = user.id.to_string();
        Logger::info("USER_CREATED", &[("user_id", user_id.as_str())]);
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> RepositoryResult<User> {
        self.store
            .load()?
            .users
            .into_values()
            .find(|u| u.email == email)
            .ok_or(RepositoryError::NotFound("user"))
    }

    pub fn get_user_by_id(&self, id: u64) -> RepositoryResult<User> {
        self.store
            .load()?
            .users
            .remove(&id)
            .ok_or(RepositoryError::NotFound("user"))
    }

    /// Overwrite email and password hash; record `update.session` only if
    /// the user has no refresh token stored.
    pub fn update_user(&self, id: u64, update: UserUpdate) -> RepositoryResult<User> {
        self.store.update(|doc| -> RepositoryResult<User> {
            if doc
                .users
                .values()
                .any(|u| u.id != id && u.email == update.email)
            {
                return Err(RepositoryError::Conflict("Email already in use".to_string()));
            }

            let user = doc
                .users
                .get_mut(&id)
                .ok_or(RepositoryError::NotFound("user"))?;

            if let Some(session) = update.session {
                if !user.has_session() {
                    user.refresh_token = session.token;
                    user.expires_at = Some(session.expires_at);
                }
            }
            user.email = update.email;
            user.password_hash = update.password_hash;

            Ok(user.clone())
        })
    }

    /// Record a refresh session for `id`, touching no other field.
    ///
    /// An active stored session is kept as-is. A stored session that has
    /// expired as of `now` is replaced, in the same write as the new one.
    pub fn start_session(
        &self,
        id: u64,
        session: RefreshSession,
        now: DateTime<Utc>,
    ) -> RepositoryResult<User> {
        let (user, replaced_stale) = self.store.update(|doc| -> RepositoryResult<(User, bool)> {
            let user = doc
                .users
                .get_mut(&id)
                .ok_or(RepositoryError::NotFound("user"))?;

            let stale = user.has_session() && user.session_expired_at(now);
            if stale {
                user.clear_session();
            }
            if !user.has_session() {
                user.refresh_token = session.token;
                user.expires_at = Some(session.expires_at);
            }
            Ok((user.clone(), stale))
        })?;

        if replaced_stale {
            let user_id = user.id.to_string();
            Logger::info("SESSION_REVOKED", &[("user_id", user_id.as_str())]);
        }
        Ok(user)
    }

    /// Return the user holding `token` if it has not expired
    pub fn confirm_refresh_token(&self, token: &str) -> RepositoryResult<User> {
        let doc = self.store.load()?;
        let user = doc
            .user_by_refresh_token(token)
            .ok_or(RepositoryError::NotFound("refresh token"))?;

        if user.session_expired_at(Utc::now()) {
            return Err(RepositoryError::Expired);
        }
        Ok(user.clone())
    }

    /// Clear the refresh token and its expiry from whoever holds `token`
    pub fn revoke_refresh_token(&self, token: &str) -> RepositoryResult<()> {
        let user_id = self.store.update(|doc| -> RepositoryResult<u64> {
            let id = doc
                .user_by_refresh_token(token)
                .map(|u| u.id)
                .ok_or(RepositoryError::NotFound("refresh token"))?;
            if let Some(user) = doc.users.get_mut(&id) {
                user.clear_session();
            }
            Ok(id)
        })?;

        let user_id = user_id.to_string();
        Logger::info("SESSION_REVOKED", &[("user_id", user_id.as_str())]);
        Ok(())
    }

    /// Mark a user as upgraded
    pub fn upgrade_user(&self, id: u64) -> RepositoryResult<()> {
        self.store.update(|doc| -> RepositoryResult<()> {
            let user = doc
                .users
                .get_mut(&id)
                .ok_or(RepositoryError::NotFound("user"))?;
            user.is_upgraded = true;
            Ok(())
        })?;

        let user_id = id.to_string();
        Logger::info("USER_UPGRADED", &[("user_id", user_id.as_str())]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn repo() -> (TempDir, Repository) {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::open(tmp.path().join("db.json")).unwrap();
        (tmp, repo)
    }

    fn session(token: &str, expires_in: Duration) -> RefreshSession {
        RefreshSession {
            token: token.to_string(),
            expires_at: Utc::now() + expires_in,
        }
    }

    fn login(repo: &Repository, user: &User, s: RefreshSession) -> User {
        repo.update_user(
            user.id,
            UserUpdate {
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                session: Some(s),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_user_rejects_duplicate_email() {
        let (_tmp, repo) = repo();
        let first = repo.create_user("walt@breakingbad.com", "h1").unwrap();

        assert!(matches!(
            repo.create_user("walt@breakingbad.com", "h2"),
            Err(RepositoryError::Conflict(_))
        ));
        assert_eq!(repo.get_user_by_email("walt@breakingbad.com").unwrap(), first);
    }

    #[test]
    fn test_email_comparison_is_case_sensitive() {
        let (_tmp, repo) = repo();
        repo.create_user("walt@breakingbad.com", "h").unwrap();
        let other = repo.create_user("Walt@BreakingBad.com", "h").unwrap();
        assert_eq!(other.id, 2);
    }

    #[test]
    fn test_get_user_by_email_not_found() {
        let (_tmp, repo) = repo();
        assert!(matches!(
            repo.get_user_by_email("nobody@example.com"),
            Err(RepositoryError::NotFound("user"))
        ));
    }

    #[test]
    fn test_update_user_overwrites_profile() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "old").unwrap();

        let updated = repo
            .update_user(
                user.id,
                UserUpdate {
                    email: "b@example.com".to_string(),
                    password_hash: "new".to_string(),
                    session: None,
                },
            )
            .unwrap();

        assert_eq!(updated.email, "b@example.com");
        assert_eq!(updated.password_hash, "new");
        assert!(repo.get_user_by_email("a@example.com").is_err());
    }

    #[test]
    fn test_update_user_unknown_id() {
        let (_tmp, repo) = repo();
        let result = repo.update_user(
            9,
            UserUpdate {
                email: "a@example.com".to_string(),
                password_hash: "h".to_string(),
                session: None,
            },
        );
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[test]
    fn test_update_user_rejects_taken_email() {
        let (_tmp, repo) = repo();
        repo.create_user("a@example.com", "h").unwrap();
        let b = repo.create_user("b@example.com", "h").unwrap();

        let result = repo.update_user(
            b.id,
            UserUpdate {
                email: "a@example.com".to_string(),
                password_hash: "h".to_string(),
                session: None,
            },
        );
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[test]
    fn test_profile_edit_keeps_active_session() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "h").unwrap();
        login(&repo, &user, session("tok-1", Duration::days(1)));

        let edited = repo
            .update_user(
                user.id,
                UserUpdate {
                    email: "a@example.com".to_string(),
                    password_hash: "h2".to_string(),
                    session: None,
                },
            )
            .unwrap();
        assert_eq!(edited.refresh_token, "tok-1");
        assert!(edited.expires_at.is_some());
    }

    #[test]
    fn test_session_only_set_when_none_stored() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "h").unwrap();

        let first = login(&repo, &user, session("tok-1", Duration::days(1)));
        assert_eq!(first.refresh_token, "tok-1");

        let second = login(&repo, &user, session("tok-2", Duration::days(1)));
        assert_eq!(second.refresh_token, "tok-1");
    }

    #[test]
    fn test_start_session_keeps_concurrent_profile_edit() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "old-hash").unwrap();

        // Login has read the user; a profile edit commits before its write
        let snapshot = repo.get_user_by_email("a@example.com").unwrap();
        repo.update_user(
            user.id,
            UserUpdate {
                email: "new@example.com".to_string(),
                password_hash: "new-hash".to_string(),
                session: None,
            },
        )
        .unwrap();
        let after = repo
            .start_session(snapshot.id, session("tok", Duration::days(60)), Utc::now())
            .unwrap();

        assert_eq!(after.email, "new@example.com");
        assert_eq!(after.password_hash, "new-hash");
        assert_eq!(after.refresh_token, "tok");
        assert_eq!(repo.get_user_by_id(user.id).unwrap(), after);
    }

    #[test]
    fn test_start_session_keeps_active_token() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "h").unwrap();
        let now = Utc::now();

        repo.start_session(user.id, session("tok-1", Duration::days(60)), now)
            .unwrap();
        let again = repo
            .start_session(user.id, session("tok-2", Duration::days(60)), now)
            .unwrap();
        assert_eq!(again.refresh_token, "tok-1");
    }

    #[test]
    fn test_start_session_replaces_expired_token() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "h").unwrap();
        login(&repo, &user, session("stale", Duration::seconds(-1)));

        let fresh = repo
            .start_session(user.id, session("fresh", Duration::days(60)), Utc::now())
            .unwrap();
        assert_eq!(fresh.refresh_token, "fresh");
        assert!(matches!(
            repo.confirm_refresh_token("stale"),
            Err(RepositoryError::NotFound(_))
        ));
        assert_eq!(repo.confirm_refresh_token("fresh").unwrap().id, user.id);
    }

    #[test]
    fn test_start_session_unknown_user() {
        let (_tmp, repo) = repo();
        let result = repo.start_session(9, session("tok", Duration::days(1)), Utc::now());
        assert!(matches!(result, Err(RepositoryError::NotFound("user"))));
    }

    #[test]
    fn test_refresh_token_lifecycle() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "h").unwrap();
        login(&repo, &user, session("tok", Duration::days(60)));

        assert_eq!(repo.confirm_refresh_token("tok").unwrap().id, user.id);

        repo.revoke_refresh_token("tok").unwrap();
        assert!(matches!(
            repo.confirm_refresh_token("tok"),
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repo.revoke_refresh_token("tok"),
            Err(RepositoryError::NotFound(_))
        ));

        let cleared = repo.get_user_by_id(user.id).unwrap();
        assert!(!cleared.has_session());
        assert!(cleared.expires_at.is_none());
    }

    #[test]
    fn test_expired_refresh_token() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "h").unwrap();
        login(&repo, &user, session("old", Duration::seconds(-1)));

        assert!(matches!(
            repo.confirm_refresh_token("old"),
            Err(RepositoryError::Expired)
        ));
    }

    #[test]
    fn test_empty_token_never_confirms() {
        let (_tmp, repo) = repo();
        repo.create_user("a@example.com", "h").unwrap();
        assert!(matches!(
            repo.confirm_refresh_token(""),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_upgrade_user() {
        let (_tmp, repo) = repo();
        let user = repo.create_user("a@example.com", "h").unwrap();
        assert!(!user.is_upgraded);

        repo.upgrade_user(user.id).unwrap();
        assert!(repo.get_user_by_id(user.id).unwrap().is_upgraded);
        assert!(matches!(
            repo.upgrade_user(99),
            Err(RepositoryError::NotFound(_))
        ));
    }
}
