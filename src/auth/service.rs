//! The authentication facade.
//!
//! `AuthService` owns the in-memory user map, the failed-attempt tracker,
//! and the credential store. Every mutation is persisted before it is
//! reported as successful; a failed persist rolls the in-memory change back
//! so memory never diverges from disk.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::attempts::AttemptTracker;
use crate::auth::error::{AuthError, ValidationRule};
use crate::auth::hasher;
use crate::config::SecurityPolicy;
use crate::store::{CredentialStore, StoreError, UserMap, UserRecord};

/// Safe view of a user returned on successful authentication.
/// Carries no digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

pub struct AuthService {
    store: CredentialStore,
    policy: SecurityPolicy,
    users: UserMap,
    attempts: AttemptTracker,
    recovered: bool,
}

impl AuthService {
    /// Load the snapshot and build the service around it.
    ///
    /// Corruption of the snapshot is not an error here: the store resets to
    /// empty and `recovered_from_corruption` reports it so the caller can
    /// tell the user.
    pub fn open(store: CredentialStore, policy: SecurityPolicy) -> Result<Self, StoreError> {
        let snapshot = store.load()?;
        debug!(users = snapshot.users.len(), "Loaded user snapshot");
        Ok(Self {
            attempts: AttemptTracker::new(policy.max_failed_attempts),
            users: snapshot.users,
            recovered: snapshot.recovered,
            store,
            policy,
        })
    }

    /// True when the last load found an unparseable snapshot and reset it.
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered
    }

    pub fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    pub fn store_path(&self) -> &std::path::Path {
        self.store.path()
    }

    /// Register a new user.
    ///
    /// All validation runs before any state changes; a rejected registration
    /// leaves both memory and disk untouched. The new record is persisted
    /// before success is reported.
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<(), AuthError> {
        self.validate_username(username)?;
        self.validate_password(password, confirmation)?;

        if self.users.contains_key(username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let record = UserRecord::new(hasher::digest(password));
        self.users.insert(username.to_string(), record);

        if let Err(e) = self.store.save(&self.users) {
            // Keep memory consistent with disk when the write fails
            self.users.remove(username);
            return Err(e.into());
        }

        info!(username, "Registered new user");
        Ok(())
    }

    /// Verify credentials for a username.
    ///
    /// The lockout check comes first and short-circuits without touching
    /// stored credentials. An unknown username is reported as such and does
    /// not advance the lockout counter; only a wrong password for an
    /// existing account does.
    pub fn authenticate(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        if self.attempts.is_locked(username) {
            debug!(username, "Rejected login for locked account");
            return Err(AuthError::AccountLocked);
        }

        let record = match self.users.get(username) {
            Some(record) => record,
            None => return Err(AuthError::UserNotFound(username.to_string())),
        };

        if hasher::digest(password) != record.password_hash {
            let count = self.attempts.record_failure(username);
            let attempts_remaining = self.attempts.remaining(username);
            debug!(username, count, "Failed login attempt");
            return Err(AuthError::InvalidCredentials { attempts_remaining });
        }

        self.attempts.record_success(username);
        info!(username, "Successful login");
        Ok(AuthenticatedUser {
            username: username.to_string(),
            created_at: record.created_at,
        })
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Usernames with their registration timestamps, for the statistics
    /// view. Order is unspecified.
    pub fn users(&self) -> impl Iterator<Item = (&str, DateTime<Utc>)> {
        self.users
            .iter()
            .map(|(name, record)| (name.as_str(), record.created_at))
    }

    fn validate_username(&self, username: &str) -> Result<(), ValidationRule> {
        if username.is_empty() {
            return Err(ValidationRule::UsernameEmpty);
        }
        // Length limits count characters, not bytes
        let length = username.chars().count();
        if length < self.policy.min_username_length {
            return Err(ValidationRule::UsernameTooShort {
                min: self.policy.min_username_length,
            });
        }
        if length > self.policy.max_username_length {
            return Err(ValidationRule::UsernameTooLong {
                max: self.policy.max_username_length,
            });
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
        if !username.chars().all(allowed) {
            return Err(ValidationRule::UsernameInvalidChars);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str, confirmation: &str) -> Result<(), ValidationRule> {
        let length = password.chars().count();
        if length < self.policy.min_password_length {
            return Err(ValidationRule::PasswordTooShort {
                min: self.policy.min_password_length,
            });
        }
        if length > self.policy.max_password_length {
            return Err(ValidationRule::PasswordTooLong {
                max: self.policy.max_password_length,
            });
        }
        if password != confirmation {
            return Err(ValidationRule::PasswordMismatch);
        }
        Ok(())
    }
}
