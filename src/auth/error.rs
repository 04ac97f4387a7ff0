use thiserror::Error;

use crate::store::StoreError;

/// Registration validation failures, reported before any state changes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    #[error("username cannot be empty")]
    UsernameEmpty,

    #[error("username must be at least {min} characters")]
    UsernameTooShort { min: usize },

    #[error("username cannot exceed {max} characters")]
    UsernameTooLong { max: usize },

    #[error("username may only contain letters, digits, '_', '.' and '-'")]
    UsernameInvalidChars,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("password cannot exceed {max} characters")]
    PasswordTooLong { max: usize },

    #[error("passwords do not match")]
    PasswordMismatch,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationRule),

    #[error("username '{0}' is already registered")]
    DuplicateUsername(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("invalid credentials ({attempts_remaining} attempts remaining)")]
    InvalidCredentials { attempts_remaining: u32 },

    #[error("account locked after too many failed attempts")]
    AccountLocked,

    #[error(transparent)]
    Store(#[from] StoreError),
}
