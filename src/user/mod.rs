mod account;
pub mod auth;

pub use account::{
    initial_display_name, AccountError, AccountManager, AccountSession, DEFAULT_DISPLAY_NAME,
};
pub use auth::{CredentialHasher, PasswordCredentials, SessionToken, SessionTokenValue};
