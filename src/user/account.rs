use super::auth::{PasswordCredentials, SessionToken, SessionTokenValue};
use crate::store::{AccountStore, GameStore, Profile};
use anyhow::Context;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Display name used when neither a name nor a usable email is available.
pub const DEFAULT_DISPLAY_NAME: &str = "Operator";

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("An account for {0} already exists")]
    HandleTaken(String),

    #[error("Wrong email or password")]
    InvalidCredentials,

    #[error("A valid email is required")]
    MissingHandle,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// A logged in player.
#[derive(Clone, Debug)]
pub struct AccountSession {
    pub player_id: String,
    pub email: String,
    pub token: SessionTokenValue,
}

fn normalize_handle(email: &str) -> Result<String, AccountError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AccountError::MissingHandle),
    }
}

/// Requested name, else the email's local part, else [`DEFAULT_DISPLAY_NAME`].
pub fn initial_display_name(requested: Option<&str>, email: &str) -> String {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    email
        .split('@')
        .next()
        .map(str::trim)
        .filter(|local| !local.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string()
}

pub struct AccountManager {
    accounts: Arc<dyn AccountStore>,
    games: Arc<dyn GameStore>,
}

impl AccountManager {
    pub fn new(accounts: Arc<dyn AccountStore>, games: Arc<dyn GameStore>) -> Self {
        Self { accounts, games }
    }

    /// Creates the account and its password credentials, then a profile.
    /// A failing profile insert does not undo the sign up.
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<String, AccountError> {
        let email = normalize_handle(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword);
        }
        if self.accounts.get_player_id(&email)?.is_some() {
            return Err(AccountError::HandleTaken(email));
        }

        let player_id = self.accounts.create_account(&email)?;
        let credentials = PasswordCredentials::new(&player_id, password)?;
        self.accounts.set_password_credentials(&credentials)?;
        info!("[account] Created account {} for {}", player_id, email);

        let profile = Profile {
            player_id: player_id.clone(),
            display_name: initial_display_name(display_name, &email),
            updated_at: None,
        };
        if let Err(err) = self.games.insert_profile(&profile) {
            warn!("[account] Profile creation failed for {}: {:#}", player_id, err);
        }

        Ok(player_id)
    }

    pub fn log_in(&self, email: &str, password: &str) -> Result<AccountSession, AccountError> {
        let email = normalize_handle(email)?;
        let player_id = self
            .accounts
            .get_player_id(&email)?
            .ok_or(AccountError::InvalidCredentials)?;
        let credentials = self
            .accounts
            .get_password_credentials(&player_id)?
            .ok_or(AccountError::InvalidCredentials)?;
        if !credentials.matches(password)? {
            return Err(AccountError::InvalidCredentials);
        }
        self.accounts.mark_password_used(&player_id)?;

        let token = SessionToken::issue(&player_id);
        self.accounts.add_session_token(&token)?;
        info!("[account] {} logged in", email);

        Ok(AccountSession {
            player_id,
            email,
            token: token.value,
        })
    }

    /// Returns Ok(None) if the token is unknown or its account is gone.
    pub fn session(&self, token: &SessionTokenValue) -> Result<Option<AccountSession>, AccountError> {
        let Some(stored) = self.accounts.get_session_token(token)? else {
            return Ok(None);
        };
        let Some(email) = self.accounts.get_email(&stored.player_id)? else {
            return Ok(None);
        };
        self.accounts.touch_session_token(token)?;
        Ok(Some(AccountSession {
            player_id: stored.player_id,
            email,
            token: stored.value,
        }))
    }

    /// Returns whether a session was actually ended.
    pub fn sign_out(&self, token: &SessionTokenValue) -> Result<bool, AccountError> {
        Ok(self.accounts.delete_session_token(token)?)
    }

    /// Returns Ok(None) if the player has no profile.
    pub fn display_name(&self, player_id: &str) -> Result<Option<String>, AccountError> {
        Ok(self
            .games
            .get_profile(player_id)?
            .map(|profile| profile.display_name))
    }

    pub fn update_display_name(&self, player_id: &str, name: &str) -> Result<(), AccountError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountError::Store(anyhow::anyhow!(
                "Display name cannot be empty"
            )));
        }
        let profile = Profile {
            player_id: player_id.to_string(),
            display_name: name.to_string(),
            updated_at: Some(chrono::Utc::now().timestamp()),
        };
        self.games
            .upsert_profile(&profile)
            .with_context(|| format!("Could not rename {}", player_id))?;
        Ok(())
    }
}
