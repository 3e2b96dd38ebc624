//! Password hashing and session tokens.

use anyhow::{bail, Result};
use rand::Rng;
use rand_distr::Alphanumeric;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

pub const SESSION_TOKEN_LEN: usize = 64;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SessionTokenValue(pub String);

impl SessionTokenValue {
    pub fn generate() -> SessionTokenValue {
        let rng = rand::rng();
        let random_string: String = rng
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect();
        SessionTokenValue(random_string)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug)]
pub struct SessionToken {
    pub player_id: String,
    pub value: SessionTokenValue,
    pub created: SystemTime,
    pub last_used: Option<SystemTime>,
}

impl SessionToken {
    pub fn issue(player_id: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            value: SessionTokenValue::generate(),
            created: SystemTime::now(),
            last_used: None,
        }
    }
}

mod cinequiz_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{
            rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        },
        Argon2,
    };

    pub fn generate_b64_salt() -> String {
        SaltString::generate(&mut OsRng).to_string()
    }

    pub fn hash(plain: &[u8], b64_salt: &str) -> Result<String> {
        let salt = SaltString::from_b64(b64_salt).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default()
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string())
    }

    pub fn verify(plain: &[u8], target_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(target_hash).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default().verify_password(plain, &parsed).is_ok())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialHasher {
    Argon2,
}

impl FromStr for CredentialHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(CredentialHasher::Argon2),
            _ => bail!("Unknown hasher {}", s),
        }
    }
}

impl fmt::Display for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialHasher::Argon2 => f.write_str("argon2"),
        }
    }
}

impl CredentialHasher {
    pub fn generate_b64_salt(&self) -> String {
        match self {
            CredentialHasher::Argon2 => cinequiz_argon2::generate_b64_salt(),
        }
    }

    pub fn hash(&self, plain: &[u8], b64_salt: &str) -> Result<String> {
        match self {
            CredentialHasher::Argon2 => cinequiz_argon2::hash(plain, b64_salt),
        }
    }

    pub fn verify(&self, plain: &str, target_hash: &str) -> Result<bool> {
        match self {
            CredentialHasher::Argon2 => cinequiz_argon2::verify(plain.as_bytes(), target_hash),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PasswordCredentials {
    pub player_id: String,
    pub salt: String,
    pub hash: String,
    pub hasher: CredentialHasher,
    pub created: SystemTime,
    pub last_used: Option<SystemTime>,
}

impl PasswordCredentials {
    pub fn new(player_id: &str, password: &str) -> Result<Self> {
        let hasher = CredentialHasher::Argon2;
        let salt = hasher.generate_b64_salt();
        let hash = hasher.hash(password.as_bytes(), &salt)?;
        Ok(Self {
            player_id: player_id.to_string(),
            salt,
            hash,
            hasher,
            created: SystemTime::now(),
            last_used: None,
        })
    }

    pub fn matches(&self, password: &str) -> Result<bool> {
        self.hasher.verify(password, &self.hash)
    }
}
