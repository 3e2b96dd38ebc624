use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_in_memory, open_versioned, Column, ForeignKey, SqlType, Table, VersionedSchema,
    DEFAULT_TIMESTAMP,
};
use crate::user::{CredentialHasher, PasswordCredentials, SessionToken, SessionTokenValue};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::game_store::{AccountStore, GameStore};
use super::models::{FeedbackRecord, GameMode, Profile, ScoreRecord, ScoreRow};

const ACCOUNT_FK: ForeignKey = ForeignKey {
    foreign_table: "account",
    foreign_column: "id",
    cascade_on_delete: true,
};

/// V 0
const ACCOUNT_TABLE_V_0: Table = Table {
    name: "account",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_account_email", "email")],
};
const PASSWORD_CREDENTIALS_TABLE_V_0: Table = Table {
    name: "password_credentials",
    columns: &[
        sqlite_column!(
            "player_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[],
};
const SESSION_TOKEN_TABLE_V_0: Table = Table {
    name: "session_token",
    columns: &[
        sqlite_column!(
            "value",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!(
            "player_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[("idx_session_token_player", "player_id")],
};
const PROFILE_TABLE_V_0: Table = Table {
    name: "profile",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("username", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
};
const SCORE_TABLE_V_0: Table = Table {
    name: "score",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("player_id", &SqlType::Text, non_null = true),
        sqlite_column!("score", &SqlType::Integer, non_null = true),
        sqlite_column!("language", &SqlType::Text, non_null = true),
        sqlite_column!("game_mode", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_score_score", "score"),
        ("idx_score_game_mode", "game_mode"),
    ],
};
const FEEDBACK_TABLE_V_0: Table = Table {
    name: "feedback",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("player_id", &SqlType::Text),
        sqlite_column!("email", &SqlType::Text),
        sqlite_column!("message", &SqlType::Text, non_null = true),
        sqlite_column!("metadata", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
};

/// V 1
const PROFILE_TABLE_V_1: Table = Table {
    name: "profile",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("username", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("updated_at", &SqlType::Integer),
    ],
    indices: &[],
};

pub const GAME_STORE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[
            ACCOUNT_TABLE_V_0,
            PASSWORD_CREDENTIALS_TABLE_V_0,
            SESSION_TOKEN_TABLE_V_0,
            PROFILE_TABLE_V_0,
            SCORE_TABLE_V_0,
            FEEDBACK_TABLE_V_0,
        ],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[
            ACCOUNT_TABLE_V_0,
            PASSWORD_CREDENTIALS_TABLE_V_0,
            SESSION_TOKEN_TABLE_V_0,
            PROFILE_TABLE_V_1,
            SCORE_TABLE_V_0,
            FEEDBACK_TABLE_V_0,
        ],
        migration: Some(|conn: &Connection| {
            conn.execute("ALTER TABLE profile ADD COLUMN updated_at INTEGER", [])?;
            Ok(())
        }),
    },
];

fn to_unix(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn from_unix(secs: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

/// Local SQLite backend holding every table the game writes to.
#[derive(Clone)]
pub struct SqliteGameStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGameStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned(db_path, GAME_STORE_VERSIONED_SCHEMAS)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = open_in_memory(GAME_STORE_VERSIONED_SCHEMAS)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Game store connection mutex poisoned"))
    }
}

impl GameStore for SqliteGameStore {
    fn insert_score(&self, record: &ScoreRecord) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO score (player_id, score, language, game_mode) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.player_id,
                record.score,
                record.language,
                record.game_mode.as_str()
            ],
        )
        .context("Failed to insert score")?;
        let id = conn.last_insert_rowid();
        debug!(
            "Inserted score {} for {} ({}, {})",
            record.score, record.player_id, record.language, record.game_mode
        );
        Ok(id)
    }

    fn top_scores(&self, mode: GameMode, limit: usize) -> Result<Vec<ScoreRow>> {
        let conn = self.lock()?;
        let mode_filter = match mode {
            GameMode::Poster => "(s.game_mode = ?1 OR s.game_mode IS NULL)",
            GameMode::Soundtrack => "s.game_mode = ?1",
        };
        let sql = format!(
            "SELECT s.id, s.player_id, s.score, s.language, s.created, p.username \
             FROM score s LEFT JOIN profile p ON p.id = s.player_id \
             WHERE {} \
             ORDER BY s.score DESC, s.created ASC, s.id ASC \
             LIMIT ?2",
            mode_filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![mode.as_str(), limit as i64], |row| {
                Ok(ScoreRow {
                    id: row.get(0)?,
                    player_id: row.get(1)?,
                    score: row.get(2)?,
                    language: row.get(3)?,
                    created: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
                    display_name: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO profile (id, username, updated_at) VALUES (?1, ?2, ?3)",
            params![profile.player_id, profile.display_name, profile.updated_at],
        )
        .with_context(|| format!("Failed to create profile for {}", profile.player_id))?;
        Ok(())
    }

    fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO profile (id, username, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(id) DO UPDATE SET username = excluded.username, updated_at = excluded.updated_at",
            params![profile.player_id, profile.display_name, profile.updated_at],
        )
        .with_context(|| format!("Failed to update profile for {}", profile.player_id))?;
        Ok(())
    }

    fn get_profile(&self, player_id: &str) -> Result<Option<Profile>> {
        let conn = self.lock()?;
        let profile = conn
            .query_row(
                "SELECT id, username, updated_at FROM profile WHERE id = ?1",
                params![player_id],
                |row| {
                    Ok(Profile {
                        player_id: row.get(0)?,
                        display_name: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    fn insert_feedback(&self, feedback: &FeedbackRecord) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO feedback (player_id, email, message, metadata) VALUES (?1, ?2, ?3, ?4)",
            params![
                feedback.player_id,
                feedback.email,
                feedback.message,
                feedback.metadata.to_string()
            ],
        )
        .context("Failed to insert feedback")?;
        Ok(conn.last_insert_rowid())
    }
}

impl AccountStore for SqliteGameStore {
    fn create_account(&self, email: &str) -> Result<String> {
        let conn = self.lock()?;
        let player_id = uuid::Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO account (id, email) VALUES (?1, ?2)",
            params![player_id, email],
        )
        .with_context(|| format!("Failed to create account for {}", email))?;
        Ok(player_id)
    }

    fn get_player_id(&self, email: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT id FROM account WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn get_email(&self, player_id: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT email FROM account WHERE id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn get_password_credentials(&self, player_id: &str) -> Result<Option<PasswordCredentials>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT player_id, salt, hash, hasher, created, last_used \
                 FROM password_credentials WHERE player_id = ?1",
                params![player_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<i64>>(4)?,
                        row.get::<_, Option<i64>>(5)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((player_id, salt, hash, hasher, created, last_used)) => {
                Ok(Some(PasswordCredentials {
                    player_id,
                    salt,
                    hash,
                    hasher: hasher.parse::<CredentialHasher>()?,
                    created: from_unix(created.unwrap_or_default()),
                    last_used: last_used.map(from_unix),
                }))
            }
        }
    }

    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO password_credentials \
             (player_id, salt, hash, hasher, created, last_used) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                credentials.player_id,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string(),
                to_unix(credentials.created),
                credentials.last_used.map(to_unix),
            ],
        )
        .with_context(|| format!("Failed to store credentials for {}", credentials.player_id))?;
        Ok(())
    }

    fn mark_password_used(&self, player_id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE password_credentials SET last_used = ?1 WHERE player_id = ?2",
            params![to_unix(SystemTime::now()), player_id],
        )?;
        Ok(())
    }

    fn add_session_token(&self, token: &SessionToken) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO session_token (value, player_id, created, last_used) VALUES (?1, ?2, ?3, ?4)",
            params![
                token.value.0,
                token.player_id,
                to_unix(token.created),
                token.last_used.map(to_unix),
            ],
        )
        .context("Failed to store session token")?;
        Ok(())
    }

    fn get_session_token(&self, value: &SessionTokenValue) -> Result<Option<SessionToken>> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT value, player_id, created, last_used FROM session_token WHERE value = ?1",
                params![value.0],
                |row| {
                    Ok(SessionToken {
                        value: SessionTokenValue(row.get(0)?),
                        player_id: row.get(1)?,
                        created: from_unix(row.get::<_, Option<i64>>(2)?.unwrap_or_default()),
                        last_used: row.get::<_, Option<i64>>(3)?.map(from_unix),
                    })
                },
            )
            .optional()?)
    }

    fn touch_session_token(&self, value: &SessionTokenValue) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE session_token SET last_used = ?1 WHERE value = ?2",
            params![to_unix(SystemTime::now()), value.0],
        )?;
        Ok(())
    }

    fn delete_session_token(&self, value: &SessionTokenValue) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM session_token WHERE value = ?1",
            params![value.0],
        )?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteGameStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("test.db");
        let store = SqliteGameStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    fn score(player_id: &str, score: u32, mode: GameMode) -> ScoreRecord {
        ScoreRecord {
            player_id: player_id.to_string(),
            score,
            language: "telugu".to_string(),
            game_mode: mode,
        }
    }

    #[test]
    fn reopens_existing_database() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");
        {
            let store = SqliteGameStore::new(&path).unwrap();
            store.insert_score(&score("p1", 4, GameMode::Poster)).unwrap();
        }
        let store = SqliteGameStore::new(&path).unwrap();
        assert_eq!(store.top_scores(GameMode::Poster, 10).unwrap().len(), 1);
    }

    #[test]
    fn migrates_v0_profiles_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");
        {
            let conn = Connection::open(&path).unwrap();
            GAME_STORE_VERSIONED_SCHEMAS[0].create(&conn).unwrap();
            conn.execute(
                "INSERT INTO profile (id, username) VALUES ('p1', 'Old Name')",
                [],
            )
            .unwrap();
        }

        let store = SqliteGameStore::new(&path).unwrap();
        let profile = store.get_profile("p1").unwrap().unwrap();
        assert_eq!(profile.display_name, "Old Name");
        assert_eq!(profile.updated_at, None);
    }

    #[test]
    fn top_scores_are_filtered_by_mode_and_sorted() {
        let (store, _temp_dir) = create_tmp_store();
        store.insert_score(&score("p1", 3, GameMode::Poster)).unwrap();
        store.insert_score(&score("p2", 9, GameMode::Poster)).unwrap();
        store.insert_score(&score("p3", 7, GameMode::Soundtrack)).unwrap();
        {
            let conn = store.lock().unwrap();
            conn.execute(
                "INSERT INTO score (player_id, score, language, game_mode) VALUES ('legacy', 5, 'all', NULL)",
                [],
            )
            .unwrap();
        }

        let poster = store.top_scores(GameMode::Poster, 10).unwrap();
        let scores: Vec<u32> = poster.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![9, 5, 3]);

        let soundtrack = store.top_scores(GameMode::Soundtrack, 10).unwrap();
        assert_eq!(soundtrack.len(), 1);
        assert_eq!(soundtrack[0].player_id, "p3");

        assert_eq!(store.top_scores(GameMode::Poster, 2).unwrap().len(), 2);
    }

    #[test]
    fn top_scores_join_profile_names() {
        let (store, _temp_dir) = create_tmp_store();
        store
            .insert_profile(&Profile {
                player_id: "p1".to_string(),
                display_name: "Maverick".to_string(),
                updated_at: None,
            })
            .unwrap();
        store.insert_score(&score("p1", 3, GameMode::Poster)).unwrap();
        store.insert_score(&score("p2", 2, GameMode::Poster)).unwrap();

        let rows = store.top_scores(GameMode::Poster, 10).unwrap();
        assert_eq!(rows[0].display_name.as_deref(), Some("Maverick"));
        assert_eq!(rows[1].display_name, None);
    }

    #[test]
    fn insert_profile_rejects_duplicates_but_upsert_replaces() {
        let (store, _temp_dir) = create_tmp_store();
        let mut profile = Profile {
            player_id: "p1".to_string(),
            display_name: "First".to_string(),
            updated_at: None,
        };
        store.insert_profile(&profile).unwrap();
        assert!(store.insert_profile(&profile).is_err());

        profile.display_name = "Second".to_string();
        profile.updated_at = Some(1_700_000_000);
        store.upsert_profile(&profile).unwrap();

        assert_eq!(store.get_profile("p1").unwrap(), Some(profile));
        assert_eq!(store.get_profile("nobody").unwrap(), None);
    }

    #[test]
    fn stores_feedback_with_metadata() {
        let (store, _temp_dir) = create_tmp_store();
        let id = store
            .insert_feedback(&FeedbackRecord {
                player_id: None,
                email: Some("a@b.c".to_string()),
                message: "More Kannada films please".to_string(),
                metadata: serde_json::json!({"platform": "linux", "version": "0.1.0"}),
            })
            .unwrap();
        assert_eq!(id, 1);

        let conn = store.lock().unwrap();
        let metadata: String = conn
            .query_row("SELECT metadata FROM feedback WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&metadata).unwrap();
        assert_eq!(parsed["platform"], "linux");
    }

    #[test]
    fn accounts_and_tokens() {
        let (store, _temp_dir) = create_tmp_store();
        let player_id = store.create_account("a@b.c").unwrap();
        assert!(store.create_account("a@b.c").is_err());
        assert_eq!(store.get_player_id("a@b.c").unwrap(), Some(player_id.clone()));
        assert_eq!(store.get_email(&player_id).unwrap().as_deref(), Some("a@b.c"));

        let creds = PasswordCredentials::new(&player_id, "secret!").unwrap();
        store.set_password_credentials(&creds).unwrap();
        let loaded = store.get_password_credentials(&player_id).unwrap().unwrap();
        assert!(loaded.matches("secret!").unwrap());
        assert!(loaded.last_used.is_none());
        store.mark_password_used(&player_id).unwrap();
        assert!(store
            .get_password_credentials(&player_id)
            .unwrap()
            .unwrap()
            .last_used
            .is_some());

        let token = SessionToken::issue(&player_id);
        store.add_session_token(&token).unwrap();
        let loaded = store.get_session_token(&token.value).unwrap().unwrap();
        assert_eq!(loaded.player_id, player_id);

        store.touch_session_token(&token.value).unwrap();
        assert!(store
            .get_session_token(&token.value)
            .unwrap()
            .unwrap()
            .last_used
            .is_some());

        assert!(store.delete_session_token(&token.value).unwrap());
        assert!(!store.delete_session_token(&token.value).unwrap());
        assert!(store.get_session_token(&token.value).unwrap().is_none());
    }

    #[test]
    fn token_requires_existing_account() {
        let (store, _temp_dir) = create_tmp_store();
        let token = SessionToken::issue("ghost");
        assert!(store.add_session_token(&token).is_err());
    }
}
