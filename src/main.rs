use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinequiz::audio::{AudioResolver, ItunesClient};
use cinequiz::catalog::{CatalogApi, CatalogFetcher, Language, TmdbClient};
use cinequiz::config::{AppConfig, CliConfig, FileConfig};
use cinequiz::feedback::{FeedbackAuthor, FeedbackSender};
use cinequiz::game::{GameSession, LinkPreviewPlayer, PosterGame, ScoreReporter, SoundtrackGame};
use cinequiz::leaderboard::Leaderboard;
use cinequiz::store::{GameMode, SqliteGameStore};
use cinequiz::user::{AccountManager, AccountSession, SessionTokenValue};

mod cli_style;
mod play;

use cli_style::get_styles;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH"));

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version = VERSION, about = "South Indian movie trivia")]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the game database and the saved login.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Movie catalog API key. Falls back to the TMDB_API_KEY environment variable.
    #[clap(long)]
    pub tmdb_api_key: Option<String>,

    #[clap(long)]
    pub tmdb_base_url: Option<String>,

    #[clap(long)]
    pub itunes_base_url: Option<String>,

    /// Timeout in seconds for catalog and preview requests.
    #[clap(long)]
    pub request_timeout_sec: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Starts a game.
    Play {
        /// poster or soundtrack.
        #[clap(long, default_value = "poster")]
        mode: GameMode,

        /// telugu, tamil, malayalam, kannada, hindi or all.
        #[clap(long, default_value = "telugu")]
        lang: String,
    },

    /// Shows the best score of each player.
    Leaderboard {
        #[clap(long, default_value = "poster")]
        mode: GameMode,
    },

    /// Creates an account and logs into it.
    Signup {
        email: String,
        /// Prompted for when omitted.
        password: Option<String>,
        #[clap(long)]
        name: Option<String>,
    },

    Login {
        email: String,
        /// Prompted for when omitted.
        password: Option<String>,
    },

    Logout,

    /// Shows the logged in player.
    Whoami,

    /// Changes the display name shown on leaderboards.
    Rename { name: String },

    /// Sends a message to the developers.
    Feedback { message: String },
}

impl CliArgs {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            tmdb_api_key: self
                .tmdb_api_key
                .clone()
                .or_else(|| std::env::var("TMDB_API_KEY").ok()),
            tmdb_base_url: self.tmdb_base_url.clone(),
            itunes_base_url: self.itunes_base_url.clone(),
            request_timeout_sec: self.request_timeout_sec,
        }
    }
}

struct App {
    config: AppConfig,
    store: Arc<SqliteGameStore>,
    accounts: AccountManager,
}

impl App {
    fn open(config: AppConfig) -> Result<Self> {
        info!("Opening game database at {:?}...", config.db_path());
        let store = Arc::new(SqliteGameStore::new(config.db_path())?);
        let accounts = AccountManager::new(store.clone(), store.clone());
        Ok(Self {
            config,
            store,
            accounts,
        })
    }

    /// The saved login, if it is still valid.
    fn current_session(&self) -> Result<Option<AccountSession>> {
        let Some(token) = read_token(&self.config.session_path())? else {
            return Ok(None);
        };
        let session = self.accounts.session(&token)?;
        if session.is_none() {
            debug!("Saved session token is no longer valid");
            clear_token(&self.config.session_path())?;
        }
        Ok(session)
    }

    fn save_session(&self, session: &AccountSession) -> Result<()> {
        let path = self.config.session_path();
        std::fs::write(&path, session.token.as_str())
            .with_context(|| format!("Failed to save session to {:?}", path))
    }

    fn fetcher(&self) -> Result<Arc<CatalogFetcher>> {
        let api: Arc<dyn CatalogApi> = Arc::new(TmdbClient::new(
            self.config.tmdb_base_url.clone(),
            self.config.tmdb_api_key.clone(),
            self.config.request_timeout_sec,
        )?);
        let fetcher = CatalogFetcher::with_max_pages(api, self.config.game.max_catalog_pages);
        if !fetcher.is_configured() {
            cli_style::print_warning("No catalog API key configured, using the built-in movies");
        }
        Ok(Arc::new(fetcher))
    }

    async fn play(&self, mode: GameMode, lang: &str) -> Result<()> {
        let session = self.current_session()?;
        let reporter = match &session {
            Some(s) => ScoreReporter::new(self.store.clone(), Some(s.player_id.clone())),
            None => {
                cli_style::print_info("Playing as guest, scores will not be saved");
                ScoreReporter::disabled()
            }
        };
        let settings = &self.config.game;
        let mut game_session = GameSession::new(settings.starting_lives);
        let mut console = play::Console::spawn();

        cli_style::print_banner();
        match mode {
            GameMode::Poster => {
                let mut game = PosterGame::new(self.fetcher()?, reporter, Language::from_key(lang))
                    .with_page_span(settings.poster_page_span);
                play::run_poster(&mut game, &mut game_session, &mut console, settings).await?;
            }
            GameMode::Soundtrack => {
                let search = Arc::new(ItunesClient::new(
                    self.config.itunes_base_url.clone(),
                    self.config.request_timeout_sec,
                )?);
                let mut game = SoundtrackGame::new(
                    self.fetcher()?,
                    AudioResolver::new(search),
                    Box::new(LinkPreviewPlayer::new()),
                    reporter,
                    lang,
                )
                .with_page_span(settings.soundtrack_page_span)
                .with_countdown(settings.countdown_secs);
                play::run_soundtrack(&mut game, &mut game_session, &mut console, settings).await?;
            }
        }

        cli_style::print_goodbye(game_session.high_score());
        Ok(())
    }

    fn leaderboard(&self, mode: GameMode) -> Result<()> {
        let entries = Leaderboard::new(self.store.clone()).entries(mode)?;

        cli_style::print_section_header(&format!("{} leaderboard", mode));
        if entries.is_empty() {
            cli_style::print_empty_list("No scores yet");
            cli_style::print_section_footer();
            return Ok(());
        }
        let mut table = cli_style::TableBuilder::new(vec!["#", "Player", "Score", "Language", "Date"]);
        for entry in entries {
            let date = chrono::DateTime::from_timestamp(entry.created, 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            table.add_row(vec![
                entry.rank.to_string(),
                entry.display_name,
                entry.score.to_string(),
                entry.language,
                date,
            ]);
        }
        table.print();
        Ok(())
    }

    fn sign_up(&self, email: &str, password: Option<String>, name: Option<&str>) -> Result<()> {
        let password = password_or_prompt(password)?;
        self.accounts.sign_up(email, &password, name)?;
        let session = self.accounts.log_in(email, &password)?;
        self.save_session(&session)?;
        cli_style::print_success(&format!("Welcome aboard, {}!", session.email));
        Ok(())
    }

    fn log_in(&self, email: &str, password: Option<String>) -> Result<()> {
        let password = password_or_prompt(password)?;
        let session = self.accounts.log_in(email, &password)?;
        self.save_session(&session)?;
        cli_style::print_success(&format!("Logged in as {}", session.email));
        Ok(())
    }

    fn log_out(&self) -> Result<()> {
        let path = self.config.session_path();
        if let Some(token) = read_token(&path)? {
            self.accounts.sign_out(&token)?;
        }
        clear_token(&path)?;
        cli_style::print_success("Logged out");
        Ok(())
    }

    fn who_am_i(&self) -> Result<()> {
        let Some(session) = self.current_session()? else {
            cli_style::print_info("Not logged in");
            return Ok(());
        };
        let name = self
            .accounts
            .display_name(&session.player_id)?
            .unwrap_or_default();
        cli_style::print_section_header("Player");
        cli_style::print_key_value_highlight("Name", &name);
        cli_style::print_key_value("Email", &session.email);
        cli_style::print_key_value("Id", &session.player_id);
        cli_style::print_section_footer();
        Ok(())
    }

    fn rename(&self, name: &str) -> Result<()> {
        let session = self
            .current_session()?
            .context("Log in to change your display name")?;
        self.accounts.update_display_name(&session.player_id, name)?;
        cli_style::print_success(&format!("You are now {}", name.trim()));
        Ok(())
    }

    async fn feedback(&self, message: &str) -> Result<()> {
        let author = match self.current_session()? {
            Some(session) => FeedbackAuthor {
                player_id: Some(session.player_id),
                email: Some(session.email),
            },
            None => FeedbackAuthor::default(),
        };
        FeedbackSender::new(self.store.clone())
            .with_timeout(self.config.game.feedback_timeout())
            .with_version(VERSION)
            .submit(message, author)
            .await?;
        cli_style::print_success("Thanks for the feedback!");
        Ok(())
    }
}

/// Returns Ok(None) if no login was saved.
fn read_token(path: &Path) -> Result<Option<SessionTokenValue>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let token = content.trim();
            Ok((!token.is_empty()).then(|| SessionTokenValue(token.to_string())))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read session from {:?}", path)),
    }
}

fn clear_token(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
            Err(err).with_context(|| format!("Failed to remove session {:?}", path))
        }
        _ => Ok(()),
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    Ok(rl.readline("Password: ")?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.cli_config(), file_config)?;
    let app = App::open(config)?;

    let result = match cli_args.command {
        Command::Play { mode, lang } => app.play(mode, &lang).await,
        Command::Leaderboard { mode } => app.leaderboard(mode),
        Command::Signup {
            email,
            password,
            name,
        } => app.sign_up(&email, password, name.as_deref()),
        Command::Login { email, password } => app.log_in(&email, password),
        Command::Logout => app.log_out(),
        Command::Whoami => app.who_am_i(),
        Command::Rename { name } => app.rename(&name),
        Command::Feedback { message } => app.feedback(&message).await,
    };

    if let Err(err) = &result {
        warn!("Command failed: {:#}", err);
        cli_style::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
    Ok(())
}
