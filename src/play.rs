//! Interactive rounds on the terminal.

use anyhow::Result;
use rustyline::error::ReadlineError;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::warn;

use cinequiz::config::GameSettings;
use cinequiz::game::{
    GameError, GameSession, GuessOutcome, PosterGame, SoundtrackGame, TickOutcome,
    IMAGE_MAX_BLUR, OVERLAY_START, POSTER_MAX_BLUR,
};

use crate::cli_style::{self, CommandHelp};

/// Line input read on a dedicated thread so the countdown keeps running
/// while the prompt is open.
pub struct Console {
    requests: std_mpsc::Sender<()>,
    lines: mpsc::UnboundedReceiver<String>,
    pending: bool,
}

impl Console {
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = std_mpsc::channel::<()>();
        let (line_tx, line_rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let mut rl = match rustyline::DefaultEditor::new() {
                Ok(rl) => rl,
                Err(err) => {
                    warn!("Could not open the terminal for input: {}", err);
                    return;
                }
            };
            while request_rx.recv().is_ok() {
                match rl.readline(&cli_style::get_prompt()) {
                    Ok(line) => {
                        let _ = rl.add_history_entry(line.as_str());
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                    Err(err) => {
                        warn!("Input error: {}", err);
                        break;
                    }
                }
            }
        });

        Self {
            requests: request_tx,
            lines: line_rx,
            pending: false,
        }
    }

    /// Next line typed by the player, `None` once input is closed.
    /// Safe to cancel: an unanswered prompt is reused by the next call.
    pub async fn next_line(&mut self) -> Option<String> {
        if !self.pending {
            self.requests.send(()).ok()?;
            self.pending = true;
        }
        let line = self.lines.recv().await;
        self.pending = false;
        line
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PlayCommand {
    Choice(usize),
    Clue,
    Pause,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> PlayCommand {
    let line = line.trim().to_lowercase();
    if line.is_empty() {
        return PlayCommand::Empty;
    }
    if let Ok(n) = line.parse::<usize>() {
        return PlayCommand::Choice(n);
    }
    match line.as_str() {
        "c" | "clue" => PlayCommand::Clue,
        "p" | "pause" | "play" => PlayCommand::Pause,
        "h" | "help" | "?" => PlayCommand::Help,
        "q" | "quit" | "exit" => PlayCommand::Quit,
        _ => PlayCommand::Unknown(line),
    }
}

const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "1-4",
        description: "Pick an answer",
    },
    CommandHelp {
        name: "c",
        description: "Show or hide the clue",
    },
    CommandHelp {
        name: "p",
        description: "Pause or resume the preview (soundtrack mode)",
    },
    CommandHelp {
        name: "q",
        description: "Quit",
    },
];

/// What to do after a game ended.
async fn play_again(console: &mut Console, session: &mut GameSession) -> bool {
    println!("  Play again? [y/N]");
    let again = matches!(
        console.next_line().await.as_deref().map(str::trim),
        Some("y") | Some("Y") | Some("yes")
    );
    if again {
        session.reset();
    }
    again
}

/// Whether a round that failed to load should be tried again.
async fn retry_after(err: &GameError, console: &mut Console) -> bool {
    cli_style::print_error(&err.to_string());
    println!("  Try again? [Y/n]");
    !matches!(
        console.next_line().await.as_deref().map(str::trim),
        None | Some("n") | Some("N") | Some("no")
    )
}

fn print_poster_round(game: &PosterGame, session: &GameSession, settings: &GameSettings) {
    cli_style::print_section_header("Which movie is this?");
    cli_style::print_hud(
        session.score(),
        session.lives(),
        settings.starting_lives,
        session.high_score(),
    );
    if let Some(url) = game.poster_url() {
        cli_style::print_key_value("Poster", &url);
    }
    cli_style::print_meter("Blur", game.blur(), POSTER_MAX_BLUR);
    if game.clue_visible() {
        if let Some(clue) = game.clue() {
            cli_style::print_key_value("Clue", &format!("{}...", clue));
        }
    }
    let titles: Vec<&str> = game.candidates().iter().map(|m| m.title.as_str()).collect();
    cli_style::print_options(&titles);
    cli_style::print_section_footer();
}

pub async fn run_poster(
    game: &mut PosterGame,
    session: &mut GameSession,
    console: &mut Console,
    settings: &GameSettings,
) -> Result<()> {
    loop {
        cli_style::print_info("Loading round...");
        if let Err(err) = game.load_round(session).await {
            if retry_after(&err, console).await {
                continue;
            }
            return Ok(());
        }
        print_poster_round(game, session, settings);

        loop {
            let Some(line) = console.next_line().await else {
                return Ok(());
            };
            let choice = match parse_command(&line) {
                PlayCommand::Choice(n) => n,
                PlayCommand::Clue => {
                    game.toggle_clue();
                    print_poster_round(game, session, settings);
                    continue;
                }
                PlayCommand::Help => {
                    cli_style::print_help(COMMANDS);
                    continue;
                }
                PlayCommand::Quit => return Ok(()),
                PlayCommand::Empty | PlayCommand::Pause => continue,
                PlayCommand::Unknown(other) => {
                    cli_style::print_warning(&format!("Unknown command {}, try help", other));
                    continue;
                }
            };
            let Some(movie_id) = choice
                .checked_sub(1)
                .and_then(|i| game.candidates().get(i))
                .map(|m| m.id)
            else {
                cli_style::print_warning("Pick one of the numbered answers");
                continue;
            };

            match game.guess(movie_id, session)? {
                GuessOutcome::Correct => {
                    let title = game.target().map(|m| m.title.clone()).unwrap_or_default();
                    cli_style::print_reveal(&format!("Correct! It was {}", title), true);
                    break;
                }
                GuessOutcome::Wrong { lives_left } => {
                    cli_style::print_reveal(&format!("Wrong! {} lives left", lives_left), false);
                    tokio::time::sleep(settings.wrong_retry_delay()).await;
                    game.clear_wrong_feedback();
                    print_poster_round(game, session, settings);
                }
                GuessOutcome::GameOver { final_score } => {
                    let title = game.target().map(|m| m.title.clone()).unwrap_or_default();
                    cli_style::print_reveal(
                        &format!("Game over! It was {}. Final score: {}", title, final_score),
                        false,
                    );
                    if let Some(url) = game.poster_url() {
                        cli_style::print_key_value("Poster", &url);
                    }
                    if !play_again(console, session).await {
                        return Ok(());
                    }
                    break;
                }
                GuessOutcome::Ignored => {}
            }
        }
    }
}

fn print_soundtrack_round(game: &SoundtrackGame, session: &GameSession, settings: &GameSettings) {
    cli_style::print_section_header("Name that soundtrack");
    cli_style::print_hud(
        session.score(),
        session.lives(),
        settings.starting_lives,
        session.high_score(),
    );
    if let Some(track) = game.track() {
        let state = if game.player().is_playing() {
            "playing"
        } else {
            "paused"
        };
        cli_style::print_key_value(&format!("Preview ({})", state), &track.preview_url);
    }
    cli_style::print_meter("Cover", game.image_blur(), IMAGE_MAX_BLUR);
    cli_style::print_meter("Overlay", game.overlay(), OVERLAY_START);
    cli_style::print_countdown(game.seconds_left());
    cli_style::print_options(game.options());
    cli_style::print_section_footer();
}

fn print_soundtrack_answer(game: &SoundtrackGame) {
    if let Some(track) = game.track() {
        cli_style::print_key_value("Song", &format!("{} by {}", track.title, track.artist));
        cli_style::print_key_value("Cover", &track.artwork_url);
    }
}

pub async fn run_soundtrack(
    game: &mut SoundtrackGame,
    session: &mut GameSession,
    console: &mut Console,
    settings: &GameSettings,
) -> Result<()> {
    'rounds: loop {
        cli_style::print_info("Finding a track...");
        if let Err(err) = game.load_round(session).await {
            if retry_after(&err, console).await {
                continue;
            }
            return Ok(());
        }
        print_soundtrack_round(game, session, settings);

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.tick().await;
        let mut retry_at: Option<Instant> = None;

        loop {
            tokio::select! {
                line = console.next_line() => {
                    let Some(line) = line else {
                        return Ok(());
                    };
                    let choice = match parse_command(&line) {
                        PlayCommand::Choice(n) => n,
                        PlayCommand::Clue => {
                            if let Some(artist) = game.clue() {
                                cli_style::print_key_value("Artist", artist);
                            }
                            continue;
                        }
                        PlayCommand::Pause => {
                            let playing = game.toggle_play();
                            cli_style::print_info(if playing { "Playing" } else { "Paused" });
                            continue;
                        }
                        PlayCommand::Help => {
                            cli_style::print_help(COMMANDS);
                            continue;
                        }
                        PlayCommand::Quit => return Ok(()),
                        PlayCommand::Empty => continue,
                        PlayCommand::Unknown(other) => {
                            cli_style::print_warning(&format!("Unknown command {}, try help", other));
                            continue;
                        }
                    };
                    let Some(title) = choice
                        .checked_sub(1)
                        .and_then(|i| game.options().get(i))
                        .cloned()
                    else {
                        cli_style::print_warning("Pick one of the numbered answers");
                        continue;
                    };

                    match game.guess(&title, session)? {
                        GuessOutcome::Correct => {
                            cli_style::print_reveal(&format!("Correct! It was {}", title), true);
                            print_soundtrack_answer(game);
                            continue 'rounds;
                        }
                        GuessOutcome::Wrong { lives_left } => {
                            cli_style::print_reveal(
                                &format!("Wrong! {} lives left", lives_left),
                                false,
                            );
                            retry_at = Some(Instant::now() + settings.wrong_retry_delay());
                        }
                        GuessOutcome::GameOver { final_score } => {
                            cli_style::print_reveal(
                                &format!(
                                    "Game over! It was {}. Final score: {}",
                                    game.correct_movie(),
                                    final_score
                                ),
                                false,
                            );
                            print_soundtrack_answer(game);
                            if !play_again(console, session).await {
                                return Ok(());
                            }
                            continue 'rounds;
                        }
                        GuessOutcome::Ignored => {}
                    }
                }
                _ = ticker.tick() => match game.tick(session) {
                    TickOutcome::Running { seconds_left } => {
                        if seconds_left % 10 == 0 || seconds_left <= 5 {
                            cli_style::print_countdown(seconds_left);
                        }
                    }
                    TickOutcome::TimedOut => {
                        cli_style::print_reveal(
                            &format!("Time's up! It was {}", game.correct_movie()),
                            false,
                        );
                        print_soundtrack_answer(game);
                        continue 'rounds;
                    }
                    TickOutcome::GameOver { final_score } => {
                        cli_style::print_reveal(
                            &format!(
                                "Time's up! It was {}. Final score: {}",
                                game.correct_movie(),
                                final_score
                            ),
                            false,
                        );
                        if !play_again(console, session).await {
                            return Ok(());
                        }
                        continue 'rounds;
                    }
                    TickOutcome::Idle => {}
                },
                _ = tokio::time::sleep_until(retry_at.unwrap_or_else(Instant::now)), if retry_at.is_some() => {
                    retry_at = None;
                    game.clear_wrong_feedback();
                    print_soundtrack_round(game, session, settings);
                }
            }
        }
    }
}
