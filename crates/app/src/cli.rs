use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

use trivia_core::model::GameSettings;

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("invalid sqlite url: {raw}")]
    InvalidDbUrl { raw: String },
}

#[derive(Parser, Debug)]
#[command(name = "trivia", version, about = "Terminal trivia quiz with a local leaderboard")]
pub struct Cli {
    /// `SQLite` database holding the leaderboard.
    #[arg(
        long,
        global = true,
        env = "TRIVIA_DB_URL",
        default_value = "sqlite:trivia.sqlite3",
        value_name = "SQLITE_URL"
    )]
    pub db: String,

    /// Question document, as a file path or an http(s) URL.
    #[arg(
        long,
        global = true,
        env = "TRIVIA_QUESTIONS",
        default_value = "questions.json",
        value_name = "PATH_OR_URL"
    )]
    pub questions: String,

    #[arg(
        long,
        global = true,
        env = "TRIVIA_QUESTIONS_PER_GAME",
        default_value_t = GameSettings::DEFAULT_QUESTIONS_PER_GAME
    )]
    pub questions_per_game: u32,

    /// Pause after each answer before the next question is offered.
    #[arg(long, global = true, default_value_t = 1000, value_name = "MS")]
    pub reveal_delay_ms: u64,

    /// Verbose output (-v, -vv, -vvv). Overridden by `RUST_LOG`.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play a game (default).
    Play {
        /// Skip the name prompt.
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the leaderboard.
    Scores {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Delete every leaderboard entry.
    Clear {
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Play { name: None })
    }

    #[must_use]
    pub fn db_url(&self) -> String {
        normalize_sqlite_url(&self.db)
    }
}

/// Turn a bare path or `sqlite:path` into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its directory so the first connect succeeds.
///
/// # Errors
///
/// Returns an error if the URL has no path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_play() {
        let cli = Cli::try_parse_from(["trivia"]).unwrap();
        assert_eq!(cli.command(), Command::Play { name: None });
        assert_eq!(cli.questions_per_game, 10);
        assert_eq!(cli.reveal_delay_ms, 1000);
    }

    #[test]
    fn subcommands_and_global_flags_parse() {
        let cli = Cli::try_parse_from([
            "trivia",
            "scores",
            "--limit",
            "3",
            "--db",
            "sqlite::memory:",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.command(), Command::Scores { limit: 3 });
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.db_url(), "sqlite::memory:");

        let cli = Cli::try_parse_from(["trivia", "clear", "--yes"]).unwrap();
        assert_eq!(cli.command(), Command::Clear { yes: true });
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/trivia.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/trivia.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.db"),
            "sqlite:///tmp/x.db"
        );
        assert_eq!(normalize_sqlite_url("/tmp/x.db"), "sqlite:///tmp/x.db");
    }

    #[test]
    fn prepare_rejects_non_file_urls() {
        assert!(prepare_sqlite_file("postgres://x").is_err());
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
    }
}
