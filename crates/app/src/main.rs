mod cli;
mod presenter;

use clap::Parser;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use services::{
    AdvanceOutcome, Clock, GameLoopError, GameLoopService, GameSession, ScoreStore, SessionError,
    load_bank, source_for,
};
use storage::Storage;
use trivia_core::model::GameSettings;

use cli::{Cli, Command, prepare_sqlite_file};
use presenter::{Input, Presenter, is_yes, parse_answer};

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = GameSettings::default().with_questions_per_game(cli.questions_per_game)?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    let db_url = cli.db_url();
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url).await?;
    let scores = Arc::new(ScoreStore::from_settings(storage.slots.clone(), &settings));

    let mut input = Input::stdin();

    match cli.command() {
        Command::Play { name } => {
            let bank = load_bank(source_for(&cli.questions).as_ref()).await;
            let service =
                GameLoopService::new(Clock::default_clock(), settings, Arc::new(bank), scores);
            let mut presenter = Presenter::new(service.subscribe(), std::io::stdout());
            let delay = Duration::from_millis(cli.reveal_delay_ms);

            presenter.line(&format!(
                "{} questions in: {}",
                service.bank().len(),
                service.bank().categories().join(", ")
            ))?;
            play(&service, &mut presenter, &mut input, name, delay).await
        }
        Command::Scores { limit } => {
            let entries = services::sessions::leaderboard_entries(&scores.top_scores(limit).await);
            let mut presenter = Presenter::new(scores.events().subscribe(), std::io::stdout());
            presenter.leaderboard(&entries)?;
            Ok(())
        }
        Command::Clear { yes } => {
            let mut presenter = Presenter::new(scores.events().subscribe(), std::io::stdout());
            if !yes {
                presenter.prompt(
                    "Are you sure you want to clear all high scores? This cannot be undone. [y/N] ",
                )?;
                let answer = input.next_line().await?.unwrap_or_default();
                if !is_yes(&answer) {
                    presenter.line("Nothing cleared.")?;
                    return Ok(());
                }
            }
            scores.clear().await?;
            presenter.line("High scores cleared!")?;
            Ok(())
        }
    }
}

async fn play(
    service: &GameLoopService,
    presenter: &mut Presenter<Stdout>,
    input: &mut Input,
    mut name: Option<String>,
    delay: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = None;
    loop {
        let previous = session.take();
        let Some(next) = start(service, presenter, input, previous, name.take()).await? else {
            return Ok(());
        };
        let current = session.insert(next);
        if !play_round(service, presenter, input, current, delay).await? {
            return Ok(());
        }
        presenter.leaderboard(&service.top_scores(10).await)?;

        presenter.prompt("\nPlay again? [y/N] ")?;
        let again = input.next_line().await?.unwrap_or_default();
        if !is_yes(&again) {
            return Ok(());
        }
    }
}

/// Show the start screen and ask for a name until the game starts, reusing
/// `previous` when there is one. `None` if input ran out.
async fn start(
    service: &GameLoopService,
    presenter: &mut Presenter<Stdout>,
    input: &mut Input,
    mut previous: Option<GameSession>,
    mut name: Option<String>,
) -> Result<Option<GameSession>, Box<dyn std::error::Error>> {
    presenter.line(&format!("\nHigh Score: {}", service.high_score().await))?;
    presenter.podium(&service.top_scores(3).await)?;

    loop {
        let raw = match name.take() {
            Some(raw) => raw,
            None => {
                presenter.prompt("Enter your name: ")?;
                match input.next_line().await? {
                    Some(line) => line,
                    None => return Ok(None),
                }
            }
        };

        let started = match previous.take() {
            Some(mut session) => match service.restart_game(&mut session, &raw) {
                Ok(()) => Ok(session),
                Err(err) => {
                    previous = Some(session);
                    Err(err)
                }
            },
            None => service.start_game(&raw),
        };
        match started {
            Ok(session) => {
                presenter.drain()?;
                return Ok(Some(session));
            }
            Err(SessionError::InvalidInput(err)) => presenter.line(&err.to_string())?,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Play one game to the end. `false` if the player quit or input ran out.
async fn play_round(
    service: &GameLoopService,
    presenter: &mut Presenter<Stdout>,
    input: &mut Input,
    session: &mut GameSession,
    delay: Duration,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        presenter.prompt("Your answer (A-D, q to quit): ")?;
        let Some(line) = input.next_line().await? else {
            return Ok(false);
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(false);
        }

        let Some(index) = parse_answer(&line) else {
            presenter.line("Please answer with A, B, C or D.")?;
            continue;
        };
        match service.submit_answer(session, index) {
            Ok(_) => presenter.drain()?,
            Err(SessionError::InvalidInput(err)) => {
                presenter.line(&err.to_string())?;
                continue;
            }
            Err(err) => return Err(err.into()),
        }

        tokio::time::sleep(delay).await;

        match service.advance(session).await {
            Ok(AdvanceOutcome::Next(progress)) => {
                presenter.progress(&progress)?;
                presenter.drain()?;
            }
            Ok(AdvanceOutcome::Finished(_)) => {
                presenter.drain()?;
                return Ok(true);
            }
            Err(GameLoopError::Scores(err)) => {
                warn!(error = %err, "could not save result");
                return save_with_retry(service, presenter, input, session).await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

async fn save_with_retry(
    service: &GameLoopService,
    presenter: &mut Presenter<Stdout>,
    input: &mut Input,
    session: &mut GameSession,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        presenter.prompt("Your score could not be saved. Retry? [y/N] ")?;
        let answer = input.next_line().await?.unwrap_or_default();
        if !is_yes(&answer) {
            return Ok(true);
        }
        match service.finalize_result(session).await {
            Ok(_) => {
                presenter.drain()?;
                return Ok(true);
            }
            Err(err) => warn!(error = %err, "retry failed"),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
