use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use services::{AnswerJudgement, GameEvent, GameSummary, LeaderboardEntry, SessionProgress};
use trivia_core::model::Question;

const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];
const BAR_WIDTH: usize = 20;

/// Renders game events as plain text.
pub struct Presenter<W: Write> {
    events: broadcast::Receiver<GameEvent>,
    out: W,
    score: u32,
    last_question: Option<Question>,
}

impl<W: Write> Presenter<W> {
    pub fn new(events: broadcast::Receiver<GameEvent>, out: W) -> Self {
        Self {
            events,
            out,
            score: 0,
            last_question: None,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render every event published so far.
    pub fn drain(&mut self) -> io::Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.render(&event)?,
                Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "presenter fell behind"),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn leaderboard(&mut self, entries: &[LeaderboardEntry]) -> io::Result<()> {
        if entries.is_empty() {
            writeln!(self.out, "No high scores yet. Be the first to play!")?;
            return self.out.flush();
        }
        writeln!(self.out, "High scores")?;
        for entry in entries {
            writeln!(
                self.out,
                "{:>2}. {:<20} {:>5}  {}/{} correct  {}",
                entry.rank,
                entry.player_name,
                entry.score,
                entry.correct_count,
                entry.total_questions,
                entry.completed_at.format("%Y-%m-%d"),
            )?;
        }
        self.out.flush()
    }

    /// Compact top-of-the-board list for the start screen.
    pub fn podium(&mut self, entries: &[LeaderboardEntry]) -> io::Result<()> {
        if entries.is_empty() {
            writeln!(self.out, "No scores yet!")?;
            return self.out.flush();
        }
        writeln!(self.out, "Top scores")?;
        for entry in entries {
            writeln!(self.out, "  {}. {} - {}", entry.rank, entry.player_name, entry.score)?;
        }
        self.out.flush()
    }

    pub fn progress(&mut self, progress: &SessionProgress) -> io::Result<()> {
        let pct = progress.percent();
        let filled = usize::try_from(pct).unwrap_or(100).min(100) * BAR_WIDTH / 100;
        writeln!(
            self.out,
            "[{}{}] {pct}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled)
        )
    }

    fn render(&mut self, event: &GameEvent) -> io::Result<()> {
        match event {
            GameEvent::Started {
                player_name,
                total_questions,
            } => {
                self.score = 0;
                writeln!(
                    self.out,
                    "\nWelcome, {player_name}! {total_questions} questions coming up."
                )
            }
            GameEvent::QuestionChanged {
                index,
                total,
                question,
            } => {
                self.last_question = Some(question.clone());
                self.question(*index, *total, question)
            }
            GameEvent::AnswerJudged(judgement) => self.judgement(judgement),
            GameEvent::Completed(summary) => self.summary(summary),
            GameEvent::LeaderboardChanged { high_score, .. } => {
                writeln!(self.out, "High Score: {high_score}")
            }
        }
    }

    fn question(&mut self, index: usize, total: usize, question: &Question) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Question {} of {}  [{}]  Score: {}",
            index + 1,
            total,
            question.category(),
            self.score
        )?;
        writeln!(self.out, "{}", question.prompt())?;
        for (letter, answer) in LETTERS.iter().zip(question.answers()) {
            writeln!(self.out, "  {letter}) {answer}")?;
        }
        Ok(())
    }

    fn judgement(&mut self, judgement: &AnswerJudgement) -> io::Result<()> {
        self.score = judgement.score;
        if judgement.is_correct {
            return writeln!(self.out, "Correct! +{} points", judgement.points_awarded);
        }
        let answer = self
            .last_question
            .as_ref()
            .map(|q| q.correct_answer().to_owned())
            .unwrap_or_default();
        let letter = LETTERS.get(judgement.correct_index).copied().unwrap_or('?');
        writeln!(self.out, "Wrong. The answer was {letter}) {answer}")
    }

    fn summary(&mut self, summary: &GameSummary) -> io::Result<()> {
        let result = &summary.result;
        writeln!(self.out, "\nGame over, {}!", result.player_name())?;
        writeln!(self.out, "Final score: {} points", result.score())?;
        writeln!(
            self.out,
            "Correct: {}/{}  Accuracy: {}%",
            result.correct_count(),
            result.total_questions(),
            summary.accuracy_percent
        )?;
        writeln!(self.out, "{}", summary.message())?;
        match summary.rank {
            Some(rank) => writeln!(self.out, "You placed #{rank} on the leaderboard."),
            None => Ok(()),
        }
    }
}

/// Line-oriented reader over stdin.
pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next trimmed line, or `None` at end of input.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_owned()))
    }
}

/// Map `A`-`D` or `1`-`4` to an answer index. Anything else passes through as
/// an out-of-range index so the session reports it.
pub fn parse_answer(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if let Some(i) = LETTERS
        .iter()
        .position(|l| raw.eq_ignore_ascii_case(&l.to_string()))
    {
        return Some(i);
    }
    raw.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

/// `y` or `yes`, case-insensitive.
pub fn is_yes(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
