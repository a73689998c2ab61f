//! Crossterm rendering for the quiz: question banners, verdicts, the per-slot
//! progress strip, and the round-score bar that stands in for the original
//! donut chart.

use std::io::{self, Write, stdout};
use std::thread;
use std::time::Duration;

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use services::{AnswerOutcome, Presenter, QuizProgress};
use trainer_core::model::{Question, Round, ScoreSummary, SlotResult};

const SCORE_BAR_CELLS: u32 = 20;

/// Terminal presenter for the quiz engine.
///
/// Owns the pacing between a verdict and the next question; the engine only
/// signals readiness.
pub struct TerminalPresenter {
    delay: Duration,
}

impl TerminalPresenter {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn print_question(&self, question: &Question) -> io::Result<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Color::Cyan),
            Print("Concert Key: "),
            ResetColor,
            Print(format!("{}\n", question.concert)),
        )?;
        stdout.flush()
    }

    fn print_outcome(&self, outcome: &AnswerOutcome) -> io::Result<()> {
        let mut stdout = stdout();
        match (outcome.round, outcome.correct) {
            (Round::Initial, true) => execute!(
                stdout,
                SetForegroundColor(Color::Green),
                Print("Correct\n"),
                ResetColor
            )?,
            (Round::Initial, false) => execute!(
                stdout,
                SetForegroundColor(Color::Red),
                Print(format!("Incorrect — {}\n", outcome.expected)),
                ResetColor
            )?,
            (Round::Review, true) => execute!(
                stdout,
                SetForegroundColor(Color::Green),
                Print("Correct (review)\n"),
                ResetColor
            )?,
            (Round::Review, false) => execute!(
                stdout,
                SetForegroundColor(Color::Red),
                Print(format!("Still incorrect — {}\n", outcome.expected)),
                ResetColor
            )?,
        }
        stdout.flush()
    }

    fn print_round_complete(
        &self,
        round: Round,
        summary: ScoreSummary,
        has_review_pending: bool,
    ) -> io::Result<()> {
        let mut stdout = stdout();
        let (title, score_line) = match round {
            Round::Initial => (
                "First Test Complete",
                format!(
                    "{} of 4 correct ({}%)",
                    summary.correct_count(),
                    summary.percent()
                ),
            ),
            Round::Review => (
                "Final Results",
                format!(
                    "{} of 4 correct after review ({}%)",
                    summary.correct_count(),
                    summary.percent()
                ),
            ),
        };

        let filled = summary.percent() * SCORE_BAR_CELLS / 100;
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Color::Magenta),
            Print(format!("{title}\n")),
            ResetColor,
            Print(format!("{score_line}\n")),
            SetForegroundColor(Color::Green),
            Print("█".repeat(filled as usize)),
            SetForegroundColor(Color::Yellow),
            Print("░".repeat((SCORE_BAR_CELLS - filled) as usize)),
            ResetColor,
            Print(format!(" {}%\n", summary.percent())),
        )?;

        if has_review_pending {
            execute!(stdout, Print("A review round covers the missed keys.\n"))?;
        }
        stdout.flush()
    }
}

impl Presenter for TerminalPresenter {
    fn question_ready(&self, question: &Question) {
        // Best effort: a failed terminal write should not kill the quiz.
        let _ = self.print_question(question);
    }

    fn answer_outcome(&self, outcome: &AnswerOutcome) {
        let _ = self.print_outcome(outcome);
        // The verdict stays on screen for a beat before the quiz moves on.
        thread::sleep(self.delay);
    }

    fn round_complete(&self, round: Round, summary: ScoreSummary, has_review_pending: bool) {
        let _ = self.print_round_complete(round, summary, has_review_pending);
    }
}

/// Render the per-slot progress strip for the active round.
pub fn render_progress(progress: &QuizProgress) -> io::Result<()> {
    let mut stdout = stdout();

    let round = match progress.round {
        Round::Initial => "test",
        Round::Review => "review",
    };
    execute!(
        stdout,
        Print(format!(
            "[{round} {}/{}] ",
            progress.answered.min(progress.total),
            progress.total
        )),
    )?;

    for slot in progress.slots {
        let color = match slot {
            SlotResult::Pending => Color::DarkGrey,
            SlotResult::Correct => Color::Green,
            SlotResult::Incorrect => Color::Yellow,
        };
        execute!(stdout, SetForegroundColor(color), Print("■ "), ResetColor)?;
    }
    execute!(stdout, Print("\n"))?;
    stdout.flush()
}
