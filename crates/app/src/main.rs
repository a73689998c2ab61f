mod presenter;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use presenter::TerminalPresenter;
use services::{Clock, QuizLoopService, QuizSession, ReviewStart};
use trainer_core::model::{AnswerChoice, Instrument, Round};

#[derive(Parser, Debug)]
#[command(name = "Band Key Trainer")]
#[command(about = "Concert-key transposition drills for band instruments")]
struct Args {
    /// Instrument token (bravo, charlie, foxtrot, echo)
    #[arg(short, long, default_value = "bravo")]
    instrument: String,

    /// Seed for a reproducible question order
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pause between a verdict and the next question, in milliseconds
    #[arg(long, default_value = "800")]
    delay_ms: u64,
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let instrument: Instrument = args.instrument.parse()?;

    let presenter = Arc::new(TerminalPresenter::new(Duration::from_millis(args.delay_ms)));
    let service = QuizLoopService::new(Clock::default_clock(), presenter);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Band Key Trainer ({instrument})");
    println!("Answer with accidental tokens (F#, Bb, ...), `natural`, `clear`, `check`, `quit`.");

    loop {
        let mut session = match args.seed {
            Some(seed) => service.start_with_rng(instrument, &mut StdRng::seed_from_u64(seed)),
            None => service.start(instrument),
        };

        if !run_session(&service, &mut session, &mut lines)? {
            return Ok(());
        }

        print!("Practice again? [y/N] ");
        io::stdout().flush()?;
        match lines.next() {
            Some(line) => {
                if !line?.trim().eq_ignore_ascii_case("y") {
                    return Ok(());
                }
            }
            None => return Ok(()),
        }
    }
}

/// Drive one session to its end. Returns `false` when the user quits or
/// stdin closes.
fn run_session(
    service: &QuizLoopService,
    session: &mut QuizSession,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        presenter::render_progress(&session.progress())?;
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(false);
        };
        let line = line?;

        match line.trim() {
            "quit" | "q" => return Ok(false),
            "clear" => {
                service.clear_answer(session);
                println!("Your Key Signature:");
            }
            "" | "check" => {
                let result = service.submit(session)?;
                if !result.is_round_complete {
                    continue;
                }
                match result.outcome.round {
                    Round::Initial => {
                        if session.has_missed() {
                            print!("Press Enter to start the next test...");
                            io::stdout().flush()?;
                            if lines.next().is_none() {
                                return Ok(false);
                            }
                        }
                        match service.start_review(session)? {
                            ReviewStart::Started => {}
                            ReviewStart::NoReviewNeeded => return Ok(true),
                        }
                    }
                    Round::Review => return Ok(true),
                }
            }
            token => match token.parse::<AnswerChoice>() {
                Ok(choice) => {
                    service.choose(session, choice);
                    println!("Your Key Signature: {}", session.answer());
                }
                Err(err) => println!("{err}"),
            },
        }
    }
}
