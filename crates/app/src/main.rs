mod input;
mod render;

use std::fmt;
use std::path::PathBuf;

use services::quiz::{builtin_definition, load_definition};
use services::{Clock, LoadedQuiz, QuizError, QuizRunner};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};

use crate::input::{Command, parse_line};
use crate::render::{HELP, Screen};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeconds { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeconds { raw } => write!(f, "invalid --seconds value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--quiz <file.json>] [--seconds <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  built-in quiz, 15 seconds per question");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_FILE, QUIZ_SECONDS_PER_QUESTION, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    quiz_path: Option<PathBuf>,
    seconds: Option<u32>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            quiz_path: std::env::var_os("QUIZ_FILE").map(PathBuf::from),
            seconds: None,
        };
        if let Ok(raw) = std::env::var("QUIZ_SECONDS_PER_QUESTION") {
            parsed.seconds = Some(parse_seconds(raw)?);
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz" => {
                    let value = require_value(args, "--quiz")?;
                    parsed.quiz_path = Some(PathBuf::from(value));
                }
                "--seconds" => {
                    let value = require_value(args, "--seconds")?;
                    parsed.seconds = Some(parse_seconds(value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn parse_seconds(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeconds { raw })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("services=info,app=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(log_fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_quiz(args: &Args) -> Result<LoadedQuiz, QuizError> {
    let mut quiz = match &args.quiz_path {
        Some(path) => load_definition(path)?,
        None => builtin_definition().validate()?,
    };
    if let Some(seconds) = args.seconds {
        quiz.settings = quiz.settings.with_seconds_per_question(seconds)?;
    }
    Ok(quiz)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut raw_args = std::env::args().skip(1);
    let args = Args::parse(&mut raw_args)?;
    init_tracing();

    let quiz = load_quiz(&args)?;
    let title = quiz.title.clone();
    tracing::info!(
        title = %title,
        questions = quiz.questions.len(),
        seconds = quiz.settings.seconds_per_question(),
        "quiz loaded"
    );

    let (handle, task) = QuizRunner::spawn(quiz.into_engine(Clock::system()));
    let mut snapshots = handle.subscribe();
    let mut screen = Screen::default();
    if let Some(text) = screen.update(&title, &snapshots.borrow_and_update()) {
        println!("{text}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line, &handle.snapshot()) {
                    Command::Intent(intent) => {
                        if !handle.dispatch(intent).await?.is_applied() {
                            println!("(nothing to do)");
                        }
                    }
                    Command::Help => println!("{HELP}"),
                    Command::Quit => break,
                    Command::Unknown(raw) => {
                        println!("unrecognised input: {raw} (:help for commands)");
                    }
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(text) = screen.update(&title, &snapshot) {
                    println!("{text}");
                }
            }
        }
    }

    handle.shutdown().await?;
    let engine = task.await?;
    tracing::info!(phase = ?engine.phase(), score = engine.score(), "quiz closed");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
