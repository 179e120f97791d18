use chess_session::{Command, Session, SessionConfig, SessionError};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Plays one chess game over a line protocol on stdin/stdout.
#[derive(Parser)]
#[command(name = "chess-session")]
#[command(about = "Line-protocol chess session with time control")]
struct Args {
    /// Path to a TOML session config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON summary to stdout when a game ends
    #[arg(long)]
    summary_json: bool,
}

fn main() -> Result<(), SessionError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = SessionConfig::load(args.config.as_deref())?;
    tracing::info!(
        initial = config.time_control.initial_seconds,
        increment = config.time_control.increment_seconds,
        "session ready"
    );
    let mut session = Session::new(config);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut last = Instant::now();
    let mut summary_printed = false;

    for line in stdin.lock().lines() {
        let line = line?;
        let now = Instant::now();
        let mut events: Vec<_> = session.tick(now - last).into_iter().collect();
        last = now;

        let parsed = Command::parse(&line);
        let quit = parsed == Ok(Command::Quit);
        if matches!(parsed, Ok(Command::StartGame { .. })) {
            summary_printed = false;
        }
        events.extend(session.handle_parsed(&line, parsed));

        for event in &events {
            writeln!(stdout, "{}", event.to_line())?;
        }
        if args.summary_json && session.game().is_game_over() && !summary_printed {
            writeln!(stdout, "{}", serde_json::to_string(&session.summary())?)?;
            summary_printed = true;
        }
        stdout.flush()?;

        if quit {
            break;
        }
    }

    tracing::info!(notation = %session.game().notation(), "session closed");
    Ok(())
}
