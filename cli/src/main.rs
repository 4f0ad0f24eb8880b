use anyhow::Context;
use clap::Parser;
use pairflip_core::*;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};

mod assets;
mod render;
mod settings;

#[derive(Parser, Debug)]
#[command(version, about = "Find the pairs: a memory puzzle for the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid rows, overrides the settings file
    #[arg(short, long)]
    rows: Option<Coord>,

    /// Grid columns, overrides the settings file
    #[arg(short, long)]
    cols: Option<Coord>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder with images/*.png and sounds/*.wav
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Where best scores are kept
    #[arg(long, default_value = JsonScoreFile::DEFAULT_PATH)]
    scores: PathBuf,

    /// Keep best scores for this run only
    #[arg(long)]
    no_save: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum Command {
    Cell(Coord2),
    Input(InputEvent),
    Help,
    Quit,
    Unknown(String),
}

const HELP: &str = "\
Commands:
  <row> <col>     reveal the card at row/col (1-based)
  click <x> <y>   click at a pixel position
  h, hint         show every card for a moment
  q, quit         leave the game";

fn parse_command(line: &str) -> Command {
    let words: Vec<_> = line.split_whitespace().collect();
    match words.as_slice() {
        ["h" | "hint"] => Command::Input(InputEvent::Hint),
        ["q" | "quit" | "exit"] => Command::Quit,
        ["help" | "?"] => Command::Help,
        ["click", x, y] => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Command::Input(InputEvent::Click(Point::new(x, y))),
            _ => Command::Unknown(line.to_string()),
        },
        [row, col] => match (row.parse::<Coord>(), col.parse::<Coord>()) {
            (Ok(row @ 1..), Ok(col @ 1..)) => Command::Cell((row - 1, col - 1)),
            _ => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

/// Seed from the wall clock, only used when none is forced.
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut settings = match &args.config {
        Some(path) => settings::Settings::load(path)?,
        None => settings::Settings::default(),
    };
    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(cols) = args.cols {
        settings.cols = cols;
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}", seed);

    let config = GameConfig::new(settings.rows, settings.cols).context("Invalid board size")?;
    let images = match &args.assets {
        Some(dir) => assets::load_images(dir)?,
        None => assets::placeholder_images(config.total_pairs().into()),
    };
    let sound = assets::TerminalBell::from_dir(args.assets.as_deref());
    let board = Board::from_assets(
        config,
        &images,
        RandomDeckGenerator::new(seed),
        settings.canvas(),
        settings.rules(),
        Box::new(sound),
    )
    .context("Could not set up the board")?;

    if args.no_save {
        play(board, InMemoryScores::default(), &settings)
    } else {
        play(board, JsonScoreFile::new(&args.scores), &settings)
    }
}

fn play<S: ScoreStore>(
    board: Board<String>,
    scores: S,
    settings: &settings::Settings,
) -> anyhow::Result<()> {
    let mut session = Session::new(board, SystemClock, scores);
    let mut stdout = std::io::stdout();

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{}", HELP);
    render::render(&mut stdout, session.board(), &session.hud())?;

    let frame = settings.frame();
    let mut quit = false;
    loop {
        let mut events = Vec::new();
        let mut had_input = false;
        loop {
            let line = match rx.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    quit = true;
                    break;
                }
            };
            had_input = true;
            match parse_command(&line) {
                Command::Input(event) => events.push(event),
                Command::Cell(coords) => match session.board().card(coords) {
                    Ok(card) => events.push(InputEvent::Click(card.rect().center())),
                    Err(err) => println!("{} ({} {})", err, coords.0 + 1, coords.1 + 1),
                },
                Command::Help => println!("{}", HELP),
                Command::Quit => quit = true,
                Command::Unknown(line) if line.trim().is_empty() => {}
                Command::Unknown(line) => println!("Unknown command: {}", line.trim()),
            }
        }

        let step = session.step(events);
        if had_input || step.has_update() {
            render::render(&mut stdout, session.board(), &step.hud)?;
        }
        if step.won || quit {
            break;
        }
        std::thread::sleep(frame);
    }

    log::debug!(
        "Leaving after {} moves, {}/{} pairs",
        session.moves(),
        session.board().matched_pairs(),
        session.board().total_pairs()
    );
    Ok(())
}
