//! CAN Message Browser CLI
//!
//! Command-line front end for the canmsg-model library. It loads message
//! definition files (JSON) from disk and adds:
//! - Per-file overview listings
//! - Message detail views with field/point cross-references
//! - Validation-only runs with path-carrying errors
//! - Simulation sampling driven by the per-point sim descriptors

use anyhow::{bail, Context, Result};
use canmsg_model::CanFile;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

mod report;
mod state;

use state::{AppState, StateUpdate};

/// CAN Message Browser - inspect and validate CAN message definition files
#[derive(Parser, Debug)]
#[command(name = "canmsg-cli")]
#[command(about = "Inspect and validate CAN message definition files", long_about = None)]
#[command(version)]
struct Args {
    /// Message definition file(s) to load (JSON)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Show the detail view of one message (by textual CAN ID)
    #[arg(short, long, value_name = "ID")]
    message: Option<String>,

    /// Validate the files and exit
    #[arg(long)]
    validate: bool,

    /// Emit N simulated sample rows per message
    #[arg(long, value_name = "N")]
    sample: Option<usize>,

    /// Seed for the simulation RNG (default: from entropy)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    log::info!("CAN Message Browser CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using model library v{}", canmsg_model::VERSION);

    let mut app = AppState::new();
    for path in &args.files {
        let file = CanFile::from_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        app.apply(StateUpdate::FileLoaded(file))?;
    }

    if args.validate {
        // Parsing already validated everything; just report
        for file in app.files() {
            println!("✓ {} ({} messages)", file.filename, file.content.len());
        }
        return Ok(());
    }

    if let Some(id) = &args.message {
        return show_message(&app, id);
    }

    if let Some(rounds) = args.sample {
        return show_samples(&app, rounds, args.seed);
    }

    println!("═══════════════════════════════════════════════");
    println!("  CAN Message Browser - Overview");
    println!("═══════════════════════════════════════════════\n");
    print!("{}", report::overview(app.files()));
    Ok(())
}

/// Detail mode - find the message across all loaded files and render it
fn show_message(app: &AppState, id: &str) -> Result<()> {
    for file in app.files() {
        if let Some(msg) = file.message(id) {
            println!("File: {}\n", file.filename);
            print!("{}", report::detail(msg));
            return Ok(());
        }
    }
    bail!("no message with id '{}' in the loaded files", id);
}

/// Sample mode - drive every sim descriptor for a few rounds
fn show_samples(app: &AppState, rounds: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for file in app.files() {
        println!("── {} ──", file.filename);
        print!("{}", report::sample_table(file, rounds, &mut rng)?);
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
