//! Command-line interface for steghide password brute-forcing.
//!
//! All human-facing output (banner, progress, final messages) lives here;
//! the `cracker` library only schedules invocations and reports state.

use clap::Parser;
use cracker::{crack, preflight, CrackError, CrackOptions, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "stegcrack")]
#[command(version, about = "Brute-force the password of steghide-protected files", long_about = None)]
struct Cli {
    /// Carrier file suspected of containing hidden data
    file: PathBuf,

    /// Wordlist with one candidate password per line
    #[arg(default_value = "/usr/share/wordlists/rockyou.txt")]
    wordlist: PathBuf,

    /// Output file for the extracted payload (default: <file>.out)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short, long, default_value_t = 16)]
    threads: usize,

    /// Number of passwords dispensed to a worker per batch
    #[arg(short, long, default_value_t = 256)]
    chunk_size: usize,

    /// Suppress logging and progress output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show steghide's output for every attempt
    #[arg(short, long)]
    verbose: bool,

    /// Print the final result as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout stays reserved for
    // the cracked password (or the JSON summary).
    let default_level = if cli.quiet {
        "off"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<bool, CrackError> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| append_out_extension(&cli.file));

    preflight::check_setup(&cli.file, &cli.wordlist, &output)?;

    info!("stegcrack v{}", env!("CARGO_PKG_VERSION"));

    let line_count = if cli.quiet || cli.json {
        None
    } else {
        info!("Counting lines in wordlist..");
        Some(preflight::count_lines(&cli.wordlist)?)
    };

    let cancel_flag = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel_flag.clone();
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
            warn!("could not install Ctrl-C handler: {e}");
        }
    }

    let bar = line_count.map(|total| {
        let bar = ProgressBar::new(total.max(1));
        bar.set_style(
            ProgressStyle::with_template("{pos}/{len} ({percent}%) Attempted: {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    });

    let progress_fn: Option<Box<dyn Fn(u64, &str) + Send + Sync>> = bar.as_ref().map(|bar| {
        let bar = bar.clone();
        Box::new(move |attempts: u64, last: &str| {
            bar.set_position(attempts);
            bar.set_message(last.chars().take(20).collect::<String>());
        }) as Box<dyn Fn(u64, &str) + Send + Sync>
    });

    info!(
        "Attacking file {:?} with wordlist {:?}..",
        cli.file, cli.wordlist
    );

    let options = CrackOptions {
        threads: cli.threads,
        chunk_size: cli.chunk_size,
    };
    let summary = crack(
        &cli.file,
        &output,
        &cli.wordlist,
        &options,
        progress_fn.as_deref(),
        cancel_flag.clone(),
    )?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if cli.json {
        let text = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
        println!("{text}");
        return Ok(summary.password.is_some());
    }

    if cancel_flag.load(Ordering::SeqCst) && summary.password.is_none() {
        eprintln!("Error: Aborted.");
        return Ok(false);
    }

    match summary {
        RunSummary {
            password: Some(password),
            attempts,
            ..
        } => {
            info!("Successfully cracked file with password: {password}");
            info!("Tried {attempts} passwords");
            info!("Your file has been written to: {}", output.display());
            println!("{password}");
            Ok(true)
        }
        RunSummary {
            has_error: true, ..
        } => {
            eprintln!("Error: Terminating due to previous exception..");
            Ok(false)
        }
        _ => {
            eprintln!("Error: Failed to crack file, ran out of passwords.");
            Ok(false)
        }
    }
}

/// `photo.jpg` -> `photo.jpg.out`
fn append_out_extension(file: &std::path::Path) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(".out");
    PathBuf::from(name)
}
