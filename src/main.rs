// Vishwaguru: run, translate or explore scripts from the command line

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};

use vishwaguru::samples::{self, SAMPLES};
use vishwaguru::ui::App;

/// Run a Vishwaguru script and print what it printed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Script to run. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// Print the translated listing instead of running the script.
    #[arg(long)]
    emit: bool,

    /// Open the terminal playground.
    #[arg(long)]
    tui: bool,

    /// Use the N-th built-in sample as the source (see --list-samples).
    #[arg(long, value_name = "N", conflicts_with = "file")]
    sample: Option<usize>,

    /// List the built-in samples and exit.
    #[arg(long)]
    list_samples: bool,

    /// Log pipeline stages to stderr. Repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_samples {
        for (i, sample) in SAMPLES.iter().enumerate() {
            println!("{:2}. {:<22} {}", i + 1, sample.title, sample.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if cli.tui {
        let app = match (&cli.file, cli.sample) {
            (Some(path), _) => App::new(path.display().to_string(), read_file(path)?),
            (None, Some(n)) => App::with_sample(sample_index(n)?),
            (None, None) => App::with_sample(0),
        };
        run_playground(app)?;
        return Ok(ExitCode::SUCCESS);
    }

    let source = match (&cli.file, cli.sample) {
        (Some(path), _) => read_file(path)?,
        (None, Some(n)) => SAMPLES[sample_index(n)?].source.to_string(),
        (None, None) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Reading stdin")?;
            buffer
        }
    };

    if cli.emit {
        return Ok(match vishwaguru::compile(&source) {
            Ok(script) => {
                print!("{script}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                println!("{}", err.diagnostics());
                ExitCode::FAILURE
            }
        });
    }

    match vishwaguru::compile(&source) {
        Ok(script) => {
            let log = vishwaguru::execute(&script);
            if !log.is_empty() {
                println!("{log}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", err.diagnostics());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.format_timestamp(None).init();
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
}

fn sample_index(number: usize) -> Result<usize> {
    if samples::by_number(number).is_none() {
        bail!("No sample {number}; choose 1 to {}", SAMPLES.len());
    }
    Ok(number - 1)
}

fn run_playground(mut app: App) -> Result<()> {
    info!("starting playground");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Playground event loop")
}
