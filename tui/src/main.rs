//! Token Masq Entry Point
//!
//! Launches the terminal surface, or converts a single input headlessly.
//!
//! Usage:
//!   token-masq [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>     Configuration file
//!   -e, --effect <EFFECT>   Result effect (scramble or reveal)
//!       --once <INPUT>      Convert INPUT, print the result and exit
//!       --json              Print headless results as JSON
//!       --log-file <FILE>   Log file for the interactive surface

use std::io::{self, IsTerminal, Read};
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use masq_core::{load_config_from_path, Cl100kAdapter, ConfigSource, Effect, MasqConfig};
use masq_tui::logging;
use masq_tui::oneshot::{run_once, trim_piped};
use masq_tui::App;

/// Token Masq - text to cl100k_base tokens and back
#[derive(Parser, Debug)]
#[command(name = "token-masq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short = 'c', long, env = "TOKEN_MASQ_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Result effect (scramble or reveal)
    #[arg(short = 'e', long, value_name = "EFFECT")]
    effect: Option<Effect>,

    /// Convert INPUT, print the result and exit
    #[arg(long, value_name = "INPUT")]
    once: Option<String>,

    /// Print headless results as JSON
    #[arg(long)]
    json: bool,

    /// Log file for the interactive surface
    #[arg(long, env = "TOKEN_MASQ_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let interactive = cli.once.is_none() && io::stdin().is_terminal();
    let log_path = logging::init(interactive, cli.log_file.as_deref());

    let mut config = load_config_from_path(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(effect) = cli.effect {
        config.effect = effect;
        config.set_source(ConfigSource::Cli);
    }

    tracing::debug!(
        log_file = ?log_path,
        source = ?config.source(),
        effect = %config.effect,
        path = ?config.config_file_path,
        "Configuration loaded"
    );

    let tokenizer = Cl100kAdapter::new()?;

    // Headless paths
    if let Some(input) = cli.once.as_deref() {
        return headless(tokenizer, input, cli.json);
    }
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return headless(tokenizer, trim_piped(&input), cli.json);
    }

    if !io::stdout().is_terminal() {
        eprintln!("Error: token-masq needs a terminal (TTY) for its interactive surface");
        eprintln!();
        eprintln!("For scripted use:");
        eprintln!("  token-masq --once \"hello world\"");
        eprintln!("  echo \"15339 1917\" | token-masq");
        return Ok(ExitCode::FAILURE);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, config, tokenizer).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result.map(|()| ExitCode::SUCCESS)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: MasqConfig,
    tokenizer: Cl100kAdapter,
) -> anyhow::Result<()> {
    let mut app = App::new(config, tokenizer);
    app.run(terminal).await?;
    Ok(())
}

fn headless(tokenizer: Cl100kAdapter, input: &str, json: bool) -> anyhow::Result<ExitCode> {
    let ok = run_once(
        tokenizer,
        input,
        json,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
