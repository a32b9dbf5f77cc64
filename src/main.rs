use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use babytrack::cli::args::{Cli, Commands};
use babytrack::cli::commands::{self, Context};
use babytrack::config::{ColorSetting, Config};
use babytrack::tui;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Completions need no data directory
    if let Commands::Completions { shell, install } = cli.command {
        print_output(&commands::completions(shell, install)?);
        return Ok(());
    }

    let paths = commands::resolve_paths(cli.home)?;
    let config = Config::load_from_path(&paths.config_file)?;

    init_logging(&config.general.log_level);
    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    let format = cli.output.unwrap_or(config.general.default_output);
    let ctx = Context::open(paths, config).context("cannot open data directory")?;

    let output = match cli.command {
        Commands::Nursing(args) => commands::nursing(&ctx, args.command, format)?,
        Commands::Sleep(args) => commands::sleep(&ctx, args.command, format)?,
        Commands::Log(args) => commands::log(&ctx, args.command, format)?,
        Commands::History(args) => commands::history(&ctx, &args, format)?,
        Commands::Delete(args) => commands::delete(&ctx, &args, format)?,
        Commands::Summary => commands::summary(&ctx, format)?,
        Commands::Report(args) => commands::report(&ctx, &args, format)?,
        Commands::Tui => {
            tui::run(&ctx)?;
            String::new()
        }
        Commands::Completions { .. } => String::new(),
    };

    print_output(&output);
    Ok(())
}

fn print_output(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}
