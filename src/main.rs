//! todo CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use todo::cli::commands;
use todo::cli::{Cli, Commands, NoteArgs};
use todo::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.silent {
        todo::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.dry_run {
        todo::DRY_RUN.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    // Effective JSON mode: --json OR non-TTY stdout. The shell is always interactive.
    let json = !matches!(cli.command, Commands::Shell { .. })
        && (cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout()));

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let args = NoteArgs::from(cli);

    match &cli.command {
        Commands::Init { force } => commands::init::execute(&args, *force, json),
        Commands::Version => commands::version::execute(json),

        // Items
        Commands::Show { search } => commands::items::show(&args, search.as_deref(), json),
        Commands::Add { name } => commands::items::add(&args, name.as_deref(), json),
        Commands::Check { item } => commands::items::check(&args, item, json),
        Commands::Edit { item, name } => commands::items::edit(&args, item, name, json),
        Commands::Delete { item } => commands::items::delete(&args, item, json),
        Commands::Move { item, to } => commands::items::move_item(&args, item, *to, json),
        Commands::Dupes => commands::items::dupes(&args, json),
        Commands::Search { query } => commands::items::search(&args, query, json),

        // Note
        Commands::Title { title } => commands::note::execute(&args, title, json),
        Commands::History { limit } => commands::history::execute(&args, *limit, json),

        Commands::Shell {
            auto_save,
            debounce_ms,
        } => commands::shell::execute(&args, *auto_save, *debounce_ms),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
