use clap::builder::styling::{AnsiColor, Styles};
use clap::{ArgAction, ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use flowport::commands;
use flowport::commands::categories::CategoriesArgs;
use flowport::commands::check::CheckArgs;
use flowport::commands::classify::ClassifyArgs;
use flowport::commands::import::ImportArgs;
use flowport::commands::validate::ValidateArgs;

#[derive(Parser)]
#[command(name = "flowport")]
#[command(about = "Batch-import workflow definitions into n8n")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Human-friendly output with colors and formatting
    #[arg(long, global = true, conflicts_with = "compact")]
    pretty: bool,

    /// Compact output without colors (overrides TTY detection)
    #[arg(long, global = true, conflicts_with = "pretty")]
    compact: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every workflow file under a directory
    Import(ImportArgs),

    /// Check that the engine CLI is installed and answers
    Check(CheckArgs),

    /// Validate workflow files without importing them
    Validate(ValidateArgs),

    /// List category store entries
    Categories(CategoriesArgs),

    /// Show the category assigned to workflow filenames
    Classify(ClassifyArgs),
}

/// Help output styling.
const HELP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().bold())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::Cyan.on_default().bold())
    .placeholder(AnsiColor::Cyan.on_default());

/// Determine color choice for help output.
/// Checks args, config, and NO_COLOR before parsing since --help may exit early.
fn help_color_choice() -> ColorChoice {
    if std::env::var("NO_COLOR").is_ok() {
        return ColorChoice::Never;
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--compact") {
        return ColorChoice::Never;
    }
    if args.iter().any(|a| a == "--pretty") {
        return ColorChoice::Always;
    }

    let config = flowport::config::FlowportConfig::load(Path::new("."));
    match config.pretty.colors {
        Some(flowport::output::ColorMode::Always) => ColorChoice::Always,
        Some(flowport::output::ColorMode::Never) => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: only changes the signal disposition back to the POSIX default.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

/// Logs go to stderr. `FLOWPORT_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FLOWPORT_LOG").unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    reset_sigpipe();

    let matches = Cli::command()
        .styles(HELP_STYLES)
        .color(help_color_choice())
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(cli.verbose);

    let config = flowport::config::FlowportConfig::load(Path::new("."));
    let format =
        flowport::output::OutputFormat::from_cli(cli.json, cli.pretty, cli.compact, &config.pretty);

    let exit_code = match cli.command {
        Commands::Import(args) => commands::import::run(args, format),
        Commands::Check(args) => commands::check::run(args, format),
        Commands::Validate(args) => commands::validate::run(args, format),
        Commands::Categories(args) => commands::categories::run(args, format),
        Commands::Classify(args) => commands::classify::run(args, format),
    };

    std::process::exit(exit_code);
}
