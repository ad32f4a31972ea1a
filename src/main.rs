mod commands;
mod core;
mod devserver;
mod manifest;
mod release;
mod ui;

use clap::{Parser, Subcommand};
use core::error::{ShipError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sync manifest versions, push, and cut release tags
#[derive(Parser)]
#[command(name = "tagship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Project root (default: current directory)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Print debug diagnostics to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Release
  // ============================================================================
  /// Publish a new version (or rebuild the current one with --fix)
  Release {
    /// Version to release, e.g. 1.4.2 (default: bump the patch number)
    #[arg(id = "target", value_name = "VERSION", conflicts_with = "fix")]
    target: Option<String>,
    /// Recreate the current version's tag to trigger a rebuild
    #[arg(long)]
    fix: bool,
  },

  /// Stage, commit if needed, and push; then offer to tag
  Push {
    /// Tag the current version without asking
    #[arg(long, conflicts_with = "no_tag")]
    tag: bool,
    /// Never tag
    #[arg(long)]
    no_tag: bool,
  },

  // ============================================================================
  // Versions
  // ============================================================================
  /// Write a version into every manifest (no git)
  Sync {
    /// Version to write (default: the primary manifest's version)
    #[arg(id = "target", value_name = "VERSION")]
    target: Option<String>,
    /// Output the sync report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show the version each manifest holds
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Setup & Tools
  // ============================================================================
  /// Run the dev server with port cleanup before and after
  Dev {
    /// Port to clean (default: [dev].port from ship.toml)
    #[arg(long)]
    port: Option<u16>,
  },

  /// Open the graphical release front-end
  Gui,

  /// Write a default ship.toml
  Init {
    /// Overwrite an existing ship.toml
    #[arg(long)]
    force: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// RUST_LOG wins; otherwise warnings only, or tagship debug output with -v
fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("warn,tagship=debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(ShipError::from(e).context("Failed to get current directory")),
    },
  };

  // init runs before a valid ship.toml exists
  if let Commands::Init { force } = cli.command {
    if let Err(err) = commands::run_init(&root, force) {
      handle_error(err);
    }
    return;
  }

  let ctx = match core::context::ProjectContext::build(&root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    // Release
    Commands::Release { target, fix } => commands::run_release(&ctx, target, fix),
    Commands::Push { tag, no_tag } => {
      let choice = match (tag, no_tag) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
      };
      commands::run_push(&ctx, choice)
    }

    // Versions
    Commands::Sync { target, json } => commands::run_sync(&ctx, target, json),
    Commands::Status { json } => commands::run_status(&ctx, json),

    // Setup & Tools
    Commands::Dev { port } => commands::run_dev(&ctx, port),
    Commands::Gui => commands::run_gui(&ctx),
    Commands::Init { .. } => Ok(()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  tracing::debug!(error = ?err, "command failed");
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
