//! Shop CLI - Command line shell for the storefront client.
//!
//! Commands:
//! - `shop routes` - Print the route table
//! - `shop navigate` - Run the guarded router
//! - `shop call` - Send a raw API call through the client pipeline
//! - `shop login` - Sign in and cache the user
//! - `shop logout` - Sign out and clear the cache
//! - `shop whoami` - Show the cached user and backend session

mod commands;
mod config;
mod context;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{CallArgs, LoginArgs, NavigateArgs};

/// Shop CLI - Drive the storefront client from a terminal
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route table
    Routes,

    /// Navigate to a path through the guard
    Navigate(NavigateArgs),

    /// Send a raw API call
    Call(CallArgs),

    /// Sign in by nickname or email
    Login(LoginArgs),

    /// Sign out and clear the cached user
    Logout,

    /// Show the cached user and backend session status
    Whoami,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Routes => commands::routes::run(&ctx),
        Commands::Navigate(args) => commands::navigate::run(args, &ctx),
        Commands::Call(args) => commands::call::run(args, &ctx).await,
        Commands::Login(args) => commands::session::login(args, &ctx).await,
        Commands::Logout => commands::session::logout(&ctx).await,
        Commands::Whoami => commands::session::whoami(&ctx).await,
    };

    if let Err(e) = ctx.finish(result) {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
