//! Main entry point for the Prok terminal client.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use client::Route;
use dotenv::dotenv;
use shared::config::client::Config;
use std::path::PathBuf;

mod commands;
mod logging;
mod views;

use commands::{
    App,
    auth::{LoginArgs, SignupArgs},
    feed::FeedArgs,
    post::PostCommands,
    profile::ProfileCommands,
};

/// Prok CLI
#[derive(Parser)]
#[command(name = "prok", version)]
#[command(about = "Command-line client for the Prok professional network", long_about = None)]
struct Cli {
    /// Path to a configuration file (YAML, JSON or TOML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overriding the configuration (e.g. http://localhost:5001)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Prok CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),
    /// Create an account
    Signup(SignupArgs),
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// View and edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Show the feed
    Feed(FeedArgs),
    /// Create posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Job board
    Jobs,
    /// Messages
    Messages,
    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell to generate the completion script for
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
    /// Generate a configuration file with the defaults
    Config {
        /// Format of the configuration file (yaml, json or toml)
        #[arg(long, short, default_value = "yaml")]
        format: String,

        /// Where to write it; defaults to prok.<format> in the working directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            Ok(())
        }
        Commands::Config { format, output } => {
            commands::config::generate_config(&format, output.as_deref())?;
            Ok(())
        }
        command => {
            let config = Config::load_config(cli.config.as_deref(), cli.api_url.as_deref())
                .context("failed to load configuration")?;
            logging::initialize_tracing(&config);
            let app = App::open(config)?;
            run(&app, command).await
        }
    }
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => commands::auth::login(app, args).await,
        Commands::Signup(args) => commands::auth::signup(app, args).await,
        Commands::Logout => {
            commands::auth::logout(app);
            Ok(())
        }
        Commands::Whoami => commands::auth::whoami(app),
        Commands::Profile { command } => commands::profile::run(app, command).await,
        Commands::Feed(args) => commands::feed::run(app, args).await,
        Commands::Post { command } => commands::post::run(app, command).await,
        Commands::Jobs => placeholder(app, Route::Jobs),
        Commands::Messages => placeholder(app, Route::Messages),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn placeholder(app: &App, route: Route) -> Result<()> {
    app.require(route)?;
    print!("{}", views::placeholder::render_placeholder(route));
    Ok(())
}
