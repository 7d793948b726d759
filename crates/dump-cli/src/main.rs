//! The Dump CLI - capture from the terminal and browse organized notes
//!
//! Quick capture with minimal friction, plus read access to the folders
//! the server sorted your notes into.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::resolve_note_content;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::counts::run_counts;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::onboard::run_onboard;
use crate::commands::show::run_show;
use crate::commands::subcategory::run_sub_category;
use crate::commands::upload::{run_capture, run_upload};
use crate::commands::usage::run_usage;
use crate::error::CliError;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "dump=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Some(Commands::Config { command }) => run_config(command, profile)?,
        Some(Commands::Auth { command }) => run_auth(command, profile)?,
        Some(Commands::Counts { json }) => run_counts(json, profile).await?,
        Some(Commands::List(args)) => run_list(&args, profile).await?,
        Some(Commands::Show { id, json }) => run_show(&id, json, profile).await?,
        Some(Commands::Edit { id, title, content }) => {
            run_edit(&id, title.as_deref(), content.as_deref(), profile).await?;
        }
        Some(Commands::SubCategory { command }) => run_sub_category(command, profile).await?,
        Some(Commands::Onboard(args)) => run_onboard(&args, profile).await?,
        Some(Commands::Upload { path, kind }) => run_upload(&path, kind, profile).await?,
        Some(Commands::Usage { json }) => run_usage(json, profile).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            // Quick capture mode: dump "my thought"
            if cli.note.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                let content = resolve_note_content(&cli.note)?;
                run_capture(content, profile).await?;
            }
        }
    }

    Ok(())
}
