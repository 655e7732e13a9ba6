//! Command-line interface: a thin client over the library.
//!
//! Connection defaults come from [`Config::load`]; every subcommand opens
//! its own [`Session`] and prints either console tables or, with `--json`,
//! the serde representation of the result.

pub mod clock;
pub mod config;
pub mod setup;
pub mod show;
pub mod types;
pub mod user;
pub mod version;

use crate::libs::{config::Config, messages::Message, session::Session};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Password};
use serde::Serialize;

/// Flags shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct GlobalArgs {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
    /// Prompt for the connection password
    #[arg(short = 'W', long = "password", global = true)]
    pub ask_password: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create the store and its administrator")]
    Setup(setup::SetupArgs),
    #[command(about = "Show or change connection settings")]
    Config(config::ConfigArgs),
    #[command(about = "Show library and store versions")]
    Version(version::VersionArgs),
    #[command(about = "Manage users")]
    User(user::UserArgs),
    #[command(about = "Manage task types")]
    Type(types::TypeArgs),
    #[command(about = "Clock in to a task type")]
    Clockin(clock::ClockinArgs),
    #[command(about = "Clock out of an item and everything below it")]
    Clockout(clock::ClockoutArgs),
    #[command(about = "Show the active task item")]
    Active,
    #[command(about = "Show every open item of every user")]
    Tree,
    #[command(about = "List task items")]
    Items(show::ItemsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        let global = cli.global;
        match cli.command {
            Commands::Setup(args) => setup::cmd(args),
            Commands::Config(args) => config::cmd(args, &global),
            Commands::Version(args) => version::cmd(args, &global),
            Commands::User(args) => user::cmd(args, &global),
            Commands::Type(args) => types::cmd(args, &global),
            Commands::Clockin(args) => clock::clockin(args, &global),
            Commands::Clockout(args) => clock::clockout(args, &global),
            Commands::Active => show::active(&global),
            Commands::Tree => show::tree(&global),
            Commands::Items(args) => show::items(args, &global),
        }
    }
}

/// Opens a session with the configured connection parameters.
pub fn open_session(global: &GlobalArgs) -> Result<Session> {
    let mut params = Config::load()?.connection;
    if global.ask_password {
        params.password = Some(prompt_password(Message::PromptPassword, false)?);
    }
    Ok(Session::open(&params)?)
}

pub fn prompt_password(prompt: Message, confirm: bool) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Password::with_theme(&theme).with_prompt(prompt.to_string());
    if confirm {
        input = input.with_confirmation(
            Message::PromptConfirmPassword.to_string(),
            Message::PasswordMismatch.to_string(),
        );
    }
    Ok(input.interact()?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
