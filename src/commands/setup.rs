//! First-run setup: creates the store and registers its administrator.

use super::prompt_password;
use crate::{
    libs::{config::Config, messages::Message, session},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Database file to create (defaults to the data directory)
    #[arg(short, long)]
    database: Option<String>,
    /// Name of the administrator account
    #[arg(short, long)]
    user: Option<String>,
    /// Create the administrator without a password
    #[arg(long)]
    no_password: bool,
}

/// Creates the store, then saves the connection settings so later commands
/// connect as the new administrator.
pub fn cmd(args: SetupArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(database) = args.database {
        config.connection.database = Some(database);
    }
    if let Some(user) = args.user {
        config.connection.user = user;
    }
    if !args.no_password && config.connection.password.is_none() {
        config.connection.password = Some(prompt_password(Message::PromptPassword, true)?);
    }

    session::setup(&config.connection)?;
    msg_success!(Message::StoreCreated(config.connection.database_path()?.display().to_string()));
    msg_success!(Message::BootstrapAdminCreated(config.connection.user.clone()));

    config.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
