use super::{print_json, GlobalArgs};
use crate::{
    libs::{
        config::{Config, StoreKind},
        messages::Message,
    },
    msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Store kind
    #[arg(long)]
    kind: Option<StoreKind>,
    /// Host this client connects from
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(short, long)]
    user: Option<String>,
    /// Database file
    #[arg(short, long)]
    database: Option<String>,
}

/// Updates the saved connection settings, or prints them when no option is given.
pub fn cmd(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = Config::read()?;

    let unchanged = args.kind.is_none()
        && args.host.is_none()
        && args.port.is_none()
        && args.user.is_none()
        && args.database.is_none();
    if unchanged {
        if global.json {
            return print_json(&config);
        }
        let connection = &config.connection;
        msg_print!(format!("kind:     {}", connection.kind));
        msg_print!(format!("host:     {}", connection.host));
        msg_print!(format!("port:     {}", connection.port));
        msg_print!(format!("user:     {}", connection.user));
        msg_print!(format!("database: {}", connection.database_path()?.display()));
        return Ok(());
    }

    if let Some(kind) = args.kind {
        config.connection.kind = kind;
    }
    if let Some(host) = args.host {
        config.connection.host = host;
    }
    if let Some(port) = args.port {
        config.connection.port = port;
    }
    if let Some(user) = args.user {
        config.connection.user = user;
    }
    if let Some(database) = args.database {
        config.connection.database = Some(database);
    }

    config.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
