use super::{open_session, print_json, GlobalArgs};
use crate::{
    db::migrations::SUPPORTED_DB_VERSION,
    libs::messages::Message,
    msg_print, msg_success, msg_warning, VERSION,
};
use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::cmp::Ordering;

#[derive(Debug, Args)]
pub struct VersionArgs {
    /// Apply pending schema migrations (administrators only)
    #[arg(long)]
    upgrade: bool,
}

pub fn cmd(args: VersionArgs, global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;

    if args.upgrade {
        let version = session.upgrade()?;
        msg_success!(Message::DatabaseUpgraded(version));
    }

    let store = session.get_db_version()?;
    let check = session.version_check()?;

    if global.json {
        return print_json(&json!({
            "library": VERSION,
            "database": store,
            "supported": SUPPORTED_DB_VERSION,
            "check": check,
        }));
    }

    msg_print!(Message::LibraryVersion(VERSION.to_string()));
    msg_print!(Message::DatabaseVersion(store));
    match check.cmp(&0) {
        Ordering::Equal => msg_print!(Message::DatabaseUpToDate),
        Ordering::Greater => msg_warning!(Message::DatabaseNeedsUpdate(store, SUPPORTED_DB_VERSION)),
        Ordering::Less => msg_warning!(Message::DatabaseNewerThanLibrary(store, SUPPORTED_DB_VERSION)),
    }
    Ok(())
}
