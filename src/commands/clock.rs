use super::{open_session, print_json, GlobalArgs};
use crate::{libs::messages::Message, msg_bail_anyhow, msg_success};
use anyhow::Result;
use clap::Args;
use serde_json::json;

#[derive(Debug, Args)]
pub struct ClockinArgs {
    /// Task type to clock in to
    type_id: u32,
}

#[derive(Debug, Args)]
pub struct ClockoutArgs {
    /// Item to clock out of (defaults to the active item)
    item: Option<u32>,
}

pub fn clockin(args: ClockinArgs, global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;
    let id = session.clockin(args.type_id)?;

    if global.json {
        return print_json(&id);
    }
    msg_success!(Message::ClockedIn(id));
    Ok(())
}

pub fn clockout(args: ClockoutArgs, global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;

    let item = match args.item {
        Some(item) => item,
        None => match session.get_active_task()? {
            Some(active) => active.id,
            None => msg_bail_anyhow!(Message::NotOnClock),
        },
    };
    let closed = session.clockout(item)?;

    if global.json {
        return print_json(&json!({ "item": item, "closed": closed }));
    }
    msg_success!(Message::ClockedOut(item));
    if closed > 1 {
        msg_success!(Message::CascadeClosed(item, closed));
    }
    Ok(())
}
