//! Read-only views of task items.

use super::{open_session, print_json, GlobalArgs};
use crate::{
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;
use clap::Args;
use std::collections::BTreeMap;

#[derive(Debug, Args)]
pub struct ItemsArgs {
    /// Only items of this user
    #[arg(short, long)]
    user: Option<String>,
    /// Only items still on the clock (of `--user`, or of the current user)
    #[arg(long)]
    onclock: bool,
    /// Only items started under this item
    #[arg(long, conflicts_with_all = ["user", "onclock", "last"])]
    children: Option<u32>,
    /// Print the id of the latest item (of `--user`, or of the current user)
    #[arg(long, conflicts_with = "onclock")]
    last: bool,
}

pub fn active(global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;
    let active = session.get_active_task()?;

    if global.json {
        return print_json(&active);
    }
    match active {
        Some(item) => {
            msg_print!(Message::ActiveTaskHeader, true);
            View::items(&BTreeMap::from([(item.id, item)]))
        }
        None => {
            msg_print!(Message::NotOnClock);
            Ok(())
        }
    }
}

pub fn tree(global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;
    let tree = session.get_tree()?;

    if global.json {
        return print_json(&tree);
    }
    if tree.is_empty() {
        msg_print!(Message::NoOpenItems);
        return Ok(());
    }
    msg_print!(Message::TreeHeader, true);
    View::tree(&tree)
}

pub fn items(args: ItemsArgs, global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;

    if args.last {
        let user = match args.user {
            Some(user) => user,
            None => session.get_user()?.to_string(),
        };
        let last = session.get_last_item(&user)?;
        if global.json {
            return print_json(&last);
        }
        match last {
            Some(id) => msg_print!(Message::LastItem(id)),
            None => msg_print!(Message::NoLastItem(user)),
        }
        return Ok(());
    }

    let items = match (args.children, args.user, args.onclock) {
        (Some(parent), _, _) => session.get_child_items(parent)?,
        (None, Some(user), true) => session.get_items_byuser_onclock(&user)?,
        (None, Some(user), false) => session.get_items_byuser(&user)?,
        (None, None, true) => {
            let user = session.get_user()?.to_string();
            session.get_items_byuser_onclock(&user)?
        }
        (None, None, false) => session.get_items()?,
    };

    if global.json {
        return print_json(&items);
    }
    if items.is_empty() {
        msg_print!(Message::NoItems);
        return Ok(());
    }
    msg_print!(Message::ItemsHeader, true);
    View::items(&items)
}
