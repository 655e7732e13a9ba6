use super::{open_session, print_json, GlobalArgs};
use crate::{
    db::task_types::ROOT_TYPE,
    libs::{messages::Message, view::View},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TypeArgs {
    #[command(subcommand)]
    command: TypeCommand,
}

#[derive(Debug, Subcommand)]
enum TypeCommand {
    /// Create a task type
    Create {
        /// Display name
        name: String,
        /// Parent type id (0 for a top-level type)
        #[arg(short, long, default_value_t = ROOT_TYPE)]
        parent: u32,
    },
    /// Deactivate a task type
    Delete { id: u32 },
    /// List active task types
    List,
    /// List the direct children of a type
    Children {
        #[arg(default_value_t = ROOT_TYPE)]
        parent: u32,
    },
    /// Show one task type
    Show { id: u32 },
}

pub fn cmd(args: TypeArgs, global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;

    let types = match args.command {
        TypeCommand::Create { name, parent } => {
            let id = session.create_task(parent, &name)?;
            if global.json {
                return print_json(&id);
            }
            msg_success!(Message::TypeCreated(id, name));
            return Ok(());
        }
        TypeCommand::Delete { id } => {
            session.delete_task(id)?;
            msg_success!(Message::TypeDeactivated(id));
            return Ok(());
        }
        TypeCommand::List => session.get_types()?,
        TypeCommand::Children { parent } => session.get_child_types(parent)?,
        TypeCommand::Show { id } => {
            let task_type = session.get_type_byid(id)?;
            [(task_type.id, task_type)].into_iter().collect()
        }
    };

    if global.json {
        return print_json(&types);
    }
    if types.is_empty() {
        msg_print!(Message::NoTypes);
        return Ok(());
    }
    msg_print!(Message::TypesHeader, true);
    View::types(&types)
}
