use super::{open_session, print_json, prompt_password, GlobalArgs};
use crate::{
    db::users::ANY_HOST,
    libs::{messages::Message, view::View},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Create a user
    Create {
        id: String,
        /// Host pattern the user may connect from
        #[arg(long, default_value = ANY_HOST)]
        host: String,
        /// Create the user without a password
        #[arg(long)]
        no_password: bool,
    },
    /// Deactivate a user
    Delete { id: String },
    /// Give a user administrator rights
    Grant {
        id: String,
        #[arg(long, default_value = ANY_HOST)]
        host: String,
    },
    /// Take administrator rights away from a user
    Revoke {
        id: String,
        #[arg(long, default_value = ANY_HOST)]
        host: String,
    },
    /// List active users
    List,
    /// Show one user
    Show { id: String },
}

pub fn cmd(args: UserArgs, global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global)?;

    match args.command {
        UserCommand::Create { id, host, no_password } => {
            let password = if no_password {
                None
            } else {
                Some(prompt_password(Message::PromptNewUserPassword, true)?)
            };
            session.create_user(&id, &host, password.as_deref())?;
            msg_success!(Message::UserCreated(id));
        }
        UserCommand::Delete { id } => {
            session.delete_user(&id)?;
            msg_success!(Message::UserDeactivated(id));
        }
        UserCommand::Grant { id, host } => {
            session.grant_admin(&id, &host)?;
            msg_success!(Message::AdminGranted(id));
        }
        UserCommand::Revoke { id, host } => {
            session.revoke_admin(&id, &host)?;
            msg_success!(Message::AdminRevoked(id));
        }
        UserCommand::List => {
            let users = session.get_users()?;
            if global.json {
                return print_json(&users);
            }
            if users.is_empty() {
                msg_print!(Message::NoUsers);
                return Ok(());
            }
            msg_print!(Message::UsersHeader, true);
            View::users(&users)?;
        }
        UserCommand::Show { id } => {
            let user = session.get_user_byid(&id)?;
            if global.json {
                return print_json(&user);
            }
            View::users(&[(user.id.clone(), user)].into_iter().collect())?;
        }
    }

    Ok(())
}
