//! Console tables for users, task types and task items.

use crate::db::task_items::{TaskItem, TreeEntry};
use crate::db::task_types::TaskType;
use crate::db::users::User;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use prettytable::{row, Table};
use std::collections::BTreeMap;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct View {}

impl View {
    pub fn users(users: &BTreeMap<String, User>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "HOST", "ADMIN"]);
        for user in users.values() {
            let admin = if user.admin { "yes" } else { "" };
            table.add_row(row![user.id, user.host, admin]);
        }
        table.printstd();

        Ok(())
    }

    pub fn types(types: &BTreeMap<u32, TaskType>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "PARENT", "NAME"]);
        for task_type in types.values() {
            let parent = if task_type.is_root() {
                "-".to_string()
            } else {
                task_type.parent_id.to_string()
            };
            table.add_row(row![task_type.id, parent, task_type.display_name]);
        }
        table.printstd();

        Ok(())
    }

    pub fn items(items: &BTreeMap<u32, TaskItem>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "USER", "TYPE", "PARENT", "START", "END"]);
        for item in items.values() {
            let end = item.end_time.as_ref().map(Self::time).unwrap_or_else(|| "on clock".to_string());
            table.add_row(row![
                item.id,
                item.user_id,
                item.type_id,
                Self::optional(item.parent_id),
                Self::time(&item.start_time),
                end
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Open items, indented under the item they were started in.
    pub fn tree(tree: &BTreeMap<u32, TreeEntry>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "USER", "TASK", "START"]);
        for entry in tree.values() {
            let depth = Self::depth(tree, entry);
            table.add_row(row![
                entry.id,
                entry.user_id,
                format!("{}{}", "  ".repeat(depth), entry.type_name),
                Self::time(&entry.start_time)
            ]);
        }
        table.printstd();

        Ok(())
    }

    fn depth(tree: &BTreeMap<u32, TreeEntry>, entry: &TreeEntry) -> usize {
        let mut depth = 0;
        let mut parent = entry.parent_id;
        while let Some(id) = parent {
            match tree.get(&id) {
                Some(p) if depth < tree.len() => {
                    depth += 1;
                    parent = p.parent_id;
                }
                _ => break,
            }
        }
        depth
    }

    fn time(time: &DateTime<Utc>) -> String {
        time.with_timezone(&Local).format(TIME_FORMAT).to_string()
    }

    fn optional(id: Option<u32>) -> String {
        id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
    }
}
