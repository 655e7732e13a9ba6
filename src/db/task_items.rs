//! Task items: timestamped work on a task type by one user.
//!
//! An item without `end_time` is on the clock. `parent_id` links an item to
//! the item that was active when it was clocked in, so the open items of a
//! user form a chain from an outermost item down to the active leaf.

use crate::db::query::{self, escape};
use crate::db::store::{Entity, Filter, Record, Store};
use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SELECT_OPEN_CHILD_IDS: &str = "SELECT id FROM task_items WHERE parent_id = ?1 AND end_time IS NULL ORDER BY id";
const SELECT_LAST_ID_BY_USER: &str = "SELECT MAX(id) FROM task_items WHERE user_id = ?1";
const SELECT_TREE: &str = "SELECT i.id, i.type_id, t.display_name AS type_name, i.user_id, i.start_time, i.parent_id
    FROM task_items i
    JOIN task_types t ON t.id = i.type_id
    WHERE i.end_time IS NULL
    ORDER BY i.id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: u32,
    pub user_id: String,
    pub type_id: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub parent_id: Option<u32>,
}

impl TaskItem {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

impl Record for TaskItem {
    const ENTITY: Entity = Entity::TaskItem;
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

/// An open item annotated with its type name and owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub id: u32,
    pub type_id: u32,
    pub type_name: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub parent_id: Option<u32>,
}

/// Storage form of a timestamp: RFC 3339 UTC with fixed microsecond precision,
/// so that text order matches time order.
pub fn db_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub struct TaskItems<'a> {
    store: Store<'a>,
}

impl<'a> TaskItems<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { store: Store::new(conn) }
    }

    pub fn insert(&self, user_id: &str, type_id: u32, parent_id: Option<u32>, start: &DateTime<Utc>) -> Result<u32> {
        let parent = match parent_id {
            Some(id) => SqlValue::Integer(i64::from(id)),
            None => SqlValue::Null,
        };
        let id = self.store.create(
            Entity::TaskItem,
            &[
                ("user_id", SqlValue::Text(user_id.to_string())),
                ("type_id", SqlValue::Integer(i64::from(type_id))),
                ("start_time", SqlValue::Text(db_time(start))),
                ("end_time", SqlValue::Null),
                ("parent_id", parent),
            ],
        )?;
        u32::try_from(id).map_err(|_| PattsError::Unexpected(format!("task item id {} out of range", id)))
    }

    pub fn get(&self, id: u32) -> Result<TaskItem> {
        self.store.find_by_id::<TaskItem>(id).map_err(|e| match e {
            PattsError::NotFound(_) => PattsError::NotFound(Message::ItemNotFound(id).to_string()),
            other => other,
        })
    }

    pub fn list(&self, filter: &Filter) -> Result<BTreeMap<u32, TaskItem>> {
        self.store.find_all(filter)
    }

    pub fn by_user(&self, user_id: &str) -> Result<BTreeMap<u32, TaskItem>> {
        self.list(&Filter::eq("user_id", user_id))
    }

    pub fn on_clock_by_user(&self, user_id: &str) -> Result<BTreeMap<u32, TaskItem>> {
        self.list(&Filter::eq("user_id", user_id).and(Filter::is_null("end_time")))
    }

    /// Items started under `id`, open or closed.
    pub fn children(&self, id: u32) -> Result<BTreeMap<u32, TaskItem>> {
        self.list(&Filter::eq("parent_id", id))
    }

    pub fn open_child_ids(&self, id: u32) -> Result<Vec<u32>> {
        let mut stmt = self.store.conn().prepare(SELECT_OPEN_CHILD_IDS)?;
        let ids = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<u32>>>()?;
        Ok(ids)
    }

    /// Sets `end_time` on `id` if it is still open; returns whether it was.
    pub fn close(&self, id: u32, end: &DateTime<Utc>) -> Result<bool> {
        let filter = Filter::eq("id", id).and(Filter::is_null("end_time"));
        let changed = self
            .store
            .update(Entity::TaskItem, &[("end_time", SqlValue::Text(db_time(end)))], &filter)?;
        Ok(changed > 0)
    }

    pub fn last_id_by_user(&self, user_id: &str) -> Result<Option<u32>> {
        let id: Option<u32> = self
            .store
            .conn()
            .query_row(SELECT_LAST_ID_BY_USER, params![user_id], |row| row.get(0))?;
        Ok(id)
    }

    /// The most recently opened item of `user_id` that has no open child.
    pub fn active_leaf(&self, user_id: &str) -> Result<Option<TaskItem>> {
        let sql = format!(
            "SELECT * FROM task_items i
            WHERE i.user_id = {} AND i.end_time IS NULL
            AND NOT EXISTS (SELECT 1 FROM task_items c WHERE c.parent_id = i.id AND c.end_time IS NULL)
            ORDER BY i.id DESC LIMIT 1",
            escape(user_id, true)?
        );
        match query::query_rows(self.store.conn(), &sql)?.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(serde_json::Value::Object(row))?)),
            None => Ok(None),
        }
    }

    /// Every open item across all users, keyed by item id.
    pub fn tree(&self) -> Result<BTreeMap<u32, TreeEntry>> {
        let rows = query::query_keyed(self.store.conn(), SELECT_TREE, "id")?;
        let mut tree = BTreeMap::new();
        for (_, row) in rows {
            let entry: TreeEntry = serde_json::from_value(row)?;
            tree.insert(entry.id, entry);
        }
        Ok(tree)
    }
}
