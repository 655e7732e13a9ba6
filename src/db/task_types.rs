//! Task types: the forest of categories task items are created from.
//!
//! A type with `parent_id` [`ROOT_TYPE`] is top-level. Deactivating a type
//! hides it from every read here but leaves its children and the items
//! created from it untouched.

use crate::db::store::{bool_from_int, Entity, Filter, Record, Store};
use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parent id of top-level types.
pub const ROOT_TYPE: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskType {
    pub id: u32,
    pub parent_id: u32,
    pub display_name: String,
    #[serde(deserialize_with = "bool_from_int")]
    pub active: bool,
}

impl TaskType {
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_TYPE
    }
}

impl Record for TaskType {
    const ENTITY: Entity = Entity::TaskType;
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

pub struct TaskTypes<'a> {
    store: Store<'a>,
}

impl<'a> TaskTypes<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { store: Store::new(conn) }
    }

    /// Inserts a type under `parent_id`, which must be [`ROOT_TYPE`] or an active type.
    pub fn create(&self, parent_id: u32, display_name: &str) -> Result<u32> {
        if parent_id != ROOT_TYPE && !self.exists(parent_id)? {
            return Err(PattsError::NotFound(Message::ParentTypeNotFound(parent_id).to_string()));
        }

        let id = self.store.create(
            Entity::TaskType,
            &[
                ("parent_id", SqlValue::Integer(i64::from(parent_id))),
                ("display_name", SqlValue::Text(display_name.to_string())),
                ("active", SqlValue::Integer(1)),
            ],
        )?;
        u32::try_from(id).map_err(|_| PattsError::Unexpected(format!("task type id {} out of range", id)))
    }

    pub fn deactivate(&self, id: u32) -> Result<()> {
        self.store.soft_delete(Entity::TaskType, id).map_err(|e| match e {
            PattsError::NotFound(_) => PattsError::NotFound(Message::TypeNotFound(id).to_string()),
            other => other,
        })
    }

    pub fn exists(&self, id: u32) -> Result<bool> {
        match self.store.find_by_id::<TaskType>(id) {
            Ok(_) => Ok(true),
            Err(PattsError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, id: u32) -> Result<TaskType> {
        self.store.find_by_id::<TaskType>(id).map_err(|e| match e {
            PattsError::NotFound(_) => PattsError::NotFound(Message::TypeNotFound(id).to_string()),
            other => other,
        })
    }

    pub fn list(&self) -> Result<BTreeMap<u32, TaskType>> {
        self.store.find_all(&Filter::All)
    }

    pub fn children(&self, parent_id: u32) -> Result<BTreeMap<u32, TaskType>> {
        self.store.find_all(&Filter::eq("parent_id", parent_id))
    }
}
