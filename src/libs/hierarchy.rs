//! Task hierarchy operations on a [`Session`].
//!
//! Types form a forest rooted at [`ROOT_TYPE`]. Items form trees through
//! their parent links; the children of an item are computed from the items
//! table on every call.

use crate::db::task_items::{TaskItem, TaskItems};
use crate::db::task_types::{TaskType, TaskTypes};
use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::libs::session::Session;
use crate::msg_info;
use std::collections::BTreeMap;

pub use crate::db::task_types::ROOT_TYPE;

impl Session {
    /// Creates a task type under `parent_id` ([`ROOT_TYPE`] for top level)
    /// and returns its id. Requires admin rights.
    pub fn create_task(&mut self, parent_id: u32, display_name: &str) -> Result<u32> {
        self.require_admin()?;
        let id = TaskTypes::new(self.conn()?).create(parent_id, display_name)?;
        msg_info!(Message::TypeCreated(id, display_name.to_string()));
        Ok(id)
    }

    /// Deactivates a task type. Child types stay active and items created
    /// from it stay readable. Requires admin rights.
    pub fn delete_task(&mut self, id: u32) -> Result<()> {
        self.require_admin()?;
        TaskTypes::new(self.conn()?).deactivate(id)?;
        msg_info!(Message::TypeDeactivated(id));
        Ok(())
    }

    pub fn get_types(&mut self) -> Result<BTreeMap<u32, TaskType>> {
        TaskTypes::new(self.conn()?).list()
    }

    pub fn get_type_byid(&mut self, id: u32) -> Result<TaskType> {
        TaskTypes::new(self.conn()?).get(id)
    }

    pub fn get_child_types(&mut self, parent_id: u32) -> Result<BTreeMap<u32, TaskType>> {
        TaskTypes::new(self.conn()?).children(parent_id)
    }

    /// Items started while item `id` was active, open or closed.
    pub fn get_child_items(&mut self, id: u32) -> Result<BTreeMap<u32, TaskItem>> {
        TaskItems::new(self.conn()?).children(id)
    }
}
