//! Clock engine: clocking in and out of task items.
//!
//! A user is idle when none of their items is open. Clocking in opens a new
//! item whose parent is the user's active item, if any, so nested clock-ins
//! build a chain. Clocking out of an item closes it together with every open
//! item below it in one transaction; a closed item never has an open
//! descendant.
//!
//! Owners may clock out of their own items. Administrators may clock out of
//! any user's item. Anyone else gets `TaskUnavailable`.

use crate::db::task_items::{TaskItem, TaskItems, TreeEntry};
use crate::db::task_types::TaskTypes;
use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use crate::libs::session::Session;
use crate::{msg_debug, msg_info};
use chrono::Utc;
use rusqlite::TransactionBehavior;
use std::collections::BTreeMap;

impl Session {
    /// Opens a new item of type `type_id` for the current user, nested under
    /// the user's active item. Returns the new item id.
    pub fn clockin(&mut self, type_id: u32) -> Result<u32> {
        let identity = self.identity()?;
        let tx = self.conn()?.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = {
            if !TaskTypes::new(&tx).exists(type_id)? {
                return Err(PattsError::TaskUnavailable(Message::TaskUnavailable(type_id).to_string()));
            }

            let items = TaskItems::new(&tx);
            let parent = items.active_leaf(&identity.user)?.map(|item| item.id);
            items.insert(&identity.user, type_id, parent, &Utc::now())?
        };
        tx.commit()?;

        msg_info!(Message::ClockedIn(id));
        Ok(id)
    }

    /// Closes `item_id` and every open item below it. Returns how many items
    /// were closed.
    pub fn clockout(&mut self, item_id: u32) -> Result<usize> {
        let identity = self.identity()?;
        let tx = self.conn()?.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let closed = {
            let items = TaskItems::new(&tx);
            let item = match items.get(item_id) {
                Ok(item) => item,
                Err(PattsError::NotFound(_)) => {
                    return Err(PattsError::TaskUnavailable(Message::ItemUnavailable(item_id).to_string()))
                }
                Err(e) => return Err(e),
            };
            if !item.is_open() || (item.user_id != identity.user && !identity.admin) {
                return Err(PattsError::TaskUnavailable(Message::ItemUnavailable(item_id).to_string()));
            }

            let now = Utc::now();
            let mut closed = 0;
            let mut worklist = vec![item_id];
            while let Some(id) = worklist.pop() {
                if items.close(id, &now)? {
                    closed += 1;
                }
                worklist.extend(items.open_child_ids(id)?);
            }
            closed
        };
        tx.commit()?;

        msg_debug!(Message::CascadeClosed(item_id, closed));
        msg_info!(Message::ClockedOut(item_id));
        Ok(closed)
    }

    /// The current user's active leaf item, or `None` when idle.
    pub fn get_active_task(&mut self) -> Result<Option<TaskItem>> {
        let identity = self.identity()?;
        TaskItems::new(self.conn()?).active_leaf(&identity.user)
    }

    /// Every open item of every user, keyed by item id.
    pub fn get_tree(&mut self) -> Result<BTreeMap<u32, TreeEntry>> {
        TaskItems::new(self.conn()?).tree()
    }

    pub fn get_items(&mut self) -> Result<BTreeMap<u32, TaskItem>> {
        TaskItems::new(self.conn()?).list(&crate::db::store::Filter::All)
    }

    pub fn get_item_byid(&mut self, id: u32) -> Result<TaskItem> {
        TaskItems::new(self.conn()?).get(id)
    }

    /// Id of the most recently created item of `user_id`, open or closed.
    pub fn get_last_item(&mut self, user_id: &str) -> Result<Option<u32>> {
        TaskItems::new(self.conn()?).last_id_by_user(user_id)
    }

    pub fn get_items_byuser(&mut self, user_id: &str) -> Result<BTreeMap<u32, TaskItem>> {
        TaskItems::new(self.conn()?).by_user(user_id)
    }

    pub fn get_items_byuser_onclock(&mut self, user_id: &str) -> Result<BTreeMap<u32, TaskItem>> {
        TaskItems::new(self.conn()?).on_clock_by_user(user_id)
    }
}
