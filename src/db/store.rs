//! Generic schema store over the PATTS tables.
//!
//! Records are created with bound parameters and read back through the query
//! layer, which keys each result set by the table's declared primary key and
//! hands rows over as JSON. [`Record`] types deserialize from those rows.
//! Users and task types are soft-deleted: reads only see rows whose
//! `active` flag is set.

use crate::db::query::{self, escape, quote_ident};
use crate::libs::error::{PattsError, Result};
use crate::msg_debug;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    TaskType,
    TaskItem,
}

impl Entity {
    pub fn table(&self) -> &'static str {
        match self {
            Entity::User => "users",
            Entity::TaskType => "task_types",
            Entity::TaskItem => "task_items",
        }
    }

    /// Whether rows carry an `active` flag instead of being removed.
    pub fn soft_deletable(&self) -> bool {
        matches!(self, Entity::User | Entity::TaskType)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => write!(f, "user"),
            Entity::TaskType => write!(f, "task type"),
            Entity::TaskItem => write!(f, "task item"),
        }
    }
}

/// A row type stored in one of the PATTS tables.
pub trait Record: DeserializeOwned {
    const ENTITY: Entity;
    type Id: Ord + Clone + Into<Literal>;

    fn id(&self) -> Self::Id;
}

/// A value inlined into generated SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Text(String),
}

impl Literal {
    fn to_sql(&self) -> Result<String> {
        match self {
            Literal::Int(i) => Ok(i.to_string()),
            Literal::Text(s) => escape(s, true),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Literal::Int(i64::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Int(i64::from(value))
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

/// Row filter rendered into a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq(String, Literal),
    IsNull(String),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Literal>) -> Self {
        Filter::Eq(column.to_string(), value.into())
    }

    pub fn is_null(column: &str) -> Self {
        Filter::IsNull(column.to_string())
    }

    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut a), Filter::And(b)) => {
                a.extend(b);
                Filter::And(a)
            }
            (Filter::And(mut a), f) => {
                a.push(f);
                Filter::And(a)
            }
            (f, Filter::And(mut b)) => {
                b.insert(0, f);
                Filter::And(b)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }

    fn to_sql(&self) -> Result<String> {
        match self {
            Filter::All => Ok("1".to_string()),
            Filter::Eq(column, value) => Ok(format!("{} = {}", quote_ident(column)?, value.to_sql()?)),
            Filter::IsNull(column) => Ok(format!("{} IS NULL", quote_ident(column)?)),
            Filter::And(filters) if filters.is_empty() => Ok("1".to_string()),
            Filter::And(filters) => {
                let parts = filters.iter().map(|f| f.to_sql().map(|s| format!("({})", s))).collect::<Result<Vec<_>>>()?;
                Ok(parts.join(" AND "))
            }
        }
    }
}

pub struct Store<'a> {
    conn: &'a Connection,
}

impl<'a> Store<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &'a Connection {
        self.conn
    }

    pub fn primary_key(&self, entity: Entity) -> Result<String> {
        query::primary_key(self.conn, entity.table())
    }

    /// Inserts a row and returns its rowid.
    pub fn create(&self, entity: Entity, fields: &[(&str, SqlValue)]) -> Result<i64> {
        let columns = fields.iter().map(|(name, _)| quote_ident(name)).collect::<Result<Vec<_>>>()?;
        let placeholders = (1..=fields.len()).map(|i| format!("?{}", i)).collect::<Vec<_>>();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(entity.table())?,
            columns.join(", "),
            placeholders.join(", ")
        );
        query::check_len(&sql)?;

        self.conn.execute(&sql, params_from_iter(fields.iter().map(|(_, value)| value)))?;
        let id = self.conn.last_insert_rowid();
        msg_debug!(format!("created {} {}", entity, id));
        Ok(id)
    }

    /// Sets columns on the rows matching `filter`; returns the number of rows changed.
    pub fn update(&self, entity: Entity, fields: &[(&str, SqlValue)], filter: &Filter) -> Result<usize> {
        let assignments = fields
            .iter()
            .enumerate()
            .map(|(i, (name, _))| quote_ident(name).map(|c| format!("{} = ?{}", c, i + 1)))
            .collect::<Result<Vec<_>>>()?;
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            quote_ident(entity.table())?,
            assignments.join(", "),
            filter.to_sql()?
        );
        query::check_len(&sql)?;

        Ok(self.conn.execute(&sql, params_from_iter(fields.iter().map(|(_, value)| value)))?)
    }

    /// Marks an active row inactive. Fails with `NotFound` if no active row has that id.
    pub fn soft_delete(&self, entity: Entity, id: impl Into<Literal>) -> Result<()> {
        if !entity.soft_deletable() {
            return Err(PattsError::NotImplemented(format!("{} rows cannot be deactivated", entity)));
        }

        let id = id.into();
        let pk = self.primary_key(entity)?;
        let filter = Filter::Eq(pk, id.clone()).and(Filter::eq("active", true));
        let changed = self.update(entity, &[("active", SqlValue::Integer(0))], &filter)?;
        if changed == 0 {
            return Err(PattsError::NotFound(format!("No active {} with id {}", entity, id)));
        }
        Ok(())
    }

    /// Looks up one visible record by primary key.
    pub fn find_by_id<T: Record>(&self, id: impl Into<Literal>) -> Result<T> {
        let id = id.into();
        let pk = self.primary_key(T::ENTITY)?;
        self.find_all::<T>(&Filter::Eq(pk, id.clone()))?
            .into_values()
            .next()
            .ok_or_else(|| PattsError::NotFound(format!("No {} with id {}", T::ENTITY, id)))
    }

    /// All visible records matching `filter`, keyed by primary key.
    pub fn find_all<T: Record>(&self, filter: &Filter) -> Result<BTreeMap<T::Id, T>> {
        let entity = T::ENTITY;
        let pk = self.primary_key(entity)?;
        let filter = if entity.soft_deletable() {
            filter.clone().and(Filter::eq("active", true))
        } else {
            filter.clone()
        };
        let sql = format!("SELECT * FROM {} WHERE {}", quote_ident(entity.table())?, filter.to_sql()?);

        let rows = query::query_keyed(self.conn, &sql, &pk)?;
        let mut records = BTreeMap::new();
        for (_, row) in rows {
            let record: T = serde_json::from_value(row)?;
            records.insert(record.id(), record);
        }
        Ok(records)
    }
}

/// Reads a boolean stored as an SQLite integer.
pub fn bool_from_int<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrBool {
        Int(i64),
        Bool(bool),
    }

    Ok(match IntOrBool::deserialize(deserializer)? {
        IntOrBool::Int(i) => i != 0,
        IntOrBool::Bool(b) => b,
    })
}
