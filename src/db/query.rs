//! Query and escaping layer.
//!
//! Free-form SQL enters the store through [`query`], which returns rows as
//! self-describing JSON objects: either an ordered list of rows, or a map of
//! rows keyed by the value of a primary-key column. Callers that inline
//! values into SQL text do so through [`escape`] and [`quote_ident`].
//!
//! ```rust,no_run
//! use patts::db::query::{escape, query, QueryResult};
//! # fn demo(conn: &rusqlite::Connection) -> patts::Result<()> {
//! let sql = format!("SELECT * FROM users WHERE id = {}", escape("o'brien", true)?);
//! if let QueryResult::Keyed(users) = query(conn, &sql, Some("id"))? {
//!     assert!(users.contains_key("o'brien") || users.is_empty());
//! }
//! # Ok(())
//! # }
//! ```

use crate::libs::error::{PattsError, Result};
use crate::libs::messages::Message;
use crate::msg_debug;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Upper bound on the length of a generated query.
pub const QUERY_BUFFER_SIZE: usize = 65536;

pub type Row = Map<String, Value>;

/// Result set of [`query`], serialized as a JSON array or object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Rows(Vec<Row>),
    Keyed(Map<String, Value>),
}

impl QueryResult {
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Rows(rows) => rows.len(),
            QueryResult::Keyed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_json(self) -> Value {
        match self {
            QueryResult::Rows(rows) => Value::Array(rows.into_iter().map(Value::Object).collect()),
            QueryResult::Keyed(rows) => Value::Object(rows),
        }
    }
}

/// Makes `raw` safe to embed in a SQL string literal, optionally adding the
/// surrounding single quotes.
pub fn escape(raw: &str, quote: bool) -> Result<String> {
    let extra = raw.matches('\'').count() + if quote { 2 } else { 0 };
    let mut out = String::new();
    out.try_reserve_exact(raw.len() + extra)?;

    if quote {
        out.push('\'');
    }
    for c in raw.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    if quote {
        out.push('\'');
    }
    Ok(out)
}

/// Quotes a table or column name.
pub fn quote_ident(name: &str) -> Result<String> {
    let extra = name.matches('"').count() + 2;
    let mut out = String::new();
    out.try_reserve_exact(name.len() + extra)?;

    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    Ok(out)
}

/// Name of the declared primary-key column of `table`.
///
/// For a composite key the first key column is returned. A table without a
/// declared key, or an unknown table, fails with `NoPrimaryKey`.
pub fn primary_key(conn: &Connection, table: &str) -> Result<String> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table)?);
    check_len(&sql)?;

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let pk: i64 = row.get("pk")?;
        if pk == 1 {
            return Ok(row.get("name")?);
        }
    }

    Err(PattsError::NoPrimaryKey(Message::NoPrimaryKey(table.to_string()).to_string()))
}

/// Runs `sql` and collects its rows.
///
/// Without `pk` the rows come back in result order. With `pk` they are keyed
/// by the stringified value of that column, which must be present in the
/// result set and unique across the returned rows.
pub fn query(conn: &Connection, sql: &str, pk: Option<&str>) -> Result<QueryResult> {
    check_len(sql)?;
    msg_debug!(Message::RunningQuery(sql.to_string()));

    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    if columns.is_empty() {
        return Err(PattsError::NoColumnsInSet(Message::NoColumnsInSet.to_string()));
    }

    let key_index = match pk {
        Some(pk) => Some(
            columns
                .iter()
                .position(|c| c == pk)
                .ok_or_else(|| PattsError::NoPrimaryKey(Message::NoPrimaryKey(pk.to_string()).to_string()))?,
        ),
        None => None,
    };

    let mut list = Vec::new();
    let mut keyed = Map::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (i, name) in columns.iter().enumerate() {
            record.insert(name.clone(), to_json(row.get_ref(i)?));
        }

        match key_index {
            Some(i) => {
                let key = key_string(&to_json(row.get_ref(i)?));
                if keyed.contains_key(&key) {
                    return Err(PattsError::PrimaryKeyNotUnique(Message::PrimaryKeyNotUnique(key).to_string()));
                }
                keyed.insert(key, Value::Object(record));
            }
            None => list.push(record),
        }
    }

    Ok(match key_index {
        Some(_) => QueryResult::Keyed(keyed),
        None => QueryResult::Rows(list),
    })
}

/// [`query`] without a key: rows in result order.
pub fn query_rows(conn: &Connection, sql: &str) -> Result<Vec<Row>> {
    match query(conn, sql, None)? {
        QueryResult::Rows(rows) => Ok(rows),
        QueryResult::Keyed(_) => Err(PattsError::Unexpected("keyed result for an unkeyed query".to_string())),
    }
}

/// [`query`] keyed by `pk`.
pub fn query_keyed(conn: &Connection, sql: &str, pk: &str) -> Result<Map<String, Value>> {
    match query(conn, sql, Some(pk))? {
        QueryResult::Keyed(rows) => Ok(rows),
        QueryResult::Rows(_) => Err(PattsError::Unexpected("unkeyed result for a keyed query".to_string())),
    }
}

/// Rejects generated SQL longer than [`QUERY_BUFFER_SIZE`].
pub fn check_len(sql: &str) -> Result<()> {
    if sql.len() > QUERY_BUFFER_SIZE {
        return Err(PattsError::BufferOverflow(Message::QueryTooLong(sql.len(), QUERY_BUFFER_SIZE).to_string()));
    }
    Ok(())
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
    }
}

fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
