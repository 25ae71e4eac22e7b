//! In-memory [`Backend`] for flow tests: tables of JSON rows, unique keys,
//! injected failures, and a log of every call made.

use super::query::{Direction, Filter, Query};
use super::{ApiError, ApiErrorKind, ApiResult, Backend, UNIQUE_VIOLATION};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Select(String),
    Insert(String),
    Upsert(String),
    Update(String),
    Delete(String),
    Upload(String),
    RemoveObject(String),
    Rpc(String),
}

#[derive(Default)]
pub(crate) struct MockBackend {
    tables: RefCell<HashMap<String, Vec<Value>>>,
    objects: RefCell<HashMap<String, Vec<u8>>>,
    unique: HashMap<String, Vec<Vec<String>>>,
    failures: RefCell<HashMap<String, ApiError>>,
    calls: RefCell<Vec<Call>>,
}

fn cell_matches(row: &Value, column: &str, want: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == want,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == want,
    }
}

fn row_matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| match f {
        Filter::Eq(col, v) => cell_matches(row, col, v),
        Filter::In(col, vs) => vs.iter().any(|v| cell_matches(row, col, v)),
        Filter::Contains(col, needle) => row
            .get(col)
            .and_then(Value::as_str)
            .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
    })
}

fn same_key(a: &Value, b: &Value, columns: &[String]) -> bool {
    columns
        .iter()
        .all(|c| a.get(c).is_some() && a.get(c) == b.get(c))
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        self
    }

    pub fn with_unique(mut self, table: &str, columns: &[&str]) -> Self {
        self.unique
            .entry(table.to_string())
            .or_default()
            .push(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Make the next calls of `op` (`select`, `insert`, `upload`, …) on `target` fail.
    pub fn fail_on(self, op: &str, target: &str, error: ApiError) -> Self {
        self.failures
            .borrow_mut()
            .insert(format!("{op}:{target}"), error);
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.borrow().get(table).cloned().unwrap_or_default()
    }

    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn selects_of(&self, table: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| **c == Call::Select(table.to_string()))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn injected(&self, op: &str, target: &str) -> ApiResult<()> {
        match self.failures.borrow().get(&format!("{op}:{target}")) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn check_unique(&self, table: &str, row: &Value, skip: Option<usize>) -> ApiResult<()> {
        let Some(keys) = self.unique.get(table) else {
            return Ok(());
        };
        let tables = self.tables.borrow();
        let existing = tables.get(table).map(Vec::as_slice).unwrap_or_default();
        for cols in keys {
            let clash = existing
                .iter()
                .enumerate()
                .any(|(i, r)| Some(i) != skip && same_key(r, row, cols));
            if clash {
                return Err(ApiError::new(
                    ApiErrorKind::Http,
                    format!("duplicate key value violates unique constraint on {table}"),
                )
                .with_code(UNIQUE_VIOLATION));
            }
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    async fn select(&self, query: &Query) -> ApiResult<Vec<Value>> {
        self.record(Call::Select(query.table.clone()));
        self.injected("select", &query.table)?;

        let mut rows: Vec<Value> = self
            .rows(&query.table)
            .into_iter()
            .filter(|r| row_matches(r, &query.filters))
            .collect();

        if let Some(order) = &query.order {
            let key = |r: &Value| r.get(&order.column).map(|v| v.to_string()).unwrap_or_default();
            rows.sort_by_key(key);
            if order.direction == Direction::Desc {
                rows.reverse();
            }
        }
        if let Some(n) = query.limit {
            rows.truncate(n);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> ApiResult<()> {
        self.record(Call::Insert(table.to_string()));
        self.injected("insert", table)?;
        self.check_unique(table, &row, None)?;
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &[&str]) -> ApiResult<()> {
        self.record(Call::Upsert(table.to_string()));
        self.injected("upsert", table)?;

        let cols: Vec<String> = on_conflict.iter().map(|c| c.to_string()).collect();
        let pos = self
            .rows(table)
            .iter()
            .position(|r| same_key(r, &row, &cols));
        self.check_unique(table, &row, pos)?;

        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(table.to_string()).or_default();
        match (pos, row) {
            (Some(i), Value::Object(patch)) => {
                if let Some(Value::Object(existing)) = rows.get_mut(i) {
                    existing.extend(patch);
                }
            }
            (_, row) => rows.push(row),
        }
        Ok(())
    }

    async fn update(&self, table: &str, patch: Value, filters: &[Filter]) -> ApiResult<()> {
        self.record(Call::Update(table.to_string()));
        self.injected("update", table)?;

        let mut tables = self.tables.borrow_mut();
        if let (Some(rows), Value::Object(patch)) = (tables.get_mut(table), patch) {
            for r in rows.iter_mut().filter(|r| row_matches(r, filters)) {
                if let Value::Object(obj) = r {
                    obj.extend(patch.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> ApiResult<()> {
        self.record(Call::Delete(table.to_string()));
        self.injected("delete", table)?;
        if let Some(rows) = self.tables.borrow_mut().get_mut(table) {
            rows.retain(|r| !row_matches(r, filters));
        }
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> ApiResult<String> {
        self.record(Call::Upload(key.to_string()));
        self.injected("upload", bucket)?;
        self.objects.borrow_mut().insert(key.to_string(), bytes);
        Ok(key.to_string())
    }

    async fn remove_object(&self, bucket: &str, key: &str) -> ApiResult<()> {
        self.record(Call::RemoveObject(key.to_string()));
        self.injected("remove", bucket)?;
        self.objects.borrow_mut().remove(key);
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("https://cdn.test/{bucket}/{key}")
    }

    async fn rpc(&self, name: &str, _args: Value) -> ApiResult<Value> {
        self.record(Call::Rpc(name.to_string()));
        self.injected("rpc", name)?;
        Ok(Value::Null)
    }
}
