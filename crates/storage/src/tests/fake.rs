//! In-memory stand-in for the remote store. Generates ids and timestamps
//! the way the real store does and enforces the schema-level cascade from
//! exercises to their association tables. Timestamps are a deterministic
//! monotonic clock so ordering is reproducible.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::{Value, json};
use uuid::Uuid;

use motus_domain::StorageError;

use crate::client::{Client, Filter, OrderBy, Table};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Default)]
pub struct FakeClient {
    tables: RefCell<BTreeMap<Table, Vec<Value>>>,
    calls: RefCell<Vec<(Table, Operation)>>,
    failures: RefCell<Vec<(Table, Operation)>>,
    ticks: Cell<i64>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places rows directly into a table, bypassing insert defaults.
    pub fn seed(&self, table: Table, rows: Vec<Value>) {
        self.tables
            .borrow_mut()
            .entry(table)
            .or_default()
            .extend(rows);
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables
            .borrow()
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<(Table, Operation)> {
        self.calls.borrow().clone()
    }

    /// Makes the next matching request fail with `StorageError::Rejected`.
    pub fn fail_next(&self, table: Table, operation: Operation) {
        self.failures.borrow_mut().push((table, operation));
    }

    fn begin(&self, table: Table, operation: Operation) -> Result<(), StorageError> {
        self.calls.borrow_mut().push((table, operation));
        let mut failures = self.failures.borrow_mut();
        if let Some(position) = failures
            .iter()
            .position(|failure| *failure == (table, operation))
        {
            failures.remove(position);
            return Err(StorageError::Rejected("injected failure".to_string()));
        }
        Ok(())
    }

    fn next_timestamp(&self) -> Value {
        let ticks = self.ticks.get() + 1;
        self.ticks.set(ticks);
        json!(DateTime::from_timestamp(ticks, 0).unwrap())
    }

    fn matches(row: &Value, filter: Option<&Filter>) -> bool {
        filter.is_none_or(|filter| {
            row.get(filter.column).is_some_and(|value| match value {
                Value::String(string) => *string == filter.value,
                other => other.to_string() == filter.value,
            })
        })
    }
}

impl Client for FakeClient {
    async fn select(
        &self,
        table: Table,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Value>, StorageError> {
        self.begin(table, Operation::Select)?;
        let mut rows = self
            .rows(table)
            .into_iter()
            .filter(|row| Self::matches(row, filter.as_ref()))
            .collect::<Vec<_>>();
        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let a = a.get(order.column).map(Value::to_string).unwrap_or_default();
                let b = b.get(order.column).map(Value::to_string).unwrap_or_default();
                a.cmp(&b)
            });
            if order.descending {
                rows.reverse();
            }
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StorageError> {
        self.begin(table, Operation::Insert)?;
        let mut stored = vec![];
        for row in rows {
            let Value::Object(mut object) = row else {
                return Err(StorageError::Rejected("row must be an object".to_string()));
            };
            match table {
                Table::Exercises => {
                    object.insert("id".to_string(), json!(Uuid::new_v4()));
                    let now = self.next_timestamp();
                    object.insert("created_at".to_string(), now.clone());
                    object.insert("updated_at".to_string(), now);
                }
                Table::Muscles | Table::MovementPatterns | Table::ExerciseVideos => {
                    object.insert("id".to_string(), json!(Uuid::new_v4()));
                    object.insert("created_at".to_string(), self.next_timestamp());
                }
                Table::Invitations => {
                    object.insert("id".to_string(), json!(Uuid::new_v4()));
                    object.insert("token".to_string(), json!(Uuid::new_v4()));
                    object.insert("used".to_string(), json!(false));
                    object.insert("created_by".to_string(), json!(Uuid::new_v4()));
                    object.insert("created_at".to_string(), self.next_timestamp());
                    object.entry("expires_at").or_insert(Value::Null);
                }
                Table::Profiles => {
                    object.insert("id".to_string(), json!(Uuid::new_v4()));
                    object.insert("created_at".to_string(), self.next_timestamp());
                }
                Table::Directions
                | Table::ExercisePrimaryMuscles
                | Table::ExerciseSynergistMuscles => {}
            }
            stored.push(Value::Object(object));
        }
        self.tables
            .borrow_mut()
            .entry(table)
            .or_default()
            .extend(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        table: Table,
        patch: Value,
        filter: Filter,
    ) -> Result<(), StorageError> {
        self.begin(table, Operation::Update)?;
        let Value::Object(patch) = patch else {
            return Err(StorageError::Rejected("patch must be an object".to_string()));
        };
        let updated_at = self.next_timestamp();
        for row in self.tables.borrow_mut().entry(table).or_default().iter_mut() {
            if Self::matches(row, Some(&filter)) {
                if let Value::Object(object) = row {
                    for (key, value) in &patch {
                        object.insert(key.clone(), value.clone());
                    }
                    if table == Table::Exercises {
                        object.insert("updated_at".to_string(), updated_at.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, filter: Filter) -> Result<(), StorageError> {
        self.begin(table, Operation::Delete)?;
        let removed_ids = {
            let mut tables = self.tables.borrow_mut();
            let rows = tables.entry(table).or_default();
            let removed = rows
                .iter()
                .filter(|row| Self::matches(row, Some(&filter)))
                .filter_map(|row| row.get("id").cloned())
                .collect::<Vec<_>>();
            rows.retain(|row| !Self::matches(row, Some(&filter)));
            removed
        };
        // the backing schema cascades exercise deletes to the owned tables
        if table == Table::Exercises {
            let mut tables = self.tables.borrow_mut();
            for child in [
                Table::ExercisePrimaryMuscles,
                Table::ExerciseSynergistMuscles,
                Table::ExerciseVideos,
            ] {
                tables.entry(child).or_default().retain(|row| {
                    row.get("exercise_id")
                        .is_none_or(|id| !removed_ids.contains(id))
                });
            }
        }
        Ok(())
    }
}
