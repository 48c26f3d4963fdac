//! Generic JSON-backed table
//!
//! Each table keeps its rows in memory behind an `RwLock` and rewrites its
//! JSON file after every change. A failed save puts the in-memory rows back
//! the way they were, so memory never runs ahead of disk.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

use super::file_io::{read_json, write_json_atomic};

/// A row that can live in a [`JsonTable`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + std::fmt::Display;

    fn id(&self) -> Self::Id;

    /// Rows are returned and saved oldest first
    fn created_at(&self) -> DateTime<Utc>;
}

/// On-disk layout of a table file
#[derive(Serialize, Deserialize)]
struct TableFile<R> {
    records: Vec<R>,
}

impl<R> Default for TableFile<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

pub struct JsonTable<R: Record> {
    path: PathBuf,
    rows: RwLock<HashMap<R::Id, R>>,
}

impl<R: Record> JsonTable<R> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, HashMap<R::Id, R>>> {
        self.rows
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, HashMap<R::Id, R>>> {
        self.rows
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn ordered(rows: &HashMap<R::Id, R>) -> Vec<R> {
        let mut records: Vec<R> = rows.values().cloned().collect();
        records.sort_by_key(|r| r.created_at());
        records
    }

    fn persist(&self, rows: &HashMap<R::Id, R>) -> LedgerResult<()> {
        let file = TableFile {
            records: Self::ordered(rows),
        };
        write_json_atomic(&self.path, &file)
    }

    /// Replace the in-memory rows with the file contents
    pub fn load(&self) -> LedgerResult<()> {
        let file: TableFile<R> = read_json(&self.path)?;
        let mut rows = self.write()?;
        rows.clear();
        for record in file.records {
            rows.insert(record.id(), record);
        }
        Ok(())
    }

    pub fn get(&self, id: R::Id) -> LedgerResult<Option<R>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All rows matching `pred`, oldest first
    pub fn select(&self, pred: impl Fn(&R) -> bool) -> LedgerResult<Vec<R>> {
        let rows = self.read()?;
        Ok(Self::ordered(&rows).into_iter().filter(|r| pred(r)).collect())
    }

    pub fn find(&self, pred: impl Fn(&R) -> bool) -> LedgerResult<Option<R>> {
        Ok(self.read()?.values().find(|r| pred(r)).cloned())
    }

    pub fn insert(&self, record: R) -> LedgerResult<()> {
        let mut rows = self.write()?;
        let id = record.id();
        let previous = rows.insert(id, record);
        if let Err(e) = self.persist(&rows) {
            match previous {
                Some(old) => rows.insert(id, old),
                None => rows.remove(&id),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Overwrite an existing row; returns the old version, `None` if absent
    pub fn replace(&self, record: R) -> LedgerResult<Option<R>> {
        let mut rows = self.write()?;
        let id = record.id();
        let Some(old) = rows.get(&id).cloned() else {
            return Ok(None);
        };
        rows.insert(id, record);
        if let Err(e) = self.persist(&rows) {
            rows.insert(id, old);
            return Err(e);
        }
        Ok(Some(old))
    }

    pub fn remove(&self, id: R::Id) -> LedgerResult<Option<R>> {
        let mut rows = self.write()?;
        let Some(old) = rows.remove(&id) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&rows) {
            rows.insert(id, old);
            return Err(e);
        }
        Ok(Some(old))
    }

    /// Apply `change` to every row matching `pred`
    ///
    /// `change` reports whether it actually modified the row; only modified
    /// rows are returned, as `(before, after)` pairs, and nothing is written
    /// when none changed.
    pub fn modify_where(
        &self,
        pred: impl Fn(&R) -> bool,
        mut change: impl FnMut(&mut R) -> bool,
    ) -> LedgerResult<Vec<(R, R)>> {
        let mut rows = self.write()?;
        let mut changed = Vec::new();
        for row in rows.values_mut().filter(|r| pred(r)) {
            let before = row.clone();
            if change(row) {
                changed.push((before, row.clone()));
            }
        }
        if changed.is_empty() {
            return Ok(changed);
        }
        if let Err(e) = self.persist(&rows) {
            for (before, _) in &changed {
                rows.insert(before.id(), before.clone());
            }
            return Err(e);
        }
        Ok(changed)
    }

    pub fn len(&self) -> LedgerResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.read()?.is_empty())
    }
}
