//! In-memory reference persistence engine.
//! Drives the lifecycle hooks in the contract order around plain JSON row
//! tables: pre hooks strictly before the write, post hooks strictly after, a
//! select released only once `on_after_select` succeeds. Tests and embedded
//! callers use it directly; a production engine implements the same `TxHandle`
//! seam around its own transactions.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::StoreError;
use crate::idgen::{HashInstanceIdGen, InstanceIdGen};
use crate::lifecycle::{HookContext, Resource, TxHandle};

pub struct MemStore {
    inner: RwLock<Inner>,
    ids: Box<dyn InstanceIdGen>,
}

#[derive(Default)]
struct Inner {
    next_key: u64,
    tables: HashMap<&'static str, BTreeMap<u64, serde_json::Value>>,
}

impl TxHandle for Inner {
    fn save(&mut self, table: &'static str, key: u64, row: serde_json::Value) -> anyhow::Result<()> {
        let slot = self
            .tables
            .get_mut(table)
            .and_then(|t| t.get_mut(&key))
            .ok_or_else(|| anyhow::anyhow!("row {table}/{key} vanished mid-transaction"))?;
        *slot = row;
        Ok(())
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::with_idgen(Box::new(HashInstanceIdGen))
    }

    /// Engine with a substitute identifier generator (tests use a fixed one).
    pub fn with_idgen(ids: Box<dyn InstanceIdGen>) -> Self {
        Self { inner: RwLock::new(Inner::default()), ids }
    }

    /// Insert a new row: pre-create hook, key assignment, write, post-create
    /// hook. A post-create failure leaves the row behind but reports a failed
    /// create; re-running the assignment is idempotent because instance ids
    /// are deterministic per key.
    pub fn insert<T: Resource>(&self, obj: &mut T) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !obj.meta().name.is_empty() {
            let name = obj.meta().name.clone();
            if inner.lookup_key::<T>(&name).is_some() {
                return Err(StoreError::Conflict { table: T::TABLE, name });
            }
        }
        {
            let mut ctx = HookContext { tx: &mut *inner, ids: self.ids.as_ref() };
            obj.on_before_insert(&mut ctx)?;
        }
        inner.next_key += 1;
        let key = inner.next_key;
        obj.meta_mut().id = key;
        let row = serde_json::to_value(&*obj)?;
        inner.tables.entry(T::TABLE).or_default().insert(key, row);
        debug!("store.insert table={} key={} name={}", T::TABLE, key, obj.meta().name);
        {
            let mut ctx = HookContext { tx: &mut *inner, ids: self.ids.as_ref() };
            obj.on_after_insert(&mut ctx)?;
        }
        Ok(())
    }

    /// Update an existing row in place: pre-update hook, then write. The row
    /// is looked up first so a missing key fails before the hook mutates the
    /// in-memory object.
    pub fn update<T: Resource>(&self, obj: &mut T) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let key = obj.meta().id;
        if inner.tables.get(T::TABLE).and_then(|t| t.get(&key)).is_none() {
            return Err(StoreError::NotFound { table: T::TABLE, key });
        }
        {
            let mut ctx = HookContext { tx: &mut *inner, ids: self.ids.as_ref() };
            obj.on_before_update(&mut ctx)?;
        }
        let row = serde_json::to_value(&*obj)?;
        let slot = inner
            .tables
            .get_mut(T::TABLE)
            .and_then(|t| t.get_mut(&key))
            .ok_or(StoreError::NotFound { table: T::TABLE, key })?;
        *slot = row;
        debug!("store.update table={} key={}", T::TABLE, key);
        Ok(())
    }

    /// Load a row by internal key; the result is released only after
    /// `on_after_select` succeeds.
    pub fn find<T: Resource>(&self, key: u64) -> Result<T, StoreError> {
        let mut inner = self.inner.write();
        let row = inner
            .tables
            .get(T::TABLE)
            .and_then(|t| t.get(&key))
            .cloned()
            .ok_or(StoreError::NotFound { table: T::TABLE, key })?;
        let mut obj: T = serde_json::from_value(row)?;
        let mut ctx = HookContext { tx: &mut *inner, ids: self.ids.as_ref() };
        obj.on_after_select(&mut ctx)?;
        Ok(obj)
    }

    /// Load a row by resource name.
    pub fn find_by_name<T: Resource>(&self, name: &str) -> Result<T, StoreError> {
        let key = {
            let inner = self.inner.read();
            inner.lookup_key::<T>(name)
        };
        match key {
            Some(key) => self.find(key),
            None => Err(StoreError::NotFoundByName { table: T::TABLE, name: name.to_string() }),
        }
    }

    /// Load every row of a table, in key order.
    pub fn list<T: Resource>(&self) -> Result<Vec<T>, StoreError> {
        let rows: Vec<serde_json::Value> = {
            let inner = self.inner.read();
            inner
                .tables
                .get(T::TABLE)
                .map(|t| t.values().cloned().collect())
                .unwrap_or_default()
        };
        let mut out = Vec::with_capacity(rows.len());
        let mut inner = self.inner.write();
        for row in rows {
            let mut obj: T = serde_json::from_value(row)?;
            let mut ctx = HookContext { tx: &mut *inner, ids: self.ids.as_ref() };
            obj.on_after_select(&mut ctx)?;
            out.push(obj);
        }
        Ok(out)
    }
}

impl Inner {
    fn lookup_key<T: Resource>(&self, name: &str) -> Option<u64> {
        self.tables.get(T::TABLE).and_then(|t| {
            t.iter()
                .find(|(_, row)| row.get("name").and_then(|v| v.as_str()) == Some(name))
                .map(|(k, _)| *k)
        })
    }
}
