//! Persistence lifecycle hook pipeline.
//! The four-hook sequence is the consistency protocol: pre hooks run strictly
//! before the engine's own write, post hooks strictly after. Shadow encoding
//! always completes before the write it feeds, and decoding before a read's
//! result is released, so a row is never written or handed out desynchronized
//! from its structured form.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HookError;
use crate::idgen::InstanceIdGen;
use crate::meta::ObjectMeta;

/// Opaque write-back seam the persistence engine offers to post-insert hooks.
/// The instance id is only derivable once the row exists, so assigning it is a
/// second write through this handle.
pub trait TxHandle {
    fn save(&mut self, table: &'static str, key: u64, row: serde_json::Value) -> anyhow::Result<()>;
}

/// Everything a hook may touch besides the entity itself: the transaction that
/// triggered it and the injected identifier generator.
pub struct HookContext<'a> {
    pub tx: &'a mut dyn TxHandle,
    pub ids: &'a dyn InstanceIdGen,
}

impl HookContext<'_> {
    /// Serialize and write back a row amended by a post-insert hook.
    pub fn save<T: Serialize>(&mut self, table: &'static str, key: u64, row: &T) -> Result<(), HookError> {
        let value = serde_json::to_value(row).map_err(HookError::Row)?;
        self.tx.save(table, key, value).map_err(HookError::Persist)
    }
}

/// Lifecycle transitions the persistence engine invokes around its own
/// insert/update/select operations. Any failure aborts the engine's operation;
/// an `on_after_insert` failure is a failed create even though the row exists.
pub trait EntityHooks {
    fn on_before_insert(&mut self, ctx: &mut HookContext<'_>) -> Result<(), HookError>;
    fn on_after_insert(&mut self, ctx: &mut HookContext<'_>) -> Result<(), HookError>;
    fn on_before_update(&mut self, ctx: &mut HookContext<'_>) -> Result<(), HookError>;
    fn on_after_select(&mut self, ctx: &mut HookContext<'_>) -> Result<(), HookError>;
}

/// A persisted resource: its row shape plus the identity fields the engine and
/// the hooks maintain.
pub trait Resource: EntityHooks + Serialize + DeserializeOwned {
    const TABLE: &'static str;
    const ID_PREFIX: &'static str;

    fn meta(&self) -> &ObjectMeta;
    fn meta_mut(&mut self) -> &mut ObjectMeta;
}
