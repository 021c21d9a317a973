//! The `Secret` resource: an api credential pair owned by a user.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::HookError;
use crate::lifecycle::{EntityHooks, HookContext, Resource};
use crate::meta::{ListMeta, ObjectMeta};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Secret {
    #[serde(flatten)]
    pub meta: ObjectMeta,

    /// Owning user.
    pub username: String,

    pub secret_id: String,
    pub secret_key: String,

    /// Expiry as unix seconds; 0 means never.
    pub expires: i64,

    #[validate(length(min = 1, max = 255))]
    pub description: String,
}

impl EntityHooks for Secret {
    fn on_before_insert(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta
            .before_create()
            .map_err(|e| HookError::Meta { hook: "before_create", source: e })
    }

    fn on_after_insert(&mut self, ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta.instance_id = ctx.ids.instance_id(Self::ID_PREFIX, self.meta.id);
        ctx.save(Self::TABLE, self.meta.id, &*self)
    }

    fn on_before_update(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta
            .before_update()
            .map_err(|e| HookError::Meta { hook: "before_update", source: e })
    }

    fn on_after_select(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta
            .after_find()
            .map_err(|e| HookError::Meta { hook: "after_find", source: e })
    }
}

impl Resource for Secret {
    const TABLE: &'static str = "secret";
    const ID_PREFIX: &'static str = "secret-";

    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }
}

/// Paged collection of secrets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretList {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub items: Vec<Secret>,
}
