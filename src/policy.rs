//! The `Policy` resource: a structured authorization rule plus the string
//! shadow that is its only persisted form.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::authz::AuthzRule;
use crate::error::HookError;
use crate::lifecycle::{EntityHooks, HookContext, Resource};
use crate::meta::{ListMeta, ObjectMeta};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Policy {
    #[serde(flatten)]
    pub meta: ObjectMeta,

    /// Owning user.
    pub username: String,

    /// Live structured rule; authoritative while the object is in memory.
    /// Rebuilt from the shadow on every read.
    #[serde(skip)]
    pub rule: AuthzRule,

    /// Canonical serialization of `rule`, the only representation written to
    /// storage. Derived, never hand-edited; the hooks keep it in sync.
    shadow: String,
}

impl Policy {
    /// The persisted shadow as of the last sync point.
    pub fn shadow(&self) -> &str {
        &self.shadow
    }

    /// Re-derive the shadow from the live rule, pinning the rule's id to the
    /// resource name first so rule identity follows the name across renames.
    fn sync_shadow(&mut self) -> Result<(), HookError> {
        self.rule.id = self.meta.name.clone();
        self.shadow = self.rule.encode()?;
        Ok(())
    }
}

impl EntityHooks for Policy {
    fn on_before_insert(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta
            .before_create()
            .map_err(|e| HookError::Meta { hook: "before_create", source: e })?;
        self.sync_shadow()?;
        debug!("policy.before_insert name={} shadow_len={}", self.meta.name, self.shadow.len());
        Ok(())
    }

    fn on_after_insert(&mut self, ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta.instance_id = ctx.ids.instance_id(Self::ID_PREFIX, self.meta.id);
        debug!("policy.after_insert key={} instance_id={}", self.meta.id, self.meta.instance_id);
        ctx.save(Self::TABLE, self.meta.id, &*self)
    }

    fn on_before_update(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta
            .before_update()
            .map_err(|e| HookError::Meta { hook: "before_update", source: e })?;
        self.sync_shadow()
    }

    fn on_after_select(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta
            .after_find()
            .map_err(|e| HookError::Meta { hook: "after_find", source: e })?;
        self.rule = AuthzRule::decode(&self.shadow)?;
        Ok(())
    }
}

impl Resource for Policy {
    const TABLE: &'static str = "policy";
    const ID_PREFIX: &'static str = "policy-";

    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }
}

/// Paged collection of policies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyList {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub items: Vec<Policy>,
}
