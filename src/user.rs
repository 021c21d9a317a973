//! The `User` resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::auth;
use crate::error::{AuthError, HookError};
use crate::lifecycle::{EntityHooks, HookContext, Resource};
use crate::meta::{ListMeta, ObjectMeta};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct User {
    #[serde(flatten)]
    pub meta: ObjectMeta,

    /// Account state flag (enabled/disabled); semantics owned by the caller.
    pub status: i32,

    #[validate(length(min = 1, max = 30))]
    pub nickname: String,

    /// Argon2 PHC hash at rest; `compare` is the only sanctioned check.
    #[validate(length(min = 1))]
    pub password: String,

    #[validate(length(min = 1, max = 100), email)]
    pub email: String,

    pub phone: String,

    pub is_admin: i32,

    /// Number of policies owned by this user. Computed by a separate query,
    /// never persisted.
    #[serde(skip)]
    pub total_policy: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logined_at: Option<DateTime<Utc>>,
}

impl User {
    /// Test a candidate plaintext against the stored hash.
    pub fn compare(&self, pwd: &str) -> Result<(), AuthError> {
        auth::compare(&self.password, pwd)
    }
}

impl EntityHooks for User {
    fn on_before_insert(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta
            .before_create()
            .map_err(|e| HookError::Meta { hook: "before_create", source: e })
    }

    fn on_after_insert(&mut self, ctx: &mut HookContext<'_>) -> Result<(), HookError> {
        self.meta.instance_id = ctx.ids.instance_id(Self::ID_PREFIX, self.meta.id);
        debug!("user.after_insert key={} instance_id={}", self.meta.id, self.meta.instance_id);
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

impl Resource for User {
    const TABLE: &'static str = "user";
    const ID_PREFIX: &'static str = "user-";

    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }
}

/// Paged collection of users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserList {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub items: Vec<User>,
}
