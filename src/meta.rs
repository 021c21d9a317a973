//! Common object metadata shared by every persisted resource.
//! The persistence engine owns the identity fields: the internal key is
//! assigned on insert, the instance id after insert, and the timestamps by the
//! `before_create`/`before_update` stamps. Callers never set them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MetaError;

/// Free-form labels attached by callers. Live counterpart of the persisted
/// extend shadow string.
pub type Extend = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    /// Internal storage key, assigned by the persistence engine on insert.
    pub id: u64,

    /// Stable, prefixed external identifier, assigned by the post-create hook
    /// once the internal key exists. Empty on a persisted row signals an
    /// incomplete create; re-assigning is safe because derivation is
    /// deterministic per key.
    pub instance_id: String,

    /// Human-assignable resource name.
    pub name: String,

    /// Live form of the extend labels. Not persisted; `extend_shadow` is.
    #[serde(skip)]
    pub extend: Extend,

    /// Serialized form of `extend`, re-derived on every create/update stamp.
    extend_shadow: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    /// Create-time stamp: both timestamps plus the extend shadow.
    pub fn before_create(&mut self) -> Result<(), MetaError> {
        let now = Utc::now();
        self.created_at = Some(now);
        self.updated_at = Some(now);
        self.extend_shadow = encode_extend(&self.extend)?;
        Ok(())
    }

    /// Update-time stamp: only the update timestamp, plus the extend shadow.
    pub fn before_update(&mut self) -> Result<(), MetaError> {
        self.updated_at = Some(Utc::now());
        self.extend_shadow = encode_extend(&self.extend)?;
        Ok(())
    }

    /// Post-read stamp: rebuild the live extend map from its shadow.
    pub fn after_find(&mut self) -> Result<(), MetaError> {
        self.extend = decode_extend(&self.extend_shadow)?;
        Ok(())
    }

    pub fn extend_shadow(&self) -> &str {
        &self.extend_shadow
    }
}

fn encode_extend(extend: &Extend) -> Result<String, MetaError> {
    serde_json::to_string(extend).map_err(MetaError::ExtendEncode)
}

fn decode_extend(shadow: &str) -> Result<Extend, MetaError> {
    if shadow.is_empty() {
        return Ok(Extend::new());
    }
    serde_json::from_str(shadow).map_err(MetaError::ExtendDecode)
}

/// Standard list metadata returned alongside paged collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListMeta {
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn before_create_stamps_both_timestamps() {
        let mut meta = ObjectMeta { name: "ada".into(), ..Default::default() };
        meta.before_create().unwrap();
        assert!(meta.created_at.is_some());
        assert_eq!(meta.created_at, meta.updated_at);
        assert_eq!(meta.extend_shadow(), "{}");
    }

    #[test]
    fn before_update_leaves_created_at_alone() {
        let mut meta = ObjectMeta::default();
        meta.before_create().unwrap();
        let created = meta.created_at;
        meta.before_update().unwrap();
        assert_eq!(meta.created_at, created);
        assert!(meta.updated_at >= created);
    }

    #[test]
    fn extend_round_trips_through_shadow() {
        let mut meta = ObjectMeta::default();
        meta.extend.insert("team".into(), serde_json::json!("core"));
        meta.before_create().unwrap();

        let mut loaded = ObjectMeta::default();
        loaded.extend_shadow = meta.extend_shadow.clone();
        loaded.after_find().unwrap();
        assert_eq!(loaded.extend, meta.extend);
    }

    #[test]
    fn empty_shadow_parses_to_empty_extend() {
        let mut meta = ObjectMeta::default();
        meta.after_find().unwrap();
        assert!(meta.extend.is_empty());
    }

    #[test]
    fn malformed_extend_shadow_is_an_error() {
        let mut meta = ObjectMeta { extend_shadow: "{\"team\":".into(), ..Default::default() };
        assert!(matches!(meta.after_find(), Err(MetaError::ExtendDecode(_))));
    }
}
