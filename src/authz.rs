//! Structured authorization rule, its canonical string shadow, and the
//! decision `Response` shape handed back by the evaluation engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::error::CodecError;

/// Rule effect. Anything that is not an explicit allow denies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    #[default]
    Deny,
}

/// In-memory authorization rule. Authoritative while the owning `Policy` is
/// live; persisted only through its encoded shadow. `id` is kept equal to the
/// owning resource's name by the lifecycle hooks, so rule identity stays
/// human-assignable even though the row key is system-assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthzRule {
    pub id: String,
    pub description: String,
    pub subjects: Vec<String>,
    pub effect: Effect,
    pub resources: Vec<String>,
    pub actions: Vec<String>,
    pub conditions: BTreeMap<String, serde_json::Value>,
}

impl AuthzRule {
    /// Canonical serialization. Failure aborts the enclosing lifecycle step;
    /// a policy is never persisted with an empty or stale shadow.
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(CodecError::Encode)
    }

    /// Parse a shadow back into the structured form. Malformed or truncated
    /// input aborts the read; no partially populated rule is ever returned.
    pub fn decode(shadow: &str) -> Result<Self, CodecError> {
        serde_json::from_str(shadow).map_err(CodecError::Decode)
    }
}

/// Authorization decision, constructed fresh per request by the evaluation
/// engine and immutable once returned. `error` means evaluation itself failed
/// and must never be read as an allow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    pub allowed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub denied: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Plain struct of scalars; serialization cannot fail.
        f.write_str(&serde_json::to_string(self).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> AuthzRule {
        AuthzRule {
            id: "p-1".into(),
            description: "grant read on res:1".into(),
            subjects: vec!["user:ada".into()],
            effect: Effect::Allow,
            resources: vec!["res:1".into(), "res:2".into()],
            actions: vec!["get".into(), "list".into()],
            conditions: BTreeMap::from([("remote_ip".into(), serde_json::json!({"cidr": "10.0.0.0/8"}))]),
        }
    }

    #[test]
    fn shadow_round_trip_preserves_every_field() {
        let rule = sample_rule();
        let shadow = rule.encode().unwrap();
        let back = AuthzRule::decode(&shadow).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn decode_rejects_truncated_shadow() {
        let shadow = sample_rule().encode().unwrap();
        let truncated = &shadow[..shadow.len() / 2];
        assert!(matches!(AuthzRule::decode(truncated), Err(CodecError::Decode(_))));
    }

    #[test]
    fn effect_serializes_lowercase_and_defaults_to_deny() {
        let shadow = sample_rule().encode().unwrap();
        assert!(shadow.contains("\"effect\":\"allow\""));
        assert_eq!(AuthzRule::decode("{}").unwrap().effect, Effect::Deny);
    }

    #[test]
    fn response_display_omits_empty_fields() {
        let rsp = Response { allowed: true, ..Default::default() };
        assert_eq!(rsp.to_string(), "{\"allowed\":true}");

        let rsp = Response { denied: true, reason: "no matching policy".into(), ..Default::default() };
        assert_eq!(rsp.to_string(), "{\"allowed\":false,\"denied\":true,\"reason\":\"no matching policy\"}");
    }
}
