use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::{ChannelPreferenceMap, PreferenceOverride};
use super::workflow::{EnvironmentId, SubscriberId, WorkflowId};

/// Subscriber-specific, per-workflow preference override record.
///
/// Read-only input to this core; owned and mutated by the storage
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberPreference {
    /// Environment the record belongs to
    pub environment_id: EnvironmentId,

    /// Subscriber the record belongs to
    pub subscriber_id: SubscriberId,

    /// Workflow the record applies to
    pub workflow_id: WorkflowId,

    /// Top-level opt-in flag. Absent means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Channel overrides. May be absent, partial, or complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelPreferenceMap>,

    /// Creation timestamp, owned by the storage collaborator
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp, owned by the storage collaborator
    pub updated_at: DateTime<Utc>,
}

impl SubscriberPreference {
    /// The effective top-level flag; an absent flag means enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Workflow identity echoed back in a resolution response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// ID of the workflow
    pub id: WorkflowId,

    /// Name of the workflow
    pub name: String,

    /// Whether the workflow is critical
    pub critical: bool,
}

/// The effective preference used to gate delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPreference {
    /// Whether the subscriber receives this workflow at all
    pub enabled: bool,

    /// Effective per-channel flags, restricted to the workflow's
    /// active channels
    pub channels: ChannelPreferenceMap,

    /// Provenance of each effective channel value
    pub overrides: Vec<PreferenceOverride>,
}

/// Response produced by a single preference resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceResponse {
    /// The workflow the preference applies to
    pub template: TemplateSummary,

    /// The effective preference
    pub preference: ResolvedPreference,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(enabled: Option<bool>) -> SubscriberPreference {
        SubscriberPreference {
            environment_id: EnvironmentId("env_1".to_string()),
            subscriber_id: SubscriberId("sub_1".to_string()),
            workflow_id: WorkflowId("wf_1".to_string()),
            enabled,
            channels: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        assert!(record(None).is_enabled());
        assert!(record(Some(true)).is_enabled());
        assert!(!record(Some(false)).is_enabled());
    }

    #[test]
    fn test_absent_fields_deserialize() {
        let parsed: SubscriberPreference = serde_json::from_value(serde_json::json!({
            "environment_id": "env_1",
            "subscriber_id": "sub_1",
            "workflow_id": "wf_1",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(parsed.enabled.is_none());
        assert!(parsed.channels.is_none());
        assert!(parsed.is_enabled());
    }
}
