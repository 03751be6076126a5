use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::{ChannelPreferenceMap, ChannelType};

/// Value object: Environment ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentId(pub String);

/// Value object: Organization ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationId(pub String);

/// Value object: Subscriber ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub String);

/// Value object: Workflow ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowId(pub String);

/// Value object: Message template ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageTemplateId(pub String);

/// One stage of a notification workflow, targeting a single channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    /// ID of the step
    pub id: String,

    /// Whether this step participates in delivery
    pub active: bool,

    /// Channel the step delivers on, when resolved directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelType>,

    /// Message template backing this step; used as a secondary channel
    /// lookup when `channel` is not embedded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_template_id: Option<MessageTemplateId>,
}

/// A configured notification workflow (template).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// ID of the workflow
    pub id: WorkflowId,

    /// Human-readable name of the workflow
    pub name: String,

    /// Whether the workflow delivers regardless of subscriber opt-out.
    /// Absent in older serialized records, which means critical.
    #[serde(default = "default_true")]
    pub critical: bool,

    /// Whether the workflow is live. Absent means active.
    #[serde(default = "default_true")]
    pub active: bool,

    /// The ordered steps in this workflow
    pub steps: Vec<StepDefinition>,

    /// Workflow-level default channel preference, set by the author.
    /// May cover only a subset of channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_preference: Option<ChannelPreferenceMap>,
}

fn default_true() -> bool {
    true
}

/// A message template referenced by workflow steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    /// ID of the template
    pub id: MessageTemplateId,

    /// Channel the template renders for
    pub channel: ChannelType,
}

/// A notification recipient within one environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    /// ID of the subscriber
    pub id: SubscriberId,

    /// Environment the subscriber belongs to
    pub environment_id: EnvironmentId,

    /// Creation timestamp, owned by the storage collaborator
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp, owned by the storage collaborator
    pub updated_at: DateTime<Utc>,
}

/// Admin member of an organization, used to attribute analytics events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationAdmin {
    /// User ID of the admin
    pub user_id: String,
}
