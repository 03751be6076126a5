//! Collaborator traits consumed by the preference resolution core
//!
//! This module defines the interfaces the core reads through. External
//! crates implement these traits to provide concrete persistence and
//! analytics backends; the core itself owns no storage.

use async_trait::async_trait;

use super::preference::SubscriberPreference;
use super::workflow::{
    EnvironmentId, MessageTemplate, MessageTemplateId, OrganizationAdmin, OrganizationId,
    Subscriber, SubscriberId, WorkflowDefinition, WorkflowId,
};
use crate::PreferenceError;

/// Repository for subscribers
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Find a subscriber by ID within an environment
    async fn find_by_id(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
    ) -> Result<Option<Subscriber>, PreferenceError>;
}

/// Repository for stored subscriber preference records
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Find the preference record for one (environment, subscriber,
    /// workflow) combination
    async fn find(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
        workflow_id: &WorkflowId,
    ) -> Result<Option<SubscriberPreference>, PreferenceError>;
}

/// Repository for message templates
#[async_trait]
pub trait MessageTemplateRepository: Send + Sync {
    /// Batched lookup of message templates by their IDs
    async fn find_by_ids(
        &self,
        environment_id: &EnvironmentId,
        ids: &[MessageTemplateId],
    ) -> Result<Vec<MessageTemplate>, PreferenceError>;
}

/// Repository for workflow definitions
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// List the active workflows of an organization's environment, in
    /// storage order
    async fn list_active(
        &self,
        organization_id: &OrganizationId,
        environment_id: &EnvironmentId,
    ) -> Result<Vec<WorkflowDefinition>, PreferenceError>;
}

/// Repository for organization membership
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Find the admin member of an organization, if any
    async fn find_admin(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<OrganizationAdmin>, PreferenceError>;
}

/// Sink for product analytics events
#[async_trait]
pub trait AnalyticsTracker: Send + Sync {
    /// Record one event attributed to an actor.
    ///
    /// Callers treat this as fire-and-forget; errors are logged and
    /// swallowed, never propagated into the resolution path.
    async fn track(
        &self,
        event: &str,
        actor_id: &str,
        properties: serde_json::Value,
    ) -> Result<(), PreferenceError>;
}
