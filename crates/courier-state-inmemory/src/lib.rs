//! In-memory state implementations for the Courier platform
//!
//! This crate provides in-memory implementations of the collaborator
//! interfaces defined in the courier-core crate. It is primarily useful
//! for development, testing, and simple deployments where persistence is
//! not required.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Repository implementations
pub mod repositories;
pub use repositories::{
    InMemoryMessageTemplateRepository, InMemoryOrganizationRepository,
    InMemoryPreferenceRepository, InMemorySubscriberRepository, InMemoryWorkflowRepository,
    RecordedEvent, RecordingAnalyticsTracker,
};

use courier_core::{
    domain::preference::SubscriberPreference,
    domain::repository::{
        MessageTemplateRepository, OrganizationRepository, PreferenceRepository,
        SubscriberRepository, WorkflowRepository,
    },
    domain::workflow::{
        EnvironmentId, MessageTemplate, OrganizationAdmin, OrganizationId, Subscriber,
        WorkflowDefinition,
    },
};

use repositories::{
    AdminStore, MessageTemplateStore, PreferenceStore, SubscriberStore, WorkflowStore,
};

/// Provider for in-memory collaborator repositories.
///
/// Repositories created from one provider share the same storage, so
/// records seeded through the provider are visible to every repository.
pub struct InMemoryStoreProvider {
    // Shared storage for subscribers
    subscribers: SubscriberStore,

    // Shared storage for preference records
    preferences: PreferenceStore,

    // Shared storage for message templates
    message_templates: MessageTemplateStore,

    // Shared storage for workflows, in insertion order
    workflows: WorkflowStore,

    // Shared storage for organization admins
    admins: AdminStore,
}

impl InMemoryStoreProvider {
    /// Create a new empty in-memory store provider
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            preferences: Arc::new(RwLock::new(HashMap::new())),
            message_templates: Arc::new(RwLock::new(HashMap::new())),
            workflows: Arc::new(RwLock::new(Vec::new())),
            admins: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create repositories for use with the resolution services
    pub fn create_repositories(
        &self,
    ) -> (
        Arc<dyn SubscriberRepository>,
        Arc<dyn PreferenceRepository>,
        Arc<dyn MessageTemplateRepository>,
        Arc<dyn WorkflowRepository>,
        Arc<dyn OrganizationRepository>,
    ) {
        (
            Arc::new(InMemorySubscriberRepository::new(self.subscribers.clone())),
            Arc::new(InMemoryPreferenceRepository::new(self.preferences.clone())),
            Arc::new(InMemoryMessageTemplateRepository::new(
                self.message_templates.clone(),
            )),
            Arc::new(InMemoryWorkflowRepository::new(self.workflows.clone())),
            Arc::new(InMemoryOrganizationRepository::new(self.admins.clone())),
        )
    }

    /// Seed a subscriber
    pub async fn add_subscriber(&self, subscriber: Subscriber) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(
            (subscriber.environment_id.0.clone(), subscriber.id.0.clone()),
            subscriber,
        );
    }

    /// Seed a stored preference record
    pub async fn add_preference(&self, preference: SubscriberPreference) {
        let mut preferences = self.preferences.write().await;
        preferences.insert(
            (
                preference.environment_id.0.clone(),
                preference.subscriber_id.0.clone(),
                preference.workflow_id.0.clone(),
            ),
            preference,
        );
    }

    /// Seed a message template
    pub async fn add_message_template(
        &self,
        environment_id: &EnvironmentId,
        template: MessageTemplate,
    ) {
        let mut templates = self.message_templates.write().await;
        templates.insert(
            (environment_id.0.clone(), template.id.0.clone()),
            template,
        );
    }

    /// Seed a workflow for an organization's environment
    pub async fn add_workflow(
        &self,
        organization_id: &OrganizationId,
        environment_id: &EnvironmentId,
        workflow: WorkflowDefinition,
    ) {
        let mut workflows = self.workflows.write().await;
        workflows.push((
            organization_id.0.clone(),
            environment_id.0.clone(),
            workflow,
        ));
    }

    /// Seed the admin of an organization
    pub async fn set_admin(&self, organization_id: &OrganizationId, admin: OrganizationAdmin) {
        let mut admins = self.admins.write().await;
        admins.insert(organization_id.0.clone(), admin);
    }
}

impl Default for InMemoryStoreProvider {
    fn default() -> Self {
        Self::new()
    }
}
