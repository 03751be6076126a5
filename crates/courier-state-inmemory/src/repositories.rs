use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use courier_core::{
    domain::preference::SubscriberPreference,
    domain::repository::{
        AnalyticsTracker, MessageTemplateRepository, OrganizationRepository, PreferenceRepository,
        SubscriberRepository, WorkflowRepository,
    },
    domain::workflow::{
        EnvironmentId, MessageTemplate, MessageTemplateId, OrganizationAdmin, OrganizationId,
        Subscriber, SubscriberId, WorkflowDefinition, WorkflowId,
    },
    PreferenceError,
};

/// Subscribers keyed by (environment, subscriber)
pub type SubscriberStore = Arc<RwLock<HashMap<(String, String), Subscriber>>>;

/// Preference records keyed by (environment, subscriber, workflow)
pub type PreferenceStore = Arc<RwLock<HashMap<(String, String, String), SubscriberPreference>>>;

/// Message templates keyed by (environment, template)
pub type MessageTemplateStore = Arc<RwLock<HashMap<(String, String), MessageTemplate>>>;

/// Workflows with their owning (organization, environment), in insertion order
pub type WorkflowStore = Arc<RwLock<Vec<(String, String, WorkflowDefinition)>>>;

/// Organization admins keyed by organization
pub type AdminStore = Arc<RwLock<HashMap<String, OrganizationAdmin>>>;

/// In-memory implementation of the SubscriberRepository
pub struct InMemorySubscriberRepository {
    subscribers: SubscriberStore,
}

impl InMemorySubscriberRepository {
    /// Create a repository over a shared subscriber store
    pub fn new(subscribers: SubscriberStore) -> Self {
        Self { subscribers }
    }
}

#[async_trait]
impl SubscriberRepository for InMemorySubscriberRepository {
    async fn find_by_id(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
    ) -> Result<Option<Subscriber>, PreferenceError> {
        let subscribers = self.subscribers.read().await;
        Ok(subscribers
            .get(&(environment_id.0.clone(), subscriber_id.0.clone()))
            .cloned())
    }
}

/// In-memory implementation of the PreferenceRepository
pub struct InMemoryPreferenceRepository {
    preferences: PreferenceStore,
}

impl InMemoryPreferenceRepository {
    /// Create a repository over a shared preference store
    pub fn new(preferences: PreferenceStore) -> Self {
        Self { preferences }
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryPreferenceRepository {
    async fn find(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
        workflow_id: &WorkflowId,
    ) -> Result<Option<SubscriberPreference>, PreferenceError> {
        let preferences = self.preferences.read().await;
        Ok(preferences
            .get(&(
                environment_id.0.clone(),
                subscriber_id.0.clone(),
                workflow_id.0.clone(),
            ))
            .cloned())
    }
}

/// In-memory implementation of the MessageTemplateRepository
pub struct InMemoryMessageTemplateRepository {
    templates: MessageTemplateStore,
}

impl InMemoryMessageTemplateRepository {
    /// Create a repository over a shared template store
    pub fn new(templates: MessageTemplateStore) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl MessageTemplateRepository for InMemoryMessageTemplateRepository {
    async fn find_by_ids(
        &self,
        environment_id: &EnvironmentId,
        ids: &[MessageTemplateId],
    ) -> Result<Vec<MessageTemplate>, PreferenceError> {
        let templates = self.templates.read().await;

        // Found templates come back in requested-id order; missing ids
        // are skipped
        let found = ids
            .iter()
            .filter_map(|id| {
                templates
                    .get(&(environment_id.0.clone(), id.0.clone()))
                    .cloned()
            })
            .collect::<Vec<_>>();

        debug!(
            requested = ids.len(),
            found = found.len(),
            "Message template batch lookup"
        );

        Ok(found)
    }
}

/// In-memory implementation of the WorkflowRepository
pub struct InMemoryWorkflowRepository {
    workflows: WorkflowStore,
}

impl InMemoryWorkflowRepository {
    /// Create a repository over a shared workflow store
    pub fn new(workflows: WorkflowStore) -> Self {
        Self { workflows }
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn list_active(
        &self,
        organization_id: &OrganizationId,
        environment_id: &EnvironmentId,
    ) -> Result<Vec<WorkflowDefinition>, PreferenceError> {
        let workflows = self.workflows.read().await;
        Ok(workflows
            .iter()
            .filter(|(organization, environment, workflow)| {
                organization == &organization_id.0
                    && environment == &environment_id.0
                    && workflow.active
            })
            .map(|(_, _, workflow)| workflow.clone())
            .collect())
    }
}

/// In-memory implementation of the OrganizationRepository
pub struct InMemoryOrganizationRepository {
    admins: AdminStore,
}

impl InMemoryOrganizationRepository {
    /// Create a repository over a shared admin store
    pub fn new(admins: AdminStore) -> Self {
        Self { admins }
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn find_admin(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<OrganizationAdmin>, PreferenceError> {
        let admins = self.admins.read().await;
        Ok(admins.get(&organization_id.0).cloned())
    }
}

/// One event captured by the recording tracker
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    /// Event name
    pub event: String,

    /// Actor the event was attributed to
    pub actor_id: String,

    /// Event properties
    pub properties: serde_json::Value,
}

/// Analytics tracker that records events in memory.
///
/// Useful for development and for asserting on emissions in tests.
pub struct RecordingAnalyticsTracker {
    events: Arc<RwLock<Vec<RecordedEvent>>>,
}

impl RecordingAnalyticsTracker {
    /// Create an empty recording tracker
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of every recorded event, in emission order
    pub async fn events(&self) -> Vec<RecordedEvent> {
        self.events.read().await.clone()
    }
}

impl Default for RecordingAnalyticsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsTracker for RecordingAnalyticsTracker {
    async fn track(
        &self,
        event: &str,
        actor_id: &str,
        properties: serde_json::Value,
    ) -> Result<(), PreferenceError> {
        let mut events = self.events.write().await;
        events.push(RecordedEvent {
            event: event.to_string(),
            actor_id: actor_id.to_string(),
            properties,
        });
        Ok(())
    }
}
