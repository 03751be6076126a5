use std::sync::Arc;

use futures::future;
use serde_json::json;

use crate::{
    application::resolution_service::PreferenceResolutionService,
    domain::preference::PreferenceResponse,
    domain::repository::{AnalyticsTracker, OrganizationRepository, WorkflowRepository},
    domain::workflow::{EnvironmentId, OrganizationId, SubscriberId},
    PreferenceError,
};

/// Analytics event emitted once per preference batch.
const PREFERENCE_USAGE_EVENT: &str = "Fetch user preferences - [Notification Center]";

/// Resolves preferences for one subscriber across every active workflow
/// of an organization's environment.
pub struct BatchPreferenceAggregator {
    /// Repository for workflow definitions
    workflow_repo: Arc<dyn WorkflowRepository>,

    /// Repository for organization membership
    organization_repo: Arc<dyn OrganizationRepository>,

    /// Sink for usage analytics
    analytics: Arc<dyn AnalyticsTracker>,

    /// Per-workflow resolution
    resolution_service: Arc<PreferenceResolutionService>,
}

impl BatchPreferenceAggregator {
    /// Create a new batch preference aggregator
    pub fn new(
        workflow_repo: Arc<dyn WorkflowRepository>,
        organization_repo: Arc<dyn OrganizationRepository>,
        analytics: Arc<dyn AnalyticsTracker>,
        resolution_service: Arc<PreferenceResolutionService>,
    ) -> Self {
        Self {
            workflow_repo,
            organization_repo,
            analytics,
            resolution_service,
        }
    }

    /// Resolve the subscriber's preference for every active workflow.
    ///
    /// Resolutions run concurrently but the result list matches the
    /// fetched workflow order. The first resolution error fails the
    /// whole batch; no partial results are returned. One usage event is
    /// emitted per batch on a detached task that can never block or fail
    /// this path.
    pub async fn execute(
        &self,
        organization_id: &OrganizationId,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
    ) -> Result<Vec<PreferenceResponse>, PreferenceError> {
        let workflows = self
            .workflow_repo
            .list_active(organization_id, environment_id)
            .await?;

        // One subscriber lookup covers the whole batch
        let subscriber = self
            .resolution_service
            .resolve_subscriber(environment_id, subscriber_id)
            .await?;

        let resolutions = workflows.iter().map(|workflow| {
            self.resolution_service.execute(
                environment_id,
                subscriber_id,
                workflow,
                Some(subscriber.clone()),
            )
        });

        let responses = future::try_join_all(resolutions).await?;

        tracing::debug!(
            organization_id = %organization_id.0,
            subscriber_id = %subscriber_id.0,
            workflow_count = workflows.len(),
            "Resolved preference batch"
        );

        self.emit_usage_event(organization_id.clone(), workflows.len());

        Ok(responses)
    }

    /// Fire-and-forget usage event, attributed to the organization
    /// admin. Lookup and tracking failures are logged and swallowed.
    fn emit_usage_event(&self, organization_id: OrganizationId, workflow_count: usize) {
        let organization_repo = self.organization_repo.clone();
        let analytics = self.analytics.clone();

        tokio::spawn(async move {
            let admin = match organization_repo.find_admin(&organization_id).await {
                Ok(Some(admin)) => admin,
                Ok(None) => {
                    tracing::debug!(
                        organization_id = %organization_id.0,
                        "No organization admin to attribute usage event to"
                    );
                    return;
                }
                Err(err) => {
                    tracing::warn!(
                        organization_id = %organization_id.0,
                        error = %err,
                        "Failed to look up organization admin for usage event"
                    );
                    return;
                }
            };

            let properties = json!({
                "_organization": organization_id.0,
                "templatesSize": workflow_count,
            });

            if let Err(err) = analytics
                .track(PREFERENCE_USAGE_EVENT, &admin.user_id, properties)
                .await
            {
                tracing::warn!(
                    organization_id = %organization_id.0,
                    error = %err,
                    "Failed to emit preference usage event"
                );
            }
        });
    }
}
