use std::sync::Arc;

use crate::{
    application::active_channels::ActiveChannelResolver,
    application::merge::PreferenceMerger,
    domain::cache::SubscriberCache,
    domain::preference::{PreferenceResponse, ResolvedPreference, TemplateSummary},
    domain::repository::{MessageTemplateRepository, PreferenceRepository, SubscriberRepository},
    domain::workflow::{EnvironmentId, Subscriber, SubscriberId, WorkflowDefinition},
    PreferenceError,
};

/// Resolves the effective delivery preference for one subscriber and one
/// workflow.
pub struct PreferenceResolutionService {
    /// Repository for subscribers
    subscriber_repo: Arc<dyn SubscriberRepository>,

    /// Repository for stored preference records
    preference_repo: Arc<dyn PreferenceRepository>,

    /// Active channel resolution
    channel_resolver: ActiveChannelResolver,

    /// Memoized subscriber lookups
    subscriber_cache: Arc<dyn SubscriberCache>,
}

impl PreferenceResolutionService {
    /// Create a new preference resolution service
    pub fn new(
        subscriber_repo: Arc<dyn SubscriberRepository>,
        preference_repo: Arc<dyn PreferenceRepository>,
        message_template_repo: Arc<dyn MessageTemplateRepository>,
        subscriber_cache: Arc<dyn SubscriberCache>,
    ) -> Self {
        Self {
            subscriber_repo,
            preference_repo,
            channel_resolver: ActiveChannelResolver::new(message_template_repo),
            subscriber_cache,
        }
    }

    /// Resolve the effective preference for (environment, subscriber,
    /// workflow).
    ///
    /// A pre-fetched subscriber can be passed in to skip the lookup,
    /// which the batch path uses to resolve the subscriber once.
    pub async fn execute(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
        workflow: &WorkflowDefinition,
        subscriber: Option<Subscriber>,
    ) -> Result<PreferenceResponse, PreferenceError> {
        let active_channels = self
            .channel_resolver
            .resolve(environment_id, workflow)
            .await?;

        let subscriber = match subscriber {
            Some(subscriber) => subscriber,
            None => self.resolve_subscriber(environment_id, subscriber_id).await?,
        };

        let stored_preference = self
            .preference_repo
            .find(environment_id, &subscriber.id, &workflow.id)
            .await?;

        let merged = PreferenceMerger::merge(
            &active_channels,
            workflow.default_preference.as_ref(),
            stored_preference.as_ref(),
        );

        tracing::debug!(
            workflow_id = %workflow.id.0,
            subscriber_id = %subscriber.id.0,
            enabled = merged.enabled,
            active_channels = active_channels.len(),
            "Resolved subscriber preference"
        );

        Ok(PreferenceResponse {
            template: TemplateSummary {
                id: workflow.id.clone(),
                name: workflow.name.clone(),
                critical: workflow.critical,
            },
            preference: ResolvedPreference {
                enabled: merged.enabled,
                channels: merged.channels,
                overrides: merged.overrides,
            },
        })
    }

    /// Fetch a subscriber through the cache, failing when the subscriber
    /// does not exist in the environment.
    pub async fn resolve_subscriber(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
    ) -> Result<Subscriber, PreferenceError> {
        if let Some(cached) = self
            .subscriber_cache
            .get(environment_id, subscriber_id)
            .await
        {
            return Ok(cached);
        }

        let subscriber = self
            .subscriber_repo
            .find_by_id(environment_id, subscriber_id)
            .await?
            .ok_or_else(|| {
                PreferenceError::SubscriberNotFound(format!(
                    "{} in environment {}",
                    subscriber_id.0, environment_id.0
                ))
            })?;

        self.subscriber_cache.insert(subscriber.clone()).await;

        Ok(subscriber)
    }
}
