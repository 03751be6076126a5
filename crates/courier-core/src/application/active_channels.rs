use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    domain::channel::ChannelType,
    domain::repository::MessageTemplateRepository,
    domain::workflow::{EnvironmentId, MessageTemplateId, WorkflowDefinition},
    PreferenceError,
};

/// Resolves the distinct set of channels a workflow actually exercises.
pub struct ActiveChannelResolver {
    /// Repository for the secondary template-based channel lookup
    message_template_repo: Arc<dyn MessageTemplateRepository>,
}

impl ActiveChannelResolver {
    /// Create a new active channel resolver
    pub fn new(message_template_repo: Arc<dyn MessageTemplateRepository>) -> Self {
        Self {
            message_template_repo,
        }
    }

    /// Determine the deduplicated channel list for a workflow's active
    /// steps. Disabled steps never contribute.
    ///
    /// When every active step carries an embedded channel, the result
    /// preserves first-seen step order. Otherwise one batched message
    /// template lookup covers the active steps and the order follows the
    /// lookup result, not the step sequence.
    pub async fn resolve(
        &self,
        environment_id: &EnvironmentId,
        workflow: &WorkflowDefinition,
    ) -> Result<Vec<ChannelType>, PreferenceError> {
        let active_steps: Vec<_> = workflow.steps.iter().filter(|step| step.active).collect();

        if active_steps.is_empty() {
            return Ok(Vec::new());
        }

        if active_steps.iter().all(|step| step.channel.is_some()) {
            let mut seen = HashSet::new();
            let mut channels = Vec::new();
            for step in &active_steps {
                if let Some(channel) = step.channel {
                    if seen.insert(channel) {
                        channels.push(channel);
                    }
                }
            }
            return Ok(channels);
        }

        // Fallback: one or more active steps carry no embedded channel,
        // so derive the set from their message templates in a single
        // batched lookup.
        let template_ids: Vec<MessageTemplateId> = active_steps
            .iter()
            .filter_map(|step| step.message_template_id.clone())
            .collect();

        let templates = self
            .message_template_repo
            .find_by_ids(environment_id, &template_ids)
            .await?;

        let mut seen = HashSet::new();
        let mut channels = Vec::new();
        for template in &templates {
            if seen.insert(template.channel) {
                channels.push(template.channel);
            }
        }

        tracing::debug!(
            workflow_id = %workflow.id.0,
            template_count = templates.len(),
            "Resolved active channels via message template lookup"
        );

        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::{MessageTemplate, StepDefinition, WorkflowId};
    use async_trait::async_trait;

    struct StubTemplateRepository {
        templates: Vec<MessageTemplate>,
    }

    #[async_trait]
    impl MessageTemplateRepository for StubTemplateRepository {
        async fn find_by_ids(
            &self,
            _environment_id: &EnvironmentId,
            ids: &[MessageTemplateId],
        ) -> Result<Vec<MessageTemplate>, PreferenceError> {
            Ok(self
                .templates
                .iter()
                .filter(|template| ids.contains(&template.id))
                .cloned()
                .collect())
        }
    }

    fn resolver(templates: Vec<MessageTemplate>) -> ActiveChannelResolver {
        ActiveChannelResolver::new(Arc::new(StubTemplateRepository { templates }))
    }

    fn step(id: &str, active: bool, channel: Option<ChannelType>) -> StepDefinition {
        StepDefinition {
            id: id.to_string(),
            active,
            channel,
            message_template_id: None,
        }
    }

    fn workflow(steps: Vec<StepDefinition>) -> WorkflowDefinition {
        WorkflowDefinition {
            id: WorkflowId("wf_1".to_string()),
            name: "Test Workflow".to_string(),
            critical: true,
            active: true,
            steps,
            default_preference: None,
        }
    }

    fn env() -> EnvironmentId {
        EnvironmentId("env_1".to_string())
    }

    #[tokio::test]
    async fn test_inactive_steps_never_contribute() {
        let resolver = resolver(vec![]);
        let workflow = workflow(vec![
            step("s1", true, Some(ChannelType::Email)),
            step("s2", true, Some(ChannelType::Sms)),
            step("s3", false, Some(ChannelType::Push)),
        ]);

        let channels = resolver.resolve(&env(), &workflow).await.unwrap();
        assert_eq!(channels, vec![ChannelType::Email, ChannelType::Sms]);
    }

    #[tokio::test]
    async fn test_duplicates_collapse_preserving_first_seen_order() {
        let resolver = resolver(vec![]);
        let workflow = workflow(vec![
            step("s1", true, Some(ChannelType::Sms)),
            step("s2", true, Some(ChannelType::Email)),
            step("s3", true, Some(ChannelType::Sms)),
        ]);

        let channels = resolver.resolve(&env(), &workflow).await.unwrap();
        assert_eq!(channels, vec![ChannelType::Sms, ChannelType::Email]);
    }

    #[tokio::test]
    async fn test_empty_workflow_yields_empty_set() {
        let resolver = resolver(vec![]);

        let channels = resolver.resolve(&env(), &workflow(vec![])).await.unwrap();
        assert!(channels.is_empty());

        let all_inactive = workflow(vec![step("s1", false, Some(ChannelType::Email))]);
        let channels = resolver.resolve(&env(), &all_inactive).await.unwrap();
        assert!(channels.is_empty());
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent_and_order_stable() {
        let resolver = resolver(vec![]);
        let workflow = workflow(vec![
            step("s1", true, Some(ChannelType::Push)),
            step("s2", true, Some(ChannelType::Email)),
        ]);

        let first = resolver.resolve(&env(), &workflow).await.unwrap();
        let second = resolver.resolve(&env(), &workflow).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![ChannelType::Push, ChannelType::Email]);
    }

    #[tokio::test]
    async fn test_fallback_lookup_when_step_lacks_channel() {
        let resolver = resolver(vec![
            MessageTemplate {
                id: MessageTemplateId("tmpl_1".to_string()),
                channel: ChannelType::Email,
            },
            MessageTemplate {
                id: MessageTemplateId("tmpl_2".to_string()),
                channel: ChannelType::Chat,
            },
        ]);

        let mut unresolved = step("s1", true, None);
        unresolved.message_template_id = Some(MessageTemplateId("tmpl_1".to_string()));
        let mut other = step("s2", true, None);
        other.message_template_id = Some(MessageTemplateId("tmpl_2".to_string()));
        // Embedded channel on s3 does not matter once the fallback runs;
        // its template id is what gets looked up
        let mut embedded = step("s3", true, Some(ChannelType::Email));
        embedded.message_template_id = Some(MessageTemplateId("tmpl_1".to_string()));

        let workflow = workflow(vec![unresolved, other, embedded]);
        let channels = resolver.resolve(&env(), &workflow).await.unwrap();

        assert_eq!(channels.len(), 2);
        assert!(channels.contains(&ChannelType::Email));
        assert!(channels.contains(&ChannelType::Chat));
    }
}
