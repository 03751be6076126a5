//!
//! Courier Core - Subscriber preference resolution for the Courier
//! notification platform
//!
//! This crate answers one question: "is channel C enabled for subscriber
//! S under workflow T". It reconciles the channels a workflow actually
//! uses, the workflow author's default preference, and the subscriber's
//! stored overrides into one effective delivery preference. It does not
//! decide whether to send a notification and it performs no sends.
//!
//! Persistence, caching backends, and analytics sinks are collaborators:
//! the traits in [`domain::repository`] and [`domain::cache`] are
//! implemented by external crates and injected into the services in
//! [`application`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - channels, workflows, preference records, and
/// collaborator interfaces
pub mod domain;

/// Application services - resolution and aggregation logic
pub mod application;

/// Error types
pub mod error;

// Re-export key types
pub use error::PreferenceError;

pub use domain::cache::{InMemorySubscriberCache, NoopSubscriberCache, SubscriberCache};
pub use domain::channel::{
    ChannelPreferenceMap, ChannelType, PreferenceOverride, PreferenceSource,
};
pub use domain::preference::{
    PreferenceResponse, ResolvedPreference, SubscriberPreference, TemplateSummary,
};
pub use domain::repository::{
    AnalyticsTracker, MessageTemplateRepository, OrganizationRepository, PreferenceRepository,
    SubscriberRepository, WorkflowRepository,
};
pub use domain::workflow::{
    EnvironmentId, MessageTemplate, MessageTemplateId, OrganizationAdmin, OrganizationId,
    StepDefinition, Subscriber, SubscriberId, WorkflowDefinition, WorkflowId,
};

// Application services
pub use application::active_channels::ActiveChannelResolver;
pub use application::batch::BatchPreferenceAggregator;
pub use application::merge::{MergedPreference, PreferenceMerger};
pub use application::resolution_service::PreferenceResolutionService;
