/// Delivery channels and channel-keyed preference maps
pub mod channel;

/// Workflow, step, and subscriber domain models
pub mod workflow;

/// Stored preference records and resolution responses
pub mod preference;

/// Repository interfaces
pub mod repository;

/// Subscriber lookup cache interface
pub mod cache;
