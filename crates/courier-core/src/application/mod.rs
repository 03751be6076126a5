/// Active channel resolution for workflows
pub mod active_channels;

/// Preference precedence and merging
pub mod merge;

/// Per-workflow preference resolution service
pub mod resolution_service;

/// Organization-wide batch aggregation
pub mod batch;
