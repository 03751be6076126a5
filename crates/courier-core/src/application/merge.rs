//! Preference precedence algorithm
//!
//! Reconciles three configuration layers into one effective channel map:
//! the channels the workflow actually uses, the workflow author's default
//! preference, and the subscriber's stored override record.

use crate::domain::channel::{
    ChannelPreferenceMap, ChannelType, PreferenceOverride, PreferenceSource,
};
use crate::domain::preference::SubscriberPreference;

/// Output of one merge: the effective flags plus their provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPreference {
    /// Whether the subscriber receives this workflow at all
    pub enabled: bool,

    /// Effective per-channel flags, keyed only by active channels
    pub channels: ChannelPreferenceMap,

    /// Which layer each effective value came from
    pub overrides: Vec<PreferenceOverride>,
}

/// Merges active channels, workflow defaults, and subscriber overrides.
pub struct PreferenceMerger;

impl PreferenceMerger {
    /// Compute the effective preference.
    ///
    /// Precedence, in order:
    /// 1. `enabled` comes from the stored record when present, else true.
    /// 2. A stored channel map whose key count equals the active channel
    ///    count is treated as authoritative and complete; the default is
    ///    never consulted. The comparison is on key count, not key
    ///    identity.
    /// 3. Otherwise: no default means the all-enabled fallback map; a
    ///    default without a stored map is used as-is; both together are
    ///    shallow-merged with subscriber keys winning.
    /// 4. The result is pruned to the active channels, so its key set is
    ///    always a subset of them.
    pub fn merge(
        active_channels: &[ChannelType],
        default_preference: Option<&ChannelPreferenceMap>,
        stored_preference: Option<&SubscriberPreference>,
    ) -> MergedPreference {
        let enabled = stored_preference
            .map(SubscriberPreference::is_enabled)
            .unwrap_or(true);

        let stored_channels = stored_preference.and_then(|record| record.channels.as_ref());

        // Wholeness short-circuit: a full-size override map is assumed
        // to already cover every active channel.
        if let Some(stored_map) = stored_channels {
            if stored_map.len() == active_channels.len() {
                let channels = stored_map.pruned(active_channels);
                let overrides =
                    Self::overrides_for(&channels, active_channels, |_| {
                        PreferenceSource::Subscriber
                    });
                return MergedPreference {
                    enabled,
                    channels,
                    overrides,
                };
            }
        }

        let (merged, source_of): (ChannelPreferenceMap, Box<dyn Fn(ChannelType) -> PreferenceSource>) =
            match (default_preference, stored_channels) {
                // Workflows that never configured preferences fall back
                // to everything enabled.
                (None, _) => (
                    ChannelPreferenceMap::all_enabled(),
                    Box::new(|_| PreferenceSource::Template),
                ),
                (Some(default_map), None) => (
                    *default_map,
                    Box::new(|_| PreferenceSource::Template),
                ),
                (Some(default_map), Some(stored_map)) => {
                    let stored = *stored_map;
                    (
                        default_map.overlay(stored_map),
                        Box::new(move |channel| {
                            if stored.get(channel).is_some() {
                                PreferenceSource::Subscriber
                            } else {
                                PreferenceSource::Template
                            }
                        }),
                    )
                }
            };

        let channels = merged.pruned(active_channels);
        let overrides = Self::overrides_for(&channels, active_channels, source_of);

        MergedPreference {
            enabled,
            channels,
            overrides,
        }
    }

    /// Provenance entries for every effective channel, in active-channel
    /// order.
    fn overrides_for(
        channels: &ChannelPreferenceMap,
        active_channels: &[ChannelType],
        source_of: impl Fn(ChannelType) -> PreferenceSource,
    ) -> Vec<PreferenceOverride> {
        active_channels
            .iter()
            .filter(|channel| channels.get(**channel).is_some())
            .map(|&channel| PreferenceOverride {
                channel,
                source: source_of(channel),
            })
            .collect()
    }
}
