use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery channel for a notification message.
///
/// This is a closed set; workflows cannot introduce channels dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Email delivery
    Email,

    /// SMS delivery
    Sms,

    /// In-app notification feed
    InApp,

    /// Chat providers (Slack, Teams, Discord, ...)
    Chat,

    /// Mobile/web push
    Push,
}

impl ChannelType {
    /// Every channel the platform knows about, in wire order.
    pub const ALL: [ChannelType; 5] = [
        ChannelType::Email,
        ChannelType::Sms,
        ChannelType::InApp,
        ChannelType::Chat,
        ChannelType::Push,
    ];

    /// Wire name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Email => "email",
            ChannelType::Sms => "sms",
            ChannelType::InApp => "in_app",
            ChannelType::Chat => "chat",
            ChannelType::Push => "push",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size channel-keyed map of enablement flags.
///
/// An absent entry means "unspecified, use the next fallback source".
/// It is NOT equivalent to `false`. Using a closed container instead of
/// an open map rules out key leakage from unrelated maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPreferenceMap {
    /// Email enablement, when specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,

    /// SMS enablement, when specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<bool>,

    /// In-app enablement, when specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_app: Option<bool>,

    /// Chat enablement, when specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<bool>,

    /// Push enablement, when specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<bool>,
}

impl ChannelPreferenceMap {
    /// Create an empty map (every channel unspecified).
    pub fn new() -> Self {
        Self::default()
    }

    /// The backward-compatibility default: every channel enabled.
    ///
    /// Applied to workflows that never configured preferences.
    pub fn all_enabled() -> Self {
        let mut map = Self::default();
        for channel in ChannelType::ALL {
            map.set(channel, true);
        }
        map
    }

    /// Get the flag for a channel, if specified.
    pub fn get(&self, channel: ChannelType) -> Option<bool> {
        match channel {
            ChannelType::Email => self.email,
            ChannelType::Sms => self.sms,
            ChannelType::InApp => self.in_app,
            ChannelType::Chat => self.chat,
            ChannelType::Push => self.push,
        }
    }

    /// Set the flag for a channel.
    pub fn set(&mut self, channel: ChannelType, enabled: bool) {
        match channel {
            ChannelType::Email => self.email = Some(enabled),
            ChannelType::Sms => self.sms = Some(enabled),
            ChannelType::InApp => self.in_app = Some(enabled),
            ChannelType::Chat => self.chat = Some(enabled),
            ChannelType::Push => self.push = Some(enabled),
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, channel: ChannelType, enabled: bool) -> Self {
        self.set(channel, enabled);
        self
    }

    /// Number of channels with a specified flag.
    pub fn len(&self) -> usize {
        ChannelType::ALL
            .iter()
            .filter(|channel| self.get(**channel).is_some())
            .count()
    }

    /// True when no channel has a specified flag.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Specified entries in wire order.
    pub fn entries(&self) -> Vec<(ChannelType, bool)> {
        ChannelType::ALL
            .iter()
            .filter_map(|&channel| self.get(channel).map(|enabled| (channel, enabled)))
            .collect()
    }

    /// Shallow overlay: `self` seeds the key set, entries from `over`
    /// win wherever both specify a channel.
    pub fn overlay(&self, over: &Self) -> Self {
        let mut merged = *self;
        for channel in ChannelType::ALL {
            if let Some(enabled) = over.get(channel) {
                merged.set(channel, enabled);
            }
        }
        merged
    }

    /// Copy of this map restricted to the given channels.
    ///
    /// Entries outside `active` are dropped so stale configuration never
    /// leaks into the effective preference.
    pub fn pruned(&self, active: &[ChannelType]) -> Self {
        let mut pruned = Self::default();
        for &channel in active {
            if let Some(enabled) = self.get(channel) {
                pruned.set(channel, enabled);
            }
        }
        pruned
    }
}

/// Which configuration layer an effective channel value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceSource {
    /// Workflow-level default preference (or the platform fallback)
    Template,

    /// Subscriber-level override record
    Subscriber,
}

/// Per-channel provenance of the effective preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceOverride {
    /// The channel this entry describes
    pub channel: ChannelType,

    /// The layer the effective value came from
    pub source: PreferenceSource,
}
