use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a post is meant to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Linkedin,
    Discord,
    None,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Discord,
        Platform::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Discord => "discord",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown platform '{s}' (expected twitter, linkedin, discord or none)")
            })
    }
}

/// Maximum content length per platform, counted in characters.
///
/// Platforms without an entry are unbounded. Deserializing a partial map keeps
/// the defaults for the platforms it does not mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Platform, usize>",
    into = "BTreeMap<Platform, usize>"
)]
pub struct PlatformLimits(BTreeMap<Platform, usize>);

impl PlatformLimits {
    pub fn limit(&self, platform: Platform) -> Option<usize> {
        self.0.get(&platform).copied()
    }

    pub fn set(&mut self, platform: Platform, limit: usize) -> &mut Self {
        self.0.insert(platform, limit);
        self
    }

    /// Trim `content` so it fits the limit for `platform`.
    pub fn truncate(&self, platform: Platform, content: &str) -> String {
        match self.limit(platform) {
            Some(limit) => content.chars().take(limit).collect(),
            None => content.to_string(),
        }
    }
}

impl Default for PlatformLimits {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Platform::Twitter, 280),
            (Platform::Linkedin, 3000),
            (Platform::Discord, 2000),
        ]))
    }
}

impl From<BTreeMap<Platform, usize>> for PlatformLimits {
    fn from(overrides: BTreeMap<Platform, usize>) -> Self {
        let mut limits = Self::default();
        limits.0.extend(overrides);
        limits
    }
}

impl From<PlatformLimits> for BTreeMap<Platform, usize> {
    fn from(limits: PlatformLimits) -> Self {
        limits.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("LinkedIn".parse::<Platform>().unwrap(), Platform::Linkedin);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_default_limits() {
        let limits = PlatformLimits::default();
        assert_eq!(limits.limit(Platform::Twitter), Some(280));
        assert_eq!(limits.limit(Platform::None), None);
    }

    #[test]
    fn test_partial_limits_keep_defaults() {
        let limits: PlatformLimits = serde_json::from_str(r#"{"twitter": 140}"#).unwrap();
        assert_eq!(limits.limit(Platform::Twitter), Some(140));
        assert_eq!(limits.limit(Platform::Linkedin), Some(3000));
    }

    #[test]
    fn test_truncate_counts_chars() {
        let mut limits = PlatformLimits::default();
        limits.set(Platform::Twitter, 3);
        assert_eq!(limits.truncate(Platform::Twitter, "🇯🇲abc"), "🇯🇲a");
        assert_eq!(limits.truncate(Platform::None, "unbounded"), "unbounded");
    }
}
