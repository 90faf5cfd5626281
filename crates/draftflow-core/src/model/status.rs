use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a record sits in the review/publish lifecycle.
///
/// `Generated` and `Draft` are entry states (assets and posts respectively).
/// `DiscordSent` means a reviewer has been notified, `Posted` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Generated,
    Draft,
    DiscordSent,
    Posted,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Generated,
        Status::Draft,
        Status::DiscordSent,
        Status::Posted,
    ];

    fn rank(self) -> u8 {
        match self {
            Self::Generated | Self::Draft => 0,
            Self::DiscordSent => 1,
            Self::Posted => 2,
        }
    }

    /// True when moving to `next` is a step forward.
    pub fn can_advance_to(self, next: Status) -> bool {
        next.rank() > self.rank()
    }

    /// True when a write carrying `next` would move a record backwards.
    pub fn regresses_to(self, next: Status) -> bool {
        next.rank() < self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Draft => "draft",
            Self::DiscordSent => "discord_sent",
            Self::Posted => "posted",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(Status::Draft.can_advance_to(Status::DiscordSent));
        assert!(Status::Draft.can_advance_to(Status::Posted));
        assert!(Status::DiscordSent.can_advance_to(Status::Posted));
        assert!(Status::Generated.can_advance_to(Status::Posted));
    }

    #[test]
    fn test_backward_and_same_state_rejected() {
        assert!(!Status::Posted.can_advance_to(Status::Draft));
        assert!(!Status::DiscordSent.can_advance_to(Status::Draft));
        assert!(!Status::Posted.can_advance_to(Status::DiscordSent));
        assert!(!Status::Draft.can_advance_to(Status::Draft));
        assert!(!Status::Generated.can_advance_to(Status::Draft));
    }

    #[test]
    fn test_regression_check() {
        assert!(Status::Posted.regresses_to(Status::Draft));
        assert!(!Status::Draft.regresses_to(Status::Draft));
        assert!(!Status::Draft.regresses_to(Status::Posted));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Status::DiscordSent).unwrap(),
            "\"discord_sent\""
        );
        let parsed: Status = serde_json::from_str("\"posted\"").unwrap();
        assert_eq!(parsed, Status::Posted);
        assert_eq!("draft".parse::<Status>().unwrap(), Status::Draft);
    }
}
