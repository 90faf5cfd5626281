use serde::Serialize;

/// Per-pass counters reported when a producer or consumer finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub malformed: usize,
}

impl PassSummary {
    /// Nothing failed and nothing unreadable was found.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.malformed == 0
    }

    /// Emit the summary tagged with the pass name: info when clean, warn
    /// otherwise.
    pub fn log(&self, pass: &str) {
        if self.is_clean() {
            tracing::info!(
                pass,
                created = self.created,
                updated = self.updated,
                skipped = self.skipped,
                "pass complete"
            );
        } else {
            tracing::warn!(
                pass,
                created = self.created,
                updated = self.updated,
                skipped = self.skipped,
                failed = self.failed,
                malformed = self.malformed,
                "pass completed with problems"
            );
        }
    }
}

impl std::fmt::Display for PassSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "created {}, updated {}, skipped {}, failed {}, malformed {}",
            self.created, self.updated, self.skipped, self.failed, self.malformed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_clean() {
        let total = PassSummary {
            created: 3,
            skipped: 3,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(
            total.to_string(),
            "created 3, updated 0, skipped 3, failed 1, malformed 0"
        );
        assert!(!total.is_clean());
        assert!(PassSummary::default().is_clean());
    }
}
