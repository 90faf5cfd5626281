use std::io::Write;

use draftflow_core::lifecycle::{advance, still_pending, Advance};
use draftflow_core::model::{Platform, Status};
use draftflow_core::storage::{RecordStore, StoredRecord};
use draftflow_core::summary::PassSummary;

use super::{pending_drafts, title_case};
use crate::error::{AgentError, DeliveryError};

/// Where drafts are sent for human review.
pub trait ReviewChannel {
    fn send(&mut self, draft: &StoredRecord) -> Result<(), DeliveryError>;
}

/// Prints a review card per draft to a writer (stdout in the CLI).
pub struct ConsoleReview<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReview<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReviewChannel for ConsoleReview<W> {
    fn send(&mut self, draft: &StoredRecord) -> Result<(), DeliveryError> {
        let rec = &draft.record;
        let platform = title_case(rec.platform.map_or("unknown", |p| p.as_str()));
        let rule = "=".repeat(50);

        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{platform} draft ({})", draft.handle)?;
        writeln!(
            self.out,
            "Pillar:   {}",
            title_case(rec.pillar.as_deref().unwrap_or("general"))
        )?;
        writeln!(self.out, "Platform: {platform}")?;
        writeln!(self.out, "Length:   {} characters", rec.content_len())?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", rec.content.as_deref().unwrap_or_default())?;
        writeln!(self.out, "{rule}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Sends every pending draft to a review channel and marks it `discord_sent`.
#[derive(Debug, Clone, Default)]
pub struct ReviewConsumer {
    platform: Option<Platform>,
}

impl ReviewConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only review drafts for `platform`.
    pub fn platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn run<S, C>(&self, store: &S, channel: &mut C) -> Result<PassSummary, AgentError>
    where
        S: RecordStore + ?Sized,
        C: ReviewChannel + ?Sized,
    {
        let mut summary = PassSummary::default();
        for draft in pending_drafts(store, self.platform, &mut summary)? {
            match review_one(store, channel, &draft) {
                Ok(true) => summary.updated += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    tracing::warn!(handle = %draft.handle, "Review failed: {e}");
                    summary.failed += 1;
                }
            }
        }
        summary.log("review");
        Ok(summary)
    }
}

/// `Ok(false)` when another process got to the draft first.
fn review_one<S, C>(store: &S, channel: &mut C, draft: &StoredRecord) -> Result<bool, AgentError>
where
    S: RecordStore + ?Sized,
    C: ReviewChannel + ?Sized,
{
    if !still_pending(store, draft, Status::DiscordSent)? {
        tracing::debug!(handle = %draft.handle, "already reviewed");
        return Ok(false);
    }
    channel.send(draft)?;
    Ok(matches!(
        advance(store, draft, Status::DiscordSent)?,
        Advance::Advanced(_)
    ))
}
