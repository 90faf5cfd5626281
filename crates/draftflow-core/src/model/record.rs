use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::platform::{Platform, PlatformLimits};
use super::status::Status;
use super::timestamp;
use crate::error::{DocumentError, TransitionError, ValidationError};

/// Keys owned by [`Record`]; producer-supplied extras never shadow them.
const RESERVED_KEYS: &[&str] = &[
    "type",
    "platform",
    "content",
    "pillar",
    "status",
    "created_at",
    "media",
    "local_path",
    "alt_text",
    "source_hash",
    "discord_sent_at",
    "posted_at",
    "post_id",
];

/// Discriminator stored under the `type` key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    TextPost,
    VisualPost,
    GithubPost,
    CommitStory,
    Asset,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::TextPost,
        RecordKind::VisualPost,
        RecordKind::GithubPost,
        RecordKind::CommitStory,
        RecordKind::Asset,
    ];

    /// Post kinds need a platform and content; assets need neither.
    pub fn is_post(self) -> bool {
        !matches!(self, Self::Asset)
    }

    pub fn initial_status(self) -> Status {
        if self.is_post() {
            Status::Draft
        } else {
            Status::Generated
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextPost => "text_post",
            Self::VisualPost => "visual_post",
            Self::GithubPost => "github_post",
            Self::CommitStory => "commit_story",
            Self::Asset => "asset",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown record type '{s}'"))
    }
}

/// Producer-supplied fields for a new record.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub kind: RecordKind,
    pub platform: Option<Platform>,
    pub content: Option<String>,
    pub pillar: Option<String>,
    pub media: Option<String>,
    pub local_path: Option<String>,
    pub alt_text: Option<String>,
    pub source_hash: Option<String>,
    pub extra: Map<String, Value>,
}

impl NewRecord {
    /// Shorthand for a post of `kind` with content for `platform`.
    pub fn post(kind: RecordKind, platform: Platform, content: impl Into<String>) -> Self {
        Self {
            kind,
            platform: Some(platform),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn pillar(mut self, pillar: impl Into<String>) -> Self {
        self.pillar = Some(pillar.into());
        self
    }

    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// One draft or asset, persisted as a single JSON document.
///
/// `status` and `created_at` are private: the former only changes through
/// [`Record::transition`], the latter is fixed by the constructor. Keys this
/// type does not know are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type", default)]
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillar: Option<String>,
    status: Status,
    #[serde(with = "timestamp::required")]
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    /// SHA-256 of the source asset. Informational; dedup keys on the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::optional"
    )]
    pub discord_sent_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::optional"
    )]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Validate `new` and stamp it with the current time.
    pub fn new(new: NewRecord, limits: &PlatformLimits) -> Result<Self, ValidationError> {
        Self::new_at(new, Utc::now(), limits)
    }

    /// Validate `new` with an explicit creation time.
    pub fn new_at(
        new: NewRecord,
        created_at: DateTime<Utc>,
        limits: &PlatformLimits,
    ) -> Result<Self, ValidationError> {
        validate(&new, limits)?;

        let mut extra = new.extra;
        extra.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

        Ok(Self {
            kind: new.kind,
            platform: new.platform,
            content: new.content,
            pillar: new.pillar,
            status: new.kind.initial_status(),
            created_at,
            media: new.media,
            local_path: new.local_path,
            alt_text: new.alt_text,
            source_hash: new.source_hash,
            discord_sent_at: None,
            posted_at: None,
            post_id: None,
            extra,
        })
    }

    /// Parse a stored document.
    ///
    /// Unknown keys are tolerated. The document must be an object carrying
    /// `status`, `created_at` and at least one of `platform` / `type`.
    /// A document without `type` is a `visual_post` when it carries `media`
    /// and a `text_post` otherwise.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let obj = value.as_object().ok_or(DocumentError::NotAnObject)?;
        for key in ["status", "created_at"] {
            if !obj.contains_key(key) {
                return Err(DocumentError::MissingKey(key));
            }
        }
        if !obj.contains_key("platform") && !obj.contains_key("type") {
            return Err(DocumentError::MissingDiscriminator);
        }
        let has_media = !obj.contains_key("type") && obj.contains_key("media");
        let mut record: Record = serde_json::from_value(value)?;
        if has_media {
            record.kind = RecordKind::VisualPost;
        }
        Ok(record)
    }

    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The value the deduplicator compares: the source media path, falling
    /// back to the generated asset path.
    pub fn identity_key(&self) -> Option<&str> {
        self.media.as_deref().or(self.local_path.as_deref())
    }

    /// Character count of the content, 0 when absent.
    pub fn content_len(&self) -> usize {
        self.content.as_deref().map_or(0, |c| c.chars().count())
    }

    /// Re-check content against the current limits (used before publishing).
    pub fn check_length(&self, limits: &PlatformLimits) -> Result<(), ValidationError> {
        match (self.platform, self.content.as_deref()) {
            (Some(platform), Some(content)) => check_length(platform, content, limits),
            _ => Ok(()),
        }
    }

    /// Move the record forward to `next`, stamping the matching timestamp.
    pub fn transition(&mut self, next: Status, at: DateTime<Utc>) -> Result<(), TransitionError> {
        if !self.status.can_advance_to(next) {
            return Err(TransitionError::NotForward {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        match next {
            Status::DiscordSent => self.discord_sent_at = Some(at),
            Status::Posted => self.posted_at = Some(at),
            Status::Generated | Status::Draft => {}
        }
        Ok(())
    }
}

fn validate(new: &NewRecord, limits: &PlatformLimits) -> Result<(), ValidationError> {
    if new.kind.is_post() {
        if new.platform.is_none() {
            return Err(ValidationError::MissingField {
                kind: new.kind,
                field: "platform",
            });
        }
        if !matches!(new.content.as_deref(), Some(c) if !c.trim().is_empty()) {
            return Err(ValidationError::MissingField {
                kind: new.kind,
                field: "content",
            });
        }
    }
    if let (Some(platform), Some(content)) = (new.platform, new.content.as_deref()) {
        check_length(platform, content, limits)?;
    }
    Ok(())
}

fn check_length(
    platform: Platform,
    content: &str,
    limits: &PlatformLimits,
) -> Result<(), ValidationError> {
    if let Some(limit) = limits.limit(platform) {
        let len = content.chars().count();
        if len > limit {
            return Err(ValidationError::ContentTooLong {
                platform,
                len,
                limit,
            });
        }
    }
    Ok(())
}
