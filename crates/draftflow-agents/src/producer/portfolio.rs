use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use draftflow_core::config::DraftflowConfig;
use draftflow_core::dedup::{identity_key_for, Deduplicator};
use draftflow_core::model::{NewRecord, Platform, PlatformLimits, RecordKind};
use draftflow_core::storage::RecordStore;
use draftflow_core::summary::PassSummary;

use super::{store_new, Outcome};
use crate::error::AgentError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const PILLAR: &str = "coralscapes";
const HASHTAGS: &str = "#CoralReef #Jetson #EdgeAI #MarineScience #AI4Good #CoralScapes";
const ALT_TEXT: &str = "Semantic segmentation overlay showing coral structures.";

/// Turns new images under a portfolio directory into visual post drafts.
///
/// Images already referenced by a stored visual post are skipped, so the
/// producer can run over the same directory repeatedly.
pub struct PortfolioProducer {
    dir: PathBuf,
    limits: PlatformLimits,
    platform: Platform,
}

impl PortfolioProducer {
    pub fn new(config: &DraftflowConfig, dir: impl Into<PathBuf>) -> Result<Self, AgentError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(AgentError::Input(format!(
                "Portfolio directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self {
            dir,
            limits: config.platform_limits.clone(),
            platform: Platform::Twitter,
        })
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn run<S: RecordStore + ?Sized>(&self, store: &S) -> Result<PassSummary, AgentError> {
        let mut known = Deduplicator::new(store).known_keys(RecordKind::VisualPost)?;
        let images = collect_images(&self.dir);
        tracing::debug!("Found {} image(s) under {}", images.len(), self.dir.display());

        let mut summary = PassSummary::default();
        for image in images {
            self.process(store, &image, &mut known).tally(&mut summary);
        }
        summary.log("portfolio");
        Ok(summary)
    }

    fn process<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        image: &Path,
        known: &mut HashSet<String>,
    ) -> Outcome {
        let key = match identity_key_for(image) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Cannot resolve {}: {e}", image.display());
                return Outcome::Failed;
            }
        };
        if known.contains(&key) {
            tracing::debug!("Already drafted: {key}");
            return Outcome::DuplicateSkipped(key);
        }
        let bytes = match std::fs::read(image) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Cannot read {}: {e}", image.display());
                return Outcome::Failed;
            }
        };

        let caption = self
            .limits
            .truncate(self.platform, &caption_for(image));
        let mut new = NewRecord::post(RecordKind::VisualPost, self.platform, caption)
            .pillar(PILLAR)
            .media(key.clone())
            .extra(
                "metadata",
                json!({
                    "source": "portfolio",
                    "generated_at": Utc::now().to_rfc3339(),
                }),
            );
        new.alt_text = Some(ALT_TEXT.to_string());
        new.source_hash = Some(format!("{:x}", Sha256::digest(&bytes)));

        let outcome = store_new(store, new, &self.limits);
        if matches!(outcome, Outcome::Created(_)) {
            known.insert(key);
        }
        outcome
    }
}

/// Image files under `dir`, recursively, in file-name order.
fn collect_images(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn caption_for(image: &Path) -> String {
    let title = image
        .file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .unwrap_or_default();
    format!(
        "Semantic-segmentation results on {title} using an NVIDIA Jetson AGX Orin.\n\
         Real-time coral mapping at the edge!\n\n{HASHTAGS}"
    )
}
