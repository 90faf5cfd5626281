use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};

use draftflow_core::config::DraftflowConfig;
use draftflow_core::dedup::{identity_key_for, Deduplicator};
use draftflow_core::model::{NewRecord, Platform, PlatformLimits, RecordKind};
use draftflow_core::storage::RecordStore;
use draftflow_core::summary::PassSummary;

use super::{store_new, Outcome};
use crate::error::{AgentError, GenerationError};

const PILLAR: &str = "jamaican_tech_innovation";
const STYLE: &str = "jamaican_tech_fusion";
const COLORS: [&str; 3] = ["#009B3A", "#FED100", "#000000"];

/// Smallest valid PNG: one transparent pixel.
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Visual themes with their prompt sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualCategory {
    CodeVibes,
    SoccerTech,
    JamaicanInnovation,
    TeamBuilding,
}

impl VisualCategory {
    pub const ALL: [VisualCategory; 4] = [
        VisualCategory::CodeVibes,
        VisualCategory::SoccerTech,
        VisualCategory::JamaicanInnovation,
        VisualCategory::TeamBuilding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeVibes => "code_vibes",
            Self::SoccerTech => "soccer_tech",
            Self::JamaicanInnovation => "jamaican_innovation",
            Self::TeamBuilding => "team_building",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::CodeVibes => "code-vibes",
            Self::SoccerTech => "soccer-tech",
            Self::JamaicanInnovation => "jamaican-innovation",
            Self::TeamBuilding => "team-building",
        }
    }

    pub fn prompts(&self) -> &'static [&'static str] {
        match self {
            Self::CodeVibes => &[
                "A vibrant scene of a developer coding on a laptop with Jamaican flag colors \
                 glowing from the screen. A Caribbean sunset with palm trees in the background. \
                 Professional yet tropical aesthetic.",
                "Modern minimalist workspace with a laptop displaying code highlighted in green, \
                 gold and black. A soccer ball sits beside the laptop. Tropical plants behind.",
            ],
            Self::SoccerTech => &[
                "A futuristic soccer field where the lines are made of glowing code syntax. \
                 Players as elegant geometric shapes in Jamaican colors. Sports-tech aesthetic.",
                "Soccer strategy formation displayed as a data visualization. Player positions as \
                 connected nodes in green and gold on a black technical grid.",
            ],
            Self::JamaicanInnovation => &[
                "Elegant paint strokes in Jamaican flag colors forming the shape of a lightbulb. \
                 Black background with a subtle tech grid pattern.",
                "Jamaica as a digital innovation hub: a geometric island outline with flowing \
                 data streams in green and gold.",
            ],
            Self::TeamBuilding => &[
                "Team collaboration scene with diverse developers around a modern conference \
                 table. Laptops show code themed in green, gold and black.",
                "Remote work setup on a Caribbean balcony. Clean laptop workspace with the ocean \
                 in the background.",
            ],
        }
    }

    /// Post text that accompanies a visual of this category.
    pub fn caption(&self) -> &'static str {
        match self {
            Self::CodeVibes => {
                "Building the future with Caribbean innovation \u{1f1ef}\u{1f1f2}\u{1f4bb} Every \
                 line of code tells a story of persistence and creativity. \
                 #BingiTech #JamaicanTech #CodeLife"
            }
            Self::SoccerTech => {
                "Strategy on the field, strategy in code \u{26bd}\u{1f4a1} The beautiful game \
                 teaches us about teamwork and precision in software development. \
                 #BingiTech #TechStrategy #SoccerMeetsCode"
            }
            Self::TeamBuilding => {
                "Building world-class teams with island innovation \u{1f334}\u{1f465} Remote \
                 work, Caribbean style. #BingiTech #RemoteWork #TeamBuilding"
            }
            Self::JamaicanInnovation => {
                "Innovation flows through everything we build \u{1f680} Bringing Jamaican \
                 creativity to the global tech stage. #BingiTech #Innovation #JamaicanExcellence"
            }
        }
    }
}

impl std::fmt::Display for VisualCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for VisualCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.short_name() == s || c.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|c| c.short_name()).collect();
                format!("unknown category '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// An image written to disk by a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub path: PathBuf,
    pub model: String,
}

/// Turns a prompt into an image file under `dest_dir`.
pub trait ImageGenerator {
    fn generate(
        &mut self,
        prompt: &str,
        prefix: &str,
        dest_dir: &Path,
    ) -> Result<GeneratedImage, GenerationError>;
}

/// Offline generator that writes a placeholder PNG per prompt.
#[derive(Debug, Default)]
pub struct MockImageGenerator {
    generated: usize,
}

impl MockImageGenerator {
    pub const MODEL: &'static str = "mock";

    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageGenerator for MockImageGenerator {
    fn generate(
        &mut self,
        _prompt: &str,
        prefix: &str,
        dest_dir: &Path,
    ) -> Result<GeneratedImage, GenerationError> {
        self.generated += 1;
        let name = format!(
            "{prefix}_{}_{}.png",
            Utc::now().format("%Y%m%d_%H%M%S_%6f"),
            self.generated
        );
        let path = dest_dir.join(name);
        std::fs::write(&path, PLACEHOLDER_PNG)?;
        Ok(GeneratedImage {
            path,
            model: Self::MODEL.to_string(),
        })
    }
}

/// Generates one visual per category and drafts a post around it.
///
/// Each image becomes an `asset` record (status `generated`, keyed by its
/// canonical path) plus one `visual_post` draft per platform pointing at the
/// same file. An image that already has an asset record is left alone.
pub struct VisualProducer {
    visuals_dir: PathBuf,
    limits: PlatformLimits,
    categories: Vec<VisualCategory>,
    platforms: Vec<Platform>,
    count: usize,
}

impl VisualProducer {
    pub fn new(config: &DraftflowConfig, visuals_dir: impl Into<PathBuf>) -> Self {
        Self {
            visuals_dir: visuals_dir.into(),
            limits: config.platform_limits.clone(),
            categories: VisualCategory::ALL.to_vec(),
            platforms: vec![Platform::Twitter, Platform::Linkedin],
            count: 1,
        }
    }

    /// Only generate for these categories.
    pub fn categories(mut self, categories: Vec<VisualCategory>) -> Self {
        self.categories = categories;
        self
    }

    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Images per category; prompts are reused in order when exhausted.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn run<S, G>(&self, store: &S, generator: &mut G) -> Result<PassSummary, AgentError>
    where
        S: RecordStore + ?Sized,
        G: ImageGenerator + ?Sized,
    {
        std::fs::create_dir_all(&self.visuals_dir)?;

        let mut summary = PassSummary::default();
        for &category in &self.categories {
            let prompts = category.prompts();
            for n in 0..self.count {
                let prompt = prompts[n % prompts.len()];
                self.process(store, generator, category, prompt, &mut summary)?;
            }
        }
        summary.log("visuals");
        Ok(summary)
    }

    fn process<S, G>(
        &self,
        store: &S,
        generator: &mut G,
        category: VisualCategory,
        prompt: &str,
        summary: &mut PassSummary,
    ) -> Result<(), AgentError>
    where
        S: RecordStore + ?Sized,
        G: ImageGenerator + ?Sized,
    {
        let image = match generator.generate(prompt, category.as_str(), &self.visuals_dir) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(category = category.as_str(), "Image generation failed: {e}");
                Outcome::Failed.tally(summary);
                return Ok(());
            }
        };
        let (key, bytes) = match identity_key_for(&image.path)
            .and_then(|key| std::fs::read(&image.path).map(|bytes| (key, bytes)))
        {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Cannot read {}: {e}", image.path.display());
                Outcome::Failed.tally(summary);
                return Ok(());
            }
        };
        if Deduplicator::new(store).seen(&key, RecordKind::Asset)? {
            tracing::debug!("Asset already recorded: {key}");
            Outcome::DuplicateSkipped(key).tally(summary);
            return Ok(());
        }

        let visual = json!({
            "prompt": prompt,
            "generator": image.model,
            "category": category.as_str(),
            "style": STYLE,
            "colors": COLORS,
        });
        let mut asset = NewRecord {
            kind: RecordKind::Asset,
            local_path: Some(key.clone()),
            source_hash: Some(format!("{:x}", Sha256::digest(&bytes))),
            ..Default::default()
        }
        .pillar(PILLAR)
        .extra("visual", visual.clone());
        asset.alt_text = Some(prompt.to_string());

        let outcome = store_new(store, asset, &self.limits);
        outcome.tally(summary);
        let Outcome::Created(asset_handle) = outcome else {
            return Ok(());
        };

        for &platform in &self.platforms {
            let caption = self.limits.truncate(platform, category.caption());
            let mut post = NewRecord::post(RecordKind::VisualPost, platform, caption)
                .pillar(PILLAR)
                .media(key.clone())
                .extra("visual", visual.clone())
                .extra("asset", json!(asset_handle.as_str()));
            post.alt_text = Some(prompt.to_string());
            store_new(store, post, &self.limits).tally(summary);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftflow_core::model::Status;
    use draftflow_core::scan::Filter;
    use draftflow_core::storage::FsStore;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FsStore, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path().join("generated"));
        store.ensure_root().unwrap();
        let visuals = tmp.path().join("visuals");
        (tmp, store, visuals)
    }

    /// Always writes the same file, like a generator with a deterministic name.
    struct FixedName;

    impl ImageGenerator for FixedName {
        fn generate(
            &mut self,
            _prompt: &str,
            _prefix: &str,
            dest_dir: &Path,
        ) -> Result<GeneratedImage, GenerationError> {
            let path = dest_dir.join("fixed.png");
            std::fs::write(&path, PLACEHOLDER_PNG)?;
            Ok(GeneratedImage {
                path,
                model: "fixed".into(),
            })
        }
    }

    struct Offline;

    impl ImageGenerator for Offline {
        fn generate(
            &mut self,
            _prompt: &str,
            _prefix: &str,
            _dest_dir: &Path,
        ) -> Result<GeneratedImage, GenerationError> {
            Err(GenerationError::Failed("no API token".into()))
        }
    }

    #[test]
    fn test_asset_and_linked_posts() {
        let (_tmp, store, visuals) = setup();
        let summary = VisualProducer::new(&DraftflowConfig::default(), &visuals)
            .categories(vec![VisualCategory::SoccerTech])
            .run(&store, &mut MockImageGenerator::new())
            .unwrap();
        assert_eq!(summary.created, 3);
        assert_eq!(summary.failed, 0);

        let assets = store.get_all(&Filter::of_kind(RecordKind::Asset)).unwrap();
        assert_eq!(assets.len(), 1);
        let asset = &assets[0];
        assert_eq!(asset.record.status(), Status::Generated);
        assert_eq!(asset.record.platform, None);
        let key = asset.record.local_path.clone().unwrap();
        assert!(Path::new(&key).is_file());
        assert!(key.contains("soccer_tech_"));
        assert_eq!(asset.record.extra["visual"]["generator"], "mock");
        assert_eq!(asset.record.extra["visual"]["category"], "soccer_tech");

        let posts = store.get_all(&Filter::of_kind(RecordKind::VisualPost)).unwrap();
        assert_eq!(posts.len(), 2);
        for post in &posts {
            assert_eq!(post.record.status(), Status::Draft);
            assert_eq!(post.record.media.as_deref(), Some(key.as_str()));
            assert_eq!(post.record.extra["asset"], asset.handle.as_str());
            assert!(post.record.content.as_deref().unwrap().contains("#SoccerMeetsCode"));
        }
    }

    #[test]
    fn test_existing_asset_not_recorded_twice() {
        let (_tmp, store, visuals) = setup();
        let producer = VisualProducer::new(&DraftflowConfig::default(), &visuals)
            .categories(vec![VisualCategory::CodeVibes])
            .platforms(vec![Platform::Twitter]);

        assert_eq!(producer.run(&store, &mut FixedName).unwrap().created, 2);
        let summary = producer.run(&store, &mut FixedName).unwrap();
        assert_eq!(summary.created, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(store.get_all(&Filter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_generator_failure_counted() {
        let (_tmp, store, visuals) = setup();
        let summary = VisualProducer::new(&DraftflowConfig::default(), &visuals)
            .count(2)
            .run(&store, &mut Offline)
            .unwrap();
        assert_eq!(summary.failed, 8);
        assert_eq!(summary.created, 0);
        assert!(store.get_all(&Filter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_unusable_visuals_dir_aborts_pass() {
        let (_tmp, store, visuals) = setup();
        std::fs::write(&visuals, b"").unwrap();
        assert!(matches!(
            VisualProducer::new(&DraftflowConfig::default(), &visuals)
                .run(&store, &mut MockImageGenerator::new()),
            Err(AgentError::Io(_))
        ));
    }

    #[test]
    fn test_count_cycles_prompts() {
        let (_tmp, store, visuals) = setup();
        VisualProducer::new(&DraftflowConfig::default(), &visuals)
            .categories(vec![VisualCategory::TeamBuilding])
            .platforms(vec![Platform::Linkedin])
            .count(3)
            .run(&store, &mut MockImageGenerator::new())
            .unwrap();

        let prompts: Vec<_> = store
            .get_all(&Filter::of_kind(RecordKind::Asset))
            .unwrap()
            .into_iter()
            .map(|s| s.record.extra["visual"]["prompt"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(prompts.len(), 3);
        let team = VisualCategory::TeamBuilding.prompts();
        assert_eq!(prompts.iter().filter(|p| p.as_str() == team[0]).count(), 2);
        assert_eq!(prompts.iter().filter(|p| p.as_str() == team[1]).count(), 1);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(
            "soccer-tech".parse::<VisualCategory>().unwrap(),
            VisualCategory::SoccerTech
        );
        assert_eq!(
            "team_building".parse::<VisualCategory>().unwrap(),
            VisualCategory::TeamBuilding
        );
        assert!("reggae".parse::<VisualCategory>().is_err());
    }
}
