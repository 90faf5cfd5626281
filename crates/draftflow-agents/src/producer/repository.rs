use serde::{Deserialize, Serialize};
use serde_json::json;

use draftflow_core::config::DraftflowConfig;
use draftflow_core::model::{NewRecord, Platform, PlatformLimits, RecordKind};
use draftflow_core::storage::RecordStore;
use draftflow_core::summary::PassSummary;

use super::{store_new, Outcome};

const COMMIT_PILLAR: &str = "development_process";
const TWITTER_COMMIT_CHARS: usize = 100;

/// Recent activity for one repository, as read from an activity file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoActivity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub url: String,
    /// Newest first.
    #[serde(default)]
    pub commits: Vec<CommitInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
}

impl CommitInfo {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// Angle a repository post is written from, picked by keywords in the
/// repository name and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepoTheme {
    JobInnovation,
    SoccerTech,
    Backend,
    Ai,
    General,
}

impl RepoTheme {
    /// First matching rule wins.
    const RULES: &'static [(RepoTheme, &'static [&'static str])] = &[
        (RepoTheme::JobInnovation, &["job", "jobs", "career", "careers", "work"]),
        (RepoTheme::SoccerTech, &["soccer", "football", "sport", "sports"]),
        (RepoTheme::Backend, &["api", "backend", "service", "services"]),
        (RepoTheme::Ai, &["ai", "ml", "machine learning"]),
    ];

    fn detect(repo: &RepoActivity) -> Self {
        let haystack = format!("{} {}", repo.name, repo.description).to_lowercase();
        let words: Vec<&str> = haystack
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let hit = |keyword: &str| {
            if keyword.contains(' ') {
                haystack.contains(keyword)
            } else {
                words.contains(&keyword)
            }
        };
        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|&k| hit(k)))
            .map_or(RepoTheme::General, |(theme, _)| *theme)
    }

    fn pillar(self) -> &'static str {
        match self {
            Self::JobInnovation => "jamaican_job_innovation",
            Self::SoccerTech => "soccer_tech_fusion",
            Self::Backend => "backend_architecture",
            Self::Ai => "ai_innovation",
            Self::General => "general_tech_innovation",
        }
    }

    fn compose(self, repo: &RepoActivity, platform: Platform) -> String {
        let name = &repo.name;
        let lang_tag = hashtag(&repo.language);
        match (self, platform) {
            (Self::JobInnovation, Platform::Twitter) => format!(
                "Building opportunities for Jamaican talent 🇯🇲💼 Working on {name}, \
                 connecting skilled professionals with global opportunities. \
                 {lang_tag}#JamaicanTech #BingiTech"
            ),
            (Self::SoccerTech, Platform::Twitter) => format!(
                "When soccer strategy meets software architecture ⚽️💻 {name} combines the \
                 beautiful game with data insights. {lang_tag}#SoccerTech #BingiTech"
            ),
            (Self::Backend, Platform::Twitter) => format!(
                "Clean boundaries, boring deploys 🛠️ {name} is where the backend work happens \
                 this week. {lang_tag}#Backend #BingiTech"
            ),
            (Self::Ai, Platform::Twitter) => format!(
                "AI with a Caribbean twist 🤖🇯🇲 {name} blends cutting-edge tech with cultural \
                 creativity. {lang_tag}#AI #BingiTech"
            ),
            (Self::General, Platform::Twitter) => format!(
                "Building with purpose 🚀 {name}: every commit tells a story of persistence and \
                 creativity! {lang_tag}#BingiTech #Innovation"
            ),
            (theme, _) => {
                let opener = match theme {
                    Self::JobInnovation => format!(
                        "Excited to share progress on {name}, a platform designed to showcase \
                         Jamaican talent to the world."
                    ),
                    Self::SoccerTech => format!(
                        "The beautiful game teaches us about software development. Working on \
                         {name} has shown how formation maps to system design and team \
                         coordination to service communication."
                    ),
                    Self::Backend => format!(
                        "Backend work rarely gets the spotlight. {name} is a reminder that \
                         reliable services are built one careful interface at a time."
                    ),
                    Self::Ai => format!(
                        "Innovation happens when technology meets culture. {name} is AI \
                         development with a distinctly Caribbean perspective."
                    ),
                    Self::General => {
                        format!("Every project tells a story of growth and innovation: {name}.")
                    }
                };
                let mut body = opener;
                if !repo.description.is_empty() {
                    body.push_str("\n\n");
                    body.push_str(&repo.description);
                }
                let mut footer = Vec::new();
                if !repo.language.is_empty() {
                    footer.push(format!("Built with {}", repo.language));
                }
                if !repo.url.is_empty() {
                    footer.push(repo.url.clone());
                }
                if !footer.is_empty() {
                    body.push_str("\n\n");
                    body.push_str(&footer.join(" | "));
                }
                body.push_str(&format!("\n\n{lang_tag}#BingiTech #Innovation"));
                body
            }
        }
    }
}

fn hashtag(language: &str) -> String {
    let tag: String = language.chars().filter(|c| c.is_alphanumeric()).collect();
    if tag.is_empty() {
        String::new()
    } else {
        format!("#{tag} ")
    }
}

fn commit_story(repo: &RepoActivity, commit: &CommitInfo, platform: Platform) -> String {
    let name = &repo.name;
    let message = commit.message.lines().next().unwrap_or_default();
    match platform {
        Platform::Twitter => {
            let short: String = message.chars().take(TWITTER_COMMIT_CHARS).collect();
            format!("Just pushed an update to {name} 🔄 {short} #GitCommit #BingiTech #DevLife")
        }
        _ => format!(
            "Progress update on {name}\n\nLatest commit: {}\n\nEach commit is hours of \
             problem-solving, research and iteration that nobody sees. Building with intention, \
             one commit at a time.\n\n#SoftwareDevelopment #BingiTech #DevLife",
            commit.message.trim()
        ),
    }
}

/// Writes repository showcase posts and commit stories from recent activity.
pub struct RepositoryProducer {
    limits: PlatformLimits,
    post_platforms: Vec<Platform>,
    story_platforms: Vec<Platform>,
}

impl RepositoryProducer {
    pub fn new(config: &DraftflowConfig) -> Self {
        Self {
            limits: config.platform_limits.clone(),
            post_platforms: vec![Platform::Twitter, Platform::Linkedin],
            story_platforms: vec![Platform::Linkedin],
        }
    }

    /// Platforms that get a commit story for each active repository.
    pub fn story_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.story_platforms = platforms;
        self
    }

    pub fn run<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        activity: &[RepoActivity],
    ) -> PassSummary {
        let mut summary = PassSummary::default();
        for repo in activity {
            if repo.name.trim().is_empty() {
                tracing::warn!("Skipping repository entry without a name");
                Outcome::Failed.tally(&mut summary);
                continue;
            }
            let theme = RepoTheme::detect(repo);
            tracing::debug!(repo = %repo.name, pillar = theme.pillar(), "processing repository");

            for &platform in &self.post_platforms {
                let new = NewRecord::post(
                    RecordKind::GithubPost,
                    platform,
                    theme.compose(repo, platform),
                )
                .pillar(theme.pillar())
                .extra(
                    "repository",
                    json!({
                        "name": repo.name,
                        "description": repo.description,
                        "language": repo.language,
                        "url": repo.url,
                    }),
                );
                store_new(store, new, &self.limits).tally(&mut summary);
            }

            let Some(latest) = repo.commits.first() else {
                continue;
            };
            for &platform in &self.story_platforms {
                let new = NewRecord::post(
                    RecordKind::CommitStory,
                    platform,
                    commit_story(repo, latest, platform),
                )
                .pillar(COMMIT_PILLAR)
                .extra("repository", json!({ "name": repo.name }))
                .extra(
                    "commit",
                    json!({ "message": latest.message, "sha": latest.short_sha() }),
                );
                store_new(store, new, &self.limits).tally(&mut summary);
            }
        }
        summary.log("commits");
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftflow_core::scan::Filter;
    use draftflow_core::storage::FsStore;
    use tempfile::TempDir;

    fn repo(name: &str, description: &str) -> RepoActivity {
        RepoActivity {
            name: name.into(),
            description: description.into(),
            language: "Rust".into(),
            url: format!("https://github.com/bingitech/{name}"),
            commits: vec![],
        }
    }

    #[test]
    fn test_theme_detection() {
        assert_eq!(
            RepoTheme::detect(&repo("island-jobs", "")),
            RepoTheme::JobInnovation
        );
        assert_eq!(
            RepoTheme::detect(&repo("pitchside", "Football match analytics")),
            RepoTheme::SoccerTech
        );
        assert_eq!(
            RepoTheme::detect(&repo("ledger-api", "")),
            RepoTheme::Backend
        );
        assert_eq!(
            RepoTheme::detect(&repo("reef", "Machine learning for coral maps")),
            RepoTheme::Ai
        );
        // "ai" inside another word is not a keyword hit
        assert_eq!(
            RepoTheme::detect(&repo("mail-sorter", "Maintains inbox rules")),
            RepoTheme::General
        );
    }

    #[test]
    fn test_posts_and_commit_story() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let mut active = repo("reef-mapper", "Coral segmentation on the edge");
        active.commits.push(CommitInfo {
            sha: "0123456789abcdef".into(),
            message: "Add overlay export\n\nLonger body".into(),
        });

        let summary = RepositoryProducer::new(&DraftflowConfig::default())
            .run(&store, &[active, repo("dotfiles", "")]);
        // two posts per repo, one story for the repo with commits
        assert_eq!(summary.created, 5);

        let stories = store
            .get_all(&Filter::of_kind(RecordKind::CommitStory))
            .unwrap();
        assert_eq!(stories.len(), 1);
        let story = &stories[0].record;
        assert_eq!(story.platform, Some(Platform::Linkedin));
        assert_eq!(story.pillar.as_deref(), Some(COMMIT_PILLAR));
        assert_eq!(story.extra["commit"]["sha"], "0123456");

        let posts = store
            .get_all(&Filter::of_kind(RecordKind::GithubPost))
            .unwrap();
        assert_eq!(posts.len(), 4);
        assert!(posts
            .iter()
            .all(|s| s.record.extra["repository"]["language"] == "Rust"));
    }

    #[test]
    fn test_twitter_commit_story_truncates_message() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let mut active = repo("reef-mapper", "");
        active.commits.push(CommitInfo {
            sha: "abc".into(),
            message: "m".repeat(250),
        });

        RepositoryProducer::new(&DraftflowConfig::default())
            .story_platforms(vec![Platform::Twitter])
            .run(&store, &[active]);

        let stories = store
            .get_all(&Filter::of_kind(RecordKind::CommitStory))
            .unwrap();
        assert_eq!(stories.len(), 1);
        assert!(stories[0].record.content_len() <= 280);
        assert_eq!(stories[0].record.extra["commit"]["sha"], "abc");
    }

    #[test]
    fn test_nameless_repository_counts_as_failed() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::open(tmp.path());
        let summary =
            RepositoryProducer::new(&DraftflowConfig::default()).run(&store, &[repo(" ", "")]);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 0);
    }

    #[test]
    fn test_activity_file_shape() {
        let raw =
            r#"[{"name": "reef-mapper", "commits": [{"sha": "abc1234", "message": "init"}]}]"#;
        let parsed: Vec<RepoActivity> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed[0].commits[0].short_sha(), "abc1234");
        assert!(parsed[0].language.is_empty());
    }
}
