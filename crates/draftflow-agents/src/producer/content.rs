use std::str::FromStr;

use draftflow_core::config::DraftflowConfig;
use draftflow_core::model::{NewRecord, Platform, PlatformLimits, RecordKind};
use draftflow_core::storage::RecordStore;
use draftflow_core::summary::PassSummary;

use super::{store_new, Outcome};

/// Brand content pillars a themed post can be written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    TeamLeadership,
    ProblemSolving,
    TechnologyTrends,
}

impl Theme {
    pub const ALL: [Theme; 3] = [
        Theme::TeamLeadership,
        Theme::ProblemSolving,
        Theme::TechnologyTrends,
    ];

    /// Pillar tag written to records.
    pub fn pillar(&self) -> &'static str {
        match self {
            Self::TeamLeadership => "team_leadership_in_tech",
            Self::ProblemSolving => "problem_solving_methodologies",
            Self::TechnologyTrends => "technology_trends_analysis",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::TeamLeadership => "team-leadership",
            Self::ProblemSolving => "problem-solving",
            Self::TechnologyTrends => "technology-trends",
        }
    }

    /// The template set backing this theme.
    pub fn strategy(&self) -> TemplateStrategy {
        match self {
            Self::TeamLeadership => TemplateStrategy {
                pillar: self.pillar(),
                twitter: &[
                    "Building effective tech teams isn't just about technical skills. \
                     Psychological safety drives innovation more than any framework or tool. \
                     #TechLeadership #BingiTech",
                    "Blameless post-mortems changed how our team learns: focus on systems, \
                     not individuals, and the hard lessons start getting shared. \
                     #TeamBuilding #BingiTech",
                ],
                linkedin: Some(
                    "Building effective tech teams isn't just about technical skills.\n\n\
                     Over the past year we've learned that psychological safety drives \
                     innovation more than any framework or tool. When developers feel safe \
                     to share incomplete ideas, ask questions, and admit mistakes, the whole \
                     team moves faster.\n\n\
                     What we put in place:\n\
                     • Weekly learning moments where people share recent discoveries\n\
                     • Blameless post-mortems that focus on systems, not individuals\n\
                     • Dedicated time for experimentation\n\n\
                     What practices have worked for your team?\n\n\
                     #TechLeadership #TeamBuilding #BingiTech",
                ),
            },
            Self::ProblemSolving => TemplateStrategy {
                pillar: self.pillar(),
                twitter: &[
                    "Most technical problems are communication problems in disguise. \
                     Define the real problem before touching the code. \
                     #ProblemSolving #BingiTech",
                    "Change one variable at a time. It feels slow and it is still the fastest \
                     way to find a root cause. #Debugging #BingiTech",
                ],
                linkedin: Some(
                    "Every complex technical problem follows a pattern.\n\n\
                     1. Define the real problem: what looks broken is often not the root cause\n\
                     2. Map the system and how its parts interact\n\
                     3. Isolate variables and change one thing at a time\n\
                     4. Document everything\n\
                     5. Share the solution so one person's lesson becomes team knowledge\n\n\
                     What's your approach to systematic problem-solving?\n\n\
                     #ProblemSolving #TechnicalLeadership #BingiTech",
                ),
            },
            Self::TechnologyTrends => TemplateStrategy {
                pillar: self.pillar(),
                twitter: &[
                    "AI pair programming is interesting, but it's not replacing the need for \
                     deep technical thinking. It's amplifying our ability to explore solutions \
                     faster. #AI #Development #BingiTech",
                    "Serverless architecture has been a journey. The promise is real, but the \
                     learning curve is steeper than expected. #Serverless #TechTrends",
                ],
                linkedin: None,
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.short_name() == s || t.pillar() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|t| t.short_name()).collect();
                format!("unknown theme '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Turns a theme into post text for a platform.
pub trait ContentStrategy {
    fn pillar(&self) -> &str;

    /// Text for `platform`, or `None` when this strategy has nothing for it.
    /// `variant` picks between alternatives where there are several.
    fn compose(&self, platform: Platform, variant: usize) -> Option<String>;
}

/// Canned copy per platform.
#[derive(Debug, Clone)]
pub struct TemplateStrategy {
    pub pillar: &'static str,
    pub twitter: &'static [&'static str],
    pub linkedin: Option<&'static str>,
}

impl ContentStrategy for TemplateStrategy {
    fn pillar(&self) -> &str {
        self.pillar
    }

    fn compose(&self, platform: Platform, variant: usize) -> Option<String> {
        match platform {
            Platform::Twitter if !self.twitter.is_empty() => {
                Some(self.twitter[variant % self.twitter.len()].to_string())
            }
            Platform::Linkedin => self.linkedin.map(String::from),
            _ => None,
        }
    }
}

/// Writes one themed text post per configured platform.
///
/// The theme is resolved to a strategy once, when the producer is built.
pub struct ContentProducer {
    strategy: Box<dyn ContentStrategy>,
    limits: PlatformLimits,
    platforms: Vec<Platform>,
    variant: usize,
}

impl ContentProducer {
    pub fn new(config: &DraftflowConfig, theme: Theme) -> Self {
        Self::with_strategy(config, Box::new(theme.strategy()))
    }

    pub fn with_strategy(config: &DraftflowConfig, strategy: Box<dyn ContentStrategy>) -> Self {
        Self {
            strategy,
            limits: config.platform_limits.clone(),
            platforms: vec![Platform::Twitter, Platform::Linkedin],
            variant: 0,
        }
    }

    /// Restrict output to these platforms.
    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Choose which template alternative to use.
    pub fn variant(mut self, variant: usize) -> Self {
        self.variant = variant;
        self
    }

    pub fn run<S: RecordStore + ?Sized>(&self, store: &S) -> PassSummary {
        let mut summary = PassSummary::default();
        for &platform in &self.platforms {
            let outcome = match self.strategy.compose(platform, self.variant) {
                Some(content) => store_new(
                    store,
                    NewRecord::post(RecordKind::TextPost, platform, content)
                        .pillar(self.strategy.pillar()),
                    &self.limits,
                ),
                None => {
                    tracing::debug!(
                        pillar = self.strategy.pillar(),
                        %platform,
                        "no template for platform"
                    );
                    Outcome::Skipped
                }
            };
            outcome.tally(&mut summary);
        }
        summary.log("generate");
        summary
    }
}
