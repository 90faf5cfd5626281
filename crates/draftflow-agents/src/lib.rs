pub mod consumer;
pub mod error;
pub mod producer;

pub use consumer::publish::{DryRunPublisher, PublishConsumer, PublishReceipt, Publisher};
pub use consumer::review::{ConsoleReview, ReviewChannel, ReviewConsumer};
pub use error::{AgentError, DeliveryError, GenerationError};
pub use producer::content::{ContentProducer, ContentStrategy, TemplateStrategy, Theme};
pub use producer::portfolio::PortfolioProducer;
pub use producer::repository::{CommitInfo, RepoActivity, RepositoryProducer};
pub use producer::visual::{
    GeneratedImage, ImageGenerator, MockImageGenerator, VisualCategory, VisualProducer,
};
