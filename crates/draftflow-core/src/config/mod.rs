pub mod settings;

pub use settings::{DraftflowConfig, CONFIG_FILE};
