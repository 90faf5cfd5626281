pub mod platform;
pub mod record;
pub mod status;
pub(crate) mod timestamp;

pub use platform::{Platform, PlatformLimits};
pub use record::{NewRecord, Record, RecordKind};
pub use status::Status;
