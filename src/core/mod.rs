//! Core services shared by the rest of the crate: configuration and the
//! injected id and time capabilities.

mod clock;
mod config;
mod ids;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ExportConfig, SuggestionConfig, TemplateConfig, WorkflowConfig};
pub use ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
