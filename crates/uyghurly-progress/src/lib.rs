pub mod admin;
pub mod error;
pub mod service;
pub mod settings;
pub mod stats;
pub mod tracker;

pub use error::ProgressError;
pub use service::ProgressService;
pub use settings::{FontSize, Settings, Theme};
pub use stats::ProgressSummary;
pub use tracker::ProgressTracker;

#[cfg(test)]
mod tests;
