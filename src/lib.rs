pub mod cache;
pub mod config;
pub mod error;
pub mod mock;
pub mod rpm;
pub mod rpmlint;
pub mod sandbox;
pub mod settings;

pub use error::MockError;
pub use mock::Mock;
pub use rpmlint::{LintReport, LintSummary};
pub use settings::Settings;
