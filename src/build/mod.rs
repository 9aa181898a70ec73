pub mod cmake;
mod configure;
mod feedback;
pub mod runner;

pub use configure::{
    ARCHIVE_DIR, BUILD_DIR, BuildConfigurator, BuildOutcome, GeneratorInvocation, RUNTIME_DIR,
    candidates, configure,
};
pub use feedback::FeedbackAnalyzer;
