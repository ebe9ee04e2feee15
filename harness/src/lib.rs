pub mod config;
pub mod equivalence;
pub mod error;
pub mod fixture;
pub mod highlighter;
pub mod invoker;
pub mod process;
pub mod registry;
pub mod verdict;

pub use config::{HarnessConfig, HighlighterCommand};
pub use equivalence::Harness;
pub use error::{ConfigError, FixtureError, HighlightError};
pub use fixture::{Fixture, FixtureText, LanguageFixtures, discover};
pub use highlighter::{Highlighted, Highlighter};
pub use invoker::{highlight_document, highlight_fragments, highlight_lines};
pub use process::ProcessHighlighter;
pub use registry::ExceptionRegistry;
pub use verdict::{CheckKind, Failure, Outcome, Report, Verdict};
