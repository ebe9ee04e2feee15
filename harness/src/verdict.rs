use std::fmt;

/// Which comparison a verdict is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// One highlighter call over the whole source, compared verbatim.
    WholeDocument,
    /// One call per line with continuation state, compared after normalization.
    LineByLine,
    /// The fixture could not be set up (an expectation without a source).
    Setup,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::WholeDocument => write!(f, "whole document"),
            CheckKind::LineByLine => write!(f, "line by line"),
            CheckKind::Setup => write!(f, "setup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A fixture file could not be read.
    Read(String),
    /// The highlighter reported a fault or could not be reached.
    Highlight(String),
    /// The compared renderings differ. Both are the exact strings compared.
    Mismatch { expected: String, actual: String },
    Setup(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Read(msg) => write!(f, "read error: {}", msg),
            Failure::Highlight(msg) => write!(f, "highlighter error: {}", msg),
            Failure::Mismatch { expected, actual } => write!(
                f,
                "output mismatch\n  expected: {}\n  actual:   {}",
                expected, actual
            ),
            Failure::Setup(msg) => write!(f, "setup error: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// Passed without running because the fixture is in the exception registry.
    Exempt,
    Fail(Failure),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass | Outcome::Exempt)
    }
}

/// Result of one check of one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub language: String,
    pub fixture: String,
    pub check: CheckKind,
    pub outcome: Outcome,
}

impl Verdict {
    pub fn failure(&self) -> Option<&Failure> {
        match &self.outcome {
            Outcome::Fail(failure) => Some(failure),
            Outcome::Pass | Outcome::Exempt => None,
        }
    }
}

/// Verdicts of a run, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub verdicts: Vec<Verdict>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.outcome.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.verdicts.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.outcome.is_pass())
    }

    /// The verdict for one check of one fixture, if it ran.
    pub fn find(&self, language: &str, fixture: &str, check: CheckKind) -> Option<&Verdict> {
        self.verdicts
            .iter()
            .find(|v| v.language == language && v.fixture == fixture && v.check == check)
    }
}
