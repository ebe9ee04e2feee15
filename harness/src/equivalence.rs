use markup::normalize;

use crate::error::{FixtureError, HighlightError};
use crate::fixture::{Fixture, FixtureText, LanguageFixtures};
use crate::highlighter::Highlighter;
use crate::invoker::{highlight_document, highlight_lines};
use crate::registry::ExceptionRegistry;
use crate::verdict::{CheckKind, Failure, Outcome, Report, Verdict};

/// Checks that a highlighter renders each fixture the same way whether it
/// sees the whole source at once or one line at a time.
pub struct Harness<H> {
    highlighter: H,
    exceptions: ExceptionRegistry,
}

impl<H: Highlighter> Harness<H> {
    pub fn new(highlighter: H, exceptions: ExceptionRegistry) -> Self {
        Harness {
            highlighter,
            exceptions,
        }
    }

    pub fn exceptions(&self) -> &ExceptionRegistry {
        &self.exceptions
    }

    pub fn into_highlighter(self) -> H {
        self.highlighter
    }

    /// Run both checks on every fixture of every language, in order.
    pub async fn run(&mut self, languages: &[LanguageFixtures]) -> Report {
        let mut report = Report::default();
        for language in languages {
            report.verdicts.extend(self.check_language(language).await);
        }
        report
    }

    pub async fn check_language(&mut self, language: &LanguageFixtures) -> Vec<Verdict> {
        tracing::info!(
            language = %language.language,
            fixtures = language.fixtures.len(),
            "checking language"
        );

        let mut verdicts = Vec::new();
        for error in &language.setup_errors {
            let fixture = match error {
                FixtureError::MissingSource { source_file, .. } => source_file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                _ => String::new(),
            };
            verdicts.push(Verdict {
                language: language.language.clone(),
                fixture,
                check: CheckKind::Setup,
                outcome: Outcome::Fail(Failure::Setup(error.to_string())),
            });
        }
        for fixture in &language.fixtures {
            verdicts.extend(self.check_fixture(fixture).await);
        }
        verdicts
    }

    /// The whole-document verdict followed by the line-by-line verdict.
    pub async fn check_fixture(&mut self, fixture: &Fixture) -> [Verdict; 2] {
        let verdict = |check: CheckKind, outcome: Outcome| Verdict {
            language: fixture.language.clone(),
            fixture: fixture.name.clone(),
            check,
            outcome,
        };

        let text = match fixture.read().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    language = %fixture.language,
                    fixture = %fixture.name,
                    error = %e,
                    "cannot read fixture"
                );
                let failure = Outcome::Fail(Failure::Read(e.to_string()));
                return [
                    verdict(CheckKind::WholeDocument, failure.clone()),
                    verdict(CheckKind::LineByLine, failure),
                ];
            }
        };

        let whole = self.check_whole_document(fixture, &text).await;
        let by_line = self.check_line_by_line(fixture, &text).await;
        [
            verdict(CheckKind::WholeDocument, whole),
            verdict(CheckKind::LineByLine, by_line),
        ]
    }

    async fn check_whole_document(&mut self, fixture: &Fixture, text: &FixtureText) -> Outcome {
        tracing::debug!(
            language = %fixture.language,
            fixture = %fixture.name,
            "whole-document check"
        );
        match highlight_document(&mut self.highlighter, &fixture.language, &text.source).await {
            Ok(actual) => compare(
                fixture,
                CheckKind::WholeDocument,
                text.expected.trim(),
                actual.trim(),
            ),
            Err(e) => highlight_failure(fixture, CheckKind::WholeDocument, e),
        }
    }

    async fn check_line_by_line(&mut self, fixture: &Fixture, text: &FixtureText) -> Outcome {
        if self.exceptions.is_exempt(&fixture.language, &fixture.name) {
            tracing::debug!(
                language = %fixture.language,
                fixture = %fixture.name,
                "line-by-line check exempt"
            );
            return Outcome::Exempt;
        }
        tracing::debug!(
            language = %fixture.language,
            fixture = %fixture.name,
            "line-by-line check"
        );
        match highlight_lines(&mut self.highlighter, &fixture.language, &text.source).await {
            Ok(actual) => {
                let expected = normalize(&text.expected);
                let actual = normalize(&actual);
                compare(fixture, CheckKind::LineByLine, expected.trim(), actual.trim())
            }
            Err(e) => highlight_failure(fixture, CheckKind::LineByLine, e),
        }
    }
}

fn compare(fixture: &Fixture, check: CheckKind, expected: &str, actual: &str) -> Outcome {
    if expected == actual {
        return Outcome::Pass;
    }
    tracing::warn!(
        language = %fixture.language,
        fixture = %fixture.name,
        %check,
        "rendering mismatch"
    );
    Outcome::Fail(Failure::Mismatch {
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

fn highlight_failure(fixture: &Fixture, check: CheckKind, error: HighlightError) -> Outcome {
    tracing::warn!(
        language = %fixture.language,
        fixture = %fixture.name,
        %check,
        %error,
        "highlighter failed"
    );
    Outcome::Fail(Failure::Highlight(error.to_string()))
}
