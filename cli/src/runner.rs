use std::ops::Range;
use std::path::Path;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use harness::{
    ExceptionRegistry, Failure, Harness, Highlighter, LanguageFixtures, Outcome, Report, Verdict,
    discover,
};

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS  " } else { "\x1b[32mPASS\x1b[0m  " }
}

fn exempt_label(no_color: bool) -> &'static str {
    if no_color { "EXEMPT" } else { "\x1b[33mEXEMPT\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL  " } else { "\x1b[31mFAIL\x1b[0m  " }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn discover_or_report(root: &Path) -> Option<Vec<LanguageFixtures>> {
    tracing::debug!(root = %root.display(), "discovering fixtures");
    match discover(root) {
        Ok(languages) if languages.is_empty() => {
            eprintln!("no language directories found in {}", root.display());
            None
        }
        Ok(languages) => Some(languages),
        Err(e) => {
            eprintln!("error: {}", e);
            None
        }
    }
}

/// List the languages under `root` with their fixture counts.
pub fn list_languages(root: &Path, exceptions: &ExceptionRegistry) -> i32 {
    let Some(languages) = discover_or_report(root) else {
        return 1;
    };

    eprintln!("available languages:");
    for language in &languages {
        let exempt = exceptions
            .exemptions(&language.language)
            .map(|names| names.len())
            .unwrap_or(0);
        let mut line = format!(
            "  {} ({} fixtures",
            language.language,
            language.fixtures.len()
        );
        if exempt > 0 {
            line.push_str(&format!(", {} exempt", exempt));
        }
        if !language.setup_errors.is_empty() {
            line.push_str(&format!(", {} setup errors", language.setup_errors.len()));
        }
        line.push(')');
        eprintln!("{}", line);
    }
    0
}

/// Keep only the requested languages, warning about unknown names.
fn select<'a>(
    languages: &'a [LanguageFixtures],
    requested: &[String],
) -> Vec<&'a LanguageFixtures> {
    if requested.is_empty() {
        return languages.iter().collect();
    }

    for name in requested {
        if !languages.iter().any(|l| &l.language == name) {
            eprintln!(
                "warning: language '{}' not found (available: {})",
                name,
                languages
                    .iter()
                    .map(|l| l.language.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    languages
        .iter()
        .filter(|l| requested.contains(&l.language))
        .collect()
}

/// Exception registry languages with no directory under the fixtures root.
fn unknown_exception_languages<'a>(
    languages: &[LanguageFixtures],
    exceptions: &'a ExceptionRegistry,
) -> Vec<&'a str> {
    exceptions
        .languages()
        .filter(|name| !languages.iter().any(|l| l.language == *name))
        .collect()
}

/// Run both checks on every fixture under `root` and print a report.
/// Returns the exit code (0 = all pass, 1 = any failure) and the highlighter.
pub async fn run_checks<H: Highlighter>(
    root: &Path,
    requested: &[String],
    highlighter: H,
    exceptions: ExceptionRegistry,
    no_color: bool,
) -> (i32, H) {
    let Some(all_languages) = discover_or_report(root) else {
        return (1, highlighter);
    };

    if !exceptions.is_empty() {
        for name in unknown_exception_languages(&all_languages, &exceptions) {
            eprintln!(
                "warning: exceptions listed for language '{}', which has no fixtures directory",
                name
            );
        }
    }

    let languages = select(&all_languages, requested);
    if languages.is_empty() {
        eprintln!("no matching languages found");
        return (1, highlighter);
    }

    let mut harness = Harness::new(highlighter, exceptions);
    let mut report = Report::default();

    for language in languages {
        eprintln!();
        eprintln!("{}", bold(&language.language, no_color));

        let verdicts = harness.check_language(language).await;
        for verdict in &verdicts {
            let label = match &verdict.outcome {
                Outcome::Pass => pass_label(no_color),
                Outcome::Exempt => exempt_label(no_color),
                Outcome::Fail(_) => fail_label(no_color),
            };
            eprintln!("  {}  {} ({})", label, verdict.fixture, verdict.check);
        }
        report.verdicts.extend(verdicts);
    }

    if !report.is_success() {
        eprintln!();
        eprintln!("failures:");
        for verdict in report.failures() {
            eprintln!();
            eprintln!(
                "  --- {}/{} ({}) ---",
                verdict.language, verdict.fixture, verdict.check
            );
            match verdict.failure() {
                Some(Failure::Mismatch { expected, actual }) => {
                    emit_mismatch(verdict, expected, actual, no_color);
                }
                Some(failure) => {
                    for line in failure.to_string().lines() {
                        eprintln!("  {}", line);
                    }
                }
                None => {}
            }
        }
    }

    eprintln!();
    eprintln!("{}", summary(&report, no_color));
    let code = if report.is_success() { 0 } else { 1 };
    (code, harness.into_highlighter())
}

fn summary(report: &Report, no_color: bool) -> String {
    let (passed, failed) = (report.passed(), report.failed());
    if report.is_success() {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        format!("check result: {}. {} passed, 0 failed", ok, passed)
    } else {
        let failed_label = if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" };
        format!(
            "check result: {}. {} passed, {} failed (of {})",
            failed_label,
            passed,
            failed,
            report.verdicts.len()
        )
    }
}

/// Render a mismatch as a diagnostic pointing at the first differing character.
fn emit_mismatch(verdict: &Verdict, expected: &str, actual: &str, no_color: bool) {
    let name = format!("{}/{}", verdict.language, verdict.fixture);
    let mut files = SimpleFiles::new();
    let expected_id = files.add(format!("{} (expected)", name), expected.to_string());
    let actual_id = files.add(format!("{} (actual)", name), actual.to_string());

    let offset = markup::first_divergence(expected, actual).unwrap_or(0);
    let diagnostic = Diagnostic::error()
        .with_message(format!("{} rendering differs", verdict.check))
        .with_labels(vec![
            Label::primary(actual_id, char_at(actual, offset))
                .with_message("actual output diverges here"),
            Label::secondary(expected_id, char_at(expected, offset)).with_message("expected"),
        ])
        .with_notes(vec![format!(
            "{} and {} bytes compared, identical up to byte {}",
            expected.len(),
            actual.len(),
            offset
        )]);

    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
}

/// Byte range of the character starting at `offset`, empty at end of text.
fn char_at(text: &str, offset: usize) -> Range<usize> {
    let len = text[offset..].chars().next().map_or(0, char::len_utf8);
    offset..offset + len
}
