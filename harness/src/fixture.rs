use std::path::{Path, PathBuf};

use crate::error::FixtureError;

/// Suffix marking an expectation file. The source file has the same name
/// with this suffix removed.
pub const EXPECT_SUFFIX: &str = ".expect.txt";

/// A source file and the markup a whole-document pass should produce for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub language: String,
    /// Base name: the expectation file name without [`EXPECT_SUFFIX`].
    pub name: String,
    pub source: PathBuf,
    pub expect: PathBuf,
}

/// Contents of a fixture pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureText {
    pub source: String,
    pub expected: String,
}

/// All fixtures of one language directory.
#[derive(Debug)]
pub struct LanguageFixtures {
    pub language: String,
    pub fixtures: Vec<Fixture>,
    /// Problems found while listing the directory: an expectation file
    /// without its source, or a directory that could not be read.
    pub setup_errors: Vec<FixtureError>,
}

impl Fixture {
    /// Read the source and the expectation concurrently.
    pub async fn read(&self) -> Result<FixtureText, FixtureError> {
        let (source, expected) =
            tokio::try_join!(read_file(&self.source), read_file(&self.expect))?;
        Ok(FixtureText { source, expected })
    }
}

async fn read_file(path: &Path) -> Result<String, FixtureError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Discover fixtures under `root`, one entry per language subdirectory.
///
/// Languages and fixtures come back sorted by name. Files directly in `root`
/// are ignored. Only an unreadable `root` is an error. A language directory
/// that cannot be listed, or an expectation without its source file, is
/// recorded in that language's `setup_errors` and discovery moves on.
pub fn discover(root: &Path) -> Result<Vec<LanguageFixtures>, FixtureError> {
    let mut languages = Vec::new();
    for dir in list_dir(root)? {
        if !dir.is_dir() {
            continue;
        }
        let Some(language) = file_name(&dir) else {
            continue;
        };
        languages.push(discover_language(&dir, language));
    }
    languages.sort_by(|a, b| a.language.cmp(&b.language));
    Ok(languages)
}

/// Discover the fixtures of a single language directory.
pub fn discover_language(dir: &Path, language: &str) -> LanguageFixtures {
    let mut fixtures = Vec::new();
    let mut setup_errors = Vec::new();

    let mut entries = match list_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(language, error = %e, "cannot list language directory");
            setup_errors.push(e);
            Vec::new()
        }
    };
    entries.sort();
    for expect in entries {
        let Some(name) = file_name(&expect).and_then(|n| n.strip_suffix(EXPECT_SUFFIX)) else {
            continue;
        };
        if name.is_empty() || !expect.is_file() {
            continue;
        }
        let source = dir.join(name);
        if !source.is_file() {
            tracing::warn!(language, fixture = name, "expectation without source");
            setup_errors.push(FixtureError::MissingSource {
                expect: expect.clone(),
                source_file: source,
            });
            continue;
        }
        fixtures.push(Fixture {
            language: language.to_string(),
            name: name.to_string(),
            source,
            expect: expect.clone(),
        });
    }

    LanguageFixtures {
        language: language.to_string(),
        fixtures,
        setup_errors,
    }
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    let discovery = |source| FixtureError::Discovery {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(discovery)? {
        paths.push(entry.map_err(discovery)?.path());
    }
    Ok(paths)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
