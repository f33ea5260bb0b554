//! Zip packaging of the workspace
//!
//! Exclude patterns are ignore globs relative to the archive root. `*` stays
//! within one path segment and `**` crosses directories. A pattern starting
//! with `!` excludes every path it does not match, so a list of `!` patterns
//! acts as an allow-list.

use std::fs::File;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// What ended up in an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Files written to the archive
    pub files: usize,
    /// Files skipped by an exclude pattern, not counting pruned directories
    pub excluded: usize,
}

/// Compiled exclude patterns
#[derive(Debug)]
pub struct ExcludeMatcher {
    exclude: GlobSet,
    negated: GlobSet,
    /// Directories whose whole subtree an exclude pattern covers
    subtrees: GlobSet,
}

impl ExcludeMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut exclude = GlobSetBuilder::new();
        let mut negated = GlobSetBuilder::new();
        let mut subtrees = GlobSetBuilder::new();

        for pattern in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            match pattern.strip_prefix('!') {
                Some(allowed) => {
                    negated.add(compile(allowed)?);
                }
                None => {
                    exclude.add(compile(pattern)?);
                    if let Some(dir) = subtree_root(pattern) {
                        subtrees.add(compile(dir)?);
                    }
                }
            }
        }

        Ok(Self {
            exclude: build(exclude)?,
            negated: build(negated)?,
            subtrees: build(subtrees)?,
        })
    }

    /// Whether a root-relative, `/`-separated path is excluded
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.is_match(relative)
            || self.negated.matches(relative).len() < self.negated.len()
    }

    /// Whether every path below a directory is excluded
    fn prunes_dir(&self, relative: &str) -> bool {
        self.subtrees.is_match(relative)
    }
}

/// `dir` for patterns like `dir/**` and `dir/**/*`, which cover every descendant of `dir`
fn subtree_root(pattern: &str) -> Option<&str> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let dir = pattern
        .strip_suffix("/**/*")
        .or_else(|| pattern.strip_suffix("/**"))?;
    (!dir.is_empty()).then_some(dir)
}

fn build(builder: GlobSetBuilder) -> Result<GlobSet> {
    builder.build().map_err(|e| Error::Archive(e.to_string()))
}

fn compile(pattern: &str) -> Result<Glob> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::Archive(format!("invalid exclude pattern '{}': {}", pattern, e)))
}

/// Root-relative path with `/` separators
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Zip every file under `source` into `dest`, skipping excluded paths.
///
/// `dest` is created (or truncated) first and never added to itself.
pub fn create_zip_archive(source: &Path, dest: &Path, excludes: &[String]) -> Result<ArchiveSummary> {
    let matcher = ExcludeMatcher::new(excludes)?;
    let root = source.canonicalize()?;

    let file = File::create(dest)?;
    let dest: PathBuf = dest.canonicalize()?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut summary = ArchiveSummary {
        files: 0,
        excluded: 0,
    };

    let keep_dir = |entry: &DirEntry| {
        if !entry.file_type().is_dir() {
            return true;
        }
        match relative_name(&root, entry.path()) {
            Some(name) => !matcher.prunes_dir(&name),
            None => true,
        }
    };

    for entry in WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(keep_dir)
    {
        let entry = entry.map_err(|e| Error::Archive(e.to_string()))?;
        if !entry.file_type().is_file() || entry.path() == dest {
            continue;
        }

        let Some(name) = relative_name(&root, entry.path()) else {
            continue;
        };

        if matcher.is_excluded(&name) {
            log::debug!("Excluding {}", name);
            summary.excluded += 1;
            continue;
        }

        zip.start_file(name, options)?;
        let mut input = File::open(entry.path())?;
        std::io::copy(&mut input, &mut zip)?;
        summary.files += 1;
    }

    zip.finish()?;

    log::debug!(
        "Archived {} files into {} ({} excluded)",
        summary.files,
        dest.display(),
        summary.excluded
    );

    Ok(summary)
}
