use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::IngestConfig;

const DEFAULT_EXCLUDES: &[&str] = &["**/.git/**", "**/target/**", "**/node_modules/**"];

/// Expand ingest inputs into a list of files.
///
/// Files are kept as given. Directories are walked recursively; exclude
/// globs are matched against the path relative to that directory and the
/// files found under each directory are sorted. Inputs that do not exist
/// are an error.
pub fn collect_files(config: &IngestConfig, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut patterns: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    patterns.extend(config.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&patterns)?;

    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            files.extend(walk_dir(input, &exclude_set, config.follow_symlinks)?);
        } else {
            bail!("input path does not exist: {}", input.display());
        }
    }
    Ok(files)
}

fn walk_dir(root: &Path, exclude_set: &GlobSet, follow_symlinks: bool) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let walker = WalkDir::new(root).follow_links(follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            tracing::trace!(path = %path.display(), "excluded");
            continue;
        }
        found.push(path.to_path_buf());
    }

    // Sort for deterministic ordering
    found.sort();
    Ok(found)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    #[test]
    fn walks_sorted_and_skips_default_excludes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.txt");
        touch(dir.path(), "a/z.md");
        touch(dir.path(), ".git/config");
        touch(dir.path(), "node_modules/pkg/readme.md");

        let files = collect_files(&IngestConfig::default(), &[dir.path().to_path_buf()]).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(rel, vec!["a/z.md".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn applies_configured_excludes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "keep.txt");
        touch(dir.path(), "drafts/skip.txt");
        let config = IngestConfig {
            exclude_globs: vec!["drafts/**".to_string()],
            ..IngestConfig::default()
        };
        let files = collect_files(&config, &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![dir.path().join("keep.txt")]);
    }

    #[test]
    fn explicit_files_are_kept_and_missing_inputs_fail() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "one.pdf");
        let file = dir.path().join("one.pdf");
        let files = collect_files(&IngestConfig::default(), &[file.clone()]).unwrap();
        assert_eq!(files, vec![file]);

        let missing = dir.path().join("nope");
        assert!(collect_files(&IngestConfig::default(), &[missing]).is_err());
    }
}
