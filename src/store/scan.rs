//! Posts directory scanning.
//!
//! Lists post files directly inside the posts directory in file-name
//! order, then parses them in parallel. Per-file failures are collected,
//! never propagated.

use std::fs;
use std::io;
use std::path::PathBuf;

use jwalk::WalkDir;
use rayon::prelude::*;
use serde::Serialize;

use crate::post::{Post, PostError, PostLayout};

/// A file left out of the index.
#[derive(Debug)]
pub struct SkippedPost {
    pub path: PathBuf,
    pub error: PostError,
}

impl SkippedPost {
    /// Error message including its causes, `outer: inner`.
    pub fn reason(&self) -> String {
        anyhow::Chain::new(&self.error)
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ")
    }
}

/// Result of one scan: parsed posts in scan order plus skipped files.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub posts: Vec<Post>,
    pub skipped: Vec<SkippedPost>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Serialized diagnostic for `check --json`.
#[derive(Debug, Serialize)]
pub struct SkippedSummary {
    pub path: String,
    pub error: String,
}

impl From<&SkippedPost> for SkippedSummary {
    fn from(skipped: &SkippedPost) -> Self {
        Self {
            path: skipped.path.display().to_string(),
            error: skipped.reason(),
        }
    }
}

/// Scan the posts directory and parse every post file.
pub fn scan_posts(layout: &PostLayout) -> ScanReport {
    let files = match list_post_files(layout) {
        Ok(files) => files,
        Err(e) => {
            return ScanReport {
                posts: Vec::new(),
                skipped: vec![SkippedPost {
                    path: layout.dir.clone(),
                    error: PostError::Io(layout.dir.clone(), e),
                }],
            };
        }
    };

    let results: Vec<_> = files
        .par_iter()
        .map(|path| Post::load(path, layout).map_err(|error| (path, error)))
        .collect();

    let mut report = ScanReport::default();
    for result in results {
        match result {
            Ok(post) => report.posts.push(post),
            Err((path, error)) => report.skipped.push(SkippedPost {
                path: path.clone(),
                error,
            }),
        }
    }
    report
}

/// Post files directly inside the posts directory, sorted by name.
fn list_post_files(layout: &PostLayout) -> io::Result<Vec<PathBuf>> {
    let meta = fs::metadata(&layout.dir)?;
    if !meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            "posts path is not a directory",
        ));
    }

    Ok(WalkDir::new(&layout.dir)
        .max_depth(1)
        .sort(true)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.depth() == 1 && e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| layout.matches(path))
        .collect())
}
