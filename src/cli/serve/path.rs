//! URL to filesystem path resolution for static assets.

use std::path::{Path, PathBuf};

/// Resolve a path below `root`, rejecting anything that escapes it.
///
/// `rel` is the already-decoded URL remainder (e.g. `css/site.css`).
pub fn resolve_asset(root: &Path, rel: &str) -> Option<PathBuf> {
    let clean = rel.trim_matches('/');
    if clean.is_empty() || clean.split('/').any(|seg| seg == "..") {
        return None;
    }

    // Canonicalize to resolve symlinks and verify path is under root
    let canonical = root.join(clean).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets/css")).unwrap();
        fs::write(dir.path().join("assets/css/site.css"), "body{}").unwrap();
        fs::write(dir.path().join("secret"), "nope").unwrap();
        dir
    }

    #[test]
    fn test_resolves_file() {
        let dir = fixture();
        let root = dir.path().join("assets");

        let path = resolve_asset(&root, "css/site.css").unwrap();
        assert!(path.ends_with("css/site.css"));
    }

    #[test]
    fn test_rejects_traversal() {
        let dir = fixture();
        let root = dir.path().join("assets");

        assert!(resolve_asset(&root, "../secret").is_none());
        assert!(resolve_asset(&root, "css/../../secret").is_none());
    }

    #[test]
    fn test_rejects_dirs_and_missing() {
        let dir = fixture();
        let root = dir.path().join("assets");

        assert!(resolve_asset(&root, "css").is_none());
        assert!(resolve_asset(&root, "").is_none());
        assert!(resolve_asset(&root, "missing.js").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_symlink_escape() {
        let dir = fixture();
        let root = dir.path().join("assets");
        std::os::unix::fs::symlink(dir.path().join("secret"), root.join("link")).unwrap();

        assert!(resolve_asset(&root, "link").is_none());
    }
}
