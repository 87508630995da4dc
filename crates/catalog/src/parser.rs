//! Parser for theme data files.
//!
//! Two layouts are understood, and may be mixed in one directory:
//! - `themes.json`: an object mapping theme name to an array of images
//! - `<theme>.json`: an array of images; the file stem is the theme name

use crate::error::{CatalogError, Result};
use crate::types::ImageRecord;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the bundled theme map
pub const THEME_BUNDLE_FILE: &str = "themes.json";

/// Theme files found in a data directory
#[derive(Debug, Default)]
pub struct ThemeFiles {
    pub bundle: Option<PathBuf>,
    /// Per-theme files, sorted by path
    pub themes: Vec<PathBuf>,
}

/// List the theme files in `dir`.
///
/// Only regular `*.json` files directly inside `dir` are considered.
pub fn discover_theme_files(dir: &Path) -> Result<ThemeFiles> {
    let mut files = ThemeFiles::default();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        if path.file_name().and_then(|n| n.to_str()) == Some(THEME_BUNDLE_FILE) {
            files.bundle = Some(path);
        } else {
            files.themes.push(path);
        }
    }

    files.themes.sort();
    Ok(files)
}

/// Theme name for a per-theme file ("nature.json" -> "nature")
pub fn theme_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Parse a per-theme file holding a JSON array of images
pub fn parse_theme_file(path: &Path) -> Result<Vec<ImageRecord>> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| CatalogError::ParseError {
        file: display_name(path),
        source,
    })
}

/// Parse a `themes.json` bundle
pub fn parse_theme_bundle(path: &Path) -> Result<BTreeMap<String, Vec<ImageRecord>>> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| CatalogError::ParseError {
        file: display_name(path),
        source,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_theme_name_from_path() {
        assert_eq!(
            theme_name_from_path(Path::new("data/nature.json")),
            Some("nature".to_string())
        );
        assert_eq!(theme_name_from_path(Path::new("")), None);
    }

    #[test]
    fn test_discover_theme_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("urban.json"), "[]").unwrap();
        fs::write(dir.path().join("food.json"), "[]").unwrap();
        fs::write(dir.path().join(THEME_BUNDLE_FILE), "{}").unwrap();
        fs::write(dir.path().join("README.md"), "not a theme").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = discover_theme_files(dir.path()).unwrap();

        assert!(files.bundle.is_some());
        let names: Vec<String> = files
            .themes
            .iter()
            .filter_map(|p| theme_name_from_path(p))
            .collect();
        assert_eq!(names, vec!["food", "urban"]);
    }

    #[test]
    fn test_parse_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nature.json");
        fs::write(
            &path,
            r#"[
                {"id": "n1", "src": "https://a/1.jpg", "alt": "Lake", "tags": ["lake"]},
                {"id": "n2", "src": "https://a/2.jpg", "alt": "Cliff", "likes": 3}
            ]"#,
        )
        .unwrap();

        let images = parse_theme_file(&path).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].likes, Some(3));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"[{"id": "n1"}"#).unwrap();

        let err = parse_theme_file(&path).unwrap_err();
        match err {
            CatalogError::ParseError { file, .. } => assert_eq!(file, "broken.json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_theme_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(THEME_BUNDLE_FILE);
        fs::write(
            &path,
            r#"{
                "food": [{"id": "f1", "src": "s", "alt": "Bread"}],
                "urban": []
            }"#,
        )
        .unwrap();

        let bundle = parse_theme_bundle(&path).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle["food"][0].alt, "Bread");
        assert!(bundle["urban"].is_empty());
    }
}
