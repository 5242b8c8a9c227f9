//! Static build output
//!
//! Copies the static root into the output directory, leaves out source maps
//! in production, writes `env.js` with the front-end constants and finishes
//! with `build-manifest.json`.

use crate::config::WebConfig;
use crate::error::{WebError, WebResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// File holding the `__API_URL__` / `__IS_PRODUCTION__` constants
pub const ENV_FILE: &str = "env.js";

/// Manifest of everything emitted
pub const MANIFEST_FILE: &str = "build-manifest.json";

/// One emitted file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltFile {
    /// Path relative to the output directory, `/`-separated
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Hex SHA-256 of the contents
    pub sha256: String,
}

/// Build result, also written out as the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Output directory
    pub out_dir: PathBuf,
    /// Whether this was a production build
    pub production: bool,
    /// Whether source maps were kept
    pub sourcemap: bool,
    /// Emitted files, sorted by path
    pub files: Vec<BuiltFile>,
    /// Source maps left out
    pub skipped_maps: usize,
    /// Total bytes emitted
    pub total_size: u64,
}

/// Build the static front end described by `config`
pub fn build(config: &WebConfig) -> WebResult<BuildReport> {
    let root = &config.root;
    let out_dir = &config.build.out_dir;

    if !root.is_dir() {
        return Err(WebError::MissingRoot(root.clone()));
    }
    check_no_overlap(root, out_dir)?;

    if config.build.empty_out_dir && out_dir.exists() {
        debug!(out_dir = %out_dir.display(), "emptying output directory");
        fs::remove_dir_all(out_dir).map_err(|e| WebError::io(out_dir, e))?;
    }
    fs::create_dir_all(out_dir).map_err(|e| WebError::io(out_dir, e))?;

    let sourcemap = config.sourcemap();
    let mut files = Vec::new();
    let mut skipped_maps = 0;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| root.clone(), Path::to_path_buf);
            WebError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let source = entry.path();
        if !sourcemap && source.extension().is_some_and(|ext| ext == "map") {
            skipped_maps += 1;
            continue;
        }

        let relative = source.strip_prefix(root).unwrap_or(source);
        let bytes = fs::read(source).map_err(|e| WebError::io(source, e))?;
        files.push(emit(out_dir, relative, &bytes)?);
    }

    files.push(emit(out_dir, Path::new(ENV_FILE), render_env(config).as_bytes())?);
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let report = BuildReport {
        out_dir: out_dir.clone(),
        production: config.mode.is_production(),
        sourcemap,
        total_size: files.iter().map(|f| f.size).sum(),
        files,
        skipped_maps,
    };

    let manifest = serde_json::to_vec_pretty(&report)?;
    let manifest_path = out_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest).map_err(|e| WebError::io(&manifest_path, e))?;

    info!(
        out_dir = %out_dir.display(),
        files = report.files.len(),
        skipped_maps,
        production = report.production,
        "build complete"
    );

    Ok(report)
}

/// Render `env.js` from the configured constants
#[must_use]
pub fn render_env(config: &WebConfig) -> String {
    config
        .defines()
        .into_iter()
        .map(|(name, value)| format!("window.{name} = {value};\n"))
        .collect()
}

fn emit(out_dir: &Path, relative: &Path, bytes: &[u8]) -> WebResult<BuiltFile> {
    let target = out_dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| WebError::io(parent, e))?;
    }
    fs::write(&target, bytes).map_err(|e| WebError::io(&target, e))?;

    Ok(BuiltFile {
        path: relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        size: bytes.len() as u64,
        sha256: hex::encode(Sha256::digest(bytes)),
    })
}

/// Refuse to build when emptying or writing the output could touch sources
fn check_no_overlap(root: &Path, out_dir: &Path) -> WebResult<()> {
    let root_abs = absolute(root);
    let out_abs = absolute(out_dir);
    if root_abs.starts_with(&out_abs) || out_abs.starts_with(&root_abs) {
        return Err(WebError::OverlappingDirs {
            root: root.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
        });
    }
    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    // Not created yet: resolve the parent instead
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            absolute(parent).join(name)
        }
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, WebConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public");
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("index.html"), "<!doctype html><div id=app></div>").unwrap();
        fs::write(root.join("assets/app.js"), "console.log('orders')").unwrap();
        fs::write(root.join("assets/app.js.map"), "{\"version\":3}").unwrap();

        let mut config = WebConfig {
            root,
            ..WebConfig::default()
        };
        config.build.out_dir = dir.path().join("dist");
        (dir, config)
    }

    fn paths(report: &BuildReport) -> Vec<&str> {
        report.files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_development_build_keeps_maps() {
        let (_dir, config) = fixture();
        let report = build(&config).unwrap();

        assert!(report.sourcemap);
        assert_eq!(report.skipped_maps, 0);
        assert_eq!(
            paths(&report),
            vec!["assets/app.js", "assets/app.js.map", "env.js", "index.html"]
        );
        assert!(config.build.out_dir.join("assets/app.js.map").exists());
        assert!(config.build.out_dir.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_production_build_drops_maps() {
        let (_dir, mut config) = fixture();
        config.mode = Mode::Production;
        let report = build(&config).unwrap();

        assert!(report.production);
        assert_eq!(report.skipped_maps, 1);
        assert!(!paths(&report).contains(&"assets/app.js.map"));
        assert!(!config.build.out_dir.join("assets/app.js.map").exists());

        let env = fs::read_to_string(config.build.out_dir.join(ENV_FILE)).unwrap();
        assert!(env.contains("window.__IS_PRODUCTION__ = true;"));
    }

    #[test]
    fn test_env_file_contents() {
        let mut config = WebConfig::default();
        config.proxy.target = "https://backend.example.com".to_string();
        assert_eq!(
            render_env(&config),
            "window.__API_URL__ = \"https://backend.example.com\";\nwindow.__IS_PRODUCTION__ = false;\n"
        );
    }

    #[test]
    fn test_out_dir_is_emptied() {
        let (_dir, config) = fixture();
        fs::create_dir_all(&config.build.out_dir).unwrap();
        fs::write(config.build.out_dir.join("stale.js"), "old").unwrap();

        build(&config).unwrap();
        assert!(!config.build.out_dir.join("stale.js").exists());
    }

    #[test]
    fn test_manifest_matches_report() {
        let (_dir, config) = fixture();
        let report = build(&config).unwrap();
        let manifest: BuildReport = serde_json::from_slice(
            &fs::read(config.build.out_dir.join(MANIFEST_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.files, report.files);

        let index = report.files.iter().find(|f| f.path == "index.html").unwrap();
        assert_eq!(index.sha256.len(), 64);
        assert_eq!(index.size, 33);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WebConfig {
            root: dir.path().join("nope"),
            ..WebConfig::default()
        };
        config.build.out_dir = dir.path().join("dist");
        assert!(matches!(build(&config), Err(WebError::MissingRoot(_))));
    }

    #[test]
    fn test_overlapping_dirs_rejected() {
        let (_dir, mut config) = fixture();
        config.build.out_dir = config.root.join("dist");
        assert!(matches!(
            build(&config),
            Err(WebError::OverlappingDirs { .. })
        ));

        config.build.out_dir = config.root.clone();
        assert!(matches!(
            build(&config),
            Err(WebError::OverlappingDirs { .. })
        ));
    }
}
