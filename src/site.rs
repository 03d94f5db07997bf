//! Static export: the same page `serve` renders, written to a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::content::{self, Portfolio};
use crate::error::SiteError;
use crate::html;
use crate::web_assets;

/// Name of the directory looked up next to the content file when no public
/// directory is given.
pub const PUBLIC_DIR: &str = "public";

/// What `build` wrote.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Generated files, relative to the output directory.
    pub generated: Vec<PathBuf>,
    /// Files copied from the public directory, relative to the output directory.
    pub copied: Vec<PathBuf>,
}

/// Pick the public directory: the explicit one (which must exist), otherwise
/// `public/` beside the content file if present. The result is canonical.
pub fn resolve_public_dir(
    explicit: Option<&Path>,
    content: Option<&Path>,
) -> io::Result<Option<PathBuf>> {
    if let Some(dir) = explicit {
        let canonical = fs::canonicalize(dir).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("public directory {}: {e}", dir.display()),
            )
        })?;
        if !canonical.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("public directory {} is not a directory", dir.display()),
            ));
        }
        return Ok(Some(canonical));
    }

    let Some(content) = content else {
        return Ok(None);
    };
    let beside = content
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(PUBLIC_DIR);
    if beside.is_dir() {
        Ok(Some(fs::canonicalize(&beside)?))
    } else {
        Ok(None)
    }
}

/// The content as pretty-printed JSON.
pub fn export_json(portfolio: &Portfolio) -> Result<String, SiteError> {
    Ok(serde_json::to_string_pretty(portfolio)?)
}

fn write_file(out: &Path, relative: &Path, contents: &[u8]) -> Result<(), SiteError> {
    let dest = out.join(relative);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SiteError::io("creating", parent, e))?;
    }
    fs::write(&dest, contents).map_err(|e| SiteError::io("writing", &dest, e))
}

/// Copy regular files under `dir` into `out`, depth first. Symlinks and
/// anything that would land on a generated file are skipped.
fn copy_public(
    root: &Path,
    dir: &Path,
    out: &Path,
    reserved: &[PathBuf],
    copied: &mut Vec<PathBuf>,
) -> Result<(), SiteError> {
    let entries = fs::read_dir(dir).map_err(|e| SiteError::io("reading", dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SiteError::io("reading", dir, e))?;
        paths.push(entry.path());
    }
    paths.sort();

    for path in paths {
        let meta = fs::symlink_metadata(&path).map_err(|e| SiteError::io("inspecting", &path, e))?;
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if meta.is_dir() {
            // The output directory may live inside the public one.
            if fs::canonicalize(&path).ok().as_deref() == fs::canonicalize(out).ok().as_deref() {
                continue;
            }
            copy_public(root, &path, out, reserved, copied)?;
        } else if meta.is_file() {
            if reserved.iter().any(|r| r == relative) {
                tracing::warn!(
                    path = %relative.display(),
                    "public file shadows generated file, skipped"
                );
                continue;
            }
            let dest = out.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| SiteError::io("creating", parent, e))?;
            }
            fs::copy(&path, &dest).map_err(|e| SiteError::io("copying", &path, e))?;
            copied.push(relative.to_path_buf());
        } else {
            tracing::debug!(path = %path.display(), "not a regular file, skipped");
        }
    }
    Ok(())
}

/// Write the page, its assets, `content.json` and the public files to `out`.
pub fn build(
    content_path: Option<&Path>,
    public: Option<&Path>,
    out: &Path,
) -> Result<BuildReport, SiteError> {
    let portfolio = content::load(content_path)?;
    let public = resolve_public_dir(public, content_path)
        .map_err(|e| SiteError::io("resolving", public.unwrap_or(Path::new(PUBLIC_DIR)), e))?;

    fs::create_dir_all(out).map_err(|e| SiteError::io("creating", out, e))?;

    let mut generated: Vec<(PathBuf, Vec<u8>)> = vec![
        (PathBuf::from("index.html"), html::build_page(&portfolio).into_bytes()),
        (PathBuf::from("content.json"), export_json(&portfolio)?.into_bytes()),
    ];
    for (path, body) in web_assets::ASSETS {
        generated.push((PathBuf::from(path), body.as_bytes().to_vec()));
    }

    let mut report = BuildReport::default();
    for (relative, contents) in &generated {
        write_file(out, relative, contents)?;
        tracing::debug!(path = %relative.display(), bytes = contents.len(), "generated");
        report.generated.push(relative.clone());
    }

    if let Some(public) = public {
        let reserved: Vec<PathBuf> = generated.into_iter().map(|(p, _)| p).collect();
        copy_public(&public, &public, out, &reserved, &mut report.copied)?;
    }

    tracing::info!(
        out = %out.display(),
        generated = report.generated.len(),
        copied = report.copied.len(),
        "site built"
    );
    Ok(report)
}
