// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document rendering — DOCX → PDF through an external office suite.
//
// LibreOffice only lets us choose the output directory, not the file name,
// so each render goes into a scratch directory next to the destination and
// the result is renamed into place. The scratch directory also hosts a
// private LibreOffice profile, which keeps a running desktop instance from
// swallowing the headless conversion.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use idseal_core::error::IdsealError;
use tokio::process::Command;
use tracing::{debug, instrument};
use url::Url;

/// Converts a source document into a PDF at an exact path.
///
/// Implementations must not leave a partial file at `destination` when they
/// fail. Callers bound the call with a timeout and may drop the future at
/// any await point.
pub trait Renderer {
    fn render(
        &self,
        source: &Path,
        destination: &Path,
    ) -> impl Future<Output = Result<(), IdsealError>> + Send;
}

/// Headless LibreOffice (`soffice --convert-to pdf`).
#[derive(Debug, Clone)]
pub struct LibreOfficeRenderer {
    program: PathBuf,
}

impl LibreOfficeRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for LibreOfficeRenderer {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl Renderer for LibreOfficeRenderer {
    #[instrument(skip_all, fields(source = %source.display()))]
    async fn render(&self, source: &Path, destination: &Path) -> Result<(), IdsealError> {
        let fail = |detail: String| IdsealError::Render {
            path: source.to_path_buf(),
            detail,
        };

        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let scratch = tempfile::Builder::new()
            .prefix(".idseal-render-")
            .tempdir_in(parent)
            .map_err(|err| fail(format!("cannot create scratch directory: {err}")))?;
        let out_dir = scratch.path().join("pdf");
        let profile_dir = std::path::absolute(scratch.path().join("profile"))
            .map_err(|err| fail(format!("cannot resolve profile directory: {err}")))?;
        let profile_url = Url::from_directory_path(&profile_dir)
            .map_err(|_| fail(format!("cannot express {} as a URL", profile_dir.display())))?;

        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--norestore")
            .arg(format!("-env:UserInstallation={profile_url}"))
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| fail(format!("cannot run {}: {err}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("{}: {}", output.status, stderr.trim())));
        }

        // soffice exits 0 even when it could not load the document, so the
        // output file is the real success signal.
        let stem = source
            .file_stem()
            .ok_or_else(|| fail("source has no file name".into()))?;
        let mut file_name = stem.to_os_string();
        file_name.push(".pdf");
        let rendered = out_dir.join(file_name);
        if !rendered.is_file() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("renderer produced no PDF: {}", stderr.trim())));
        }

        tokio::fs::rename(&rendered, destination)
            .await
            .map_err(|err| fail(format!("cannot move PDF into place: {err}")))?;

        debug!(destination = %destination.display(), "document rendered");
        Ok(())
    }
}
