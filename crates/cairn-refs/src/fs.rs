//! Filesystem-backed reference store.
//!
//! Each ref is a text file at `<repo dir>/<name>`, holding either a digest
//! or `ref: <target>`. Writes go through a temporary file in the same
//! directory followed by a rename, so readers never see a partial ref.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::RefTarget;

/// A [`RefStore`] over a repository directory (normally `.git`).
#[derive(Clone, Debug)]
pub struct FsRefStore {
    root: PathBuf,
}

impl FsRefStore {
    /// Open the ref store rooted at the repository directory `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file holding the ref `name`.
    pub fn ref_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn under_ref_file(&self, path: &Path) -> bool {
        path.ancestors()
            .skip(1)
            .take_while(|dir| *dir != self.root.as_path())
            .any(Path::is_file)
    }

    fn relative_name(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
        Some(parts?.join("/"))
    }
}

impl RefStore for FsRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<RefTarget>> {
        if validate_ref_name(name).is_err() {
            debug!(%name, "not a ref name");
            return Ok(None);
        }

        let path = self.ref_path(name);
        if path.is_dir() {
            return Ok(None);
        }
        match fs::read_to_string(&path) {
            Ok(content) => RefTarget::parse(name, &content).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            // `refs/heads/main/x` cannot exist while `refs/heads/main` is a ref.
            Err(_) if self.under_ref_file(&path) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_ref(&self, name: &str, target: &RefTarget) -> Result<()> {
        validate_ref_name(name)?;

        let path = self.ref_path(name);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(target.to_content().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|err| err.error)?;

        debug!(%name, %target, "wrote ref");
        Ok(())
    }

    fn list_refs(&self, namespace: &str) -> Result<Vec<(String, RefTarget)>> {
        let start = self.root.join(namespace.trim_end_matches('/'));
        if !start.exists() {
            return Ok(Vec::new());
        }

        let mut refs = Vec::new();
        for entry in WalkDir::new(&start).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = self.relative_name(entry.path()) else {
                continue;
            };
            if validate_ref_name(&name).is_err() {
                continue;
            }
            match self.read_ref(&name) {
                Ok(Some(target)) => refs.push((name, target)),
                Ok(None) => {}
                Err(err) => warn!(%name, error = %err, "skipping unreadable ref"),
            }
        }

        refs.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(refs)
    }
}
