// src/emitter.rs

use crate::error::{BackfillError, Result};
use crate::model::{CommitRecord, Identity};
use crate::vcs::VersionControl;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Writes commit records into a working directory and records them through a
/// [`VersionControl`] backend.
pub struct Emitter<V> {
    workdir: PathBuf,
    vcs: V,
}

impl<V: VersionControl> Emitter<V> {
    pub fn new(workdir: impl Into<PathBuf>, vcs: V) -> Self {
        Self { workdir: workdir.into(), vcs }
    }

    /// Initializes the repository (idempotent) and sets the commit identity.
    pub fn prepare(&mut self, identity: &Identity) -> Result<()> {
        self.vcs.initialize()?;
        self.vcs.configure_identity(identity)?;
        tracing::debug!("Configured identity {} <{}>", identity.name, identity.email);
        Ok(())
    }

    /// Writes every file of `record`, stages the tree and commits it at the
    /// record's timestamp.
    pub fn emit(&mut self, record: &CommitRecord) -> Result<()> {
        for (path, content) in &record.files {
            let target = self.resolve(path)?;
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, content)?;
        }

        self.vcs.stage_all()?;
        self.vcs.commit(record.timestamp, &record.message)
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let escapes = path.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.as_os_str().is_empty() {
            return Err(BackfillError::InvalidPath(path.to_path_buf()));
        }
        Ok(self.workdir.join(path))
    }
}
