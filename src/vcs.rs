// src/vcs.rs

use crate::error::{BackfillError, Result};
use crate::model::{Identity, Timestamp};
use git2::{Commit, ErrorCode, IndexAddOption, Repository, Signature, Time};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Date format understood by `GIT_AUTHOR_DATE` / `GIT_COMMITTER_DATE`
const GIT_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y +0000";

/// The version-control operations the emitter needs.
///
/// Every backend is bound to one working directory at construction time.
pub trait VersionControl {
    /// Creates the repository if it does not exist yet. Safe to call repeatedly.
    fn initialize(&mut self) -> Result<()>;

    /// Sets `user.name` and `user.email`, replacing any previous values.
    fn configure_identity(&mut self, identity: &Identity) -> Result<()>;

    /// Stages every change in the working tree.
    fn stage_all(&mut self) -> Result<()>;

    /// Commits the staged tree with author and committer time forced to `timestamp`.
    fn commit(&mut self, timestamp: Timestamp, message: &str) -> Result<()>;
}

/// In-process backend on top of libgit2
pub struct Git2Backend {
    workdir: PathBuf,
    repo: Option<Repository>,
}

impl Git2Backend {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into(), repo: None }
    }

    fn repo(&self) -> Result<&Repository> {
        self.repo
            .as_ref()
            .ok_or_else(|| BackfillError::NotInitialized(self.workdir.clone()))
    }

    fn signature(repo: &Repository, timestamp: Timestamp) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config.get_string("user.name")?;
        let email = config.get_string("user.email")?;
        let time = Time::new(timestamp.and_utc().timestamp(), 0);
        Ok(Signature::new(&name, &email, &time)?)
    }
}

impl VersionControl for Git2Backend {
    fn initialize(&mut self) -> Result<()> {
        if self.repo.is_some() {
            return Ok(());
        }
        fs::create_dir_all(&self.workdir)?;
        let repo = match Repository::open(&self.workdir) {
            Ok(repo) => {
                tracing::debug!("Reusing repository at {}", self.workdir.display());
                repo
            }
            Err(_) => {
                tracing::info!("Initializing repository at {}", self.workdir.display());
                Repository::init(&self.workdir)?
            }
        };
        self.repo = Some(repo);
        Ok(())
    }

    fn configure_identity(&mut self, identity: &Identity) -> Result<()> {
        let mut config = self.repo()?.config()?;
        config.set_str("user.name", &identity.name)?;
        config.set_str("user.email", &identity.email)?;
        Ok(())
    }

    fn stage_all(&mut self) -> Result<()> {
        let mut index = self.repo()?.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&mut self, timestamp: Timestamp, message: &str) -> Result<()> {
        let repo = self.repo()?;
        let sig = Self::signature(repo, timestamp)?;

        let tree_oid = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_oid)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&Commit> = parent.iter().collect();

        let oid = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        tracing::debug!(%oid, %timestamp, "committed {message:?}");
        Ok(())
    }
}

/// Backend that shells out to the `git` binary
pub struct CliBackend {
    workdir: PathBuf,
}

impl CliBackend {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into() }
    }

    fn git(&self, args: &[&str], dates: Option<&str>) -> Result<()> {
        let mut command = Command::new("git");
        command.current_dir(&self.workdir).args(args);
        if let Some(date) = dates {
            command.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
        }

        let output = command.output()?;
        if !output.status.success() {
            return Err(BackfillError::GitCommand {
                command: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn is_repository(path: &Path) -> bool {
        path.join(".git").exists()
    }
}

impl VersionControl for CliBackend {
    fn initialize(&mut self) -> Result<()> {
        fs::create_dir_all(&self.workdir)?;
        if Self::is_repository(&self.workdir) {
            tracing::debug!("Reusing repository at {}", self.workdir.display());
            return Ok(());
        }
        tracing::info!("Initializing repository at {}", self.workdir.display());
        self.git(&["init", "--quiet"], None)
    }

    fn configure_identity(&mut self, identity: &Identity) -> Result<()> {
        self.git(&["config", "user.name", identity.name.as_str()], None)?;
        self.git(&["config", "user.email", identity.email.as_str()], None)
    }

    fn stage_all(&mut self) -> Result<()> {
        self.git(&["add", "-A"], None)
    }

    fn commit(&mut self, timestamp: Timestamp, message: &str) -> Result<()> {
        if !Self::is_repository(&self.workdir) {
            return Err(BackfillError::NotInitialized(self.workdir.clone()));
        }
        let date = timestamp.format(GIT_DATE_FORMAT).to_string();
        self.git(&["commit", "--quiet", "--no-gpg-sign", "-m", message], Some(&date))?;
        tracing::debug!(%timestamp, "committed {message:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn identity() -> Identity {
        Identity { name: "Test Author".into(), email: "test@example.com".into() }
    }

    fn at(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2021, 5, 4).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn count_config_entries(workdir: &Path, key: &str) -> usize {
        let config = fs::read_to_string(workdir.join(".git/config")).unwrap();
        config
            .lines()
            .filter(|line| line.trim_start().starts_with(&format!("{key} =")))
            .count()
    }

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    #[test]
    fn git2_initialize_is_idempotent() {
        let dir = TempDir::new().unwrap();

        let mut first = Git2Backend::new(dir.path());
        first.initialize().unwrap();
        first.initialize().unwrap();
        first.configure_identity(&identity()).unwrap();

        let mut second = Git2Backend::new(dir.path());
        second.initialize().unwrap();
        second.configure_identity(&identity()).unwrap();

        assert_eq!(count_config_entries(dir.path(), "name"), 1);
        assert_eq!(count_config_entries(dir.path(), "email"), 1);

        let repo = Repository::open(dir.path()).unwrap();
        let config = repo.config().unwrap();
        assert_eq!(config.get_string("user.name").unwrap(), "Test Author");
    }

    #[test]
    fn git2_operations_require_initialize() {
        let dir = TempDir::new().unwrap();
        let mut backend = Git2Backend::new(dir.path());

        let err = backend.stage_all().unwrap_err();
        assert!(matches!(err, BackfillError::NotInitialized(_)));
    }

    #[test]
    fn git2_commit_overrides_author_and_committer_time() {
        let dir = TempDir::new().unwrap();
        let mut backend = Git2Backend::new(dir.path());
        backend.initialize().unwrap();
        backend.configure_identity(&identity()).unwrap();

        fs::write(dir.path().join("a.txt"), "one").unwrap();
        backend.stage_all().unwrap();
        backend.commit(at(9, 30), "first").unwrap();

        fs::write(dir.path().join("b.txt"), "two").unwrap();
        backend.stage_all().unwrap();
        backend.commit(at(17, 5), "second").unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        let expected = at(17, 5).and_utc().timestamp();

        assert_eq!(head.message(), Some("second"));
        assert_eq!(head.author().when().seconds(), expected);
        assert_eq!(head.committer().when().seconds(), expected);
        assert_eq!(head.author().name(), Some("Test Author"));
        assert_eq!(head.parent_count(), 1);

        let tree = head.tree().unwrap();
        assert!(tree.get_name("a.txt").is_some());
        assert!(tree.get_name("b.txt").is_some());
    }

    #[test]
    fn cli_backend_commits_with_forced_dates() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let mut backend = CliBackend::new(dir.path());
        backend.initialize().unwrap();
        backend.initialize().unwrap();
        backend.configure_identity(&identity()).unwrap();
        backend.configure_identity(&identity()).unwrap();
        assert_eq!(count_config_entries(dir.path(), "name"), 1);

        fs::write(dir.path().join("a.txt"), "one").unwrap();
        backend.stage_all().unwrap();
        backend.commit(at(10, 15), "via cli").unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        let expected = at(10, 15).and_utc().timestamp();
        assert_eq!(head.author().when().seconds(), expected);
        assert_eq!(head.committer().when().seconds(), expected);
        assert_eq!(head.summary(), Some("via cli"));
    }

    #[test]
    fn cli_backend_reports_failed_command() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let mut backend = CliBackend::new(dir.path());
        backend.initialize().unwrap();
        backend.configure_identity(&identity()).unwrap();

        // Nothing staged, so git refuses to commit
        let err = backend.commit(at(12, 0), "empty").unwrap_err();
        assert!(matches!(err, BackfillError::GitCommand { .. }));
    }
}
