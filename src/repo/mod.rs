//! Repository acquisition: URL normalization, cloning and updating.

pub mod github;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::core::{Error, Result};

/// One repository to acquire.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoSpec {
    /// Full clone URL.
    pub url: String,
    /// Short name, derived from the last URL segment.
    pub name: String,
    /// Where the working tree lives (or will live) on disk.
    pub local_path: PathBuf,
}

/// What happened to one repository during acquisition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Cloned,
    Updated,
    Error(String),
}

/// Manages the local clone directory for a run.
pub struct RepoManager {
    clone_directory: PathBuf,
    token: Option<String>,
    repos: Vec<RepoSpec>,
}

impl RepoManager {
    pub fn new(clone_directory: impl Into<PathBuf>, token: Option<String>) -> Self {
        Self {
            clone_directory: clone_directory.into(),
            token,
            repos: Vec::new(),
        }
    }

    /// Register one repository by URL or `owner/repo` shorthand.
    ///
    /// Normalization is permissive: any non-URL string is treated as a
    /// GitHub path, and an unusable one surfaces later as that repository's
    /// own sync failure rather than aborting registration.
    pub fn add_repository(&mut self, url: &str) {
        let normalized = normalize_url(url);
        let name = repo_name(&normalized);
        let local_path = self.clone_directory.join(&name);
        self.repos.push(RepoSpec {
            url: normalized,
            name,
            local_path,
        });
    }

    /// Register a list of repositories.
    pub fn add_from_list<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for url in urls {
            self.add_repository(url.as_ref());
        }
    }

    pub fn repos(&self) -> &[RepoSpec] {
        &self.repos
    }

    /// Clone or update every registered repository.
    ///
    /// Failures are captured per repository; one broken remote never aborts
    /// the rest of the run.
    pub fn sync_all(&self) -> Result<Vec<(RepoSpec, SyncStatus)>> {
        std::fs::create_dir_all(&self.clone_directory)?;

        let mut outcomes = Vec::with_capacity(self.repos.len());
        for repo in &self.repos {
            let status = if repo.local_path.join(".git").exists() {
                match update_repository(&repo.local_path) {
                    Ok(()) => {
                        info!(repo = %repo.name, "updated");
                        SyncStatus::Updated
                    }
                    Err(e) => {
                        warn!(repo = %repo.name, error = %e, "update failed");
                        SyncStatus::Error(e.to_string())
                    }
                }
            } else {
                match clone_repository(&repo.url, &repo.local_path, self.token.as_deref()) {
                    Ok(()) => {
                        info!(repo = %repo.name, "cloned");
                        SyncStatus::Cloned
                    }
                    Err(e) => {
                        warn!(repo = %repo.name, error = %e, "clone failed");
                        SyncStatus::Error(e.to_string())
                    }
                }
            };
            outcomes.push((repo.clone(), status));
        }
        Ok(outcomes)
    }

    /// Local paths of repositories that actually exist on disk.
    pub fn repository_paths(&self) -> Vec<RepoSpec> {
        self.repos
            .iter()
            .filter(|r| r.local_path.is_dir())
            .cloned()
            .collect()
    }
}

/// Convert shorthand to a full URL.
///
/// Supports `owner/repo`, `github.com/owner/repo` and full http(s) URLs.
/// Anything else is assumed to be a GitHub path and left to fail at clone
/// time.
fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if url.starts_with("github.com/") {
        format!("https://{url}")
    } else {
        format!("https://github.com/{url}")
    }
}

/// Repository name from the last URL segment, minus any `.git` suffix.
fn repo_name(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git")
        .to_string()
}

/// Clone a repository with a full working tree.
fn clone_repository(url: &str, target: &Path, token: Option<&str>) -> Result<()> {
    let clone_url = match token {
        // Token auth over https for private repositories.
        Some(token) if url.starts_with("https://") => {
            url.replacen("https://", &format!("https://{token}@"), 1)
        }
        _ => url.to_string(),
    };

    let mut prepare = gix::prepare_clone(clone_url, target)
        .map_err(|e| Error::Remote(format!("Failed to prepare clone: {e}")))?;

    let (mut checkout, _outcome) = prepare
        .fetch_then_checkout(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
        .map_err(|e| Error::Remote(format!("Failed to clone: {e}")))?;

    let (_repo, _outcome) = checkout
        .main_worktree(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
        .map_err(|e| Error::Remote(format!("Failed to check out worktree: {e}")))?;

    Ok(())
}

/// Fast-forward an existing clone.
fn update_repository(repo_path: &Path) -> Result<()> {
    // Use the git command for pulling since gix merge plumbing is complex.
    let output = std::process::Command::new("git")
        .args(["pull", "--ff-only"])
        .current_dir(repo_path)
        .output()
        .map_err(|e| Error::Remote(format!("Failed to run git pull: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Remote(format!("Failed to update: {stderr}")));
    }

    Ok(())
}
