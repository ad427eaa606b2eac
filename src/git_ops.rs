use anyhow::{Context, Result, anyhow};
use git2::{Oid, Repository, Signature, Time};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

const FALLBACK_NAME: &str = "Workboard MCP";
const FALLBACK_EMAIL: &str = "workboard-mcp@localhost";

/// Commits the snapshot file into the repository that contains it
pub struct GitOps {
    repo: Option<Mutex<Repository>>,
}

impl GitOps {
    /// Discover the repository containing `file_path`, if any
    pub fn new(file_path: &Path) -> Self {
        let dir = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let repo = Repository::discover(dir).ok().map(Mutex::new);
        Self { repo }
    }

    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    fn lock(&self) -> Option<MutexGuard<'_, Repository>> {
        self.repo
            .as_ref()
            .map(|r| r.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn current_branch(repo: &Repository) -> Result<String> {
        let head = repo.head().context("Failed to get HEAD")?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("HEAD is not on a named branch"))
    }

    /// Stage `file_path` and commit it. Returns `None` when the file has no
    /// changes against HEAD.
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<Option<Oid>> {
        let Some(repo) = self.lock() else {
            return Ok(None);
        };

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let absolute = file_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", file_path.display()))?;
        let workdir = workdir
            .canonicalize()
            .context("Failed to resolve repository working directory")?;
        let relative = absolute
            .strip_prefix(&workdir)
            .context("Snapshot is not inside the repository")?;

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        if let Some(parent) = &parent
            && parent.tree_id() == tree.id()
        {
            debug!(path = %relative.display(), "snapshot unchanged, nothing to commit");
            return Ok(None);
        }

        let signature = Self::signature(&repo)?;
        let parents: Vec<_> = parent.iter().collect();
        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        debug!(%oid, commit_message = message, "snapshot committed");
        Ok(Some(oid))
    }

    /// Fast-forward the current branch from `origin`. Diverged histories are
    /// left for the user to merge.
    pub fn pull(&self) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };
        let branch = Self::current_branch(&repo)?;
        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        remote
            .fetch(&[branch.as_str()], None, None)
            .context("Failed to fetch from origin")?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let incoming = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&incoming])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if !analysis.is_fast_forward() {
            return Err(anyhow!(
                "Snapshot branch '{}' has diverged from origin; merge it manually",
                branch
            ));
        }

        let refname = format!("refs/heads/{}", branch);
        repo.find_reference(&refname)?
            .set_target(incoming.id(), "workboard: fast-forward")?;
        repo.set_head(&refname)?;
        repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
        info!(%branch, "snapshot fast-forwarded from origin");
        Ok(())
    }

    pub fn push(&self) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };
        let branch = Self::current_branch(&repo)?;
        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        remote.push(&[format!("refs/heads/{}", branch).as_str()], None)?;
        info!(%branch, "snapshot pushed");
        Ok(())
    }

    fn signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| FALLBACK_NAME.to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| FALLBACK_EMAIL.to_string());

        // Signature::now can fail on hosts without a usable clock
        Signature::now(&name, &email)
            .or_else(|_| Signature::new(&name, &email, &Time::new(1_700_000_000, 0)))
            .context("Failed to create commit signature")
    }
}
