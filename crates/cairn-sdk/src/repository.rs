use std::fs;
use std::path::{Path, PathBuf};

use cairn_dag::CommitWalker;
use cairn_refs::{validate_tag_name, FsRefStore, RefStore, RefTree};
use cairn_store::{
    LooseObjectStore, Object, ObjectStore, StoreError, StoredObject, Tag, TreeEntry,
};
use cairn_types::{ObjectId, ObjectKind};
use tracing::debug;

use crate::checkout;
use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};
use crate::identity::identity_line;
use crate::revision::RevisionResolver;

/// Name of the repository directory inside a worktree.
pub const GIT_DIR: &str = ".git";

/// Branch `HEAD` points at in a fresh repository.
pub const DEFAULT_BRANCH: &str = "refs/heads/master";

const DESCRIPTION: &str = "Unnamed repository; edit this file 'description' to name the repository.\n";

/// Identity used when the config has no `[user]` section.
const DEFAULT_USER: (&str, &str) = ("cairn", "cairn@localhost");

/// Digest of `payload` as an object of `kind`, without a repository.
///
/// Fails if the payload does not decode as that kind.
pub fn hash_payload(kind: ObjectKind, payload: &[u8]) -> SdkResult<ObjectId> {
    let stored = StoredObject::new(kind, payload.to_vec());
    Object::from_stored_object(&stored)?;
    Ok(stored.compute_id())
}

/// An on-disk repository: a worktree plus its `.git` directory.
pub struct Repository {
    worktree: PathBuf,
    gitdir: PathBuf,
    config: RepoConfig,
    objects: LooseObjectStore,
    refs: FsRefStore,
}

impl Repository {
    /// Create a new repository at `path`.
    ///
    /// `path` may already exist as a directory with files in it, but must not
    /// hold a non-empty `.git`.
    pub fn init(path: impl AsRef<Path>) -> SdkResult<Self> {
        let worktree = path.as_ref().to_path_buf();
        let gitdir = worktree.join(GIT_DIR);

        if worktree.exists() && !worktree.is_dir() {
            return Err(SdkError::DestinationNotDirectory(worktree));
        }
        if gitdir.exists() {
            if !gitdir.is_dir() {
                return Err(SdkError::DestinationNotDirectory(gitdir));
            }
            if fs::read_dir(&gitdir)?.next().is_some() {
                return Err(SdkError::DestinationNotEmpty(gitdir));
            }
        }

        for dir in ["objects", "refs/heads", "refs/tags", "branches"] {
            fs::create_dir_all(gitdir.join(dir))?;
        }
        fs::write(gitdir.join("description"), DESCRIPTION)?;

        let config = RepoConfig::default();
        config.save(gitdir.join("config"))?;

        let repo = Self::assemble(worktree, gitdir, config);
        repo.refs.set_symbolic("HEAD", DEFAULT_BRANCH)?;

        debug!(gitdir = %repo.gitdir.display(), "initialized repository");
        Ok(repo)
    }

    /// Open the repository whose worktree is `path`.
    pub fn open(path: impl AsRef<Path>) -> SdkResult<Self> {
        let worktree = path.as_ref().to_path_buf();
        let gitdir = worktree.join(GIT_DIR);
        if !gitdir.is_dir() {
            return Err(SdkError::NotARepository(worktree));
        }

        let config_path = gitdir.join("config");
        if !config_path.is_file() {
            return Err(SdkError::Config(format!(
                "missing {}",
                config_path.display()
            )));
        }
        let config = RepoConfig::from_toml_file(&config_path)?;

        Ok(Self::assemble(worktree, gitdir, config))
    }

    /// Open the repository containing `path`, searching parent directories.
    pub fn discover(path: impl AsRef<Path>) -> SdkResult<Self> {
        let start = fs::canonicalize(path.as_ref())?;
        for dir in start.ancestors() {
            if dir.join(GIT_DIR).is_dir() {
                debug!(worktree = %dir.display(), "discovered repository");
                return Self::open(dir);
            }
        }
        Err(SdkError::NotARepository(start))
    }

    fn assemble(worktree: PathBuf, gitdir: PathBuf, config: RepoConfig) -> Self {
        Self {
            objects: LooseObjectStore::new(gitdir.join("objects")),
            refs: FsRefStore::new(&gitdir),
            worktree,
            gitdir,
            config,
        }
    }

    // ---- Accessors ----

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn gitdir(&self) -> &Path {
        &self.gitdir
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn objects(&self) -> &LooseObjectStore {
        &self.objects
    }

    pub fn refs(&self) -> &FsRefStore {
        &self.refs
    }

    // ---- Objects ----

    pub fn read_object(&self, id: &ObjectId) -> SdkResult<Object> {
        Ok(self.objects.get(id)?)
    }

    /// Write an object after checking that commits and tags point at
    /// objects of the right kind.
    pub fn write_object(&self, object: &Object) -> SdkResult<ObjectId> {
        self.check_links(object)?;
        Ok(self.objects.write(object)?)
    }

    /// Digest of `payload` as an object of `kind`, optionally storing it.
    ///
    /// The payload is decoded first, so malformed trees, commits and tags are
    /// rejected either way. The digest covers the payload bytes exactly as
    /// given.
    pub fn hash_object(&self, kind: ObjectKind, payload: &[u8], write: bool) -> SdkResult<ObjectId> {
        if !write {
            return hash_payload(kind, payload);
        }
        let stored = StoredObject::new(kind, payload.to_vec());
        self.check_links(&Object::from_stored_object(&stored)?)?;
        Ok(self.objects.write_raw(&stored)?)
    }

    fn check_links(&self, object: &Object) -> SdkResult<()> {
        match object {
            Object::Commit(commit) => {
                self.expect_kind(&commit.tree()?, ObjectKind::Tree)?;
                for parent in commit.parents()? {
                    self.expect_kind(&parent, ObjectKind::Commit)?;
                }
            }
            Object::Tag(tag) => {
                self.expect_kind(&tag.object()?, tag.target_kind()?)?;
            }
            Object::Blob(_) | Object::Tree(_) => {}
        }
        Ok(())
    }

    fn expect_kind(&self, id: &ObjectId, expected: ObjectKind) -> SdkResult<()> {
        let found = self.objects.kind_of(id)?;
        if found != expected {
            return Err(StoreError::UnexpectedKind {
                id: *id,
                expected,
                found,
            }
            .into());
        }
        Ok(())
    }

    /// List a tree's entries with their paths.
    ///
    /// With `recursive`, subtrees are expanded in place and only their
    /// non-tree entries are reported, under `/`-joined paths. Paths are for
    /// display; names that are not UTF-8 are shown lossily.
    pub fn ls_tree(&self, tree: &ObjectId, recursive: bool) -> SdkResult<Vec<(String, TreeEntry)>> {
        let mut out = Vec::new();
        let mut stack = vec![(String::new(), self.objects.read_tree(tree)?.entries.into_iter())];

        while let Some((prefix, entries)) = stack.last_mut() {
            let Some(entry) = entries.next() else {
                stack.pop();
                continue;
            };
            let path = if prefix.is_empty() {
                entry.name_lossy().into_owned()
            } else {
                format!("{prefix}/{}", entry.name_lossy())
            };

            if recursive && entry.mode.is_tree() {
                let sub = self.objects.read_tree(&entry.object_id)?;
                stack.push((path, sub.entries.into_iter()));
            } else {
                out.push((path, entry));
            }
        }
        Ok(out)
    }

    // ---- Refs ----

    /// Point the full ref `name` at `id`.
    pub fn create_ref(&self, name: &str, id: &ObjectId) -> SdkResult<()> {
        self.refs.create(name, id)?;
        Ok(())
    }

    /// Create the lightweight tag `refs/tags/<name>`.
    pub fn tag(&self, name: &str, target: &ObjectId) -> SdkResult<()> {
        validate_tag_name(name)?;
        self.objects.kind_of(target)?;
        self.create_ref(&format!("refs/tags/{name}"), target)
    }

    /// Write a tag object for `target` and point `refs/tags/<name>` at it.
    pub fn create_annotated_tag(
        &self,
        name: &str,
        target: &ObjectId,
        tagger: &str,
        message: &str,
    ) -> SdkResult<ObjectId> {
        validate_tag_name(name)?;
        let kind = self.objects.kind_of(target)?;
        let tag = Tag::new(*target, kind, name, tagger, message);
        let id = self.write_object(&Object::Tag(tag))?;
        self.create_ref(&format!("refs/tags/{name}"), &id)?;
        Ok(id)
    }

    /// All refs under `namespace` (normally `refs`), resolved.
    pub fn list_refs(&self, namespace: &str) -> SdkResult<RefTree> {
        Ok(self.refs.list(namespace)?)
    }

    /// The configured identity stamped with the current local time.
    pub fn identity(&self) -> String {
        let (name, email) = match &self.config.user {
            Some(user) => (user.name.as_str(), user.email.as_str()),
            None => DEFAULT_USER,
        };
        identity_line(name, email, &chrono::Local::now())
    }

    // ---- Revisions, history and checkout ----

    pub fn resolver(&self) -> RevisionResolver<'_> {
        RevisionResolver::new(&self.objects, &self.refs)
    }

    /// Resolve a revision name; see [`RevisionResolver::resolve`].
    pub fn resolve(&self, name: &str, kind: Option<ObjectKind>, follow: bool) -> SdkResult<ObjectId> {
        self.resolver().resolve(name, kind, follow)
    }

    /// Walk the ancestry of the commit `start`.
    pub fn walk(&self, start: &ObjectId) -> CommitWalker<'_, LooseObjectStore> {
        CommitWalker::new(&self.objects, *start)
    }

    /// Materialize `tree` into `dest`; see [`checkout::checkout`].
    pub fn checkout(&self, tree: &ObjectId, dest: impl AsRef<Path>) -> SdkResult<usize> {
        checkout::checkout(&self.objects, tree, dest.as_ref())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("worktree", &self.worktree)
            .field("gitdir", &self.gitdir)
            .field("config", &self.config)
            .finish()
    }
}
