//! Materializing a tree onto the filesystem.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cairn_store::{EntryKind, Object, ObjectStore, Tree, TreeEntry};
use cairn_types::ObjectId;
use tracing::{debug, warn};

use crate::error::{SdkError, SdkResult};

/// Write the contents of `tree` into `dest`.
///
/// `dest` must be an empty directory or not exist yet, in which case it is
/// created. Subtrees become directories and blobs become files. On Unix,
/// executable entries get their exec bits and symlink entries become
/// symlinks. Submodule entries are skipped. Returns the number of files
/// written.
pub fn checkout(store: &dyn ObjectStore, tree: &ObjectId, dest: &Path) -> SdkResult<usize> {
    let root = store.read_tree(tree)?;
    prepare_destination(dest)?;

    let mut written = 0;
    let mut work: Vec<(PathBuf, Tree)> = vec![(dest.to_path_buf(), root)];

    while let Some((dir, level)) = work.pop() {
        for entry in level.entries {
            let path = dir.join(checked_name(&entry)?);

            if entry.mode.kind() == Some(EntryKind::Gitlink) {
                warn!(path = %path.display(), "skipping submodule entry");
                continue;
            }

            match store.get(&entry.object_id)? {
                Object::Tree(sub) => {
                    fs::create_dir(&path)?;
                    work.push((path, sub));
                }
                Object::Blob(blob) => {
                    write_blob(&entry, &path, &blob.data)?;
                    written += 1;
                }
                other => {
                    warn!(
                        path = %path.display(),
                        kind = %other.kind(),
                        "skipping tree entry that is neither blob nor tree"
                    );
                }
            }
        }
    }

    debug!(tree = %tree, dest = %dest.display(), files = written, "checked out tree");
    Ok(written)
}

fn prepare_destination(dest: &Path) -> SdkResult<()> {
    match fs::metadata(dest) {
        Ok(meta) if !meta.is_dir() => Err(SdkError::DestinationNotDirectory(dest.to_path_buf())),
        Ok(_) => {
            if fs::read_dir(dest)?.next().is_some() {
                return Err(SdkError::DestinationNotEmpty(dest.to_path_buf()));
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dest)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Entry names must be a single, ordinary path segment.
fn checked_name(entry: &TreeEntry) -> SdkResult<&OsStr> {
    let name = entry.name.as_slice();
    if name.is_empty()
        || name == b"."
        || name == b".."
        || name.iter().any(|b| matches!(b, b'/' | b'\\' | 0))
    {
        return Err(SdkError::UnsafePath(entry.name_lossy().into_owned()));
    }
    os_name(entry)
}

#[cfg(unix)]
fn os_name(entry: &TreeEntry) -> SdkResult<&OsStr> {
    use std::os::unix::ffi::OsStrExt;
    Ok(OsStr::from_bytes(&entry.name))
}

#[cfg(not(unix))]
fn os_name(entry: &TreeEntry) -> SdkResult<&OsStr> {
    std::str::from_utf8(&entry.name)
        .map(OsStr::new)
        .map_err(|_| SdkError::UnsafePath(entry.name_lossy().into_owned()))
}

fn write_blob(entry: &TreeEntry, path: &Path, data: &[u8]) -> SdkResult<()> {
    match entry.mode.kind() {
        #[cfg(unix)]
        Some(EntryKind::Symlink) => {
            use std::os::unix::ffi::OsStrExt;
            let target = OsStr::from_bytes(data);
            std::os::unix::fs::symlink(target, path)?;
        }
        #[cfg(unix)]
        Some(EntryKind::Executable) => {
            use std::os::unix::fs::PermissionsExt;
            fs::write(path, data)?;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
        }
        Some(_) => fs::write(path, data)?,
        None => {
            warn!(path = %path.display(), mode = %entry.mode, "unsupported mode, writing as regular file");
            fs::write(path, data)?;
        }
    }
    Ok(())
}
