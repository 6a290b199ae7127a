//! Filesystem capabilities used by the session and the undo stack.
//!
//! Everything that touches the disk goes through [`FileSystem`], so the
//! operation log can be exercised against any implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::scanner::{scan_directory, FileEntry, ListOptions, ScannerError};

#[derive(Error, Debug)]
pub enum FsError {
    #[error("No such file or directory: {0}")]
    NotFound(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move {path} to trash: {message}")]
    Trash { path: PathBuf, message: String },

    #[error("Cannot place {from} inside itself at {to}")]
    IntoItself { from: PathBuf, to: PathBuf },
}

impl FsError {
    fn from_io(action: &'static str, path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                action,
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// How [`FileSystem::delete_to_trash`] disposes of entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Recoverable trash where the platform has one, plain deletion elsewhere
    #[default]
    Trash,
    Permanent,
}

pub trait FileSystem {
    fn list_entries(&self, dir: &Path, options: &ListOptions) -> Result<Vec<FileEntry>, ScannerError>;

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    /// Like `rename`, but also works across devices.
    fn move_path(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    /// Copy a file, or a directory recursively.
    fn copy(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    fn delete_to_trash(&self, path: &Path) -> Result<(), FsError>;

    /// Remove without going through the trash.
    fn remove(&self, path: &Path) -> Result<(), FsError>;

    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct RealFileSystem {
    delete_mode: DeleteMode,
}

impl RealFileSystem {
    pub fn new(delete_mode: DeleteMode) -> Self {
        Self { delete_mode }
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }
}

impl FileSystem for RealFileSystem {
    fn list_entries(&self, dir: &Path, options: &ListOptions) -> Result<Vec<FileEntry>, ScannerError> {
        scan_directory(dir, options)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        fs::rename(from, to).map_err(|e| FsError::from_io("rename", from, e))?;
        info!("Renamed {:?} to {:?}", from, to);
        Ok(())
    }

    fn move_path(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        match fs::rename(from, to) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(?from, ?to, "Cross-device move, copying instead");
                move_by_copy(from, to)?;
            }
            Err(e) => return Err(FsError::from_io("move", from, e)),
        }
        info!("Moved {:?} to {:?}", from, to);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        copy_whole("copy", from, to)?;
        info!("Copied {:?} to {:?}", from, to);
        Ok(())
    }

    fn delete_to_trash(&self, path: &Path) -> Result<(), FsError> {
        if self.delete_mode == DeleteMode::Permanent {
            return self.remove(path);
        }

        if !self.exists(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        send_to_trash(path)?;
        info!("Moved to trash: {:?}", path);
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        remove_path(path).map_err(|e| FsError::from_io("remove", path, e))?;
        info!("Removed {:?}", path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }
}

#[cfg(any(
    windows,
    target_os = "macos",
    target_os = "linux",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
fn send_to_trash(path: &Path) -> Result<(), FsError> {
    trash::delete(path).map_err(|e| FsError::Trash {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "linux",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
)))]
fn send_to_trash(path: &Path) -> Result<(), FsError> {
    // No trash on this platform.
    remove_path(path).map_err(|e| FsError::from_io("remove", path, e))
}

/// Copy `from` to `to` completely or not at all.
///
/// A directory is never copied into itself, and a copy that fails part way
/// is removed again unless `to` was already there.
fn copy_whole(action: &'static str, from: &Path, to: &Path) -> Result<(), FsError> {
    if is_inside(from, to) {
        return Err(FsError::IntoItself {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    let existed = fs::symlink_metadata(to).is_ok();
    if let Err(e) = copy_recursive(from, to) {
        if !existed {
            if let Err(cleanup) = remove_path(to) {
                warn!(path = ?to, error = %cleanup, "Could not remove partial copy");
            }
        }
        return Err(FsError::from_io(action, from, e));
    }
    Ok(())
}

fn move_by_copy(from: &Path, to: &Path) -> Result<(), FsError> {
    copy_whole("move", from, to)?;
    remove_path(from).map_err(|e| FsError::from_io("move", from, e))
}

/// Whether `to` lies within the directory `from`
fn is_inside(from: &Path, to: &Path) -> bool {
    if !from.is_dir() {
        return false;
    }
    let (Ok(from), Some(parent), Some(name)) = (from.canonicalize(), to.parent(), to.file_name())
    else {
        return false;
    };
    match parent.canonicalize() {
        Ok(parent) => parent.join(name).starts_with(&from),
        Err(_) => false,
    }
}

fn copy_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dest)?;
    }
    Ok(())
}

fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn real() -> RealFileSystem {
        RealFileSystem::new(DeleteMode::Permanent)
    }

    #[test]
    fn test_rename() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        fs::write(&from, "data").unwrap();

        real().rename(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "data");
    }

    #[test]
    fn test_rename_missing_source() {
        let dir = tempdir().unwrap();
        let result = real().rename(&dir.path().join("gone"), &dir.path().join("x"));
        assert!(matches!(result, Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_move_between_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("dest")).unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("dest").join("a.txt");
        fs::write(&from, "data").unwrap();

        real().move_path(&from, &to).unwrap();

        assert!(!from.exists());
        assert!(to.exists());
    }

    #[test]
    fn test_move_by_copy() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("album");
        fs::create_dir(&from).unwrap();
        fs::write(from.join("track.flac"), "x").unwrap();
        let to = dir.path().join("moved");

        move_by_copy(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(to.join("track.flac")).unwrap(), "x");
    }

    #[test]
    fn test_move_by_copy_into_itself_keeps_source() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("album");
        fs::create_dir(&from).unwrap();

        let result = move_by_copy(&from, &from.join("album"));

        assert!(matches!(result, Err(FsError::IntoItself { .. })));
        assert!(from.is_dir());
    }

    #[test]
    fn test_copy_file() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        fs::write(&from, "data").unwrap();

        real().copy(&from, &to).unwrap();

        assert!(from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "data");
    }

    #[test]
    fn test_copy_directory_recursively() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("album");
        fs::create_dir_all(from.join("inner")).unwrap();
        fs::write(from.join("inner").join("track.flac"), "x").unwrap();

        let to = dir.path().join("album copy");
        real().copy(&from, &to).unwrap();

        assert!(to.join("inner").join("track.flac").exists());
        assert!(from.join("inner").join("track.flac").exists());
    }

    #[test]
    fn test_copy_directory_into_itself_is_rejected() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("album");
        fs::create_dir(&from).unwrap();
        fs::write(from.join("track.flac"), "x").unwrap();

        let result = real().copy(&from, &from.join("album"));

        assert!(matches!(result, Err(FsError::IntoItself { .. })));
        assert!(!from.join("album").exists());
    }

    #[test]
    fn test_copy_next_to_source_is_allowed() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("album");
        fs::create_dir(&from).unwrap();

        // Shares a name prefix with the source but is not inside it
        real().copy(&from, &dir.path().join("album2")).unwrap();

        assert!(dir.path().join("album2").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_copy_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("album");
        fs::create_dir(&from).unwrap();
        fs::write(from.join("track.flac"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), from.join("broken")).unwrap();

        let to = dir.path().join("album copy");
        let result = real().copy(&from, &to);

        assert!(result.is_err());
        assert!(!to.exists());
        assert!(from.join("track.flac").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_copy_keeps_existing_target() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("album");
        fs::create_dir(&from).unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), from.join("broken")).unwrap();
        let to = dir.path().join("existing");
        fs::create_dir(&to).unwrap();
        fs::write(to.join("mine.txt"), "keep").unwrap();

        assert!(real().copy(&from, &to).is_err());
        assert_eq!(fs::read_to_string(to.join("mine.txt")).unwrap(), "keep");
    }

    #[test]
    fn test_permanent_delete() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        let folder = dir.path().join("folder");
        fs::write(&file, "").unwrap();
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("inside"), "").unwrap();

        let fs_impl = real();
        fs_impl.delete_to_trash(&file).unwrap();
        fs_impl.delete_to_trash(&folder).unwrap();

        assert!(!fs_impl.exists(&file));
        assert!(!fs_impl.exists(&folder));
    }

    #[test]
    fn test_remove_missing() {
        let dir = tempdir().unwrap();
        let result = real().remove(&dir.path().join("gone"));
        assert!(matches!(result, Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_default_mode_is_trash() {
        assert_eq!(RealFileSystem::default().delete_mode(), DeleteMode::Trash);
    }
}
