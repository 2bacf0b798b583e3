//! core::lock
//!
//! Single-writer guard for mutating commands.
//!
//! Staging, committing and fetching all touch the index and the ref store
//! without coordination of their own, so `push`, `pull`, `set-url` and
//! `delete-branch` hold this guard for their whole run. Read-only commands
//! (`info`, `status`) never take it.
//!
//! The guard is an OS-level exclusive lock (via `fs2`) on
//! `<git_dir>/scm/lock`. The file also records the pid of the holder, which
//! is only informational: the OS lock is what excludes other processes, and
//! it disappears with the process even if the file is left behind.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Directory under the git dir that holds everything `scm` writes.
const SCM_DIR: &str = "scm";
const LOCK_FILE: &str = "lock";

#[derive(Debug, Error)]
pub enum LockError {
    #[error("repository is locked by another scm process")]
    AlreadyLocked,

    #[error("cannot prepare lock file {path}")]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot lock {path}")]
    Acquire {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Held exclusive lock; dropping it unlocks.
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
    file: File,
}

impl RepoLock {
    /// Where the lock for the repository at `git_dir` lives.
    pub fn lock_path(git_dir: &Path) -> PathBuf {
        git_dir.join(SCM_DIR).join(LOCK_FILE)
    }

    /// Take the lock without waiting.
    ///
    /// Returns [`LockError::AlreadyLocked`] when another process holds it.
    pub fn acquire(git_dir: &Path) -> Result<Self, LockError> {
        let path = Self::lock_path(git_dir);
        let prepare = |source| LockError::Prepare {
            path: path.clone(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(prepare)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(prepare)?;

        if let Err(source) = file.try_lock_exclusive() {
            if source.kind() == io::ErrorKind::WouldBlock {
                return Err(LockError::AlreadyLocked);
            }
            return Err(LockError::Acquire { path, source });
        }

        // Only the holder rewrites the pid, so the truncate is race free.
        record_holder(&mut file).map_err(prepare)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pid stored by whoever last held the lock at `git_dir`, if readable.
    pub fn last_holder(git_dir: &Path) -> Option<u32> {
        let mut contents = String::new();
        File::open(Self::lock_path(git_dir))
            .and_then(|mut f| f.read_to_string(&mut contents))
            .ok()?;
        contents.trim().parse().ok()
    }
}

fn record_holder(file: &mut File) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
