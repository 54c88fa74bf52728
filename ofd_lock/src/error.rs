//! Error types for ofd_lock
//! ofd_lock 错误类型

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("resolve {path:?}: {source}")]
  Resolve { path: PathBuf, source: io::Error },

  #[error("path doesn't exist: {0:?}")]
  NotFound(PathBuf),

  #[error("stat {path:?}: {source}")]
  Stat { path: PathBuf, source: io::Error },

  #[error("directory not allowed: {0:?}")]
  IsDir(PathBuf),

  #[error("not a regular file: {0:?}")]
  NotRegular(PathBuf),

  #[error("open {path:?}: {source}")]
  Open { path: PathBuf, source: io::Error },

  #[error("lock {path:?}: {source}")]
  Lock { path: PathBuf, source: io::Error },

  /// Held by another open file description / 已被其他打开文件描述持有
  #[error("file locked / 文件已锁定: {0:?}")]
  Locked(PathBuf),

  #[error("lock {path:?} timed out after {waited:?}")]
  Timeout { path: PathBuf, waited: Duration },

  #[error("lock {0:?} cancelled")]
  Cancelled(PathBuf),

  #[error("already holding lock on {0:?}")]
  AlreadyHeld(PathBuf),

  #[error("not locked: {0:?}")]
  NotLocked(PathBuf),

  #[error("close {path:?}: {source}")]
  Close { path: PathBuf, source: io::Error },
}

impl Error {
  /// Lock is contended, not broken / 锁被争用而非出错
  #[inline]
  pub fn is_locked(&self) -> bool {
    matches!(self, Self::Locked(_))
  }
}
