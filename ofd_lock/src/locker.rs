//! Lock handle / 锁句柄
//!
//! Exclusive whole-file write lock tied to one open file description.
//! 绑定到单个打开文件描述的整文件排他写锁。

use std::{
  fs::{self, File, OpenOptions},
  io,
  os::fd::{AsRawFd, IntoRawFd},
  path::{Path, PathBuf},
  sync::atomic::{AtomicBool, Ordering},
  thread,
  time::{Duration, Instant},
};

use log::{debug, trace};

use crate::{
  Conf, Error, ParsedConf, Result,
  conf::retry_or_default,
  os,
};

/// Lock handle on a path / 路径锁句柄
///
/// `file` is `Some` exactly while the lock is held.
/// `file` 为 `Some` 当且仅当持有锁。
#[derive(Debug)]
pub struct Locker {
  path: PathBuf,
  retry: Duration,
  max_wait: Option<Duration>,
  file: Option<File>,
}

impl Locker {
  /// New handle, no I/O. Zero `retry` means 250ms
  /// 创建句柄，不做 I/O。`retry` 为零时使用 250ms
  pub fn new(path: impl Into<PathBuf>, retry: Duration) -> Self {
    Self {
      path: path.into(),
      retry: retry_or_default(retry),
      max_wait: None,
      file: None,
    }
  }

  /// New handle from options / 按配置创建句柄
  pub fn with_conf(path: impl Into<PathBuf>, conf: &[Conf]) -> Self {
    let c = ParsedConf::parse(conf);
    Self {
      path: path.into(),
      retry: c.retry,
      max_wait: c.max_wait,
      file: None,
    }
  }

  /// Caller's path until a lock succeeds, absolute afterwards
  /// 加锁成功前为调用方路径，之后为绝对路径
  #[inline]
  pub fn path(&self) -> &Path {
    &self.path
  }

  #[inline]
  pub fn retry(&self) -> Duration {
    self.retry
  }

  #[inline]
  pub fn held(&self) -> bool {
    self.file.is_some()
  }

  /// Held description, clones share the lock
  /// 持有的文件描述，其克隆共享同一把锁
  #[inline]
  pub fn file(&self) -> Option<&File> {
    self.file.as_ref()
  }

  /// Block until locked, bounded by `Conf::MaxWait` if set
  /// 阻塞直到加锁成功，设置 `Conf::MaxWait` 时有上限
  pub fn lock(&mut self) -> Result<()> {
    if let Some(wait) = self.max_wait {
      return self.lock_timeout(wait);
    }
    let retry = self.retry;
    self.wait(|_| Ok(retry))
  }

  /// Block until locked or `wait` elapsed / 阻塞直到加锁成功或超时
  pub fn lock_timeout(&mut self, wait: Duration) -> Result<()> {
    let retry = self.retry;
    let start = Instant::now();
    self.wait(|path| {
      let waited = start.elapsed();
      match wait.checked_sub(waited) {
        Some(left) if !left.is_zero() => Ok(left.min(retry)),
        _ => Err(Error::Timeout {
          path: path.to_path_buf(),
          waited,
        }),
      }
    })
  }

  /// Block until locked or `stop` is set / 阻塞直到加锁成功或 `stop` 被置位
  pub fn lock_cancel(&mut self, stop: &AtomicBool) -> Result<()> {
    let retry = self.retry;
    self.wait(|path| {
      if stop.load(Ordering::Acquire) {
        return Err(Error::Cancelled(path.to_path_buf()));
      }
      Ok(retry)
    })
  }

  /// Single attempt, `Error::Locked` if held elsewhere
  /// 仅尝试一次，被他处持有时返回 `Error::Locked`
  pub fn try_lock(&mut self) -> Result<()> {
    let (abs, file) = self.open()?;
    if !attempt(&abs, &file)? {
      return Err(Error::Locked(abs));
    }
    self.commit(abs, file);
    Ok(())
  }

  /// Release by closing the description / 关闭文件描述以释放锁
  ///
  /// Descriptors cloned from `file()` keep the lock until they close too.
  pub fn unlock(&mut self) -> Result<()> {
    let Some(file) = self.file.take() else {
      return Err(Error::NotLocked(self.path.clone()));
    };
    let fd = file.into_raw_fd();
    // SAFETY: fd came from into_raw_fd and is closed exactly once here
    // 安全：fd 来自 into_raw_fd，此处仅关闭一次
    if unsafe { libc::close(fd) } != 0 {
      return Err(Error::Close {
        path: self.path.clone(),
        source: io::Error::last_os_error(),
      });
    }
    debug!("unlocked {}", self.path.display());
    Ok(())
  }

  /// Retry loop, `pause` picks the sleep after each contended attempt or aborts
  fn wait<F>(&mut self, mut pause: F) -> Result<()>
  where
    F: FnMut(&Path) -> Result<Duration>,
  {
    let (abs, file) = self.open()?;
    while !attempt(&abs, &file)? {
      let sleep = pause(&abs)?;
      trace!("{} contended, retry in {sleep:?}", abs.display());
      thread::sleep(sleep);
    }
    self.commit(abs, file);
    Ok(())
  }

  fn open(&self) -> Result<(PathBuf, File)> {
    if self.file.is_some() {
      return Err(Error::AlreadyHeld(self.path.clone()));
    }
    let abs = resolve(&self.path)?;
    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .open(&abs)
      .map_err(|source| Error::Open {
        path: abs.clone(),
        source,
      })?;
    Ok((abs, file))
  }

  fn commit(&mut self, abs: PathBuf, file: File) {
    debug!("locked {}", abs.display());
    self.path = abs;
    self.file = Some(file);
  }
}

/// Whether another description holds the lock on `path`
/// `path` 上的锁是否被其他文件描述持有
///
/// Probes through a fresh read-only description, closed before return.
pub fn is_locked(path: impl AsRef<Path>) -> Result<bool> {
  let abs = resolve(path.as_ref())?;
  let file = File::open(&abs).map_err(|source| Error::Open {
    path: abs.clone(),
    source,
  })?;
  os::query(file.as_raw_fd()).map_err(|source| Error::Lock { path: abs, source })
}

/// Absolute path naming an existing regular file / 指向已存在普通文件的绝对路径
fn resolve(path: &Path) -> Result<PathBuf> {
  let abs = std::path::absolute(path).map_err(|source| Error::Resolve {
    path: path.to_path_buf(),
    source,
  })?;
  let meta = match fs::metadata(&abs) {
    Ok(meta) => meta,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(Error::NotFound(abs)),
    Err(source) => return Err(Error::Stat { path: abs, source }),
  };
  if meta.is_dir() {
    return Err(Error::IsDir(abs));
  }
  if !meta.is_file() {
    return Err(Error::NotRegular(abs));
  }
  Ok(abs)
}

fn attempt(path: &Path, file: &File) -> Result<bool> {
  os::try_lock(file.as_raw_fd()).map_err(|source| Error::Lock {
    path: path.to_path_buf(),
    source,
  })
}
