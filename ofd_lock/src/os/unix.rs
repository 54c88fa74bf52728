//! BSD `flock` fallback for unix targets without OFD `fcntl` commands
//! 无 OFD `fcntl` 命令的 unix 平台使用 BSD `flock`
//!
//! `flock` locks are also owned by the open file description, inherited
//! across `fork`/`dup` and released on last close. Differences from the
//! Linux path:
//! - always whole-file, no byte ranges
//! - they do not conflict with `fcntl` record locks held by other programs
//! - some network filesystems emulate them with `fcntl`, which turns them
//!   back into process-owned locks

use std::{io, os::fd::RawFd};

pub fn is_contention(err: &io::Error) -> bool {
  match err.raw_os_error() {
    Some(code) => code == libc::EWOULDBLOCK || code == libc::EAGAIN,
    None => false,
  }
}

pub fn try_lock(fd: RawFd) -> io::Result<bool> {
  loop {
    // SAFETY: fd is open for the duration of the call
    // 安全：调用期间 fd 保持打开
    if unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) } == 0 {
      return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.kind() == io::ErrorKind::Interrupted {
      continue;
    }
    if is_contention(&err) {
      return Ok(false);
    }
    return Err(err);
  }
}

/// No query command exists, probe with a lock and drop it at once
/// 无查询命令，加锁探测后立即释放
pub fn query(fd: RawFd) -> io::Result<bool> {
  if !try_lock(fd)? {
    return Ok(true);
  }
  // SAFETY: fd is open and holds the lock just taken
  // 安全：fd 保持打开且持有刚获取的锁
  if unsafe { libc::flock(fd, libc::LOCK_UN) } != 0 {
    return Err(io::Error::last_os_error());
  }
  Ok(false)
}
