//! Linux open file description locks
//! Linux 打开文件描述锁
//!
//! `F_OFD_SETLK` locks conflict with classic `F_SETLK` record locks but are
//! owned by the open file description: inherited across `fork`/`dup` and
//! released when the last reference to the description is closed.

use std::{io, mem, os::fd::RawFd};

/// Exclusive lock from offset 0 to EOF and beyond / 从 0 到文件末尾之后的排他锁
fn whole_file() -> libc::flock {
  // l_pid must be 0 for OFD commands, zeroed also covers per-arch padding
  // SAFETY: libc::flock is plain old data, all-zero is a valid value
  // 安全：libc::flock 为纯数据结构，全零是合法值
  let mut fl: libc::flock = unsafe { mem::zeroed() };
  fl.l_type = libc::F_WRLCK as libc::c_short;
  fl.l_whence = libc::SEEK_SET as libc::c_short;
  fl
}

/// Another description holds the lock / 其他描述持有锁
///
/// POSIX allows either EAGAIN or EACCES for a conflicting lock.
pub fn is_contention(err: &io::Error) -> bool {
  match err.raw_os_error() {
    Some(code) => code == libc::EAGAIN || code == libc::EWOULDBLOCK || code == libc::EACCES,
    None => false,
  }
}

/// Try exclusive lock, `Ok(false)` on contention / 尝试排他锁，争用时返回 `Ok(false)`
pub fn try_lock(fd: RawFd) -> io::Result<bool> {
  let fl = whole_file();
  loop {
    // SAFETY: fd is open for the call, fl outlives it
    // 安全：调用期间 fd 保持打开，fl 生命周期覆盖调用
    if unsafe { libc::fcntl(fd, libc::F_OFD_SETLK, &fl) } == 0 {
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

/// Whether a conflicting lock exists / 是否存在冲突锁
pub fn query(fd: RawFd) -> io::Result<bool> {
  let mut fl = whole_file();
  // SAFETY: fd is open, kernel writes back into fl only
  // 安全：fd 保持打开，内核只回写 fl
  if unsafe { libc::fcntl(fd, libc::F_OFD_GETLK, &mut fl) } < 0 {
    return Err(io::Error::last_os_error());
  }
  Ok(fl.l_type != libc::F_UNLCK as libc::c_short)
}
