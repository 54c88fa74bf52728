#![cfg_attr(docsrs, feature(doc_cfg))]

//! # ofd_lock - Fork-safe file lock / 进程派生安全的文件锁
//!
//! Advisory inter-process lock on a path using open file description locks.
//! The lock belongs to the open file description, not the process: it is
//! inherited by `dup` and `fork`, and released when the last descriptor
//! referring to the description is closed, including on process death.
//! 基于打开文件描述锁的跨进程建议锁。锁归属于打开文件描述而非进程：
//! `dup` 与 `fork` 会继承，最后一个引用关闭时释放（包括进程退出）。
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let mut a = ofd_lock::Locker::new("/tmp/x.lock", Duration::ZERO);
//! a.lock()?;
//!
//! let mut b = ofd_lock::Locker::new("/tmp/x.lock", Duration::ZERO);
//! assert!(b.try_lock().unwrap_err().is_locked());
//!
//! a.unlock()?;
//! b.try_lock()?;
//! # Ok::<(), ofd_lock::Error>(())
//! ```

use std::time::Duration;

pub mod conf;
pub mod error;
mod locker;
mod os;

pub use conf::{Conf, ParsedConf};
pub use error::{Error, Result};
pub use locker::{Locker, is_locked};

/// Sleep between blocking retries / 阻塞重试默认间隔
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(250);
