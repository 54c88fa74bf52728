//! Platform lock primitives
//! 平台锁原语
//!
//! Every target exposes the same capability: an exclusive whole-file lock
//! owned by the open file description, requested without blocking, and a
//! query for a conflicting holder.
//! 各平台提供相同能力：非阻塞地获取归属于打开文件描述的整文件排他锁，以及查询冲突持有者。

#[cfg(target_os = "linux")]
mod linux;
#[cfg(all(unix, not(target_os = "linux")))]
mod unix;

#[cfg(target_os = "linux")]
pub use linux::*;
#[cfg(all(unix, not(target_os = "linux")))]
pub use unix::*;

#[cfg(not(unix))]
compile_error!("unsupported platform");
