//! Locker configuration / 锁配置

use std::time::Duration;

use crate::DEFAULT_RETRY_INTERVAL;

/// Locker configuration options / 锁配置选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conf {
  /// Sleep between blocking retries, zero keeps default
  /// 阻塞重试间隔，零值使用默认值
  RetryInterval(Duration),
  /// Upper bound for `Locker::lock`, unbounded if unset
  /// `Locker::lock` 最长等待时间，未设置则无限等待
  MaxWait(Duration),
}

/// Parsed config / 解析后的配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedConf {
  pub retry: Duration,
  pub max_wait: Option<Duration>,
}

impl Default for ParsedConf {
  fn default() -> Self {
    Self {
      retry: DEFAULT_RETRY_INTERVAL,
      max_wait: None,
    }
  }
}

impl ParsedConf {
  pub fn parse(conf: &[Conf]) -> Self {
    let mut c = Self::default();
    for item in conf {
      match *item {
        Conf::RetryInterval(v) => c.retry = retry_or_default(v),
        Conf::MaxWait(v) => c.max_wait = Some(v),
      }
    }
    c
  }
}

#[inline]
pub(crate) fn retry_or_default(retry: Duration) -> Duration {
  if retry.is_zero() {
    DEFAULT_RETRY_INTERVAL
  } else {
    retry
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_empty() {
    let c = ParsedConf::parse(&[]);
    assert_eq!(c.retry, Duration::from_millis(250));
    assert_eq!(c.max_wait, None);
  }

  #[test]
  fn parse_zero_retry_keeps_default() {
    let c = ParsedConf::parse(&[Conf::RetryInterval(Duration::ZERO)]);
    assert_eq!(c.retry, DEFAULT_RETRY_INTERVAL);
  }

  #[test]
  fn parse_last_wins() {
    let c = ParsedConf::parse(&[
      Conf::RetryInterval(Duration::from_millis(10)),
      Conf::MaxWait(Duration::from_secs(1)),
      Conf::RetryInterval(Duration::from_millis(20)),
    ]);
    assert_eq!(c.retry, Duration::from_millis(20));
    assert_eq!(c.max_wait, Some(Duration::from_secs(1)));
  }
}
