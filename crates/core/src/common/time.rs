use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// # Summary
/// 时间供给器接口，缓存条目的写入时间与过期判断都通过它取当前时间。
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 读取操作系统时间的真实时钟。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 手动拨动的时钟，供测试构造"过期"与"新鲜"的缓存条目。
///
/// # Invariants
/// - 内部 `RwLock` 被毒化时仍沿用其中的值，不向调用方传播 panic。
pub struct FakeClockProvider {
    current: RwLock<DateTime<Utc>>,
}

impl FakeClockProvider {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// 将时钟向前拨动 `delta`。
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard += delta;
    }

    /// 强制修改时钟的当前时间
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = new_time;
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fake_clock_advances_and_resets() {
        let start = Utc.with_ymd_and_hms(2021, 5, 10, 0, 0, 0).unwrap();
        let clock = FakeClockProvider::new(start);
        clock.advance(Duration::hours(25));
        assert_eq!(clock.now(), start + Duration::hours(25));
        clock.set_time(start);
        assert_eq!(clock.now(), start);
    }
}
