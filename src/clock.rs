use chrono::{DateTime, Local};

/// 时钟抽象，方便在测试中注入固定时间
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// 生产环境使用的系统时钟
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// 固定时钟，每次返回同一个时间点
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_the_injected_instant() {
        let instant = Local.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}
