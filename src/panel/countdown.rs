use serde::Serialize;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeLeft {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
}

impl TimeLeft {
    pub fn from_millis(diff: u64) -> Self {
        Self {
            days: diff / MS_PER_DAY,
            hours: (diff / MS_PER_HOUR) % 24,
            minutes: (diff / MS_PER_MINUTE) % 60,
            seconds: (diff / MS_PER_SECOND) % 60,
            milliseconds: diff % MS_PER_SECOND,
        }
    }

    /// `D:HH:MM:SS.mmm`
    pub fn display(&self) -> String {
        format!(
            "{}:{:02}:{:02}:{:02}.{:03}",
            self.days, self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running,
    Expired,
}

/// Fixed deadline set at mount. Once the deadline passes the display
/// freezes at zero.
#[derive(Debug, Clone)]
pub struct Countdown {
    deadline_ms: u64,
    left: TimeLeft,
    expired: bool,
}

impl Countdown {
    pub fn new(mount_ms: u64, days: u64) -> Self {
        Self {
            deadline_ms: mount_ms.saturating_add(days.saturating_mul(MS_PER_DAY)),
            left: TimeLeft { days, ..TimeLeft::default() },
            expired: false,
        }
    }

    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    pub fn left(&self) -> TimeLeft {
        self.left
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn tick(&mut self, now_ms: u64) -> CountdownTick {
        if self.expired {
            return CountdownTick::Expired;
        }
        if now_ms >= self.deadline_ms {
            self.expired = true;
            self.left = TimeLeft::default();
            return CountdownTick::Expired;
        }
        self.left = TimeLeft::from_millis(self.deadline_ms - now_ms);
        CountdownTick::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_each_unit() {
        let diff = MS_PER_DAY + MS_PER_HOUR + MS_PER_MINUTE + MS_PER_SECOND + 1;
        assert_eq!(
            TimeLeft::from_millis(diff),
            TimeLeft { days: 1, hours: 1, minutes: 1, seconds: 1, milliseconds: 1 }
        );
    }

    #[test]
    fn ten_day_deadline_from_mount() {
        let mut c = Countdown::new(1_000, 10);
        assert_eq!(c.left().days, 10);
        assert_eq!(c.tick(1_000 + 41), CountdownTick::Running);
        assert_eq!(
            c.left(),
            TimeLeft { days: 9, hours: 23, minutes: 59, seconds: 59, milliseconds: 959 }
        );
        assert_eq!(c.left().display(), "9:23:59:59.959");
    }

    #[test]
    fn freezes_at_zero_after_deadline() {
        let mut c = Countdown::new(0, 1);
        c.tick(MS_PER_DAY - 1);
        assert_eq!(c.left().milliseconds, 1);
        assert_eq!(c.tick(MS_PER_DAY), CountdownTick::Expired);
        assert!(c.is_expired());
        assert_eq!(c.left(), TimeLeft::default());
        assert_eq!(c.tick(MS_PER_DAY * 5), CountdownTick::Expired);
        assert_eq!(c.left().display(), "0:00:00:00.000");
    }

    #[test]
    fn oversized_deadline_saturates() {
        let mut c = Countdown::new(1_700_000_000_000, u64::MAX / MS_PER_DAY);
        assert_eq!(c.deadline_ms(), u64::MAX);
        assert_eq!(c.tick(1_700_000_000_041), CountdownTick::Running);
        assert!(!c.is_expired());
    }
}
