use std::time::Duration;

/// Cycles the hero headline's trailing word.
///
/// Every `interval` the word blanks out for `gap`, then the next word
/// appears. The shown word is a pure function of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRotator {
    words: Vec<String>,
    interval: Duration,
    gap: Duration,
}

impl WordRotator {
    pub fn new(words: Vec<String>, interval: Duration, gap: Duration) -> Self {
        Self {
            words,
            interval,
            gap,
        }
    }

    /// Index of the word cycle at `now`.
    pub fn index_at(&self, now: Duration) -> usize {
        if self.words.is_empty() || self.interval.is_zero() {
            return 0;
        }
        let cycle = now.as_millis() / self.interval.as_millis();
        (cycle % self.words.len() as u128) as usize
    }

    /// Word to display at `now`; `None` during the blank gap.
    pub fn word_at(&self, now: Duration) -> Option<&str> {
        if self.interval.is_zero() {
            return self.words.first().map(String::as_str);
        }
        let period = self.interval.as_millis();
        let millis = now.as_millis();
        if millis >= period && millis % period < self.gap.as_millis() {
            return None;
        }
        self.words.get(self.index_at(now)).map(String::as_str)
    }

    /// Time until the display next changes.
    pub fn next_change(&self, now: Duration) -> Duration {
        let period = self.interval.as_millis();
        if period == 0 || self.words.len() < 2 {
            return Duration::MAX;
        }
        let offset = now.as_millis() % period;
        let gap = self.gap.as_millis();
        let wait = if now.as_millis() >= period && offset < gap {
            gap - offset
        } else {
            period - offset
        };
        Duration::from_millis(u64::try_from(wait).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotator() -> WordRotator {
        WordRotator::new(
            [" Networks", " Cloud", " Innovation", " Future"]
                .map(String::from)
                .to_vec(),
            Duration::from_millis(3000),
            Duration::from_millis(500),
        )
    }

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn first_word_shows_immediately() {
        assert_eq!(rotator().word_at(at(0)), Some(" Networks"));
        assert_eq!(rotator().word_at(at(2999)), Some(" Networks"));
    }

    #[test]
    fn blank_gap_then_next_word() {
        let r = rotator();
        assert_eq!(r.word_at(at(3000)), None);
        assert_eq!(r.word_at(at(3499)), None);
        assert_eq!(r.word_at(at(3500)), Some(" Cloud"));
        assert_eq!(r.word_at(at(9600)), Some(" Future"));
    }

    #[test]
    fn wraps_around() {
        assert_eq!(rotator().word_at(at(12_600)), Some(" Networks"));
        assert_eq!(rotator().index_at(at(12_600)), 0);
    }

    #[test]
    fn next_change_points_at_gap_edges() {
        let r = rotator();
        assert_eq!(r.next_change(at(1000)), at(2000));
        assert_eq!(r.next_change(at(3100)), at(400));
        assert_eq!(r.next_change(at(3600)), at(2400));
    }

    #[test]
    fn empty_word_list_shows_nothing() {
        let r = WordRotator::new(Vec::new(), at(3000), at(500));
        assert_eq!(r.word_at(at(100)), None);
        assert_eq!(r.next_change(at(0)), Duration::MAX);
    }
}
