/// Fires periodically on a caller-supplied clock.
#[derive(Debug, Clone)]
pub struct IntervalTrigger {
    interval: f64,
    next_trigger: f64,
}

impl IntervalTrigger {
    /// Creates a trigger that fires at time 0 and then every `interval` seconds.
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            next_trigger: 0.0,
        }
    }

    /// Returns true if the event should be triggered at the given time.
    ///
    /// Missed intervals are skipped rather than fired in a burst.
    pub fn trigger(&mut self, time: f64) -> bool {
        if time >= self.next_trigger {
            self.next_trigger += self.interval;
            if self.next_trigger <= time {
                self.next_trigger = time + self.interval;
            }
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.next_trigger = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_interval() {
        let mut trigger = IntervalTrigger::new(0.5);
        assert!(trigger.trigger(0.0));
        assert!(!trigger.trigger(0.2));
        assert!(trigger.trigger(0.5));
        assert!(!trigger.trigger(0.9));
        assert!(trigger.trigger(1.0));
    }

    #[test]
    fn test_skips_missed_intervals() {
        let mut trigger = IntervalTrigger::new(0.5);
        assert!(trigger.trigger(0.0));
        assert!(trigger.trigger(3.0));
        assert!(!trigger.trigger(3.1));
        assert!(trigger.trigger(3.5));

        trigger.reset();
        assert!(trigger.trigger(0.0));
    }
}
