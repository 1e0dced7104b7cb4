/// Seconds a new order has to be paid before it is cancelled.
pub const DEFAULT_WINDOW_SECONDS: u64 = 300;

/// Formats a number of seconds as `MM:SS`.
pub fn format_seconds(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// The payment deadline of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentWindow {
    pub order_created_at: u64,
    pub window_seconds: u64,
}

impl PaymentWindow {
    pub fn new(order_created_at: u64, window_seconds: u64) -> Self {
        Self {
            order_created_at,
            window_seconds,
        }
    }

    pub fn deadline(&self) -> u64 {
        self.order_created_at.saturating_add(self.window_seconds)
    }

    /// Whole seconds left at `now`, never below zero.
    pub fn remaining_at(&self, now: u64) -> u64 {
        self.deadline().saturating_sub(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Counting { remaining_seconds: u64 },
    /// Reached zero; the cancellation request is in flight.
    Expiring,
    /// Cancellation settled, successfully or not.
    Expired,
    /// Already past the deadline when mounted; nothing to show.
    Hidden,
}

impl CountdownPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expired | Self::Hidden)
    }
}

/// Result of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Remaining(u64),
    /// The window just closed. Returned at most once per countdown.
    Expire,
    Idle,
}

/// Per-order countdown state machine, independent of any timer.
#[derive(Debug, Clone)]
pub struct Countdown {
    phase: CountdownPhase,
    cancel_issued: bool,
}

impl Countdown {
    pub fn mount(window: &PaymentWindow, now: u64) -> Self {
        let remaining_seconds = window.remaining_at(now);
        let phase = if remaining_seconds == 0 {
            CountdownPhase::Hidden
        } else {
            CountdownPhase::Counting { remaining_seconds }
        };
        Self {
            phase,
            cancel_issued: false,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        match self.phase {
            CountdownPhase::Counting { remaining_seconds } => remaining_seconds,
            _ => 0,
        }
    }

    pub fn tick(&mut self) -> Tick {
        let CountdownPhase::Counting { remaining_seconds } = self.phase else {
            return Tick::Idle;
        };

        let remaining_seconds = remaining_seconds.saturating_sub(1);
        if remaining_seconds > 0 {
            self.phase = CountdownPhase::Counting { remaining_seconds };
            return Tick::Remaining(remaining_seconds);
        }

        if self.cancel_issued {
            return Tick::Idle;
        }
        self.cancel_issued = true;
        self.phase = CountdownPhase::Expiring;
        Tick::Expire
    }

    /// Marks the cancellation request as settled.
    pub fn settle(&mut self) {
        if self.phase == CountdownPhase::Expiring {
            self.phase = CountdownPhase::Expired;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_is_floored_at_zero() {
        let window = PaymentWindow::new(1_000, 300);
        assert_eq!(window.deadline(), 1_300);
        assert_eq!(window.remaining_at(1_000), 300);
        assert_eq!(window.remaining_at(1_299), 1);
        assert_eq!(window.remaining_at(1_300), 0);
        assert_eq!(window.remaining_at(5_000), 0);
    }

    #[test]
    fn test_mount_past_deadline_is_hidden() {
        let countdown = Countdown::mount(&PaymentWindow::new(0, 300), 300);
        assert_eq!(countdown.phase(), CountdownPhase::Hidden);

        let mut countdown = countdown;
        assert_eq!(countdown.tick(), Tick::Idle);
        assert!(countdown.phase().is_terminal());
    }

    #[test]
    fn test_countdown_is_monotonic() {
        let mut countdown = Countdown::mount(&PaymentWindow::new(0, 5), 0);
        let mut last = countdown.remaining_seconds();
        assert_eq!(last, 5);

        for _ in 0..4 {
            let Tick::Remaining(now) = countdown.tick() else {
                panic!("expected a remaining tick");
            };
            assert_eq!(now, last - 1);
            last = now;
        }
        assert_eq!(countdown.tick(), Tick::Expire);
        assert_eq!(countdown.remaining_seconds(), 0);
    }

    #[test]
    fn test_expire_fires_once() {
        let mut countdown = Countdown::mount(&PaymentWindow::new(0, 3), 0);
        let expirations = (0..13)
            .map(|_| countdown.tick())
            .filter(|t| *t == Tick::Expire)
            .count();
        assert_eq!(expirations, 1);
        assert_eq!(countdown.phase(), CountdownPhase::Expiring);
    }

    #[test]
    fn test_settle_moves_to_expired() {
        let mut countdown = Countdown::mount(&PaymentWindow::new(0, 1), 0);
        countdown.settle();
        assert!(matches!(countdown.phase(), CountdownPhase::Counting { .. }));

        assert_eq!(countdown.tick(), Tick::Expire);
        countdown.settle();
        assert_eq!(countdown.phase(), CountdownPhase::Expired);
        assert_eq!(countdown.tick(), Tick::Idle);
    }

    #[test]
    fn test_format_seconds() {
        let countdown = Countdown::mount(&PaymentWindow::new(0, 300), 0);
        assert_eq!(format_seconds(countdown.remaining_seconds()), "05:00");
        let countdown = Countdown::mount(&PaymentWindow::new(0, 300), 241);
        assert_eq!(format_seconds(countdown.remaining_seconds()), "00:59");
        assert_eq!(format_seconds(3_725), "62:05");
    }
}
