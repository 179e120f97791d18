//! Two-sided game clock with increment.
//!
//! The clock holds no thread or timer. The caller measures elapsed time and
//! feeds it to [`Clock::tick`], which charges it to the side on move.

use crate::config::TimeControlConfig;
use chess_core::Color;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    initial: Duration,
    increment: Duration,
    remaining: [Duration; 2],
    turn: Color,
    running: bool,
}

impl Clock {
    pub fn new(initial: Duration, increment: Duration) -> Self {
        Self {
            initial,
            increment,
            remaining: [initial; 2],
            turn: Color::White,
            running: false,
        }
    }

    pub fn from_config(config: &TimeControlConfig) -> Self {
        Self::new(config.initial(), config.increment())
    }

    /// Starts counting down for White.
    pub fn start(&mut self) {
        self.turn = Color::White;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Restores the starting time for both sides and stops the clock.
    pub fn reset(&mut self) {
        self.remaining = [self.initial; 2];
        self.turn = Color::White;
        self.running = false;
    }

    /// Ends the current side's turn: credits its increment and passes the
    /// move.
    pub fn hit(&mut self) {
        self.remaining[self.turn.index()] += self.increment;
        self.turn = self.turn.opposite();
    }

    /// Charges `elapsed` to the side on move.
    ///
    /// Returns that side once its time runs out. The clock stops at that
    /// point, so a flag is reported once.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Color> {
        if !self.running {
            return None;
        }
        let remaining = &mut self.remaining[self.turn.index()];
        *remaining = remaining.saturating_sub(elapsed);
        if remaining.is_zero() {
            self.running = false;
            return Some(self.turn);
        }
        None
    }

    pub fn remaining(&self, color: Color) -> Duration {
        self.remaining[color.index()]
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Renders one side's time: hundredths up to ten seconds, tenths up to
    /// twenty, `m:ss` under an hour, `h:mm` above.
    pub fn display(&self, color: Color) -> String {
        let secs = self.remaining(color).as_secs_f64();
        if secs <= 0.0 {
            "0:00.00".to_string()
        } else if secs <= 10.0 {
            format!("0:{:.2}", secs)
        } else if secs <= 20.0 {
            format!("0:{:.1}", secs)
        } else if secs < 3600.0 {
            let whole = secs as u64;
            format!("{}:{:02}", whole / 60, whole % 60)
        } else {
            let whole = secs as u64;
            format!("{}:{:02}", whole / 3600, (whole / 60) % 60)
        }
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}",
            self.display(Color::White),
            self.display(Color::Black)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn idle_clock_ignores_ticks() {
        let mut clock = Clock::new(secs(60), Duration::ZERO);
        assert_eq!(clock.tick(secs(120)), None);
        assert_eq!(clock.remaining(Color::White), secs(60));
    }

    #[test]
    fn ticks_charge_the_side_on_move() {
        let mut clock = Clock::new(secs(60), secs(2));
        clock.start();
        clock.tick(secs(10));
        assert_eq!(clock.remaining(Color::White), secs(50));
        clock.hit();
        assert_eq!(clock.remaining(Color::White), secs(52));
        assert_eq!(clock.turn(), Color::Black);
        clock.tick(secs(5));
        assert_eq!(clock.remaining(Color::Black), secs(55));
        assert_eq!(clock.remaining(Color::White), secs(52));
    }

    #[test]
    fn flag_falls_once() {
        let mut clock = Clock::new(secs(3), Duration::ZERO);
        clock.start();
        clock.hit();
        assert_eq!(clock.tick(secs(2)), None);
        assert_eq!(clock.tick(secs(2)), Some(Color::Black));
        assert!(!clock.is_running());
        assert_eq!(clock.tick(secs(2)), None);
        assert_eq!(clock.remaining(Color::Black), Duration::ZERO);
    }

    #[test]
    fn reset_restores_both_sides() {
        let mut clock = Clock::new(secs(30), Duration::ZERO);
        clock.start();
        clock.tick(secs(10));
        clock.hit();
        clock.reset();
        assert_eq!(clock.remaining(Color::White), secs(30));
        assert_eq!(clock.turn(), Color::White);
        assert!(!clock.is_running());
    }

    #[test]
    fn display_formats() {
        let clock = Clock::new(Duration::from_millis(12_340), Duration::ZERO);
        assert_eq!(clock.display(Color::White), "0:12.3");

        let clock = Clock::new(Duration::from_millis(7_250), Duration::ZERO);
        assert_eq!(clock.display(Color::White), "0:7.25");

        let clock = Clock::new(secs(10), Duration::ZERO);
        assert_eq!(clock.display(Color::White), "0:10.00");

        let clock = Clock::new(secs(245), Duration::ZERO);
        assert_eq!(clock.display(Color::White), "4:05");

        let clock = Clock::new(secs(3_720), Duration::ZERO);
        assert_eq!(clock.display(Color::White), "1:02");

        let clock = Clock::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(clock.to_string(), "0:00.00|0:00.00");
    }
}
