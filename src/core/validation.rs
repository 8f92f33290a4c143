use std::time::{Duration, Instant};

use super::dom::Element;

pub const ERROR_BACKGROUND: &str = "red";
pub const RESTING_BACKGROUND: &str = "transparent";

/// Whitespace-only input counts as empty.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Transient red background on the query input after an empty submit.
#[derive(Debug, Clone)]
pub struct InputFlash {
    duration: Duration,
    until: Option<Instant>,
}

impl InputFlash {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.until.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.until
    }

    /// Flags `input`; a second trigger while active restarts the window.
    pub fn trigger(&mut self, input: &mut Element, now: Instant) {
        input.background = Some(ERROR_BACKGROUND.to_string());
        self.until = Some(now + self.duration);
    }

    /// Reverts `input` once the deadline has passed. Returns true if it changed.
    pub fn tick(&mut self, input: &mut Element, now: Instant) -> bool {
        match self.until {
            Some(until) if now >= until => {
                input.background = Some(RESTING_BACKGROUND.to_string());
                self.until = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::{create, ElementKind};

    const SECOND: Duration = Duration::from_millis(1000);

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank(" rails "));
    }

    #[test]
    fn flash_reverts_after_exactly_the_duration() {
        let mut input = create(ElementKind::Input, "form__input");
        let mut flash = InputFlash::new(SECOND);
        let t0 = Instant::now();

        flash.trigger(&mut input, t0);
        assert_eq!(input.background.as_deref(), Some(ERROR_BACKGROUND));
        assert_eq!(flash.deadline(), Some(t0 + SECOND));

        assert!(!flash.tick(&mut input, t0 + Duration::from_millis(999)));
        assert_eq!(input.background.as_deref(), Some(ERROR_BACKGROUND));

        assert!(flash.tick(&mut input, t0 + SECOND));
        assert_eq!(input.background.as_deref(), Some(RESTING_BACKGROUND));
        assert!(!flash.is_active());
        assert!(!flash.tick(&mut input, t0 + SECOND * 2));
    }

    #[test]
    fn retrigger_restarts_window() {
        let mut input = create(ElementKind::Input, "form__input");
        let mut flash = InputFlash::new(SECOND);
        let t0 = Instant::now();

        flash.trigger(&mut input, t0);
        flash.trigger(&mut input, t0 + Duration::from_millis(600));
        assert!(!flash.tick(&mut input, t0 + SECOND));
        assert!(flash.tick(&mut input, t0 + Duration::from_millis(1600)));
    }
}
