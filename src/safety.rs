//! Safety interlock edge publisher.
//!
//! The interlock is a level-sensed switch, but the controller only acts on
//! *changes*.  More than one subsystem may need to see those changes (the
//! interaction controller pauses the UI, the cutting sequencer halts the
//! motor), so each observer subscribes once and gets its own edge tracking:
//! an edge consumed by one subscriber is still reported to the others.
//!
//! ## Edge lifecycle
//!
//! 1. `subscribe()` hands out a slot whose previous level is unknown.
//! 2. The first `poll()` on that slot always reports the current level,
//!    so a machine powered up with the guard open starts paused.
//! 3. Later polls report only when the level differs from the last one
//!    that slot saw.

use log::{info, warn};

use crate::error::Error;

/// Maximum number of independent observers.
const MAX_SUBSCRIBERS: usize = 4;

/// Handle returned by [`InterlockMonitor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u8);

/// Per-subscriber edge detector for the safety interlock.
#[derive(Debug, Default)]
pub struct InterlockMonitor {
    /// Last level each subscriber observed; `None` until its first poll.
    last_seen: heapless::Vec<Option<bool>, MAX_SUBSCRIBERS>,
}

impl InterlockMonitor {
    pub fn new() -> Self {
        Self {
            last_seen: heapless::Vec::new(),
        }
    }

    /// Claim an observer slot.
    pub fn subscribe(&mut self) -> Result<SubscriberId, Error> {
        let id = self.last_seen.len() as u8;
        self.last_seen
            .push(None)
            .map_err(|_| Error::SubscribersExhausted)?;
        Ok(SubscriberId(id))
    }

    /// Report `Some(tripped)` if the level changed since this subscriber's
    /// previous poll, otherwise `None`.
    pub fn poll(&mut self, id: SubscriberId, tripped: bool) -> Option<bool> {
        let Some(slot) = self.last_seen.get_mut(id.0 as usize) else {
            debug_assert!(false, "unknown interlock subscriber {}", id.0);
            return None;
        };

        if *slot == Some(tripped) {
            return None;
        }

        match *slot {
            None if tripped => warn!("SAFETY: interlock open at first sample (subscriber {})", id.0),
            None => {}
            Some(_) if tripped => warn!("SAFETY: interlock tripped (subscriber {})", id.0),
            Some(_) => info!("SAFETY: interlock released (subscriber {})", id.0),
        }
        *slot = Some(tripped);
        Some(tripped)
    }

    /// Number of claimed slots.
    pub fn subscriber_count(&self) -> usize {
        self.last_seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_reports_level() {
        let mut m = InterlockMonitor::new();
        let id = m.subscribe().unwrap();
        assert_eq!(m.poll(id, false), Some(false));

        let mut m = InterlockMonitor::new();
        let id = m.subscribe().unwrap();
        assert_eq!(m.poll(id, true), Some(true));
    }

    #[test]
    fn steady_level_is_silent() {
        let mut m = InterlockMonitor::new();
        let id = m.subscribe().unwrap();
        m.poll(id, false);
        for _ in 0..10 {
            assert_eq!(m.poll(id, false), None);
        }
    }

    #[test]
    fn reports_each_change_once() {
        let mut m = InterlockMonitor::new();
        let id = m.subscribe().unwrap();
        m.poll(id, false);
        assert_eq!(m.poll(id, true), Some(true));
        assert_eq!(m.poll(id, true), None);
        assert_eq!(m.poll(id, false), Some(false));
        assert_eq!(m.poll(id, false), None);
    }

    #[test]
    fn subscribers_track_independently() {
        let mut m = InterlockMonitor::new();
        let ui = m.subscribe().unwrap();
        let motor = m.subscribe().unwrap();
        m.poll(ui, false);
        m.poll(motor, false);

        assert_eq!(m.poll(ui, true), Some(true));
        // The motor subscriber still sees the edge the UI already consumed.
        assert_eq!(m.poll(motor, true), Some(true));
        assert_eq!(m.poll(motor, true), None);
    }

    #[test]
    fn subscriber_slots_are_bounded() {
        let mut m = InterlockMonitor::new();
        for _ in 0..MAX_SUBSCRIBERS {
            m.subscribe().unwrap();
        }
        assert_eq!(m.subscribe(), Err(Error::SubscribersExhausted));
        assert_eq!(m.subscriber_count(), MAX_SUBSCRIBERS);
    }
}
