//! Freemium limits on countable resources.
//!
//! The gate runs before a create request is sent to the backend. The backend
//! carries no matching constraint, so a client that skips this check can
//! exceed the limit; see [`QuotaGate::ADVISORY`].

use tracing::{debug, warn};

use dash_domain::Event;

use crate::{entitlement::EntitlementResult, CoreError};

pub const FREE_EVENT_LIMIT: usize = 5;

/// Number of events that count against the free quota.
pub fn count_active_events(events: &[Event]) -> usize {
    events.iter().filter(|event| !event.completed).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaGate {
    limit: usize,
}

impl Default for QuotaGate {
    fn default() -> Self {
        Self::new(FREE_EVENT_LIMIT)
    }
}

impl QuotaGate {
    pub const ADVISORY: &'static str = "Event quota is enforced client-side only; \
         the backend must apply the same limit to make it binding.";

    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rejects one more create when a non-premium user already holds `current` items.
    pub fn ensure_can_create(&self, is_premium_active: bool, current: usize) -> Result<(), CoreError> {
        if is_premium_active {
            debug!(current, "premium entitlement, quota not applied");
            return Ok(());
        }
        if current >= self.limit {
            warn!(
                limit = self.limit,
                current, "free plan quota reached, blocking create"
            );
            return Err(CoreError::QuotaExceeded {
                limit: self.limit,
                current,
            });
        }
        Ok(())
    }

    pub fn check(&self, entitlement: &EntitlementResult, current: usize) -> Result<(), CoreError> {
        self.ensure_can_create(entitlement.is_premium_active, current)
    }

    pub fn check_events(
        &self,
        entitlement: &EntitlementResult,
        events: &[Event],
    ) -> Result<(), CoreError> {
        self.check(entitlement, count_active_events(events))
    }

    /// Creates left before the limit; `None` means unlimited.
    pub fn remaining(&self, entitlement: &EntitlementResult, current: usize) -> Option<usize> {
        if entitlement.is_premium_active {
            None
        } else {
            Some(self.limit.saturating_sub(current))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn events(active: usize, done: usize) -> Vec<Event> {
        let user = Uuid::new_v4();
        let mut out = Vec::new();
        for idx in 0..active {
            out.push(Event::new(
                user,
                format!("open {idx}"),
                "2025-01-01T09:00:00Z",
                "2025-01-01T10:00:00Z",
            ));
        }
        for idx in 0..done {
            out.push(
                Event::new(
                    user,
                    format!("done {idx}"),
                    "2025-01-01T09:00:00Z",
                    "2025-01-01T10:00:00Z",
                )
                .completed(),
            );
        }
        out
    }

    #[test]
    fn completed_events_do_not_count() {
        assert_eq!(count_active_events(&events(3, 4)), 3);
    }

    #[test]
    fn fifth_create_allowed_sixth_blocked() {
        let gate = QuotaGate::default();
        assert!(gate.ensure_can_create(false, 4).is_ok());
        assert_eq!(
            gate.ensure_can_create(false, 5),
            Err(CoreError::QuotaExceeded {
                limit: 5,
                current: 5
            })
        );
        assert!(gate.ensure_can_create(true, 5).is_ok());
    }

    #[test]
    fn check_events_uses_active_count() {
        let gate = QuotaGate::default();
        let free = EntitlementResult::free();
        assert!(gate.check_events(&free, &events(4, 10)).is_ok());
        assert!(gate.check_events(&free, &events(5, 0)).is_err());
    }

    #[test]
    fn remaining_saturates() {
        let gate = QuotaGate::new(2);
        let free = EntitlementResult::free();
        assert_eq!(gate.remaining(&free, 1), Some(1));
        assert_eq!(gate.remaining(&free, 9), Some(0));
    }
}
