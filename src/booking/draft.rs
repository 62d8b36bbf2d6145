use std::cell::Cell;
use std::rc::Rc;

use crate::config::PENDING_BOOKING_KEY;
use crate::models::BookingDraft;
use crate::utils::storage::{load_json, save_json, BrowserStore, KeyValueStore};

/// Holds an in-progress appointment draft across an authentication
/// interruption. The draft lives in session-scoped storage; an in-flight
/// flag plus remove-on-success makes resubmission exactly-once.
pub struct DraftManager {
    store: Rc<dyn KeyValueStore>,
    resubmit_in_flight: Cell<bool>,
}

impl DraftManager {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            resubmit_in_flight: Cell::new(false),
        }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStore::session()))
    }

    /// Persists the current draft before handing off to the auth UI.
    pub fn stash(&self, draft: &BookingDraft) {
        if save_json(self.store.as_ref(), PENDING_BOOKING_KEY, draft).is_ok() {
            log::info!("💾 Booking draft stashed pending authentication");
        }
    }

    pub fn pending(&self) -> Option<BookingDraft> {
        load_json(self.store.as_ref(), PENDING_BOOKING_KEY)
    }

    /// Claims the persisted draft for resubmission. Returns None when no
    /// draft remains or a resubmission is already running, making the
    /// restore path a no-op on duplicate events.
    pub fn begin_resubmit(&self) -> Option<BookingDraft> {
        if self.resubmit_in_flight.get() {
            return None;
        }
        let draft = self.pending()?;
        self.resubmit_in_flight.set(true);
        Some(draft)
    }

    /// Ends a resubmission. Only success removes the persisted draft; a
    /// failed submission leaves it in place for another attempt.
    pub fn finish_resubmit(&self, success: bool) {
        if success {
            self.store.remove(PENDING_BOOKING_KEY);
            log::info!("🗑️ Persisted booking draft cleared");
        }
        self.resubmit_in_flight.set(false);
    }

    pub fn discard(&self) {
        self.store.remove(PENDING_BOOKING_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleDetails;
    use crate::utils::storage::memory::MemoryStore;

    fn draft() -> BookingDraft {
        BookingDraft {
            customer_name: "Sam Carter".into(),
            email: "sam@example.com".into(),
            phone_number: "9876543210".into(),
            service: "Brake Service".into(),
            date: "2030-06-01".into(),
            time: "9:00 AM".into(),
            message: "Brakes squeal at low speed".into(),
            vehicle_details: VehicleDetails {
                make: "Toyota".into(),
                model: "Corolla".into(),
                year: "2019".into(),
                registration_number: "KA01AB1234".into(),
            },
        }
    }

    fn manager() -> DraftManager {
        DraftManager::new(Rc::new(MemoryStore::new()))
    }

    #[test]
    fn stash_then_pending_round_trips() {
        let manager = manager();
        assert!(manager.pending().is_none());

        manager.stash(&draft());
        assert_eq!(manager.pending(), Some(draft()));
    }

    #[test]
    fn begin_resubmit_claims_at_most_once_while_in_flight() {
        let manager = manager();
        manager.stash(&draft());

        assert_eq!(manager.begin_resubmit(), Some(draft()));
        // Duplicate event while the first submission is still running.
        assert_eq!(manager.begin_resubmit(), None);
    }

    #[test]
    fn failure_leaves_the_draft_in_place() {
        let manager = manager();
        manager.stash(&draft());

        manager.begin_resubmit().unwrap();
        manager.finish_resubmit(false);

        // The draft survives for the next attempt.
        assert_eq!(manager.begin_resubmit(), Some(draft()));
    }

    #[test]
    fn success_removes_the_draft_and_further_restores_are_noops() {
        let manager = manager();
        manager.stash(&draft());

        manager.begin_resubmit().unwrap();
        manager.finish_resubmit(true);

        assert!(manager.pending().is_none());
        assert_eq!(manager.begin_resubmit(), None);
    }

    #[test]
    fn begin_resubmit_without_a_draft_is_a_noop() {
        let manager = manager();
        assert_eq!(manager.begin_resubmit(), None);
        // The flag must not be left set by a failed claim.
        manager.stash(&draft());
        assert_eq!(manager.begin_resubmit(), Some(draft()));
    }
}
