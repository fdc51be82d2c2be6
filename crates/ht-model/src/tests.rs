//! Unit tests for ht-model.

#[cfg(test)]
mod helpers {
    use ht_core::{NodeId, RequestId, TransportKind};

    use crate::{Request, ShiftManager, Transporter};

    pub fn request(id: u64) -> Request {
        Request::new(RequestId(id), NodeId(0), NodeId(1), TransportKind::Stretcher, false, 0.0)
    }

    pub fn worker(name: &str) -> Transporter {
        Transporter::new(name, NodeId(0), ShiftManager::new(20.0, 10.0))
    }
}

// ── Request lifecycle ─────────────────────────────────────────────────────────

#[cfg(test)]
mod request {
    use crate::{ModelError, RequestStatus};

    #[test]
    fn happy_path_pending_ongoing_completed() {
        let mut r = super::helpers::request(1);
        assert_eq!(r.status(), RequestStatus::Pending);
        assert!(r.is_reassignable());

        r.mark_ongoing("Anna").unwrap();
        assert_eq!(r.status(), RequestStatus::Ongoing);
        assert_eq!(r.assignee(), Some("Anna"));
        assert!(!r.is_reassignable());

        r.mark_completed().unwrap();
        assert_eq!(r.status(), RequestStatus::Completed);
        assert_eq!(r.assignee(), Some("Anna"), "assignee kept for audit");
    }

    #[test]
    fn completed_never_regresses() {
        let mut r = super::helpers::request(2);
        r.mark_ongoing("Anna").unwrap();
        r.mark_completed().unwrap();

        assert!(matches!(
            r.mark_ongoing("Ben"),
            Err(ModelError::InvalidTransition { .. })
        ));
        assert!(r.mark_cancelled().is_err());
        assert_eq!(r.status(), RequestStatus::Completed);
    }

    #[test]
    fn cancelled_is_absorbing() {
        let mut r = super::helpers::request(3);
        r.mark_cancelled().unwrap();
        // Second cancel is a no-op, not an error.
        r.mark_cancelled().unwrap();
        assert_eq!(r.status(), RequestStatus::Cancelled);
        assert!(r.mark_ongoing("Anna").is_err());
        assert!(r.mark_completed().is_err());
    }

    #[test]
    fn ongoing_can_cancel() {
        let mut r = super::helpers::request(4);
        r.mark_ongoing("Anna").unwrap();
        r.mark_cancelled().unwrap();
        assert_eq!(r.status(), RequestStatus::Cancelled);
    }

    #[test]
    fn completing_a_pending_request_is_invalid() {
        let mut r = super::helpers::request(5);
        assert!(r.mark_completed().is_err());
        assert_eq!(r.status(), RequestStatus::Pending);
    }
}

// ── Transporter ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod transporter {
    use ht_core::RequestId;

    use crate::TransporterStatus;

    #[test]
    fn busy_tracks_current_task() {
        let mut w = super::helpers::worker("Anna");
        assert!(!w.is_busy);

        w.begin_task(RequestId(1));
        assert!(w.is_busy);
        assert_eq!(w.current_task, Some(RequestId(1)));

        w.clear_task();
        assert!(!w.is_busy);
        assert_eq!(w.current_task, None);
    }

    #[test]
    fn take_next_task_promotes_queue_head() {
        let mut w = super::helpers::worker("Anna");
        w.task_queue.push_back(RequestId(1));
        w.task_queue.push_back(RequestId(2));

        assert_eq!(w.take_next_task(), Some(RequestId(1)));
        assert!(w.is_busy);
        assert_eq!(w.task_queue.len(), 1);

        w.clear_task();
        assert_eq!(w.take_next_task(), Some(RequestId(2)));
        w.clear_task();
        assert_eq!(w.take_next_task(), None);
        assert!(!w.is_busy);
    }

    #[test]
    fn holds_and_unqueue() {
        let mut w = super::helpers::worker("Anna");
        w.begin_task(RequestId(1));
        w.task_queue.push_back(RequestId(2));

        assert!(w.holds(RequestId(1)));
        assert!(w.holds(RequestId(2)));
        assert!(!w.holds(RequestId(3)));

        assert!(w.unqueue(RequestId(2)));
        assert!(!w.holds(RequestId(2)));
        assert!(!w.unqueue(RequestId(2)));
    }

    #[test]
    fn workload_decays_to_floor() {
        let mut w = super::helpers::worker("Anna");
        w.add_workload(2.5);
        assert_eq!(w.decay_workload(), 1.5);
        assert_eq!(w.decay_workload(), 0.5);
        assert_eq!(w.decay_workload(), 0.0);
        assert_eq!(w.decay_workload(), 0.0, "floored at zero");
    }

    #[test]
    fn negative_workload_additions_ignored() {
        let mut w = super::helpers::worker("Anna");
        w.add_workload(-5.0);
        assert_eq!(w.workload, 0.0);
    }

    #[test]
    fn plannable_follows_status() {
        let mut w = super::helpers::worker("Anna");
        assert!(w.is_plannable());
        w.status = TransporterStatus::Inactive;
        assert!(!w.is_plannable());
        // Resting workers remain plannable.
        w.status = TransporterStatus::Active;
        w.shift.begin_rest();
        assert!(w.is_plannable());
    }
}

// ── Shift manager ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod shift {
    use crate::ShiftManager;

    #[test]
    fn should_rest_at_threshold() {
        let shift = ShiftManager::new(20.0, 10.0);
        assert!(!shift.should_rest(19.9));
        assert!(shift.should_rest(20.0));
        assert!(shift.should_rest(25.0));
    }

    #[test]
    fn no_double_rest() {
        let mut shift = ShiftManager::new(20.0, 10.0);
        shift.begin_rest();
        assert!(shift.is_resting());
        assert!(!shift.should_rest(100.0), "already resting");
        shift.end_rest();
        assert!(!shift.is_resting());
        assert!(shift.should_rest(100.0));
    }
}
