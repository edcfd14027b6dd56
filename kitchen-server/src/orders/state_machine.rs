//! Order state machine
//!
//! Legal transitions:
//!
//! | From | Action | To |
//! |------|--------|----|
//! | pending | start | in_progress |
//! | in_progress | complete | ready |
//! | pending / in_progress | pause | paused |
//! | paused | resume | paused-from state |
//! | pending / in_progress | cancel | cancelled |
//! | ready | deliver | delivered |
//! | delivered | refund | refunded |
//!
//! Nothing else is allowed, in particular no skipping (pending -> ready).

use std::fmt;

use shared::models::OrderStatus;

/// Workflow action on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    Start,
    Complete,
    Pause,
    Resume,
    Cancel,
    Deliver,
    Refund,
}

impl OrderAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
            Self::Deliver => "deliver",
            Self::Refund => "refund",
        }
    }

    /// State the action moves an order into
    ///
    /// Resume goes back to `paused_from`; an order without one resumes into
    /// `in_progress`.
    pub fn target(&self, paused_from: Option<OrderStatus>) -> OrderStatus {
        match self {
            Self::Start => OrderStatus::InProgress,
            Self::Complete => OrderStatus::Ready,
            Self::Pause => OrderStatus::Paused,
            Self::Resume => paused_from.unwrap_or(OrderStatus::InProgress),
            Self::Cancel => OrderStatus::Cancelled,
            Self::Deliver => OrderStatus::Delivered,
            Self::Refund => OrderStatus::Refunded,
        }
    }

    /// Whether the action is legal from `current`
    pub fn allowed_from(&self, current: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, current),
            (Self::Start, Pending)
                | (Self::Complete, InProgress)
                | (Self::Pause, Pending | InProgress)
                | (Self::Resume, Paused)
                | (Self::Cancel, Pending | InProgress)
                | (Self::Deliver, Ready)
                | (Self::Refund, Delivered)
        )
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `from -> to` is an edge of the lifecycle graph
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, InProgress)
            | (InProgress, Ready)
            | (Pending | InProgress, Paused)
            | (Paused, Pending | InProgress)
            | (Pending | InProgress, Cancelled)
            | (Ready, Delivered)
            | (Delivered, Refunded)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL_STATES: [OrderStatus; 7] =
        [Pending, InProgress, Paused, Ready, Delivered, Cancelled, Refunded];

    const ALL_ACTIONS: [OrderAction; 7] = [
        OrderAction::Start,
        OrderAction::Complete,
        OrderAction::Pause,
        OrderAction::Resume,
        OrderAction::Cancel,
        OrderAction::Deliver,
        OrderAction::Refund,
    ];

    #[test]
    fn test_allowed_actions_are_graph_edges() {
        for action in ALL_ACTIONS {
            for from in ALL_STATES {
                if action.allowed_from(from) {
                    let paused_from = (from == Paused).then_some(InProgress);
                    assert!(
                        can_transition(from, action.target(paused_from)),
                        "{action} from {from}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_skip_transitions() {
        assert!(!can_transition(Pending, Ready));
        assert!(!can_transition(Pending, Delivered));
        assert!(!can_transition(InProgress, Delivered));
        assert!(!OrderAction::Complete.allowed_from(Pending));
    }

    #[test]
    fn test_terminal_states_only_refund_out_of_delivered() {
        for action in ALL_ACTIONS {
            assert!(!action.allowed_from(Cancelled));
            assert!(!action.allowed_from(Refunded));
            assert_eq!(action.allowed_from(Delivered), action == OrderAction::Refund);
        }
    }

    #[test]
    fn test_resume_target() {
        assert_eq!(OrderAction::Resume.target(Some(Pending)), Pending);
        assert_eq!(OrderAction::Resume.target(Some(InProgress)), InProgress);
        assert_eq!(OrderAction::Resume.target(None), InProgress);
    }

    #[test]
    fn test_pause_and_cancel_sources() {
        for from in [Pending, InProgress] {
            assert!(OrderAction::Pause.allowed_from(from));
            assert!(OrderAction::Cancel.allowed_from(from));
        }
        assert!(!OrderAction::Pause.allowed_from(Paused));
        assert!(!OrderAction::Cancel.allowed_from(Ready));
    }
}
