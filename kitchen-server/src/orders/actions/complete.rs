//! Complete command handler
//!
//! Marks an in-progress order ready. Completion notes are appended to the
//! order comments with a station tag (`[grill] ...`, `[kitchen] ...` when no
//! station is named); earlier comments are kept.

use shared::models::{Order, StationId};

use super::{
    ActionContext, SideEffect, TransitionAction, TransitionPlan, check_transition, planned_update,
};
use crate::orders::state_machine::OrderAction;
use crate::orders::store::CommentNote;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::workflow::{ValidationError, WorkflowResult};

/// Tag used for notes that do not name a station
pub const KITCHEN_TAG: &str = "kitchen";

/// Complete action
#[derive(Debug, Clone)]
pub struct CompleteAction {
    pub order_id: String,
    pub staff_id: String,
    pub notes: Option<String>,
    pub station: Option<StationId>,
}

impl TransitionAction for CompleteAction {
    fn kind(&self) -> OrderAction {
        OrderAction::Complete
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn actor_id(&self) -> &str {
        &self.staff_id
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        if let Some(station) = &self.station
            && ctx.config.station(station).is_none()
        {
            return Err(ValidationError::UnknownStation(station.clone()).into());
        }
        validate_optional_text(self.notes.as_deref(), "notes", MAX_NOTE_LEN)?;

        let to = check_transition(order, OrderAction::Complete)?;

        let mut update = planned_update(order, &self.staff_id, ctx.now);
        update.station = self.station.clone();
        update.comment = self.notes.as_ref().map(|note| CommentNote {
            tag: self
                .station
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| KITCHEN_TAG.to_string()),
            note: note.clone(),
        });

        Ok(TransitionPlan {
            action: OrderAction::Complete,
            from: order.status,
            to,
            update,
            side_effects: vec![SideEffect::PrintReceipt],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkflowConfig;
    use crate::orders::actions::test_support::order_in;
    use crate::workflow::WorkflowError;
    use shared::models::OrderStatus;

    fn action(notes: Option<&str>, station: Option<&str>) -> CompleteAction {
        CompleteAction {
            order_id: "order-1".to_string(),
            staff_id: "cook-1".to_string(),
            notes: notes.map(str::to_string),
            station: station.map(StationId::from),
        }
    }

    #[test]
    fn test_complete_with_station_note() {
        let config = WorkflowConfig::default();
        let ctx = ActionContext { config: &config, now: 5 };
        let plan = action(Some("extra crispy"), Some("grill"))
            .plan(&order_in(OrderStatus::InProgress), &ctx)
            .unwrap();

        assert_eq!(plan.to, OrderStatus::Ready);
        assert_eq!(plan.update.station, Some(StationId::from("grill")));
        let comment = plan.update.comment.unwrap();
        assert_eq!(comment.tag, "grill");
        assert_eq!(comment.note, "extra crispy");
        assert_eq!(plan.side_effects, vec![SideEffect::PrintReceipt]);
    }

    #[test]
    fn test_complete_note_without_station() {
        let config = WorkflowConfig::default();
        let ctx = ActionContext { config: &config, now: 5 };
        let plan = action(Some("sin sal"), None)
            .plan(&order_in(OrderStatus::InProgress), &ctx)
            .unwrap();
        assert_eq!(plan.update.comment.unwrap().tag, KITCHEN_TAG);
    }

    #[test]
    fn test_complete_ready_order_rejected() {
        let config = WorkflowConfig::default();
        let ctx = ActionContext { config: &config, now: 5 };
        let err = action(None, None)
            .plan(&order_in(OrderStatus::Ready), &ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition {
                current: OrderStatus::Ready,
                attempted: OrderStatus::Ready,
                ..
            }
        ));
    }

    #[test]
    fn test_complete_pending_rejected() {
        let config = WorkflowConfig::default();
        let ctx = ActionContext { config: &config, now: 5 };
        assert!(action(None, None).plan(&order_in(OrderStatus::Pending), &ctx).is_err());
    }

    #[test]
    fn test_complete_unknown_station() {
        let config = WorkflowConfig::default();
        let ctx = ActionContext { config: &config, now: 5 };
        let err = action(Some("x"), Some("sushi"))
            .plan(&order_in(OrderStatus::InProgress), &ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Validation(ValidationError::UnknownStation(_))
        ));
    }
}
