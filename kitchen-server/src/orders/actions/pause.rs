//! Pause command handler

use shared::models::Order;

use super::{ActionContext, TransitionAction, TransitionPlan, check_transition, planned_update};
use crate::orders::state_machine::OrderAction;
use crate::orders::store::CommentNote;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::workflow::WorkflowResult;

pub const PAUSED_TAG: &str = "paused";

/// Pause action
#[derive(Debug, Clone)]
pub struct PauseAction {
    pub order_id: String,
    pub staff_id: String,
    pub comment: Option<String>,
}

impl TransitionAction for PauseAction {
    fn kind(&self) -> OrderAction {
        OrderAction::Pause
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn actor_id(&self) -> &str {
        &self.staff_id
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        validate_optional_text(self.comment.as_deref(), "comment", MAX_NOTE_LEN)?;
        let to = check_transition(order, OrderAction::Pause)?;

        let mut update = planned_update(order, &self.staff_id, ctx.now);
        // resume returns here
        update.paused_from = Some(order.status);
        update.comment = self.comment.as_ref().map(|c| CommentNote {
            tag: PAUSED_TAG.to_string(),
            note: c.clone(),
        });

        Ok(TransitionPlan {
            action: OrderAction::Pause,
            from: order.status,
            to,
            update,
            side_effects: vec![],
        })
    }
}
