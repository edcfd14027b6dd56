//! Refund command handler
//!
//! Only delivered orders within the refund window (counted from `ordered_at`)
//! can be refunded.

use shared::models::Order;
use shared::util::DAY_MILLIS;

use super::{ActionContext, TransitionAction, TransitionPlan, check_transition, planned_update};
use crate::orders::state_machine::OrderAction;
use crate::workflow::{ValidationError, WorkflowResult};

/// Refund action
#[derive(Debug, Clone)]
pub struct RefundAction {
    pub order_id: String,
    pub staff_id: String,
}

impl TransitionAction for RefundAction {
    fn kind(&self) -> OrderAction {
        OrderAction::Refund
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn actor_id(&self) -> &str {
        &self.staff_id
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        let to = check_transition(order, OrderAction::Refund)?;

        let window_days = ctx.config.refund_window_days;
        let elapsed = ctx.now - order.ordered_at;
        if elapsed > i64::from(window_days) * DAY_MILLIS {
            return Err(ValidationError::RefundWindowExceeded {
                order_id: order.id.clone(),
                days_elapsed: elapsed / DAY_MILLIS,
                window_days,
            }
            .into());
        }

        Ok(TransitionPlan {
            action: OrderAction::Refund,
            from: order.status,
            to,
            update: planned_update(order, &self.staff_id, ctx.now),
            side_effects: vec![],
        })
    }
}
