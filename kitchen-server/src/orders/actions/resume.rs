//! Resume command handler - back to the state the order was paused from

use shared::models::Order;

use super::{ActionContext, TransitionAction, TransitionPlan, check_transition, planned_update};
use crate::orders::state_machine::OrderAction;
use crate::workflow::WorkflowResult;

/// Resume action
#[derive(Debug, Clone)]
pub struct ResumeAction {
    pub order_id: String,
    pub staff_id: String,
}

impl TransitionAction for ResumeAction {
    fn kind(&self) -> OrderAction {
        OrderAction::Resume
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn actor_id(&self) -> &str {
        &self.staff_id
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        let to = check_transition(order, OrderAction::Resume)?;

        // paused_from is cleared by leaving it unset
        Ok(TransitionPlan {
            action: OrderAction::Resume,
            from: order.status,
            to,
            update: planned_update(order, &self.staff_id, ctx.now),
            side_effects: vec![],
        })
    }
}
