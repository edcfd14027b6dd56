//! Deliver command handler - ready order handed to the table

use shared::models::Order;

use super::{
    ActionContext, SideEffect, TransitionAction, TransitionPlan, check_transition, planned_update,
};
use crate::orders::state_machine::OrderAction;
use crate::workflow::WorkflowResult;

/// Deliver action
#[derive(Debug, Clone)]
pub struct DeliverAction {
    pub order_id: String,
    pub staff_id: String,
}

impl TransitionAction for DeliverAction {
    fn kind(&self) -> OrderAction {
        OrderAction::Deliver
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn actor_id(&self) -> &str {
        &self.staff_id
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        let to = check_transition(order, OrderAction::Deliver)?;

        Ok(TransitionPlan {
            action: OrderAction::Deliver,
            from: order.status,
            to,
            update: planned_update(order, &self.staff_id, ctx.now),
            side_effects: vec![SideEffect::ReleaseTable],
        })
    }
}
