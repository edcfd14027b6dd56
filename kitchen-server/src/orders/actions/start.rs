//! Start command handler
//!
//! A cook picks up a pending order; the kitchen ticket is printed after commit.

use shared::models::Order;

use super::{
    ActionContext, SideEffect, TransitionAction, TransitionPlan, check_transition, planned_update,
};
use crate::orders::state_machine::OrderAction;
use crate::workflow::WorkflowResult;

/// Start action
#[derive(Debug, Clone)]
pub struct StartAction {
    pub order_id: String,
    pub staff_id: String,
}

impl TransitionAction for StartAction {
    fn kind(&self) -> OrderAction {
        OrderAction::Start
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn actor_id(&self) -> &str {
        &self.staff_id
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        let to = check_transition(order, OrderAction::Start)?;

        Ok(TransitionPlan {
            action: OrderAction::Start,
            from: order.status,
            to,
            update: planned_update(order, &self.staff_id, ctx.now),
            side_effects: vec![SideEffect::KitchenTicket],
        })
    }
}
