//! Cancel command handler
//!
//! Cancels a pending or in-progress order and frees its table.

use shared::models::Order;

use super::{
    ActionContext, SideEffect, TransitionAction, TransitionPlan, check_transition, planned_update,
};
use crate::orders::state_machine::OrderAction;
use crate::workflow::WorkflowResult;

/// Cancel action
#[derive(Debug, Clone)]
pub struct CancelAction {
    pub order_id: String,
    pub staff_id: String,
}

impl TransitionAction for CancelAction {
    fn kind(&self) -> OrderAction {
        OrderAction::Cancel
    }

    fn order_id(&self) -> &str {
        &self.order_id
    }

    fn actor_id(&self) -> &str {
        &self.staff_id
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        let to = check_transition(order, OrderAction::Cancel)?;

        Ok(TransitionPlan {
            action: OrderAction::Cancel,
            from: order.status,
            to,
            update: planned_update(order, &self.staff_id, ctx.now),
            side_effects: vec![SideEffect::ReleaseTable],
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

    fn action() -> CancelAction {
        CancelAction {
            order_id: "order-1".to_string(),
            staff_id: "waiter-1".to_string(),
        }
    }

    #[test]
    fn test_cancel_releases_table() {
        let config = WorkflowConfig::default();
        let ctx = ActionContext { config: &config, now: 1 };
        let plan = action().plan(&order_in(OrderStatus::Pending), &ctx).unwrap();
        assert_eq!(plan.to, OrderStatus::Cancelled);
        assert_eq!(plan.side_effects, vec![SideEffect::ReleaseTable]);
    }

    #[test]
    fn test_cancel_ready_rejected() {
        let config = WorkflowConfig::default();
        let ctx = ActionContext { config: &config, now: 1 };
        let err = action().plan(&order_in(OrderStatus::Ready), &ctx).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition {
                current: OrderStatus::Ready,
                attempted: OrderStatus::Cancelled,
                ..
            }
        ));
    }
}
