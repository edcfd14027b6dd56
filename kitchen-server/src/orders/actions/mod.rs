//! Transition action implementations
//!
//! Each action validates one workflow command against the loaded order and
//! produces a `TransitionPlan`: the expected and new state, the fields to
//! write with the conditional update, and the side effects to run after
//! the commit.

use shared::models::Order;

use crate::core::WorkflowConfig;
use crate::orders::state_machine::{OrderAction, can_transition};
use crate::orders::store::OrderUpdate;
use crate::workflow::{WorkflowError, WorkflowResult};

mod cancel;
mod complete;
mod deliver;
mod pause;
mod refund;
mod resume;
mod start;

pub use cancel::CancelAction;
pub use complete::CompleteAction;
pub use deliver::DeliverAction;
pub use pause::PauseAction;
pub use refund::RefundAction;
pub use resume::ResumeAction;
pub use start::StartAction;

/// Inputs shared by every action
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub config: &'a WorkflowConfig,
    /// Server time, epoch millis
    pub now: i64,
}

/// Post-commit side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    KitchenTicket,
    PrintReceipt,
    ReleaseTable,
}

/// Validated transition, ready for the conditional update
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub action: OrderAction,
    pub from: shared::models::OrderStatus,
    pub to: shared::models::OrderStatus,
    pub update: OrderUpdate,
    pub side_effects: Vec<SideEffect>,
}

/// One workflow command
pub trait TransitionAction {
    fn kind(&self) -> OrderAction;

    fn order_id(&self) -> &str;

    fn actor_id(&self) -> &str;

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan>;
}

/// Check the state machine and return the target state
pub(crate) fn check_transition(
    order: &Order,
    action: OrderAction,
) -> WorkflowResult<shared::models::OrderStatus> {
    let target = action.target(order.paused_from);
    if !action.allowed_from(order.status) || !can_transition(order.status, target) {
        return Err(WorkflowError::invalid_transition(
            &order.id,
            order.status,
            target,
        ));
    }
    Ok(target)
}

/// Update pinned to the history revision the plan was built on
pub(crate) fn planned_update(order: &Order, actor_id: &str, now: i64) -> OrderUpdate {
    OrderUpdate::new(actor_id, now).expecting_revision(order.history.len())
}

/// WorkflowAction enum - dispatches to concrete action implementations
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    Start(StartAction),
    Complete(CompleteAction),
    Pause(PauseAction),
    Resume(ResumeAction),
    Cancel(CancelAction),
    Deliver(DeliverAction),
    Refund(RefundAction),
}

impl WorkflowAction {
    fn inner(&self) -> &dyn TransitionAction {
        match self {
            WorkflowAction::Start(a) => a,
            WorkflowAction::Complete(a) => a,
            WorkflowAction::Pause(a) => a,
            WorkflowAction::Resume(a) => a,
            WorkflowAction::Cancel(a) => a,
            WorkflowAction::Deliver(a) => a,
            WorkflowAction::Refund(a) => a,
        }
    }
}

impl TransitionAction for WorkflowAction {
    fn kind(&self) -> OrderAction {
        self.inner().kind()
    }

    fn order_id(&self) -> &str {
        self.inner().order_id()
    }

    fn actor_id(&self) -> &str {
        self.inner().actor_id()
    }

    fn plan(&self, order: &Order, ctx: &ActionContext<'_>) -> WorkflowResult<TransitionPlan> {
        self.inner().plan(order, ctx)
    }
}
