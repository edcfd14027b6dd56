//! Orders: state machine, transition actions and the order store
//!
//! # 模块结构
//!
//! - [`state_machine`] - 合法状态与转换表
//! - [`actions`] - 每个工作流命令一个 action, 产出 `TransitionPlan`
//! - [`store`] - `OrderStore` trait (条件更新 CAS)
//! - [`storage`] - redb 实现

pub mod actions;
pub mod state_machine;
pub mod storage;
pub mod store;

pub use state_machine::{OrderAction, can_transition};
pub use storage::{OrderStorage, StorageError};
pub use store::{
    CommentNote, ListQuery, OrderFilter, OrderStore, OrderUpdate, SortOrder, StoreError,
    StoreResult,
};
