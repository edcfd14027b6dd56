//! Escalation Monitor - 优先级升级广播
//!
//! 周期扫描未完成订单，订单跨入更高优先级时向
//! `order-<id>` 和 `kitchen-<id>` 发布 `priority-escalated`。
//!
//! Tiers only move up: an order is announced at most once per tier.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use shared::message::PriorityEscalatedPayload;
use shared::models::Priority;
use shared::util::now_millis;
use tokio_util::sync::CancellationToken;

use crate::workflow::{WorkflowManager, priority};

pub struct EscalationMonitor {
    manager: Arc<WorkflowManager>,
    interval: Duration,
    shutdown: CancellationToken,
    /// order_id -> last announced tier
    announced: DashMap<String, Priority>,
}

impl EscalationMonitor {
    pub fn new(
        manager: Arc<WorkflowManager>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            manager,
            interval,
            shutdown,
            announced: DashMap::new(),
        }
    }

    /// Run until the shutdown token is cancelled
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "EscalationMonitor started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("EscalationMonitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let published = self.scan(now_millis()).await;
                    if published > 0 {
                        tracing::debug!(published, "Priority escalations published");
                    }
                }
            }
        }
    }

    /// One pass over the open orders, returns the number of escalations published
    pub async fn scan(&self, now: i64) -> usize {
        let orders = match self.manager.list_open_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Escalation scan failed to list open orders");
                return 0;
            }
        };

        let open: HashSet<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        self.announced.retain(|id, _| open.contains(id.as_str()));

        let mut published = 0;
        for order in &orders {
            let minutes = priority::minutes_elapsed(order, now);
            let tier = priority::priority_for_minutes(minutes);
            let last = self.announced.get(&order.id).map(|p| *p);

            match last {
                Some(last) if tier <= last => continue,
                // 首次见到的低优先级订单只记录
                None if tier == Priority::Low => {
                    self.announced.insert(order.id.clone(), tier);
                    continue;
                }
                _ => {}
            }

            self.announced.insert(order.id.clone(), tier);
            tracing::info!(order_id = %order.id, from = ?last, to = %tier, minutes, "Order priority escalated");
            self.manager
                .notifier()
                .priority_escalated(&PriorityEscalatedPayload {
                    order_id: order.id.clone(),
                    kitchen_id: order.kitchen_id.clone(),
                    from: last,
                    to: tier,
                    minutes_elapsed: minutes,
                    at: now,
                });
            published += 1;
        }
        published
    }

    /// Orders currently tracked
    pub fn tracked(&self) -> usize {
        self.announced.len()
    }
}
