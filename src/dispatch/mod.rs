//! Dispatch workflow.
//!
//! Tracks supply requests from filing through delivery. State lives in memory
//! behind a single lock and is discarded on restart.

mod board;
pub mod locations;
mod seed;
pub mod state_machine;

pub use board::{DeliveryOutcome, DispatchBoard};
pub use seed::seed_demo;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{
    ActivityEntry, AddItemRequest, CreateSupplyRequest, InventoryItem, Mission, RequestEvent,
    RequestStatus, RequestView, SendChatRequest,
};

/// Errors raised by dispatch workflow operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Request {0} not found")]
    UnknownRequest(String),

    #[error("Inventory item {0} not found")]
    UnknownItem(u64),

    #[error("Request {0} has no active mission")]
    NoActiveMission(String),

    #[error("Cannot {event:?} request {id} while it is {from:?}")]
    InvalidTransition {
        id: String,
        from: RequestStatus,
        event: RequestEvent,
    },

    #[error("Dispatch must be confirmed")]
    NotConfirmed,

    #[error("Field '{0}' is required")]
    EmptyField(&'static str),
}

/// Shared handle to the dispatch board.
#[derive(Clone)]
pub struct Dispatcher {
    board: Arc<RwLock<DispatchBoard>>,
    delivery_delay: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher over `board`. With a `delivery_delay`, every
    /// dispatched mission is marked delivered once the delay elapses.
    pub fn new(board: DispatchBoard, delivery_delay: Option<Duration>) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
            delivery_delay,
        }
    }

    pub async fn list_requests(&self) -> Vec<RequestView> {
        self.board.read().await.list_requests()
    }

    pub async fn get_request(&self, id: &str) -> Result<RequestView, DispatchError> {
        self.board.read().await.get_request(id)
    }

    pub async fn create_request(
        &self,
        request: CreateSupplyRequest,
    ) -> Result<RequestView, DispatchError> {
        let created = self.board.write().await.create_request(request)?;
        tracing::info!(
            request_id = %created.request.id,
            phc = %created.request.phc,
            urgency = ?created.request.urgency,
            "supply request filed"
        );
        Ok(created)
    }

    pub async fn approve(&self, id: &str) -> Result<RequestView, DispatchError> {
        self.board.write().await.approve(id)
    }

    pub async fn reject(&self, id: &str) -> Result<RequestView, DispatchError> {
        self.board.write().await.reject(id)
    }

    /// Launch a mission and schedule its delivery placeholder.
    pub async fn dispatch(&self, id: &str, confirmed: bool) -> Result<Mission, DispatchError> {
        let (mission, replaced) = self.board.write().await.dispatch(id, confirmed)?;

        if let Some(previous) = replaced {
            tracing::warn!(
                replaced = %previous.id,
                by = %mission.id,
                "active mission replaced; previous request stays Dispatched"
            );
        }
        tracing::info!(request_id = %mission.id, phc = %mission.phc, "mission launched");

        self.schedule_delivery(mission.id.clone());
        Ok(mission)
    }

    /// Mark the active mission for `id` delivered.
    ///
    /// This is the arrival hook for real telemetry; the timer in
    /// [`Dispatcher::schedule_delivery`] calls it too.
    pub async fn complete_delivery(&self, id: &str) -> Result<RequestView, DispatchError> {
        match self.board.write().await.complete_delivery(id)? {
            DeliveryOutcome::Delivered(view) => {
                tracing::info!(request_id = %id, phc = %view.request.phc, "package delivered");
                Ok(view)
            }
            DeliveryOutcome::Stale => Err(DispatchError::NoActiveMission(id.to_string())),
        }
    }

    pub async fn active_missions(&self) -> Vec<Mission> {
        self.board.read().await.active_missions()
    }

    pub async fn append_chat(
        &self,
        id: &str,
        chat: SendChatRequest,
    ) -> Result<RequestView, DispatchError> {
        self.board.write().await.append_chat(id, chat)
    }

    pub async fn inventory(&self) -> Vec<InventoryItem> {
        self.board.read().await.inventory().to_vec()
    }

    pub async fn add_item(&self, request: AddItemRequest) -> Result<InventoryItem, DispatchError> {
        self.board.write().await.add_item(request)
    }

    pub async fn adjust_stock(&self, id: u64, amount: i64) -> Result<InventoryItem, DispatchError> {
        self.board.write().await.adjust_stock(id, amount)
    }

    pub async fn activity(&self) -> Vec<ActivityEntry> {
        self.board.read().await.activity().to_vec()
    }

    /// Fixed-delay stand-in for an arrival event.
    ///
    /// PLACEHOLDER: completion here has no relation to the drone's position.
    /// Real deliveries should come through [`Dispatcher::complete_delivery`]
    /// driven by telemetry, with `AEROMED_DELIVERY_SECS=0` disabling this timer.
    fn schedule_delivery(&self, id: String) {
        let Some(delay) = self.delivery_delay else {
            return;
        };

        let board = Arc::clone(&self.board);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            match board.write().await.complete_delivery(&id) {
                Ok(DeliveryOutcome::Delivered(_)) => {
                    tracing::info!(request_id = %id, "delivery timer elapsed; mission complete");
                }
                Ok(DeliveryOutcome::Stale) => {
                    tracing::warn!(request_id = %id, "delivery timer fired for inactive mission");
                }
                Err(e) => {
                    tracing::warn!(request_id = %id, "delivery timer failed: {}", e);
                }
            }
        });
    }
}
