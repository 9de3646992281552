//! In-memory dispatch board.
//!
//! Holds supply requests, the active mission slot, hospital inventory and the
//! activity log. Every method is synchronous; callers provide the locking.

use chrono::{SecondsFormat, Utc};

use super::locations::{self, HOSPITAL_LOCATION};
use super::state_machine;
use super::DispatchError;
use crate::models::{
    ActivityEntry, AddItemRequest, ChatMessage, CreateSupplyRequest, InventoryItem, Mission,
    RequestEvent, RequestStatus, RequestView, SendChatRequest, Severity, SupplyRequest,
    DEFAULT_EXPIRY,
};

/// Maximum number of activity log lines retained.
pub const ACTIVITY_LOG_CAPACITY: usize = 20;

/// Result of a delivery completion attempt.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The mission was active and its request is now Delivered
    Delivered(RequestView),
    /// The request is no longer the active mission
    Stale,
}

#[derive(Debug, Default)]
pub struct DispatchBoard {
    requests: Vec<SupplyRequest>,
    // At most one mission by construction; a new dispatch replaces it.
    mission: Option<Mission>,
    inventory: Vec<InventoryItem>,
    activity: Vec<ActivityEntry>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl DispatchBoard {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== REQUESTS ====================

    /// All requests, newest first.
    pub fn list_requests(&self) -> Vec<RequestView> {
        let mut requests: Vec<(usize, &SupplyRequest)> = self.requests.iter().enumerate().collect();
        requests.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        requests.into_iter().map(|(_, r)| view(r)).collect()
    }

    pub fn get_request(&self, id: &str) -> Result<RequestView, DispatchError> {
        self.find(id).map(view)
    }

    /// File a new Pending request.
    pub fn create_request(
        &mut self,
        request: CreateSupplyRequest,
    ) -> Result<RequestView, DispatchError> {
        let phc = request.phc.trim().to_string();
        if phc.is_empty() {
            return Err(DispatchError::EmptyField("phc"));
        }
        let item = request.item.trim().to_string();
        if item.is_empty() {
            return Err(DispatchError::EmptyField("item"));
        }

        let distance = request
            .distance
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .or_else(|| locations::distance_label(&phc))
            .unwrap_or_else(|| "unknown".to_string());

        let created = SupplyRequest {
            id: uuid::Uuid::new_v4().to_string(),
            phc,
            urgency: request.urgency,
            status: RequestStatus::Pending,
            item,
            qty: request.qty,
            created_at: now(),
            distance,
            chat: Vec::new(),
        };

        self.log(
            format!(
                "New {:?} request {} from {}: {} x{}",
                created.urgency, created.id, created.phc, created.item, created.qty
            ),
            Severity::Info,
        );
        let result = view(&created);
        self.requests.push(created);
        Ok(result)
    }

    /// Insert a fully-formed request, used for seeding.
    pub fn insert_request(&mut self, request: SupplyRequest) {
        self.requests.push(request);
    }

    pub fn approve(&mut self, id: &str) -> Result<RequestView, DispatchError> {
        let request = self.transition(id, RequestEvent::Approve)?;
        self.log(
            format!("Request {id} approved. Awaiting dispatch."),
            Severity::Notice,
        );
        Ok(request)
    }

    pub fn reject(&mut self, id: &str) -> Result<RequestView, DispatchError> {
        let request = self.transition(id, RequestEvent::Reject)?;
        self.log(format!("Request {id} rejected."), Severity::Info);
        Ok(request)
    }

    /// Launch a mission for an Approved request.
    ///
    /// Returns the new mission and, if one was in flight, the mission it replaced.
    pub fn dispatch(
        &mut self,
        id: &str,
        confirmed: bool,
    ) -> Result<(Mission, Option<Mission>), DispatchError> {
        let status = self.find(id)?.status;
        if state_machine::next_status(status, RequestEvent::Dispatch).is_none() {
            return Err(DispatchError::InvalidTransition {
                id: id.to_string(),
                from: status,
                event: RequestEvent::Dispatch,
            });
        }
        if !confirmed {
            return Err(DispatchError::NotConfirmed);
        }

        let request = self.transition(id, RequestEvent::Dispatch)?.request;
        let mission = Mission {
            id: request.id.clone(),
            phc: request.phc.clone(),
            origin: HOSPITAL_LOCATION,
            destination: locations::destination_for(&request.phc),
            launched_at: now(),
        };
        let replaced = self.mission.replace(mission.clone());

        self.log(
            format!("Launch confirmed. Drone en route to {}", mission.phc),
            Severity::Alert,
        );
        Ok((mission, replaced))
    }

    /// Mark the active mission for `id` as delivered and clear it.
    pub fn complete_delivery(&mut self, id: &str) -> Result<DeliveryOutcome, DispatchError> {
        match &self.mission {
            Some(mission) if mission.id == id => {}
            _ => return Ok(DeliveryOutcome::Stale),
        }

        let delivered = self.transition(id, RequestEvent::Delivered)?;
        let mission = self.mission.take();
        let phc = mission
            .map(|m| m.phc)
            .unwrap_or_else(|| delivered.request.phc.clone());
        self.log(
            format!("Package delivered successfully to {phc}"),
            Severity::Success,
        );
        Ok(DeliveryOutcome::Delivered(delivered))
    }

    /// Active missions; empty or a single entry.
    pub fn active_missions(&self) -> Vec<Mission> {
        self.mission.iter().cloned().collect()
    }

    pub fn append_chat(
        &mut self,
        id: &str,
        chat: SendChatRequest,
    ) -> Result<RequestView, DispatchError> {
        let message = chat.message.trim().to_string();
        if message.is_empty() {
            return Err(DispatchError::EmptyField("message"));
        }
        let request = self.find_mut(id)?;
        request.chat.push(ChatMessage {
            sender: chat.sender,
            message,
            timestamp: now(),
        });
        Ok(view(request))
    }

    fn transition(&mut self, id: &str, event: RequestEvent) -> Result<RequestView, DispatchError> {
        let request = self.find_mut(id)?;
        let next = state_machine::next_status(request.status, event).ok_or_else(|| {
            DispatchError::InvalidTransition {
                id: id.to_string(),
                from: request.status,
                event,
            }
        })?;
        tracing::info!(request_id = %id, from = ?request.status, to = ?next, "request transition");
        request.status = next;
        Ok(view(request))
    }

    fn find(&self, id: &str) -> Result<&SupplyRequest, DispatchError> {
        self.requests
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DispatchError::UnknownRequest(id.to_string()))
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut SupplyRequest, DispatchError> {
        self.requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DispatchError::UnknownRequest(id.to_string()))
    }

    // ==================== INVENTORY ====================

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn add_item(&mut self, request: AddItemRequest) -> Result<InventoryItem, DispatchError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(DispatchError::EmptyField("name"));
        }
        let item = InventoryItem {
            id: self.inventory.iter().map(|i| i.id).max().unwrap_or(0) + 1,
            name,
            stock: request.stock,
            expiry: request
                .expiry
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_EXPIRY.to_string()),
        };
        self.inventory.push(item.clone());
        Ok(item)
    }

    pub fn adjust_stock(&mut self, id: u64, amount: i64) -> Result<InventoryItem, DispatchError> {
        let item = self
            .inventory
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(DispatchError::UnknownItem(id))?;
        item.adjust(amount);
        Ok(item.clone())
    }

    /// Insert a fully-formed item, used for seeding.
    pub fn insert_item(&mut self, item: InventoryItem) {
        self.inventory.push(item);
    }

    // ==================== ACTIVITY ====================

    /// Activity log, newest first.
    pub fn activity(&self) -> &[ActivityEntry] {
        &self.activity
    }

    pub fn log(&mut self, message: impl Into<String>, severity: Severity) {
        self.activity.insert(
            0,
            ActivityEntry {
                time: now(),
                message: message.into(),
                severity,
            },
        );
        self.activity.truncate(ACTIVITY_LOG_CAPACITY);
    }
}

fn view(request: &SupplyRequest) -> RequestView {
    RequestView {
        request: request.clone(),
        available_actions: state_machine::available_actions(request.status),
    }
}
