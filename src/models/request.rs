//! Supply request model matching the hospital dashboard's request cards.

use serde::{Deserialize, Serialize};

/// Urgency tier chosen by the requesting PHC.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

/// Lifecycle status of a supply request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Dispatched,
    Delivered,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Delivered)
    }
}

/// Events that move a request between statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestEvent {
    Approve,
    Reject,
    Dispatch,
    /// Raised by the delivery path, never offered as a user action
    Delivered,
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ChatSender {
    #[default]
    Hospital,
    #[serde(rename = "PHC", alias = "Phc")]
    Phc,
}

/// A single message in a request's chat log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub message: String,
    pub timestamp: String,
}

/// A supply request from a PHC. Held in memory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub phc: String,
    pub urgency: Urgency,
    pub status: RequestStatus,
    pub item: String,
    pub qty: u32,
    pub created_at: String,
    pub distance: String,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
}

/// A request together with the actions its current status allows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    #[serde(flatten)]
    pub request: SupplyRequest,
    pub available_actions: Vec<RequestEvent>,
}

/// Request body for filing a new supply request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplyRequest {
    pub phc: String,
    pub urgency: Urgency,
    pub item: String,
    pub qty: u32,
    #[serde(default)]
    pub distance: Option<String>,
}

/// Request body for the dispatch action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchRequest {
    /// Explicit launch confirmation; dispatch is refused without it
    #[serde(default)]
    pub confirm: bool,
}

/// Request body for appending a chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendChatRequest {
    pub message: String,
    #[serde(default)]
    pub sender: ChatSender,
}
