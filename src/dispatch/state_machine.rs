//! Supply request state machine.
//!
//! Defines valid status transitions and the actions each status offers.
//!
//! ```text
//! Pending --approve--> Approved --dispatch--> Dispatched --delivered--> Delivered
//! Pending --reject---> Rejected
//! ```

use crate::models::{RequestEvent, RequestStatus};

/// Get the next status for an event, if the transition is valid.
pub fn next_status(from: RequestStatus, event: RequestEvent) -> Option<RequestStatus> {
    if from.is_terminal() {
        return None;
    }

    match (from, event) {
        (RequestStatus::Pending, RequestEvent::Approve) => Some(RequestStatus::Approved),
        (RequestStatus::Pending, RequestEvent::Reject) => Some(RequestStatus::Rejected),
        (RequestStatus::Approved, RequestEvent::Dispatch) => Some(RequestStatus::Dispatched),
        (RequestStatus::Dispatched, RequestEvent::Delivered) => Some(RequestStatus::Delivered),
        _ => None,
    }
}

/// User actions available from a status.
pub fn available_actions(status: RequestStatus) -> Vec<RequestEvent> {
    match status {
        RequestStatus::Pending => vec![RequestEvent::Approve, RequestEvent::Reject],
        RequestStatus::Approved => vec![RequestEvent::Dispatch],
        RequestStatus::Rejected | RequestStatus::Dispatched | RequestStatus::Delivered => {
            Vec::new()
        }
    }
}
