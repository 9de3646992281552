//! Demo data loaded at startup when `AEROMED_SEED_DEMO` is enabled.

use chrono::{Duration, SecondsFormat, Utc};

use super::board::DispatchBoard;
use crate::models::{
    ChatMessage, ChatSender, InventoryItem, RequestStatus, Severity, SupplyRequest, Urgency,
};

const DEMO_EXPIRY: &str = "2024-12-31";

/// Emergency medicines stocked by the district hospital, with opening stock.
const MEDICINES: &[(u64, &str, u32)] = &[
    (6, "Inj. Atropine", 24),
    (7, "Inj. Adrenaline", 31),
    (8, "Inj. Hydrocortisone", 17),
    (10, "Inj. Dexamethasone", 42),
    (11, "Inj. KCl (Potassium)", 12),
    (25, "IV Paracetamol", 55),
];

pub fn seed_demo(board: &mut DispatchBoard) {
    let now = Utc::now();
    let stamp = |t: chrono::DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Millis, true);

    board.insert_request(SupplyRequest {
        id: "101".to_string(),
        phc: "PHC Chamorshi".to_string(),
        urgency: Urgency::Critical,
        status: RequestStatus::Pending,
        item: "Inj. Atropine".to_string(),
        qty: 10,
        created_at: stamp(now),
        distance: "12km".to_string(),
        chat: Vec::new(),
    });
    board.insert_request(SupplyRequest {
        id: "102".to_string(),
        phc: "PHC Gadhchiroli".to_string(),
        urgency: Urgency::High,
        status: RequestStatus::Pending,
        item: "IV Paracetamol".to_string(),
        qty: 50,
        created_at: stamp(now - Duration::hours(1)),
        distance: "8km".to_string(),
        chat: vec![ChatMessage {
            sender: ChatSender::Phc,
            message: "Urgent requirement due to accident case.".to_string(),
            timestamp: stamp(now),
        }],
    });

    for &(id, name, stock) in MEDICINES {
        board.insert_item(InventoryItem {
            id,
            name: name.to_string(),
            stock,
            expiry: DEMO_EXPIRY.to_string(),
        });
    }

    board.log("System initialized. Dispatch board online.", Severity::Notice);
}
