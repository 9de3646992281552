//! Drone operator model matching the dashboard's operator cards.

use serde::{Deserialize, Serialize};

/// Default status assigned to a newly registered operator.
pub const DEFAULT_OPERATOR_STATUS: &str = "Active";

/// Operator job role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OperatorRole {
    Pilot,
    Coordinator,
    Technician,
    Logistics,
}

impl OperatorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorRole::Pilot => "Pilot",
            OperatorRole::Coordinator => "Coordinator",
            OperatorRole::Technician => "Technician",
            OperatorRole::Logistics => "Logistics",
        }
    }

    /// Parse a role name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pilot" => Some(OperatorRole::Pilot),
            "coordinator" => Some(OperatorRole::Coordinator),
            "technician" => Some(OperatorRole::Technician),
            "logistics" => Some(OperatorRole::Logistics),
            _ => None,
        }
    }
}

/// Contact details for an operator. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatorContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A registered operator eligible for drone missions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub role: OperatorRole,
    pub sub_district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    pub contact: OperatorContact,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for registering an operator.
///
/// Older dashboard builds posted `phone`/`email`/`address` at the top level
/// instead of under `contact`; both shapes are accepted here and folded into a
/// single [`NewOperator`] by [`CreateOperatorRequest::normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperatorRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub sub_district: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub contact: Option<OperatorContact>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Validated operator fields ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOperator {
    pub name: String,
    pub role: OperatorRole,
    pub sub_district: String,
    pub experience: Option<String>,
    pub contact: OperatorContact,
    pub status: String,
}

impl CreateOperatorRequest {
    /// Validate required fields and fold legacy contact fields into `contact`.
    ///
    /// Values nested under `contact` win over the top-level legacy fields.
    pub fn normalize(self) -> Result<NewOperator, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Operator name is required".to_string());
        }

        let role = OperatorRole::parse(&self.role).ok_or_else(|| {
            format!(
                "Invalid role {:?}: expected Pilot, Coordinator, Technician or Logistics",
                self.role
            )
        })?;

        let sub_district = self.sub_district.trim().to_string();
        if sub_district.is_empty() {
            return Err("Sub-district is required".to_string());
        }

        let nested = self.contact.unwrap_or_default();
        let contact = OperatorContact {
            phone: non_blank(nested.phone).or_else(|| non_blank(self.phone)),
            email: non_blank(nested.email).or_else(|| non_blank(self.email)),
            address: non_blank(nested.address).or_else(|| non_blank(self.address)),
        };

        let status = non_blank(self.status).unwrap_or_else(|| DEFAULT_OPERATOR_STATUS.to_string());

        Ok(NewOperator {
            name,
            role,
            sub_district,
            experience: non_blank(self.experience),
            contact,
            status,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
