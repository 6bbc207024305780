use serde::{Deserialize, Serialize};

/// A seat-consuming binding between a license and a caller-supplied
/// instance identifier. At most one active row exists per
/// (license_id, instance_identifier) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
    pub id: String,
    pub license_id: String,
    pub instance_identifier: String,
    pub active: bool,
    pub created_at: i64,
    pub deactivated_at: Option<i64>,
}
