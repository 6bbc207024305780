use serde::{Deserialize, Serialize};

/// Implicit entity: created on first reference during provisioning,
/// never managed directly. Identity is the normalized email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}
