use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    /// Hashed API-key credential. The raw key is returned exactly once at
    /// signup and never stored.
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateBrand {
    pub name: String,
}
