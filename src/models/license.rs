use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Suspended,
    Revoked,
}

/// Opaque key gating one or more licenses for the same brand + customer.
/// Generated once at first provisioning, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseKey {
    pub id: String,
    pub key: String,
    pub brand_id: String,
    pub customer_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub license_key_id: String,
    pub product_id: String,
    pub status: LicenseStatus,
    /// None = unlimited seats
    pub seat_limit: Option<i64>,
    /// None = perpetual
    pub expires_at: Option<i64>,
    pub suspension_reason: Option<String>,
    pub revocation_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl License {
    /// Computed validity, never stored: a past expires_at makes the license
    /// invalid regardless of stored status.
    pub fn is_valid(&self, now: i64) -> bool {
        self.status == LicenseStatus::Active && self.expires_at.is_none_or(|exp| exp > now)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[derive(Debug, Deserialize)]
pub struct ProvisionLicense {
    pub product_id: String,
    pub customer_email: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub seat_limit: Option<i64>,
}

/// Provisioning result: the new license plus its (possibly reused) key.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedLicense {
    #[serde(flatten)]
    pub license: License,
    pub license_key: String,
}

/// Row shape for brand-scoped listings: license joined with its key and product.
#[derive(Debug, Clone, Serialize)]
pub struct ListedLicense {
    #[serde(flatten)]
    pub license: License,
    pub license_key: String,
    pub product_code: String,
    pub product_name: String,
}

/// Per-product view of a license's current validity and seat usage.
#[derive(Debug, Clone, Serialize)]
pub struct Entitlement {
    pub product_code: String,
    pub status: LicenseStatus,
    pub expires_at: Option<i64>,
    pub valid: bool,
    pub seat_limit: Option<i64>,
    pub active_seats: i64,
    /// None when seat_limit is unlimited
    pub remaining_seats: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LicenseStatusData {
    pub license_key: String,
    pub customer_email: String,
    pub entitlements: Vec<Entitlement>,
    /// True if any license under the key is currently valid
    pub valid: bool,
}
