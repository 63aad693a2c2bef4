use ipmanager_engine::NetworkDescriptor;
use serde::{Deserialize, Serialize};

// ============================================================================
// Allocation
// ============================================================================

/// Body for group and configured-network allocation.
///
/// `used_addresses` is required; an absent list is a caller bug, not "nothing used".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedAddressRequest {
    pub used_addresses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedNetworkAddressRequest {
    pub network: Option<NetworkDescriptor>,
    pub used_addresses: Option<Vec<String>>,
}

/// Allocation result; an empty string means no address was available
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub address: String,
}

// ============================================================================
// Classification / Release
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownResponse {
    pub address: String,
    pub in_cooldown: bool,
}

// ============================================================================
// Health / Info
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub cooldown_minutes: u32,
    pub groups: Vec<String>,
    pub networks: Vec<String>,
}
