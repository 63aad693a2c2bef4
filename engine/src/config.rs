use serde::{Deserialize, Serialize};

pub const DEFAULT_COOLDOWN_MINUTES: u32 = 5;
pub const DEFAULT_CACHE_NAMESPACE: &str = "IpManager";

/// Allocation settings, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpOptions {
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u32,
    #[serde(default = "default_cache_namespace")]
    pub cache_namespace: String,
    #[serde(default)]
    pub groups: Vec<AddressGroup>,
    #[serde(default)]
    pub networks: Vec<NetworkDescriptor>,
}

impl Default for IpOptions {
    fn default() -> Self {
        Self {
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            cache_namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            groups: Vec::new(),
            networks: Vec::new(),
        }
    }
}

impl IpOptions {
    pub fn find_group(&self, name: &str) -> Option<&AddressGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn find_network(&self, name: &str) -> Option<&NetworkDescriptor> {
        self.networks.iter().find(|n| n.name == name)
    }
}

fn default_cooldown_minutes() -> u32 {
    DEFAULT_COOLDOWN_MINUTES
}

fn default_cache_namespace() -> String {
    DEFAULT_CACHE_NAMESPACE.to_string()
}

/// Named set of last-octet ranges on 192.168.1.0/24
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressGroup {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<AddressBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBlock {
    pub min: u8,
    pub max: u8,
}

impl AddressBlock {
    pub fn contains(&self, last_octet: u16) -> bool {
        u16::from(self.min) <= last_octet && last_octet <= u16::from(self.max)
    }
}

/// A controller network: CIDR subnet plus the first DHCP-leased address.
///
/// The aliases accept the controller's own network JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub name: String,
    #[serde(default, alias = "ip_subnet")]
    pub cidr_subnet: Option<String>,
    #[serde(default, alias = "dhcpd_start")]
    pub dhcp_start_address: Option<String>,
}
