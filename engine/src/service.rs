use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::CooldownCache;
use crate::config::{IpOptions, NetworkDescriptor};
use crate::cooldown::CooldownManager;
use crate::error::Result;
use crate::ip_math::dotted_quad_last_octet;
use crate::source::{AddressSource, GroupSource, SubnetSource};

/// Most candidates one allocation call will examine before giving up.
///
/// Covers the whole static window of a /16.
pub const MAX_SCANNED_CANDIDATES: usize = 1 << 16;

/// Hands out free addresses from groups and networks and tracks released ones.
///
/// Allocation is not transactional: two concurrent callers scanning the same
/// pool can be handed the same address.
#[derive(Clone)]
pub struct IpService {
    options: Arc<IpOptions>,
    cooldown: CooldownManager,
}

impl IpService {
    pub fn new(options: IpOptions, cache: Arc<dyn CooldownCache>) -> Self {
        let cooldown =
            CooldownManager::new(cache, &options.cache_namespace, options.cooldown_minutes);
        Self {
            options: Arc::new(options),
            cooldown,
        }
    }

    pub fn options(&self) -> &IpOptions {
        &self.options
    }

    /// First free address in a named group, or None if the group is unknown or full
    pub async fn unused_group_address(
        &self,
        group_name: &str,
        used: &[String],
    ) -> Result<Option<Ipv4Addr>> {
        let Some(group) = self.options.find_group(group_name) else {
            warn!("Unknown address group: {}", group_name);
            return Ok(None);
        };

        self.scan(&GroupSource::new(group), used).await
    }

    /// Name of the first group with a block containing the address's last octet
    pub fn group_for_address(&self, address: &str) -> Option<String> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let last_octet = dotted_quad_last_octet(address)?;

        self.options
            .groups
            .iter()
            .find(|group| group.blocks.iter().any(|b| b.contains(last_octet)))
            .map(|group| group.name.clone())
    }

    /// First free address in a network's static range (base + 10 up to the DHCP start)
    pub async fn unused_network_address(
        &self,
        network: &NetworkDescriptor,
        used: &[String],
    ) -> Result<Option<Ipv4Addr>> {
        let Some(source) = SubnetSource::from_descriptor(network) else {
            warn!(
                "Network {} has no usable subnet/DHCP start (subnet={:?}, dhcp_start={:?})",
                network.name, network.cidr_subnet, network.dhcp_start_address
            );
            return Ok(None);
        };

        self.scan(&source, used).await
    }

    /// Same as `unused_network_address`, for a network defined in configuration
    pub async fn unused_configured_network_address(
        &self,
        network_name: &str,
        used: &[String],
    ) -> Result<Option<Ipv4Addr>> {
        let Some(network) = self.options.find_network(network_name) else {
            warn!("Unknown network: {}", network_name);
            return Ok(None);
        };

        self.unused_network_address(network, used).await
    }

    pub async fn is_in_cooldown(&self, address: &str) -> Result<bool> {
        self.cooldown.is_in_cooldown(address).await
    }

    /// Return an address to the pool; it stays unavailable until its cooldown expires
    pub async fn release(&self, address: &str) {
        self.cooldown.release(address).await
    }

    async fn scan<S: AddressSource + ?Sized>(
        &self,
        source: &S,
        used: &[String],
    ) -> Result<Option<Ipv4Addr>> {
        self.scan_with_budget(source, used, MAX_SCANNED_CANDIDATES).await
    }

    /// Single ordered pass over the source, examining at most `budget` candidates.
    ///
    /// The candidate order is deterministic, so a pass that found nothing is final.
    async fn scan_with_budget<S: AddressSource + ?Sized>(
        &self,
        source: &S,
        used: &[String],
        budget: usize,
    ) -> Result<Option<Ipv4Addr>> {
        let used: HashSet<Ipv4Addr> = used
            .iter()
            .filter_map(|ip| ip.trim().parse().ok())
            .collect();

        let mut examined = 0usize;
        for candidate in source.candidates() {
            if examined == budget {
                warn!("Stopped scanning {} after {} candidates", source.name(), budget);
                break;
            }
            examined += 1;

            if used.contains(&candidate) {
                continue;
            }

            if !self.cooldown.is_in_cooldown(&candidate.to_string()).await? {
                debug!("Assigning {} from {}", candidate, source.name());
                return Ok(Some(candidate));
            }
        }

        warn!("No open IPs found for {}", source.name());
        Ok(None)
    }
}
