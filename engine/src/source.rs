//! Candidate address sources.
//!
//! Both allocation models walk an ordered range of candidates that ends at an
//! exclusive upper bound; only where the range comes from differs.

use std::cmp::Ordering;
use std::net::Ipv4Addr;

use crate::config::{AddressGroup, NetworkDescriptor};
use crate::ip_math::{
    compare_addresses, increment_address, ip_to_u32, network_address, parse_cidr, subnet_mask,
    u32_to_ip,
};

/// Fixed /24 the legacy groups are carved from
pub const GROUP_BASE: [u8; 3] = [192, 168, 1];

/// Offset from the network base where static assignment starts
pub const STATIC_SCAN_OFFSET: u32 = 10;

pub type Candidates<'a> = Box<dyn Iterator<Item = Ipv4Addr> + Send + 'a>;

pub trait AddressSource: Send + Sync {
    /// Pool name used in log messages
    fn name(&self) -> &str;

    /// Candidates in scan order, ending before the upper bound
    fn candidates(&self) -> Candidates<'_>;
}

/// Legacy named group: last-octet blocks on 192.168.1.0/24
pub struct GroupSource<'a> {
    group: &'a AddressGroup,
}

impl<'a> GroupSource<'a> {
    pub fn new(group: &'a AddressGroup) -> Self {
        Self { group }
    }
}

impl AddressSource for GroupSource<'_> {
    fn name(&self) -> &str {
        &self.group.name
    }

    fn candidates(&self) -> Candidates<'_> {
        let [a, b, c] = GROUP_BASE;
        Box::new(
            self.group
                .blocks
                .iter()
                .flat_map(move |block| {
                    (block.min..block.max).map(move |n| Ipv4Addr::new(a, b, c, n))
                }),
        )
    }
}

/// Static range of a controller network: base + 10 up to the DHCP start
#[derive(Debug, Clone)]
pub struct SubnetSource {
    name: String,
    start: Option<[u8; 4]>,
    end: [u8; 4],
}

impl SubnetSource {
    /// Build the scan window, or None if the subnet or DHCP start is missing or malformed
    pub fn from_descriptor(network: &NetworkDescriptor) -> Option<Self> {
        let cidr = network.cidr_subnet.as_deref()?;
        let dhcp_start = network.dhcp_start_address.as_deref()?;

        let (addr, prefix_len) = parse_cidr(cidr).ok()?;
        let mask = subnet_mask(prefix_len).ok()?;
        let end: Ipv4Addr = dhcp_start.trim().parse().ok()?;

        let base = network_address(addr.octets(), mask);
        let start = ip_to_u32(base)
            .checked_add(STATIC_SCAN_OFFSET)
            .map(u32_to_ip);

        Some(Self {
            name: network.name.clone(),
            start,
            end: end.octets(),
        })
    }

    pub fn start(&self) -> Option<Ipv4Addr> {
        self.start.map(Ipv4Addr::from)
    }

    pub fn end(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.end)
    }
}

impl AddressSource for SubnetSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn candidates(&self) -> Candidates<'_> {
        Box::new(SubnetWalk {
            next: self.start,
            end: self.end,
        })
    }
}

struct SubnetWalk {
    next: Option<[u8; 4]>,
    end: [u8; 4],
}

impl Iterator for SubnetWalk {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Ipv4Addr> {
        let current = self.next?;
        if compare_addresses(&current, &self.end) != Ordering::Less {
            self.next = None;
            return None;
        }

        let mut following = current;
        self.next = increment_address(&mut following).then_some(following);

        Some(Ipv4Addr::from(current))
    }
}
