//! Byte-level IPv4 arithmetic used by the subnet-aware allocator.
//!
//! Addresses are handled as big-endian `[u8; 4]` so the scan can walk them as a
//! counter without going through string formatting.

use ipnet::Ipv4Net;
use regex::Regex;
use std::cmp::Ordering;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Build the network mask for a prefix length (0..=32)
pub fn subnet_mask(prefix_len: u8) -> Result<[u8; 4]> {
    if prefix_len > 32 {
        return Err(Error::InvalidPrefix(prefix_len));
    }

    // Shifting a u32 by 32 overflows, so /0 is special-cased
    let mask: u32 = if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - prefix_len)
    };

    Ok(mask.to_be_bytes())
}

/// Network base address: `base AND mask`, byte-wise
pub fn network_address(base: [u8; 4], mask: [u8; 4]) -> [u8; 4] {
    let mut network = [0u8; 4];
    for (i, byte) in network.iter_mut().enumerate() {
        *byte = base[i] & mask[i];
    }
    network
}

pub fn ip_to_u32(ip: [u8; 4]) -> u32 {
    u32::from_be_bytes(ip)
}

pub fn u32_to_ip(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Increment an address as a big-endian counter.
///
/// Returns false when the address rolls over past 255.255.255.255, which the
/// scan treats as "nothing left".
pub fn increment_address(ip: &mut [u8; 4]) -> bool {
    for byte in ip.iter_mut().rev() {
        if *byte == u8::MAX {
            *byte = 0;
        } else {
            *byte += 1;
            return true;
        }
    }
    false
}

/// Lexicographic byte comparison of two addresses
pub fn compare_addresses(a: &[u8; 4], b: &[u8; 4]) -> Ordering {
    for i in 0..4 {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Parse "a.b.c.d/prefix" into the (unmasked) address and its prefix length
pub fn parse_cidr(cidr: &str) -> Result<(Ipv4Addr, u8)> {
    let net: Ipv4Net = cidr
        .trim()
        .parse()
        .map_err(|_| Error::InvalidCidr(cidr.to_string()))?;

    Ok((net.addr(), net.prefix_len()))
}

fn dotted_quad() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$")
            .expect("valid address pattern")
    })
}

/// Last octet of a dotted quad of 1-3 digit groups.
///
/// Octet ranges are not checked, so `999.999.999.101` yields 101.
pub fn dotted_quad_last_octet(address: &str) -> Option<u16> {
    let captures = dotted_quad().captures(address)?;
    captures[4].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet_mask() {
        assert_eq!(subnet_mask(0).unwrap(), [0, 0, 0, 0]);
        assert_eq!(subnet_mask(8).unwrap(), [255, 0, 0, 0]);
        assert_eq!(subnet_mask(23).unwrap(), [255, 255, 254, 0]);
        assert_eq!(subnet_mask(24).unwrap(), [255, 255, 255, 0]);
        assert_eq!(subnet_mask(32).unwrap(), [255, 255, 255, 255]);

        assert!(matches!(subnet_mask(33), Err(Error::InvalidPrefix(33))));
    }

    #[test]
    fn test_network_address() {
        let mask = subnet_mask(23).unwrap();
        assert_eq!(network_address([192, 168, 11, 77], mask), [192, 168, 10, 0]);

        let mask = subnet_mask(24).unwrap();
        assert_eq!(network_address([10, 0, 5, 200], mask), [10, 0, 5, 0]);
    }

    #[test]
    fn test_network_address_matches_ipnet() {
        let net: Ipv4Net = "172.16.37.9/20".parse().unwrap();
        let mask = subnet_mask(net.prefix_len()).unwrap();
        let ours = network_address(net.addr().octets(), mask);
        assert_eq!(Ipv4Addr::from(ours), net.network());
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(ip_to_u32([192, 168, 1, 0]) + 10, ip_to_u32([192, 168, 1, 10]));
        assert_eq!(u32_to_ip(0xC0A8_0A00), [192, 168, 10, 0]);
    }

    #[test]
    fn test_increment_rolls_over_octets() {
        let mut ip = [192, 168, 10, 255];
        assert!(increment_address(&mut ip));
        assert_eq!(ip, [192, 168, 11, 0]);

        let mut ip = [10, 255, 255, 255];
        assert!(increment_address(&mut ip));
        assert_eq!(ip, [11, 0, 0, 0]);
    }

    #[test]
    fn test_increment_overflow() {
        let mut ip = [255, 255, 255, 255];
        assert!(!increment_address(&mut ip));
    }

    #[test]
    fn test_compare_addresses() {
        assert_eq!(
            compare_addresses(&[192, 168, 1, 99], &[192, 168, 1, 100]),
            Ordering::Less
        );
        assert_eq!(
            compare_addresses(&[192, 168, 2, 0], &[192, 168, 1, 255]),
            Ordering::Greater
        );
        assert_eq!(
            compare_addresses(&[10, 0, 0, 1], &[10, 0, 0, 1]),
            Ordering::Equal
        );
    }

    #[test]
    fn test_parse_cidr() {
        let (addr, prefix) = parse_cidr("192.168.10.0/23").unwrap();
        assert_eq!(addr, Ipv4Addr::new(192, 168, 10, 0));
        assert_eq!(prefix, 23);

        assert!(parse_cidr("192.168.10.0").is_err());
        assert!(parse_cidr("192.168.10.0/40").is_err());
        assert!(parse_cidr("not-a-subnet").is_err());
    }

    #[test]
    fn test_dotted_quad_last_octet() {
        assert_eq!(dotted_quad_last_octet("192.168.1.100"), Some(100));
        assert_eq!(dotted_quad_last_octet("999.999.999.101"), Some(101));
        assert_eq!(dotted_quad_last_octet("10.0.0.999"), Some(999));

        assert_eq!(dotted_quad_last_octet(""), None);
        assert_eq!(dotted_quad_last_octet("192.168.1"), None);
        assert_eq!(dotted_quad_last_octet("192.168.1.100.1"), None);
        assert_eq!(dotted_quad_last_octet("192.168.1.1000"), None);
        assert_eq!(dotted_quad_last_octet(" 192.168.1.100"), None);
    }
}
