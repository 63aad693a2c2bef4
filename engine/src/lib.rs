//! Network address allocation engine.
//!
//! Finds free IPv4 addresses in named groups or controller networks, classifies
//! addresses into groups, and keeps released addresses in a cooldown window so
//! they are not handed out again while ARP/DHCP caches still remember them.

pub mod cache;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod ip_math;
pub mod service;
pub mod source;

pub use cache::{CooldownCache, MemoryCache};
pub use config::{AddressBlock, AddressGroup, IpOptions, NetworkDescriptor};
pub use cooldown::CooldownManager;
pub use error::{CacheError, Error, Result};
pub use service::IpService;
pub use source::{AddressSource, GroupSource, SubnetSource};
