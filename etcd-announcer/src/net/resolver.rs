use std::net::IpAddr;
use crate::error::AnnounceError;

/// Host interface table
pub trait InterfaceSource: Send + Sync {
    /// Addresses bound to `name` in OS enumeration order,
    /// or `None` if the interface does not exist.
    fn addresses(&self, name: &str) -> Result<Option<Vec<IpAddr>>, AnnounceError>;
}

/// Reads the live interface table from the OS
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn addresses(&self, name: &str) -> Result<Option<Vec<IpAddr>>, AnnounceError> {
        if !is_interface_name(name) {
            return Ok(None);
        }

        let all = local_ip_address::list_afinet_netifas().map_err(|e| AnnounceError::AddressListing {
            interface: name.to_string(),
            reason: e.to_string(),
        })?;

        let addrs: Vec<IpAddr> = all
            .into_iter()
            .filter(|(ifname, _)| ifname == name)
            .map(|(_, ip)| ip)
            .collect();

        if addrs.is_empty() && !interface_exists(name) {
            return Ok(None);
        }
        Ok(Some(addrs))
    }
}

/// Rejects names that could never be an interface, including path tricks
/// like `.` and `..` that would resolve to directories under `/sys/class/net`.
fn is_interface_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/')
}

/// Interfaces without an address are absent from the address listing,
/// so existence is checked separately where the OS allows it.
#[cfg(target_os = "linux")]
fn interface_exists(name: &str) -> bool {
    std::path::Path::new("/sys/class/net").join(name).exists()
}

#[cfg(not(target_os = "linux"))]
fn interface_exists(_name: &str) -> bool {
    false
}

/// Returns the first address of the named interface as a bare string.
/// Fails if the interface does not exist or has no address attached.
pub fn resolve_address(source: &impl InterfaceSource, interface: &str) -> Result<String, AnnounceError> {
    let addrs = source
        .addresses(interface)?
        .ok_or_else(|| AnnounceError::InterfaceNotFound(interface.to_string()))?;

    let first = addrs
        .first()
        .ok_or_else(|| AnnounceError::NoAddressBound(interface.to_string()))?;

    let address = strip_prefix_len(&first.to_string()).to_string();
    tracing::debug!("Resolved interface {} to {}", interface, address);
    Ok(address)
}

/// "10.0.0.5/24" -> "10.0.0.5"
fn strip_prefix_len(addr: &str) -> &str {
    addr.split('/').next().unwrap_or(addr)
}
