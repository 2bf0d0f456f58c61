/// Default etcd peer address
pub const DEFAULT_ETCD_ADDR: &str = "http://127.0.0.1:4001";

/// Default key namespace the service is announced under
pub const DEFAULT_PATH: &str = "/service";

/// Default record TTL in seconds
pub const DEFAULT_TTL_SECS: u64 = 30;

/// Smallest TTL that still yields a non-zero announce interval
pub const MIN_TTL_SECS: u64 = 2;

/// Path segments of the etcd v2 keys API
pub const KEYS_API: [&str; 2] = ["v2", "keys"];

/// Announce type names accepted by `-type`
pub const TYPE_MSG: &str = "msg";
pub const TYPE_NET: &str = "net";
