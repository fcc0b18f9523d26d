//! Topic descriptor parsing.
//!
//! A descriptor is `"<mode>,<address>"`. Modes are `tcp` and `ipc`, also
//! accepted with the `zmq_` prefix used by the ZeroMQ bus client.

/// Raw descriptor split into trimmed mode and address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub mode: String,
    pub address: String,
}

impl Descriptor {
    /// Split at the first comma. Returns `None` if there is no comma.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (mode, address) = raw.split_once(',')?;
        Some(Self {
            mode: mode.trim().to_string(),
            address: address.trim().to_string(),
        })
    }

    #[must_use]
    pub fn transport_mode(&self) -> Option<TransportMode> {
        TransportMode::parse(&self.mode)
    }
}

/// Recognized transport modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Tcp,
    Ipc,
}

impl TransportMode {
    #[must_use]
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "tcp" | "zmq_tcp" => Some(Self::Tcp),
            "ipc" | "zmq_ipc" => Some(Self::Ipc),
            _ => None,
        }
    }
}

/// Whether `mode` uses the ZeroMQ key names (`zmq_tcp_publish`, `zmq_recv_hwm`).
#[must_use]
pub fn is_zmq_mode(mode: &str) -> bool {
    mode.starts_with("zmq_")
}

/// Parse `host:port`. The host must be non-empty and the port a valid `u16`.
#[must_use]
pub fn parse_tcp_address(address: &str) -> Option<(String, u16)> {
    let (host, port) = address.rsplit_once(':')?;
    let host = host.trim();
    if host.is_empty() {
        return None;
    }
    let port = port.trim().parse::<u16>().ok()?;
    Some((host.to_string(), port))
}
