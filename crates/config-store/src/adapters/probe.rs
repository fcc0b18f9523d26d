//! TCP readiness probe.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::trace;

use crate::domain::StoreEndpoint;
use crate::ports::ReachabilityProbe;

/// Probe that succeeds once any resolved address accepts a TCP connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpReachabilityProbe;

impl ReachabilityProbe for TcpReachabilityProbe {
    fn probe_once(&self, endpoint: &StoreEndpoint, timeout: Duration) -> bool {
        let addrs = match (endpoint.host.as_str(), endpoint.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                trace!(endpoint = %endpoint, error = %e, "store address did not resolve");
                return false;
            }
        };

        addrs
            .into_iter()
            .any(|addr| TcpStream::connect_timeout(&addr, timeout).is_ok())
    }
}
