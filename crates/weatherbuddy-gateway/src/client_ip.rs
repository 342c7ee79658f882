use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Address the request originated from.
///
/// With `trust_forwarded_for`, the first non-empty `X-Forwarded-For` entry wins
/// over the TCP peer. Returns `None` when that entry is not an IP address.
pub fn client_ip(
    headers: &HeaderMap,
    peer: SocketAddr,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    if trust_forwarded_for {
        let first = headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(entry) = first {
            return parse_forwarded(entry).map(|ip| ip.to_canonical());
        }
    }

    Some(peer.ip().to_canonical())
}

/// Accepts bare addresses and `addr:port` / `[v6]:port` forms.
fn parse_forwarded(entry: &str) -> Option<IpAddr> {
    entry
        .parse::<IpAddr>()
        .ok()
        .or_else(|| entry.parse::<SocketAddr>().ok().map(|s| s.ip()))
}
