#![allow(dead_code)]

//! Fixed-window request limiter keyed by client IP.
//!
//! Coarse and approximate on purpose: one counter per IP per window, no
//! token bucket. Expired windows are evicted on every check, so the map is
//! bounded by the set of IPs seen within a single window rather than growing
//! for the lifetime of the process.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use axum::http::HeaderMap;
use tokio::time::Instant;

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    windows: HashMap<IpAddr, Window>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: HashMap::new(),
            limit: limit.max(1),
            window,
        }
    }

    /// Records one request for `ip` and reports whether it is still within
    /// the window's budget.
    pub fn check(&mut self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let window = self.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started_at) < window);

        let entry = self.windows.entry(ip).or_insert(Window {
            started_at: now,
            count: 0,
        });
        entry.count += 1;
        entry.count <= self.limit
    }

    /// Number of IPs currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}

/// Prefers the first X-Forwarded-For hop (set by the reverse proxy), falling
/// back to the socket peer address.
pub fn client_ip(headers: &HeaderMap, peer: IpAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(peer)
}
