pub const USER_AGENT: &str = concat!("WaypointRoutePlanner/", env!("CARGO_PKG_VERSION"));

/// Shared client for every outbound provider call. Timeouts are set per request.
pub fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
