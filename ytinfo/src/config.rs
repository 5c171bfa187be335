use std::time::Duration;

use serde::Deserialize;

/// Timeouts and headers of the default HTTP transport.
///
/// Every field is optional when deserializing, missing ones take their default.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct FetchConfig {
    /// Time allowed for establishing a connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Time allowed for a whole request, from connecting until the body is read.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// How long an idle connection is kept in the pool.
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout_secs: u64,
    #[serde(default = "default_tcp_keepalive")]
    pub tcp_keepalive_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            pool_idle_timeout_secs: default_pool_idle_timeout(),
            tcp_keepalive_secs: default_tcp_keepalive(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

impl FetchConfig {
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[inline]
    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }

    #[inline]
    pub fn tcp_keepalive(&self) -> Duration {
        Duration::from_secs(self.tcp_keepalive_secs)
    }
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_timeout() -> u64 {
    60
}

fn default_pool_idle_timeout() -> u64 {
    60
}

fn default_tcp_keepalive() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_owned()
}

fn default_accept_language() -> String {
    "en-US,en".to_owned()
}
