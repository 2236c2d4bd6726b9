//! Transport settings for [`HyperClient`](crate::HyperClient) and
//! [`Client`](crate::Client).

use std::time::Duration;

/// `User-Agent` sent when no default header overrides it.
pub const DEFAULT_USER_AGENT: &str = concat!("restwire/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Timeouts, connection pooling and identification of outgoing requests.
///
/// `timeout` bounds the whole exchange: waiting for the response head and
/// collecting the body are each limited by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound for receiving a response.
    pub timeout: Duration,
    /// Upper bound for establishing a TCP connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_idle_per_host: usize,
    /// How long an idle connection stays in the pool.
    pub pool_idle_timeout: Duration,
    /// `User-Agent` header installed as a client default.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfigBuilder::default().build()
    }
}

impl ClientConfig {
    /// Start from the defaults and override selectively.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]; unset values fall back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl From<ClientConfig> for ClientConfigBuilder {
    fn from(config: ClientConfig) -> Self {
        Self {
            timeout: Some(config.timeout),
            connect_timeout: Some(config.connect_timeout),
            pool_idle_per_host: Some(config.pool_idle_per_host),
            pool_idle_timeout: Some(config.pool_idle_timeout),
            user_agent: Some(config.user_agent),
        }
    }
}

impl ClientConfigBuilder {
    /// Response timeout, 30 seconds by default.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Connect timeout, 10 seconds by default.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Idle connections kept per host, 32 by default.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Idle connection lifetime, 90 seconds by default.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// `User-Agent` value, [`DEFAULT_USER_AGENT`] by default.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve unset values to their defaults.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(DEFAULT_POOL_IDLE_PER_HOST),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(DEFAULT_POOL_IDLE_TIMEOUT),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        check!(config.timeout == Duration::from_secs(30));
        check!(config.connect_timeout == Duration::from_secs(10));
        check!(config.pool_idle_per_host == 32);
        check!(config.pool_idle_timeout == Duration::from_secs(90));
        check!(config.user_agent == DEFAULT_USER_AGENT);
        check!(config.user_agent.starts_with("restwire/"));
    }

    #[test]
    fn unset_values_keep_defaults() {
        let config = ClientConfig::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent("inventory-sync/2.0")
            .build();

        check!(config.connect_timeout == Duration::from_secs(5));
        check!(config.user_agent == "inventory-sync/2.0");
        check!(config.timeout == Duration::from_secs(30));
        check!(config.pool_idle_per_host == 32);
    }

    #[test]
    fn builder_from_config_is_lossless() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_millis(250))
            .pool_idle_per_host(4)
            .build();
        let rebuilt = ClientConfigBuilder::from(config.clone()).build();
        check!(rebuilt == config);
    }
}
