//! Transport configuration.
//!
//! [`Config`] is a plain value describing how to reach a key server:
//! its URL, the request timeout, certificate handling, and an
//! optional HTTP proxy.  It is turned into a [`reqwest::Client`] when
//! the [`KeyServer`] handle is built.
//!
//! [`KeyServer`]: crate::KeyServer

use std::time::Duration;

use crate::Result;

/// Path of the lookup endpoint, relative to the server root.
///
/// Fixed by the protocol; every HKP server answers here.
pub const BASE_PATH: &str = "pks/lookup";

/// Configuration for talking to a key server.
///
/// A plain immutable value.  Use [`Config::new`] for the defaults and
/// struct update syntax to deviate from them:
///
/// ```
/// use std::time::Duration;
/// use hkp_client::Config;
///
/// let config = Config {
///     request_timeout: Duration::from_secs(30),
///     ..Config::new("hkp://keys.example.org")
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The key server URL, e.g. `hkps://keys.openpgp.org` or
    /// `hkp://keys.example.org:11371`.
    pub url: String,

    /// Connect and request timeout.
    pub request_timeout: Duration,

    /// Skips validation of the server's TLS certificate.
    ///
    /// There is no valid use for this outside of development setups.
    pub accept_invalid_certs: bool,

    /// Optional HTTP or HTTPS proxy to route requests through.
    pub proxy: Option<ProxyConfig>,
}

assert_send_and_sync!(Config);

/// A proxy, with optional credentials for basic auth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    /// The proxy URL, e.g. `http://proxy.example.org:3128`.
    pub url: String,

    /// Username, for proxies requiring authentication.
    pub username: Option<String>,

    /// Password, for proxies requiring authentication.
    pub password: Option<String>,
}

impl Config {
    /// Returns the configuration for the given key server URL with
    /// default settings: a 10 second timeout, certificate validation
    /// on, no proxy.
    pub fn new(url: impl Into<String>) -> Self {
        Config {
            url: url.into(),
            request_timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
            proxy: None,
        }
    }

    /// Builds the HTTP client this configuration describes.
    pub(crate) fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.request_timeout)
            .timeout(self.request_timeout);

        if self.accept_invalid_certs {
            tracing::warn!("Disabling certificate validation for {}",
                           self.url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy) = &self.proxy {
            let mut p = reqwest::Proxy::all(&proxy.url)?;
            if let (Some(username), Some(password)) =
                (&proxy.username, &proxy.password)
            {
                p = p.basic_auth(username, password);
            }
            builder = builder.proxy(p);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new("hkp://keys.example.org");
        assert_eq!(config.url, "hkp://keys.example.org");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.accept_invalid_certs);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn builds_a_client() {
        assert!(Config::new("hkp://keys.example.org")
                .build_client().is_ok());

        let config = Config {
            accept_invalid_certs: true,
            proxy: Some(ProxyConfig {
                url: "http://proxy.example.org:3128".into(),
                username: Some("squid".into()),
                password: Some("hunter2".into()),
            }),
            ..Config::new("hkps://keys.example.org")
        };
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn rejects_bad_proxy_urls() {
        let config = Config {
            proxy: Some(ProxyConfig {
                url: "not a url".into(),
                username: None,
                password: None,
            }),
            ..Config::new("hkp://keys.example.org")
        };
        assert!(config.build_client().is_err());
    }
}
