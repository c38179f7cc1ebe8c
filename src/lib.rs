//! Looking up OpenPGP certificates on HKP key servers.
//!
//! This crate implements the client side of the [HKP] lookup
//! protocol: it encodes `op=index` and `op=get` requests as HTTP
//! query parameters, and decodes the machine-readable (`options=mr`)
//! responses into structured values.  Retrieved key material is
//! treated as an opaque armor block; pair this crate with an OpenPGP
//! implementation to do anything with the keys themselves.
//!
//! [HKP]: https://tools.ietf.org/html/draft-shaw-openpgp-hkp-00
//!
//! # Examples
//!
//! This example searches a key server's index:
//!
//! ```no_run
//! # use hkp_client::{KeyServer, Result};
//! # async fn f() -> Result<()> {
//! let ks = KeyServer::new("hkp://keys.example.org")?;
//! for entry in ks.search("alice@example.org").await?.entries() {
//!     println!("{} {}", entry.pub_().key_id(), entry.uid().uid());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! This example retrieves a key, which may legitimately not exist:
//!
//! ```no_run
//! # use hkp_client::{KeyServer, Result};
//! # async fn f() -> Result<()> {
//! let ks = KeyServer::default();
//! match ks.get("0x31855247603831FD").await? {
//!     Some(key) => print!("{}", key),
//!     None => eprintln!("Not found."),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Re-exports of crates that we use in our API.
pub use chrono;
pub use reqwest;

use reqwest::Url;

#[macro_use] mod macros;
mod config;
pub mod parse;
mod request;
mod response;

pub use config::{BASE_PATH, Config, ProxyConfig};
pub use request::{GetRequest, Request, SearchRequest};
pub use response::{
    Entry,
    ErrorResponse,
    PgpPublicKey,
    Pub,
    RawResponse,
    SearchIndexResponse,
    Uid,
};

/// For looking up keys on a key server using HKP.
#[derive(Clone)]
pub struct KeyServer {
    client: reqwest::Client,
    /// The original URL given to the constructor.
    url: Url,
    /// The URL we use for the requests.
    request_url: Url,
}

assert_send_and_sync!(KeyServer);

impl Default for KeyServer {
    fn default() -> Self {
        Self::new("hkps://keys.openpgp.org/").unwrap()
    }
}

impl KeyServer {
    /// Returns a handle for the given URL with default settings.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(Config::new(url))
    }

    /// Returns a handle built from the given configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let client = config.build_client()?;
        Self::make(&config.url, client)
    }

    /// Returns a handle for the given URL with a custom `Client`.
    ///
    /// Use this when the transport needs settings [`Config`] does not
    /// cover, like a SOCKS proxy.
    pub fn with_client(url: &str, client: reqwest::Client) -> Result<Self> {
        Self::make(url, client)
    }

    fn make(url: &str, client: reqwest::Client) -> Result<Self> {
        let url = Url::parse(url)?;

        let s = url.scheme();
        let (scheme, default_port) = match s {
            "hkp" => ("http", 11371),
            "hkps" => ("https", 443),
            "http" => ("http", 80),
            "https" => ("https", 443),
            _ => return Err(Error::MalformedUrl.into()),
        };

        let request_url =
            format!("{}://{}:{}",
                    scheme,
                    url.host().ok_or(Error::MalformedUrl)?,
                    url.port().unwrap_or(default_port)).parse()?;

        Ok(KeyServer { client, url, request_url })
    }

    /// Returns the key server's base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Searches the server's index.
    ///
    /// Any non-200 answer, 404 included, is an error here: a search
    /// matching nothing still gets a well-formed index response with
    /// zero entries.
    pub async fn search<R>(&self, request: R) -> Result<SearchIndexResponse>
    where
        R: Into<SearchRequest>,
    {
        let response = self.submit(&Request::Search(request.into())).await?;
        Outcome::from_response(&response, parse::search_index)?
            .handle_error(|error| Err(Error::HttpStatus(error).into()))
    }

    /// Retrieves a key.
    ///
    /// Returns `Ok(None)` when the server has no matching key.  That
    /// covers both a 404 answer and a 200 answer with an empty body.
    pub async fn get<R>(&self, request: R) -> Result<Option<PgpPublicKey>>
    where
        R: Into<GetRequest>,
    {
        let response = self.submit(&Request::Get(request.into())).await?;
        Outcome::from_response(&response, parse::public_key)?
            .handle_error(|error| if error.code() == 404 {
                Ok(None)
            } else {
                Err(Error::HttpStatus(error).into())
            })
    }

    /// Issues the HTTP request encoding `request` and returns the raw
    /// status and body.
    async fn submit(&self, request: &Request) -> Result<RawResponse> {
        let mut url = self.request_url.join(BASE_PATH)?;
        url.query_pairs_mut().extend_pairs(request.parameters());

        tracing::debug!("GET {}", url);
        let res = self.client.get(url).send().await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        tracing::debug!("Response: {} ({} bytes)", status, body.len());
        tracing::trace!("Response body: {:?}", body);

        Ok(RawResponse::new(status, Some(body)))
    }
}

/// The outcome of one exchange with the server: either the decoded
/// value, or the error response the server sent instead.
///
/// There is exactly one way to get at the value:
/// [`Outcome::handle_error`], which makes the call site spell out its
/// policy for the error case.  "A 404 means the key does not exist"
/// and "a 404 is fatal" are decisions that live in those handlers and
/// nowhere else.
#[derive(Clone, Debug)]
pub struct Outcome<T> {
    inner: std::result::Result<T, ErrorResponse>,
}

impl<T> Outcome<T> {
    /// Wraps a successfully decoded value.
    pub fn new_success(value: T) -> Self {
        Outcome { inner: Ok(value) }
    }

    /// Wraps the error response the server sent.
    pub fn new_error(error: ErrorResponse) -> Self {
        Outcome { inner: Err(error) }
    }

    /// Dispatches on a raw response.
    ///
    /// A 200 answer has its body fed through `parse`; any other
    /// status becomes an error outcome carrying the status code and
    /// body.  A parse failure is a hard error, not an error outcome:
    /// the server answered 200 with something we cannot read.
    pub fn from_response<F>(response: &RawResponse, parse: F) -> Result<Self>
    where
        F: FnOnce(Option<&str>) -> Result<T>,
    {
        if response.status() != 200 {
            return Ok(Self::new_error(ErrorResponse::new(
                response.body().unwrap_or_default(),
                response.status())));
        }

        parse(response.body()).map(Self::new_success)
    }

    /// Extracts the value, deciding what to do about an error
    /// response.
    ///
    /// `handler` runs only in the error case.  It either recovers a
    /// substitute value, or escalates to a failure of its own.
    pub fn handle_error<F>(self, handler: F) -> Result<T>
    where
        F: FnOnce(ErrorResponse) -> Result<T>,
    {
        match self.inner {
            Ok(value) => Ok(value),
            Err(error) => handler(error),
        }
    }
}

/// Results for hkp-client.
pub type Result<T> = ::std::result::Result<T, anyhow::Error>;

#[derive(thiserror::Error, Debug)]
/// Errors returned from the lookup routines.
#[non_exhaustive]
pub enum Error {
    /// A given key server URL was malformed.
    #[error("Malformed URL; expected http:, https:, hkp: or hkps:")]
    MalformedUrl,
    /// The server provided malformed data.
    #[error("Malformed response from server: {0}")]
    MalformedResponse(String),
    /// The server answered with an error status.
    #[error("server returned {0}")]
    HttpStatus(ErrorResponse),
    /// A `url::ParseError` occurred.
    #[error(transparent)]
    UrlError(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        assert!(KeyServer::new("keys.openpgp.org").is_err());
        assert!(KeyServer::new("hkp://keys.openpgp.org").is_ok());
        assert!(KeyServer::new("hkps://keys.openpgp.org").is_ok());
        assert!(KeyServer::new("http://keys.openpgp.org").is_ok());
        assert!(KeyServer::new("https://keys.openpgp.org").is_ok());
        assert!(KeyServer::new("ldap://keys.openpgp.org").is_err());
    }

    #[test]
    fn request_urls() {
        let ks = KeyServer::new("hkp://keys.example.org").unwrap();
        assert_eq!(ks.request_url.as_str(),
                   "http://keys.example.org:11371/");

        // 443 is the default for https, so it serializes away.
        let ks = KeyServer::new("hkps://keys.example.org").unwrap();
        assert_eq!(ks.request_url.as_str(), "https://keys.example.org/");

        let ks = KeyServer::new("hkp://keys.example.org:8080").unwrap();
        assert_eq!(ks.request_url.as_str(), "http://keys.example.org:8080/");

        let ks = KeyServer::new("http://keys.example.org").unwrap();
        assert_eq!(ks.request_url.as_str(), "http://keys.example.org/");
    }

    #[test]
    fn url_returns_the_original() {
        let ks = KeyServer::new("hkp://keys.example.org").unwrap();
        assert_eq!(ks.url().as_str(), "hkp://keys.example.org");
    }

    #[test]
    fn outcome_passes_values_through() {
        let outcome = Outcome::new_success(17);
        let value = outcome
            .handle_error(|_| panic!("handler must not run"))
            .unwrap();
        assert_eq!(value, 17);
    }

    #[test]
    fn outcome_hands_errors_to_the_handler() {
        let outcome: Outcome<i32> =
            Outcome::new_error(ErrorResponse::new("No results found", 404));

        // Recover.
        let value = outcome.clone()
            .handle_error(|error| {
                assert_eq!(error.code(), 404);
                Ok(0)
            })
            .unwrap();
        assert_eq!(value, 0);

        // Escalate.
        let err = outcome
            .handle_error(|error| Err(Error::HttpStatus(error).into()))
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(),
                         Some(Error::HttpStatus(e)) if e.code() == 404));
    }

    #[test]
    fn outcome_from_ok_response() {
        let response = RawResponse::new(200, Some("info:1:0\n".into()));
        let outcome =
            Outcome::from_response(&response, parse::search_index).unwrap();
        let index = outcome.handle_error(|_| unreachable!()).unwrap();
        assert_eq!(index.version(), 1);
    }

    #[test]
    fn outcome_from_error_response() {
        let response =
            RawResponse::new(500, Some("internal server error".into()));
        let outcome =
            Outcome::from_response(&response, parse::search_index).unwrap();
        let err = outcome
            .handle_error(|error| {
                assert_eq!(error.code(), 500);
                assert_eq!(error.message(), "internal server error");
                Err(Error::HttpStatus(error).into())
            })
            .unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }

    #[test]
    fn parse_failure_is_not_an_error_outcome() {
        let response = RawResponse::new(200, Some("<html></html>".into()));
        assert!(Outcome::from_response(&response, parse::search_index)
                .is_err());
    }
}
