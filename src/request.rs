//! Lookup requests and their wire encoding.
//!
//! A lookup request is carried entirely in HTTP query parameters.
//! [`SearchRequest`] and [`GetRequest`] are the plain values callers
//! hand to [`KeyServer::search`] and [`KeyServer::get`]; [`Request`]
//! folds both into one type and knows the parameter set for each
//! operation.
//!
//! [`KeyServer::search`]: crate::KeyServer::search
//! [`KeyServer::get`]: crate::KeyServer::get

use std::collections::BTreeMap;

/// A search over the key server's index.
///
/// The query may be a free-form user id fragment, an email address,
/// or a key id prefixed with `0x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    /// The search term.
    pub query: String,

    /// Restricts the search to exact matches.
    pub exact: bool,
}

impl SearchRequest {
    /// Returns a search request with exact matching disabled.
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            exact: false,
        }
    }
}

impl From<&str> for SearchRequest {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for SearchRequest {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

/// Retrieval of a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetRequest {
    /// The key to retrieve: an email address, or a key id or
    /// fingerprint prefixed with `0x`.
    pub key_id: String,
}

impl GetRequest {
    /// Returns a get request for the given key.
    pub fn new(key_id: impl Into<String>) -> Self {
        GetRequest {
            key_id: key_id.into(),
        }
    }
}

impl From<&str> for GetRequest {
    fn from(key_id: &str) -> Self {
        Self::new(key_id)
    }
}

impl From<String> for GetRequest {
    fn from(key_id: String) -> Self {
        Self::new(key_id)
    }
}

/// A request to the lookup endpoint, one variant per operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// `op=index`: search the server's index.
    Search(SearchRequest),

    /// `op=get`: retrieve a key.
    Get(GetRequest),
}

impl From<SearchRequest> for Request {
    fn from(request: SearchRequest) -> Self {
        Request::Search(request)
    }
}

impl From<GetRequest> for Request {
    fn from(request: GetRequest) -> Self {
        Request::Get(request)
    }
}

impl Request {
    /// Returns the query parameters encoding this request.
    ///
    /// The returned map has unique keys and iterates in a fixed
    /// order, so the same request always produces the same query
    /// string.  `options=mr` is always present: it is set last, after
    /// the per-operation parameters, and overrides anything set
    /// before it.
    pub fn parameters(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();

        match self {
            Request::Search(search) => {
                set_parameter(&mut params, "op", Some("index"));
                set_parameter(&mut params, "search", Some(&search.query));
                // Presence encodes the flag: "exact=on" when enabled,
                // no "exact" parameter at all otherwise.
                set_parameter(&mut params, "exact",
                              if search.exact { Some("on") } else { None });
            },
            Request::Get(get) => {
                set_parameter(&mut params, "op", Some("get"));
                set_parameter(&mut params, "search", Some(&get.key_id));
            },
        }

        set_parameter(&mut params, "options", Some("mr"));

        params
    }
}

/// Sets `name` to `value` in the parameter map.
///
/// `None` and the empty string retract the parameter: the key is
/// removed instead of being sent empty.
fn set_parameter(params: &mut BTreeMap<String, String>,
                 name: &str, value: Option<&str>)
{
    match value {
        Some(value) if !value.is_empty() => {
            params.insert(name.into(), value.into());
        },
        _ => {
            params.remove(name);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_parameters() {
        let params =
            Request::from(SearchRequest::new("alice@example.org"))
            .parameters();

        assert_eq!(params.len(), 3);
        assert_eq!(params["op"], "index");
        assert_eq!(params["options"], "mr");
        assert_eq!(params["search"], "alice@example.org");
        assert!(!params.contains_key("exact"));
    }

    #[test]
    fn exact_is_present_only_when_enabled() {
        let request = SearchRequest {
            exact: true,
            ..SearchRequest::new("alice@example.org")
        };
        let params = Request::from(request).parameters();
        assert_eq!(params["exact"], "on");

        let params =
            Request::from(SearchRequest::new("alice@example.org"))
            .parameters();
        assert!(!params.contains_key("exact"));
    }

    #[test]
    fn get_parameters() {
        let params =
            Request::from(GetRequest::new("0xD03F6F865226FE8B"))
            .parameters();

        assert_eq!(params.len(), 3);
        assert_eq!(params["op"], "get");
        assert_eq!(params["options"], "mr");
        assert_eq!(params["search"], "0xD03F6F865226FE8B");
    }

    #[test]
    fn empty_values_are_retracted() {
        let params = Request::from(SearchRequest::new("")).parameters();
        assert!(!params.contains_key("search"));

        let mut params = BTreeMap::new();
        set_parameter(&mut params, "search", Some("alice"));
        set_parameter(&mut params, "search", None);
        assert!(params.is_empty());

        set_parameter(&mut params, "search", Some("alice"));
        set_parameter(&mut params, "search", Some(""));
        assert!(params.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let mut params = BTreeMap::new();
        set_parameter(&mut params, "options", Some("nm"));
        set_parameter(&mut params, "options", Some("mr"));
        assert_eq!(params.len(), 1);
        assert_eq!(params["options"], "mr");
    }

    #[test]
    fn deterministic_order() {
        let params =
            Request::from(SearchRequest::new("alice@example.org"))
            .parameters();
        let keys: Vec<&str> =
            params.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["op", "options", "search"]);
    }
}
