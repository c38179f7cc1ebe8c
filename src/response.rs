//! Response values decoded from the key server.
//!
//! [`RawResponse`] is what the transport hands over: a status code
//! and a body.  The other types here are what the parsing routines
//! make of that body: the index listing for a search, the armored
//! key block for a get, or the server's error message.

use std::fmt;

use chrono::{DateTime, Local};

/// An HTTP response, reduced to the parts the lookup protocol cares
/// about: the status code and the body text.
///
/// This is the seam between the transport and the parsing routines:
/// [`KeyServer`] produces one per request, and anything else that can
/// produce one can use the same decoding path via
/// [`Outcome::from_response`].
///
/// [`KeyServer`]: crate::KeyServer
/// [`Outcome::from_response`]: crate::Outcome::from_response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    body: Option<String>,
}

impl RawResponse {
    /// Returns a raw response with the given status code and body.
    pub fn new(status: u16, body: Option<String>) -> Self {
        RawResponse { status, body }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The body, if the server sent one.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// A decoded `op=index` response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchIndexResponse {
    version: i32,
    count: i32,
    entries: Vec<Entry>,
}

impl SearchIndexResponse {
    pub(crate) fn new(version: i32, count: i32, entries: Vec<Entry>)
                      -> Self
    {
        SearchIndexResponse { version, count, entries }
    }

    /// The protocol version from the `info` line.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// The number of matching keys the server claims.
    ///
    /// This is taken from the `info` line as the server sent it; it
    /// is not guaranteed to equal `entries().len()`.
    pub fn count(&self) -> i32 {
        self.count
    }

    /// The decoded entries, in server order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// One search result: a `pub` record and the `uid` record following
/// it.
///
/// The records come in pairs; a `pub` without a `uid` is a malformed
/// response, never a partial entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub_: Pub,
    uid: Uid,
}

impl Entry {
    pub(crate) fn new(pub_: Pub, uid: Uid) -> Self {
        Entry { pub_, uid }
    }

    /// The `pub` record summarizing the key.
    pub fn pub_(&self) -> &Pub {
        &self.pub_
    }

    /// The `uid` record naming the key holder.
    pub fn uid(&self) -> &Uid {
        &self.uid
    }
}

/// Summary of one public key, from a `pub` index record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pub {
    key_id: String,
    algo: i32,
    key_len: i32,
    creation_date: Option<DateTime<Local>>,
    expiration_date: Option<DateTime<Local>>,
    flags: String,
}

impl Pub {
    pub(crate) fn new(key_id: String, algo: i32, key_len: i32,
                      creation_date: Option<DateTime<Local>>,
                      expiration_date: Option<DateTime<Local>>,
                      flags: String)
                      -> Self
    {
        Pub { key_id, algo, key_len, creation_date, expiration_date, flags }
    }

    /// The key id, exactly as the server printed it.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The public key algorithm id, using the RFC 4880 values.
    pub fn algo(&self) -> i32 {
        self.algo
    }

    /// The key length in bits.
    pub fn key_len(&self) -> i32 {
        self.key_len
    }

    /// When the key was created, if the server said.
    pub fn creation_date(&self) -> Option<DateTime<Local>> {
        self.creation_date
    }

    /// When the key expires, if it does.
    pub fn expiration_date(&self) -> Option<DateTime<Local>> {
        self.expiration_date
    }

    /// The key's flags: `r` for revoked, `d` for disabled, `e` for
    /// expired.  Usually empty.
    pub fn flags(&self) -> &str {
        &self.flags
    }
}

/// A user id, from a `uid` index record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uid {
    uid: String,
    creation_date: Option<DateTime<Local>>,
    expiration_date: Option<DateTime<Local>>,
    flags: String,
}

impl Uid {
    pub(crate) fn new(uid: String,
                      creation_date: Option<DateTime<Local>>,
                      expiration_date: Option<DateTime<Local>>,
                      flags: String)
                      -> Self
    {
        Uid { uid, creation_date, expiration_date, flags }
    }

    /// The user id string, typically `Name <email>`.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// When the user id was bound to the key, if the server said.
    pub fn creation_date(&self) -> Option<DateTime<Local>> {
        self.creation_date
    }

    /// When the binding expires, if it does.
    pub fn expiration_date(&self) -> Option<DateTime<Local>> {
        self.expiration_date
    }

    /// The user id's flags.  Usually empty.
    pub fn flags(&self) -> &str {
        &self.flags
    }
}

/// An ASCII armored public key block, as returned by `op=get`.
///
/// The armor is opaque to this crate; hand it to an OpenPGP
/// implementation to do anything useful with it.  Never empty: an
/// empty body decodes to no key at all, not to an empty block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PgpPublicKey {
    public_key: String,
}

impl PgpPublicKey {
    pub(crate) fn new(public_key: String) -> Self {
        debug_assert!(!public_key.trim().is_empty());
        PgpPublicKey { public_key }
    }

    /// The armor block, verbatim.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

impl fmt::Display for PgpPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.public_key)
    }
}

/// An error response from the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    message: String,
    code: u16,
}

impl ErrorResponse {
    /// Returns an error response with the given message and status
    /// code.
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        ErrorResponse {
            message: message.into(),
            code,
        }
    }

    /// The body the server sent, usually a plain text message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The HTTP status code.
    pub fn code(&self) -> u16 {
        self.code
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}: {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_response() {
        let response = RawResponse::new(200, Some("info:1:0\n".into()));
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), Some("info:1:0\n"));

        let response = RawResponse::new(204, None);
        assert_eq!(response.body(), None);
    }

    #[test]
    fn error_response_display() {
        let error = ErrorResponse::new("No results found", 404);
        assert_eq!(error.to_string(), "status 404: No results found");
    }

    #[test]
    fn key_displays_verbatim() {
        let armor = "-----BEGIN PGP PUBLIC KEY BLOCK-----\n...\n";
        let key = PgpPublicKey::new(armor.into());
        assert_eq!(key.to_string(), armor);
        assert_eq!(key.public_key(), armor);
    }
}
