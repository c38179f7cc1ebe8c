//! Parsing machine-readable lookup responses.
//!
//! With `options=mr` the server answers in the colon-delimited line
//! format of the HKP draft:
//!
//! ```text
//! info:<version>:<count>
//! pub:<keyid>:<algo>:<keylen>:<creationdate>:<expirationdate>:<flags>
//! uid:<escaped uid string>:<creationdate>:<expirationdate>:<flags>
//! ```
//!
//! Everything in this module is a pure function from response text to
//! a decoded value or a parse error.  No I/O happens here; the
//! transport lives in [`KeyServer`](crate::KeyServer).

use chrono::{DateTime, Local, TimeZone};

use crate::Error;
use crate::Result;
use crate::response::{Entry, PgpPublicKey, Pub, SearchIndexResponse, Uid};

/// Splits a machine-readable line into its colon-delimited fields.
///
/// Empty fields are preserved wherever they occur, including at the
/// start and end of the line: a line with `n` colons always yields
/// exactly `n + 1` fields.  The record parsers index fields by
/// position and rely on that count.
pub fn split_line(line: &str) -> Vec<&str> {
    line.split(':').collect()
}

/// Parses the body of an `op=index` response.
///
/// The body must start with the `info` header line; `pub`/`uid`
/// record pairs follow, one entry per pair.  A blank line, which
/// includes a line holding a lone carriage return, ends the records,
/// as does the end of the body.
pub fn search_index(body: Option<&str>) -> Result<SearchIndexResponse> {
    let body = body.ok_or_else(
        || Error::MalformedResponse("no response body".into()))?;

    // split('\n') yields at least one line, even for an empty body.
    let lines: Vec<&str> = body.split('\n').collect();
    let (version, count) = header_line(lines[0])?;

    let mut entries = Vec::new();
    let mut index = 1;
    while index < lines.len() {
        if lines[index].trim().is_empty() {
            break;
        }

        let uid = lines.get(index + 1).ok_or_else(
            || Error::MalformedResponse(format!(
                "pub line {:?} has no matching uid line", lines[index])))?;
        entries.push(Entry::new(pub_line(lines[index])?, uid_line(uid)?));

        index += 2;
    }

    Ok(SearchIndexResponse::new(version, count, entries))
}

/// Parses the body of an `op=get` response.
///
/// A missing or blank body means the server has no matching key;
/// that is an absent result, not an error.  Anything else is taken
/// verbatim as the armored key block.
pub fn public_key(body: Option<&str>) -> Result<Option<PgpPublicKey>> {
    match body {
        None => Ok(None),
        Some(body) if body.trim().is_empty() => Ok(None),
        Some(body) => Ok(Some(PgpPublicKey::new(body.into()))),
    }
}

/// `info:<version>:<count>`
fn header_line(line: &str) -> Result<(i32, i32)> {
    let fields = split_line(line);
    if fields.len() != 3 {
        return Err(Error::MalformedResponse(format!(
            "expected 3 fields on info line: {:?}", line)).into());
    }

    Ok((integer(fields[1], line)?, integer(fields[2], line)?))
}

/// `pub:<keyid>:<algo>:<keylen>:<creationdate>:<expirationdate>:<flags>`
fn pub_line(line: &str) -> Result<Pub> {
    let fields = split_line(line);
    if fields.len() != 7 {
        return Err(Error::MalformedResponse(format!(
            "expected 7 fields on pub line: {:?}", line)).into());
    }

    Ok(Pub::new(fields[1].into(),
                integer(fields[2], line)?,
                integer(fields[3], line)?,
                timestamp(fields[4]),
                timestamp(fields[5]),
                fields[6].into()))
}

/// `uid:<escaped uid string>:<creationdate>:<expirationdate>:<flags>`
fn uid_line(line: &str) -> Result<Uid> {
    let fields = split_line(line);
    if fields.len() != 5 {
        return Err(Error::MalformedResponse(format!(
            "expected 5 fields on uid line: {:?}", line)).into());
    }

    Ok(Uid::new(fields[1].into(),
                timestamp(fields[2]),
                timestamp(fields[3]),
                fields[4].into()))
}

/// Parses a mandatory integer field.
///
/// Unlike the date fields, these get no tolerance: a malformed value
/// poisons the whole response.
fn integer(field: &str, line: &str) -> Result<i32> {
    field.parse().map_err(|_| Error::MalformedResponse(format!(
        "malformed integer {:?} on line: {:?}", field, line)).into())
}

/// Converts an epoch seconds field to a local timestamp.
///
/// The protocol leaves date fields empty when the date is unknown,
/// and servers have been seen emitting garbage in them; either way
/// the record is still useful, so this never fails.
fn timestamp(field: &str) -> Option<DateTime<Local>> {
    field.parse::<i64>().ok()
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
}
