//! URL canonicalization into `(hostname, rest)` verdict keys.
//!
//! The raw input is everything after the service mount point, still escaped
//! as received. Splitting works on the literal first `/` and first `?`
//! characters rather than on a parsed URL, so a `?` that appears before any
//! `/` always starts the query. Existing keys depend on this, so the scan must
//! not be replaced with standards-compliant URL parsing.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use serde::{Deserialize, Serialize};

/// Bytes left as-is in query keys and values: `A-Za-z0-9-_.~`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Canonical key identifying a verdict record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UrlKey {
    pub hostname: String,
    pub rest: String,
}

impl UrlKey {
    pub fn new(hostname: impl Into<String>, rest: impl Into<String>) -> Self {
        Self { hostname: hostname.into(), rest: rest.into() }
    }
}

/// Canonicalize a raw URL tail into its verdict key.
///
/// Normalization steps:
/// 1. Split on the first `/` and first `?` (first `?` wins if it comes before any `/`)
/// 2. Lowercase the hostname
/// 3. Decode the query, drop undecodable pairs, re-encode with sorted keys
/// 4. Join as `path?query`, always emitting the `?`
pub fn canonicalize(raw: &str) -> UrlKey {
    let (hostname, path, query) = match (raw.find('/'), raw.find('?')) {
        (Some(slash), Some(question)) if slash < question => {
            (&raw[..slash], &raw[slash + 1..question], &raw[question + 1..])
        }
        (_, Some(question)) => (&raw[..question], "", &raw[question + 1..]),
        (Some(slash), None) => (&raw[..slash], &raw[slash + 1..], ""),
        (None, None) => (raw, "", ""),
    };

    UrlKey { hostname: normalize_hostname(hostname), rest: normalize_rest(path, query) }
}

/// Lowercase the host. No port, trailing-dot or IDNA handling.
pub fn normalize_hostname(hostname: &str) -> String {
    hostname.to_lowercase()
}

/// Build the `rest` component. The `?` separator is emitted even when the
/// query is empty, so a bare path `p` becomes `p?` and a bare host becomes `?`.
pub fn normalize_rest(path: &str, query: &str) -> String {
    format!("{path}?{}", normalize_query(query))
}

/// Decode a form-encoded query and re-serialize it in canonical order.
///
/// Keys are sorted bytewise; repeated keys keep their values in original
/// order. Pairs containing `;` or a malformed percent escape are dropped.
pub fn normalize_query(query: &str) -> String {
    let mut params: BTreeMap<Vec<u8>, Vec<Vec<u8>>> = BTreeMap::new();

    for pair in query.split('&') {
        if pair.is_empty() || pair.contains(';') {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let (Some(key), Some(value)) = (unescape(key), unescape(value)) else {
            continue;
        };
        params.entry(key).or_default().push(value);
    }

    let mut out = String::with_capacity(query.len());
    for (key, values) in &params {
        for value in values {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&escape(key));
            out.push('=');
            out.push_str(&escape(value));
        }
    }
    out
}

/// Query-component encoding: space becomes `+`, everything outside
/// [`QUERY_COMPONENT`] is `%XX` with uppercase hex.
fn escape(bytes: &[u8]) -> String {
    // `%` itself encodes as `%25`, so `%20` can only come from a space.
    percent_encode(bytes, QUERY_COMPONENT).to_string().replace("%20", "+")
}

/// Strict form decoding: `+` is a space and every `%` must be followed by
/// two hex digits. Returns `None` on a malformed escape.
fn unescape(input: &str) -> Option<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16))?;
                let lo = bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16))?;
                out.push((hi * 16 + lo) as u8);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    Some(out)
}
