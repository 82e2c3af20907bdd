//! Synthetic URL corpus for seeding and benchmarks.
//!
//! Hostnames are derived from integer seeds, and every hostname is expanded
//! into five URL variants that between them hit each branch of
//! [`canonicalize`](crate::canon::canonicalize).

use crate::canon::{UrlKey, canonicalize};

/// Symbols used for hostname digits, least-significant digit first.
pub const ALPHABET: &[u8; 37] = b"abcdefghijklmnopqrstuvwxyz1234567890-";

/// URL tails generated for every hostname: bare path, query only, path with
/// query, nested path, nested path with several parameters.
pub const VARIANTS: [&str; 5] = ["path", "?a=b", "path?a=b", "complex/path", "complex/path?complex=yes&query=yes"];

/// A generated hostname paired with one of the raw [`VARIANTS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub hostname: String,
    pub rest: &'static str,
}

impl CorpusEntry {
    /// The key a lookup of `{hostname}/{rest}` resolves to.
    pub fn canonical(&self) -> UrlKey {
        canonicalize(&format!("{}/{}", self.hostname, self.rest))
    }
}

/// Encode `seed` as `www.site<digits>.com`.
///
/// Digits are base-37 over [`ALPHABET`] and appended least-significant
/// first, so seed 1 is `www.siteb.com` and seed 37 is `www.siteab.com`.
/// Seed 0 has no digits.
pub fn generate_hostname(mut seed: u64) -> String {
    let base = ALPHABET.len() as u64;
    let mut name = String::from("www.site");

    while seed > 0 {
        name.push(ALPHABET[(seed % base) as usize] as char);
        seed /= base;
    }

    name.push_str(".com");
    name
}

/// Generate `length / 5` hostnames starting at seed `start_at`, each with all
/// five [`VARIANTS`] in order.
///
/// Only whole groups are produced; a `length` that is not a multiple of five
/// is rounded down.
pub fn generate_urls(start_at: u64, length: usize) -> Vec<CorpusEntry> {
    let groups = length / VARIANTS.len();
    let mut data = Vec::with_capacity(groups * VARIANTS.len());

    for i in 0..groups as u64 {
        let hostname = generate_hostname(start_at + i);
        data.extend(VARIANTS.iter().map(|&rest| CorpusEntry { hostname: hostname.clone(), rest }));
    }

    data
}
