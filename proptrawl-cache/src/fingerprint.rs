//! Request fingerprinting.
//!
//! A fingerprint deterministically identifies one scrape request: the target
//! URL plus whatever filter parameters shaped the response. Parameters are
//! sorted by name before hashing so that argument order never produces a
//! second cache entry for the same request.

/// MD5 hex digest of a URL and its filter parameters.
pub fn fingerprint(url: &str, params: &[(&str, &str)]) -> String {
    let mut input = String::from(url);
    if !params.is_empty() {
        let mut sorted = params.to_vec();
        sorted.sort();
        for (name, value) in sorted {
            input.push('|');
            input.push_str(name);
            input.push('=');
            input.push_str(value);
        }
    }
    format!("{:x}", md5::compute(input.as_bytes()))
}
