//! Destination URL validation.
//!
//! Rejects anything that should not become a redirect target: non-HTTP(S)
//! schemes, oversized input, and hosts pointing back into local or private
//! networks.

use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Maximum accepted destination length, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur while validating a destination URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be blank")]
    Blank,

    #[error("URL must not exceed {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must not contain control characters")]
    ControlCharacter,

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL points to a local or private network address")]
    PrivateHost,
}

/// Validates a destination URL and returns it trimmed.
///
/// # Rules
///
/// 1. Non-blank, at most [`MAX_URL_LENGTH`] bytes, no control characters
/// 2. Parses as an absolute URL with scheme `http` or `https`
/// 3. Host is not `localhost`, a loopback address, or an RFC 1918 range
///
/// The URL itself is stored as given (after trimming); no normalization is applied.
/// `Url::parse` silently drops tabs and newlines, so they are rejected up front:
/// the stored string must be usable verbatim as a `Location` header.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule that is violated.
pub fn validate_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Blank);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host() {
        None => return Err(UrlValidationError::MissingHost),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            if domain == "localhost" || domain.ends_with(".localhost") {
                return Err(UrlValidationError::PrivateHost);
            }
        }
        Some(Host::Ipv4(ip)) => {
            if is_private_v4(ip) {
                return Err(UrlValidationError::PrivateHost);
            }
        }
        Some(Host::Ipv6(ip)) => {
            if is_private_v6(ip) {
                return Err(UrlValidationError::PrivateHost);
            }
        }
    }

    Ok(trimmed.to_string())
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_unspecified() || ip.is_link_local()
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }
    ip.to_ipv4_mapped().is_some_and(is_private_v4)
}
