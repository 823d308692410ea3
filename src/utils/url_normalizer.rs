//! URL normalization and sanitization utilities.
//!
//! Ensures consistent URL representation so that the same target always
//! deduplicates to the same short code, and refuses targets that would point
//! redirects at internal networks.

use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed, got '{0}'")]
    UnsupportedScheme(String),

    #[error("Target host {0} is not publicly routable")]
    ForbiddenHost(String),

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Leading and trailing whitespace is trimmed
/// 2. **Protocol**: Only HTTP and HTTPS are allowed
/// 3. **Hostname**: Converted to lowercase
/// 4. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 5. **Fragments**: Removed (e.g., `#section`)
/// 6. **Query and path**: Preserved as-is, case-sensitive
///
/// Normalizing an already normalized URL returns it unchanged.
///
/// # Security
///
/// Rejects literal IP hosts that are loopback, private, link-local (unicast
/// or multicast) or unspecified, including IPv4-mapped IPv6 forms of those.
/// Hostnames are not resolved.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedScheme`] for non-HTTP(S) schemes.
/// Returns [`UrlNormalizationError::ForbiddenHost`] for internal IP targets.
///
/// # Examples
///
/// ```
/// use snaplink::utils::url_normalizer::normalize_url;
///
/// assert_eq!(
///     normalize_url("  https://Example.com/Path#frag ").unwrap(),
///     "https://example.com/Path"
/// );
/// assert!(normalize_url("http://127.0.0.1/admin").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url =
        Url::parse(input.trim()).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlNormalizationError::UnsupportedScheme(other.to_string())),
    }

    let lowered_host = match url.host() {
        None => {
            return Err(UrlNormalizationError::InvalidFormat("URL has no host".to_string()));
        }
        Some(Host::Ipv4(ip)) if is_forbidden_ipv4(ip) => {
            return Err(UrlNormalizationError::ForbiddenHost(ip.to_string()));
        }
        Some(Host::Ipv6(ip)) if is_forbidden_ipv6(ip) => {
            return Err(UrlNormalizationError::ForbiddenHost(ip.to_string()));
        }
        Some(Host::Domain(domain)) => Some(domain.to_ascii_lowercase()),
        Some(_) => None,
    };

    if let Some(host) = lowered_host {
        url.set_host(Some(&host)).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
        })?;
    }

    url.set_fragment(None);

    Ok(url.to_string())
}

fn is_forbidden_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    // 224.0.0.0/24 is link-local multicast
    let link_local_multicast = a == 224 && b == 0 && c == 0;

    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || link_local_multicast
}

fn is_forbidden_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_forbidden_ipv4(v4);
    }

    // ff02::/16 is link-local multicast
    let link_local_multicast = ip.segments()[0] & 0xff0f == 0xff02;

    ip.is_loopback()
        || ip.is_unique_local()
        || ip.is_unicast_link_local()
        || ip.is_unspecified()
        || link_local_multicast
}
