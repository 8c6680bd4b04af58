use url::form_urlencoded;

/// Encodes a single path segment (index name, index key) the way form encoding does
pub fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

/// Turns a locator into an absolute address under `site`
///
/// Locators that already carry a scheme are returned unchanged; relative ones
/// (`/node/42`) are joined onto the site.
pub fn absolute_address(site: &str, locator: &str) -> String {
    if locator.contains("://") {
        return locator.to_string();
    }
    format!(
        "{}/{}",
        site.trim_end_matches('/'),
        locator.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("people"), "people");
        assert_eq!(encode_segment("full name"), "full+name");
        assert_eq!(encode_segment("a/b&c"), "a%2Fb%26c");
    }

    #[test]
    fn test_absolute_address() {
        let site = "http://localhost:7474/db/data";
        assert_eq!(
            absolute_address(site, "/node/42"),
            "http://localhost:7474/db/data/node/42"
        );
        assert_eq!(
            absolute_address("http://localhost:7474/db/data/", "node/42"),
            "http://localhost:7474/db/data/node/42"
        );
        assert_eq!(
            absolute_address(site, "http://other:7474/db/data/node/1"),
            "http://other:7474/db/data/node/1"
        );
    }
}
