//! Link-header pagination.

/// Pagination links extracted from GitHub's `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// URL of the next page (rel="next").
    pub next: Option<String>,
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/repositories/1/issues?state=all&page=2>; rel="next", <...&page=5>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        match (url, rel) {
            (Some(url), Some("next")) => info.next = Some(url.to_string()),
            (Some(url), Some("last")) => info.last_page = extract_page_from_url(url),
            _ => {}
        }
    }

    info
}

/// Extract the `page` query parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
