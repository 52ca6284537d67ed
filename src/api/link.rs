//! `Link` header parsing (RFC 5988)

/// Return the target of the first `rel="next"` entry, if any.
///
/// Entries look like `<https://host/path?page=2>; rel="next"`. URLs are
/// delimited by angle brackets, so commas inside them do not split entries.
pub fn parse_link_next(header: &str) -> Option<String> {
    let mut rest = header;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let close = after_open.find('>')?;
        let url = &after_open[..close];
        let after_url = &after_open[close + 1..];

        let params_end = after_url.find('<').unwrap_or(after_url.len());
        let params = &after_url[..params_end];

        if params.split(';').any(is_next_relation) {
            return Some(url.to_string());
        }

        rest = &after_url[params_end..];
    }

    None
}

fn is_next_relation(param: &str) -> bool {
    let Some((name, value)) = param.trim().trim_end_matches(',').split_once('=') else {
        return false;
    };
    if !name.trim().eq_ignore_ascii_case("rel") {
        return false;
    }
    value
        .trim()
        .trim_matches('"')
        .split_whitespace()
        .any(|rel| rel == "next")
}
