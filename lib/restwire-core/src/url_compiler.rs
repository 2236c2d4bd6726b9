//! URL compilation: base URL + resource path + query + placeholder substitution.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use crate::param::{PathSegmentParam, QueryParam};
use crate::Result;

/// Characters escaped by URL serialization inside a path, used to find
/// placeholder tokens after the URL has been serialized.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Build the final URL string.
///
/// 1. An absolute `resource` replaces `base`; otherwise it is path-joined
///    onto the base path. Without a base, `resource` must be absolute.
/// 2. `queries` are appended to the existing query in order.
/// 3. `segments` are substituted in a single pass over the whole string.
pub(crate) fn compile_url(
    base: Option<&Url>,
    resource: &str,
    queries: &[QueryParam],
    segments: &[PathSegmentParam],
) -> Result<String> {
    let mut url = match base {
        Some(base) if !is_absolute(resource) => {
            let mut url = base.clone();
            let path = join_path(base.path(), resource);
            url.set_path(&path);
            url
        }
        _ => Url::parse(resource)?,
    };

    if !queries.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for query in queries {
            pairs.append_pair(&query.name, &query.value);
        }
    }

    Ok(substitute_segments(url.as_str(), segments))
}

/// Whether a resource carries its own scheme and authority.
fn is_absolute(resource: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        resource
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Join two URL paths, collapsing duplicate separators and resolving `.` and
/// `..`. The result is always rooted.
fn join_path(base: &str, resource: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(resource.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            segment => stack.push(segment),
        }
    }
    format!("/{}", stack.join("/"))
}

/// Replace every placeholder token in one left-to-right pass.
///
/// At a given position the longest matching token wins, equal lengths go to
/// the earliest segment. Inserted values are never scanned again, so a value
/// that looks like another token is kept verbatim.
fn substitute_segments(url: &str, segments: &[PathSegmentParam]) -> String {
    if segments.is_empty() {
        return url.to_string();
    }

    let mut patterns: Vec<(String, &str)> = Vec::with_capacity(segments.len() * 2);
    for segment in segments {
        let token = segment.token();
        if token.is_empty() {
            continue;
        }
        let encoded = utf8_percent_encode(&token, PATH_ENCODE_SET).to_string();
        if encoded != token {
            patterns.push((encoded, segment.value.as_str()));
        }
        patterns.push((token, segment.value.as_str()));
    }

    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(c) = rest.chars().next() {
        let best = patterns
            .iter()
            .filter(|(token, _)| rest.starts_with(token.as_str()))
            .fold(None::<&(String, &str)>, |best, candidate| match best {
                Some(current) if current.0.len() >= candidate.0.len() => Some(current),
                _ => Some(candidate),
            });

        match best {
            Some((token, value)) => {
                out.push_str(value);
                rest = rest.get(token.len()..).unwrap_or_default();
            }
            None => {
                out.push(c);
                rest = rest.get(c.len_utf8()..).unwrap_or_default();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).expect("valid base")
    }

    fn q(name: &str, value: &str) -> QueryParam {
        QueryParam::new(name, value)
    }

    fn seg(name: &str, value: &str) -> PathSegmentParam {
        PathSegmentParam::new(name, value)
    }

    #[test]
    fn joins_resource_onto_base_path() {
        let url = compile_url(Some(&base("https://api.example.com/v1/")), "/users", &[], &[])
            .expect("url");
        assert_eq!(url, "https://api.example.com/v1/users");
    }

    #[test]
    fn join_collapses_separators_and_dots() {
        assert_eq!(join_path("/v1//", "//users/./me"), "/v1/users/me");
        assert_eq!(join_path("/v1/beta", "../users"), "/v1/users");
        assert_eq!(join_path("/", ""), "/");
        assert_eq!(join_path("/v1", "users/"), "/v1/users");
    }

    #[test]
    fn absolute_resource_replaces_base() {
        let url = compile_url(
            Some(&base("https://api.example.com/v1")),
            "HTTPS://other.example.org/x",
            &[],
            &[],
        )
        .expect("url");
        assert_eq!(url, "https://other.example.org/x");
    }

    #[test]
    fn resource_without_base_must_be_absolute() {
        let url = compile_url(None, "http://localhost:8080/ping", &[], &[]).expect("url");
        assert_eq!(url, "http://localhost:8080/ping");

        let err = compile_url(None, "/users", &[], &[]).expect_err("relative");
        assert!(matches!(err, crate::Error::InvalidUrl(_)));
    }

    #[test]
    fn base_query_is_kept() {
        let url = compile_url(
            Some(&base("https://api.example.com/?token=abc")),
            "search",
            &[q("q", "rust")],
            &[],
        )
        .expect("url");
        assert_eq!(url, "https://api.example.com/search?token=abc&q=rust");
    }

    #[test]
    fn query_order_and_duplicates_preserved() {
        let url = compile_url(
            Some(&base("https://api.example.com")),
            "/items",
            &[q("a", "1"), q("b", "2"), q("a", "3")],
            &[],
        )
        .expect("url");
        assert_eq!(url, "https://api.example.com/items?a=1&b=2&a=3");
    }

    #[test]
    fn query_values_are_encoded() {
        let url = compile_url(
            Some(&base("https://api.example.com")),
            "/search",
            &[q("q", "a b&c")],
            &[],
        )
        .expect("url");
        assert_eq!(url, "https://api.example.com/search?q=a+b%26c");
    }

    #[test]
    fn no_queries_no_question_mark() {
        let url = compile_url(Some(&base("https://api.example.com")), "/x", &[], &[])
            .expect("url");
        assert!(!url.contains('?'));
    }

    #[test]
    fn substitutes_segments() {
        let url = compile_url(
            Some(&base("https://api.example.com")),
            "/users/:id/posts/:id2",
            &[],
            &[seg("id", "42"), seg("id2", "7")],
        )
        .expect("url");
        assert_eq!(url, "https://api.example.com/users/42/posts/7");
    }

    #[test]
    fn substitution_does_not_cascade() {
        let url = substitute_segments("/a/:x/b/:y", &[seg("x", ":y"), seg("y", "1")]);
        assert_eq!(url, "/a/:y/b/1");
    }

    #[test]
    fn custom_format_survives_serialization() {
        let url = compile_url(
            Some(&base("https://api.example.com")),
            "/repos/{owner}/{repo}",
            &[],
            &[
                PathSegmentParam::with_format("owner", "rust-lang", "{%s}"),
                PathSegmentParam::with_format("repo", "rust", "{%s}"),
            ],
        )
        .expect("url");
        assert_eq!(url, "https://api.example.com/repos/rust-lang/rust");
    }

    #[test]
    fn unknown_placeholder_left_intact() {
        let url = substitute_segments("/users/:id", &[seg("other", "1")]);
        assert_eq!(url, "/users/:id");
    }
}
