//! HTTP/1.1 wire dump of a request, for debug logs.
//!
//! The output looks like what went over the socket:
//!
//! ```text
//! POST /users?dry_run=1 HTTP/1.1\r\n
//! Host: api.example.com\r\n
//! Content-Length: 16\r\n
//! Content-Type: application/json\r\n
//! \r\n
//! {"name":"alice"}
//! ```
//!
//! `Host` comes first, the remaining headers follow sorted by name, and
//! repeated headers keep their order. Nothing here is ever parsed back.

use std::fmt::Write;

use http::Version;

use crate::request::Request;

/// Renders `req` as an HTTP/1.1-style text block, optionally with its body.
///
/// Never fails: non-UTF-8 header values and bodies are rendered lossily.
pub fn dump_request(req: &Request, with_body: bool) -> String {
    let mut out = String::with_capacity(256 + if with_body { req.body().len() } else { 0 });

    let target = req.uri().path_and_query().map_or("/", |pq| pq.as_str());
    let _ = write!(out, "{} {} {}\r\n", req.method(), target, version_str(req.version()));

    let host = req.headers().get(http::header::HOST)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .or_else(|| req.uri().authority().map(|a| a.to_string()));
    if let Some(host) = host {
        let _ = write!(out, "Host: {host}\r\n");
    }

    let mut names: Vec<_> = req.headers().keys()
        .filter(|name| **name != http::header::HOST)
        .collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    for name in names {
        let canonical = canonical_name(name.as_str());
        for value in req.headers().get_all(name) {
            let _ = write!(out, "{canonical}: {}\r\n", String::from_utf8_lossy(value.as_bytes()));
        }
    }
    out.push_str("\r\n");

    if with_body {
        out.push_str(&String::from_utf8_lossy(req.body()));
    }
    out
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2  => "HTTP/2.0",
        Version::HTTP_3  => "HTTP/3.0",
        _                => "HTTP/1.1",
    }
}

/// `x-forwarded-for` → `X-Forwarded-For`.
fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        upper = c == '-';
    }
    out
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn request(method: &str, uri: &str, headers: &[(&str, &str)], body: &'static [u8]) -> Request {
        let mut builder = http::Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Request::from_http(
            builder.body(Bytes::from_static(body)).unwrap(),
            "127.0.0.1:40000".parse().unwrap(),
        )
    }

    #[test]
    fn dumps_request_line_headers_and_body() {
        let req = request(
            "POST",
            "/users?dry_run=1",
            &[("content-type", "application/json"), ("host", "api.example.com"), ("accept", "*/*")],
            br#"{"name":"alice"}"#,
        );

        assert_eq!(
            dump_request(&req, true),
            "POST /users?dry_run=1 HTTP/1.1\r\n\
             Host: api.example.com\r\n\
             Accept: */*\r\n\
             Content-Type: application/json\r\n\
             \r\n\
             {\"name\":\"alice\"}"
        );
    }

    #[test]
    fn omits_body_when_asked() {
        let req = request("PUT", "/items/1", &[], b"secret");
        assert_eq!(dump_request(&req, false), "PUT /items/1 HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn repeated_headers_are_all_dumped() {
        let req = request("GET", "/", &[("x-tag", "a"), ("x-tag", "b")], b"");
        assert_eq!(dump_request(&req, true), "GET / HTTP/1.1\r\nX-Tag: a\r\nX-Tag: b\r\n\r\n");
    }

    #[test]
    fn invalid_utf8_body_is_rendered_lossily() {
        let req = request("POST", "/upload", &[], b"\xff\xfeok");
        assert!(dump_request(&req, true).ends_with("\r\n\r\n\u{fffd}\u{fffd}ok"));
    }

    #[test]
    fn canonicalizes_header_names() {
        assert_eq!(canonical_name("x-forwarded-for"), "X-Forwarded-For");
        assert_eq!(canonical_name("etag"), "Etag");
    }
}
