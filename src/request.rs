//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, Method, Uri, Version};

const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// An incoming HTTP request with its body fully buffered.
///
/// The server reads the whole body before the handler chain runs, so the
/// logging middleware can dump it and the handler can still parse it.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) version: Version,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) remote_addr: SocketAddr,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from an `http::Request` whose body is already in
    /// memory, as seen from the transport peer `remote_addr`.
    ///
    /// ```rust
    /// use bytes::Bytes;
    /// use tsulog::Request;
    ///
    /// let req = http::Request::post("/users")
    ///     .header("content-type", "application/json")
    ///     .body(Bytes::from_static(br#"{"name":"alice"}"#))
    ///     .unwrap();
    /// let req = Request::from_http(req, "10.0.0.7:51234".parse().unwrap());
    /// assert_eq!(req.path(), "/users");
    /// ```
    pub fn from_http(req: http::Request<Bytes>, remote_addr: SocketAddr) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
            remote_addr,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn version(&self) -> Version { self.version }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The URL path as received. May be empty for requests built in-process
    /// from an authority-only URI.
    pub fn path(&self) -> &str {
        self.uri.path_and_query().map_or("", |pq| pq.path())
    }

    /// The transport-level peer address, before any proxy headers.
    pub fn remote_addr(&self) -> SocketAddr { self.remote_addr }

    /// Header lookup; `None` when absent or not valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The client address as reported by the nearest proxy.
    ///
    /// Checks `X-Real-IP`, then `X-Forwarded-For`, then falls back to the IP
    /// of the transport peer. Empty header values are skipped.
    pub fn real_ip(&self) -> String {
        [X_REAL_IP, X_FORWARDED_FOR]
            .iter()
            .find_map(|name| {
                self.headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .filter(|v| !v.is_empty())
            })
            .map_or_else(|| self.remote_addr.ip().to_string(), str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)], peer: &str) -> Request {
        let mut builder = http::Request::get("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Request::from_http(builder.body(Bytes::new()).unwrap(), peer.parse().unwrap())
    }

    #[test]
    fn real_ip_prefers_x_real_ip() {
        let req = request(&[("x-real-ip", "1.2.3.4"), ("x-forwarded-for", "5.6.7.8")], "9.9.9.9:54321");
        assert_eq!(req.real_ip(), "1.2.3.4");
    }

    #[test]
    fn real_ip_falls_back_to_forwarded_for() {
        let req = request(&[("x-forwarded-for", "5.6.7.8")], "9.9.9.9:54321");
        assert_eq!(req.real_ip(), "5.6.7.8");
    }

    #[test]
    fn real_ip_falls_back_to_peer_address() {
        let req = request(&[], "9.9.9.9:54321");
        assert_eq!(req.real_ip(), "9.9.9.9");
    }

    #[test]
    fn real_ip_skips_empty_headers() {
        let req = request(&[("x-real-ip", ""), ("x-forwarded-for", "5.6.7.8")], "9.9.9.9:54321");
        assert_eq!(req.real_ip(), "5.6.7.8");

        let req = request(&[("x-real-ip", ""), ("x-forwarded-for", "")], "[::1]:8080");
        assert_eq!(req.real_ip(), "::1");
    }

    #[test]
    fn real_ip_matches_proxy_headers_in_any_case() {
        let req = request(&[("X-Forwarded-For", "5.6.7.8, 10.0.0.1")], "9.9.9.9:54321");
        assert_eq!(req.real_ip(), "5.6.7.8, 10.0.0.1");

        let req = request(&[("X-Real-IP", "1.2.3.4")], "9.9.9.9:54321");
        assert_eq!(req.real_ip(), "1.2.3.4");
    }

    #[test]
    fn path_of_authority_only_uri_is_empty() {
        let mut req = request(&[], "9.9.9.9:54321");
        req.uri = Uri::from_static("example.com:80");
        assert_eq!(req.path(), "");
    }
}
