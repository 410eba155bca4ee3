use crate::errors::{ReplayError, Result};
use crate::request_config::RequestConfig;
use reqwest::blocking::{Body, Request};
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use std::io::Write;

/// Turns a parsed request into one the transport can send.
///
/// The query string is rebuilt from `params` only; `query` is not sent.
/// Content-Type is always set from `content_type`, replacing any header
/// of the same name.
pub fn build_request(conf: &RequestConfig) -> Result<Request> {
    let method = Method::from_bytes(conf.method.as_bytes())
        .map_err(|_| ReplayError::format("invalid request method", conf.method.as_str()))?;
    // `http:///x` would otherwise parse with `x` as its host
    if has_empty_host(&conf.url) {
        return Err(ReplayError::format("request URL has no host", conf.url.as_str()));
    }
    let mut url = Url::parse(&conf.url)
        .map_err(|e| ReplayError::format(format!("could not parse request URL ({})", e), conf.url.as_str()))?;
    if !conf.params.is_empty() {
        url.query_pairs_mut().clear().extend_pairs(conf.params.iter());
    }

    let mut request = Request::new(method, url);
    let headers = request.headers_mut();
    for (name, value) in &conf.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ReplayError::format("invalid header name", name.as_str()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ReplayError::format(format!("invalid value for header {}", name), value.as_str()))?;
        headers.insert(header_name, header_value);
    }
    let content_type = HeaderValue::from_str(&conf.content_type)
        .map_err(|_| ReplayError::format("invalid content type", conf.content_type.as_str()))?;
    headers.insert(CONTENT_TYPE, content_type);

    *request.body_mut() = Some(Body::from(conf.raw_body.clone().into_bytes()));
    Ok(request)
}

fn has_empty_host(url: &str) -> bool {
    match url.split_once("://") {
        Some((_, rest)) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}

/// Writes `request` back out in raw request file format.
pub fn write_raw_request<W: Write>(request: &Request, out: &mut W) -> std::io::Result<()> {
    let url = request.url();
    let query = match url.query() {
        Some(query) if !query.is_empty() => format!("?{}", query),
        _ => String::new(),
    };
    writeln!(out, "{} {}{} HTTP/1.1", request.method(), url.path(), query)?;

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    writeln!(out, "Host: {}", host)?;
    for (name, value) in request.headers() {
        if name.as_str().eq_ignore_ascii_case("host") {
            continue;
        }
        writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()))?;
    }

    if request.method() != Method::GET {
        writeln!(out)?;
        if let Some(body) = request.body().and_then(|body| body.as_bytes()) {
            out.write_all(body)?;
        }
    }
    write!(out, "\n\n")?;
    out.flush()
}
