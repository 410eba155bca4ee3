use crate::errors::{ReplayError, Result};
use log::info;
use reqwest::blocking::{Client, Request, Response};
use reqwest::redirect::Policy;
use reqwest::Proxy;
use std::io::Write;

/// Client state shared by every request of one invocation: certificates
/// are not verified, cookies are kept and redirects are never followed.
pub struct TransportSession {
    client: Client,
}

impl TransportSession {
    pub fn new(proxy: Option<&str>) -> Result<TransportSession> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .redirect(Policy::none());
        if let Some(proxy) = proxy {
            let proxy = Proxy::all(proxy).map_err(|e| ReplayError::format(format!("invalid proxy URL ({})", e), proxy))?;
            builder = builder.proxy(proxy);
        }
        Ok(TransportSession { client: builder.build()? })
    }

    pub fn execute(&self, request: Request) -> Result<Response> {
        info!("{} {}", request.method(), request.url());
        let response = self.client.execute(request)?;
        info!("{} {}", response.status(), response.url());
        Ok(response)
    }
}

/// `200 OK`
pub fn status_line(response: &Response) -> String {
    let status = response.status();
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_str(), reason),
        None => status.as_str().to_string(),
    }
}

pub fn print_status<W: Write>(response: &Response, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", status_line(response))
}

/// Writes the version, status, every header and the body.
pub fn dump_response<W: Write>(response: Response, out: &mut W) -> Result<()> {
    let io_error = |e: std::io::Error| ReplayError::io("could not write response", e);
    writeln!(out, "{:?} {}", response.version(), status_line(&response)).map_err(io_error)?;
    for name in response.headers().keys() {
        let values = response
            .headers()
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<String>>()
            .join("; ");
        writeln!(out, "{}: {}", name, values).map_err(io_error)?;
    }
    writeln!(out).map_err(io_error)?;
    let body = response.text()?;
    writeln!(out, "{}", body).map_err(io_error)?;
    Ok(())
}
