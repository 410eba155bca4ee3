use crate::body_decoder::{decode_body, parse_pairs};
use crate::errors::{ReplayError, Result};
use crate::request_config::{RequestConfig, Scheme};
use crate::substitution::Substitutions;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const HOST: &str = "Host";

// Tokens of the request line, e.g. `POST /login HTTP/1.1`
struct RequestLine {
    method: String,
    target: String,
}

fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

fn parse_request_line(line: &str) -> Result<RequestLine> {
    let parts: Vec<&str> = trim_line_ending(line).split(' ').collect();
    if parts.len() < 3 {
        return Err(ReplayError::format("malformed request supplied", trim_line_ending(line)));
    }
    Ok(RequestLine {
        method: parts[0].to_string(),
        target: parts[1].to_string(),
    })
}

fn read_headers<R: BufRead>(reader: &mut R, subs: &Substitutions, conf: &mut RequestConfig) -> Result<()> {
    let mut content_type_seen = false;
    loop {
        let mut raw = String::new();
        let read = reader
            .read_line(&mut raw)
            .map_err(|e| ReplayError::io("could not read request headers", e))?;
        let line = subs.apply(&raw);
        let line = line.trim();
        if read == 0 || line.is_empty() {
            return Ok(());
        }

        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => {
                debug!("skipping header line without ':': {:?}", line);
                continue;
            }
        };
        if name.eq_ignore_ascii_case("content-length") {
            debug!("dropping {}: {}", name, value);
            continue;
        }
        if name.eq_ignore_ascii_case("content-type") && !content_type_seen {
            conf.content_type = value.to_string();
            content_type_seen = true;
        }
        conf.headers.insert(name.to_string(), value.to_string());
    }
}

// Authority of an absolute target as written, without userinfo.
// `Url::port` hides a spelled-out default port, so `http://h:80/` keeps `h:80`.
fn host_of(target: &str) -> String {
    let rest = target.split_once("://").map(|(_, rest)| rest).unwrap_or(target);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    match authority.rsplit_once('@') {
        Some((_, host)) => host.to_string(),
        None => authority.to_string(),
    }
}

fn resolve_url(target: &str, conf: &mut RequestConfig) -> Result<()> {
    let full_url = if target.starts_with("http") {
        url::Url::parse(target).map_err(|e| ReplayError::format(format!("could not parse request URL ({})", e), target))?;
        let host = host_of(target);
        debug!("using host {:?} from absolute request URL", host);
        conf.headers.retain(|name, _| !name.eq_ignore_ascii_case(HOST));
        conf.headers.insert(HOST.to_string(), host);
        target.to_string()
    } else {
        let host = match conf.headers.get(HOST) {
            Some(host) => host.as_str(),
            None => {
                warn!("no Host header for request target {:?}", target);
                ""
            }
        };
        format!("{}://{}{}", conf.scheme, host, target)
    };

    match full_url.split_once('?') {
        Some((base, query)) => {
            conf.url = base.to_string();
            conf.query = parse_pairs(query);
        }
        None => conf.url = full_url,
    }
    Ok(())
}

fn strip_trailing_newline(body: &mut String) {
    if body.ends_with("\r\n") {
        body.truncate(body.len() - 2);
    } else if body.ends_with('\n') {
        body.truncate(body.len() - 1);
    }
}

/// Parses a raw request, applying `subs` to every line and to the body.
pub fn parse_raw_request<R: BufRead>(mut reader: R, scheme: Scheme, subs: &Substitutions) -> Result<RequestConfig> {
    let mut first = String::new();
    let read = reader
        .read_line(&mut first)
        .map_err(|e| ReplayError::io("could not read request", e))?;
    if read == 0 {
        return Err(ReplayError::format("could not read request", ""));
    }
    let request_line = parse_request_line(&subs.apply(&first))?;

    let mut conf = RequestConfig::new(scheme);
    conf.method = request_line.method;
    read_headers(&mut reader, subs, &mut conf)?;
    resolve_url(&request_line.target, &mut conf)?;

    let mut body = String::new();
    reader
        .read_to_string(&mut body)
        .map_err(|e| ReplayError::io("could not read request body", e))?;
    let mut body = subs.apply(&body).into_owned();
    strip_trailing_newline(&mut body);
    conf.raw_body = body;

    decode_body(&mut conf)?;
    Ok(conf)
}

pub fn read_raw_request(path: &Path, scheme: Scheme, subs: &Substitutions) -> Result<RequestConfig> {
    let file = match File::open(path) {
        Err(reason) => return Err(ReplayError::io(format!("could not open request file {}", path.display()), reason)),
        Ok(file) => file,
    };
    parse_raw_request(BufReader::new(file), scheme, subs)
}
