//! Boundary splitting for multipart/form-data bodies.
//!
//! Not a MIME parser. The boundary is taken from the
//! content type with every `-` removed and matched behind any run of
//! dashes, so a boundary with dashes in its middle will not match the body.

use crate::errors::{ReplayError, Result};
use crate::request_config::{Section, SECTION_BODY};
use log::debug;
use regex::Regex;

const BOUNDARY_PARAM: &str = "boundary=";

fn boundary_token(content_type: &str) -> Result<String> {
    let parts: Vec<&str> = content_type.trim().split(';').collect();
    if parts.len() != 2 {
        return Err(ReplayError::format("failed to parse form boundary", content_type));
    }
    let token = match parts[1].split_once(BOUNDARY_PARAM) {
        Some((_, token)) => token.trim().replace('-', ""),
        None => return Err(ReplayError::format("failed to parse form boundary", content_type)),
    };
    if token.is_empty() {
        return Err(ReplayError::format("failed to parse form boundary", content_type));
    }
    Ok(token)
}

fn compile(pattern: String) -> Result<Regex> {
    Regex::new(&pattern).map_err(|e| ReplayError::format(format!("invalid form boundary ({})", e), pattern.clone()))
}

/// Splits `body` into sections, in the order they appear.
pub fn decompose_multipart(body: &str, content_type: &str) -> Result<Vec<Section>> {
    let boundary = regex::escape(&boundary_token(content_type)?);
    let closing = compile(format!(r"-+{}--$", boundary))?;
    let delimiter = compile(format!(r"-+{}\r?\n", boundary))?;
    let blank_line = compile(r"\r?\n\r?\n".to_string())?;

    let body = closing.replace(body, "");
    let mut sections = Vec::new();
    for segment in delimiter.split(&body) {
        if segment.is_empty() {
            continue;
        }
        sections.push(parse_section(segment, &blank_line)?);
    }
    Ok(sections)
}

fn parse_section(segment: &str, blank_line: &Regex) -> Result<Section> {
    let (header, payload) = match blank_line.find(segment) {
        Some(m) => (&segment[..m.start()], &segment[m.end()..]),
        None => {
            let first_line = segment.lines().next().unwrap_or_default();
            return Err(ReplayError::format("multipart section has no blank line after its headers", first_line));
        }
    };

    let mut section = Section::new();
    section.insert(SECTION_BODY.to_string(), payload.to_string());

    for line in header.lines() {
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), value),
            None => {
                debug!("skipping multipart header line without ':': {:?}", line);
                continue;
            }
        };
        if value.contains("; ") {
            let mut fragments = value.split("; ");
            let leading = fragments.next().unwrap_or_default();
            section.insert(name.to_string(), leading.trim().to_string());
            for fragment in fragments {
                if let Some((key, param)) = fragment.split_once('=') {
                    section.insert(key.trim().to_string(), unquote(param.trim()).to_string());
                }
            }
        } else {
            section.insert(name.to_string(), value.trim().to_string());
        }
    }
    Ok(section)
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
