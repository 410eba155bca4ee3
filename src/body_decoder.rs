use crate::errors::Result;
use crate::multipart::decompose_multipart;
use crate::request_config::RequestConfig;
use log::debug;
use std::collections::BTreeMap;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Splits `a=1&b=2` into pairs. Each pair is split on its first `=`;
/// pairs without one are skipped. Nothing is URL-decoded.
pub fn parse_pairs(text: &str) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    for set in text.split('&') {
        match set.split_once('=') {
            Some((key, value)) => {
                pairs.insert(key.to_string(), value.to_string());
            }
            None => debug!("skipping pair without '=': {:?}", set),
        }
    }
    pairs
}

/// Fills `params` or `multi_part` depending on the content type. Every
/// other content type (JSON and XML included) leaves the body opaque.
pub fn decode_body(conf: &mut RequestConfig) -> Result<()> {
    if conf.content_type == FORM_URLENCODED {
        conf.params = parse_pairs(&conf.raw_body);
    } else if conf.content_type.starts_with(MULTIPART_FORM_DATA) {
        conf.multi_part = decompose_multipart(&conf.raw_body, &conf.content_type)?;
        debug!("decoded {} multipart sections", conf.multi_part.len());
    }
    Ok(())
}
