use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Key under which a multipart section keeps its raw payload.
pub const SECTION_BODY: &str = "body";

/// One part of a multipart/form-data body. Header values and their
/// parameters (`name`, `filename`, ...) share the map with [`SECTION_BODY`].
pub type Section = BTreeMap<String, String>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured form of a raw request file, built once per replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    pub method: String,
    /// Value of the first Content-Type header line, empty if none.
    pub content_type: String,
    pub headers: BTreeMap<String, String>,
    /// Pairs from the URL query string, not decoded.
    pub query: BTreeMap<String, String>,
    /// Pairs from an x-www-form-urlencoded body, not decoded.
    pub params: BTreeMap<String, String>,
    pub multi_part: Vec<Section>,
    /// Absolute URL without the query string.
    pub url: String,
    pub raw_body: String,
    pub scheme: Scheme,
}

impl RequestConfig {
    pub fn new(scheme: Scheme) -> RequestConfig {
        RequestConfig {
            scheme,
            ..RequestConfig::default()
        }
    }
}
