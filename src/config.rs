use crate::request_config::Scheme;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything one replay needs, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOptions {
    pub file: PathBuf,
    pub scheme: Scheme,
    pub substitutions: BTreeMap<String, String>,
    pub dump_response: bool,
    pub proxy: Option<String>,
    pub save_request: Option<PathBuf>,
}

impl ReplayOptions {
    pub fn new(file: PathBuf) -> ReplayOptions {
        ReplayOptions {
            file,
            scheme: Scheme::Http,
            substitutions: BTreeMap::new(),
            dump_response: false,
            proxy: None,
            save_request: None,
        }
    }
}

/// `infile=./test.txt` -> (`infile`, `./test.txt`)
pub fn parse_substitution(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(anyhow!("bad replacement string: {}", pair)),
    }
}

pub fn parse_substitutions<'a, I>(pairs: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut substitutions = BTreeMap::new();
    for pair in pairs {
        let (name, value) = parse_substitution(pair)?;
        substitutions.insert(name, value);
    }
    Ok(substitutions)
}
