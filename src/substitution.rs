//! Literal `{{name}}` token replacement.
//!
//! Every token of the mapping is matched in one combined pass over the
//! text, so replacement values are never scanned again. There is no escape
//! syntax for a literal `{{`.

use crate::errors::{ReplayError, Result};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

pub struct Substitutions {
    pattern: Option<Regex>,
    values: HashMap<String, String>,
}

impl Substitutions {
    pub fn new(mapping: &BTreeMap<String, String>) -> Result<Substitutions> {
        if mapping.is_empty() {
            return Ok(Substitutions::none());
        }
        let values: HashMap<String, String> = mapping
            .iter()
            .map(|(name, value)| (format!("{{{{{}}}}}", name), value.clone()))
            .collect();
        let alternation = mapping
            .keys()
            .map(|name| regex::escape(&format!("{{{{{}}}}}", name)))
            .collect::<Vec<String>>()
            .join("|");
        let pattern = Regex::new(&alternation)
            .map_err(|e| ReplayError::format(format!("could not compile substitutions ({})", e), alternation.clone()))?;
        Ok(Substitutions {
            pattern: Some(pattern),
            values,
        })
    }

    pub fn none() -> Substitutions {
        Substitutions {
            pattern: None,
            values: HashMap::new(),
        }
    }

    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(text, |caps: &Captures| {
                // every match is one of the tokens the pattern was built from
                self.values.get(&caps[0]).cloned().unwrap_or_else(|| caps[0].to_string())
            }),
            None => Cow::Borrowed(text),
        }
    }
}
