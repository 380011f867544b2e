use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::error::{NavError, NavResult};

/// Decoded query arguments. A parameter written without `=` maps to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryArgs(HashMap<String, Option<String>>);

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.0.insert(key.into(), value);
    }

    /// Value bound to `key`; `None` both for absent keys and bare flags.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }
}

impl FromIterator<(String, Option<String>)> for QueryArgs {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub segments: Vec<String>,
    pub args: QueryArgs,
}

/// Splits a browser pathname and search string into decoded segments and args.
pub fn parse_location(pathname: &str, search: &str) -> NavResult<Location> {
    let pathname = pathname.strip_prefix('/').unwrap_or(pathname);
    let search = search.strip_prefix('?').unwrap_or(search);

    let segments = if pathname.is_empty() {
        Vec::new()
    } else {
        pathname
            .split('/')
            .map(decode_component)
            .collect::<NavResult<Vec<_>>>()?
    };

    let mut args = QueryArgs::new();
    for token in search.split('&').filter(|token| !token.is_empty()) {
        match token.split_once('=') {
            Some((key, value)) => args.insert(decode_component(key)?, Some(decode_component(value)?)),
            None => args.insert(decode_component(token)?, None),
        }
    }

    Ok(Location { segments, args })
}

/// Percent-decodes one URI component, rejecting stray `%` escapes and
/// sequences that do not decode to UTF-8.
pub fn decode_component(raw: &str) -> NavResult<String> {
    let bytes = raw.as_bytes();
    let mut index = 0;
    while let Some(offset) = bytes[index..].iter().position(|byte| *byte == b'%') {
        let at = index + offset;
        let escape = bytes.get(at + 1..at + 3);
        if !escape.is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit)) {
            return Err(NavError::decoding(raw, format!("bad escape at byte {at}")));
        }
        index = at + 3;
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|err| NavError::decoding(raw, err.to_string()))
}
