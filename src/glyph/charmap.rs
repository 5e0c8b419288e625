use std::{collections::BTreeMap, fs, path::Path};

use tracing::{debug, warn};

use crate::core::error::{SdfError, SdfResult};

/// Unicode → codepage table read from a mapping file.
///
/// Only lines starting with `0` are entries, each `codepage unicode` in hex,
/// separated by tabs or spaces.
/// Keys are kept sorted so the render request comes out in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharMap {
    entries: BTreeMap<u32, u32>,
}

impl CharMap {
    pub fn load(path: impl AsRef<Path>) -> SdfResult<Self> {
        let path = path.as_ref();
        debug!("loading character mapping file {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| SdfError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in text.lines() {
            if !line.starts_with('0') {
                continue;
            }
            match parse_pair(line) {
                Some((codepage, unicode)) => {
                    entries.insert(unicode, codepage);
                }
                None => warn!("skip: {line}"),
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Unicode keys in ascending order.
    pub fn unicode_keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn to_codepage(&self, unicode: u32) -> Option<u32> {
        self.entries.get(&unicode).copied()
    }
}

impl FromIterator<(u32, u32)> for CharMap {
    /// Pairs are `(unicode, codepage)`.
    fn from_iter<T: IntoIterator<Item = (u32, u32)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn parse_hex(token: &str) -> Option<u32> {
    let t = token.trim();
    let t = t
        .strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .unwrap_or(t);
    let end = t
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(t.len());
    if end == 0 {
        return None;
    }
    u32::from_str_radix(&t[..end], 16).ok()
}

fn parse_pair(line: &str) -> Option<(u32, u32)> {
    let mut fields = line.split_whitespace();
    let codepage = parse_hex(fields.next()?)?;
    let unicode = parse_hex(fields.next()?)?;
    Some((codepage, unicode))
}
