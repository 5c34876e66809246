//! Reply definitions
//!
//! Pairs, records and the structured reply assembled by the parser.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, RouterOsError};

/// One row of a tabular reply
pub type Record = BTreeMap<String, String>;

/// Filter operator carried by a query pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairOp {
    /// No operator (`?key=value`)
    #[default]
    None,
    /// `?=key=value`
    Eq,
    /// `?-key`: property is absent
    Absent,
    /// `?<key=value`
    Lt,
    /// `?>key=value`
    Gt,
}

impl PairOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairOp::None => "",
            PairOp::Eq => "=",
            PairOp::Absent => "-",
            PairOp::Lt => "<",
            PairOp::Gt => ">",
        }
    }

    /// Parse an operator character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '=' => Some(PairOp::Eq),
            '-' => Some(PairOp::Absent),
            '<' => Some(PairOp::Lt),
            '>' => Some(PairOp::Gt),
            _ => None,
        }
    }
}

impl fmt::Display for PairOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key/value pair of an attribute, query or reply word
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pair {
    pub key: String,
    pub value: String,

    /// Only used when the pair is sent as a query filter
    pub op: PairOp,
}

impl Pair {
    /// Create a plain pair
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            op: PairOp::None,
        }
    }

    /// Create a query filter pair
    pub fn filter(op: PairOp, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            op,
        }
    }
}

/// A parsed reply
///
/// `pairs` holds top-level attributes in arrival order; `sub_pairs` holds
/// one record per `!re` row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub pairs: Vec<Pair>,
    pub sub_pairs: Vec<Record>,
}

impl Reply {
    /// True when neither flat pairs nor records were received
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.sub_pairs.is_empty()
    }

    /// Value of the first flat pair named `key`
    pub fn pair_value(&self, key: &str) -> Result<&str> {
        find_pair_value(&self.pairs, key)
    }

    /// First record whose `name` attribute equals `name`
    pub fn record_by_name(&self, name: &str) -> Result<&Record> {
        self.sub_pairs
            .iter()
            .find(|record| record.get("name").map(String::as_str) == Some(name))
            .ok_or_else(|| RouterOsError::NotFound(name.to_string()))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pair in &self.pairs {
            write!(f, "={}={} ", pair.key, pair.value)?;
        }
        for record in &self.sub_pairs {
            f.write_str("!re")?;
            for (key, value) in record {
                write!(f, " ={}={}", key, value)?;
            }
            f.write_str(" ")?;
        }
        Ok(())
    }
}

/// Value of the first pair named `key` in `pairs`
pub fn find_pair_value<'a>(pairs: &'a [Pair], key: &str) -> Result<&'a str> {
    pairs
        .iter()
        .find(|p| p.key == key)
        .map(|p| p.value.as_str())
        .ok_or_else(|| RouterOsError::NotFound(key.to_string()))
}
