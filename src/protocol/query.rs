//! Request sentences
//!
//! Builds the words of call and query requests. The empty terminator word
//! is added by `write_sentence`.

use super::reply::Pair;

/// Property list attribute
const PROPLIST_KEY: &str = ".proplist";

/// Filters, combining operator and requested properties of a query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Filter pairs, sent as `?<op><key>=<value>`
    pub pairs: Vec<Pair>,

    /// How the filters combine, sent as `?#<op>` after all filters
    pub op: String,

    /// Properties to return, sent before any filter
    pub proplist: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter pair
    pub fn filter(mut self, pair: Pair) -> Self {
        self.pairs.push(pair);
        self
    }

    /// Set the combining operator
    pub fn op(mut self, op: impl Into<String>) -> Self {
        self.op = op.into();
        self
    }

    /// Set the requested property names
    pub fn proplist<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proplist = props.into_iter().map(Into::into).collect();
        self
    }
}

/// Words of a plain call: the command, then `=key=value` per parameter
pub fn call_words(command: &str, params: &[Pair]) -> Vec<String> {
    let mut words = Vec::with_capacity(1 + params.len());
    words.push(command.to_string());
    words.extend(params.iter().map(|p| format!("={}={}", p.key, p.value)));
    words
}

/// Words of a query: command, proplist, filters, then the combining op
pub fn query_words(command: &str, query: &Query) -> Vec<String> {
    let mut words = Vec::with_capacity(3 + query.pairs.len());
    words.push(command.to_string());

    if !query.proplist.is_empty() {
        words.push(format!("={}={}", PROPLIST_KEY, query.proplist.join(",")));
    }

    words.extend(
        query
            .pairs
            .iter()
            .map(|p| format!("?{}{}={}", p.op, p.key, p.value)),
    );

    if !query.op.is_empty() {
        words.push(format!("?#{}", query.op));
    }

    words
}
