//! Protocol Module
//!
//! Defines the RouterOS API sentence protocol.
//!
//! ## Word Format
//! ```text
//! ┌─────────────────────┬─────────────────────────────┐
//! │ Length (1-5 bytes)  │         Raw bytes           │
//! └─────────────────────┴─────────────────────────────┘
//! ```
//!
//! ## Sentences
//! A sentence is a sequence of words closed by an empty word.
//!
//! ### Request
//! ```text
//! /interface/print
//! =.proplist=name,type
//! ?type=ether
//! <empty>
//! ```
//!
//! ### Reply
//! ```text
//! !re  =.id=*1  =name=ether1  <empty>
//! !re  =.id=*2  =name=ether2  <empty>
//! !done  <empty>
//! ```
//!
//! ### Reserved Words
//! - `!re`:   one row of a tabular result follows
//! - `!done`: the reply is complete
//! - `=key=value`: attribute (data) word
//! - `?[op]key=value`, `?#op`: query filter words

mod word;
mod attribute;
mod reply;
mod parser;
mod query;
mod auth;

pub use word::{
    encode_length, decode_length, encode_word,
    read_length, read_word, write_word, write_sentence,
    MAX_LENGTH_PREFIX,
};
pub use attribute::{parse_attribute, Attribute};
pub use reply::{find_pair_value, Pair, PairOp, Record, Reply};
pub use parser::{read_reply, ParseMode, Progress, ReplyParser, DONE_WORD, RE_WORD};
pub use query::{call_words, query_words, Query};
pub use auth::{compute_response, CHALLENGE_KEY, LOGIN_COMMAND};
