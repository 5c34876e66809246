//! Reply parser
//!
//! Rebuilds replies from a stream of decoded words.
//!
//! ## State Machine
//! ```text
//!            !re (empty record)
//!   ┌──────┐ ─────────────────▶ ┌─────────┐
//!   │ Flat │                    │ Grouped │ ◀─┐ !re: flush record,
//!   └──────┘                    └─────────┘ ──┘      open a new one
//! ```
//! `=key=value` words go to the flat pair list in `Flat` and into the
//! current record in `Grouped`. The empty word closes a sentence.
//!
//! ## Modes
//! - `OneShot`: the reply ends with the sentence that carries `!done`.
//! - `Continuous`: every sentence is its own reply; the parser resets after
//!   each one and keeps going until a `!done` sentence ends the stream.

use std::io::Read;

use super::attribute::parse_attribute;
use super::reply::{Pair, Record, Reply};
use super::word::read_word;
use crate::error::Result;

/// Record separator word
pub const RE_WORD: &str = "!re";

/// End-of-reply word
pub const DONE_WORD: &str = "!done";

/// How the parser treats sentence boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// One reply per command, closed by the `!done` sentence
    OneShot,
    /// One reply per sentence, indefinitely
    Continuous,
}

/// Outcome of feeding one word to the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// More words are needed
    Pending,
    /// A reply is complete
    Reply(Reply),
    /// The device ended a continuous stream
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Flat,
    Grouped,
}

/// Incremental reply parser
#[derive(Debug)]
pub struct ReplyParser {
    mode: ParseMode,
    state: State,
    done: bool,
    reply: Reply,
    record: Record,
}

impl ReplyParser {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            state: State::Flat,
            done: false,
            reply: Reply::default(),
            record: Record::new(),
        }
    }

    /// Feed one decoded word
    pub fn push(&mut self, word: &str) -> Progress {
        match word {
            "" => self.end_of_sentence(),
            DONE_WORD => {
                self.done = true;
                Progress::Pending
            }
            RE_WORD => {
                if self.record.is_empty() {
                    self.state = State::Grouped;
                } else {
                    self.flush_record();
                }
                Progress::Pending
            }
            _ => {
                if let Some(attribute) = parse_attribute(word) {
                    let (key, value) = attribute.into_parts();
                    match self.state {
                        State::Grouped if !key.is_empty() => {
                            self.record.insert(key, value);
                        }
                        State::Grouped => {}
                        State::Flat => self.reply.pairs.push(Pair::new(key, value)),
                    }
                }
                Progress::Pending
            }
        }
    }

    fn end_of_sentence(&mut self) -> Progress {
        match (self.mode, self.done) {
            (ParseMode::OneShot, false) => Progress::Pending,
            (ParseMode::OneShot, true) | (ParseMode::Continuous, false) => {
                Progress::Reply(self.take_reply())
            }
            (ParseMode::Continuous, true) => {
                self.reset();
                Progress::Finished
            }
        }
    }

    fn flush_record(&mut self) {
        if !self.record.is_empty() {
            let record = std::mem::take(&mut self.record);
            self.reply.sub_pairs.push(record);
        }
    }

    /// Flush the in-progress record and hand out the reply, resetting
    /// every accumulator
    fn take_reply(&mut self) -> Reply {
        self.flush_record();
        let reply = std::mem::take(&mut self.reply);
        self.reset();
        reply
    }

    fn reset(&mut self) {
        self.state = State::Flat;
        self.done = false;
        self.reply = Reply::default();
        self.record = Record::new();
    }
}

/// Read one complete reply from a stream
///
/// Blocks until the sentence carrying `!done` has been read
pub fn read_reply<R: Read>(reader: &mut R, max_word_size: u32) -> Result<Reply> {
    let mut parser = ReplyParser::new(ParseMode::OneShot);
    loop {
        let word = read_word(reader, max_word_size)?;
        let word = String::from_utf8_lossy(&word);
        if let Progress::Reply(reply) = parser.push(&word) {
            return Ok(reply);
        }
    }
}
