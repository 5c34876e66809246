//! Reply Parser Tests
//!
//! These tests verify:
//! - Attribute word splitting
//! - One-shot replies with flat pairs and grouped records
//! - Continuous replies without records leaking between sentences
//! - Pair and record lookups

use std::io::Cursor;

use routeros::protocol::{
    find_pair_value, parse_attribute, read_reply, write_sentence, Attribute, ParseMode,
    Progress, ReplyParser,
};
use routeros::{Pair, Record, Reply, RouterOsError};

// =============================================================================
// Helper Functions
// =============================================================================

fn one_shot(words: &[&str]) -> Reply {
    let mut parser = ReplyParser::new(ParseMode::OneShot);
    for word in words {
        if let Progress::Reply(reply) = parser.push(word) {
            return reply;
        }
    }
    panic!("Reply never completed for {:?}", words);
}

fn continuous(words: &[&str]) -> (Vec<Reply>, bool) {
    let mut parser = ReplyParser::new(ParseMode::Continuous);
    let mut replies = Vec::new();
    for word in words {
        match parser.push(word) {
            Progress::Pending => {}
            Progress::Reply(reply) => replies.push(reply),
            Progress::Finished => return (replies, true),
        }
    }
    (replies, false)
}

fn record(fields: &[(&str, &str)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Attribute Tests
// =============================================================================

#[test]
fn test_attribute_with_value() {
    assert_eq!(
        parse_attribute("=name=ether1"),
        Some(Attribute {
            key: "name".to_string(),
            value: Some("ether1".to_string()),
        })
    );
}

#[test]
fn test_attribute_without_value() {
    let attribute = parse_attribute("=disabled").unwrap();
    assert_eq!(attribute.key, "disabled");
    assert_eq!(attribute.value, None);
    assert_eq!(attribute.value_or_empty(), "");
}

#[test]
fn test_attribute_with_empty_value() {
    let attribute = parse_attribute("=comment=").unwrap();
    assert_eq!(attribute.key, "comment");
    assert_eq!(attribute.value.as_deref(), Some(""));
}

#[test]
fn test_attribute_value_keeps_further_equals() {
    let attribute = parse_attribute("=comment=a=b=c").unwrap();
    assert_eq!(attribute.key, "comment");
    assert_eq!(attribute.value.as_deref(), Some("a=b=c"));
}

#[test]
fn test_attribute_discards_prefix_segment() {
    let attribute = parse_attribute("?name=ether1").unwrap();
    assert_eq!(attribute.key, "ether1");
    assert_eq!(attribute.value, None);
}

#[test]
fn test_non_attribute_words() {
    assert_eq!(parse_attribute("!re"), None);
    assert_eq!(parse_attribute(""), None);
    assert_eq!(parse_attribute("/interface/print"), None);
}

// =============================================================================
// One-shot Tests
// =============================================================================

#[test]
fn test_one_shot_flat() {
    let reply = one_shot(&["=name=eth0", "=type=ether", "!done", ""]);

    assert_eq!(
        reply.pairs,
        vec![Pair::new("name", "eth0"), Pair::new("type", "ether")]
    );
    assert!(reply.sub_pairs.is_empty());
}

#[test]
fn test_one_shot_grouped() {
    let reply = one_shot(&[
        "!re", "=.id=*1", "=name=eth0", "!re", "=.id=*2", "=name=eth1", "!done", "",
    ]);

    assert!(reply.pairs.is_empty());
    assert_eq!(
        reply.sub_pairs,
        vec![
            record(&[(".id", "*1"), ("name", "eth0")]),
            record(&[(".id", "*2"), ("name", "eth1")]),
        ]
    );
}

#[test]
fn test_one_shot_grouped_with_sentence_terminators() {
    let reply = one_shot(&[
        "!re", "=.id=*1", "", "!re", "=.id=*2", "", "!re", "=.id=*3", "", "!done", "",
    ]);

    assert_eq!(reply.sub_pairs.len(), 3);
    assert_eq!(reply.sub_pairs[2][".id"], "*3");
}

#[test]
fn test_one_shot_collects_words_after_done() {
    let reply = one_shot(&["!done", "=ret=abcdef0123", ""]);

    assert_eq!(reply.pair_value("ret").unwrap(), "abcdef0123");
}

#[test]
fn test_one_shot_empty_reply() {
    let reply = one_shot(&["!done", ""]);
    assert!(reply.is_empty());
}

#[test]
fn test_one_shot_trap_message_is_flat_pair() {
    let reply = one_shot(&["!trap", "=message=cannot log in", "", "!done", ""]);

    assert_eq!(reply.pairs, vec![Pair::new("message", "cannot log in")]);
}

#[test]
fn test_flat_pairs_keep_order_and_duplicates() {
    let reply = one_shot(&["=b=1", "=a=2", "=b=3", "!done", ""]);

    let keys: Vec<&str> = reply.pairs.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["b", "a", "b"]);
}

#[test]
fn test_flat_pair_without_value() {
    let reply = one_shot(&["=dynamic", "!done", ""]);
    assert_eq!(reply.pairs, vec![Pair::new("dynamic", "")]);
}

#[test]
fn test_record_duplicate_key_last_wins() {
    let reply = one_shot(&["!re", "=name=first", "=name=second", "!done", ""]);
    assert_eq!(reply.sub_pairs, vec![record(&[("name", "second")])]);
}

#[test]
fn test_record_skips_empty_key() {
    let reply = one_shot(&["!re", "==orphan", "=name=eth0", "!done", ""]);
    assert_eq!(reply.sub_pairs, vec![record(&[("name", "eth0")])]);
}

#[test]
fn test_empty_record_is_not_flushed() {
    let reply = one_shot(&["!re", "", "!re", "=name=eth0", "", "!done", ""]);
    assert_eq!(reply.sub_pairs, vec![record(&[("name", "eth0")])]);
}

#[test]
fn test_read_reply_from_stream() {
    let mut buf = Vec::new();
    write_sentence(&mut buf, &["!re", "=name=ether1"]).unwrap();
    write_sentence(&mut buf, &["!re", "=name=ether2"]).unwrap();
    write_sentence(&mut buf, &["!done"]).unwrap();

    let mut cursor = Cursor::new(buf);
    let reply = read_reply(&mut cursor, 1024).unwrap();

    assert_eq!(reply.sub_pairs.len(), 2);
    assert_eq!(reply.record_by_name("ether2").unwrap()["name"], "ether2");
}

#[test]
fn test_read_reply_truncated_stream() {
    let mut buf = Vec::new();
    write_sentence(&mut buf, &["!re", "=name=ether1"]).unwrap();

    let mut cursor = Cursor::new(buf);
    assert!(matches!(
        read_reply(&mut cursor, 1024),
        Err(RouterOsError::ConnectionClosed)
    ));
}

// =============================================================================
// Continuous Tests
// =============================================================================

#[test]
fn test_continuous_one_reply_per_sentence() {
    let (replies, finished) = continuous(&[
        "!re", "=name=ether1", "=running=true", "",
        "!re", "=name=ether2", "",
        "!re", "=name=ether3", "=running=false", "",
    ]);

    assert!(!finished);
    assert_eq!(
        replies.iter().map(|r| r.sub_pairs.clone()).collect::<Vec<_>>(),
        vec![
            vec![record(&[("name", "ether1"), ("running", "true")])],
            vec![record(&[("name", "ether2")])],
            vec![record(&[("name", "ether3"), ("running", "false")])],
        ]
    );
}

#[test]
fn test_continuous_resets_to_flat_state() {
    let (replies, _) = continuous(&["!re", "=name=ether1", "", "=section=1", ""]);

    assert_eq!(replies.len(), 2);
    assert!(replies[1].sub_pairs.is_empty());
    assert_eq!(replies[1].pairs, vec![Pair::new("section", "1")]);
}

#[test]
fn test_continuous_many_replies() {
    let mut words = Vec::new();
    let names: Vec<String> = (0..500).map(|i| format!("=name=if{}", i)).collect();
    for name in &names {
        words.push("!re");
        words.push(name.as_str());
        words.push("");
    }

    let (replies, _) = continuous(&words);

    assert_eq!(replies.len(), 500);
    for (i, reply) in replies.iter().enumerate() {
        assert_eq!(reply.sub_pairs.len(), 1);
        assert_eq!(reply.sub_pairs[0]["name"], format!("if{}", i));
    }
}

#[test]
fn test_continuous_finishes_after_done_sentence() {
    let (replies, finished) = continuous(&["!re", "=name=ether1", "", "!done", "", "!re"]);

    assert!(finished);
    assert_eq!(replies.len(), 1);
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_pair_value_first_match() {
    let reply = Reply {
        pairs: vec![Pair::new("ret", "first"), Pair::new("ret", "second")],
        sub_pairs: vec![],
    };
    assert_eq!(reply.pair_value("ret").unwrap(), "first");
}

#[test]
fn test_pair_value_not_found() {
    let reply = Reply::default();
    let err = reply.pair_value("missing").unwrap_err();

    assert!(matches!(err, RouterOsError::NotFound(ref key) if key == "missing"));
    assert!(err.is_lookup());
    assert!(!err.is_fatal());
}

#[test]
fn test_find_pair_value_on_slice() {
    let pairs = vec![Pair::new("a", "1"), Pair::new("b", "2")];
    assert_eq!(find_pair_value(&pairs, "b").unwrap(), "2");
    assert!(find_pair_value(&pairs, "c").unwrap_err().is_lookup());
}

#[test]
fn test_record_by_name() {
    let reply = Reply {
        pairs: vec![],
        sub_pairs: vec![
            record(&[(".id", "*1")]),
            record(&[(".id", "*2"), ("name", "bridge")]),
        ],
    };

    assert_eq!(reply.record_by_name("bridge").unwrap()[".id"], "*2");
    assert!(matches!(
        reply.record_by_name("ether1"),
        Err(RouterOsError::NotFound(_))
    ));
}
