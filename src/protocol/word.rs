//! Word codec
//!
//! Encoding and decoding of single protocol words.
//!
//! ## Length Prefix
//! ```text
//! ┌──────────────────────────┬───────┬──────────────────────────┐
//! │ Length range             │ Bytes │ First byte               │
//! ├──────────────────────────┼───────┼──────────────────────────┤
//! │ 0x00 ..= 0x7F            │ 1     │ 0xxxxxxx                 │
//! │ 0x80 ..= 0x3FFF          │ 2     │ 10xxxxxx                 │
//! │ 0x4000 ..= 0x1FFFFF      │ 3     │ 110xxxxx                 │
//! │ 0x200000 ..= 0xFFFFFFF   │ 4     │ 1110xxxx                 │
//! │ 0x10000000 ..= u32::MAX  │ 5     │ 11110000 + 4 bytes (BE)  │
//! └──────────────────────────┴───────┴──────────────────────────┘
//! ```
//!
//! First bytes `0xF1..=0xFF` are control bytes and never start a word.

use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, RouterOsError};

/// Longest possible length prefix
pub const MAX_LENGTH_PREFIX: usize = 5;

const MAX_1_BYTE: u32 = 0x7F;
const MAX_2_BYTE: u32 = 0x3FFF;
const MAX_3_BYTE: u32 = 0x1F_FFFF;
const MAX_4_BYTE: u32 = 0x0FFF_FFFF;

// =============================================================================
// Length Prefix Encoding/Decoding
// =============================================================================

/// Encode a word length as its variable-width prefix
pub fn encode_length(len: u32) -> Vec<u8> {
    match len {
        0..=MAX_1_BYTE => vec![len as u8],
        0x80..=MAX_2_BYTE => {
            let v = len | 0x8000;
            vec![(v >> 8) as u8, v as u8]
        }
        0x4000..=MAX_3_BYTE => {
            let v = len | 0xC0_0000;
            vec![(v >> 16) as u8, (v >> 8) as u8, v as u8]
        }
        0x20_0000..=MAX_4_BYTE => (len | 0xE000_0000).to_be_bytes().to_vec(),
        _ => {
            let mut prefix = Vec::with_capacity(MAX_LENGTH_PREFIX);
            prefix.push(0xF0);
            prefix.extend_from_slice(&len.to_be_bytes());
            prefix
        }
    }
}

/// Number of prefix bytes announced by the first byte
fn prefix_width(first: u8) -> Result<usize> {
    match first {
        b if b & 0x80 == 0x00 => Ok(1),
        b if b & 0xC0 == 0x80 => Ok(2),
        b if b & 0xE0 == 0xC0 => Ok(3),
        b if b & 0xF0 == 0xE0 => Ok(4),
        0xF0 => Ok(5),
        b => Err(RouterOsError::InvalidLengthPrefix(b)),
    }
}

/// Decode a length prefix from the start of `bytes`
///
/// Returns the word length and the number of prefix bytes consumed
pub fn decode_length(bytes: &[u8]) -> Result<(u32, usize)> {
    let first = *bytes.first().ok_or(RouterOsError::Framing {
        expected: 1,
        read: 0,
    })?;

    let width = prefix_width(first)?;
    if bytes.len() < width {
        return Err(RouterOsError::Framing {
            expected: width,
            read: bytes.len(),
        });
    }

    let rest = &bytes[1..width];
    let len = match width {
        1 => first as u32,
        2 => ((first as u32 & 0x3F) << 8) | rest[0] as u32,
        3 => ((first as u32 & 0x1F) << 16) | (rest[0] as u32) << 8 | rest[1] as u32,
        4 => {
            ((first as u32 & 0x0F) << 24)
                | (rest[0] as u32) << 16
                | (rest[1] as u32) << 8
                | rest[2] as u32
        }
        _ => u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]),
    };

    Ok((len, width))
}

/// Encode a complete word: length prefix followed by the raw bytes
pub fn encode_word(word: &[u8]) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(MAX_LENGTH_PREFIX + word.len());
    put_word(&mut buf, word)?;
    Ok(buf.freeze())
}

fn put_word(buf: &mut BytesMut, word: &[u8]) -> Result<()> {
    let len = u32::try_from(word.len()).map_err(|_| RouterOsError::WordTooLarge {
        len: word.len() as u64,
        max: u32::MAX as u64,
    })?;
    buf.put_slice(&encode_length(len));
    buf.put_slice(word);
    Ok(())
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a length prefix from a stream
///
/// End of stream before the first byte is reported as `ConnectionClosed`
pub fn read_length<R: Read>(reader: &mut R) -> Result<u32> {
    let mut prefix = [0u8; MAX_LENGTH_PREFIX];
    reader.read_exact(&mut prefix[..1]).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => RouterOsError::ConnectionClosed,
        _ => RouterOsError::Io(e),
    })?;

    let width = prefix_width(prefix[0])?;
    if width > 1 {
        let read = read_full(reader, &mut prefix[1..width])?;
        if read < width - 1 {
            return Err(RouterOsError::Framing {
                expected: width,
                read: read + 1,
            });
        }
    }

    decode_length(&prefix[..width]).map(|(len, _)| len)
}

/// Read a complete word from a stream
///
/// Blocks until the declared number of bytes arrived; a shorter body is a
/// framing error
pub fn read_word<R: Read>(reader: &mut R, max_word_size: u32) -> Result<Vec<u8>> {
    let len = read_length(reader)?;
    if len > max_word_size {
        return Err(RouterOsError::WordTooLarge {
            len: len as u64,
            max: max_word_size as u64,
        });
    }

    let mut word = vec![0u8; len as usize];
    let read = read_full(reader, &mut word)?;
    if read != word.len() {
        return Err(RouterOsError::Framing {
            expected: word.len(),
            read,
        });
    }

    Ok(word)
}

/// Write a single word to a stream (not flushed)
pub fn write_word<W: Write>(writer: &mut W, word: &[u8]) -> Result<()> {
    let bytes = encode_word(word)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Write a sentence: every word, then the empty terminator word
///
/// The whole sentence is encoded before anything is written, so an
/// oversized word leaves the stream untouched.
pub fn write_sentence<W: Write, S: AsRef<[u8]>>(writer: &mut W, words: &[S]) -> Result<()> {
    let capacity = words
        .iter()
        .map(|w| MAX_LENGTH_PREFIX + w.as_ref().len())
        .sum::<usize>()
        + 1;
    let mut buf = BytesMut::with_capacity(capacity);
    for word in words {
        put_word(&mut buf, word.as_ref())?;
    }
    put_word(&mut buf, &[])?;

    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

/// Fill `buf` as far as the stream allows, returning the bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
