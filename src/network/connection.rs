//! Connection
//!
//! Owns the TCP stream to the device and moves sentences across it.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, RouterOsError};
use crate::protocol::{read_word, write_sentence, ParseMode, Progress, Reply, ReplyParser};

/// A single blocking connection to a device
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Largest accepted word body
    max_word_size: u32,

    /// Set once a transport or framing error left the stream out of sync
    broken: bool,
}

impl Connection {
    /// Dial the configured address and apply socket options
    pub fn open(config: &Config) -> Result<Self> {
        let stream = if config.connect_timeout_ms > 0 {
            Self::dial_with_timeout(
                &config.address,
                Duration::from_millis(config.connect_timeout_ms),
            )?
        } else {
            TcpStream::connect(config.address.as_str())?
        };

        Self::new(stream, config)
    }

    fn dial_with_timeout(address: &str, timeout: Duration) -> Result<TcpStream> {
        let mut last_err = None;
        for addr in address.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }

        Err(match last_err {
            Some(e) => e.into(),
            None => RouterOsError::InvalidAddress(format!("{} resolved to no addresses", address)),
        })
    }

    /// Wrap an established stream
    pub fn new(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(config.nodelay)?;
        stream.set_read_timeout(Config::timeout(config.read_timeout_ms))?;
        stream.set_write_timeout(Config::timeout(config.write_timeout_ms))?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
            max_word_size: config.max_word_size,
            broken: false,
        })
    }

    /// Send one sentence (words plus the empty terminator)
    pub fn send<S: AsRef<str>>(&mut self, words: &[S]) -> Result<()> {
        self.ensure_usable()?;

        for word in words {
            tracing::trace!("{} >>> {}", self.peer_addr, word.as_ref());
        }

        let words: Vec<&[u8]> = words.iter().map(|w| w.as_ref().as_bytes()).collect();
        let result = write_sentence(&mut self.writer, &words);

        // An oversized word is rejected before anything reaches the socket
        if let Err(RouterOsError::Io(ref e)) = result {
            tracing::warn!("Write to {} failed: {}", self.peer_addr, e);
            self.broken = true;
        }
        result
    }

    /// Read one word, decoded as text
    pub fn read_word(&mut self) -> Result<String> {
        self.ensure_usable()?;

        let result = read_word(&mut self.reader, self.max_word_size);
        let word = self.track(result)?;
        let word = String::from_utf8_lossy(&word).into_owned();
        tracing::trace!("{} <<< {}", self.peer_addr, word);
        Ok(word)
    }

    /// Read one complete reply
    ///
    /// Blocks until the sentence carrying `!done` has been read
    pub fn read_reply(&mut self) -> Result<Reply> {
        let mut parser = ReplyParser::new(ParseMode::OneShot);
        loop {
            let word = self.read_word()?;
            if let Progress::Reply(reply) = parser.push(&word) {
                return Ok(reply);
            }
        }
    }

    /// Clone the underlying socket handle
    pub fn try_clone_stream(&self) -> Result<TcpStream> {
        Ok(self.writer.get_ref().try_clone()?)
    }

    /// Shut the socket down in both directions
    pub fn shutdown(&mut self) -> Result<()> {
        self.broken = true;
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark the stream as out of sync
    pub fn mark_broken(&mut self) {
        if !self.broken {
            tracing::debug!("Connection to {} marked broken", self.peer_addr);
        }
        self.broken = true;
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.broken {
            return Err(RouterOsError::ConnectionBroken);
        }
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            if e.is_fatal() {
                tracing::warn!("Connection to {} failed: {}", self.peer_addr, e);
                self.broken = true;
            }
        }
        result
    }
}
