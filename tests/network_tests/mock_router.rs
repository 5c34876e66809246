//! In-process device that plays a scripted conversation over TCP

#![allow(dead_code)]

use std::io::{BufReader, BufWriter, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use routeros::protocol::{compute_response, read_word, write_sentence, write_word};

pub const CHALLENGE: &str = "0123456789abcdef0123456789abcdef";
pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";

/// Device side of one client connection
pub struct Session {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Session {
    /// Read words up to the empty terminator
    pub fn read_sentence(&mut self) -> Vec<String> {
        let mut words = Vec::new();
        loop {
            let word = read_word(&mut self.reader, u32::MAX).unwrap();
            if word.is_empty() {
                return words;
            }
            words.push(String::from_utf8(word).unwrap());
        }
    }

    /// Send one sentence
    pub fn send(&mut self, words: &[&str]) {
        write_sentence(&mut self.writer, words).unwrap();
    }

    /// Send raw bytes
    pub fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).unwrap();
        self.writer.flush().unwrap();
    }

    /// Send a single word without closing the sentence
    pub fn send_word(&mut self, word: &str) {
        write_word(&mut self.writer, word.as_bytes()).unwrap();
        self.writer.flush().unwrap();
    }

    /// Block until the client goes away
    pub fn wait_for_close(&mut self) {
        while read_word(&mut self.reader, u32::MAX).is_ok() {}
    }

    /// Answer the two-step login, accepting `USER` / `PASSWORD`
    pub fn accept_login(&mut self) {
        assert_eq!(self.read_sentence(), vec!["/login"]);
        let ret = format!("=ret={}", CHALLENGE);
        self.send(&["!done", ret.as_str()]);

        let expected = compute_response(PASSWORD, CHALLENGE).unwrap();
        let words = self.read_sentence();
        assert_eq!(
            words,
            vec![
                "/login".to_string(),
                format!("=name={}", USER),
                format!("=response={}", expected),
            ]
        );
        self.send(&["!done"]);
    }
}

/// A listener on an ephemeral port serving a single connection
pub struct MockRouter {
    address: String,
    handle: JoinHandle<()>,
}

impl MockRouter {
    pub fn spawn<F>(script: F) -> Self
    where
        F: FnOnce(&mut Session) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut session = Session {
                reader: BufReader::new(stream.try_clone().unwrap()),
                writer: BufWriter::new(stream),
            };
            script(&mut session);
        });

        Self { address, handle }
    }

    /// Spawn a device that logs the client in and then runs `script`
    pub fn with_login<F>(script: F) -> Self
    where
        F: FnOnce(&mut Session) + Send + 'static,
    {
        Self::spawn(move |session| {
            session.accept_login();
            script(session);
        })
    }

    pub fn address(&self) -> String {
        self.address.clone()
    }

    /// Wait for the script to finish, re-raising its panics
    pub fn join(self) {
        if let Err(panic) = self.handle.join() {
            std::panic::resume_unwind(panic);
        }
    }
}
