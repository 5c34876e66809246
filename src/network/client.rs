//! Client
//!
//! Public entry point: login, one-shot calls and queries, streaming calls.

use std::net::SocketAddr;
use std::ops::ControlFlow;

use super::{Connection, ReplyStream};
use crate::config::Config;
use crate::error::{Result, RouterOsError};
use crate::protocol::{
    call_words, compute_response, query_words, Pair, Query, Record, Reply, CHALLENGE_KEY,
    LOGIN_COMMAND,
};

/// Connection lifecycle
enum State {
    /// No connection yet (or the last login failed)
    Idle,
    /// Connection open; `ready` tells whether login completed
    Open(Connection),
    /// Terminal
    Closed,
}

/// Client for a single device
///
/// ## Lifecycle
/// `new` (unauthenticated) → `connect` (login, ready) → `close` (terminal).
/// The client owns one connection and runs one command at a time.
pub struct Client {
    config: Config,
    user: String,
    password: String,
    ready: bool,
    state: State,
}

impl Client {
    /// Create a client for `host:port`
    pub fn new(address: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::builder().address(address).build())
    }

    /// Create a client from a full configuration
    pub fn with_config(config: Config) -> Result<Self> {
        validate_address(&config.address)?;
        if config.max_word_size == 0 {
            return Err(RouterOsError::Config("max_word_size must be positive".to_string()));
        }
        Ok(Self {
            config,
            user: String::new(),
            password: String::new(),
            ready: false,
            state: State::Idle,
        })
    }

    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// True after a successful login and before close
    pub fn is_ready(&self) -> bool {
        self.ready && matches!(&self.state, State::Open(conn) if !conn.is_broken())
    }

    /// Dial the device and run the challenge-response login
    ///
    /// On failure the connection is dropped and the client stays
    /// unauthenticated.
    pub fn connect(&mut self, user: &str, password: &str) -> Result<()> {
        match self.state {
            State::Closed => return Err(RouterOsError::Closed),
            State::Open(_) => return Err(RouterOsError::AlreadyConnected),
            State::Idle => {}
        }

        tracing::debug!("Connecting to {}", self.config.address);
        let conn = Connection::open(&self.config)?;
        self.state = State::Open(conn);
        self.user = user.to_string();
        self.password = password.to_string();

        if let Err(e) = self.login() {
            tracing::debug!("Login to {} failed: {}", self.config.address, e);
            if let State::Open(mut conn) = std::mem::replace(&mut self.state, State::Idle) {
                let _ = conn.shutdown();
            }
            return Err(e);
        }

        self.ready = true;
        tracing::debug!("Logged in to {} as {}", self.config.address, self.user);
        Ok(())
    }

    fn login(&mut self) -> Result<()> {
        let reply = self.call(LOGIN_COMMAND, &[])?;
        let challenge = reply
            .pair_value(CHALLENGE_KEY)
            .map_err(|_| RouterOsError::MissingChallenge)?;

        let response = compute_response(&self.password, challenge)?;
        let params = [
            Pair::new("name", self.user.as_str()),
            Pair::new("response", response),
        ];

        let reply = self.call(LOGIN_COMMAND, &params)?;
        if !reply.pairs.is_empty() {
            return Err(RouterOsError::LoginRejected(
                reply.to_string().trim_end().to_string(),
            ));
        }

        Ok(())
    }

    /// Close the connection; the client is unusable afterwards
    pub fn close(&mut self) -> Result<()> {
        self.ready = false;
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(mut conn) => {
                tracing::debug!("Closing connection to {}", conn.peer_addr());
                conn.shutdown()
            }
            State::Idle => Ok(()),
            State::Closed => Err(RouterOsError::Closed),
        }
    }

    /// Run a command with `=key=value` parameters and read its reply
    pub fn call(&mut self, command: &str, params: &[Pair]) -> Result<Reply> {
        check_command(command)?;
        let conn = self.connection()?;
        conn.send(&call_words(command, params))?;
        conn.read_reply()
    }

    /// Run a command with a proplist, filters and a combining operator
    pub fn query(&mut self, command: &str, query: &Query) -> Result<Reply> {
        check_command(command)?;
        let conn = self.connection()?;
        conn.send(&query_words(command, query))?;
        conn.read_reply()
    }

    /// Start a streaming command and iterate over its replies
    ///
    /// Sends the same words as `query`.
    pub fn listen(&mut self, command: &str, query: &Query) -> Result<ReplyStream<'_>> {
        check_command(command)?;
        let conn = self.connection()?;
        let socket = conn.try_clone_stream()?;
        conn.send(&query_words(command, query))?;
        Ok(ReplyStream::new(conn, socket))
    }

    /// Start a streaming command and hand each reply's records to `f`
    ///
    /// Returns when `f` breaks, the device ends the stream, or the
    /// connection fails.
    pub fn keep_alive_call<F>(&mut self, command: &str, query: &Query, mut f: F) -> Result<()>
    where
        F: FnMut(Vec<Record>) -> ControlFlow<()>,
    {
        let stream = self.listen(command, query)?;
        for reply in stream {
            if f(reply?.sub_pairs).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn connection(&mut self) -> Result<&mut Connection> {
        match &mut self.state {
            State::Idle => Err(RouterOsError::NotConnected),
            State::Closed => Err(RouterOsError::Closed),
            State::Open(conn) if conn.is_broken() => Err(RouterOsError::ConnectionBroken),
            State::Open(conn) => Ok(conn),
        }
    }
}

/// An empty command word would be read as the sentence terminator
fn check_command(command: &str) -> Result<()> {
    if command.is_empty() {
        return Err(RouterOsError::Protocol("empty command word".to_string()));
    }
    Ok(())
}

/// Check that `address` is `host:port` with a numeric port
fn validate_address(address: &str) -> Result<()> {
    if address.parse::<SocketAddr>().is_ok() {
        return Ok(());
    }

    let invalid = || RouterOsError::InvalidAddress(address.to_string());
    let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || host.contains(':') || port.parse::<u16>().is_err() {
        return Err(invalid());
    }
    Ok(())
}
