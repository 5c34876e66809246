//! Streaming replies
//!
//! Pulls replies of a long-running command (e.g. `/interface/listen`) one
//! sentence at a time.

use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::Connection;
use crate::error::Result;
use crate::protocol::{ParseMode, Progress, Reply, ReplyParser};

const ARMED: u8 = 0;
const STOPPED: u8 = 1;
const DISARMED: u8 = 2;

/// Cancels a `ReplyStream` from another thread
///
/// Stopping shuts the socket down, which wakes a blocked read. The
/// connection cannot be reused afterwards. Once the stream has ended
/// cleanly the handle is disarmed and `stop` does nothing.
#[derive(Clone)]
pub struct StopHandle {
    inner: Arc<StopInner>,
}

struct StopInner {
    state: AtomicU8,
    stream: TcpStream,
}

impl StopHandle {
    fn new(stream: TcpStream) -> Self {
        Self {
            inner: Arc::new(StopInner {
                state: AtomicU8::new(ARMED),
                stream,
            }),
        }
    }

    /// Signal the stream to stop and unblock any pending read
    pub fn stop(&self) -> Result<()> {
        if self
            .inner
            .state
            .compare_exchange(ARMED, STOPPED, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        tracing::debug!("Stopping reply stream");
        match self.inner.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.state.load(Ordering::SeqCst) == STOPPED
    }

    /// Detach the handle from a cleanly ended stream
    ///
    /// Returns false when a stop already won the race.
    fn disarm(&self) -> bool {
        self.inner
            .state
            .compare_exchange(ARMED, DISARMED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Iterator over the replies of a streaming command
///
/// Yields one `Reply` per sentence. Ends with `None` when the device
/// closes the stream with `!done` or a `StopHandle` fires; a transport
/// failure is yielded once as `Err` and then the stream ends.
///
/// Dropping the stream before it ended leaves unread replies on the wire,
/// so the connection is marked broken.
pub struct ReplyStream<'a> {
    conn: &'a mut Connection,
    parser: ReplyParser,
    stop: StopHandle,
    finished: bool,
    in_sync: bool,
}

impl<'a> ReplyStream<'a> {
    /// `socket` is a clone of the connection's socket, taken before the
    /// command was sent
    pub(crate) fn new(conn: &'a mut Connection, socket: TcpStream) -> Self {
        Self {
            conn,
            parser: ReplyParser::new(ParseMode::Continuous),
            stop: StopHandle::new(socket),
            finished: false,
            in_sync: false,
        }
    }

    /// Handle that cancels this stream
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// True once the stream yields no more replies
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn next_reply(&mut self) -> Option<Result<Reply>> {
        loop {
            if self.stop.is_stopped() {
                self.finished = true;
                return None;
            }

            let word = match self.conn.read_word() {
                Ok(word) => word,
                Err(e) => {
                    self.finished = true;
                    if self.stop.is_stopped() {
                        return None;
                    }
                    return Some(Err(e));
                }
            };

            match self.parser.push(&word) {
                Progress::Pending => continue,
                Progress::Reply(reply) => return Some(Ok(reply)),
                Progress::Finished => {
                    self.finished = true;
                    if self.stop.disarm() {
                        tracing::debug!("Reply stream from {} finished", self.conn.peer_addr());
                        self.in_sync = true;
                    }
                    return None;
                }
            }
        }
    }
}

impl Iterator for ReplyStream<'_> {
    type Item = Result<Reply>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.next_reply()
    }
}

impl Drop for ReplyStream<'_> {
    fn drop(&mut self) {
        if !self.in_sync {
            self.conn.mark_broken();
        }
    }
}
