//! Scripted in-memory transport for driving session tests.
#![allow(dead_code)] // Test utility module - not all helpers used in every test
//!
//! The stub records every line the session writes and answers reads from a
//! queue of canned replies, so tests can assert the exact wire sequence and
//! inject failures (refused connections, wrong codes, a silent relay)
//! without any networking.

use std::{
    collections::VecDeque,
    io,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use seedling::smtp::{Transport, TransportError};

/// Shared view into a [`StubTransport`] that outlives the session owning it.
#[derive(Clone, Default)]
pub struct TransportLog {
    writes: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<VecDeque<Vec<u8>>>>,
    connects: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl TransportLog {
    /// Every line written so far, in order, without line terminators.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn connect_attempts(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Queue further reply codes, e.g. before a second send on the same
    /// session.
    pub fn push_replies(&self, codes: &[u16]) {
        let mut replies = self.replies.lock().unwrap();
        for code in codes {
            replies.push_back(format!("{code} stub\r\n").into_bytes());
        }
    }

    /// Queue one raw reply exactly as the relay would have sent it.
    pub fn push_raw_reply(&self, reply: &[u8]) {
        self.replies.lock().unwrap().push_back(reply.to_vec());
    }
}

/// A [`Transport`] whose relay half is a script.
pub struct StubTransport {
    log: TransportLog,
    refuse_connect: bool,
}

impl StubTransport {
    /// A transport whose relay answers with the given codes, one per read.
    /// Once the script runs out, further reads find a silent relay.
    pub fn scripted(codes: &[u16]) -> (Self, TransportLog) {
        let log = TransportLog::default();
        log.push_replies(codes);

        (
            Self {
                log: log.clone(),
                refuse_connect: false,
            },
            log,
        )
    }

    /// A transport that never gets a single byte back.
    pub fn silent() -> (Self, TransportLog) {
        Self::scripted(&[])
    }

    /// A transport whose connection attempt is refused outright.
    pub fn refusing() -> (Self, TransportLog) {
        let log = TransportLog::default();

        (
            Self {
                log: log.clone(),
                refuse_connect: true,
            },
            log,
        )
    }
}

impl Transport for StubTransport {
    async fn connect(&mut self, _host: &str, _port: u16) -> Result<(), TransportError> {
        self.log.connects.fetch_add(1, Ordering::SeqCst);

        if self.refuse_connect {
            Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        } else {
            Ok(())
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.log.writes.lock().unwrap().push(line.to_string());
        Ok(())
    }

    async fn read_available(&mut self, _wait: Duration) -> Result<Vec<u8>, TransportError> {
        Ok(self
            .log
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn close(&mut self) {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
    }
}
