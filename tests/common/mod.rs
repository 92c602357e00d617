//! Log capture for integration tests.

use std::io;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// One formatted log line: the emitting target and the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub target: String,
    pub message: String,
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a scoped INFO-level subscriber and returns what it logged.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<Line>) {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(true)
        .without_time()
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.0.lock().unwrap().clone();
    let lines = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .filter_map(parse_line)
        .collect();
    (out, lines)
}

/// Only the messages, in order.
pub fn messages(lines: &[Line]) -> Vec<&str> {
    lines.iter().map(|l| l.message.as_str()).collect()
}

/// Parses `" INFO target: message"`.
fn parse_line(line: &str) -> Option<Line> {
    let rest = line.trim_start();
    let (_level, rest) = rest.split_once(' ')?;
    let (target, message) = rest.trim_start().split_once(": ")?;
    Some(Line { target: target.to_owned(), message: message.to_owned() })
}
