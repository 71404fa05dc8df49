//! Incremental Server-Sent Events decoding for streamed completions.
//!
//! Bytes arrive in arbitrary network chunks; the decoder buffers partial lines
//! and yields one [`SseEvent`] per blank-line-terminated event.

use bytes::Bytes;
use std::collections::VecDeque;

/// Sentinel payload OpenAI-style servers send after the last chunk.
pub const DONE_SENTINEL: &[u8] = b"[DONE]";

/// A single decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type (optional)
    pub event: Option<String>,
    /// `data:` lines joined with `\n`
    pub data: Bytes,
}

impl SseEvent {
    pub fn data(data: impl Into<Bytes>) -> Self {
        Self {
            event: None,
            data: data.into(),
        }
    }

    /// True for the `[DONE]` terminator.
    pub fn is_done(&self) -> bool {
        self.data.as_ref() == DONE_SENTINEL
    }
}

/// Line-oriented SSE decoder that tolerates chunk boundaries anywhere,
/// including between `\r` and `\n`.
#[derive(Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data_lines: Vec<String>,
    ready: VecDeque<SseEvent>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and drain every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> impl Iterator<Item = SseEvent> + '_ {
        self.buffer.extend_from_slice(chunk);
        let mut consumed = 0;
        while let Some((line_end, next)) = next_line(&self.buffer[consumed..]) {
            let line = String::from_utf8_lossy(&self.buffer[consumed..consumed + line_end])
                .into_owned();
            consumed += next;
            self.handle_line(&line);
        }
        self.buffer.drain(..consumed);
        self.ready.drain(..)
    }

    /// True if a partial line or an undelivered event is pending.
    pub fn has_buffered_data(&self) -> bool {
        !self.buffer.is_empty() || !self.data_lines.is_empty()
    }

    /// Flush at end of stream.
    ///
    /// Servers often close right after the last `data:` line without the
    /// terminating blank line; that event is still delivered.
    pub fn finish(&mut self) -> impl Iterator<Item = SseEvent> + '_ {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            let line = line.trim_end_matches('\r').to_string();
            self.handle_line(&line);
        }
        self.dispatch();
        self.ready.drain(..)
    }

    fn handle_line(&mut self, line: &str) {
        if line.is_empty() {
            self.dispatch();
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data_lines.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            _ => {}
        }
    }

    fn dispatch(&mut self) {
        if self.data_lines.is_empty() {
            self.event = None;
            return;
        }
        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        self.ready.push_back(SseEvent {
            event: self.event.take(),
            data: Bytes::from(data),
        });
    }
}

/// Locate the first complete line: (length without terminator, offset of next line).
/// A trailing lone `\r` is held back until we know whether `\n` follows.
fn next_line(buf: &[u8]) -> Option<(usize, usize)> {
    for (idx, byte) in buf.iter().enumerate() {
        match byte {
            b'\n' => return Some((idx, idx + 1)),
            b'\r' => {
                let following = buf.get(idx + 1)?;
                let skip = if *following == b'\n' { 2 } else { 1 };
                return Some((idx, idx + skip));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
#[path = "../tests/decoder_tests.rs"]
mod decoder_tests;
