//! Incremental `text/event-stream` decoder.
//!
//! Chunks arrive at arbitrary boundaries, including in the middle of a UTF-8
//! sequence, so bytes are buffered until a blank line closes an event.

use tracing::warn;

/// Largest event the decoder will buffer. Anything bigger is discarded up to
/// its closing blank line.
const MAX_PENDING: usize = 1 << 20;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field; `None` means the default `message` type.
    pub event: Option<String>,
    /// `data:` lines joined with `\n`.
    pub data: String,
    pub id: Option<String>,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to hold no blank line.
    scanned: usize,
    /// Dropping the rest of an oversized event.
    discarding: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));

        let mut events = Vec::new();
        loop {
            // Back up one byte: the boundary may straddle two chunks.
            let from = self.scanned.saturating_sub(1);
            let Some(offset) = self.buffer[from..].windows(2).position(|w| w == b"\n\n") else {
                self.scanned = self.buffer.len();
                break;
            };
            let end = from + offset;
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            self.scanned = 0;
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if let Some(event) = parse_block(&String::from_utf8_lossy(&block[..end])) {
                events.push(event);
            }
        }

        if self.buffer.len() > MAX_PENDING {
            warn!(pending = self.buffer.len(), "Oversized hub event discarded");
            let keep = self.buffer.len() - 1;
            self.buffer.drain(..keep);
            self.scanned = self.buffer.len();
            self.discarding = true;
        }
        events
    }

    /// Bytes received but not yet part of a complete event.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn parse_block(block: &str) -> Option<SseEvent> {
    let mut event = None;
    let mut id = None;
    let mut data: Option<String> = None;

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_owned()),
            "id" => id = Some(value.to_owned()),
            "data" => match &mut data {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(value);
                }
                None => data = Some(value.to_owned()),
            },
            _ => {}
        }
    }

    Some(SseEvent {
        event,
        data: data?,
        id,
    })
}
