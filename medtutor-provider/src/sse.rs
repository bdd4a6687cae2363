//! Incremental decoder for `text/event-stream` bodies.
//!
//! Only `data:` fields are kept; event names, ids and comments are ignored.

/// Buffers raw bytes and yields the `data` payload of each complete event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    // Bytes before this offset hold no event boundary
    scanned: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning payloads of the events completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some((end, sep_len)) = next_boundary(&self.buffer, self.scanned) {
            let event: Vec<u8> = self.buffer.drain(..end + sep_len).take(end).collect();
            self.scanned = 0;
            if let Some(payload) = event_data(&event) {
                payloads.push(payload);
            }
        }
        // A separator may straddle the next chunk
        self.scanned = self.buffer.len().saturating_sub(3);
        payloads
    }

    /// Flush a trailing event that was not followed by a blank line
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        event_data(&rest)
    }
}

fn next_boundary(buf: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buf.len()).find_map(|i| {
        if buf[i..].starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else if buf[i..].starts_with(b"\n\n") {
            Some((i, 2))
        } else {
            None
        }
    })
}

fn event_data(event: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(event);

    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .collect();

    if data.is_empty() {
        return None;
    }

    let payload = data.join("\n");
    if payload.trim().is_empty() || payload.trim() == "[DONE]" {
        None
    } else {
        Some(payload)
    }
}
