//! Incremental UTF-8 decoding for chunked response bodies.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("response ended in the middle of a character ({pending} trailing byte(s))")]
    Incomplete { pending: usize },
}

/// Stateful byte-to-text converter.
///
/// Network chunks may end part-way through a multi-byte character; the
/// unfinished tail is held back and completed by the next [`feed`] call.
/// Byte sequences that can never become valid UTF-8 are replaced with
/// U+FFFD, so only a truncated tail at end of stream is an error.
///
/// [`feed`]: Utf8Decoder::feed
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Decodes everything that is complete after appending `chunk`.
    pub fn feed(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut text = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));

                    match e.error_len() {
                        Some(bad) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[bad..];
                        }
                        None => {
                            rest = tail;
                            break;
                        }
                    }
                }
            }
        }

        let consumed = self.pending.len() - rest.len();
        self.pending.drain(..consumed);

        text
    }

    /// Flushes the decoder at end of stream.
    ///
    /// Leaves the decoder empty either way, so it can be reused.
    pub fn finish(&mut self) -> Result<String, DecodeError> {
        if self.pending.is_empty() {
            return Ok(String::new());
        }

        let pending = self.pending.len();
        self.pending.clear();
        Err(DecodeError::Incomplete { pending })
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
