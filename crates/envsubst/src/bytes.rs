//! Byte input that is not valid UTF-8.
//!
//! The pipeline works on `str`, so invalid bytes travel through it as
//! characters from a 256-character private-use block that appears nowhere
//! in the input or in the store values. Every character of that block in
//! the output is turned back into its byte, so invalid sequences come out
//! exactly as they went in.

use envsubst_eval::Env;

/// First code point of Supplementary Private Use Area-A.
const PRIVATE_USE_START: u32 = 0xF_0000;

/// 256-character blocks in planes 15 and 16.
const BLOCKS: usize = 512;

/// Maps invalid bytes into one private-use block and back.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteEscape {
    base: u32,
}

impl ByteEscape {
    /// Pick a block that no character of `input` or of the values in `env`
    /// falls into. `None` when every block is taken.
    pub(crate) fn for_input(input: &[u8], env: &Env) -> Option<Self> {
        let mut used = [false; BLOCKS];
        let mut mark = |text: &str| {
            for c in text.chars() {
                if let Some(offset) = (c as u32).checked_sub(PRIVATE_USE_START) {
                    used[(offset >> 8) as usize] = true;
                }
            }
        };
        for chunk in input.utf8_chunks() {
            mark(chunk.valid());
        }
        for (_, value) in env.iter() {
            mark(value);
        }

        let block = used.iter().position(|taken| !taken)?;
        Some(Self {
            base: PRIVATE_USE_START + ((block as u32) << 8),
        })
    }

    /// Decode `input`, replacing each invalid byte with its escape character.
    pub(crate) fn decode(self, input: &[u8]) -> String {
        let mut out = String::with_capacity(input.len());
        for chunk in input.utf8_chunks() {
            out.push_str(chunk.valid());
            out.extend(chunk.invalid().iter().map(|&b| self.escape(b)));
        }
        out
    }

    /// Encode `text`, turning escape characters back into their bytes.
    pub(crate) fn encode(self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        let mut buf = [0; 4];
        for c in text.chars() {
            match (c as u32).checked_sub(self.base) {
                Some(offset) if offset < 256 => out.push(offset as u8),
                _ => out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
            }
        }
        out
    }

    fn escape(self, byte: u8) -> char {
        char::from_u32(self.base + u32::from(byte)).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}
