//! Prompt Truncator — bounds text to a token budget by keeping a prefix.
//!
//! Tokens are counted with `cl100k_base`, the encoding of the completion model.
//! Truncation drops trailing tokens; it never summarizes or pads.

use std::sync::Arc;

use tiktoken_rs::CoreBPE;

/// Ceiling for a single outbound request, slightly below the model's context window.
pub const GLOBAL_TOKEN_BUDGET: usize = 16_000;

#[derive(Clone)]
pub struct Truncator {
    bpe: Arc<CoreBPE>,
}

impl Truncator {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            bpe: Arc::new(tiktoken_rs::cl100k_base()?),
        })
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Returns `text` unchanged if it fits in `max_tokens`, otherwise the
    /// decoding of its first `max_tokens` tokens.
    ///
    /// A cut that lands inside a multi-byte character backs off to the last
    /// token boundary that decodes cleanly, so the result is always a valid
    /// prefix and never over budget.
    pub fn truncate(&self, text: &str, max_tokens: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return text.to_owned();
        }

        let mut end = max_tokens;
        loop {
            match self.bpe.decode(tokens[..end].to_vec()) {
                Ok(prefix) => return prefix,
                Err(_) if end > 0 => end -= 1,
                Err(_) => return String::new(),
            }
        }
    }
}

/// One tokenizer per test binary; building the BPE tables is not free.
#[cfg(test)]
pub(crate) fn test_truncator() -> Truncator {
    use std::sync::OnceLock;
    static SHARED: OnceLock<Truncator> = OnceLock::new();
    SHARED
        .get_or_init(|| Truncator::new().expect("cl100k_base should load"))
        .clone()
}
