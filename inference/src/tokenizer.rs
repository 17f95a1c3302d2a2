use crate::vocab::{SpecialToken, Vocabulary};
use crate::Result;
use std::sync::Arc;

/// Fixed sequence length every classifier input is padded or truncated to.
pub const MAX_SEQUENCE_LENGTH: usize = 128;

const CONTINUATION_PREFIX: &str = "##";
const UNK_TOKEN: &str = "[UNK]";

/// Tokenizer output: token IDs plus the matching attention mask, both
/// exactly `max_length` long.
#[derive(Debug, Clone)]
pub struct TokenizedInput {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

/// WordPiece tokenizer over a shared vocabulary.
///
/// Normalization is deliberately simple: lower-case, then split on single
/// spaces. The model was trained against this exact scheme, so no Unicode
/// segmentation is applied.
pub struct WordPieceTokenizer {
    vocab: Arc<Vocabulary>,
    max_length: usize,
    cls_id: u32,
    sep_id: u32,
    pad_id: u32,
    unk_id: u32,
}

impl WordPieceTokenizer {
    /// Resolves the reserved token IDs up front; a vocabulary missing any
    /// of them is rejected here, not per call.
    pub fn new(vocab: Arc<Vocabulary>, max_length: usize) -> Result<Self> {
        let cls_id = vocab.special_id(SpecialToken::Cls)?;
        let sep_id = vocab.special_id(SpecialToken::Sep)?;
        let pad_id = vocab.special_id(SpecialToken::Pad)?;
        let unk_id = vocab.special_id(SpecialToken::Unk)?;

        Ok(Self {
            vocab,
            max_length,
            cls_id,
            sep_id,
            pad_id,
            unk_id,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Convert text into a fixed-length ID sequence framed by [CLS]/[SEP].
    ///
    /// Never fails: text with no known pieces degrades to [UNK] IDs, and
    /// the empty string yields [CLS] [SEP] followed by padding. Input long
    /// enough to overflow `max_length` is cut hard, which may drop the
    /// trailing [SEP].
    pub fn tokenize(&self, text: &str) -> TokenizedInput {
        let normalized = text.to_lowercase();

        let mut ids = Vec::with_capacity(self.max_length);
        ids.push(self.cls_id);

        // Runs of spaces produce empty words which are dropped; tabs and
        // newlines are not delimiters.
        for word in normalized.split(' ').filter(|w| !w.is_empty()) {
            let whole = self.vocab.lookup(word).unwrap_or(self.unk_id);
            if whole != self.unk_id || word == UNK_TOKEN {
                ids.push(whole);
            } else {
                self.split_word(word, &mut ids);
            }
        }
        ids.push(self.sep_id);

        ids.truncate(self.max_length);
        while ids.len() < self.max_length {
            ids.push(self.pad_id);
        }

        let attention_mask = ids
            .iter()
            .map(|&id| u32::from(id != self.pad_id))
            .collect();

        TokenizedInput {
            input_ids: ids,
            attention_mask,
        }
    }

    /// Greedy longest-match-first subword split. Pieces after the first
    /// carry the ## continuation prefix. A position with no match at all
    /// emits [UNK] for that single character and the cursor moves on, so
    /// the loop finishes in at most one step per character.
    fn split_word(&self, word: &str, out: &mut Vec<u32>) {
        let chars: Vec<char> = word.chars().collect();
        let mut start = 0;

        while start < chars.len() {
            let mut matched = None;
            let mut end = chars.len();
            while end > start {
                let mut piece = String::new();
                if start > 0 {
                    piece.push_str(CONTINUATION_PREFIX);
                }
                piece.extend(&chars[start..end]);

                if let Some(id) = self.vocab.lookup(&piece) {
                    matched = Some((id, end));
                    break;
                }
                end -= 1;
            }

            match matched {
                Some((id, next)) => {
                    out.push(id);
                    start = next;
                }
                None => {
                    out.push(self.unk_id);
                    start += 1;
                }
            }
        }
    }
}
