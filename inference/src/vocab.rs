use crate::{Result, SentimentError};
use std::collections::HashMap;
use std::path::Path;

/// Reserved vocabulary entries every model variant must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialToken {
    Cls,
    Sep,
    Pad,
    Unk,
}

impl SpecialToken {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialToken::Cls => "[CLS]",
            SpecialToken::Sep => "[SEP]",
            SpecialToken::Pad => "[PAD]",
            SpecialToken::Unk => "[UNK]",
        }
    }
}

/// Immutable token -> ID map, built once per model variant and shared
/// read-only by every tokenizer that uses it.
#[derive(Debug)]
pub struct Vocabulary {
    tokens: HashMap<String, u32>,
}

impl Vocabulary {
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading vocabulary from: {:?}", path);

        let text = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::Load(format!("Failed to read vocabulary {:?}: {}", path, e))
        })?;

        let vocab = Self::parse(&text);
        if vocab.is_empty() {
            return Err(SentimentError::Load(format!(
                "Vocabulary {:?} contains no tokens",
                path
            )));
        }

        tracing::info!("Loaded {} vocabulary entries", vocab.len());
        Ok(vocab)
    }

    /// Non-empty lines get sequential IDs starting at 0; empty lines are
    /// skipped without consuming an ID.
    pub fn parse(text: &str) -> Self {
        let tokens = text
            .lines()
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(id, line)| (line.to_string(), id as u32))
            .collect();

        Self { tokens }
    }

    pub fn lookup(&self, token: &str) -> Option<u32> {
        self.tokens.get(token).copied()
    }

    /// ID of a reserved token. A vocabulary that lacks one is malformed;
    /// this is a fatal initialization error, not a per-call one.
    pub fn special_id(&self, token: SpecialToken) -> Result<u32> {
        self.lookup(token.as_str())
            .ok_or_else(|| SentimentError::MissingSpecialToken(token.as_str().to_string()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sequential_ids() {
        let vocab = Vocabulary::parse("[PAD]\n[UNK]\n[CLS]\n[SEP]\nhello\nworld\n");

        assert_eq!(vocab.len(), 6);
        assert_eq!(vocab.lookup("[PAD]"), Some(0));
        assert_eq!(vocab.lookup("[UNK]"), Some(1));
        assert_eq!(vocab.lookup("hello"), Some(4));
        assert_eq!(vocab.lookup("world"), Some(5));
        assert_eq!(vocab.lookup("missing"), None);
    }

    #[test]
    fn test_empty_lines_do_not_consume_ids() {
        let vocab = Vocabulary::parse("[PAD]\n\n[UNK]\n\n\nhello\n");

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.lookup("[UNK]"), Some(1));
        assert_eq!(vocab.lookup("hello"), Some(2));
    }

    #[test]
    fn test_special_ids() {
        let vocab = Vocabulary::parse("[PAD]\n[UNK]\n[CLS]\n[SEP]\n");

        assert_eq!(vocab.special_id(SpecialToken::Pad).unwrap(), 0);
        assert_eq!(vocab.special_id(SpecialToken::Unk).unwrap(), 1);
        assert_eq!(vocab.special_id(SpecialToken::Cls).unwrap(), 2);
        assert_eq!(vocab.special_id(SpecialToken::Sep).unwrap(), 3);
    }

    #[test]
    fn test_missing_special_token() {
        let vocab = Vocabulary::parse("[PAD]\n[UNK]\n[CLS]\nhello\n");

        let err = vocab.special_id(SpecialToken::Sep).unwrap_err();
        assert!(
            matches!(err, SentimentError::MissingSpecialToken(ref t) if t == "[SEP]"),
            "Expected MissingSpecialToken, got {:?}",
            err
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[PAD]\n[UNK]\n[CLS]\n[SEP]\nhello\n").unwrap();

        let vocab = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.lookup("hello"), Some(4));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Vocabulary::load(Path::new("/nonexistent/vocab.txt"));
        assert!(matches!(result, Err(SentimentError::Load(_))));
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let result = Vocabulary::load(file.path());
        assert!(matches!(result, Err(SentimentError::Load(_))));
    }
}
