//! Line records and word tokens derived from a fetched ang.

use uuid::Uuid;

/// One renderable line of an ang. `primary_text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub id: Option<String>,
    pub dom_id: String,
    pub primary_text: String,
    pub secondary_text: Option<String>,
}

impl LineRecord {
    /// Returns `None` when there is no primary text to render.
    pub fn new(
        id: Option<String>,
        primary_text: String,
        secondary_text: Option<String>,
    ) -> Option<Self> {
        if primary_text.is_empty() {
            return None;
        }

        let dom_id = id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        Some(Self {
            id,
            dom_id,
            primary_text,
            secondary_text: secondary_text.filter(|text| !text.is_empty()),
        })
    }

    pub fn words(&self) -> Vec<WordToken> {
        tokenize(&self.primary_text)
    }
}

/// A single addressable word of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    pub index: usize,
    pub text: String,
}

/// Split on literal spaces, dropping empty tokens. Other whitespace stays
/// inside the token.
pub fn tokenize(text: &str) -> Vec<WordToken> {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(index, word)| WordToken {
            index,
            text: word.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_assigns_zero_based_positions() {
        let words = tokenize("ਸਤਿ ਨਾਮੁ");
        assert_eq!(
            words,
            vec![
                WordToken {
                    index: 0,
                    text: "ਸਤਿ".to_string()
                },
                WordToken {
                    index: 1,
                    text: "ਨਾਮੁ".to_string()
                },
            ]
        );
    }

    #[test]
    fn tokenize_skips_repeated_spaces() {
        let words = tokenize("  ੴ   ਸਤਿ ");
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["ੴ", "ਸਤਿ"]);
        assert_eq!(words[1].index, 1);
    }

    #[test]
    fn record_without_primary_text_is_rejected() {
        assert!(LineRecord::new(Some("1".into()), String::new(), None).is_none());
    }

    #[test]
    fn missing_id_gets_generated_dom_id() {
        let record = LineRecord::new(None, "ਨਾਮੁ".into(), Some(String::new())).expect("record");
        assert!(record.id.is_none());
        assert_eq!(record.dom_id.len(), 32);
        assert!(record.secondary_text.is_none());
    }
}
