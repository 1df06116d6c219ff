//! Word-by-word reveal of the message card.

/// Delay between consecutive words.
pub const WORD_STAGGER_S: f64 = 0.08;
/// Captions next to the tree appear one after another.
pub const CAPTION_STAGGER_S: f64 = 1.5;
pub const CAPTION_LEAD_S: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    /// Paragraph break.
    Break,
}

/// Flattens paragraphs into words separated by breaks. Empty words (double
/// spaces) are dropped; no break follows the last paragraph.
pub fn word_sequence<S: AsRef<str>>(paragraphs: &[S]) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    for (i, para) in paragraphs.iter().enumerate() {
        out.extend(
            para.as_ref()
                .split(' ')
                .filter(|w| !w.is_empty())
                .map(Token::Word),
        );
        if i + 1 < paragraphs.len() {
            out.push(Token::Break);
        }
    }
    out
}

/// Entrance delay of the `index`-th token.
pub fn stagger_delay_s(index: usize, base_delay_s: f64) -> f64 {
    base_delay_s + index as f64 * WORD_STAGGER_S
}

pub fn caption_delay_s(index: usize) -> f64 {
    index as f64 * CAPTION_STAGGER_S + CAPTION_LEAD_S
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_sequence_breaks_between_paragraphs() {
        let seq = word_sequence(&["hello  there", "second"]);
        assert_eq!(
            seq,
            vec![
                Token::Word("hello"),
                Token::Word("there"),
                Token::Break,
                Token::Word("second")
            ]
        );
    }

    #[test]
    fn test_word_sequence_empty() {
        let none: [&str; 0] = [];
        assert!(word_sequence(&none).is_empty());
        assert_eq!(word_sequence(&[" "]), vec![]);
    }

    #[test]
    fn test_delays() {
        assert!((stagger_delay_s(0, 0.5) - 0.5).abs() < 1e-12);
        assert!((stagger_delay_s(10, 0.5) - 1.3).abs() < 1e-12);
        assert_eq!(caption_delay_s(0), 2.0);
        assert_eq!(caption_delay_s(2), 5.0);
    }
}
