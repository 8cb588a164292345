//! Word wrapping by display width.
//!
//! Breaks at word boundaries; a word wider than the row is split between
//! graphemes.  Widths are terminal cells, so double-width characters count
//! as two.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Wrap `text` into rows of at most `width` cells.  Always returns at least
/// one row.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_word_bounds() {
        let word_width = word.width();
        let is_space = word.chars().all(char::is_whitespace);

        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if is_space {
            // Whitespace at the break is dropped rather than carried over.
            rows.push(std::mem::take(&mut current));
            current_width = 0;
            continue;
        }

        if word_width <= width {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        // Too long for any row: fill the current row, then split it.
        for grapheme in word.graphemes(true) {
            let g_width = grapheme.width();
            if current_width + g_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += g_width;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_between_words() {
        assert_eq!(wrap_words("hello big world", 9), vec!["hello big", "world"]);
        assert_eq!(wrap_words("hello big world", 5), vec!["hello", "big ", "world"]);
    }

    #[test]
    fn splits_words_longer_than_the_row() {
        assert_eq!(wrap_words("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_words("ab cdefgh", 4), vec!["ab c", "defg", "h"]);
    }

    #[test]
    fn measures_wide_characters_in_cells() {
        let rows = wrap_words("日本語テキスト", 4);
        assert_eq!(rows, vec!["日本", "語テ", "キス", "ト"]);
        assert!(rows.iter().all(|r| r.width() <= 4));
    }

    #[test]
    fn empty_text_is_one_empty_row() {
        assert_eq!(wrap_words("", 10), vec![String::new()]);
    }
}
