//! Word extraction for pHash input text.
//!
//! Text is uppercased first so hashing is case-insensitive. A token is a
//! maximal run of word characters: letters, non-spacing marks, dash and
//! apostrophe variants, and ASCII digits. Scripts written without spaces
//! between words (Han, kana, Thai and friends) have no usable word boundary,
//! so each of their letters is a token of its own.

use unicode_categories::UnicodeCategories;

/// Tokenize `text` into uppercased word-like units.
///
/// Never fails; empty, whitespace-only and punctuation-only input yield an
/// empty vector. Dashes and apostrophes only glue words together, so they are
/// trimmed from the ends of a token and a run made only of them is dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    let mut tokens = Vec::with_capacity(upper.len() / 5 + 1);
    let mut current = String::new();
    // True while `current` holds a single unspaced-script letter, which may
    // still absorb trailing combining marks.
    let mut current_is_glyph = false;

    for ch in upper.chars() {
        if is_unspaced_letter(ch) {
            flush(&mut tokens, &mut current);
            current.push(ch);
            current_is_glyph = true;
        } else if current_is_glyph && ch.is_mark_nonspacing() {
            current.push(ch);
        } else if is_word_char(ch) {
            if current_is_glyph {
                flush(&mut tokens, &mut current);
                current_is_glyph = false;
            }
            current.push(ch);
        } else {
            flush(&mut tokens, &mut current);
            current_is_glyph = false;
        }
    }
    flush(&mut tokens, &mut current);

    tokens
}

/// Emit the pending run as a token, if anything remains after trimming.
fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    let trimmed = current.trim_matches(is_joiner);
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
    current.clear();
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch.is_letter() || ch.is_mark_nonspacing() || is_joiner(ch)
}

/// Dash and apostrophe variants allowed inside a word.
fn is_joiner(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}' | '`') || ch.is_punctuation_dash()
}

/// Letters of scripts that do not separate words with spaces.
fn is_unspaced_letter(ch: char) -> bool {
    let unspaced = matches!(
        ch as u32,
        0x0E00..=0x0EFF     // Thai, Lao
        | 0x1000..=0x109F   // Myanmar
        | 0x1780..=0x17FF   // Khmer
        | 0x3005..=0x3007   // ideographic iteration / closing marks
        | 0x3040..=0x30FF   // Hiragana, Katakana
        | 0x31F0..=0x31FF   // Katakana phonetic extensions
        | 0x3400..=0x4DBF   // CJK extension A
        | 0x4E00..=0x9FFF   // CJK unified ideographs
        | 0xF900..=0xFAFF   // CJK compatibility ideographs
        | 0x20000..=0x3134F // CJK extensions B-G
    );
    unspaced && ch.is_letter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("The quick brown fox jumped over the black fence."),
            vec!["THE", "QUICK", "BROWN", "FOX", "JUMPED", "OVER", "THE", "BLACK", "FENCE"]
        );
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("!!! ... ??? --- ''").is_empty());
        assert_eq!(tokenize("![image](cat.png)"), vec!["IMAGE", "CAT", "PNG"]);
    }

    #[test]
    fn keeps_apostrophes_and_hyphens_inside_words() {
        assert_eq!(
            tokenize("don't stop the well-known rock\u{2019}n\u{2019}roll"),
            vec!["DON'T", "STOP", "THE", "WELL-KNOWN", "ROCK\u{2019}N\u{2019}ROLL"]
        );
    }

    #[test]
    fn trims_edge_joiners() {
        assert_eq!(tokenize("-dash- 'quoted'"), vec!["DASH", "QUOTED"]);
    }

    #[test]
    fn digits_are_word_characters() {
        assert_eq!(tokenize("route 66, 2024-01-02"), vec!["ROUTE", "66", "2024-01-02"]);
    }

    #[test]
    fn combining_marks_stay_attached() {
        assert_eq!(tokenize("cafe\u{0301} au lait"), vec!["CAFE\u{0301}", "AU", "LAIT"]);
    }

    #[test]
    fn non_latin_spaced_scripts_keep_words() {
        assert_eq!(tokenize("привет мир"), vec!["ПРИВЕТ", "МИР"]);
    }

    #[test]
    fn cjk_characters_are_single_tokens() {
        assert_eq!(tokenize("你的脸，上"), vec!["你", "的", "脸", "上"]);
        assert_eq!(tokenize("abc漢字def"), vec!["ABC", "漢", "字", "DEF"]);
    }

    #[test]
    fn full_uppercase_mapping() {
        assert_eq!(tokenize("straße"), vec!["STRASSE"]);
    }
}
