// Text Codec
// Maps letters A-Z to two-digit indices 00-25 and back

/// Number of symbols in the alphabet (A=00 ... Z=25)
pub const ALPHABET_LEN: u8 = 26;

/// Decimal digits used per letter
pub const DIGITS_PER_LETTER: usize = 2;

// Letters whose full uppercase form is a single A-Z, so `ı` and `ſ` count as I and S
fn letter_index(c: char) -> Option<u8> {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u @ 'A'..='Z'), None) => Some(u as u8 - b'A'),
        _ => None,
    }
}

/// Convert text to its digit string, two digits per letter.
///
/// Anything outside A-Z (after uppercasing) is dropped, so the output may
/// describe fewer letters than the input had characters.
pub fn encode(text: &str) -> String {
    text.chars()
        .filter_map(letter_index)
        .map(|index| format!("{index:02}"))
        .collect()
}

/// Convert a digit string back to uppercase text.
///
/// Pairs outside 00-25, pairs that are not two ASCII digits, and a trailing
/// odd digit are skipped.
pub fn decode(digits: &str) -> String {
    digits
        .as_bytes()
        .chunks_exact(DIGITS_PER_LETTER)
        .filter_map(|pair| match pair {
            [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => Some((tens - b'0') * 10 + (ones - b'0')),
            _ => None,
        })
        .filter(|&index| index < ALPHABET_LEN)
        .map(|index| char::from(b'A' + index))
        .collect()
}

/// Keep only the encodable letters, uppercased.
/// Returns the cleaned text and whether it differs from the input.
pub fn clean_text(text: &str) -> (String, bool) {
    let cleaned: String = text
        .chars()
        .filter_map(letter_index)
        .map(|index| char::from(b'A' + index))
        .collect();
    let modified = cleaned != text;
    (cleaned, modified)
}
