//! Transliteration between ASCII digits and Extended Arabic-Indic
//! (Persian) digits U+06F0..U+06F9.
//!
//! A fixed ten-symbol substitution applied character by character;
//! everything that is not a digit of either script passes through
//! unchanged, so the two functions are inverses on any string.

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Replace ASCII digits with Persian-script digits.
pub fn to_persian_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                PERSIAN_DIGITS[(c as u8 - b'0') as usize]
            } else {
                c
            }
        })
        .collect()
}

/// Replace Persian-script digits with ASCII digits.
pub fn to_ascii_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match PERSIAN_DIGITS.iter().position(|&p| p == c) {
            Some(i) => (b'0' + i as u8) as char,
            None => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeral_round_trip() {
        for s in ["0123456789", "1403/01/15", "08:30", ""] {
            assert_eq!(to_ascii_digits(&to_persian_digits(s)), s);
        }
    }

    #[test]
    fn test_to_persian() {
        assert_eq!(to_persian_digits("1403"), "۱۴۰۳");
        assert_eq!(to_persian_digits("28 روز"), "۲۸ روز");
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(to_ascii_digits("۱۴۰۳/۰۱/۰۱"), "1403/01/01");
    }

    #[test]
    fn test_non_digits_pass_through() {
        assert_eq!(to_persian_digits("abc مرخصی"), "abc مرخصی");
        assert_eq!(to_ascii_digits("abc مرخصی"), "abc مرخصی");
    }
}
