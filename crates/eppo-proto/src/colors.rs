//! IRC formatting code handling.
//!
//! Relayed stream items are decorated with a colour so they stand out from
//! regular chat, and text coming from outside the channel is stripped of any
//! formatting it carries before it is relayed.
//!
//! # IRC Format Codes
//! - 0x02 (^B): Bold
//! - 0x03 (^C): Color (followed by optional foreground,background)
//! - 0x0F (^O): Reset all formatting
//! - 0x16 (^V): Reverse/Inverse
//! - 0x1D (^]): Italic
//! - 0x1F (^_): Underline

use std::borrow::Cow;
use std::fmt;

const COLOR: char = '\x03';
const RESET: char = '\x0F';

/// IRC format control characters.
const FORMAT_CHARS: &[char] = &['\x02', COLOR, RESET, '\x16', '\x1D', '\x1F'];

/// The 16 colours of the mIRC palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Color {
    White = 0,
    Black = 1,
    Blue = 2,
    Green = 3,
    Red = 4,
    Brown = 5,
    Magenta = 6,
    Orange = 7,
    Yellow = 8,
    LightGreen = 9,
    Cyan = 10,
    LightCyan = 11,
    LightBlue = 12,
    Pink = 13,
    Grey = 14,
    LightGrey = 15,
}

impl Color {
    /// Look up a palette entry by its number.
    pub fn from_code(code: u8) -> Option<Self> {
        use Color::*;
        const PALETTE: [Color; 16] = [
            White, Black, Blue, Green, Red, Brown, Magenta, Orange, Yellow, LightGreen, Cyan,
            LightCyan, LightBlue, Pink, Grey, LightGrey,
        ];
        PALETTE.get(usize::from(code)).copied()
    }

    /// Wrap `text` in this colour, resetting formatting afterwards.
    ///
    /// The code is always written with two digits so text starting with a
    /// digit is not swallowed into the colour number.
    pub fn paint(self, text: &str) -> String {
        format!("{COLOR}{:02}{text}{RESET}", self as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", *self as u8)
    }
}

/// Extension trait for handling formatted IRC strings.
pub trait FormattedStringExt<'a> {
    /// Check if the string contains any IRC formatting codes.
    fn is_formatted(&self) -> bool;

    /// Strip all IRC formatting codes from the string.
    ///
    /// Returns `Cow::Borrowed` if no formatting was present.
    fn strip_formatting(self) -> Cow<'a, str>;
}

impl<'a> FormattedStringExt<'a> for &'a str {
    fn is_formatted(&self) -> bool {
        self.contains(FORMAT_CHARS)
    }

    fn strip_formatting(self) -> Cow<'a, str> {
        if !self.is_formatted() {
            return Cow::Borrowed(self);
        }

        let mut result = String::with_capacity(self.len());
        let mut chars = self.chars().peekable();
        while let Some(c) = chars.next() {
            if c == COLOR {
                skip_color_spec(&mut chars);
            } else if !FORMAT_CHARS.contains(&c) {
                result.push(c);
            }
        }
        Cow::Owned(result)
    }
}

/// Consume the `fg[,bg]` digits that may follow a colour code.
fn skip_color_spec(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    if skip_digits(chars) == 0 {
        return;
    }
    let mut lookahead = chars.clone();
    if lookahead.next() == Some(',') && lookahead.peek().is_some_and(char::is_ascii_digit) {
        chars.next();
        skip_digits(chars);
    }
}

fn skip_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> usize {
    let mut taken = 0;
    while taken < 2 && chars.next_if(char::is_ascii_digit).is_some() {
        taken += 1;
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_formatted() {
        assert!("\x02bold\x02".is_formatted());
        assert!("\x034red\x03".is_formatted());
        assert!(!"plain text".is_formatted());
    }

    #[test]
    fn test_strip_basic() {
        assert_eq!("\x02bold\x02".strip_formatting(), "bold");
        assert_eq!("\x1Funderline".strip_formatting(), "underline");
    }

    #[test]
    fn test_strip_colors() {
        assert_eq!("\x034red".strip_formatting(), "red");
        assert_eq!("\x0304red".strip_formatting(), "red");
        assert_eq!("\x034,5colored".strip_formatting(), "colored");
        assert_eq!("\x0310,12both".strip_formatting(), "both");
        assert_eq!("\x034,text".strip_formatting(), ",text");
        assert_eq!("\x03plain".strip_formatting(), "plain");
    }

    #[test]
    fn test_no_formatting() {
        match "plain text".strip_formatting() {
            Cow::Borrowed(b) => assert_eq!(b, "plain text"),
            Cow::Owned(_) => panic!("expected borrowed"),
        }
    }

    #[test]
    fn test_paint_round_trips_through_strip() {
        let painted = Color::Cyan.paint("[@eppo] 3 walvissen");
        assert_eq!(painted, "\x0310[@eppo] 3 walvissen\x0F");
        assert_eq!(painted.as_str().strip_formatting(), "[@eppo] 3 walvissen");
    }

    #[test]
    fn test_paint_pads_single_digit_codes() {
        assert_eq!(Color::Red.paint("5 alarm"), "\x03045 alarm\x0F");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Color::from_code(10), Some(Color::Cyan));
        assert_eq!(Color::from_code(0), Some(Color::White));
        assert_eq!(Color::from_code(16), None);
    }
}
