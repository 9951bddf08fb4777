//! Parsing of `!addquote` payloads.

use thiserror::Error;

/// Why a submitted quote was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteRejection {
    #[error("no \": \" between name and text")]
    MissingSeparator,
    #[error("name must be \"Name\" or \"Name, activity\"")]
    MalformedName,
    #[error("text must not contain double quotes")]
    QuoteInText,
    #[error("name and text must not be empty")]
    EmptyField,
}

/// Split `Name[, activity]: text` into a trimmed `(name, text)` pair.
///
/// The name may carry one trailing comma (`Naam, activiteit,: ...`), which is
/// kept verbatim in the stored name.
pub fn parse_submission(raw: &str) -> Result<(String, String), QuoteRejection> {
    let (name, text) = raw
        .split_once(": ")
        .ok_or(QuoteRejection::MissingSeparator)?;

    let name = name.trim();
    let text = text.trim();
    if name.is_empty() || text.is_empty() {
        return Err(QuoteRejection::EmptyField);
    }
    if text.contains('"') {
        return Err(QuoteRejection::QuoteInText);
    }

    let mut tokens: Vec<&str> = name.split(',').collect();
    if tokens.len() > 1 && tokens.last().is_some_and(|t| t.trim().is_empty()) {
        tokens.pop();
    }
    if tokens.len() > 2 || tokens.iter().any(|t| t.trim().is_empty()) {
        return Err(QuoteRejection::MalformedName);
    }

    Ok((name.to_string(), text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(raw: &str) -> (String, String) {
        parse_submission(raw).unwrap()
    }

    #[test]
    fn bare_name() {
        assert_eq!(
            ok("  Henk :  Dat klopt niet  "),
            ("Henk".to_string(), "Dat klopt niet".to_string())
        );
    }

    #[test]
    fn name_with_activity() {
        assert_eq!(ok("Henk, tijdens college: Hallo").0, "Henk, tijdens college");
        assert_eq!(ok("Henk, tijdens college,: Hallo").0, "Henk, tijdens college,");
        assert_eq!(ok("Henk,: Hallo").0, "Henk,");
    }

    #[test]
    fn text_may_contain_separator() {
        assert_eq!(
            ok("Harm: Stelling: dit klopt").1,
            "Stelling: dit klopt".to_string()
        );
    }

    #[test]
    fn rejections() {
        assert_eq!(
            parse_submission("Henk zegt hallo"),
            Err(QuoteRejection::MissingSeparator)
        );
        assert_eq!(
            parse_submission("Henk:hallo"),
            Err(QuoteRejection::MissingSeparator)
        );
        assert_eq!(
            parse_submission("a, b, c: hallo"),
            Err(QuoteRejection::MalformedName)
        );
        assert_eq!(
            parse_submission("a,,: hallo"),
            Err(QuoteRejection::MalformedName)
        );
        assert_eq!(
            parse_submission(", b: hallo"),
            Err(QuoteRejection::MalformedName)
        );
        assert_eq!(
            parse_submission("Henk: zei \"hallo\""),
            Err(QuoteRejection::QuoteInText)
        );
        assert_eq!(parse_submission("  : hallo"), Err(QuoteRejection::EmptyField));
        assert_eq!(parse_submission("Henk:    "), Err(QuoteRejection::EmptyField));
    }

    #[test]
    fn undo_hint_round_trips() {
        for raw in ["Henk, tijdens college,: Hallo: daar", "Naam:: tekst", "X: y"] {
            let (name, text) = ok(raw);
            let hint = format!("{name}: {text}");
            assert_eq!(ok(&hint), (name, text));
        }
    }
}
