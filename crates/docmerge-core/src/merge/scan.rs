//! Token scanning
//!
//! Finds `«Name»` spans in a flat text view using an explicit state
//! machine rather than a pattern match, so spans stay byte-accurate for
//! mapping back onto fragment boundaries.

const OPEN: char = '«';
const CLOSE: char = '»';

/// One `«Name»` occurrence, as byte offsets into the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenSpan {
    /// Offset of the opening delimiter
    pub start: usize,
    /// Offset just past the closing delimiter
    pub end: usize,
    pub name_start: usize,
    pub name_end: usize,
}

/// Scanner state
///
/// ```text
/// Text ──«──> InToken ──»──> [yield span] → Text
///   │            │
///   │ (other)    │ «: restart (earlier open had no close)
///   └───────────>│ (other): accumulate name
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Text,
    InToken { start: usize },
}

/// Scan `text` and return every token span in order.
///
/// An opening delimiter without a close is left as literal text; a second
/// opening delimiter restarts the token. Names are matched exactly, with
/// no trimming.
pub(crate) fn scan_tokens(text: &str) -> Vec<TokenSpan> {
    let mut state = ScanState::Text;
    let mut tokens = Vec::new();

    for (i, ch) in text.char_indices() {
        match state {
            ScanState::Text => {
                if ch == OPEN {
                    state = ScanState::InToken { start: i };
                }
            }
            ScanState::InToken { start } => {
                if ch == CLOSE {
                    tokens.push(TokenSpan {
                        start,
                        end: i + CLOSE.len_utf8(),
                        name_start: start + OPEN.len_utf8(),
                        name_end: i,
                    });
                    state = ScanState::Text;
                } else if ch == OPEN {
                    state = ScanState::InToken { start: i };
                }
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        scan_tokens(text)
            .iter()
            .map(|t| text[t.name_start..t.name_end].to_string())
            .collect()
    }

    #[test]
    fn test_scan_single_token() {
        let text = "Dear «PI», welcome";
        let tokens = scan_tokens(text);
        assert_eq!(tokens.len(), 1);
        assert_eq!(&text[tokens[0].start..tokens[0].end], "«PI»");
        assert_eq!(names(text), vec!["PI"]);
    }

    #[test]
    fn test_scan_multiple_tokens_in_order() {
        assert_eq!(names("«A» and «B» and «A»"), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_scan_unclosed_token_is_literal() {
        assert!(scan_tokens("no close «here").is_empty());
    }

    #[test]
    fn test_scan_reopen_restarts_token() {
        // The first « never closes; the second one does
        assert_eq!(names("««Name»"), vec!["Name"]);
    }

    #[test]
    fn test_scan_empty_name() {
        let tokens = scan_tokens("«»");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name_start, tokens[0].name_end);
    }

    #[test]
    fn test_scan_no_tokens() {
        assert!(scan_tokens("plain text, no delimiters").is_empty());
    }

    #[test]
    fn test_scan_spans_are_byte_accurate() {
        let text = "é«X»é";
        let tokens = scan_tokens(text);
        assert_eq!(&text[tokens[0].start..tokens[0].end], "«X»");
    }
}
