use crate::error::ParseError;
use crate::token::{Token, TokenKind, TokenQueue, MAX_WORD_LEN, TOKEN_QUEUE_CAPACITY};

/// Classifies bytes from `line` into `tokens` until one of: the queue is
/// full, the line is exhausted, or an illegal byte is hit. Returns the
/// number of bytes consumed so the caller can drain the queue and resume
/// lexing the remainder.
pub fn lex_into(line: &[u8], tokens: &mut TokenQueue) -> Result<usize, ParseError> {
    let mut cursor = 0usize;

    while cursor < line.len() {
        if tokens.len() >= TOKEN_QUEUE_CAPACITY {
            break;
        }

        let b = line[cursor];

        if let Some(kind) = single_byte_kind(b) {
            tokens.enqueue_back(Token::simple(kind))?;
            cursor += 1;
            continue;
        }

        if b.is_ascii_alphabetic() {
            let start = cursor;
            while cursor < line.len() && line[cursor].is_ascii_alphabetic() {
                cursor += 1;
                if cursor - start > MAX_WORD_LEN {
                    return Err(ParseError::lex(
                        "lex_into",
                        format!("word exceeds {MAX_WORD_LEN} bytes at offset {start}"),
                    ));
                }
            }
            tokens.enqueue_back(Token::word(line[start..cursor].to_vec()))?;
            continue;
        }

        if b.is_ascii_digit() {
            let start = cursor;
            while cursor < line.len() && line[cursor].is_ascii_digit() {
                cursor += 1;
            }
            tokens.enqueue_back(Token::number(line[start..cursor].to_vec()))?;
            continue;
        }

        return Err(ParseError::lex(
            "lex_into",
            format!("illegal character {:?} at offset {cursor}", b as char),
        ));
    }

    Ok(cursor)
}

fn single_byte_kind(b: u8) -> Option<TokenKind> {
    Some(match b {
        b' ' => TokenKind::Space,
        b'<' => TokenKind::LtCaret,
        b'>' => TokenKind::RtCaret,
        b'/' => TokenKind::FwdSlash,
        b'=' => TokenKind::Equals,
        b'"' => TokenKind::DblQuot,
        b'\'' => TokenKind::SngQuot,
        b'!' => TokenKind::Excl,
        b'-' => TokenKind::Dash,
        b'.' => TokenKind::Period,
        b',' => TokenKind::Comma,
        b':' => TokenKind::Colon,
        b';' => TokenKind::SemiColon,
        b'(' => TokenKind::OpenParen,
        b')' => TokenKind::CloseParen,
        b'[' => TokenKind::OpenSquare,
        b']' => TokenKind::CloseSquare,
        b'_' => TokenKind::Underscore,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_a_simple_tag() {
        let mut tokens = TokenQueue::new();
        let consumed = lex_into(b"<html>", &mut tokens).unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(tokens.dequeue().unwrap().kind, TokenKind::LtCaret);
        let word = tokens.dequeue().unwrap();
        assert_eq!(word.kind, TokenKind::Word);
        assert_eq!(word.bytes, b"html");
        assert_eq!(tokens.dequeue().unwrap().kind, TokenKind::RtCaret);
        assert!(tokens.is_empty());
    }

    #[test]
    fn rejects_an_illegal_byte() {
        let mut tokens = TokenQueue::new();
        let err = lex_into(b"<a@>", &mut tokens).unwrap_err();
        assert!(matches!(err, ParseError::Lex { .. }));
    }

    #[test]
    fn rejects_an_overlong_word() {
        let mut tokens = TokenQueue::new();
        let long = "a".repeat(MAX_WORD_LEN + 1);
        let err = lex_into(long.as_bytes(), &mut tokens).unwrap_err();
        assert!(matches!(err, ParseError::Lex { .. }));
    }

    #[test]
    fn stops_at_queue_capacity_and_reports_bytes_consumed() {
        let mut tokens = TokenQueue::new();
        let line = "<".repeat(TOKEN_QUEUE_CAPACITY + 5);
        let consumed = lex_into(line.as_bytes(), &mut tokens).unwrap();
        assert_eq!(tokens.len(), TOKEN_QUEUE_CAPACITY);
        assert_eq!(consumed, TOKEN_QUEUE_CAPACITY);
    }
}
