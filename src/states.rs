//! The parse-state table: one handler per `ParseState`, dispatched by
//! [`dispatch`]. Each handler consumes at most one token from the front of
//! the token queue, mutates the DOM builder, and schedules its successor(s)
//! by tag, never by function pointer. A handler that consumed `current` but
//! cannot route on an absent `next` enqueues its resume twin at the front of
//! the state queue and returns `Suspend`; the twin re-peeks `next` once the
//! scheduler's loop invariant (`tokens.peek()` is `Some`) guarantees it has
//! arrived.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{self, AttrHandle, DomAttr};
use crate::error::ParseError;
use crate::parser::{Parser, StepResult};
use crate::state_queue::ParseState;
use crate::token::TokenKind;

pub(crate) fn dispatch(p: &mut Parser, state: ParseState) -> Result<StepResult, ParseError> {
    match state {
        ParseState::TagOpen => tag_open(p),
        ParseState::ResumeTagOpen(current_kind) => resume_tag_open(p, current_kind),
        ParseState::TagName => tag_name(p),
        ParseState::ResumeTagName => resume_tag_name(p),
        ParseState::AttributeName => attribute_name(p),
        ParseState::ResumeAttributeName => resume_attribute_name(p),
        ParseState::AttributeValue => attribute_value(p),
        ParseState::ResumeAttributeValue => resume_attribute_value(p),
        ParseState::TagClose => tag_close(p),
        ParseState::ResumeTagClose => resume_tag_close(p),
        ParseState::ElmClose => elm_close(p),
        ParseState::ResumeElmClose => resume_elm_close(p),
        ParseState::Doctype => doctype(p),
        ParseState::ResumeDoctype => resume_doctype(p),
        ParseState::ElmBody => elm_body(p),
        ParseState::ResumeElmBody => resume_elm_body(p),
    }
}

fn unexpected(at: &str, slot: &str, kind: TokenKind) -> ParseError {
    ParseError::syntax(at, format!("unexpected {slot} token {kind:?}"))
}

// --- tag_open ---------------------------------------------------------

fn tag_open(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("tag_open")?;
    match current.kind {
        TokenKind::LtCaret | TokenKind::Space => {}
        other => return Err(unexpected("tag_open", "current", other)),
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeTagOpen(current.kind))?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_tag_open(p, current.kind, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_tag_open(p: &mut Parser, current_kind: TokenKind) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_tag_open", "missing next token"))?;
    route_tag_open(p, current_kind, next_kind)?;
    Ok(StepResult::Done)
}

/// `<` followed directly by `/` or `!` never opens a node of its own: the
/// caret belongs to the end tag or doctype that follows.
fn route_tag_open(p: &mut Parser, current_kind: TokenKind, next_kind: TokenKind) -> Result<(), ParseError> {
    match next_kind {
        TokenKind::FwdSlash => p.states.enqueue_back(ParseState::ElmClose),
        TokenKind::Excl => p.states.enqueue_back(ParseState::Doctype),
        TokenKind::LtCaret | TokenKind::Space => {
            if current_kind == TokenKind::LtCaret {
                p.nodes.push(crate::dom::DomNode::new_handle())?;
            }
            p.states.enqueue_back(ParseState::TagOpen)
        }
        TokenKind::Word => {
            if current_kind == TokenKind::LtCaret {
                p.nodes.push(crate::dom::DomNode::new_handle())?;
            }
            p.states.enqueue_back(ParseState::TagName)
        }
        other => Err(unexpected("tag_open", "next", other)),
    }
}

// --- tag_name -----------------------------------------------------------

fn tag_name(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("tag_name")?;
    match current.kind {
        TokenKind::Word => {
            p.current_node()?.borrow_mut().append_name(&current.bytes);
        }
        other => return Err(unexpected("tag_name", "current", other)),
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeTagName)?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_tag_name(p, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_tag_name(p: &mut Parser) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_tag_name", "missing next token"))?;
    route_tag_name(p, next_kind)?;
    Ok(StepResult::Done)
}

fn route_tag_name(p: &mut Parser, next_kind: TokenKind) -> Result<(), ParseError> {
    match next_kind {
        TokenKind::Word => p.states.enqueue_back(ParseState::TagName),
        TokenKind::Space => p.states.enqueue_back(ParseState::AttributeName),
        TokenKind::RtCaret => p.states.enqueue_back(ParseState::TagClose),
        TokenKind::Excl => p.states.enqueue_back(ParseState::Doctype),
        other => Err(unexpected("tag_name", "next", other)),
    }
}

// --- attribute_name -------------------------------------------------------

fn attribute_name(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("attribute_name")?;
    match current.kind {
        TokenKind::Word => {
            let attr: AttrHandle = Rc::new(RefCell::new(DomAttr { name: current.bytes.clone(), value: Vec::new() }));
            p.current_node()?.borrow_mut().attrs.push(attr.clone());
            p.attrs.push(attr)?;
        }
        TokenKind::Space | TokenKind::Equals | TokenKind::DblQuot => {}
        other => return Err(unexpected("attribute_name", "current", other)),
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeAttributeName)?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_attribute_name(p, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_attribute_name(p: &mut Parser) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_attribute_name", "missing next token"))?;
    route_attribute_name(p, next_kind)?;
    Ok(StepResult::Done)
}

fn route_attribute_name(p: &mut Parser, next_kind: TokenKind) -> Result<(), ParseError> {
    match next_kind {
        TokenKind::Word | TokenKind::Equals | TokenKind::Space => p.states.enqueue_back(ParseState::AttributeName),
        TokenKind::DblQuot => p.states.enqueue_back(ParseState::AttributeValue),
        TokenKind::RtCaret => p.states.enqueue_back(ParseState::TagClose),
        other => Err(unexpected("attribute_name", "next", other)),
    }
}

// --- attribute_value ------------------------------------------------------

fn attribute_value(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("attribute_value")?;
    let attr = p
        .attrs
        .top()
        .cloned()
        .ok_or_else(|| ParseError::structure("attribute_value", "no attribute is awaiting a value"))?;
    match current.kind {
        TokenKind::Word | TokenKind::Number => attr.borrow_mut().value.extend_from_slice(&current.bytes),
        TokenKind::Dash => attr.borrow_mut().value.push(b'-'),
        TokenKind::Period => attr.borrow_mut().value.push(b'.'),
        TokenKind::FwdSlash => attr.borrow_mut().value.push(b'/'),
        TokenKind::Colon => attr.borrow_mut().value.push(b':'),
        TokenKind::Underscore => attr.borrow_mut().value.push(b'_'),
        TokenKind::DblQuot => {}
        other => return Err(unexpected("attribute_value", "current", other)),
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeAttributeValue)?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_attribute_value(p, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_attribute_value(p: &mut Parser) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_attribute_value", "missing next token"))?;
    route_attribute_value(p, next_kind)?;
    Ok(StepResult::Done)
}

fn is_value_content(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word | TokenKind::Number | TokenKind::Dash | TokenKind::Period | TokenKind::FwdSlash | TokenKind::Colon | TokenKind::Underscore
    )
}

fn route_attribute_value(p: &mut Parser, next_kind: TokenKind) -> Result<(), ParseError> {
    if is_value_content(next_kind) {
        return p.states.enqueue_back(ParseState::AttributeValue);
    }
    match next_kind {
        TokenKind::DblQuot => {
            p.attrs.pop();
            p.states.enqueue_back(ParseState::AttributeName)
        }
        other => Err(unexpected("attribute_value", "next", other)),
    }
}

// --- tag_close --------------------------------------------------------

fn tag_close(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("tag_close")?;
    match current.kind {
        TokenKind::RtCaret => {}
        other => return Err(unexpected("tag_close", "current", other)),
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeTagClose)?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_tag_close(p, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_tag_close(p: &mut Parser) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_tag_close", "missing next token"))?;
    route_tag_close(p, next_kind)?;
    Ok(StepResult::Done)
}

fn route_tag_close(p: &mut Parser, next_kind: TokenKind) -> Result<(), ParseError> {
    match next_kind {
        TokenKind::LtCaret => p.states.enqueue_back(ParseState::TagOpen),
        TokenKind::Word => p.states.enqueue_back(ParseState::ElmBody),
        other => Err(unexpected("tag_close", "next", other)),
    }
}

// --- elm_close ----------------------------------------------------------

fn elm_close(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("elm_close")?;
    match current.kind {
        TokenKind::FwdSlash => {}
        TokenKind::Word => {
            let top = p.current_node()?;
            if top.borrow().name != current.bytes {
                return Err(ParseError::structure("elm_close", "closing tag name does not match open tag name"));
            }
            // The root never gets popped here; it is handed to the caller
            // only by the top-level terminal check in `Parser::finish`. It
            // still needs to record that its own end tag was seen, since
            // `finish` can't otherwise tell a closed root from one that
            // never got an end tag at all.
            if p.nodes.depth() > 1 {
                let node = p.nodes.pop().expect("depth was checked above");
                let parent = p.current_node()?;
                dom::append_child(&parent, node);
            } else {
                p.root_closed = true;
            }
        }
        other => return Err(unexpected("elm_close", "current", other)),
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeElmClose)?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_elm_close(p, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_elm_close(p: &mut Parser) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_elm_close", "missing next token"))?;
    route_elm_close(p, next_kind)?;
    Ok(StepResult::Done)
}

fn route_elm_close(p: &mut Parser, next_kind: TokenKind) -> Result<(), ParseError> {
    match next_kind {
        TokenKind::Word => p.states.enqueue_back(ParseState::ElmClose),
        TokenKind::RtCaret => p.states.enqueue_back(ParseState::TagClose),
        other => Err(unexpected("elm_close", "next", other)),
    }
}

// --- doctype --------------------------------------------------------------

fn doctype(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("doctype")?;
    match current.kind {
        TokenKind::Word => p.tree.doctype.extend_from_slice(&current.bytes),
        TokenKind::Space => p.tree.doctype.push(b' '),
        TokenKind::Excl => {}
        other => return Err(unexpected("doctype", "current", other)),
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeDoctype)?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_doctype(p, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_doctype(p: &mut Parser) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_doctype", "missing next token"))?;
    route_doctype(p, next_kind)?;
    Ok(StepResult::Done)
}

fn route_doctype(p: &mut Parser, next_kind: TokenKind) -> Result<(), ParseError> {
    match next_kind {
        TokenKind::Word | TokenKind::Space => p.states.enqueue_back(ParseState::Doctype),
        TokenKind::RtCaret => p.states.enqueue_back(ParseState::TagClose),
        other => Err(unexpected("doctype", "next", other)),
    }
}

// --- elm_body -----------------------------------------------------------

/// The literal byte a single-byte punctuation token contributes to a node's
/// body. `Word`/`Number` carry their own bytes and `LtCaret` is never
/// dequeued here (it always stays in the queue for `tag_open` to consume).
fn body_punctuation_byte(kind: TokenKind) -> Option<u8> {
    Some(match kind {
        TokenKind::Space => b' ',
        TokenKind::RtCaret => b'>',
        TokenKind::FwdSlash => b'/',
        TokenKind::Equals => b'=',
        TokenKind::DblQuot => b'"',
        TokenKind::SngQuot => b'\'',
        TokenKind::Excl => b'!',
        TokenKind::Dash => b'-',
        TokenKind::Period => b'.',
        TokenKind::Comma => b',',
        TokenKind::Colon => b':',
        TokenKind::SemiColon => b';',
        TokenKind::OpenParen => b'(',
        TokenKind::CloseParen => b')',
        TokenKind::OpenSquare => b'[',
        TokenKind::CloseSquare => b']',
        TokenKind::Underscore => b'_',
        _ => return None,
    })
}

fn elm_body(p: &mut Parser) -> Result<StepResult, ParseError> {
    let current = p.dequeue_current("elm_body")?;
    let node = p.current_node()?;
    match current.kind {
        TokenKind::Word | TokenKind::Number => node.borrow_mut().append_body(&current.bytes),
        other => match body_punctuation_byte(other) {
            Some(byte) => node.borrow_mut().body.push(byte),
            None => return Err(unexpected("elm_body", "current", other)),
        },
    }
    match p.peek_kind() {
        None => {
            p.states.enqueue_front(ParseState::ResumeElmBody)?;
            Ok(StepResult::Suspend)
        }
        Some(next_kind) => {
            route_elm_body(p, next_kind)?;
            Ok(StepResult::Done)
        }
    }
}

fn resume_elm_body(p: &mut Parser) -> Result<StepResult, ParseError> {
    let next_kind = p
        .peek_kind()
        .ok_or_else(|| ParseError::syntax("resume_elm_body", "missing next token"))?;
    route_elm_body(p, next_kind)?;
    Ok(StepResult::Done)
}

fn route_elm_body(p: &mut Parser, next_kind: TokenKind) -> Result<(), ParseError> {
    match next_kind {
        TokenKind::LtCaret => p.states.enqueue_back(ParseState::TagOpen),
        TokenKind::Word | TokenKind::Number => p.states.enqueue_back(ParseState::ElmBody),
        other if body_punctuation_byte(other).is_some() => p.states.enqueue_back(ParseState::ElmBody),
        other => Err(unexpected("elm_body", "next", other)),
    }
}
