//! Property tests generating small well-formed documents and checking the
//! invariants a correctly-scheduled parse must preserve, plus a couple of
//! properties checked directly against the lexer on arbitrary byte input.

use markup_parser::dom::NodeHandle;
use markup_parser::{lexer, parse_bytes, token::TokenKind, token::TokenQueue};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use std::rc::Rc;

const ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const MAX_DEPTH: u32 = 3;

fn word(g: &mut Gen, min_len: usize, max_len: usize) -> Vec<u8> {
    let len = min_len + usize::arbitrary(g) % (max_len - min_len + 1);
    (0..len).map(|_| *g.choose(ALPHA).unwrap()).collect()
}

fn value_content(g: &mut Gen, max_len: usize) -> Vec<u8> {
    let len = usize::arbitrary(g) % (max_len + 1);
    (0..len).map(|_| *g.choose(ALNUM).unwrap()).collect()
}

/// A small tree of elements used to generate both the source bytes fed to
/// the parser and the expected shape of the resulting `DomTree`.
#[derive(Debug, Clone)]
struct Elem {
    name: Vec<u8>,
    attrs: Vec<(Vec<u8>, Vec<u8>)>,
    body: Vec<u8>,
    children: Vec<Elem>,
}

fn arbitrary_elem(g: &mut Gen, depth: u32) -> Elem {
    let name = word(g, 1, 8);
    let n_attrs = usize::arbitrary(g) % 3;
    let attrs = (0..n_attrs).map(|_| (word(g, 1, 6), value_content(g, 8))).collect();

    let children = if depth == 0 {
        Vec::new()
    } else {
        let n_children = usize::arbitrary(g) % 3;
        (0..n_children).map(|_| arbitrary_elem(g, depth - 1)).collect()
    };

    let body = if children.is_empty() { value_content(g, 12) } else { Vec::new() };

    Elem { name, attrs, body, children }
}

impl Arbitrary for Elem {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_elem(g, MAX_DEPTH)
    }
}

fn serialize_elem(e: &Elem, out: &mut Vec<u8>) {
    out.push(b'<');
    out.extend_from_slice(&e.name);
    for (name, value) in &e.attrs {
        out.push(b' ');
        out.extend_from_slice(name);
        out.extend_from_slice(b"=\"");
        out.extend_from_slice(value);
        out.push(b'"');
    }
    out.push(b'>');
    out.extend_from_slice(&e.body);
    for child in &e.children {
        serialize_elem(child, out);
    }
    out.extend_from_slice(b"</");
    out.extend_from_slice(&e.name);
    out.push(b'>');
}

fn serialize_document(e: &Elem) -> Vec<u8> {
    let mut out = Vec::new();
    serialize_elem(e, &mut out);
    out.push(b'\n');
    out
}

fn names_in_source_order(e: &Elem) -> Vec<Vec<u8>> {
    e.children.iter().map(|c| c.name.clone()).collect()
}

fn node_eq(a: &NodeHandle, b: &NodeHandle) -> bool {
    let (a, b) = (a.borrow(), b.borrow());
    if a.name != b.name || a.body != b.body {
        return false;
    }
    if a.attrs.len() != b.attrs.len() || a.children.len() != b.children.len() {
        return false;
    }
    let attrs_match = a.attrs.iter().zip(b.attrs.iter()).all(|(x, y)| {
        let (x, y) = (x.borrow(), y.borrow());
        x.name == y.name && x.value == y.value
    });
    attrs_match && a.children.iter().zip(b.children.iter()).all(|(x, y)| node_eq(x, y))
}

#[quickcheck]
fn prop_generated_documents_parse_without_error(elem: Elem) -> bool {
    parse_bytes(&serialize_document(&elem)).is_ok()
}

#[quickcheck]
fn prop_child_order_matches_source_order(elem: Elem) -> bool {
    let tree = match parse_bytes(&serialize_document(&elem)) {
        Ok(tree) => tree,
        Err(_) => return true,
    };
    fn check(expected: &Elem, actual: &NodeHandle) -> bool {
        let actual_names: Vec<_> = actual.borrow().children.iter().map(|c| c.borrow().name.clone()).collect();
        if actual_names != names_in_source_order(expected) {
            return false;
        }
        expected.children.iter().zip(actual.borrow().children.iter()).all(|(e, a)| check(e, a))
    }
    let root = tree.root.unwrap();
    check(&elem, &root)
}

#[quickcheck]
fn prop_parent_back_references_resolve_to_the_real_parent(elem: Elem) -> bool {
    let tree = match parse_bytes(&serialize_document(&elem)) {
        Ok(tree) => tree,
        Err(_) => return true,
    };
    fn check(node: &NodeHandle) -> bool {
        for child in &node.borrow().children {
            let back = match child.borrow().parent.as_ref().and_then(|w| w.upgrade()) {
                Some(back) => back,
                None => return false,
            };
            if !Rc::ptr_eq(&back, node) {
                return false;
            }
            if !check(child) {
                return false;
            }
        }
        true
    }
    check(&tree.root.unwrap())
}

#[quickcheck]
fn prop_root_has_no_parent(elem: Elem) -> bool {
    let tree = match parse_bytes(&serialize_document(&elem)) {
        Ok(tree) => tree,
        Err(_) => return true,
    };
    tree.root.unwrap().borrow().parent.is_none()
}

#[quickcheck]
fn prop_attribute_names_are_nonempty_and_values_are_alnum(elem: Elem) -> bool {
    let tree = match parse_bytes(&serialize_document(&elem)) {
        Ok(tree) => tree,
        Err(_) => return true,
    };
    fn check(node: &NodeHandle) -> bool {
        let ok = node.borrow().attrs.iter().all(|a| {
            let a = a.borrow();
            !a.name.is_empty() && a.value.iter().all(|b| b.is_ascii_alphanumeric())
        });
        ok && node.borrow().children.iter().all(check)
    }
    check(&tree.root.unwrap())
}

#[quickcheck]
fn prop_get_element_by_name_finds_the_root(elem: Elem) -> bool {
    let tree = match parse_bytes(&serialize_document(&elem)) {
        Ok(tree) => tree,
        Err(_) => return true,
    };
    let root_name = tree.root.as_ref().unwrap().borrow().name.clone();
    match tree.get_element_by_name(&root_name) {
        Some(found) => found.borrow().name == root_name,
        None => false,
    }
}

#[quickcheck]
fn prop_get_element_by_name_absent_returns_none(elem: Elem) -> bool {
    let tree = match parse_bytes(&serialize_document(&elem)) {
        Ok(tree) => tree,
        Err(_) => return true,
    };
    tree.get_element_by_name(b"zzzzqqqqnosuchtag").is_none()
}

#[quickcheck]
fn prop_reserialized_output_reparses_to_an_isomorphic_tree(elem: Elem) -> bool {
    let tree = match parse_bytes(&serialize_document(&elem)) {
        Ok(tree) => tree,
        Err(_) => return true,
    };
    let reserialized = tree.print();
    let reparsed = match parse_bytes(format!("{reserialized}\n").as_bytes()) {
        Ok(tree) => tree,
        Err(_) => return false,
    };
    node_eq(tree.root.as_ref().unwrap(), reparsed.root.as_ref().unwrap())
}

#[quickcheck]
fn prop_lexer_word_and_number_tokens_stay_within_their_byte_class(input: Vec<u8>) -> bool {
    // Restrict to bytes the lexer accepts at all, so the property exercises
    // the boundary between runs rather than always short-circuiting on the
    // first illegal byte.
    let filtered: Vec<u8> = input
        .into_iter()
        .filter(|b| b.is_ascii_alphanumeric() || *b == b' ')
        .take(48)
        .collect();

    let mut tokens = TokenQueue::new();
    if lexer::lex_into(&filtered, &mut tokens).is_err() {
        return true;
    }
    while let Some(tok) = tokens.dequeue() {
        match tok.kind {
            TokenKind::Word => {
                if !tok.bytes.iter().all(|b| b.is_ascii_alphabetic()) {
                    return false;
                }
            }
            TokenKind::Number => {
                if !tok.bytes.iter().all(|b| b.is_ascii_digit()) {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}
