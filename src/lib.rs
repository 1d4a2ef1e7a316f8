//! A scheduled, state-queue-driven parser for HTML-like markup.
//!
//! The hard core is the triad described in the crate's design notes: a
//! [`lexer`] that classifies bytes into a bounded [`token`] queue, a
//! [`state_queue`] of first-class, explicitly enqueued parse states, and the
//! [`states`] transition table that drives a [`dom`] builder. [`driver`]
//! wires the three together over a byte slice or a file on disk.
//!
//! ```
//! let tree = markup_parser::parse_bytes(b"<!DOCTYPE html>\n<p>hello</p>\n").unwrap();
//! assert_eq!(tree.root.unwrap().borrow().name, b"p");
//! ```

pub mod dom;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod state_queue;
mod states;
pub mod token;

pub use dom::{DomAttr, DomNode, DomTree};
pub use driver::{parse_bytes, parse_file, read_file_chunked, Driver};
pub use error::ParseError;
pub use parser::Parser;
