use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{AttrStack, DomNode, DomTree, NodeStack};
use crate::error::ParseError;
use crate::lexer;
use crate::state_queue::{ParseState, StateQueue};
use crate::states;
use crate::token::{Token, TokenKind, TokenQueue};

pub(crate) enum StepResult {
    Done,
    Suspend,
}

/// Bundles the tree under construction with the stacks and queues every
/// state handler reads and mutates. One handler runs to completion at a
/// time; nothing here is ever borrowed by two handlers concurrently.
pub struct Parser {
    pub(crate) tree: DomTree,
    pub(crate) nodes: NodeStack,
    pub(crate) attrs: AttrStack,
    pub(crate) states: StateQueue,
    pub(crate) tokens: TokenQueue,
    /// Set by `elm_close` the moment the outermost node's own end tag is
    /// matched. A depth of 1 alone can't tell a closed root (`<a></a>`,
    /// which §4.3 leaves on the stack rather than popping) apart from a
    /// still-open one (`<a>` with no end tag at all), so `finish` checks
    /// this flag rather than depth alone.
    pub(crate) root_closed: bool,
}

impl Parser {
    pub fn new() -> Self {
        let mut states = StateQueue::new();
        states.enqueue_back(ParseState::TagOpen).expect("an empty state queue has room for one state");
        Parser {
            tree: DomTree::new(),
            nodes: NodeStack::new(),
            attrs: AttrStack::new(),
            states,
            tokens: TokenQueue::new(),
            root_closed: false,
        }
    }

    pub(crate) fn dequeue_current(&mut self, at: &str) -> Result<Token, ParseError> {
        self.tokens.dequeue().ok_or_else(|| ParseError::syntax(at, "missing current token"))
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.peek().map(|t| t.kind)
    }

    pub(crate) fn current_node(&self) -> Result<Rc<RefCell<DomNode>>, ParseError> {
        self.nodes
            .top()
            .cloned()
            .ok_or_else(|| ParseError::structure("node_stack", "expected an open element"))
    }

    /// Lexes `line` in capacity-bounded chunks, draining the scheduler
    /// between chunks, until every byte of the line has been classified and
    /// every token it produced has been consumed or has caused a suspend.
    pub fn feed_line(&mut self, line: &[u8]) -> Result<(), ParseError> {
        let mut consumed = 0usize;
        while consumed < line.len() {
            consumed += lexer::lex_into(&line[consumed..], &mut self.tokens)?;
            self.run_until_stalled()?;
        }
        self.run_until_stalled()
    }

    fn run_until_stalled(&mut self) -> Result<(), ParseError> {
        while self.tokens.peek().is_some() {
            let Some(state) = self.states.dequeue() else {
                break;
            };
            match states::dispatch(self, state)? {
                StepResult::Done => continue,
                StepResult::Suspend => break,
            }
        }
        Ok(())
    }

    /// Runs the end-of-input terminal check and hands back the finished
    /// tree: the node stack must hold exactly the root, and its end tag
    /// must actually have been seen — a depth of 1 alone is ambiguous
    /// between a closed root and one still waiting on its end tag.
    pub fn finish(mut self) -> Result<DomTree, ParseError> {
        if self.nodes.depth() != 1 || !self.root_closed {
            return Err(ParseError::structure(
                "finish",
                format!("incomplete document: node stack depth is {}, expected 1 and closed", self.nodes.depth()),
            ));
        }
        let root = self.nodes.pop().expect("depth was checked above");
        self.tree.root = Some(root);
        Ok(self.tree)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}
