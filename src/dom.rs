use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::ParseError;

pub const NODE_STACK_CAPACITY: usize = 32;
pub const ATTR_STACK_CAPACITY: usize = 32;
/// Children are stored in a growable `Vec`; this is the block size the
/// source grows its fixed array by, kept here only as documentation of the
/// original bound — nothing in this crate caps a node's child count.
pub const NODE_CHILD_GROWTH_BLOCK: usize = 32;

pub type NodeHandle = Rc<RefCell<DomNode>>;
pub type AttrHandle = Rc<RefCell<DomAttr>>;

#[derive(Debug)]
pub struct DomAttr {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

/// A single element of the tree under construction. `parent` is a weak
/// back-reference: children own their parent's `Vec`, never the reverse, so
/// `parent` is for traversal only and is never relied on to keep a node
/// alive.
#[derive(Debug)]
pub struct DomNode {
    pub name: Vec<u8>,
    pub body: Vec<u8>,
    pub attrs: Vec<AttrHandle>,
    pub children: Vec<NodeHandle>,
    pub parent: Option<Weak<RefCell<DomNode>>>,
}

impl DomNode {
    pub fn new_handle() -> NodeHandle {
        Rc::new(RefCell::new(DomNode {
            name: Vec::new(),
            body: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
        }))
    }

    pub fn append_name(&mut self, bytes: &[u8]) {
        self.name.extend_from_slice(bytes);
    }

    pub fn append_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }
}

pub fn append_child(parent: &NodeHandle, child: NodeHandle) {
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    parent.borrow_mut().children.push(child);
}

/// LIFO of currently open elements. The top is the node whose name,
/// attributes, or body are presently being filled in.
#[derive(Debug, Default)]
pub struct NodeStack {
    items: Vec<NodeHandle>,
}

impl NodeStack {
    pub fn new() -> Self {
        NodeStack { items: Vec::new() }
    }

    pub fn push(&mut self, node: NodeHandle) -> Result<(), ParseError> {
        if self.items.len() >= NODE_STACK_CAPACITY {
            return Err(ParseError::capacity("node_stack", "stack is full"));
        }
        self.items.push(node);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<NodeHandle> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&NodeHandle> {
        self.items.last()
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }
}

/// LIFO of attributes awaiting a value. Pushed on an attribute-name `Word`,
/// popped on the closing quote of its value.
#[derive(Debug, Default)]
pub struct AttrStack {
    items: Vec<AttrHandle>,
}

impl AttrStack {
    pub fn new() -> Self {
        AttrStack { items: Vec::new() }
    }

    pub fn push(&mut self, attr: AttrHandle) -> Result<(), ParseError> {
        if self.items.len() >= ATTR_STACK_CAPACITY {
            return Err(ParseError::capacity("attr_stack", "stack is full"));
        }
        self.items.push(attr);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<AttrHandle> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&AttrHandle> {
        self.items.last()
    }
}

/// The finished document: the raw doctype text plus the root element.
pub struct DomTree {
    pub doctype: Vec<u8>,
    pub root: Option<NodeHandle>,
}

impl DomTree {
    pub fn new() -> Self {
        DomTree { doctype: Vec::new(), root: None }
    }

    /// Pre-order DFS; returns the first node whose name matches `name`.
    pub fn get_element_by_name(&self, name: &[u8]) -> Option<NodeHandle> {
        let root = self.root.as_ref()?;
        find_preorder(root, name)
    }

    /// Pre-order serialization: `<!doctype>` then the root tree.
    pub fn print(&self) -> String {
        let mut out = String::new();
        if !self.doctype.is_empty() {
            out.push_str("<!");
            out.push_str(&String::from_utf8_lossy(&self.doctype));
            out.push_str(">\n");
        }
        if let Some(root) = &self.root {
            print_node(root, &mut out);
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        DomTree::new()
    }
}

fn find_preorder(node: &NodeHandle, name: &[u8]) -> Option<NodeHandle> {
    if node.borrow().name == name {
        return Some(node.clone());
    }
    for child in &node.borrow().children {
        if let Some(found) = find_preorder(child, name) {
            return Some(found);
        }
    }
    None
}

fn print_node(node: &NodeHandle, out: &mut String) {
    let n = node.borrow();
    out.push('<');
    out.push_str(&String::from_utf8_lossy(&n.name));
    for attr in &n.attrs {
        let a = attr.borrow();
        out.push(' ');
        out.push_str(&String::from_utf8_lossy(&a.name));
        out.push_str("=\"");
        out.push_str(&String::from_utf8_lossy(&a.value));
        out.push('"');
    }
    out.push('>');
    out.push_str(&String::from_utf8_lossy(&n.body));
    for child in &n.children {
        print_node(child, out);
    }
    out.push_str("</");
    out.push_str(&String::from_utf8_lossy(&n.name));
    out.push('>');
}
