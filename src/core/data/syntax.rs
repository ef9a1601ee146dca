//! Template syntax tree.
//!
//! Trees are produced by the template parser (or built directly by callers)
//! and consumed read-only by the message extractor. The variants the
//! extractor cares about get their own payloads; everything else is a
//! [`GenericNode`] carrying a kind tag, scalar attributes and child slots.

use indexmap::IndexMap;

use super::Scalar;

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    /// `{% trans %}...{% endtrans %}` (and `transchoice`).
    Trans(TransNode),
    /// `{{ expr }}`
    Print(PrintNode),
    /// `subject|name(arguments)`
    Filter(FilterNode),
    /// A literal value inside an expression.
    Constant(Scalar),
    /// Raw template text between tags.
    Text(String),
    Generic(GenericNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransNode {
    pub body: Box<SyntaxNode>,
    /// `from "domain"`; absent means the default domain.
    pub domain: Option<Box<SyntaxNode>>,
    pub vars: Option<Box<SyntaxNode>>,
    pub count: Option<Box<SyntaxNode>>,
    pub locale: Option<Box<SyntaxNode>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintNode {
    pub expr: Box<SyntaxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub subject: Box<SyntaxNode>,
    pub name: String,
    pub arguments: Vec<SyntaxNode>,
}

/// Kind tag of a [`GenericNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    /// Ordered list of statements or expressions.
    Body,
    If,
    For,
    Block,
    Set,
    /// Any other block tag; its name is stored in the `name` attribute.
    Tag,
    Name,
    /// `a.b`, `a.b()`, `a[b]`
    GetAttr,
    Call,
    Array,
    Hash,
    Unary,
    Binary,
    Test,
    Conditional,
    /// `name = value` inside a call or filter argument list.
    NamedArgument,
}

/// Slot under which a child is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChildKey {
    Named(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub key: ChildKey,
    pub node: Option<SyntaxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericNode {
    pub kind: NodeKind,
    pub attributes: IndexMap<String, Scalar>,
    pub children: Vec<Child>,
}

/// Name of the slot holding the wrapped expression of single-child wrappers
/// such as attribute access and unary operators.
pub const INNER_NODE: &str = "node";

impl GenericNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_child(self, name: &str, node: SyntaxNode) -> Self {
        self.with_optional_child(name, Some(node))
    }

    /// Add a named slot that may be empty (e.g. a missing `else` branch).
    pub fn with_optional_child(mut self, name: &str, node: Option<SyntaxNode>) -> Self {
        self.children.push(Child {
            key: ChildKey::Named(name.to_string()),
            node,
        });
        self
    }

    /// Append a positional child.
    pub fn push(&mut self, node: SyntaxNode) {
        let index = self
            .children
            .iter()
            .filter(|c| matches!(c.key, ChildKey::Index(_)))
            .count();
        self.children.push(Child {
            key: ChildKey::Index(index),
            node: Some(node),
        });
    }

    pub fn with_items(mut self, nodes: impl IntoIterator<Item = SyntaxNode>) -> Self {
        for node in nodes {
            self.push(node);
        }
        self
    }

    pub fn child(&self, name: &str) -> Option<&SyntaxNode> {
        self.children
            .iter()
            .find(|c| matches!(&c.key, ChildKey::Named(n) if n == name))
            .and_then(|c| c.node.as_ref())
    }

    pub fn attribute(&self, name: &str) -> Option<&Scalar> {
        self.attributes.get(name)
    }
}

impl SyntaxNode {
    pub fn constant(value: impl Into<Scalar>) -> Self {
        SyntaxNode::Constant(value.into())
    }

    pub fn text(data: impl Into<String>) -> Self {
        SyntaxNode::Text(data.into())
    }

    pub fn print(expr: SyntaxNode) -> Self {
        SyntaxNode::Print(PrintNode {
            expr: Box::new(expr),
        })
    }

    pub fn filter(subject: SyntaxNode, name: impl Into<String>, arguments: Vec<SyntaxNode>) -> Self {
        SyntaxNode::Filter(FilterNode {
            subject: Box::new(subject),
            name: name.into(),
            arguments,
        })
    }

    pub fn trans(body: SyntaxNode, domain: Option<SyntaxNode>) -> Self {
        SyntaxNode::Trans(TransNode {
            body: Box::new(body),
            domain: domain.map(Box::new),
            vars: None,
            count: None,
            locale: None,
        })
    }

    pub fn name(name: &str) -> Self {
        SyntaxNode::Generic(GenericNode::new(NodeKind::Name).with_attribute("name", name))
    }

    pub fn get_attr(object: SyntaxNode, attribute: &str) -> Self {
        SyntaxNode::Generic(
            GenericNode::new(NodeKind::GetAttr)
                .with_child(INNER_NODE, object)
                .with_child("attribute", SyntaxNode::constant(attribute)),
        )
    }

    pub fn body(nodes: impl IntoIterator<Item = SyntaxNode>) -> Self {
        SyntaxNode::Generic(GenericNode::new(NodeKind::Body).with_items(nodes))
    }

    pub fn module(body: SyntaxNode) -> Self {
        SyntaxNode::Generic(GenericNode::new(NodeKind::Module).with_child("body", body))
    }

    /// Non-null children in their natural order.
    pub fn children(&self) -> Vec<&SyntaxNode> {
        match self {
            SyntaxNode::Trans(t) => [
                Some(t.body.as_ref()),
                t.domain.as_deref(),
                t.vars.as_deref(),
                t.count.as_deref(),
                t.locale.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect(),
            SyntaxNode::Print(p) => vec![p.expr.as_ref()],
            SyntaxNode::Filter(f) => std::iter::once(f.subject.as_ref())
                .chain(f.arguments.iter())
                .collect(),
            SyntaxNode::Constant(_) | SyntaxNode::Text(_) => Vec::new(),
            SyntaxNode::Generic(g) => g.children.iter().filter_map(|c| c.node.as_ref()).collect(),
        }
    }

    /// The wrapped expression of a single-child wrapper, if any.
    pub fn inner(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxNode::Filter(f) => Some(&f.subject),
            SyntaxNode::Generic(g) => g.child(INNER_NODE),
            _ => None,
        }
    }

    /// Literal text carried by constants and raw text nodes.
    pub fn literal_text(&self) -> Option<String> {
        match self {
            SyntaxNode::Constant(value) => value.as_text(),
            SyntaxNode::Text(data) => Some(data.clone()),
            _ => None,
        }
    }

    /// Whether this is a runtime attribute lookup (`a.b`, `a[b]`).
    pub fn is_attribute_access(&self) -> bool {
        matches!(self, SyntaxNode::Generic(g) if g.kind == NodeKind::GetAttr)
    }

    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            SyntaxNode::Generic(g) => Some(g.kind),
            _ => None,
        }
    }
}
