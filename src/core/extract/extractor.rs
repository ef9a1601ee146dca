use anyhow::{Result, bail};

use crate::core::data::{MessageCatalog, SyntaxNode};

/// Name of the filter that marks a printed expression as translatable.
pub const TRANS_FILTER: &str = "trans";

/// Default domain for messages that do not name one.
pub const DEFAULT_DOMAIN: &str = "messages";

/// Default prefix for placeholder values of newly found messages.
pub const DEFAULT_PREFIX: &str = "__";

/// Default nesting limit for tree traversal.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Prepended to each new message to form its placeholder value.
    pub prefix: String,
    pub default_domain: String,
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            default_domain: DEFAULT_DOMAIN.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Collects translatable messages from template syntax trees.
///
/// Two constructs are recognized:
///
/// - `{% trans %}Hello{% endtrans %}` blocks with a literal body
/// - `{{ 'Hello'|trans }}` prints whose filter chain contains `trans`
///
/// Every message found is recorded once per domain with the value
/// `prefix + message`. Later occurrences of the same message are ignored.
///
/// # Example
///
/// ```
/// use trawl::core::data::SyntaxNode;
/// use trawl::core::extract::{ExtractOptions, MessageExtractor};
///
/// let tree = SyntaxNode::print(SyntaxNode::filter(
///     SyntaxNode::constant("Hello"),
///     "trans",
///     vec![],
/// ));
///
/// let mut extractor = MessageExtractor::new(ExtractOptions::default());
/// extractor.crawl(&tree).unwrap();
///
/// let catalog = extractor.into_catalog();
/// assert_eq!(catalog.domain("messages").unwrap()["Hello"].as_str(), Some("__Hello"));
/// ```
pub struct MessageExtractor {
    options: ExtractOptions,
    catalog: MessageCatalog,
}

impl MessageExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            catalog: MessageCatalog::new(),
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Walk a tree and record every message it contains.
    ///
    /// Fails only when the tree is nested deeper than `max_depth`; messages
    /// recorded before the failure stay in the catalog.
    pub fn crawl(&mut self, root: &SyntaxNode) -> Result<()> {
        self.crawl_node(root, 0)
    }

    fn crawl_node(&mut self, node: &SyntaxNode, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            bail!(
                "Template nesting exceeds the maximum depth of {}",
                self.options.max_depth
            );
        }

        match node {
            SyntaxNode::Trans(trans) if !trans.body.is_attribute_access() => {
                let domain = match &trans.domain {
                    Some(domain) => domain.literal_text(),
                    None => Some(self.options.default_domain.clone()),
                };
                if let (Some(message), Some(domain)) = (trans.body.literal_text(), domain) {
                    self.save_message(&message, &domain);
                }
            }
            SyntaxNode::Print(print) => {
                let message = extract_message(&print.expr);
                let domain = extract_domain(&print.expr, &self.options.default_domain);
                if let (Some(message), Some(domain)) = (message, domain) {
                    self.save_message(&message, &domain);
                }
            }
            _ => {
                for child in node.children() {
                    self.crawl_node(child, depth + 1)?;
                }
            }
        }

        Ok(())
    }

    fn save_message(&mut self, message: &str, domain: &str) {
        let placeholder = format!("{}{}", self.options.prefix, message);
        self.catalog.insert_if_absent(domain, message, placeholder.as_str());
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> MessageCatalog {
        self.catalog
    }
}

/// Find the literal message a printed expression wraps.
///
/// Unwraps single-child wrappers (filters, attribute access, unary
/// operators) down to the innermost expression, which must be a constant.
pub fn extract_message(node: &SyntaxNode) -> Option<String> {
    let mut current = node;
    while let Some(inner) = current.inner() {
        current = inner;
    }
    match current {
        SyntaxNode::Constant(value) => value.as_text(),
        _ => None,
    }
}

/// Find the domain of a printed expression by looking through its filter
/// chain for a `trans` filter, however deep.
///
/// `'x'|trans({}, 'app')` yields `app`; `'x'|trans` yields the default
/// domain; anything without a `trans` filter yields `None`.
pub fn extract_domain(node: &SyntaxNode, default_domain: &str) -> Option<String> {
    let mut current = node;
    loop {
        let SyntaxNode::Filter(filter) = current else {
            return None;
        };
        if filter.name == TRANS_FILTER {
            return match filter.arguments.get(1) {
                Some(domain) => domain.literal_text(),
                None => Some(default_domain.to_string()),
            };
        }
        current = &filter.subject;
    }
}
