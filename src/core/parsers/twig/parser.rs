use anyhow::{Result, bail};

use super::lexer::{Token, TokenKind, tokenize};
use crate::core::data::{GenericNode, INNER_NODE, NodeKind, Scalar, SyntaxNode, TransNode};

/// Tags that wrap a body closed by `end<tag>`.
const PAIRED_TAGS: &[&str] = &[
    "spaceless",
    "autoescape",
    "filter",
    "apply",
    "macro",
    "embed",
    "sandbox",
    "with",
];

/// Binary operators: (operator, precedence, right associative).
const BINARY_OPERATORS: &[(&str, u16, bool)] = &[
    ("or", 10, false),
    ("and", 15, false),
    ("b-or", 16, false),
    ("b-xor", 17, false),
    ("b-and", 18, false),
    ("==", 20, false),
    ("!=", 20, false),
    ("<", 20, false),
    (">", 20, false),
    (">=", 20, false),
    ("<=", 20, false),
    ("not in", 20, false),
    ("in", 20, false),
    ("matches", 20, false),
    ("starts with", 20, false),
    ("ends with", 20, false),
    ("..", 25, false),
    ("+", 30, false),
    ("-", 30, false),
    ("~", 40, false),
    ("*", 60, false),
    ("/", 60, false),
    ("//", 60, false),
    ("%", 60, false),
    ("is", 100, false),
    ("is not", 100, false),
    ("**", 200, true),
    ("??", 300, true),
];

const NOT_PRECEDENCE: u16 = 50;
const NEGATION_PRECEDENCE: u16 = 500;

/// Deepest nesting of blocks and expressions a template may use. Operator
/// and filter chains count one level per link.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse a template into a `Module` node.
///
/// # Example
///
/// ```
/// use trawl::core::parsers::twig::parse_template;
///
/// let tree = parse_template("<h1>{{ 'Hello'|trans }}</h1>").unwrap();
/// assert_eq!(tree.children().len(), 1);
/// ```
pub fn parse_template(source: &str) -> Result<SyntaxNode> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        pos: 0,
        depth: 0,
    };
    let (body, _) = parser.parse_body(&[])?;
    Ok(SyntaxNode::module(body))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        // the lexer always ends the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn line(&self) -> usize {
        self.current().line
    }

    fn next(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Go one level deeper; callers restore `depth` when they return.
    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            bail!(
                "Template nesting exceeds the maximum depth of {} at line {}",
                MAX_NESTING_DEPTH,
                self.line()
            );
        }
        Ok(())
    }

    fn unexpected<T>(&self) -> Result<T> {
        let token = self.current();
        bail!("Unexpected \"{}\" at line {}", token.kind, token.line)
    }

    fn is_punct(&self, c: char) -> bool {
        self.current().kind == TokenKind::Punctuation(c)
    }

    fn is_name(&self, name: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Name(n) if n == name)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.is_punct(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<()> {
        if !self.eat_punct(c) {
            let token = self.current();
            bail!(
                "Expected \"{}\" but found \"{}\" at line {}",
                c,
                token.kind,
                token.line
            );
        }
        Ok(())
    }

    fn expect_name(&mut self) -> Result<String> {
        match self.next() {
            Token {
                kind: TokenKind::Name(name),
                ..
            } => Ok(name),
            token => bail!(
                "Expected a name but found \"{}\" at line {}",
                token.kind,
                token.line
            ),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        let token = self.next();
        if token.kind != kind {
            bail!(
                "Expected \"{}\" but found \"{}\" at line {}",
                kind,
                token.kind,
                token.line
            );
        }
        Ok(())
    }

    /// Parse statements until one of `end_tags` opens a block tag.
    ///
    /// Returns the body and the end tag that stopped it; the rest of that
    /// tag (arguments and `%}`) is left for the caller.
    fn parse_body(&mut self, end_tags: &[&str]) -> Result<(SyntaxNode, Option<String>)> {
        let depth = self.depth;
        self.descend()?;
        let result = self.parse_statements(end_tags);
        self.depth = depth;
        result
    }

    fn parse_statements(&mut self, end_tags: &[&str]) -> Result<(SyntaxNode, Option<String>)> {
        let mut body = GenericNode::new(NodeKind::Body);

        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Text(text) => body.push(SyntaxNode::Text(text)),
                TokenKind::VarStart => {
                    let expr = self.parse_expression(0)?;
                    self.expect(TokenKind::VarEnd)?;
                    body.push(SyntaxNode::print(expr));
                }
                TokenKind::BlockStart => {
                    let name = self.expect_name()?;
                    if end_tags.contains(&name.as_str()) {
                        return Ok((SyntaxNode::Generic(body), Some(name)));
                    }
                    body.push(self.parse_tag(&name, token.line)?);
                }
                TokenKind::Eof if end_tags.is_empty() => {
                    return Ok((SyntaxNode::Generic(body), None));
                }
                TokenKind::Eof => bail!(
                    "Unexpected end of template, expecting \"{}\"",
                    end_tags.join("\" or \"")
                ),
                kind => bail!("Unexpected \"{}\" at line {}", kind, token.line),
            }
        }
    }

    /// Consume whatever follows an end tag name (e.g. `endblock content`).
    fn finish_end_tag(&mut self) -> Result<()> {
        while self.current().kind != TokenKind::BlockEnd {
            if self.current().kind == TokenKind::Eof {
                return self.unexpected();
            }
            self.pos += 1;
        }
        self.expect(TokenKind::BlockEnd)
    }

    fn parse_tag(&mut self, name: &str, line: usize) -> Result<SyntaxNode> {
        match name {
            "trans" => self.parse_trans("endtrans", false),
            "transchoice" => self.parse_trans("endtranschoice", true),
            "if" => self.parse_if(),
            "for" => self.parse_for(),
            "block" => self.parse_block(),
            "set" => self.parse_set(),
            _ if PAIRED_TAGS.contains(&name) => self.parse_paired(name),
            _ if name == "else" || name == "elseif" || name.starts_with("end") => {
                bail!("Unexpected \"{}\" tag at line {}", name, line)
            }
            _ => self.parse_standalone(name),
        }
    }

    fn parse_trans(&mut self, end_tag: &str, choice: bool) -> Result<SyntaxNode> {
        let line = self.line();
        let count = if choice {
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        let mut vars = None;
        let mut domain = None;
        let mut locale = None;
        loop {
            if self.is_name("with") {
                self.pos += 1;
                vars = Some(Box::new(self.parse_expression(0)?));
            } else if self.is_name("from") {
                self.pos += 1;
                domain = Some(Box::new(self.parse_expression(0)?));
            } else if self.is_name("into") {
                self.pos += 1;
                locale = Some(Box::new(self.parse_expression(0)?));
            } else {
                break;
            }
        }
        self.expect(TokenKind::BlockEnd)?;

        let (body, _) = self.parse_body(&[end_tag])?;
        self.finish_end_tag()?;

        Ok(SyntaxNode::Trans(TransNode {
            body: Box::new(trans_body(body, line)?),
            domain,
            vars,
            count,
            locale,
        }))
    }

    fn parse_if(&mut self) -> Result<SyntaxNode> {
        let mut tests = GenericNode::new(NodeKind::Body);
        let mut else_body = None;

        let mut condition = self.parse_expression(0)?;
        self.expect(TokenKind::BlockEnd)?;
        loop {
            let (body, end) = self.parse_body(&["elseif", "else", "endif"])?;
            tests.push(condition);
            tests.push(body);
            match end.as_deref() {
                Some("elseif") => {
                    condition = self.parse_expression(0)?;
                    self.expect(TokenKind::BlockEnd)?;
                }
                Some("else") => {
                    self.expect(TokenKind::BlockEnd)?;
                    let (body, _) = self.parse_body(&["endif"])?;
                    self.finish_end_tag()?;
                    else_body = Some(body);
                    break;
                }
                _ => {
                    self.finish_end_tag()?;
                    break;
                }
            }
        }

        Ok(SyntaxNode::Generic(
            GenericNode::new(NodeKind::If)
                .with_child("tests", SyntaxNode::Generic(tests))
                .with_optional_child("else", else_body),
        ))
    }

    fn parse_for(&mut self) -> Result<SyntaxNode> {
        let mut targets = vec![self.expect_name()?];
        if self.eat_punct(',') {
            targets.push(self.expect_name()?);
        }
        if !self.is_name("in") {
            return self.unexpected();
        }
        self.pos += 1;
        let seq = self.parse_expression(0)?;
        let condition = if self.is_name("if") {
            self.pos += 1;
            Some(self.parse_expression(0)?)
        } else {
            None
        };
        self.expect(TokenKind::BlockEnd)?;

        let (body, end) = self.parse_body(&["else", "endfor"])?;
        let else_body = if end.as_deref() == Some("else") {
            self.expect(TokenKind::BlockEnd)?;
            let (body, _) = self.parse_body(&["endfor"])?;
            Some(body)
        } else {
            None
        };
        self.finish_end_tag()?;

        let mut node = GenericNode::new(NodeKind::For);
        let value_target = targets.pop().unwrap_or_default();
        node = node.with_attribute("value_target", value_target);
        if let Some(key_target) = targets.pop() {
            node = node.with_attribute("key_target", key_target);
        }
        Ok(SyntaxNode::Generic(
            node.with_child("seq", seq)
                .with_optional_child("condition", condition)
                .with_child("body", body)
                .with_optional_child("else", else_body),
        ))
    }

    fn parse_block(&mut self) -> Result<SyntaxNode> {
        let name = self.expect_name()?;
        let body = if self.current().kind == TokenKind::BlockEnd {
            self.pos += 1;
            let (body, _) = self.parse_body(&["endblock"])?;
            self.finish_end_tag()?;
            body
        } else {
            let expr = self.parse_expression(0)?;
            self.expect(TokenKind::BlockEnd)?;
            SyntaxNode::body([SyntaxNode::print(expr)])
        };

        Ok(SyntaxNode::Generic(
            GenericNode::new(NodeKind::Block)
                .with_attribute("name", name)
                .with_child("body", body),
        ))
    }

    fn parse_set(&mut self) -> Result<SyntaxNode> {
        let mut names = GenericNode::new(NodeKind::Body);
        loop {
            let name = self.expect_name()?;
            names.push(SyntaxNode::name(&name));
            if !self.eat_punct(',') {
                break;
            }
        }

        let values = if self.eat_punct('=') {
            let values = self.parse_expression_list(TokenKind::BlockEnd)?;
            self.expect(TokenKind::BlockEnd)?;
            values
        } else {
            self.expect(TokenKind::BlockEnd)?;
            let (body, _) = self.parse_body(&["endset"])?;
            self.finish_end_tag()?;
            body
        };

        Ok(SyntaxNode::Generic(
            GenericNode::new(NodeKind::Set)
                .with_child("names", SyntaxNode::Generic(names))
                .with_child("values", values),
        ))
    }

    fn parse_paired(&mut self, name: &str) -> Result<SyntaxNode> {
        let arguments = self.parse_tag_arguments()?;
        self.expect(TokenKind::BlockEnd)?;
        let end_tag = format!("end{}", name);
        let (body, _) = self.parse_body(&[end_tag.as_str()])?;
        self.finish_end_tag()?;

        Ok(SyntaxNode::Generic(
            GenericNode::new(NodeKind::Tag)
                .with_attribute("name", name)
                .with_child("arguments", arguments)
                .with_child("body", body),
        ))
    }

    fn parse_standalone(&mut self, name: &str) -> Result<SyntaxNode> {
        let arguments = self.parse_tag_arguments()?;
        self.expect(TokenKind::BlockEnd)?;

        Ok(SyntaxNode::Generic(
            GenericNode::new(NodeKind::Tag)
                .with_attribute("name", name)
                .with_child("arguments", arguments),
        ))
    }

    /// Loosely parse tag arguments as a list of expressions, skipping the
    /// `,` and `=` separators used by `include`, `import`, `from`, etc.
    fn parse_tag_arguments(&mut self) -> Result<SyntaxNode> {
        let mut arguments = GenericNode::new(NodeKind::Body);
        while self.current().kind != TokenKind::BlockEnd {
            if self.eat_punct(',') || self.eat_punct('=') {
                continue;
            }
            arguments.push(self.parse_expression(0)?);
        }
        Ok(SyntaxNode::Generic(arguments))
    }

    /// Comma-separated expressions up to (not including) `end`.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<SyntaxNode> {
        let mut list = GenericNode::new(NodeKind::Body);
        loop {
            list.push(self.parse_expression(0)?);
            if !self.eat_punct(',') || self.current().kind == end {
                break;
            }
        }
        Ok(SyntaxNode::Generic(list))
    }

    fn parse_expression(&mut self, min_precedence: u16) -> Result<SyntaxNode> {
        let depth = self.depth;
        self.descend()?;
        let result = self.parse_binary(min_precedence);
        self.depth = depth;
        result
    }

    fn parse_binary(&mut self, min_precedence: u16) -> Result<SyntaxNode> {
        let mut left = self.parse_unary()?;

        while let Some((operator, precedence, right_assoc, width)) = self.peek_binary_operator() {
            if precedence < min_precedence {
                break;
            }
            self.pos += width;
            self.descend()?;

            left = match operator {
                "is" | "is not" => {
                    let test = self.parse_test(left)?;
                    if operator == "is not" {
                        unary("not", test)
                    } else {
                        test
                    }
                }
                _ => {
                    let next_min = if right_assoc { precedence } else { precedence + 1 };
                    let right = self.parse_expression(next_min)?;
                    SyntaxNode::Generic(
                        GenericNode::new(NodeKind::Binary)
                            .with_attribute("operator", operator)
                            .with_child("left", left)
                            .with_child("right", right),
                    )
                }
            };
        }

        if min_precedence == 0 {
            left = self.parse_conditional(left)?;
        }
        Ok(left)
    }

    fn peek_binary_operator(&self) -> Option<(&'static str, u16, bool, usize)> {
        let word = |offset: usize| match self.peek_kind(offset) {
            TokenKind::Name(name) => Some(name.as_str()),
            _ => None,
        };

        let (operator, width) = match &self.current().kind {
            TokenKind::Operator(op) => (op.clone(), 1),
            TokenKind::Name(name) => match (name.as_str(), word(1)) {
                ("not", Some("in")) => ("not in".to_string(), 2),
                ("starts", Some("with")) => ("starts with".to_string(), 2),
                ("ends", Some("with")) => ("ends with".to_string(), 2),
                ("is", Some("not")) => ("is not".to_string(), 2),
                (other, _) => (other.to_string(), 1),
            },
            _ => return None,
        };

        BINARY_OPERATORS
            .iter()
            .find(|(op, _, _)| *op == operator)
            .map(|&(op, precedence, right_assoc)| (op, precedence, right_assoc, width))
    }

    fn parse_unary(&mut self) -> Result<SyntaxNode> {
        if self.is_name("not") {
            self.pos += 1;
            let operand = self.parse_expression(NOT_PRECEDENCE)?;
            return Ok(unary("not", operand));
        }
        if let TokenKind::Operator(op) = &self.current().kind
            && (op == "-" || op == "+")
        {
            let op = if op == "-" { "-" } else { "+" };
            self.pos += 1;
            let operand = self.parse_expression(NEGATION_PRECEDENCE)?;
            return Ok(unary(op, operand));
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_conditional(&mut self, mut expr: SyntaxNode) -> Result<SyntaxNode> {
        while self.eat_punct('?') {
            let (then_expr, else_expr) = if self.eat_punct(':') {
                (None, Some(self.parse_expression(0)?))
            } else {
                let then_expr = self.parse_expression(0)?;
                let else_expr = if self.eat_punct(':') {
                    Some(self.parse_expression(0)?)
                } else {
                    None
                };
                (Some(then_expr), else_expr)
            };
            self.descend()?;
            expr = SyntaxNode::Generic(
                GenericNode::new(NodeKind::Conditional)
                    .with_child("condition", expr)
                    .with_optional_child("then", then_expr)
                    .with_optional_child("else", else_expr),
            );
        }
        Ok(expr)
    }

    fn parse_test(&mut self, subject: SyntaxNode) -> Result<SyntaxNode> {
        let mut name = self.expect_name()?;
        if let TokenKind::Name(next) = self.peek_kind(0)
            && matches!((name.as_str(), next.as_str()), ("divisible", "by") | ("same", "as"))
        {
            name = format!("{} {}", name, next);
            self.pos += 1;
        }
        let arguments = if self.is_punct('(') {
            Some(self.parse_arguments()?)
        } else {
            None
        };

        Ok(SyntaxNode::Generic(
            GenericNode::new(NodeKind::Test)
                .with_attribute("name", name)
                .with_child(INNER_NODE, subject)
                .with_optional_child("arguments", arguments),
        ))
    }

    fn parse_primary(&mut self) -> Result<SyntaxNode> {
        let token = self.next();
        match token.kind {
            TokenKind::Name(name) => Ok(match name.as_str() {
                "true" | "TRUE" => SyntaxNode::constant(true),
                "false" | "FALSE" => SyntaxNode::constant(false),
                "null" | "NULL" | "none" | "NONE" => SyntaxNode::Constant(Scalar::Null),
                _ if self.is_punct('(') => {
                    let arguments = self.parse_arguments()?;
                    SyntaxNode::Generic(
                        GenericNode::new(NodeKind::Call)
                            .with_attribute("name", name.as_str())
                            .with_child("arguments", arguments),
                    )
                }
                _ => SyntaxNode::name(&name),
            }),
            TokenKind::Number(value) => Ok(SyntaxNode::Constant(value)),
            TokenKind::Str(value) => Ok(SyntaxNode::constant(value)),
            TokenKind::Punctuation('[') => self.parse_array(),
            TokenKind::Punctuation('{') => self.parse_hash(),
            TokenKind::Punctuation('(') => {
                let expr = self.parse_expression(0)?;
                self.expect_punct(')')?;
                Ok(expr)
            }
            kind => bail!("Unexpected \"{}\" at line {}", kind, token.line),
        }
    }

    fn parse_array(&mut self) -> Result<SyntaxNode> {
        let mut array = GenericNode::new(NodeKind::Array);
        while !self.eat_punct(']') {
            array.push(self.parse_expression(0)?);
            if !self.eat_punct(',') {
                self.expect_punct(']')?;
                break;
            }
        }
        Ok(SyntaxNode::Generic(array))
    }

    fn parse_hash(&mut self) -> Result<SyntaxNode> {
        let mut hash = GenericNode::new(NodeKind::Hash);
        while !self.eat_punct('}') {
            let key = match self.current().kind.clone() {
                TokenKind::Str(key) | TokenKind::Name(key) => {
                    self.pos += 1;
                    SyntaxNode::constant(key)
                }
                TokenKind::Number(key) => {
                    self.pos += 1;
                    SyntaxNode::Constant(key)
                }
                TokenKind::Punctuation('(') => {
                    self.pos += 1;
                    let key = self.parse_expression(0)?;
                    self.expect_punct(')')?;
                    key
                }
                _ => return self.unexpected(),
            };
            self.expect_punct(':')?;
            let value = self.parse_expression(0)?;
            hash.push(key);
            hash.push(value);
            if !self.eat_punct(',') {
                self.expect_punct('}')?;
                break;
            }
        }
        Ok(SyntaxNode::Generic(hash))
    }

    /// Each link of the chain nests the tree one level deeper; the enclosing
    /// `parse_expression` restores the depth.
    fn parse_postfix(&mut self, mut node: SyntaxNode) -> Result<SyntaxNode> {
        loop {
            if matches!(self.current().kind, TokenKind::Punctuation('.' | '[' | '|')) {
                self.descend()?;
            }
            if self.eat_punct('.') {
                let attribute = match self.next() {
                    Token {
                        kind: TokenKind::Name(name),
                        ..
                    } => SyntaxNode::constant(name),
                    Token {
                        kind: TokenKind::Number(n),
                        ..
                    } => SyntaxNode::Constant(n),
                    token => bail!(
                        "Expected an attribute name but found \"{}\" at line {}",
                        token.kind,
                        token.line
                    ),
                };
                let (call_type, arguments) = if self.is_punct('(') {
                    ("method", Some(self.parse_arguments()?))
                } else {
                    ("any", None)
                };
                node = get_attr(node, attribute, call_type, arguments);
            } else if self.eat_punct('[') {
                let key = self.parse_expression(0)?;
                self.expect_punct(']')?;
                node = get_attr(node, key, "array", None);
            } else if self.eat_punct('|') {
                let name = self.expect_name()?;
                let arguments = if self.is_punct('(') {
                    match self.parse_arguments()? {
                        SyntaxNode::Generic(list) => {
                            list.children.into_iter().filter_map(|c| c.node).collect()
                        }
                        _ => Vec::new(),
                    }
                } else {
                    Vec::new()
                };
                node = SyntaxNode::filter(node, name, arguments);
            } else {
                return Ok(node);
            }
        }
    }

    /// `( [arg [, arg]*] [,] )`, where an argument may be `name = value`.
    fn parse_arguments(&mut self) -> Result<SyntaxNode> {
        self.expect_punct('(')?;
        let mut arguments = GenericNode::new(NodeKind::Body);
        while !self.eat_punct(')') {
            let named = matches!(self.peek_kind(0), TokenKind::Name(_))
                && *self.peek_kind(1) == TokenKind::Punctuation('=');
            let argument = if named {
                let name = self.expect_name()?;
                self.expect_punct('=')?;
                let value = self.parse_expression(0)?;
                SyntaxNode::Generic(
                    GenericNode::new(NodeKind::NamedArgument)
                        .with_attribute("name", name)
                        .with_child(INNER_NODE, value),
                )
            } else {
                self.parse_expression(0)?
            };
            arguments.push(argument);
            if !self.eat_punct(',') {
                self.expect_punct(')')?;
                break;
            }
        }
        Ok(SyntaxNode::Generic(arguments))
    }
}

fn unary(operator: &str, operand: SyntaxNode) -> SyntaxNode {
    SyntaxNode::Generic(
        GenericNode::new(NodeKind::Unary)
            .with_attribute("operator", operator)
            .with_child(INNER_NODE, operand),
    )
}

fn get_attr(
    object: SyntaxNode,
    attribute: SyntaxNode,
    call_type: &str,
    arguments: Option<SyntaxNode>,
) -> SyntaxNode {
    SyntaxNode::Generic(
        GenericNode::new(NodeKind::GetAttr)
            .with_attribute("type", call_type)
            .with_child(INNER_NODE, object)
            .with_child("attribute", attribute)
            .with_optional_child("arguments", arguments),
    )
}

/// A translation body must be plain text or a single printed expression.
fn trans_body(body: SyntaxNode, line: usize) -> Result<SyntaxNode> {
    let SyntaxNode::Generic(body) = body else {
        return Ok(body);
    };
    let nodes: Vec<SyntaxNode> = body.children.into_iter().filter_map(|c| c.node).collect();

    if !nodes.is_empty() && nodes.iter().all(|n| matches!(n, SyntaxNode::Text(_))) {
        let text: String = nodes
            .iter()
            .filter_map(|n| match n {
                SyntaxNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        return Ok(SyntaxNode::Text(text));
    }

    let mut prints = nodes.into_iter().filter(|n| match n {
        SyntaxNode::Text(t) => !t.trim().is_empty(),
        _ => true,
    });
    match (prints.next(), prints.next()) {
        (Some(SyntaxNode::Print(print)), None) => Ok(*print.expr),
        _ => bail!(
            "A message inside a trans tag must be a simple text (trans tag at line {})",
            line
        ),
    }
}
