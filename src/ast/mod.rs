//! AST module for the AIFL notation
//!
//! This module provides the tagged tree produced by the parser: symbol calls,
//! binary operations and unary operations, plus the symbol, operator and
//! parameter types they are built from. Nodes are plain owned values; each
//! `parse` call builds a fresh tree.

// ============================================================================
// IMPORTS
// ============================================================================

use std::fmt;
use std::str::FromStr;

use pest::Parser;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::diagnostics::{AiflError, SourceContext};
use crate::syntax::{AiflGrammar, Rule, Span};

pub mod value;

pub use value::Value;

// ============================================================================
// SYMBOLS
// ============================================================================

/// A validated operation symbol such as `ΔΕ1` or `ΜΑΝ1α`.
///
/// One leading letter from `ΜΙΕΣΔΠΨΩΛΦΡΚΝ`, up to two further Greek capitals,
/// one or more decimal digits, and an optional suffix from `αβγδε`.
///
/// # Examples
///
/// ```rust
/// use aifl::ast::Symbol;
/// let symbol: Symbol = "ΜΑΝ1α".parse().unwrap();
/// assert_eq!(symbol.digits(), "1");
/// assert_eq!(symbol.suffix(), Some('α'));
/// assert!("INVALID".parse::<Symbol>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Validates `text` as a complete symbol.
    pub fn parse(text: &str) -> Result<Self, AiflError> {
        match AiflGrammar::parse(Rule::symbol_text, text) {
            Ok(_) => Ok(Symbol(text.to_string())),
            Err(_) => Err(AiflError::lex(
                format!("'{}' is not a valid symbol", text),
                &SourceContext::new("symbol", text),
                Span::new(0, text.len()),
            )
            .with_help("symbols look like ΔΕ1, ΜΑΝ12 or ΣΑ1α")),
        }
    }

    /// Wraps text the grammar has already matched as a `symbol`.
    pub(crate) fn from_matched(text: &str) -> Self {
        Symbol(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The decimal index of the symbol (`"12"` in `ΔΕ12β`).
    pub fn digits(&self) -> &str {
        self.0
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .trim_end_matches(|c: char| !c.is_ascii_digit())
    }

    /// The lowercase variant suffix, if any.
    pub fn suffix(&self) -> Option<char> {
        self.0.chars().last().filter(|c| ('α'..='ε').contains(c))
    }
}

impl FromStr for Symbol {
    type Err = AiflError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::parse(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// OPERATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    Prefix,
}

/// The seven connectives of the notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Therefore,
    Implies,
    Equiv,
    Or,
    And,
    Compose,
    Not,
}

impl Operator {
    /// Every operator, lowest precedence first.
    pub const ALL: [Operator; 7] = [
        Operator::Therefore,
        Operator::Implies,
        Operator::Equiv,
        Operator::Or,
        Operator::And,
        Operator::Compose,
        Operator::Not,
    ];

    pub fn glyph(&self) -> char {
        match self {
            Operator::Therefore => '∴',
            Operator::Implies => '⇒',
            Operator::Equiv => '≡',
            Operator::Or => '∨',
            Operator::And => '∧',
            Operator::Compose => '⊗',
            Operator::Not => '¬',
        }
    }

    /// The glyph as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Therefore => "∴",
            Operator::Implies => "⇒",
            Operator::Equiv => "≡",
            Operator::Or => "∨",
            Operator::And => "∧",
            Operator::Compose => "⊗",
            Operator::Not => "¬",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Therefore => "THEREFORE",
            Operator::Implies => "IMPLIES",
            Operator::Equiv => "EQUIV",
            Operator::Or => "OR",
            Operator::And => "AND",
            Operator::Compose => "COMPOSE",
            Operator::Not => "NOT",
        }
    }

    /// Binding strength, 1 (loosest) to 7 (tightest).
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Therefore => 1,
            Operator::Implies => 2,
            Operator::Equiv => 3,
            Operator::Or => 4,
            Operator::And => 5,
            Operator::Compose => 6,
            Operator::Not => 7,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Operator::Therefore | Operator::Implies | Operator::Equiv => Associativity::Right,
            Operator::Or | Operator::And | Operator::Compose => Associativity::Left,
            Operator::Not => Associativity::Prefix,
        }
    }

    pub fn is_unary(&self) -> bool {
        self.associativity() == Associativity::Prefix
    }

    pub fn from_glyph(glyph: char) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.glyph() == glyph)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Named arguments of a symbol call.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// Iteration follows first-insertion order, but equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    entries: Vec<(String, Value)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Parameters {}

impl<K: Into<String>> FromIterator<(K, Value)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ============================================================================
// NODES
// ============================================================================

/// The core AST node for AIFL expressions.
///
/// Serializes as a map with a `type` discriminator:
///
/// ```rust
/// use aifl::syntax::AiflParser;
/// let node = AiflParser::new().parse("ΜΑΝ1 ∧ ΜΑΒ2").unwrap();
/// let json = serde_json::to_value(&node).unwrap();
/// assert_eq!(json["type"], "operation");
/// assert_eq!(json["operator"], "∧");
/// assert_eq!(json["left"]["symbol"], "ΜΑΝ1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    SymbolCall {
        symbol: Symbol,
        parameters: Parameters,
    },
    Operation {
        operator: Operator,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryOperation {
        operator: Operator,
        operand: Box<Node>,
    },
}

impl Node {
    /// A symbol applied with no argument list.
    pub fn symbol(symbol: Symbol) -> Self {
        Node::SymbolCall {
            symbol,
            parameters: Parameters::new(),
        }
    }

    pub fn call(symbol: Symbol, parameters: Parameters) -> Self {
        Node::SymbolCall { symbol, parameters }
    }

    pub fn operation(operator: Operator, left: Node, right: Node) -> Self {
        Node::Operation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: Operator, operand: Node) -> Self {
        Node::UnaryOperation {
            operator,
            operand: Box::new(operand),
        }
    }

    /// The serialized `type` discriminator of this node.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::SymbolCall { .. } => "symbol_call",
            Node::Operation { .. } => "operation",
            Node::UnaryOperation { .. } => "unary_operation",
        }
    }

    /// Height of the tree; a lone symbol call has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Node::SymbolCall { .. } => 1,
            Node::Operation { left, right, .. } => 1 + left.depth().max(right.depth()),
            Node::UnaryOperation { operand, .. } => 1 + operand.depth(),
        }
    }

    /// Symbols in source order.
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut Vec<&'a Symbol>) {
        match self {
            Node::SymbolCall { symbol, .. } => out.push(symbol),
            Node::Operation { left, right, .. } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
            Node::UnaryOperation { operand, .. } => operand.collect_symbols(out),
        }
    }
}

/// Canonical notation: binary operations fully parenthesised, so the text
/// re-parses to the same tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::SymbolCall { symbol, parameters } => {
                write!(f, "{}", symbol)?;
                if parameters.is_empty() {
                    return Ok(());
                }
                f.write_str("(")?;
                for (i, (key, value)) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value.to_notation())?;
                }
                f.write_str(")")
            }
            Node::Operation {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Node::UnaryOperation { operator, operand } => match operand.as_ref() {
                Node::UnaryOperation { .. } => write!(f, "{}({})", operator, operand),
                _ => write!(f, "{}{}", operator, operand),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(text: &str) -> Symbol {
        Symbol::parse(text).unwrap()
    }

    #[test]
    fn test_symbol_validation() {
        for ok in ["ΔΔ1", "ΜΑΝ1α", "Ν0", "ΩΩΩ42ε", "ΣΑ1"] {
            assert!(Symbol::parse(ok).is_ok(), "{} should be a symbol", ok);
        }
        for bad in ["", "Δ", "ΑΔ1", "ΔΔΔΔ1", "ΔΔ1ζ", "ΔΔ1αβ", "DD1", " ΔΔ1", "ΔΔ1 "] {
            assert!(Symbol::parse(bad).is_err(), "{:?} should not be a symbol", bad);
        }
    }

    #[test]
    fn test_symbol_parts() {
        let plain = sym("ΔΕ12");
        assert_eq!(plain.digits(), "12");
        assert_eq!(plain.suffix(), None);
        assert_eq!(sym("ΣΑ3β").suffix(), Some('β'));
    }

    #[test]
    fn test_operator_table() {
        let precedences: Vec<u8> = Operator::ALL.iter().map(Operator::precedence).collect();
        assert_eq!(precedences, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(Operator::from_glyph('⇒'), Some(Operator::Implies));
        assert_eq!(Operator::from_glyph('+'), None);
        assert!(Operator::Not.is_unary());
        assert_eq!(Operator::Equiv.associativity(), Associativity::Right);
        assert_eq!(Operator::Compose.associativity(), Associativity::Left);
    }

    #[test]
    fn test_parameters_last_write_wins_in_place() {
        let mut params = Parameters::new();
        params.insert("A", Value::string("1"));
        params.insert("B", Value::string("2"));
        let replaced = params.insert("A", Value::string("3"));
        assert_eq!(replaced, Some(Value::string("1")));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(params.get("A"), Some(&Value::string("3")));
    }

    #[test]
    fn test_parameters_equality_ignores_order() {
        let a: Parameters = [("X", Value::identifier("x")), ("Y", Value::identifier("y"))]
            .into_iter()
            .collect();
        let b: Parameters = [("Y", Value::identifier("y")), ("X", Value::identifier("x"))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_node_serialization_shape() {
        let params: Parameters = [("Data", Value::string("TestData"))].into_iter().collect();
        let node = Node::unary(Operator::Not, Node::call(sym("ΔΕ1"), params));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "unary_operation",
                "operator": "¬",
                "operand": {
                    "type": "symbol_call",
                    "symbol": "ΔΕ1",
                    "parameters": { "Data": "TestData" }
                }
            })
        );
    }

    #[test]
    fn test_display_and_helpers() {
        let node = Node::operation(
            Operator::And,
            Node::unary(Operator::Not, Node::symbol(sym("ΜΑΝ1"))),
            Node::symbol(sym("ΜΑΒ2")),
        );
        assert_eq!(node.to_string(), "(¬ΜΑΝ1 ∧ ΜΑΒ2)");
        assert_eq!(node.depth(), 3);
        assert_eq!(node.kind_name(), "operation");
        let names: Vec<&str> = node.symbols().into_iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["ΜΑΝ1", "ΜΑΒ2"]);
    }
}
