//! AIFL Parser
//!
//! Converts an expression into a [`Node`] tree. The text is lexed first, then
//! matched against the `input` rule of the grammar; operator precedence and
//! associativity are applied by a Pratt table built once in
//! [`AiflParser::new`] from [`Operator::ALL`].
//!
//! Parsing is all-or-nothing: any failure aborts with an [`AiflError`] and no
//! partial tree is returned.
//!
//! Input size is bounded before the grammar runs. Brackets may nest at most
//! [`AiflParser::MAX_NESTING`] deep and an expression may hold at most
//! [`AiflParser::MAX_OPERATORS`] operators, so every tree the parser returns
//! is at most `MAX_OPERATORS + 1` levels deep and can be walked recursively.

use log::debug;
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;

use crate::ast::{Associativity, Node, Operator, Parameters, Symbol, Value};
use crate::diagnostics::{AiflError, SourceContext};

use super::lexer::{tokenize_source, Token, TokenKind};
use super::{operator_for, rule_for, AiflGrammar, Rule, Span};

// ============================================================================
// PUBLIC API
// ============================================================================

/// A compiled expression parser. Immutable once built; share it freely.
pub struct AiflParser {
    pratt: PrattParser<Rule>,
}

impl AiflParser {
    /// Deepest allowed nesting of `(` and `[`.
    pub const MAX_NESTING: usize = 256;

    /// Most operators, unary or binary, allowed in one expression.
    pub const MAX_OPERATORS: usize = 256;

    pub fn new() -> Self {
        let pratt = Operator::ALL
            .into_iter()
            .fold(PrattParser::new(), |pratt, operator| {
                let rule = rule_for(operator);
                pratt.op(match operator.associativity() {
                    Associativity::Left => Op::infix(rule, Assoc::Left),
                    Associativity::Right => Op::infix(rule, Assoc::Right),
                    Associativity::Prefix => Op::prefix(rule),
                })
            });
        Self { pratt }
    }

    /// Parse an inline expression.
    pub fn parse(&self, expression: &str) -> Result<Node, AiflError> {
        self.parse_source(&SourceContext::inline(expression))
    }

    /// Parse the text of `source`, reporting errors against its name.
    pub fn parse_source(&self, source: &SourceContext<'_>) -> Result<Node, AiflError> {
        debug!("parsing {}: {}", source.name, source.text);

        let tokens = tokenize_source(source)?;
        check_limits(&tokens, source)?;
        let mut pairs = AiflGrammar::parse(Rule::input, source.text)
            .map_err(|e| convert_parse_error(e, &tokens, source))?;

        let input = pairs
            .next()
            .ok_or_else(|| make_error(source, "empty parse result", Span::point(0)))?;
        let expression = input
            .into_inner()
            .find(|p| p.as_rule() == Rule::expression)
            .ok_or_else(|| missing(source, "expression", Span::point(0)))?;

        let node = self.build_expression(expression, source)?;
        debug!("parse result: {}", node);
        Ok(node)
    }
}

impl Default for AiflParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AiflParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiflParser").finish_non_exhaustive()
    }
}

// ============================================================================
// AST BUILDERS
// ============================================================================

impl AiflParser {
    fn build_expression(&self, pair: Pair<'_, Rule>, source: &SourceContext<'_>) -> Result<Node, AiflError> {
        self.pratt
            .map_primary(|primary| self.build_primary(primary, source))
            .map_prefix(|op, operand| {
                let operator = to_operator(&op, source)?;
                Ok(Node::unary(operator, operand?))
            })
            .map_infix(|left, op, right| {
                let operator = to_operator(&op, source)?;
                Ok(Node::operation(operator, left?, right?))
            })
            .parse(pair.into_inner())
    }

    fn build_primary(&self, pair: Pair<'_, Rule>, source: &SourceContext<'_>) -> Result<Node, AiflError> {
        let span = Span::from(pair.as_span());
        match pair.as_rule() {
            Rule::symbol_call => build_symbol_call(pair, source),
            Rule::group => {
                let inner = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::expression)
                    .ok_or_else(|| missing(source, "expression inside parentheses", span))?;
                self.build_expression(inner, source)
            }
            rule => Err(make_error(source, format!("unsupported rule: {:?}", rule), span)),
        }
    }
}

fn build_symbol_call(pair: Pair<'_, Rule>, source: &SourceContext<'_>) -> Result<Node, AiflError> {
    let span = Span::from(pair.as_span());
    let mut inner = pair.into_inner();

    let symbol = inner
        .next()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| Symbol::from_matched(p.as_str()))
        .ok_or_else(|| missing(source, "symbol", span))?;

    let parameters = match inner.next() {
        Some(params) => build_parameters(params, source)?,
        None => Parameters::new(),
    };

    Ok(Node::call(symbol, parameters))
}

fn build_parameters(pair: Pair<'_, Rule>, source: &SourceContext<'_>) -> Result<Parameters, AiflError> {
    let mut parameters = Parameters::new();
    for param in pair.into_inner().filter(|p| p.as_rule() == Rule::parameter) {
        let span = Span::from(param.as_span());
        let mut parts = param.into_inner().filter(|p| p.as_rule() != Rule::colon);
        let key = parts
            .next()
            .ok_or_else(|| missing(source, "parameter name", span))?;
        let value = parts
            .next()
            .ok_or_else(|| missing(source, "parameter value", span))?;
        parameters.insert(key.as_str(), build_value(value, source)?);
    }
    Ok(parameters)
}

fn build_value(pair: Pair<'_, Rule>, source: &SourceContext<'_>) -> Result<Value, AiflError> {
    let span = Span::from(pair.as_span());
    match pair.as_rule() {
        Rule::string_literal => Ok(Value::String(strip_quotes(pair.as_str()).to_string())),
        Rule::identifier => Ok(Value::Identifier(pair.as_str().to_string())),
        Rule::array => pair
            .into_inner()
            .filter(|p| matches!(p.as_rule(), Rule::array | Rule::string_literal | Rule::identifier))
            .map(|p| build_value(p, source))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        rule => Err(make_error(source, format!("unsupported value rule: {:?}", rule), span)),
    }
}

fn to_operator(pair: &Pair<'_, Rule>, source: &SourceContext<'_>) -> Result<Operator, AiflError> {
    operator_for(pair.as_rule()).ok_or_else(|| {
        make_error(
            source,
            format!("'{}' is not an operator", pair.as_str()),
            Span::from(pair.as_span()),
        )
    })
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Both delimiters are single-byte ASCII quotes.
fn strip_quotes(literal: &str) -> &str {
    &literal[1..literal.len() - 1]
}

fn describe_rule(rule: Rule) -> &'static str {
    match rule {
        Rule::symbol | Rule::symbol_call => "symbol",
        Rule::identifier => "identifier",
        Rule::string_literal => "string literal",
        Rule::op_not => "'¬'",
        Rule::lparen | Rule::group | Rule::parameters => "'('",
        Rule::rparen => "')'",
        Rule::lbracket | Rule::array => "'['",
        Rule::rbracket => "']'",
        Rule::comma => "','",
        Rule::colon => "':'",
        Rule::parameter => "parameter",
        Rule::expression => "expression",
        Rule::EOI => "end of input",
        rule if operator_for(rule).is_some() => "operator",
        _ => "token",
    }
}

fn describe_expected(rules: &[Rule]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for name in rules.iter().map(|r| describe_rule(*r)) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    match names.as_slice() {
        [] => "a different token".to_string(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Rejects input whose tree would be too deep to build and walk.
fn check_limits(tokens: &[Token], source: &SourceContext<'_>) -> Result<(), AiflError> {
    let mut nesting = 0usize;
    let mut operators = 0usize;
    for token in tokens {
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket => {
                nesting += 1;
                if nesting > AiflParser::MAX_NESTING {
                    return Err(too_deep(source, token.span));
                }
            }
            TokenKind::RParen | TokenKind::RBracket => nesting = nesting.saturating_sub(1),
            TokenKind::Operator(_) => {
                operators += 1;
                if operators > AiflParser::MAX_OPERATORS {
                    return Err(AiflError::syntax(
                        format!(
                            "expression has too many operators (limit {})",
                            AiflParser::MAX_OPERATORS
                        ),
                        source,
                        token.span,
                    )
                    .with_help("split the expression into several shorter ones"));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn too_deep(source: &SourceContext<'_>, span: Span) -> AiflError {
    AiflError::syntax(
        format!("expression nests too deeply (limit {})", AiflParser::MAX_NESTING),
        source,
        span,
    )
    .with_help("remove redundant parentheses or split the expression")
}

/// Operand-side tokens that cannot follow an operator.
fn ends_operand_slot(token: &Token) -> bool {
    match token.kind {
        TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma | TokenKind::Colon => true,
        TokenKind::Operator(op) => !op.is_unary(),
        _ => false,
    }
}

/// Positions after which a binary operator has no left-hand operand.
fn starts_operand_slot(token: Option<&Token>) -> bool {
    match token {
        None => true,
        Some(t) => matches!(t.kind, TokenKind::LParen | TokenKind::Operator(_)),
    }
}

/// Classifies a grammar failure. An operator stranded without an operand
/// is a semantic violation; everything else is a syntax error.
fn convert_parse_error(error: pest::error::Error<Rule>, tokens: &[Token], source: &SourceContext<'_>) -> AiflError {
    let pos = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    let index = tokens.iter().position(|t| t.span.end > pos);
    let found = index.map(|i| &tokens[i]);
    let previous = match index {
        Some(i) => i.checked_sub(1).map(|j| &tokens[j]),
        None => tokens.last(),
    };

    // pest's own resource guards ("stack limit reached", "call limit reached").
    if let ErrorVariant::CustomError { message } = &error.variant {
        debug!("grammar gave up: {}", message);
        return too_deep(source, found.map_or(Span::point(pos), |t| t.span));
    }

    if let Some(prev) = previous {
        if let Some(op) = prev.operator() {
            if found.map_or(true, ends_operand_slot) {
                let side = if op.is_unary() { "operand" } else { "right-hand operand" };
                return AiflError::semantic(
                    format!("operator '{}' is missing its {}", op, side),
                    source,
                    prev.span,
                )
                .with_help(format!("put a symbol call or a parenthesised expression after '{}'", op));
            }
        }
    }

    if let Some(tok) = found {
        if let Some(op) = tok.operator().filter(|op| !op.is_unary()) {
            if starts_operand_slot(previous) {
                return AiflError::semantic(
                    format!("operator '{}' is missing its left-hand operand", op),
                    source,
                    tok.span,
                )
                .with_help(format!("put a symbol call or a parenthesised expression before '{}'", op));
            }
        }
    }

    let expected = match &error.variant {
        ErrorVariant::ParsingError { positives, .. } => describe_expected(positives),
        ErrorVariant::CustomError { message } => message.clone(),
    };
    let (found_text, span) = match found {
        Some(tok) => (tok.describe(), tok.span),
        None => ("end of input".to_string(), Span::point(source.text.len())),
    };

    AiflError::syntax(format!("expected {}, found {}", expected, found_text), source, span)
}

fn missing(source: &SourceContext<'_>, element: &str, span: Span) -> AiflError {
    make_error(source, format!("missing {}", element), span)
}

fn make_error(source: &SourceContext<'_>, message: impl Into<String>, span: Span) -> AiflError {
    AiflError::syntax(message, source, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    fn parse(text: &str) -> Result<Node, AiflError> {
        AiflParser::new().parse(text)
    }

    fn shape(text: &str) -> String {
        parse(text).unwrap().to_string()
    }

    #[test]
    fn test_simple_symbol() {
        let node = parse("ΜΑΝ1").unwrap();
        assert_eq!(node, Node::symbol(Symbol::parse("ΜΑΝ1").unwrap()));
    }

    #[test]
    fn test_precedence_ladder() {
        assert_eq!(shape("ΔΑ1 ∴ ΔΑ2 ⇒ ΔΑ3 ≡ ΔΑ4 ∨ ΔΑ5 ∧ ΔΑ6 ⊗ ¬ΔΑ7"), "(ΔΑ1 ∴ (ΔΑ2 ⇒ (ΔΑ3 ≡ (ΔΑ4 ∨ (ΔΑ5 ∧ (ΔΑ6 ⊗ ¬ΔΑ7))))))");
        assert_eq!(shape("¬ΔΑ1 ⊗ ΔΑ2 ∧ ΔΑ3 ∨ ΔΑ4 ≡ ΔΑ5 ⇒ ΔΑ6 ∴ ΔΑ7"), "((((((¬ΔΑ1 ⊗ ΔΑ2) ∧ ΔΑ3) ∨ ΔΑ4) ≡ ΔΑ5) ⇒ ΔΑ6) ∴ ΔΑ7)");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(shape("ΔΑ1 ∨ ΔΑ2 ∨ ΔΑ3"), "((ΔΑ1 ∨ ΔΑ2) ∨ ΔΑ3)");
        assert_eq!(shape("ΔΑ1 ⊗ ΔΑ2 ⊗ ΔΑ3"), "((ΔΑ1 ⊗ ΔΑ2) ⊗ ΔΑ3)");
        assert_eq!(shape("ΔΑ1 ≡ ΔΑ2 ≡ ΔΑ3"), "(ΔΑ1 ≡ (ΔΑ2 ≡ ΔΑ3))");
        assert_eq!(shape("ΔΑ1 ∴ ΔΑ2 ∴ ΔΑ3"), "(ΔΑ1 ∴ (ΔΑ2 ∴ ΔΑ3))");
    }

    #[test]
    fn test_double_negation_is_rejected() {
        let err = parse("¬¬ΔΑ1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(shape("¬(¬ΔΑ1)"), "¬(¬ΔΑ1)");
    }

    #[test]
    fn test_semantic_violations() {
        for (text, message) in [
            ("ΔΕ1 ∧", "operator '∧' is missing its right-hand operand"),
            ("⇒ ΔΕ1", "operator '⇒' is missing its left-hand operand"),
            ("ΔΕ1 ∧ ∨ ΔΕ2", "operator '∧' is missing its right-hand operand"),
            ("(ΔΕ1 ∨) ∧ ΔΕ2", "operator '∨' is missing its right-hand operand"),
            ("ΔΕ1 ∧ ¬", "operator '¬' is missing its operand"),
        ] {
            let err = parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::SemanticViolation, "{}", text);
            assert_eq!(err.message(), message, "{}", text);
        }
    }

    #[test]
    fn test_syntax_errors() {
        for text in ["", "ΔΕ1(Data:)", "ΔΕ1()", "(ΔΕ1", "ΔΕ1 ΔΕ2", "INVALID(Data: 'Test')", "ΔΕ1(X: ΔΕ2)"] {
            let err = parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "{:?}", text);
        }
    }

    #[test]
    fn test_limits_are_checked_before_the_grammar() {
        let chain = vec!["ΔΑ1"; AiflParser::MAX_OPERATORS + 2].join(" ⇒ ");
        let err = parse(&chain).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.message(), "expression has too many operators (limit 256)");

        let nested = format!("ΔΑ1(X: {}{})", "[".repeat(257), "]".repeat(257));
        let err = parse(&nested).unwrap_err();
        assert_eq!(err.message(), "expression nests too deeply (limit 256)");
    }

    #[test]
    fn test_syntax_error_message() {
        let err = parse("ΔΕ1(Data:)").unwrap_err();
        assert!(err.message().starts_with("expected "), "{}", err.message());
        assert!(err.message().contains("string literal"), "{}", err.message());
        assert!(err.message().ends_with("found ')'"), "{}", err.message());
        assert_eq!(err.span(), Some(Span::new(11, 12)));
        let err = parse("").unwrap_err();
        assert!(err.message().ends_with("found end of input"), "{}", err.message());
    }
}
