//! Shared builders for the integration tests.

#![allow(dead_code)]

use aifl::{Engine, Node, Operator, Parameters, Symbol, Value};

pub fn engine() -> Engine {
    Engine::new()
}

pub fn parse(text: &str) -> Node {
    engine()
        .parse(text)
        .unwrap_or_else(|e| panic!("{:?} should parse: {}", text, e))
}

pub fn sym(text: &str) -> Node {
    Node::symbol(Symbol::parse(text).unwrap())
}

pub fn call(text: &str, params: Vec<(&str, Value)>) -> Node {
    Node::call(
        Symbol::parse(text).unwrap(),
        params.into_iter().collect::<Parameters>(),
    )
}

pub fn op(operator: Operator, left: Node, right: Node) -> Node {
    Node::operation(operator, left, right)
}

pub fn not(operand: Node) -> Node {
    Node::unary(Operator::Not, operand)
}

pub fn s(text: &str) -> Value {
    Value::string(text)
}

pub fn id(text: &str) -> Value {
    Value::identifier(text)
}
