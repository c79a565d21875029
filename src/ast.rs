//! Syntax tree produced by the parser.
//!
//! Every node serializes as a keyed record with a `type` discriminant, so the
//! JSON form doubles as the interchange format handed to renderers and other
//! collaborators. Absent optional fields serialize as `null`.

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Program {
        body: Vec<Node>,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
    AugmentedAssignment {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    PrintStatement {
        arguments: Vec<Node>,
    },
    IfStatement {
        condition: Box<Node>,
        body: Vec<Node>,
        elif_blocks: Vec<ElifBlock>,
        else_block: Option<Vec<Node>>,
    },
    WhileStatement {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    ForStatement {
        variable: Box<Node>,
        iterable: Box<Node>,
        body: Vec<Node>,
    },
    FunctionDefinition {
        name: String,
        parameters: Vec<String>,
        body: Vec<Node>,
    },
    ReturnStatement {
        value: Option<Box<Node>>,
    },
    BreakStatement,
    ContinueStatement,
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryExpression {
        operator: String,
        right: Box<Node>,
    },
    FunctionCall {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Number {
        value: String,
    },
    #[serde(rename = "String")]
    StringLiteral {
        value: String,
    },
    Boolean {
        value: String,
    },
    #[serde(rename = "None")]
    NoneLiteral,
    Identifier {
        name: String,
    },
    /// Any node kind this crate does not know about. Kept as an opaque leaf so
    /// trees written by newer producers can still be read and traversed.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ElifBlock {
    pub condition: Node,
    pub body: Vec<Node>,
}

impl Node {
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier { name: name.into() }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Node::Number {
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::StringLiteral {
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        let value = if value { "True" } else { "False" };
        Node::Boolean {
            value: value.to_string(),
        }
    }

    pub fn binary(operator: impl Into<String>, left: Node, right: Node) -> Self {
        Node::BinaryExpression {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: impl Into<String>, right: Node) -> Self {
        Node::UnaryExpression {
            operator: operator.into(),
            right: Box::new(right),
        }
    }

    pub fn call(callee: Node, arguments: Vec<Node>) -> Self {
        Node::FunctionCall {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn assignment(name: impl Into<String>, value: Node) -> Self {
        Node::Assignment {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// The `type` discriminant this node serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Program { .. } => "Program",
            Node::Assignment { .. } => "Assignment",
            Node::AugmentedAssignment { .. } => "AugmentedAssignment",
            Node::PrintStatement { .. } => "PrintStatement",
            Node::IfStatement { .. } => "IfStatement",
            Node::WhileStatement { .. } => "WhileStatement",
            Node::ForStatement { .. } => "ForStatement",
            Node::FunctionDefinition { .. } => "FunctionDefinition",
            Node::ReturnStatement { .. } => "ReturnStatement",
            Node::BreakStatement => "BreakStatement",
            Node::ContinueStatement => "ContinueStatement",
            Node::BinaryExpression { .. } => "BinaryExpression",
            Node::UnaryExpression { .. } => "UnaryExpression",
            Node::FunctionCall { .. } => "FunctionCall",
            Node::Number { .. } => "Number",
            Node::StringLiteral { .. } => "String",
            Node::Boolean { .. } => "Boolean",
            Node::NoneLiteral => "None",
            Node::Identifier { .. } => "Identifier",
            Node::Unknown => "Unknown",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Program { body } => body.iter().collect(),
            Node::Assignment { value, .. } => vec![value.as_ref()],
            Node::AugmentedAssignment { left, right, .. }
            | Node::BinaryExpression { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Node::PrintStatement { arguments } => arguments.iter().collect(),
            Node::IfStatement {
                condition,
                body,
                elif_blocks,
                else_block,
            } => {
                let mut children = vec![condition.as_ref()];
                children.extend(body);
                for block in elif_blocks {
                    children.push(&block.condition);
                    children.extend(&block.body);
                }
                if let Some(else_block) = else_block {
                    children.extend(else_block);
                }
                children
            }
            Node::WhileStatement { condition, body } => {
                let mut children = vec![condition.as_ref()];
                children.extend(body);
                children
            }
            Node::ForStatement {
                variable,
                iterable,
                body,
            } => {
                let mut children = vec![variable.as_ref(), iterable.as_ref()];
                children.extend(body);
                children
            }
            Node::FunctionDefinition { body, .. } => body.iter().collect(),
            Node::ReturnStatement { value } => value.iter().map(|value| value.as_ref()).collect(),
            Node::UnaryExpression { right, .. } => vec![right.as_ref()],
            Node::FunctionCall { callee, arguments } => {
                let mut children = vec![callee.as_ref()];
                children.extend(arguments);
                children
            }
            Node::BreakStatement
            | Node::ContinueStatement
            | Node::Number { .. }
            | Node::StringLiteral { .. }
            | Node::Boolean { .. }
            | Node::NoneLiteral
            | Node::Identifier { .. }
            | Node::Unknown => Vec::new(),
        }
    }

    /// Pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_type_tag() {
        let program = Node::Program {
            body: vec![Node::assignment(
                "x",
                Node::binary("+", Node::number("10"), Node::number("2")),
            )],
        };
        let value = serde_json::to_value(&program).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "Program",
                "body": [{
                    "type": "Assignment",
                    "name": "x",
                    "value": {
                        "type": "BinaryExpression",
                        "operator": "+",
                        "left": {"type": "Number", "value": "10"},
                        "right": {"type": "Number", "value": "2"}
                    }
                }]
            })
        );
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let node = Node::IfStatement {
            condition: Box::new(Node::boolean(true)),
            body: vec![Node::ReturnStatement { value: None }],
            elif_blocks: Vec::new(),
            else_block: None,
        };
        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(value["else_block"], serde_json::Value::Null);
        assert_eq!(value["body"][0], json!({"type": "ReturnStatement", "value": null}));
        assert_eq!(value["condition"], json!({"type": "Boolean", "value": "True"}));
    }

    #[test]
    fn literal_variants_use_taxonomy_names() {
        assert_eq!(
            serde_json::to_value(Node::NoneLiteral).expect("serialize"),
            json!({"type": "None"})
        );
        assert_eq!(
            serde_json::to_value(Node::string("hi")).expect("serialize"),
            json!({"type": "String", "value": "hi"})
        );
        assert_eq!(Node::string("hi").type_name(), "String");
    }

    #[test]
    fn unknown_types_read_as_opaque_leaves() {
        let node: Node = serde_json::from_value(json!({
            "type": "Program",
            "body": [{"type": "LambdaExpression"}, {"type": "BreakStatement"}]
        }))
        .expect("deserialize");
        assert_eq!(
            node,
            Node::Program {
                body: vec![Node::Unknown, Node::BreakStatement]
            }
        );
        assert_eq!(node.node_count(), 3);
    }

    #[test]
    fn counts_every_node_in_tree() {
        let node = Node::ForStatement {
            variable: Box::new(Node::identifier("i")),
            iterable: Box::new(Node::call(
                Node::identifier("range"),
                vec![Node::number("3")],
            )),
            body: vec![Node::PrintStatement {
                arguments: vec![Node::unary("-", Node::identifier("i"))],
            }],
        };
        assert_eq!(node.node_count(), 8);
        let mut names = Vec::new();
        node.walk(&mut |node| names.push(node.type_name()));
        assert_eq!(
            names,
            vec![
                "ForStatement",
                "Identifier",
                "FunctionCall",
                "Identifier",
                "Number",
                "PrintStatement",
                "UnaryExpression",
                "Identifier",
            ]
        );
    }
}
