//! Scope-correctness pass.
//!
//! Walks the tree once with a stack of scopes and collects diagnostics for
//! names declared twice in one scope and names used before any visible
//! declaration. The pass never fails; it only reports.

mod scope;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::ast::Node;

pub use scope::Scope;

/// Names visible everywhere without a declaration.
pub const BUILTINS: [&str; 9] = [
    "range", "len", "str", "int", "float", "input", "abs", "min", "max",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    DuplicateDeclaration,
    UndeclaredVariable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub name: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::DuplicateDeclaration => write!(f, "Duplicate declaration: {}", self.name),
            DiagnosticKind::UndeclaredVariable => write!(f, "Undeclared variable: {}", self.name),
        }
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every block body (program, branches, loops, functions) gets its own
/// scope. Function names and loop variables are declared before their
/// bodies are visited, so recursion and loop bodies resolve them.
pub struct Analyzer {
    scope: Scope,
    diagnostics: Vec<Diagnostic>,
}

impl Analyzer {
    pub fn new() -> Self {
        let mut analyzer = Self::without_builtins();
        for name in BUILTINS {
            analyzer.scope.declare(name);
        }
        analyzer
    }

    pub fn without_builtins() -> Self {
        Self {
            scope: Scope::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn analyze(mut self, program: &Node) -> Vec<Diagnostic> {
        self.visit(program);
        self.diagnostics
    }

    fn visit(&mut self, node: &Node) {
        match node {
            Node::Program { body } => self.visit_block(body),
            Node::Assignment { name, value } => {
                self.declare(name);
                self.visit(value);
            }
            Node::AugmentedAssignment { left, right, .. }
            | Node::BinaryExpression { left, right, .. } => {
                self.visit(left);
                self.visit(right);
            }
            Node::PrintStatement { arguments } => self.visit_all(arguments),
            Node::IfStatement {
                condition,
                body,
                elif_blocks,
                else_block,
            } => {
                self.visit(condition);
                self.visit_block(body);
                for block in elif_blocks {
                    self.visit(&block.condition);
                    self.visit_block(&block.body);
                }
                if let Some(else_block) = else_block {
                    self.visit_block(else_block);
                }
            }
            Node::WhileStatement { condition, body } => {
                self.visit(condition);
                self.visit_block(body);
            }
            Node::ForStatement {
                variable,
                iterable,
                body,
            } => {
                self.visit(iterable);
                self.scope.push();
                match variable.as_ref() {
                    Node::Identifier { name } => self.declare(name),
                    other => self.visit(other),
                }
                self.visit_all(body);
                self.scope.pop();
            }
            Node::FunctionDefinition {
                name,
                parameters,
                body,
            } => {
                self.declare(name);
                self.scope.push();
                for parameter in parameters {
                    self.declare(parameter);
                }
                self.visit_all(body);
                self.scope.pop();
            }
            Node::ReturnStatement { value } => {
                if let Some(value) = value {
                    self.visit(value);
                }
            }
            Node::UnaryExpression { right, .. } => self.visit(right),
            Node::FunctionCall { callee, arguments } => {
                self.visit(callee);
                self.visit_all(arguments);
            }
            Node::Identifier { name } => {
                if !self.scope.is_declared(name) {
                    self.report(DiagnosticKind::UndeclaredVariable, name);
                }
            }
            Node::BreakStatement
            | Node::ContinueStatement
            | Node::Number { .. }
            | Node::StringLiteral { .. }
            | Node::Boolean { .. }
            | Node::NoneLiteral
            | Node::Unknown => {}
        }
    }

    fn visit_all(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.visit(node);
        }
    }

    fn visit_block(&mut self, body: &[Node]) {
        self.scope.push();
        self.visit_all(body);
        self.scope.pop();
    }

    fn declare(&mut self, name: &str) {
        if !self.scope.declare(name) {
            self.report(DiagnosticKind::DuplicateDeclaration, name);
        }
    }

    fn report(&mut self, kind: DiagnosticKind, name: &str) {
        self.diagnostics.push(Diagnostic {
            kind,
            name: name.to_string(),
        });
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn analyze(program: &Node) -> Vec<Diagnostic> {
    Analyzer::new().analyze(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use indoc::indoc;

    fn messages(source: &str) -> Vec<String> {
        let program = parse(source).expect("parse failed");
        analyze(&program)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn reports_undeclared_identifier() {
        let program = Node::Program {
            body: vec![Node::identifier("y")],
        };
        let diagnostics = analyze(&program);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UndeclaredVariable);
        assert!(diagnostics[0].to_string().contains('y'));
    }

    #[test]
    fn reports_duplicate_declaration_in_same_scope() {
        let program = Node::Program {
            body: vec![
                Node::assignment("x", Node::number("1")),
                Node::assignment("x", Node::number("2")),
            ],
        };
        let diagnostics = analyze(&program);
        assert_eq!(
            diagnostics,
            vec![Diagnostic {
                kind: DiagnosticKind::DuplicateDeclaration,
                name: "x".to_string(),
            }]
        );
        assert_eq!(diagnostics[0].to_string(), "Duplicate declaration: x");
    }

    #[test]
    fn declaration_precedes_value() {
        assert!(messages("x = x + 1").is_empty());
        assert_eq!(messages("x = y + 1"), vec!["Undeclared variable: y"]);
    }

    #[test]
    fn blocks_open_fresh_scopes() {
        let input = indoc! {"
            x = 1
            if (x > 0):
                x = 2
                y = x
            else:
                y = 3
            print(y)
        "};
        assert_eq!(messages(input), vec!["Undeclared variable: y"]);
    }

    #[test]
    fn functions_see_parameters_and_themselves() {
        let input = indoc! {"
            def fact(n):
                if (n <= 1):
                    return 1
                return n * fact(n - 1)
            print(fact(5), n)
        "};
        assert_eq!(messages(input), vec!["Undeclared variable: n"]);
    }

    #[test]
    fn duplicate_parameters_are_reported() {
        assert_eq!(
            messages("def f(a, a):\n    return a"),
            vec!["Duplicate declaration: a"]
        );
    }

    #[test]
    fn loop_variable_is_scoped_to_loop_body() {
        let input = indoc! {"
            total = 0
            for i in range(10):
                total += i
            print(i)
        "};
        assert_eq!(messages(input), vec!["Undeclared variable: i"]);
    }

    #[test]
    fn augmented_assignment_checks_its_target() {
        assert_eq!(messages("count += 1"), vec!["Undeclared variable: count"]);
    }

    #[test]
    fn nested_expressions_are_visited() {
        let input = "while (not done):\n    print(-a, f(b)(c))";
        assert_eq!(
            messages(input),
            vec![
                "Undeclared variable: done",
                "Undeclared variable: a",
                "Undeclared variable: f",
                "Undeclared variable: b",
                "Undeclared variable: c",
            ]
        );
    }

    #[test]
    fn builtins_are_optional() {
        let program = parse("n = len(items)").expect("parse failed");
        let with_prelude = Analyzer::new().analyze(&program);
        assert_eq!(with_prelude.len(), 1);
        let bare = Analyzer::without_builtins().analyze(&program);
        let names = bare
            .iter()
            .map(|diagnostic| diagnostic.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["len", "items"]);
    }

    #[test]
    fn unknown_nodes_are_inert() {
        let program = Node::Program {
            body: vec![Node::Unknown, Node::BreakStatement],
        };
        assert!(analyze(&program).is_empty());
    }

    #[test]
    fn diagnostics_serialize_as_strings() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::UndeclaredVariable,
            name: "z".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&diagnostic).expect("serialize"),
            r#""Undeclared variable: z""#
        );
    }
}
