use model::core::value::Value;
use std::fmt;

/// Parsed form of an expression, ready to evaluate against any context.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledExpression {
    Literal(Value),
    Identifier(String),
    Property {
        target: Box<CompiledExpression>,
        name: String,
    },
    Index {
        target: Box<CompiledExpression>,
        index: Box<CompiledExpression>,
    },
    MethodCall {
        target: Box<CompiledExpression>,
        name: String,
        args: Vec<CompiledExpression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<CompiledExpression>,
    },
    Binary {
        left: Box<CompiledExpression>,
        op: BinaryOp,
        right: Box<CompiledExpression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            "==" | "eq" => BinaryOp::Equal,
            "!=" | "neq" => BinaryOp::NotEqual,
            ">" | "gt" => BinaryOp::GreaterThan,
            "<" | "lt" => BinaryOp::LessThan,
            ">=" | "gte" => BinaryOp::GreaterOrEqual,
            "<=" | "lte" => BinaryOp::LessOrEqual,
            "&&" | "and" => BinaryOp::And,
            "||" | "or" => BinaryOp::Or,
            _ => return None,
        })
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Modulo => write!(f, "%"),
            BinaryOp::Equal => write!(f, "=="),
            BinaryOp::NotEqual => write!(f, "!="),
            BinaryOp::GreaterThan => write!(f, ">"),
            BinaryOp::LessThan => write!(f, "<"),
            BinaryOp::GreaterOrEqual => write!(f, ">="),
            BinaryOp::LessOrEqual => write!(f, "<="),
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Or => write!(f, "||"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "!" | "not" => Some(UnaryOp::Not),
            "-" => Some(UnaryOp::Negate),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}

impl CompiledExpression {
    /// Top-level binding names this expression reads.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            CompiledExpression::Literal(_) => {}
            CompiledExpression::Identifier(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            CompiledExpression::Property { target, .. } => target.collect_names(names),
            CompiledExpression::Index { target, index } => {
                target.collect_names(names);
                index.collect_names(names);
            }
            CompiledExpression::MethodCall { target, args, .. } => {
                target.collect_names(names);
                args.iter().for_each(|arg| arg.collect_names(names));
            }
            CompiledExpression::Unary { operand, .. } => operand.collect_names(names),
            CompiledExpression::Binary { left, right, .. } => {
                left.collect_names(names);
                right.collect_names(names);
            }
        }
    }
}
