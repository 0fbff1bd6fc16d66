use crate::{
    ast::BinaryOp,
    error::{ExpressionError, Result},
    types::value_to_string,
};
use bigdecimal::{BigDecimal, Zero};
use model::core::value::Value;
use std::cmp::Ordering;

/// Applies a non-short-circuit binary operator to two evaluated operands.
pub(crate) struct BinaryOpEvaluator<'a> {
    left: &'a Value,
    right: &'a Value,
    op: BinaryOp,
}

impl<'a> BinaryOpEvaluator<'a> {
    pub fn new(left: &'a Value, right: &'a Value, op: BinaryOp) -> Self {
        Self { left, right, op }
    }

    pub fn evaluate(&self) -> Result<Value> {
        match self.op {
            BinaryOp::Equal => Ok(Value::Boolean(self.left.loose_eq(self.right))),
            BinaryOp::NotEqual => Ok(Value::Boolean(!self.left.loose_eq(self.right))),
            BinaryOp::GreaterThan
            | BinaryOp::LessThan
            | BinaryOp::GreaterOrEqual
            | BinaryOp::LessOrEqual => self.eval_ordering(),
            BinaryOp::Add if self.is_concat() => Ok(Value::String(format!(
                "{}{}",
                value_to_string(self.left),
                value_to_string(self.right)
            ))),
            op if op.is_arithmetic() => self.eval_arithmetic(),
            _ => Err(self.mismatch()),
        }
    }

    fn is_concat(&self) -> bool {
        matches!(self.left, Value::String(_)) || matches!(self.right, Value::String(_))
    }

    /// Any ordering comparison against null is false.
    fn eval_ordering(&self) -> Result<Value> {
        if self.left.is_null() || self.right.is_null() {
            return Ok(Value::Boolean(false));
        }
        let ordering = self.left.compare(self.right).ok_or_else(|| self.mismatch())?;
        Ok(Value::Boolean(match self.op {
            BinaryOp::GreaterThan => ordering == Ordering::Greater,
            BinaryOp::LessThan => ordering == Ordering::Less,
            BinaryOp::GreaterOrEqual => ordering != Ordering::Less,
            BinaryOp::LessOrEqual => ordering != Ordering::Greater,
            _ => return Err(self.mismatch()),
        }))
    }

    fn eval_arithmetic(&self) -> Result<Value> {
        use Value::*;

        if !self.left.is_numeric() || !self.right.is_numeric() {
            return Err(self.mismatch());
        }

        match (self.left, self.right) {
            (Decimal(_), _) | (_, Decimal(_)) => self.eval_decimal(),
            (Float(_), _) | (_, Float(_)) => self.eval_float(),
            _ => match (self.left.as_i64(), self.right.as_i64()) {
                (Some(l), Some(r)) => self.eval_int(l, r),
                _ => Err(self.mismatch()),
            },
        }
    }

    fn eval_int(&self, l: i64, r: i64) -> Result<Value> {
        if matches!(self.op, BinaryOp::Divide | BinaryOp::Modulo) && r == 0 {
            return Err(ExpressionError::DivisionByZero);
        }
        let result = match self.op {
            BinaryOp::Add => l.checked_add(r),
            BinaryOp::Subtract => l.checked_sub(r),
            BinaryOp::Multiply => l.checked_mul(r),
            BinaryOp::Divide => l.checked_div(r),
            BinaryOp::Modulo => l.checked_rem(r),
            _ => return Err(self.mismatch()),
        };
        result
            .map(Value::Int)
            .ok_or_else(|| ExpressionError::Overflow(format!("{l} {} {r}", self.op)))
    }

    fn eval_float(&self) -> Result<Value> {
        let (Some(l), Some(r)) = (self.left.as_f64(), self.right.as_f64()) else {
            return Err(self.mismatch());
        };
        Ok(Value::Float(match self.op {
            BinaryOp::Add => l + r,
            BinaryOp::Subtract => l - r,
            BinaryOp::Multiply => l * r,
            BinaryOp::Divide => l / r,
            BinaryOp::Modulo => l % r,
            _ => return Err(self.mismatch()),
        }))
    }

    fn eval_decimal(&self) -> Result<Value> {
        let (Some(l), Some(r)) = (self.left.as_decimal(), self.right.as_decimal()) else {
            return Err(self.mismatch());
        };
        if matches!(self.op, BinaryOp::Divide | BinaryOp::Modulo) && r.is_zero() {
            return Err(ExpressionError::DivisionByZero);
        }
        Ok(Value::Decimal(match self.op {
            BinaryOp::Add => l + r,
            BinaryOp::Subtract => l - r,
            BinaryOp::Multiply => l * r,
            BinaryOp::Divide => l / r,
            BinaryOp::Modulo => l % r,
            _ => return Err(self.mismatch()),
        }))
    }

    fn mismatch(&self) -> ExpressionError {
        ExpressionError::TypeMismatch {
            op: self.op.to_string(),
            left: self.left.type_name(),
            right: self.right.type_name(),
        }
    }
}

/// Arithmetic negation of a numeric value.
pub(crate) fn negate(value: &Value) -> Result<Value> {
    match value {
        Value::SmallInt(i) => i
            .checked_neg()
            .map(Value::SmallInt)
            .ok_or_else(|| ExpressionError::Overflow(format!("-{i}"))),
        Value::Int32(i) => i
            .checked_neg()
            .map(Value::Int32)
            .ok_or_else(|| ExpressionError::Overflow(format!("-{i}"))),
        Value::Int(i) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| ExpressionError::Overflow(format!("-{i}"))),
        Value::Float(f) => Ok(Value::Float(-f)),
        Value::Decimal(d) => Ok(Value::Decimal(BigDecimal::zero() - d)),
        other => Err(ExpressionError::TypeMismatch {
            op: "-".to_string(),
            left: other.type_name(),
            right: "nothing".to_string(),
        }),
    }
}
