use fieldwork_core::{
    Error,
    compare::CmpOp,
    model::Validator,
    value::{Value, compare_values},
};

// value <op> bound must hold; incomparable kinds surface as type errors
fn bound(op: CmpOp, bound: Value) -> Validator {
    Validator::new(format!("x {} {}", op.symbol(), bound.repr()), move |_, field, value| {
        if compare_values(op, value, &bound)? {
            Ok(())
        } else {
            Err(Error::value_error(format!(
                "'{}' must be {} {}: {}",
                field.name(),
                op.symbol(),
                bound.repr(),
                value.repr()
            )))
        }
    })
}

/// Value must be `< val`.
#[must_use]
pub fn lt(val: impl Into<Value>) -> Validator {
    bound(CmpOp::Lt, val.into())
}

/// Value must be `<= val`.
#[must_use]
pub fn le(val: impl Into<Value>) -> Validator {
    bound(CmpOp::Le, val.into())
}

/// Value must be `>= val`.
#[must_use]
pub fn ge(val: impl Into<Value>) -> Validator {
    bound(CmpOp::Ge, val.into())
}

/// Value must be `> val`.
#[must_use]
pub fn gt(val: impl Into<Value>) -> Validator {
    bound(CmpOp::Gt, val.into())
}
