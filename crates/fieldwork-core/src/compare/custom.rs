use crate::{
    compare::{CmpOp, Comparable},
    error::{AssembleError, Error},
    value::Value,
};
use std::{fmt, sync::Arc};

/// User comparison primitive: `(a, b) -> a OP b`.
pub type CmpFn = dyn Fn(&Value, &Value) -> Result<Comparable<bool>, Error> + Send + Sync;

///
/// Comparator
///
/// Per-field comparison built from user callables. Any subset of the four
/// ordering primitives may be supplied together with `eq`; the missing ones
/// are completed from the highest-priority supplied root (lt, then le, then
/// gt, then ge):
///
/// root lt:  gt = !lt && !eq   le = lt || eq    ge = !lt
/// root le:  ge = !le || eq    lt = le && !eq   gt = !le
/// root gt:  lt = !gt && !eq   ge = gt || eq    le = !gt
/// root ge:  le = !ge || eq    gt = ge && !eq   lt = !ge
///
/// A root that answers `NotComparable` makes the derived operator answer
/// `NotComparable` as well.
///

#[derive(Clone)]
pub struct Comparator {
    name: String,
    eq: Option<Arc<CmpFn>>,
    ops: [Option<Arc<CmpFn>>; 4],
    root: Option<CmpOp>,
    require_same_type: bool,
}

impl Comparator {
    #[must_use]
    pub fn using() -> ComparatorBuilder {
        ComparatorBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn has_eq(&self) -> bool {
        self.eq.is_some()
    }

    #[must_use]
    pub const fn has_ordering(&self) -> bool {
        self.root.is_some()
    }

    /// Equality through the user callable; `NotComparable` when no `eq` was
    /// supplied or the same-type requirement fails.
    pub fn eq(&self, a: &Value, b: &Value) -> Result<Comparable<bool>, Error> {
        if !self.comparable(a, b) {
            return Ok(Comparable::NotComparable);
        }
        match &self.eq {
            Some(eq) => eq(a, b),
            None => Ok(Comparable::NotComparable),
        }
    }

    pub fn ne(&self, a: &Value, b: &Value) -> Result<Comparable<bool>, Error> {
        Ok(self.eq(a, b)?.negate())
    }

    pub fn lt(&self, a: &Value, b: &Value) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Lt, a, b)
    }

    pub fn le(&self, a: &Value, b: &Value) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Le, a, b)
    }

    pub fn gt(&self, a: &Value, b: &Value) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Gt, a, b)
    }

    pub fn ge(&self, a: &Value, b: &Value) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Ge, a, b)
    }

    /// Evaluate `a OP b`, deriving the operator from the root if needed.
    pub fn compare(&self, op: CmpOp, a: &Value, b: &Value) -> Result<Comparable<bool>, Error> {
        if !self.comparable(a, b) {
            return Ok(Comparable::NotComparable);
        }
        if let Some(f) = &self.ops[slot(op)] {
            return f(a, b);
        }
        let Some(root) = self.root else {
            return Ok(Comparable::NotComparable);
        };

        let Comparable::Value(r) = self.compare(root, a, b)? else {
            return Ok(Comparable::NotComparable);
        };

        // only the root and eq are consulted below
        let derived = match (root, op) {
            (CmpOp::Lt, CmpOp::Gt) | (CmpOp::Gt, CmpOp::Lt) => {
                if r {
                    false
                } else {
                    !self.eq_value(a, b)?
                }
            }
            (CmpOp::Lt, CmpOp::Le) | (CmpOp::Gt, CmpOp::Ge) => r || self.eq_value(a, b)?,
            (CmpOp::Le, CmpOp::Ge) | (CmpOp::Ge, CmpOp::Le) => !r || self.eq_value(a, b)?,
            (CmpOp::Le, CmpOp::Lt) | (CmpOp::Ge, CmpOp::Gt) => r && !self.eq_value(a, b)?,
            // opposite strictness: lt<->ge, le<->gt
            _ => !r,
        };

        Ok(Comparable::Value(derived))
    }

    fn eq_value(&self, a: &Value, b: &Value) -> Result<bool, Error> {
        Ok(self.eq(a, b)?.is_true())
    }

    fn comparable(&self, a: &Value, b: &Value) -> bool {
        !self.require_same_type || a.kind() == b.kind()
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops: Vec<String> = CmpOp::ALL
            .iter()
            .filter(|op| self.ops[slot(**op)].is_some())
            .map(ToString::to_string)
            .collect();

        f.debug_struct("Comparator")
            .field("name", &self.name)
            .field("eq", &self.eq.is_some())
            .field("ops", &ops)
            .field("require_same_type", &self.require_same_type)
            .finish()
    }
}

const fn slot(op: CmpOp) -> usize {
    match op {
        CmpOp::Lt => 0,
        CmpOp::Le => 1,
        CmpOp::Gt => 2,
        CmpOp::Ge => 3,
    }
}

///
/// ComparatorBuilder
///

pub struct ComparatorBuilder {
    name: String,
    eq: Option<Arc<CmpFn>>,
    ops: [Option<Arc<CmpFn>>; 4],
    require_same_type: bool,
}

impl Default for ComparatorBuilder {
    fn default() -> Self {
        Self {
            name: "Comparable".to_string(),
            eq: None,
            ops: [None, None, None, None],
            require_same_type: true,
        }
    }
}

impl ComparatorBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn eq<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Comparable<bool>, Error> + Send + Sync + 'static,
    {
        self.eq = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn op<F>(mut self, op: CmpOp, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Comparable<bool>, Error> + Send + Sync + 'static,
    {
        self.ops[slot(op)] = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn lt<F>(self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Comparable<bool>, Error> + Send + Sync + 'static,
    {
        self.op(CmpOp::Lt, f)
    }

    #[must_use]
    pub fn le<F>(self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Comparable<bool>, Error> + Send + Sync + 'static,
    {
        self.op(CmpOp::Le, f)
    }

    #[must_use]
    pub fn gt<F>(self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Comparable<bool>, Error> + Send + Sync + 'static,
    {
        self.op(CmpOp::Gt, f)
    }

    #[must_use]
    pub fn ge<F>(self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Comparable<bool>, Error> + Send + Sync + 'static,
    {
        self.op(CmpOp::Ge, f)
    }

    #[must_use]
    pub const fn require_same_type(mut self, require: bool) -> Self {
        self.require_same_type = require;
        self
    }

    /// Finish the comparator. A partial ordering without `eq` cannot be
    /// completed and is rejected.
    pub fn build(self) -> Result<Comparator, AssembleError> {
        let supplied = self.ops.iter().filter(|f| f.is_some()).count();
        if (1..4).contains(&supplied) && self.eq.is_none() {
            return Err(AssembleError::IncompleteOrdering);
        }

        let root = CmpOp::ALL
            .into_iter()
            .find(|op| self.ops[slot(*op)].is_some());

        Ok(Comparator {
            name: self.name,
            eq: self.eq,
            ops: self.ops,
            root,
            require_same_type: self.require_same_type,
        })
    }
}
