//! The convenience facade: `define`, `frozen` and `mutable` start a record
//! declaration with the modern defaults and assemble it on `build`.
//!
//! Compared with bare `Options`, a defined record is not ordered unless
//! asked to be.

use fieldwork_core::{
    Error, assemble,
    init::Args,
    model::{Field, Options, RecordDecl},
    mutate::SetHook,
    record::{Instance, RecordType},
};
use std::sync::Arc;

/// Start a mutable record declaration.
#[must_use]
pub fn define(name: impl Into<String>) -> Define {
    Define::new(name)
}

/// Same as `define`.
#[must_use]
pub fn mutable(name: impl Into<String>) -> Define {
    Define::new(name)
}

/// Start a frozen record declaration.
#[must_use]
pub fn frozen(name: impl Into<String>) -> Define {
    Define::new(name).frozen(true)
}

///
/// Define
///
/// Declaration plus options, assembled by `build`.
///

#[derive(Debug)]
pub struct Define {
    decl: RecordDecl,
    options: Options,
}

impl Define {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            decl: RecordDecl::new(name),
            options: Options::default().order(false),
        }
    }

    ///
    /// DECLARATION
    ///

    #[must_use]
    pub fn base(mut self, base: &Arc<RecordType>) -> Self {
        self.decl = self.decl.base(base);
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.decl = self.decl.field(field);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.decl = self.decl.fields(fields);
        self
    }

    #[must_use]
    pub fn pre_init<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.decl = self.decl.pre_init(f);
        self
    }

    #[must_use]
    pub fn post_init<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.decl = self.decl.post_init(f);
        self
    }

    #[must_use]
    pub fn init_subclass<F>(mut self, f: F) -> Self
    where
        F: Fn(&Arc<RecordType>) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.decl = self.decl.init_subclass(f);
        self
    }

    #[must_use]
    pub fn init_method<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Instance, Args) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.decl = self.decl.init_method(f);
        self
    }

    #[must_use]
    pub fn repr_method<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance) -> String + Send + Sync + 'static,
    {
        self.decl = self.decl.repr_method(f);
        self
    }

    ///
    /// OPTIONS
    ///

    #[must_use]
    pub fn frozen(mut self, frozen: bool) -> Self {
        self.options = self.options.frozen(frozen);
        self
    }

    #[must_use]
    pub fn eq(mut self, eq: bool) -> Self {
        self.options = self.options.eq(eq);
        self
    }

    #[must_use]
    pub fn order(mut self, order: bool) -> Self {
        self.options = self.options.order(order);
        self
    }

    #[must_use]
    pub fn hash(mut self, hash: bool) -> Self {
        self.options = self.options.hash(hash);
        self
    }

    #[must_use]
    pub fn kw_only(mut self, kw_only: bool) -> Self {
        self.options = self.options.kw_only(kw_only);
        self
    }

    #[must_use]
    pub fn cache_hash(mut self, cache_hash: bool) -> Self {
        self.options = self.options.cache_hash(cache_hash);
        self
    }

    #[must_use]
    pub fn slots(mut self, slots: bool) -> Self {
        self.options = self.options.slots(slots);
        self
    }

    #[must_use]
    pub fn on_setattr(mut self, hooks: impl IntoIterator<Item = SetHook>) -> Self {
        self.options = self.options.on_setattr(hooks.into_iter().collect());
        self
    }

    /// Adjust any remaining option directly.
    #[must_use]
    pub fn options(mut self, f: impl FnOnce(Options) -> Options) -> Self {
        self.options = f(self.options);
        self
    }

    /// Assemble (and register) the record type.
    pub fn build(self) -> Result<Arc<RecordType>, Error> {
        log::debug!("defining record {}", self.decl.name);

        assemble(self.decl, self.options)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwork_core::{args, compare::Comparable, value::Value};

    #[test]
    fn defined_records_compare_but_do_not_order() {
        let ty = define("Point")
            .field(Field::new("x"))
            .field(Field::new("y").default(0))
            .build()
            .unwrap();
        let a = ty.instantiate(args![1]).unwrap();
        let b = ty.instantiate(args![1, 0]).unwrap();

        assert_eq!(a, b);
        assert_eq!(ty.lt(&a, &b).unwrap(), Comparable::NotComparable);
        assert!(!ty.is_hashable());
    }

    #[test]
    fn frozen_records_hash_and_reject_writes() {
        let ty = frozen("Coord")
            .field(Field::new("lat"))
            .field(Field::new("lon"))
            .order(true)
            .build()
            .unwrap();
        let mut c = ty.instantiate(args![1.5, 2.5]).unwrap();

        assert!(ty.is_frozen() && ty.is_hashable());
        assert!(c.set("lat", 0).unwrap_err().is_frozen());
        assert_eq!(c.get("lat").unwrap(), &Value::Float(1.5));
    }

    #[test]
    fn options_escape_hatch() {
        let ty = mutable("Loose")
            .field(Field::new("a"))
            .options(|o| o.slots(false))
            .build()
            .unwrap();
        let mut loose = ty.instantiate(args![1]).unwrap();

        loose.set("extra", 2).unwrap();
        assert_eq!(loose.get("extra").unwrap(), &Value::Int(2));
    }
}
