use crate::{
    compare::{CmpOp, Comparable},
    error::Error,
    init::Args,
    model::Field,
    record::{Instance, RecordType},
};
use std::{fmt, sync::Arc};

pub type InitFn = dyn Fn(&mut Instance, Args) -> Result<(), Error> + Send + Sync;
pub type HookFn = dyn Fn(&mut Instance) -> Result<(), Error> + Send + Sync;
pub type SubclassFn = dyn Fn(&Arc<RecordType>) -> Result<(), Error> + Send + Sync;
pub type ReprFn = dyn Fn(&Instance) -> String + Send + Sync;
pub type EqFn = dyn Fn(&Instance, &Instance) -> Result<Comparable<bool>, Error> + Send + Sync;
pub type OrderFn =
    dyn Fn(CmpOp, &Instance, &Instance) -> Result<Comparable<bool>, Error> + Send + Sync;
pub type HashFn = dyn Fn(&Instance) -> Result<u64, Error> + Send + Sync;

///
/// RecordDecl
///
/// A bare record declaration: a name, direct bases (already assembled), the
/// own fields in declaration order, lifecycle hooks and any hand-written
/// methods. Nothing is checked until `assemble`.
///

#[derive(Clone)]
pub struct RecordDecl {
    pub name: String,
    pub bases: Vec<Arc<RecordType>>,
    pub fields: Vec<Field>,
    pub hooks: Hooks,
    pub methods: Methods,
}

impl RecordDecl {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            hooks: Hooks::default(),
            methods: Methods::default(),
        }
    }

    #[must_use]
    pub fn base(mut self, base: &Arc<RecordType>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    ///
    /// HOOKS
    ///

    /// Runs on the blank instance before any field is set.
    #[must_use]
    pub fn pre_init<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.hooks.pre_init = Some(Arc::new(f));
        self
    }

    /// Runs after every field is set; may write through `raw_set`.
    #[must_use]
    pub fn post_init<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.hooks.post_init = Some(Arc::new(f));
        self
    }

    /// Runs once for every record type assembled with this one as an
    /// ancestor.
    #[must_use]
    pub fn init_subclass<F>(mut self, f: F) -> Self
    where
        F: Fn(&Arc<RecordType>) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.hooks.init_subclass = Some(Arc::new(f));
        self
    }

    ///
    /// METHODS
    ///

    #[must_use]
    pub fn init_method<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Instance, Args) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.methods.init = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn repr_method<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance) -> String + Send + Sync + 'static,
    {
        self.methods.repr = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn eq_method<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance, &Instance) -> Result<Comparable<bool>, Error> + Send + Sync + 'static,
    {
        self.methods.eq = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn order_method<F>(mut self, f: F) -> Self
    where
        F: Fn(CmpOp, &Instance, &Instance) -> Result<Comparable<bool>, Error>
            + Send
            + Sync
            + 'static,
    {
        self.methods.order = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn hash_method<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance) -> Result<u64, Error> + Send + Sync + 'static,
    {
        self.methods.hash = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for RecordDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bases: Vec<&str> = self.bases.iter().map(|b| b.name()).collect();

        f.debug_struct("RecordDecl")
            .field("name", &self.name)
            .field("bases", &bases)
            .field("fields", &self.fields)
            .field("hooks", &self.hooks)
            .field("methods", &self.methods)
            .finish()
    }
}

///
/// Hooks
///

#[derive(Clone, Default)]
pub struct Hooks {
    pub pre_init: Option<Arc<HookFn>>,
    pub post_init: Option<Arc<HookFn>>,
    pub init_subclass: Option<Arc<SubclassFn>>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_init", &self.pre_init.is_some())
            .field("post_init", &self.post_init.is_some())
            .field("init_subclass", &self.init_subclass.is_some())
            .finish()
    }
}

///
/// Methods
///
/// Hand-written replacements for synthesized behaviour. With `auto_detect`
/// on, a present method suppresses generation unless the option for it is
/// set explicitly.
///

#[derive(Clone, Default)]
pub struct Methods {
    pub init: Option<Arc<InitFn>>,
    pub repr: Option<Arc<ReprFn>>,
    pub eq: Option<Arc<EqFn>>,
    pub order: Option<Arc<OrderFn>>,
    pub hash: Option<Arc<HashFn>>,
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Methods")
            .field("init", &self.init.is_some())
            .field("repr", &self.repr.is_some())
            .field("eq", &self.eq.is_some())
            .field("order", &self.order.is_some())
            .field("hash", &self.hash.is_some())
            .finish()
    }
}
