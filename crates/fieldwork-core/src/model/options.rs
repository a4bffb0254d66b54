use crate::{error::Error, model::Field, mutate::SetHook};
use std::{fmt, sync::Arc};

pub type FieldTransformer = dyn Fn(&str, Vec<Field>) -> Result<Vec<Field>, Error> + Send + Sync;

///
/// Options
///
/// Assembly switches for one record type.
///
/// init / repr / eq      → `None` generates unless `auto_detect` finds a
///                         hand-written method; `Some` always wins
/// order                 → `None` follows the effective `eq`
/// hash                  → `None` hashes iff eq && frozen, and makes the
///                         type unhashable iff eq && !frozen
/// frozen                → `None` inherits; frozen ancestors make the type
///                         frozen regardless
/// on_setattr            → `None` inherits the nearest mutable ancestor's
///                         hooks, else convert-then-validate
///

#[derive(Clone)]
pub struct Options {
    pub slots: bool,
    pub frozen: Option<bool>,
    pub kw_only: bool,
    pub auto_detect: bool,
    pub cache_hash: bool,
    pub weakref_slot: bool,
    pub match_args: bool,
    pub init: Option<bool>,
    pub repr: Option<bool>,
    pub eq: Option<bool>,
    pub order: Option<bool>,
    pub hash: Option<bool>,
    pub on_setattr: Option<Vec<SetHook>>,
    pub require_same_type: bool,
    pub auto_attribs: bool,
    pub field_transformer: Option<Arc<FieldTransformer>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            slots: true,
            frozen: None,
            kw_only: false,
            auto_detect: true,
            cache_hash: false,
            weakref_slot: true,
            match_args: true,
            init: None,
            repr: None,
            eq: None,
            order: None,
            hash: None,
            on_setattr: None,
            require_same_type: true,
            auto_attribs: false,
            field_transformer: None,
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn slots(mut self, slots: bool) -> Self {
        self.slots = slots;
        self
    }

    #[must_use]
    pub const fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = Some(frozen);
        self
    }

    #[must_use]
    pub const fn kw_only(mut self, kw_only: bool) -> Self {
        self.kw_only = kw_only;
        self
    }

    #[must_use]
    pub const fn auto_detect(mut self, auto_detect: bool) -> Self {
        self.auto_detect = auto_detect;
        self
    }

    #[must_use]
    pub const fn cache_hash(mut self, cache_hash: bool) -> Self {
        self.cache_hash = cache_hash;
        self
    }

    #[must_use]
    pub const fn weakref_slot(mut self, weakref_slot: bool) -> Self {
        self.weakref_slot = weakref_slot;
        self
    }

    #[must_use]
    pub const fn match_args(mut self, match_args: bool) -> Self {
        self.match_args = match_args;
        self
    }

    #[must_use]
    pub const fn init(mut self, init: bool) -> Self {
        self.init = Some(init);
        self
    }

    #[must_use]
    pub const fn repr(mut self, repr: bool) -> Self {
        self.repr = Some(repr);
        self
    }

    #[must_use]
    pub const fn eq(mut self, eq: bool) -> Self {
        self.eq = Some(eq);
        self
    }

    #[must_use]
    pub const fn order(mut self, order: bool) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub const fn hash(mut self, hash: bool) -> Self {
        self.hash = Some(hash);
        self
    }

    #[must_use]
    pub fn on_setattr(mut self, hooks: Vec<SetHook>) -> Self {
        self.on_setattr = Some(hooks);
        self
    }

    #[must_use]
    pub const fn require_same_type(mut self, require: bool) -> Self {
        self.require_same_type = require;
        self
    }

    #[must_use]
    pub const fn auto_attribs(mut self, auto_attribs: bool) -> Self {
        self.auto_attribs = auto_attribs;
        self
    }

    #[must_use]
    pub fn field_transformer<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Vec<Field>) -> Result<Vec<Field>, Error> + Send + Sync + 'static,
    {
        self.field_transformer = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("slots", &self.slots)
            .field("frozen", &self.frozen)
            .field("kw_only", &self.kw_only)
            .field("auto_detect", &self.auto_detect)
            .field("cache_hash", &self.cache_hash)
            .field("weakref_slot", &self.weakref_slot)
            .field("match_args", &self.match_args)
            .field("init", &self.init)
            .field("repr", &self.repr)
            .field("eq", &self.eq)
            .field("order", &self.order)
            .field("hash", &self.hash)
            .field("on_setattr", &self.on_setattr)
            .field("require_same_type", &self.require_same_type)
            .field("auto_attribs", &self.auto_attribs)
            .field("field_transformer", &self.field_transformer.is_some())
            .finish()
    }
}
