mod instance;
pub(crate) mod method;

use crate::{
    compare::{CmpOp, Comparable},
    error::{Error, LookupError},
    init::{self, Args},
    model::{Field, FieldList, Hooks},
    mutate::Setattr,
    record::method::{InitImpl, ResolvedMethods},
};
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

// re-exports
pub use instance::Instance;

///
/// RecordId
///
/// Process-unique identity of an assembled record type.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RecordId(u64);

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

impl RecordId {
    pub(crate) fn next() -> Self {
        Self(NEXT_RECORD_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// RecordType
///
/// An assembled record type. Immutable once built and shared by every
/// instance through an `Arc`.
///

pub struct RecordType {
    pub(crate) id: RecordId,
    pub(crate) name: String,
    pub(crate) ancestors: Vec<Arc<RecordType>>,
    pub(crate) own_fields: FieldList,
    pub(crate) fields: FieldList,
    pub(crate) frozen: bool,
    pub(crate) slots: bool,
    pub(crate) weakref: bool,
    pub(crate) cache_hash: bool,
    pub(crate) match_args: Option<Vec<String>>,
    pub(crate) setattr: Setattr,
    pub(crate) declared_hooks: Hooks,
    pub(crate) hooks: Hooks,
    pub(crate) methods: ResolvedMethods,
}

impl RecordType {
    ///
    /// INTROSPECTION
    ///

    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every field, ancestors' first, in merge order.
    #[must_use]
    pub const fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// Fields declared on this type itself.
    #[must_use]
    pub const fn own_fields(&self) -> &FieldList {
        &self.own_fields
    }

    pub fn field(&self, name: &str) -> Result<&Field, Error> {
        self.fields.get(name).ok_or_else(|| {
            LookupError::NoField {
                record: self.name.clone(),
                field: name.to_string(),
            }
            .into()
        })
    }

    /// Linearized ancestors, nearest first; excludes the type itself.
    #[must_use]
    pub fn ancestors(&self) -> &[Arc<Self>] {
        &self.ancestors
    }

    /// Whether this type is `name` or inherits from a type of that name.
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.ancestors.iter().any(|a| a.name == name)
    }

    #[must_use]
    pub fn is_subtype_of(&self, other: &Self) -> bool {
        self.id == other.id || self.ancestors.iter().any(|a| a.id == other.id)
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Slotted types reject attributes that are not declared fields.
    #[must_use]
    pub const fn has_slots(&self) -> bool {
        self.slots
    }

    #[must_use]
    pub const fn weakref_enabled(&self) -> bool {
        self.weakref
    }

    #[must_use]
    pub const fn caches_hash(&self) -> bool {
        self.cache_hash
    }

    #[must_use]
    pub const fn is_hashable(&self) -> bool {
        !matches!(self.methods.hash, method::HashImpl::Unhashable)
    }

    /// Positional field names published for pattern matching.
    #[must_use]
    pub fn match_args(&self) -> Option<&[String]> {
        self.match_args.as_deref()
    }

    #[must_use]
    pub const fn setattr(&self) -> &Setattr {
        &self.setattr
    }

    /// Lifecycle hooks in effect, own or inherited.
    #[must_use]
    pub const fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    ///
    /// CONSTRUCTION
    ///

    /// Build an instance from call arguments.
    pub fn instantiate(self: &Arc<Self>, args: Args) -> Result<Instance, Error> {
        let mut inst = Instance::blank(Arc::clone(self));

        match &self.methods.init {
            InitImpl::Generated(fields) => init::construct(&mut inst, fields, args)?,
            InitImpl::User(f) => f(&mut inst, args)?,
            InitImpl::Object => init::reject_args(&self.name, &args)?,
        }

        Ok(inst)
    }

    /// Rebuild an instance from exported state without running the
    /// constructor; names missing from `state` stay unset.
    pub fn restore(
        self: &Arc<Self>,
        state: impl IntoIterator<Item = (String, crate::value::Value)>,
    ) -> Result<Instance, Error> {
        let mut inst = Instance::blank(Arc::clone(self));
        for (name, value) in state {
            inst.raw_set(&name, value)?;
        }

        Ok(inst)
    }

    ///
    /// COMPARISON
    ///

    pub fn eq(&self, left: &Instance, right: &Instance) -> Result<Comparable<bool>, Error> {
        self.methods.eq.eq(left, right)
    }

    pub fn ne(&self, left: &Instance, right: &Instance) -> Result<Comparable<bool>, Error> {
        Ok(self.eq(left, right)?.negate())
    }

    pub fn compare(
        &self,
        op: CmpOp,
        left: &Instance,
        right: &Instance,
    ) -> Result<Comparable<bool>, Error> {
        self.methods.order.compare(op, left, right)
    }

    pub fn lt(&self, left: &Instance, right: &Instance) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Lt, left, right)
    }

    pub fn le(&self, left: &Instance, right: &Instance) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Le, left, right)
    }

    pub fn gt(&self, left: &Instance, right: &Instance) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Gt, left, right)
    }

    pub fn ge(&self, left: &Instance, right: &Instance) -> Result<Comparable<bool>, Error> {
        self.compare(CmpOp::Ge, left, right)
    }

    /// Hash without consulting the instance cache.
    pub fn hash(&self, inst: &Instance) -> Result<u64, Error> {
        self.methods.hash.hash(inst)
    }

    #[must_use]
    pub fn repr(&self, inst: &Instance) -> String {
        self.methods.repr.render(inst)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ancestors: Vec<&str> = self.ancestors.iter().map(|a| a.name()).collect();

        f.debug_struct("RecordType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("ancestors", &ancestors)
            .field("fields", &self.fields)
            .field("frozen", &self.frozen)
            .field("slots", &self.slots)
            .field("weakref", &self.weakref)
            .field("cache_hash", &self.cache_hash)
            .field("match_args", &self.match_args)
            .field("setattr", &self.setattr)
            .field("hooks", &self.hooks)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///
