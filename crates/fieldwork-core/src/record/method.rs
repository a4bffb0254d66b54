use crate::{
    compare::{CmpOp, Comparable, fields_equal, fields_hash, fields_order},
    error::Error,
    model::{EqFn, Field, FieldList, HashFn, InitFn, OrderFn, ReprFn, ReprSpec},
    record::{Instance, RecordId},
    value::ValueHasher,
};
use std::{fmt, sync::Arc};

///
/// ResolvedMethods
///
/// Behaviour resolved for one record type at assembly. Inherited behaviour
/// is a clone of the ancestor's resolved entry, so a generated method keeps
/// the field list of the type that generated it.
///

#[derive(Clone, Debug)]
pub(crate) struct ResolvedMethods {
    pub(crate) init: InitImpl,
    pub(crate) repr: ReprImpl,
    pub(crate) eq: EqImpl,
    pub(crate) order: OrderImpl,
    pub(crate) hash: HashImpl,
}

impl ResolvedMethods {
    /// What a type with no ancestors and nothing generated would have.
    pub(crate) const fn object() -> Self {
        Self {
            init: InitImpl::Object,
            repr: ReprImpl::Object,
            eq: EqImpl::Identity,
            order: OrderImpl::Object,
            hash: HashImpl::Identity,
        }
    }
}

///
/// InitImpl
///

#[derive(Clone)]
pub(crate) enum InitImpl {
    Generated(FieldList),
    User(Arc<InitFn>),
    Object,
}

///
/// ReprImpl
///

#[derive(Clone)]
pub(crate) enum ReprImpl {
    Generated(FieldList),
    User(Arc<ReprFn>),
    Object,
}

impl ReprImpl {
    pub(crate) fn render(&self, inst: &Instance) -> String {
        let name = inst.record_type().name();

        match self {
            Self::Generated(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .filter(|field| !matches!(field.repr, ReprSpec::Skip))
                    .filter_map(|field| {
                        let rendered = match inst.raw_get(&field.name) {
                            Ok(supplied) => match supplied.as_value() {
                                Some(value) => field.render(value)?,
                                None => "NOTHING".to_string(),
                            },
                            Err(_) => return None,
                        };
                        Some(format!("{}={rendered}", field.name))
                    })
                    .collect();

                format!("{name}({})", parts.join(", "))
            }
            Self::User(f) => f(inst),
            Self::Object => format!("<{name} object>"),
        }
    }
}

///
/// EqImpl
///

#[derive(Clone)]
pub(crate) enum EqImpl {
    Generated {
        fields: FieldList,
        require_same_type: bool,
    },
    User(Arc<EqFn>),
    Identity,
}

impl EqImpl {
    pub(crate) fn eq(&self, left: &Instance, right: &Instance) -> Result<Comparable<bool>, Error> {
        match self {
            Self::Generated {
                fields,
                require_same_type,
            } => {
                if !same_type_guard(fields, *require_same_type, left, right, |f| f.is_eq()) {
                    return Ok(Comparable::NotComparable);
                }

                fields_equal(fields, left, right).map(Comparable::Value)
            }
            Self::User(f) => f(left, right),
            Self::Identity => Ok(if left.same_object(right) {
                Comparable::Value(true)
            } else {
                Comparable::NotComparable
            }),
        }
    }

    pub(crate) const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

///
/// OrderImpl
///

#[derive(Clone)]
pub(crate) enum OrderImpl {
    Generated {
        fields: FieldList,
        require_same_type: bool,
    },
    User(Arc<OrderFn>),
    Object,
}

impl OrderImpl {
    pub(crate) fn compare(
        &self,
        op: CmpOp,
        left: &Instance,
        right: &Instance,
    ) -> Result<Comparable<bool>, Error> {
        match self {
            Self::Generated {
                fields,
                require_same_type,
            } => {
                if !same_type_guard(fields, *require_same_type, left, right, |f| f.is_order()) {
                    return Ok(Comparable::NotComparable);
                }

                fields_order(op, fields, left, right).map(Comparable::Value)
            }
            Self::User(f) => f(op, left, right),
            Self::Object => Ok(Comparable::NotComparable),
        }
    }
}

///
/// HashImpl
///

#[derive(Clone)]
pub(crate) enum HashImpl {
    Generated { id: RecordId, fields: FieldList },
    User(Arc<HashFn>),
    Identity,
    Unhashable,
}

impl HashImpl {
    pub(crate) fn hash(&self, inst: &Instance) -> Result<u64, Error> {
        match self {
            Self::Generated { id, fields } => fields_hash(*id, fields, inst),
            Self::User(f) => f(inst),
            Self::Identity => {
                let mut hasher = ValueHasher::new();
                hasher.write_u64(inst.serial());

                Ok(hasher.finish())
            }
            Self::Unhashable => Err(Error::type_error(format!(
                "unhashable record: '{}'",
                inst.record_type().name()
            ))),
        }
    }

    pub(crate) const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

// Same record type, or (when relaxed) a record exposing every compared
// field by name.
fn same_type_guard(
    fields: &FieldList,
    require_same_type: bool,
    left: &Instance,
    right: &Instance,
    compared: impl Fn(&Field) -> bool,
) -> bool {
    if left.record_type().id() == right.record_type().id() {
        return true;
    }
    if require_same_type {
        return false;
    }

    let other = right.record_type().fields();
    fields
        .iter()
        .filter(|f| compared(f))
        .all(|f| other.contains(&f.name))
}

///
/// DEBUG
///

// variant names only; the payloads are closures and field lists
macro_rules! debug_variants {
    ($ty:ident: $($variant:ident),* $(,)?) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant { .. } => f.write_str(stringify!($variant)),)*
                }
            }
        }
    };
}

debug_variants!(InitImpl: Generated, User, Object);
debug_variants!(ReprImpl: Generated, User, Object);
debug_variants!(EqImpl: Generated, User, Identity);
debug_variants!(OrderImpl: Generated, User, Object);
debug_variants!(HashImpl: Generated, User, Identity, Unhashable);
