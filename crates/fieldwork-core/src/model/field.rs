use crate::{
    compare::Comparator,
    error::Error,
    mutate::OnSetattr,
    record::Instance,
    value::{Kind, Value},
};
use derive_more::{Deref, IntoIterator};
use std::{collections::BTreeMap, fmt, sync::Arc};

pub type ValidatorFn = dyn Fn(&Instance, &Field, &Value) -> Result<(), Error> + Send + Sync;
pub type ConvertFn = dyn Fn(Value) -> Result<Value, Error> + Send + Sync;
pub type ContextConvertFn = dyn Fn(Value, &Instance, &Field) -> Result<Value, Error> + Send + Sync;
pub type FactoryFn = dyn Fn() -> Result<Value, Error> + Send + Sync;
pub type SelfFactoryFn = dyn Fn(&Instance) -> Result<Value, Error> + Send + Sync;
pub type ProjectFn = dyn Fn(&Value) -> Result<Value, Error> + Send + Sync;
pub type FormatFn = dyn Fn(&Value) -> String + Send + Sync;

///
/// FieldList
///
/// Ordered field descriptors of one record type. Names are unique once the
/// list comes out of the collector.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator)]
pub struct FieldList(#[into_iterator(owned, ref)] Vec<Field>);

impl FieldList {
    #[must_use]
    pub const fn new(fields: Vec<Field>) -> Self {
        Self(fields)
    }

    // get
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|f| f.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.name.as_str())
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Field> {
        self.0
    }
}

impl From<Vec<Field>> for FieldList {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

///
/// Field
///
/// Declaration of one record field. Built with the chained setters below and
/// frozen once it is part of an assembled type (types only hand out shared
/// references to their fields).
///
/// `order` and `hash` left unset follow `eq`. `alias` left unset becomes the
/// name with one leading underscore stripped.
///

#[derive(Clone)]
pub struct Field {
    pub name: String,
    pub alias: Option<String>,
    pub default: FieldDefault,
    pub validators: Vec<Validator>,
    pub converter: Option<Converter>,
    pub init: bool,
    pub repr: ReprSpec,
    pub eq: CmpSpec,
    pub order: Option<CmpSpec>,
    pub hash: Option<bool>,
    pub kw_only: bool,
    pub metadata: BTreeMap<String, Value>,
    pub inherited: bool,
    pub ty: Option<Kind>,
    pub on_setattr: Option<OnSetattr>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            default: FieldDefault::Nothing,
            validators: Vec::new(),
            converter: None,
            init: true,
            repr: ReprSpec::Include,
            eq: CmpSpec::Include,
            order: None,
            hash: None,
            kw_only: false,
            metadata: BTreeMap::new(),
            inherited: false,
            ty: None,
            on_setattr: None,
        }
    }

    ///
    /// BUILDER
    ///

    #[must_use]
    pub fn ty(mut self, kind: Kind) -> Self {
        self.ty = Some(kind);
        self
    }

    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    #[must_use]
    pub fn factory<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.default = FieldDefault::Factory(Factory::new(f));
        self
    }

    /// Factory that receives the partially built instance.
    #[must_use]
    pub fn factory_takes_self<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.default = FieldDefault::Factory(Factory::takes_self(f));
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    #[must_use]
    pub fn validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.validators.extend(validators);
        self
    }

    #[must_use]
    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    #[must_use]
    pub const fn init(mut self, init: bool) -> Self {
        self.init = init;
        self
    }

    #[must_use]
    pub const fn kw_only(mut self, kw_only: bool) -> Self {
        self.kw_only = kw_only;
        self
    }

    #[must_use]
    pub fn repr(mut self, include: bool) -> Self {
        self.repr = if include {
            ReprSpec::Include
        } else {
            ReprSpec::Skip
        };
        self
    }

    #[must_use]
    pub fn repr_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.repr = ReprSpec::Custom(Arc::new(f));
        self
    }

    #[must_use]
    pub fn eq(mut self, include: bool) -> Self {
        self.eq = CmpSpec::from(include);
        self
    }

    /// Compare (and hash) a projection of the value instead of the value.
    #[must_use]
    pub fn eq_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.eq = CmpSpec::Key(KeyFn::new(f));
        self
    }

    #[must_use]
    pub fn order(mut self, include: bool) -> Self {
        self.order = Some(CmpSpec::from(include));
        self
    }

    #[must_use]
    pub fn order_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.order = Some(CmpSpec::Key(KeyFn::new(f)));
        self
    }

    /// Compare through a custom comparator for both equality and ordering.
    #[must_use]
    pub fn cmp_using(mut self, cmp: Comparator) -> Self {
        self.eq = CmpSpec::Using(cmp);
        self.order = None;
        self
    }

    #[must_use]
    pub const fn hash(mut self, include: bool) -> Self {
        self.hash = Some(include);
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn on_setattr(mut self, on_setattr: OnSetattr) -> Self {
        self.on_setattr = Some(on_setattr);
        self
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the init parameter bound to this field.
    #[must_use]
    pub fn init_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub const fn has_default(&self) -> bool {
        !matches!(self.default, FieldDefault::Nothing)
    }

    /// Whether the field binds a positional init parameter.
    #[must_use]
    pub const fn is_positional(&self) -> bool {
        self.init && !self.kw_only
    }

    #[must_use]
    pub const fn eq_spec(&self) -> &CmpSpec {
        &self.eq
    }

    #[must_use]
    pub fn order_spec(&self) -> &CmpSpec {
        self.order.as_ref().unwrap_or(&self.eq)
    }

    #[must_use]
    pub const fn is_eq(&self) -> bool {
        !matches!(self.eq, CmpSpec::Skip)
    }

    #[must_use]
    pub fn is_order(&self) -> bool {
        !matches!(self.order_spec(), CmpSpec::Skip)
    }

    #[must_use]
    pub fn is_hashed(&self) -> bool {
        self.hash.unwrap_or_else(|| self.is_eq())
    }

    /// Run every validator in declaration order; the first failure wins.
    pub fn validate(&self, inst: &Instance, value: &Value) -> Result<(), Error> {
        for validator in &self.validators {
            validator.call(inst, self, value)?;
        }

        Ok(())
    }

    /// Apply the converter, if any.
    pub fn convert(&self, inst: &Instance, value: Value) -> Result<Value, Error> {
        match &self.converter {
            Some(converter) => converter.convert(value, inst, self),
            None => Ok(value),
        }
    }

    /// Render the value for the generated repr; `None` when skipped.
    #[must_use]
    pub fn render(&self, value: &Value) -> Option<String> {
        match &self.repr {
            ReprSpec::Include => Some(value.repr()),
            ReprSpec::Skip => None,
            ReprSpec::Custom(f) => Some(f(value)),
        }
    }

    /// Default alias for a field name: exactly one leading underscore is
    /// dropped.
    #[must_use]
    pub fn default_alias(name: &str) -> String {
        name.strip_prefix('_').unwrap_or(name).to_string()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("default", &self.default)
            .field("validators", &self.validators)
            .field("converter", &self.converter)
            .field("init", &self.init)
            .field("repr", &self.repr)
            .field("eq", &self.eq)
            .field("order", &self.order)
            .field("hash", &self.hash)
            .field("kw_only", &self.kw_only)
            .field("metadata", &self.metadata)
            .field("inherited", &self.inherited)
            .field("ty", &self.ty)
            .field("on_setattr", &self.on_setattr)
            .finish()
    }
}

///
/// Supplied
///
/// Marker for "no value supplied", distinct from `Value::Null`.
///

#[derive(Clone, Debug, Default)]
pub enum Supplied {
    #[default]
    Nothing,
    Value(Value),
}

pub const NOTHING: Supplied = Supplied::Nothing;

impl Supplied {
    #[must_use]
    pub const fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Nothing => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Nothing => None,
        }
    }
}

impl From<Value> for Supplied {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Option<Value>> for Supplied {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Nothing, Self::Value)
    }
}

///
/// FieldDefault
///

#[derive(Clone, Debug, Default)]
pub enum FieldDefault {
    #[default]
    Nothing,
    Value(Value),
    Factory(Factory),
}

impl FieldDefault {
    /// Produce the default for `inst`; `None` when the field has none.
    pub fn resolve(&self, inst: &Instance) -> Result<Option<Value>, Error> {
        match self {
            Self::Nothing => Ok(None),
            Self::Value(v) => Ok(Some(v.clone())),
            Self::Factory(factory) => factory.produce(inst).map(Some),
        }
    }
}

///
/// Factory
///

#[derive(Clone)]
pub enum Factory {
    Plain(Arc<FactoryFn>),
    TakesSelf(Arc<SelfFactoryFn>),
}

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(f))
    }

    pub fn takes_self<F>(f: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::TakesSelf(Arc::new(f))
    }

    #[must_use]
    pub const fn is_takes_self(&self) -> bool {
        matches!(self, Self::TakesSelf(_))
    }

    pub fn produce(&self, inst: &Instance) -> Result<Value, Error> {
        match self {
            Self::Plain(f) => f(),
            Self::TakesSelf(f) => f(inst),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Factory"),
            Self::TakesSelf(_) => f.write_str("Factory(takes_self)"),
        }
    }
}

///
/// Validator
///
/// Named check over `(instance, field, value)`. Validators never transform
/// the value; a rejection is any `Err`.
///

#[derive(Clone)]
pub struct Validator {
    name: String,
    check: Arc<ValidatorFn>,
}

impl Validator {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Instance, &Field, &Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, inst: &Instance, field: &Field, value: &Value) -> Result<(), Error> {
        (self.check)(inst, field, value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} validator>", self.name)
    }
}

///
/// Converter
///
/// Plain converters see only the value; contextual ones also get the
/// instance under construction and the field. `FillsNull` marks a converter
/// whose purpose is replacing `Null`.
///

#[derive(Clone)]
pub enum Converter {
    Plain(Arc<ConvertFn>),
    Contextual(Arc<ContextConvertFn>),
    FillsNull(Arc<Self>),
}

impl Converter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(f))
    }

    pub fn contextual<F>(f: F) -> Self
    where
        F: Fn(Value, &Instance, &Field) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::Contextual(Arc::new(f))
    }

    /// Mark this converter as one that replaces `Null`.
    #[must_use]
    pub fn fills_null(self) -> Self {
        match self {
            Self::FillsNull(_) => self,
            other => Self::FillsNull(Arc::new(other)),
        }
    }

    #[must_use]
    pub const fn is_null_filling(&self) -> bool {
        matches!(self, Self::FillsNull(_))
    }

    pub fn convert(&self, value: Value, inst: &Instance, field: &Field) -> Result<Value, Error> {
        match self {
            Self::Plain(f) => f(value),
            Self::Contextual(f) => f(value, inst, field),
            Self::FillsNull(inner) => inner.convert(value, inst, field),
        }
    }

    /// Chain converters; each output feeds the next.
    ///
    /// The chain fills `Null` when its first stage does.
    #[must_use]
    pub fn pipe(converters: Vec<Self>) -> Self {
        let fills_null = converters.first().is_some_and(Self::is_null_filling);
        let chain = Self::contextual(move |value, inst, field| {
            converters
                .iter()
                .try_fold(value, |acc, c| c.convert(acc, inst, field))
        });

        if fills_null {
            chain.fills_null()
        } else {
            chain
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Converter"),
            Self::Contextual(_) => f.write_str("Converter(contextual)"),
            Self::FillsNull(inner) => write!(f, "FillsNull({inner:?})"),
        }
    }
}

///
/// ReprSpec
///

#[derive(Clone, Default)]
pub enum ReprSpec {
    #[default]
    Include,
    Skip,
    Custom(Arc<FormatFn>),
}

impl fmt::Debug for ReprSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => f.write_str("Include"),
            Self::Skip => f.write_str("Skip"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

///
/// CmpSpec
///
/// How a field takes part in equality or ordering.
///

#[derive(Clone, Debug, Default)]
pub enum CmpSpec {
    #[default]
    Include,
    Skip,
    Key(KeyFn),
    Using(Comparator),
}

impl From<bool> for CmpSpec {
    fn from(include: bool) -> Self {
        if include { Self::Include } else { Self::Skip }
    }
}

///
/// KeyFn
///

#[derive(Clone)]
pub struct KeyFn(Arc<ProjectFn>);

impl KeyFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &Value) -> Result<Value, Error> {
        (self.0)(value)
    }
}

impl fmt::Debug for KeyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyFn")
    }
}

///
/// TESTS
///
