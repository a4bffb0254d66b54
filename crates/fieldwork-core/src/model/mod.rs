//! Declaration-side vocabulary: fields, their callables, record
//! declarations and assembly options.

mod decl;
mod field;
mod options;

pub use decl::{
    EqFn, HashFn, HookFn, Hooks, InitFn, Methods, OrderFn, RecordDecl, ReprFn, SubclassFn,
};
pub use field::{
    CmpSpec, ContextConvertFn, ConvertFn, Converter, Factory, FactoryFn, Field, FieldDefault,
    FieldList, FormatFn, KeyFn, NOTHING, ProjectFn, ReprSpec, SelfFactoryFn, Supplied, Validator,
    ValidatorFn,
};
pub use options::{FieldTransformer, Options};
