//! Core runtime for fieldwork: field descriptors, the field collector, the
//! synthesized constructor / comparison / mutation behaviour, and the type
//! assembler that ties them together.
//!
//! Everything here is type-level and computed once per declaration; the
//! resulting `RecordType` is immutable and shared by all of its instances.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod assemble;
pub mod collect;
pub mod compare;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod mutate;
pub mod record;
pub mod registry;
pub mod value;

pub use assemble::assemble;
pub use error::Error;

///
/// CONSTANTS
///

/// Maximum length for field identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Maximum length for record identifiers.
pub const MAX_RECORD_NAME_LEN: usize = 64;

///
/// Prelude
///
/// Domain vocabulary only: declarations, fields, values and instances.
///

pub mod prelude {
    pub use crate::{
        args,
        assemble::assemble,
        compare::{CmpOp, Comparable, Comparator},
        error::Error,
        init::Args,
        model::{
            Converter, Factory, Field, FieldDefault, FieldList, Options, RecordDecl, Supplied,
            Validator,
        },
        mutate::{OnSetattr, SetHook},
        record::{Instance, RecordType},
        value::{Kind, Value},
    };
}
