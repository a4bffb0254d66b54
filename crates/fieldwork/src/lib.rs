//! fieldwork: declarative records with synthesized construction, comparison,
//! hashing and immutability.
//!
//! This is the public crate. It re-exports the record machinery from
//! `fieldwork-core` and adds the pieces built on top of it:
//!   - `define` / `frozen` / `mutable`   (the convenience facade)
//!   - `funcs`                           (asdict, astuple, assoc, evolve…)
//!   - `filters`                         (include / exclude for asdict)
//!   - `base`                            (ready-made validators, converters
//!                                        and setter hooks)

pub mod base;
pub mod define;
pub mod filters;
pub mod funcs;

pub use fieldwork_core as core;

pub use base::{converter as converters, setter as setters, validator as validators};
pub use define::{Define, define, frozen, mutable};
pub use fieldwork_core::{Error, args, config};
pub use funcs::{asdict, assoc, astuple, evolve, fields, fields_dict, has, validate};

//
// Prelude
//

pub mod prelude {
    pub use crate::{
        base::BaseError,
        define::{Define, define, frozen, mutable},
        filters::{Filter, What},
        funcs::{
            AsDict, AsTuple, asdict, assoc, astuple, evolve, fields, fields_dict, has, validate,
        },
    };
    pub use fieldwork_core::prelude::*;
}
