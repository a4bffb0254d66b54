//! Type assembly: turn a `RecordDecl` plus `Options` into a finished,
//! registered `RecordType`.

use crate::{
    MAX_RECORD_NAME_LEN,
    collect::{self, is_identifier},
    error::{AssembleError, Error},
    model::{FieldList, Hooks, Methods, Options, RecordDecl},
    mutate::{SetHook, Setattr},
    record::{
        RecordId, RecordType,
        method::{EqImpl, HashImpl, InitImpl, OrderImpl, ReprImpl, ResolvedMethods},
    },
    registry,
};
use std::sync::Arc;

/// Assemble a record type.
///
/// All structural checks run here; on success the type is immutable,
/// registered, and ready to instantiate.
pub fn assemble(decl: RecordDecl, options: Options) -> Result<Arc<RecordType>, Error> {
    let RecordDecl {
        name,
        bases,
        fields: mut own,
        hooks: declared_hooks,
        methods,
    } = decl;

    if !is_identifier(&name, MAX_RECORD_NAME_LEN) {
        return Err(AssembleError::InvalidName {
            record: name.clone(),
            name,
        }
        .into());
    }

    // fields
    let ancestors = collect::linearize(&name, &bases)?;
    if options.kw_only {
        for field in &mut own {
            field.kw_only = true;
        }
    }
    let merged = collect::merge(&name, &ancestors, &own, options.auto_attribs)?;
    let merged = match &options.field_transformer {
        Some(transform) => transform(&name, merged)?,
        None => merged,
    };
    let fields = collect::finalize(&name, merged)?;
    let own_fields = FieldList::new(fields.iter().filter(|f| !f.inherited).cloned().collect());

    // mutation
    let frozen = resolve_frozen(&name, &ancestors, &options, &own_fields)?;
    let setattr = resolve_setattr(frozen, &ancestors, &options);

    // methods
    let id = RecordId::next();
    let resolved = resolve_methods(&name, id, &fields, &ancestors, &options, methods, frozen)?;

    if options.cache_hash {
        if !resolved.hash.is_generated() {
            return Err(AssembleError::invalid_option(
                &name,
                "cache_hash requires hashing to be enabled, explicitly or implicitly",
            )
            .into());
        }
        if !frozen {
            return Err(
                AssembleError::invalid_option(&name, "cache_hash requires a frozen record").into(),
            );
        }
    }

    // layout
    let slots = options.slots && ancestors.iter().all(|a| a.has_slots());
    let weakref = !slots || options.weakref_slot || ancestors.iter().any(|a| a.weakref_enabled());
    let match_args = if options.match_args {
        Some(
            fields
                .iter()
                .filter(|f| f.is_positional())
                .map(|f| f.name.clone())
                .collect(),
        )
    } else {
        ancestors.first().and_then(|a| a.match_args.clone())
    };
    let hooks = resolve_hooks(&declared_hooks, &ancestors);

    let ty = Arc::new(RecordType {
        id,
        name,
        ancestors,
        own_fields,
        fields,
        frozen,
        slots,
        weakref,
        cache_hash: options.cache_hash,
        match_args,
        setattr,
        declared_hooks,
        hooks,
        methods: resolved,
    });

    log::debug!(
        "assembled record type '{}' with {} field(s), frozen={}",
        ty.name(),
        ty.fields().len(),
        ty.is_frozen()
    );

    // the nearest ancestor declaring the hook sees every new descendant once
    if let Some(hook) = ty
        .ancestors()
        .iter()
        .find_map(|a| a.declared_hooks.init_subclass.clone())
    {
        hook(&ty)?;
    }

    registry::register(&ty);

    Ok(ty)
}

// ============================================================================
// Mutation policy
// ============================================================================

// Frozen-ness is inherited and cannot be switched off underneath a frozen
// ancestor.
fn resolve_frozen(
    record: &str,
    ancestors: &[Arc<RecordType>],
    options: &Options,
    own_fields: &FieldList,
) -> Result<bool, AssembleError> {
    let frozen_ancestor = ancestors.iter().find(|a| a.is_frozen());

    if options.frozen == Some(false)
        && let Some(ancestor) = frozen_ancestor
    {
        return Err(AssembleError::frozen_conflict(
            record,
            format!("cannot be mutable: ancestor '{}' is frozen", ancestor.name()),
        ));
    }

    let frozen = options.frozen.unwrap_or(false) || frozen_ancestor.is_some();
    if frozen {
        if options.on_setattr.is_some() {
            return Err(AssembleError::frozen_conflict(
                record,
                "frozen records cannot declare on_setattr hooks",
            ));
        }
        if let Some(field) = own_fields.iter().find(|f| f.on_setattr.is_some()) {
            return Err(AssembleError::frozen_conflict(
                record,
                format!("field '{}' declares on_setattr on a frozen record", field.name),
            ));
        }
    }

    Ok(frozen)
}

fn resolve_setattr(frozen: bool, ancestors: &[Arc<RecordType>], options: &Options) -> Setattr {
    if frozen {
        return Setattr::Frozen;
    }

    let hooks = match (&options.on_setattr, ancestors.first()) {
        (Some(hooks), _) => hooks.clone(),
        (None, Some(parent)) => return parent.setattr().clone(),
        (None, None) => SetHook::default_pipeline(),
    };

    if hooks.is_empty() {
        Setattr::Plain
    } else {
        Setattr::Hooks(hooks)
    }
}

// ============================================================================
// Method resolution
// ============================================================================

///
/// Choice
///

enum Choice<T> {
    Generate,
    User(T),
    Inherit,
}

// An explicit flag wins; unset generates unless auto-detect finds a
// hand-written method or the behaviour is off by default.
fn choose<T>(
    flag: Option<bool>,
    auto_detect: bool,
    user: Option<T>,
    default_on: bool,
) -> Choice<T> {
    match flag {
        Some(true) => Choice::Generate,
        Some(false) => user.map_or(Choice::Inherit, Choice::User),
        None => match user {
            Some(user) if auto_detect => Choice::User(user),
            _ if default_on => Choice::Generate,
            Some(user) => Choice::User(user),
            None => Choice::Inherit,
        },
    }
}

fn resolve_methods(
    record: &str,
    id: RecordId,
    fields: &FieldList,
    ancestors: &[Arc<RecordType>],
    options: &Options,
    methods: Methods,
    frozen: bool,
) -> Result<ResolvedMethods, AssembleError> {
    if options.eq == Some(false) && options.order == Some(true) {
        return Err(AssembleError::invalid_option(
            record,
            "order can only be enabled if eq is too",
        ));
    }

    let inherited = ancestors
        .first()
        .map_or_else(ResolvedMethods::object, |parent| parent.methods.clone());
    let auto = options.auto_detect;
    let require_same_type = options.require_same_type;
    let Methods {
        init,
        repr,
        eq,
        order,
        hash,
    } = methods;

    let init = match choose(options.init, auto, init, true) {
        Choice::Generate => InitImpl::Generated(fields.clone()),
        Choice::User(f) => InitImpl::User(f),
        Choice::Inherit => inherited.init,
    };

    let repr = match choose(options.repr, auto, repr, true) {
        Choice::Generate => ReprImpl::Generated(fields.clone()),
        Choice::User(f) => ReprImpl::User(f),
        Choice::Inherit => inherited.repr,
    };

    let user_eq = eq.is_some();
    let eq = match choose(options.eq, auto, eq, true) {
        Choice::Generate => EqImpl::Generated {
            fields: fields.clone(),
            require_same_type,
        },
        Choice::User(f) => EqImpl::User(f),
        Choice::Inherit => inherited.eq,
    };
    let eq_generated = eq.is_generated();

    let order = match choose(options.order, auto, order, eq_generated) {
        Choice::Generate => OrderImpl::Generated {
            fields: fields.clone(),
            require_same_type,
        },
        Choice::User(f) => OrderImpl::User(f),
        Choice::Inherit => inherited.order,
    };

    // a hand-written hash counts as an explicit "leave hashing alone"
    let hash_flag = match options.hash {
        None if auto && hash.is_some() => Some(false),
        flag => flag,
    };
    let hash = match hash_flag {
        Some(true) => HashImpl::Generated {
            id,
            fields: fields.clone(),
        },
        None if eq_generated && frozen => HashImpl::Generated {
            id,
            fields: fields.clone(),
        },
        None if eq_generated => HashImpl::Unhashable,
        _ => match hash {
            Some(f) => HashImpl::User(f),
            None if user_eq && !eq_generated => HashImpl::Unhashable,
            None => inherited.hash,
        },
    };

    Ok(ResolvedMethods {
        init,
        repr,
        eq,
        order,
        hash,
    })
}

// Own hooks win; otherwise the first ancestor, in linearized order, that
// declares the hook.
fn resolve_hooks(declared: &Hooks, ancestors: &[Arc<RecordType>]) -> Hooks {
    let find = |pick: fn(&Hooks) -> bool| {
        std::iter::once(declared)
            .chain(ancestors.iter().map(|a| &a.declared_hooks))
            .find(|h| pick(h))
    };

    Hooks {
        pre_init: find(|h| h.pre_init.is_some()).and_then(|h| h.pre_init.clone()),
        post_init: find(|h| h.post_init.is_some()).and_then(|h| h.post_init.clone()),
        init_subclass: find(|h| h.init_subclass.is_some()).and_then(|h| h.init_subclass.clone()),
    }
}

///
/// TESTS
///
