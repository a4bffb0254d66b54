//! Field collection: ancestor linearization, the inheritance merge and the
//! structural checks run over the merged list.

use crate::{
    MAX_FIELD_NAME_LEN,
    error::AssembleError,
    model::{CmpSpec, Field, FieldList},
    record::RecordType,
};
use std::{collections::BTreeSet, sync::Arc};

// ============================================================================
// Linearization
// ============================================================================

/// C3 linearization of `bases`: the ancestors of a new type, nearest first,
/// excluding the type itself.
pub fn linearize(
    record: &str,
    bases: &[Arc<RecordType>],
) -> Result<Vec<Arc<RecordType>>, AssembleError> {
    let mut seqs: Vec<Vec<Arc<RecordType>>> = bases
        .iter()
        .map(|base| {
            std::iter::once(Arc::clone(base))
                .chain(base.ancestors().iter().cloned())
                .collect()
        })
        .collect();
    seqs.push(bases.to_vec());

    let mut out: Vec<Arc<RecordType>> = Vec::new();
    loop {
        seqs.retain(|seq| !seq.is_empty());
        if seqs.is_empty() {
            return Ok(out);
        }

        // first head that appears in no tail
        let head = seqs
            .iter()
            .map(|seq| &seq[0])
            .find(|candidate| {
                !seqs
                    .iter()
                    .any(|seq| seq[1..].iter().any(|t| t.id() == candidate.id()))
            })
            .cloned()
            .ok_or_else(|| AssembleError::InconsistentMro {
                record: record.to_string(),
            })?;

        for seq in &mut seqs {
            if seq[0].id() == head.id() {
                seq.remove(0);
            }
        }
        out.push(head);
    }
}

// ============================================================================
// Merge
// ============================================================================

/// Check own fields and merge them under the ancestors' fields.
///
/// Ancestors are walked most-base first, each contributing its own fields
/// marked inherited. A name that is already placed keeps its position and
/// takes the newer descriptor.
pub fn merge(
    record: &str,
    ancestors: &[Arc<RecordType>],
    own: &[Field],
    auto_attribs: bool,
) -> Result<Vec<Field>, AssembleError> {
    check_own(record, own, auto_attribs)?;

    let mut merged: Vec<Field> = Vec::new();
    for ancestor in ancestors.iter().rev() {
        for field in ancestor.own_fields().iter() {
            let mut field = field.clone();
            field.inherited = true;
            place(&mut merged, field);
        }
    }
    for field in own {
        let mut field = field.clone();
        field.inherited = false;
        place(&mut merged, field);
    }

    Ok(merged)
}

fn place(merged: &mut Vec<Field>, field: Field) {
    match merged.iter_mut().find(|f| f.name == field.name) {
        Some(slot) => *slot = field,
        None => merged.push(field),
    }
}

fn check_own(record: &str, own: &[Field], auto_attribs: bool) -> Result<(), AssembleError> {
    let mut seen = BTreeSet::new();
    for field in own {
        if !is_identifier(&field.name, MAX_FIELD_NAME_LEN) {
            return Err(AssembleError::InvalidName {
                record: record.to_string(),
                name: field.name.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(AssembleError::DuplicateField {
                record: record.to_string(),
                field: field.name.clone(),
            });
        }
    }

    if auto_attribs {
        let unannotated: Vec<String> = own
            .iter()
            .filter(|f| f.ty.is_none())
            .map(|f| f.name.clone())
            .collect();

        if !unannotated.is_empty() {
            return Err(AssembleError::Unannotated {
                record: record.to_string(),
                fields: unannotated,
            });
        }
    }

    Ok(())
}

// ============================================================================
// Finalize
// ============================================================================

/// Resolve aliases and run the checks that need the final order.
pub fn finalize(record: &str, fields: Vec<Field>) -> Result<FieldList, AssembleError> {
    let mut fields = fields;
    let mut names = BTreeSet::new();
    for field in &mut fields {
        if !names.insert(field.name.clone()) {
            return Err(AssembleError::DuplicateField {
                record: record.to_string(),
                field: field.name.clone(),
            });
        }
        if field.alias.is_none() {
            field.alias = Some(Field::default_alias(&field.name));
        }
        if !field.is_eq() && matches!(field.order, Some(ref o) if !matches!(o, CmpSpec::Skip)) {
            return Err(AssembleError::invalid_option(
                record,
                format!("field '{}': order can only be enabled if eq is too", field.name),
            ));
        }
    }

    check_mandatory_order(record, &fields)?;
    check_aliases(record, &fields)?;

    Ok(FieldList::new(fields))
}

// A required positional parameter may not follow one with a default.
fn check_mandatory_order(record: &str, fields: &[Field]) -> Result<(), AssembleError> {
    let mut after: Option<&str> = None;

    for field in fields.iter().filter(|f| f.is_positional()) {
        match (after, field.has_default()) {
            (Some(after), false) => {
                return Err(AssembleError::MandatoryAfterDefault {
                    record: record.to_string(),
                    field: field.name.clone(),
                    after: after.to_string(),
                });
            }
            (None, true) => after = Some(&field.name),
            _ => {}
        }
    }

    Ok(())
}

fn check_aliases(record: &str, fields: &[Field]) -> Result<(), AssembleError> {
    let mut seen = BTreeSet::new();

    for field in fields.iter().filter(|f| f.init) {
        let alias = field.init_alias();
        if !is_identifier(alias, MAX_FIELD_NAME_LEN) {
            return Err(AssembleError::InvalidName {
                record: record.to_string(),
                name: alias.to_string(),
            });
        }
        if !seen.insert(alias) {
            return Err(AssembleError::DuplicateParameter {
                record: record.to_string(),
                alias: alias.to_string(),
            });
        }
    }

    Ok(())
}

/// ASCII identifier: a letter or underscore, then letters, digits or
/// underscores.
#[must_use]
pub fn is_identifier(name: &str, max_len: usize) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    name.len() <= max_len
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

///
/// TESTS
///
