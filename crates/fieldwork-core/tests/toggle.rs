//! The validator switch is process-wide, so everything touching it lives in
//! a single test of its own binary.

use fieldwork_core::{config, prelude::*};

fn positive() -> Validator {
    Validator::new("positive", |_, field, value| {
        if value.as_int().is_some_and(|n| n > 0) {
            Ok(())
        } else {
            Err(Error::value_error(format!("'{}' must be positive", field.name())))
        }
    })
}

#[test]
fn validator_switch() {
    let ty = assemble(
        RecordDecl::new("Counter").field(Field::new("n").validator(positive())),
        Options::default(),
    )
    .unwrap();

    assert!(config::run_validators());
    assert!(ty.instantiate(args![0]).is_err());

    // plain switch
    config::set_run_validators(false);
    assert!(config::get_disabled());
    let mut inst = ty.instantiate(args![0]).unwrap();
    inst.set("n", -1).unwrap();
    assert_eq!(inst.get("n").unwrap(), &Value::Int(-1));
    config::set_disabled(false);
    assert!(inst.set("n", -2).is_err());

    // scoped: the guard restores the previous setting, even a disabled one
    let outcome = config::with_validators_disabled(|| ty.instantiate(args![-5]).is_ok());
    assert!(outcome);
    assert!(config::run_validators());

    config::set_run_validators(false);
    {
        let _guard = config::disabled();
        assert!(!config::run_validators());
    }
    assert!(!config::run_validators());
    config::set_run_validators(true);

    // a panicking scope still restores
    let result = std::panic::catch_unwind(|| {
        config::with_validators_disabled(|| panic!("boom"));
    });
    assert!(result.is_err());
    assert!(config::run_validators());
}
