use fieldwork::{converters, prelude::*};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn evolve_without_changes_is_equal(a in any::<i64>(), b in "[a-z]{0,8}") {
        let ty = frozen("Pair")
            .field(Field::new("a"))
            .field(Field::new("_b"))
            .build()
            .unwrap();
        let inst = ty.instantiate(args![a, b.as_str()]).unwrap();

        let copy = evolve(&inst, Vec::<(String, Value)>::new()).unwrap();
        prop_assert_eq!(&copy, &inst);
        prop_assert_eq!(copy.hash_code().unwrap(), inst.hash_code().unwrap());
        prop_assert!(!copy.same_object(&inst));
    }

    #[test]
    fn asdict_then_keywords_rebuilds(a in -1000i64..1000, flag: bool) {
        let ty = define("Row")
            .field(Field::new("a"))
            .field(Field::new("flag").converter(converters::to_bool()))
            .build()
            .unwrap();
        let inst = ty.instantiate(args![a, i64::from(flag)]).unwrap();

        let Value::Map(entries) = asdict(&inst).unwrap() else {
            panic!("asdict must produce a map");
        };
        let mut args = Args::new();
        for (key, value) in entries {
            args = args.kwarg(key.as_text().unwrap_or_default(), value);
        }

        prop_assert_eq!(ty.instantiate(args).unwrap(), inst);
    }
}
