use fieldwork::{filters, prelude::*};
use std::sync::Arc;

// ---- helpers -----------------------------------------------------------

fn point() -> Arc<RecordType> {
    define("FuncPoint")
        .field(Field::new("x"))
        .field(Field::new("y").default(0))
        .build()
        .unwrap()
}

fn line() -> (Arc<RecordType>, Arc<RecordType>) {
    let point = point();
    let line = define("FuncLine")
        .field(Field::new("start"))
        .field(Field::new("end"))
        .field(Field::new("tags").default(Value::tuple(["a"])))
        .build()
        .unwrap();

    (point, line)
}

// ---- asdict / astuple --------------------------------------------------

#[test]
fn asdict_recurses_into_records() {
    let (point, line) = line();
    let a = point.instantiate(args![1, 2]).unwrap();
    let b = point.instantiate(args![3]).unwrap();
    let l = line.instantiate(args![a, b]).unwrap();

    let expected = Value::map([
        ("start", Value::map([("x", 1), ("y", 2)])),
        ("end", Value::map([("x", 3), ("y", 0)])),
        ("tags", Value::list(["a"])),
    ]);
    assert_eq!(asdict(&l).unwrap(), expected);

    let shallow = AsDict::default().recurse(false).apply(&l).unwrap();
    assert!(shallow.map_get(&Value::from("start")).unwrap().as_record().is_some());

    let retained = AsDict::default().retain_collection_types(true).apply(&l).unwrap();
    assert_eq!(retained.map_get(&Value::from("tags")), Some(&Value::tuple(["a"])));
}

#[test]
fn asdict_filters_and_serializes() {
    let p = point().instantiate(args![1, 2]).unwrap();

    let only_x = AsDict::default()
        .filter(filters::include(["x"]))
        .apply(&p)
        .unwrap();
    assert_eq!(only_x, Value::map([("x", 1)]));

    let doubled = AsDict::default()
        .filter(filters::exclude([Kind::Text]))
        .value_serializer(|_, _, v| Ok(Value::Int(v.as_int().unwrap_or_default() * 2)))
        .apply(&p)
        .unwrap();
    assert_eq!(doubled, Value::map([("x", 2), ("y", 4)]));

    let json = serde_json::to_value(asdict(&p).unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({"x": 1, "y": 2}));
}

#[test]
fn astuple_recurses_into_records() {
    let (point, line) = line();
    let l = line
        .instantiate(args![
            point.instantiate(args![1, 2]).unwrap(),
            point.instantiate(args![3, 4]).unwrap()
        ])
        .unwrap();

    assert_eq!(
        astuple(&l).unwrap(),
        Value::tuple([Value::tuple([1, 2]), Value::tuple([3, 4]), Value::list(["a"])])
    );

    let filtered = AsTuple::default()
        .filter(filters::exclude(["tags"]))
        .recurse(false)
        .apply(&l)
        .unwrap();
    assert_eq!(filtered.len(), Some(2));
}

// ---- copies ------------------------------------------------------------

#[test]
fn evolve_runs_the_constructor() {
    let ty = define("Temp")
        .field(Field::new("celsius").validator(fieldwork::validators::ge(-273)))
        .field(Field::new("_label").default("room"))
        .build()
        .unwrap();
    let t = ty.instantiate(args![20]).unwrap();

    let warmer = evolve(&t, [("celsius", 25)]).unwrap();
    assert_eq!(warmer.get("celsius").unwrap(), &Value::Int(25));
    assert_eq!(warmer.get("_label").unwrap(), &Value::from("room"));
    assert_eq!(t.get("celsius").unwrap(), &Value::Int(20));

    let relabelled = evolve(&t, [("label", "lab")]).unwrap();
    assert_eq!(relabelled.get("_label").unwrap(), &Value::from("lab"));

    assert!(evolve(&t, [("celsius", -300)]).unwrap_err().is_value_error());
    assert!(matches!(
        evolve(&t, [("kelvin", 1)]).unwrap_err(),
        Error::Init(_)
    ));
}

#[test]
fn assoc_bypasses_the_pipeline() {
    let ty = frozen("Locked")
        .field(Field::new("n").validator(fieldwork::validators::gt(0)))
        .build()
        .unwrap();
    let locked = ty.instantiate(args![1]).unwrap();

    let changed = assoc(&locked, [("n", -1)]).unwrap();
    assert_eq!(changed.get("n").unwrap(), &Value::Int(-1));
    assert_eq!(locked.get("n").unwrap(), &Value::Int(1));
    assert!(!changed.same_object(&locked));

    assert!(matches!(
        assoc(&locked, [("m", 1)]).unwrap_err(),
        Error::Lookup(_)
    ));
}

// ---- introspection -----------------------------------------------------

#[test]
fn introspection() {
    let ty = point();

    assert!(has("FuncPoint"));
    assert!(!has("NeverDefined"));

    let names: Vec<&str> = fields(&ty).names().collect();
    assert_eq!(names, vec!["x", "y"]);

    let by_name = fields_dict(&ty);
    assert_eq!(by_name.len(), 2);
    assert!(!by_name[0].1.has_default());
    assert!(by_name[1].1.has_default());
}

#[test]
fn fields_dict_follows_declaration_order() {
    let parent = define("Ordered")
        .field(Field::new("zeta"))
        .field(Field::new("alpha"))
        .build()
        .unwrap();
    let child = define("OrderedChild")
        .base(&parent)
        .field(Field::new("mid"))
        .field(Field::new("zeta").ty(Kind::Int))
        .build()
        .unwrap();

    let names = |ty: &RecordType| -> Vec<String> {
        fields_dict(ty).iter().map(|(name, _)| (*name).to_string()).collect()
    };
    assert_eq!(names(&parent), vec!["zeta", "alpha"]);
    assert_eq!(names(&child), vec!["zeta", "alpha", "mid"]);

    let zeta = fields_dict(&child)[0].1;
    assert_eq!(zeta.ty, Some(Kind::Int));
    assert!(!zeta.inherited);
}

#[test]
fn validate_rechecks_current_values() {
    let ty = define("Checked")
        .field(Field::new("n").validator(fieldwork::validators::lt(10)))
        .on_setattr([fieldwork::setters::convert()])
        .build()
        .unwrap();
    let mut c = ty.instantiate(args![1]).unwrap();

    assert!(validate(&c).is_ok());

    c.set("n", 50).unwrap();
    assert!(validate(&c).unwrap_err().is_value_error());
}
