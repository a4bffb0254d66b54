use fieldwork::{converters, prelude::*};

#[test]
fn optional_default_if_none() {
    let ty = define("Config")
        .field(
            Field::new("retries")
                .converter(converters::optional(converters::default_if_none(0))),
        )
        .build()
        .unwrap();

    let none = ty.instantiate(args![Value::Null]).unwrap();
    assert_eq!(none.get("retries").unwrap(), &Value::Int(0));

    let seven = ty.instantiate(args![7]).unwrap();
    assert_eq!(seven.get("retries").unwrap(), &Value::Int(7));
}

#[test]
fn to_bool_on_construction_and_assignment() {
    let ty = define("Flags")
        .field(Field::new("debug").converter(converters::to_bool()))
        .build()
        .unwrap();

    let mut flags = ty.instantiate(args!["Yes"]).unwrap();
    assert_eq!(flags.get("debug").unwrap(), &Value::Bool(true));

    flags.set("debug", "off").unwrap();
    assert_eq!(flags.get("debug").unwrap(), &Value::Bool(false));

    let err = ty.instantiate(args!["maybe"]).unwrap_err();
    assert!(err.is_value_error());
    assert_eq!(err.to_string(), "Cannot convert value to bool: \"maybe\"");
}

#[test]
fn factory_default_and_pipe() {
    let ty = define("Bag")
        .field(Field::new("items").converter(converters::pipe([
            converters::default_if_none_with(|| Ok(Value::list(Vec::<Value>::new()))),
            Converter::new(|v| {
                let len = v.len().map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
                Ok(Value::Int(len))
            }),
        ])))
        .build()
        .unwrap();

    let empty = ty.instantiate(args![Value::Null]).unwrap();
    assert_eq!(empty.get("items").unwrap(), &Value::Int(0));

    let two = ty.instantiate(args![Value::list([1, 2])]).unwrap();
    assert_eq!(two.get("items").unwrap(), &Value::Int(2));
}

#[test]
fn optional_keeps_null_for_converters_that_do_not_fill_it() {
    let ty = define("MaybeFlag")
        .field(Field::new("on").converter(converters::optional(converters::to_bool())))
        .build()
        .unwrap();

    assert_eq!(ty.instantiate(args![Value::Null]).unwrap().get("on").unwrap(), &Value::Null);
    assert_eq!(ty.instantiate(args!["y"]).unwrap().get("on").unwrap(), &Value::Bool(true));
    assert!(ty.instantiate(args!["nope"]).is_err());
}

#[test]
fn to_bool_scenarios() {
    let ty = define("Switch")
        .field(Field::new("v").converter(converters::to_bool()))
        .build()
        .unwrap();
    let convert = |v: Value| ty.instantiate(args![v]).map(|i| i.get("v").unwrap().clone());

    for yes in [Value::from("yes"), Value::from("1"), Value::Int(1), Value::Bool(true)] {
        assert_eq!(convert(yes).unwrap(), Value::Bool(true));
    }
    for no in [Value::from("no"), Value::from("0"), Value::Int(0), Value::Bool(false)] {
        assert_eq!(convert(no).unwrap(), Value::Bool(false));
    }
    assert!(convert(Value::from("maybe")).unwrap_err().is_value_error());
}
