use crate::value::Value;
use std::fmt::Write;

// render
pub(super) fn render(value: &Value) -> String {
    let mut out = String::new();
    render_into(&mut out, value);

    out
}

fn render_into(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => render_float(out, *f),
        Value::Text(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Bytes(b) => {
            out.push_str("b\"");
            for byte in b {
                if byte.is_ascii_graphic() && *byte != b'"' && *byte != b'\\' {
                    out.push(char::from(*byte));
                } else {
                    let _ = write!(out, "\\x{byte:02x}");
                }
            }
            out.push('"');
        }
        Value::List(items) => {
            out.push('[');
            render_items(out, items);
            out.push(']');
        }
        Value::Tuple(items) => {
            out.push('(');
            render_items(out, items);
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Value::Map(entries) => {
            out.push('{');
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(out, k);
                out.push_str(": ");
                render_into(out, v);
            }
            out.push('}');
        }
        Value::Record(inst) => out.push_str(&inst.repr()),
    }
}

fn render_items(out: &mut String, items: &[Value]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        render_into(out, item);
    }
}

// floats always carry a fractional part or exponent so they read back as floats
fn render_float(out: &mut String, f: f64) {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        let _ = write!(out, "{f:.1}");
    } else {
        let _ = write!(out, "{f}");
    }
}
