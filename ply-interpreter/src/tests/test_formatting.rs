use super::{main_body, run_program};
use crate::value::{format_float, MapValue, SliceValue, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_float_formatting_matches_go() {
    assert_eq!(format_float(2.0), "2");
    assert_eq!(format_float(3.5), "3.5");
    assert_eq!(format_float(0.1), "0.1");
    assert_eq!(format_float(1e21), "1e+21");
    assert_eq!(format_float(1234567.0), "1.234567e+06");
    assert_eq!(format_float(999999.5), "999999.5");
    assert_eq!(format_float(1.5e-5), "1.5e-05");
    assert_eq!(format_float(-0.25), "-0.25");
}

#[test]
fn test_composite_values_display() {
    let slice = Value::Slice(SliceValue::from_vec(vec![Value::string("a"), Value::Int(2)]));
    assert_eq!(slice.to_string(), "[a 2]");

    let map = MapValue::new();
    for (key, value) in [("b", 2), ("a", 1)] {
        let key = Value::string(key);
        map.insert(key.to_key().expect("string keys hash"), key, Value::Int(value));
    }
    // fmt prints maps with sorted keys
    assert_eq!(Value::Map(map).to_string(), "map[a:1 b:2]");
    assert_eq!(Value::Slice(SliceValue::nil()).to_string(), "[]");
}

#[test]
fn test_sprint_spacing() {
    let output = run_program(&main_body(
        r#"
    s := fmt.Sprint("n=", 1, 2, "x")
    fmt.Println(s)
"#,
    ));
    assert_eq!(output, "n=1 2x\n");
}

#[test]
fn test_println_of_floats_and_bools() {
    let output = run_program(&main_body(
        r#"
    var f float64 = 10
    fmt.Println(f, f/4, true, []float64{1.5, 2})
"#,
    ));
    assert_eq!(output, "10 2.5 true [1.5 2]\n");
}
