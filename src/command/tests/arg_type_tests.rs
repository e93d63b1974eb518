//! Unit tests for argument types.

use crate::command::domain::{ArgError, ArgType, ArgValue, Bounds, RegistrationError};
use rstest::rstest;

#[rstest]
#[case(ArgType::Float(Bounds::at_least(10.0)), "-10.0")]
#[case(ArgType::Float(Bounds::at_most(10.0)), "100.0")]
#[case(ArgType::Float(Bounds::between(1.0, 2.0)), "2.5")]
#[case(ArgType::Int(Bounds::between(1, 5)), "6")]
fn numeric_outside_bounds_is_rejected(#[case] arg_type: ArgType, #[case] raw: &str) {
    assert_eq!(
        arg_type.parse(raw),
        Err(ArgError::OutOfRange(raw.to_owned()))
    );
}

#[rstest]
#[case(Bounds::at_least(10.0), "10", 10.0)]
#[case(Bounds::at_most(10.0), "10.0", 10.0)]
#[case(Bounds::between(-1.5, 1.5), "-1.5", -1.5)]
#[case(Bounds::unbounded(), "1e3", 1000.0)]
fn float_within_bounds_parses(
    #[case] bounds: Bounds<f64>,
    #[case] raw: &str,
    #[case] expected: f64,
) {
    assert_eq!(ArgType::Float(bounds).parse(raw), Ok(ArgValue::Float(expected)));
}

#[rstest]
#[case("abc")]
#[case("")]
#[case("NaN")]
#[case("inf")]
fn float_rejects_non_numbers(#[case] raw: &str) {
    assert_eq!(
        ArgType::float().parse(raw),
        Err(ArgError::NotANumber(raw.to_owned()))
    );
}

#[rstest]
#[case("42", Ok(ArgValue::Int(42)))]
#[case("-7", Ok(ArgValue::Int(-7)))]
#[case("4.0", Err(ArgError::NotANumber("4.0".to_owned())))]
fn int_parses_whole_numbers_only(#[case] raw: &str, #[case] expected: Result<ArgValue, ArgError>) {
    assert_eq!(ArgType::int().parse(raw), expected);
}

#[rstest]
fn text_length_counts_characters() {
    let arg_type = ArgType::Text(Bounds::between(1, 3));
    assert_eq!(arg_type.parse("héé"), Ok(ArgValue::Text("héé".to_owned())));
    assert_eq!(arg_type.parse("four"), Err(ArgError::LengthOutOfRange(4)));
    assert_eq!(arg_type.parse(""), Err(ArgError::LengthOutOfRange(0)));
}

#[rstest]
#[case("+", true)]
#[case("*", true)]
#[case("^", false)]
#[case("plus", false)]
fn choice_matches_exactly(#[case] raw: &str, #[case] accepted: bool) {
    let arg_type = ArgType::choice(["*", "+", "-", "/"]);
    assert_eq!(arg_type.parse(raw).is_ok(), accepted);
}

#[rstest]
fn choice_is_case_sensitive() {
    let arg_type = ArgType::choice(["avg"]);
    assert_eq!(
        arg_type.parse("AVG"),
        Err(ArgError::NotAChoice("AVG".to_owned()))
    );
}

#[rstest]
fn list_parses_every_token() {
    let arg_type = ArgType::list(ArgType::float());
    assert_eq!(
        arg_type.parse_tokens(&["1.0", "200"]),
        Ok(ArgValue::List(vec![ArgValue::Float(1.0), ArgValue::Float(200.0)]))
    );
}

#[rstest]
fn list_fails_when_any_element_fails() {
    let arg_type = ArgType::list(ArgType::float());
    assert_eq!(
        arg_type.parse_tokens(&["asf", "200"]),
        Err(ArgError::NotANumber("asf".to_owned()))
    );
}

#[rstest]
fn empty_list_is_accepted() {
    let arg_type = ArgType::list(ArgType::int());
    assert_eq!(arg_type.parse_tokens(&[]), Ok(ArgValue::List(Vec::new())));
    assert_eq!(arg_type.parse("   "), Ok(ArgValue::List(Vec::new())));
}

#[rstest]
fn scalar_parse_tokens_requires_one_token() {
    assert_eq!(
        ArgType::int().parse_tokens(&["1", "2"]),
        Err(ArgError::WrongArity {
            expected: 1,
            actual: 2
        })
    );
}

#[rstest]
#[case(ArgType::float(), "float")]
#[case(ArgType::Float(Bounds::at_least(10.0)), "float (>= 10)")]
#[case(ArgType::Int(Bounds::between(1, 5)), "int (1..=5)")]
#[case(ArgType::Text(Bounds::at_most(20)), "text (length <= 20)")]
#[case(ArgType::text(), "text")]
#[case(ArgType::choice(["b", "a"]), "one of {a, b}")]
#[case(ArgType::list(ArgType::float()), "list of float")]
fn describe_names_type_and_bounds(#[case] arg_type: ArgType, #[case] expected: &str) {
    assert_eq!(arg_type.describe(), expected);
}

#[rstest]
fn global_describe_marks_lists() {
    assert_eq!(ArgType::float().global_describe("x"), "<x: float>");
    assert_eq!(
        ArgType::list(ArgType::float()).global_describe("nums"),
        "<nums: float ...>"
    );
}

#[rstest]
#[case(ArgType::Float(Bounds::between(2.0, 1.0)))]
#[case(ArgType::Int(Bounds::between(5, 1)))]
#[case(ArgType::Text(Bounds::between(3, 1)))]
#[case(ArgType::choice(Vec::<String>::new()))]
#[case(ArgType::list(ArgType::list(ArgType::int())))]
#[case(ArgType::list(ArgType::choice(Vec::<String>::new())))]
fn malformed_types_fail_validation(#[case] arg_type: ArgType) {
    let result = arg_type.validate("cmd", "param");
    assert!(matches!(
        result,
        Err(RegistrationError::InvalidArgType { ref command, ref parameter, .. })
            if command == "cmd" && parameter == "param"
    ));
}
