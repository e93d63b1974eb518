//! Unit tests for inbound form decoding.

use super::support::{form_body, slash_request};
use crate::command::domain::InboundForm;
use rstest::rstest;

#[rstest]
fn complete_form_decodes() {
    let decoded = InboundForm::decode(&form_body("math 1 + 2")).expect("form decodes");
    assert_eq!(decoded, InboundForm::Command(slash_request("math 1 + 2")));
}

#[rstest]
fn enterprise_fields_are_optional() {
    let body = format!(
        "{}&enterprise_id=E1&enterprise_name=Grid",
        String::from_utf8(form_body("x")).expect("utf-8 body")
    );
    let Ok(InboundForm::Command(request)) = InboundForm::decode(body.as_bytes()) else {
        panic!("expected a command");
    };
    assert_eq!(request.enterprise_id.as_deref(), Some("E1"));
    assert_eq!(request.enterprise_name.as_deref(), Some("Grid"));
}

#[rstest]
fn ssl_check_short_circuits() {
    let decoded = InboundForm::decode(b"ssl_check=1&token=abc").expect("form decodes");
    assert_eq!(decoded, InboundForm::SslCheck);
}

#[rstest]
#[case(b"token=abc&team_id=T1".as_slice())]
#[case(b"".as_slice())]
fn missing_required_fields_are_malformed(#[case] body: &[u8]) {
    assert!(InboundForm::decode(body).is_err());
}
