//! Shared fixtures for command unit tests.

use crate::command::domain::SlashRequest;

pub const TRIGGER: &str = "/calc";
pub const RESPONSE_URL: &str = "https://hooks.example.test/commands/T1/42";

pub fn slash_request(text: &str) -> SlashRequest {
    SlashRequest {
        token: "deprecated-token".to_owned(),
        team_id: "T1".to_owned(),
        team_domain: "example".to_owned(),
        enterprise_id: None,
        enterprise_name: None,
        channel_id: "C1".to_owned(),
        channel_name: "general".to_owned(),
        user_id: "U1".to_owned(),
        user_name: "ada".to_owned(),
        command: TRIGGER.to_owned(),
        text: text.to_owned(),
        response_url: RESPONSE_URL.to_owned(),
        trigger_id: "trigger-1".to_owned(),
        api_app_id: "A1".to_owned(),
    }
}

pub fn form_body(text: &str) -> Vec<u8> {
    serde_urlencoded::to_string(slash_request(text))
        .expect("request encodes as a form")
        .into_bytes()
}
