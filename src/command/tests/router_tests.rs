//! Unit tests for the request state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;
use tokio::runtime::Handle;

use super::support::{RESPONSE_URL, form_body, slash_request};
use crate::auth::Authenticator;
use crate::command::adapters::InMemoryReplyDelivery;
use crate::command::domain::{
    ArgType, BlockMessage, CommandArgs, HandlerError, Parameter, Reply, ResponseType, SlashRequest,
};
use crate::command::ports::{DeliveryError, RequestObserver};
use crate::command::services::{
    CommandSpec, Disposition, Executor, Registry, Router, RouterSettings,
};

const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    router: Router<InMemoryReplyDelivery>,
    delivery: InMemoryReplyDelivery,
    calls: Arc<AtomicUsize>,
}

fn math_spec() -> CommandSpec {
    CommandSpec::new("math")
        .summary("Applies an operator to two numbers")
        .parameter(Parameter::argument("x", ArgType::float()))
        .parameter(Parameter::argument("symbol", ArgType::choice(["*", "+", "-", "/"])))
        .parameter(Parameter::argument("y", ArgType::float()))
}

#[expect(clippy::float_arithmetic, reason = "test handler adds two numbers")]
fn add(args: &CommandArgs) -> Result<f64, HandlerError> {
    Ok(args.float("x")? + args.float("y")?)
}

fn harness(settings: RouterSettings) -> Harness {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let registry = Registry::builder()
        .register(math_spec(), move |args: CommandArgs| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                add(&args).map(Reply::from)
            }
        })
        .expect("math registers")
        .register(
            CommandSpec::new("ping")
                .acknowledge(BlockMessage::text("pinging", ResponseType::InChannel)),
            |_: CommandArgs| async { Ok::<_, HandlerError>(Reply::text("pong")) },
        )
        .expect("ping registers")
        .build();

    let delivery = InMemoryReplyDelivery::new();
    let executor = Executor::new(Arc::new(delivery.clone()), Handle::current());
    let authenticator: Authenticator = Authenticator::Trusted;
    let router = Router::new(Arc::new(registry), authenticator, executor).with_settings(settings);
    Harness {
        router,
        delivery,
        calls,
    }
}

fn message_text(disposition: &Disposition) -> String {
    match disposition {
        Disposition::Message(message) => message.section_texts().collect::<Vec<_>>().join("\n"),
        other => panic!("expected a message, got {other:?}"),
    }
}

fn response_type(disposition: &Disposition) -> Option<ResponseType> {
    match disposition {
        Disposition::Message(message) => message.response_type(),
        _ => None,
    }
}

#[rstest]
#[tokio::test]
async fn valid_command_is_acknowledged_and_delivered() {
    let harness = harness(RouterSettings::default());

    let disposition = harness.router.route(slash_request("math 4 + 5"));

    assert_eq!(disposition, Disposition::Ack(None));
    let delivered = harness.delivery.wait_for(1, WAIT).await;
    assert_eq!(delivered.len(), 1);
    let reply = delivered.first().expect("one reply");
    assert_eq!(reply.response_url, RESPONSE_URL);
    assert_eq!(reply.message, BlockMessage::text("9", ResponseType::Ephemeral));
}

#[rstest]
#[tokio::test]
async fn visible_flag_broadcasts_reply() {
    let harness = harness(RouterSettings::default());

    let disposition = harness.router.route(slash_request("math 1 + 1 --visible"));

    assert_eq!(disposition, Disposition::Ack(None));
    let delivered = harness.delivery.wait_for(1, WAIT).await;
    let reply = delivered.first().expect("one reply");
    assert_eq!(reply.message.response_type(), Some(ResponseType::InChannel));
}

#[rstest]
#[tokio::test]
async fn invalid_arguments_are_rejected_without_invoking_handler() {
    let harness = harness(RouterSettings::default());

    let disposition = harness.router.route(slash_request("math 4 ^ 5"));

    let text = message_text(&disposition);
    assert!(text.starts_with("The command run was unable to be parsed by the `math` input schema"));
    assert!(text.contains("/calc math --help"));
    assert_eq!(response_type(&disposition), Some(ResponseType::Ephemeral));
    assert_eq!(harness.calls.load(Ordering::SeqCst), 0);
    assert!(harness.delivery.is_empty());
}

#[rstest]
#[case("help")]
#[case("HELP")]
#[case("--help")]
#[case("help math")]
#[tokio::test]
async fn global_help_lists_commands(#[case] text: &str) {
    let harness = harness(RouterSettings {
        description: Some("Demo bot.".to_owned()),
        ..RouterSettings::default()
    });

    let disposition = harness.router.route(slash_request(text));

    let rendered = message_text(&disposition);
    assert!(rendered.starts_with("`/calc` help."));
    assert!(rendered.contains("Demo bot."));
    assert!(rendered.contains("> `/calc` math <x: float>"));
    assert!(rendered.contains("> `/calc` ping"));
    assert_eq!(response_type(&disposition), Some(ResponseType::Ephemeral));
}

#[rstest]
#[tokio::test]
async fn global_help_can_be_broadcast() {
    let harness = harness(RouterSettings::default());
    let disposition = harness.router.route(slash_request("help --visible"));
    assert_eq!(response_type(&disposition), Some(ResponseType::InChannel));
}

#[rstest]
#[tokio::test]
async fn command_help_skips_execution() {
    let harness = harness(RouterSettings::default());

    let disposition = harness.router.route(slash_request("math 1 + 1 --help"));

    let rendered = message_text(&disposition);
    assert!(rendered.starts_with(
        "`/calc math <x: float> <symbol: one of {*, +, -, /}> <y: float>`"
    ));
    assert!(rendered.contains("*Arguments:*"));
    assert_eq!(harness.calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case("nope 1 2")]
#[case("Math 1 + 1")]
#[case("")]
#[tokio::test]
async fn unknown_commands_are_rejected(#[case] text: &str) {
    let harness = harness(RouterSettings::default());

    let disposition = harness.router.route(slash_request(text));

    let rendered = message_text(&disposition);
    assert!(rendered.contains("did not match any commands I know"));
    assert!(rendered.ends_with("`/calc help`"));
    assert_eq!(response_type(&disposition), Some(ResponseType::Ephemeral));
}

#[rstest]
#[tokio::test]
async fn acknowledgement_prefers_command_override() {
    let app_ack = BlockMessage::text("working on it", ResponseType::InChannel);
    let harness = harness(RouterSettings {
        acknowledgement: Some(app_ack.clone()),
        ..RouterSettings::default()
    });

    assert_eq!(
        harness.router.route(slash_request("math 1 * 2")),
        Disposition::Ack(Some(app_ack))
    );
    assert_eq!(
        harness.router.route(slash_request("ping")),
        Disposition::Ack(Some(BlockMessage::text("pinging", ResponseType::InChannel)))
    );
}

#[rstest]
#[tokio::test]
async fn ssl_check_is_acknowledged_without_routing() {
    let harness = harness(RouterSettings::default());
    let disposition = harness.router.handle(b"ssl_check=1&token=abc", None, None);
    assert_eq!(disposition, Disposition::Ack(None));
    assert_eq!(disposition.status_code(), 200);
}

#[rstest]
#[tokio::test]
async fn malformed_payload_is_unprocessable() {
    let harness = harness(RouterSettings::default());
    let disposition = harness.router.handle(b"token=abc", None, None);
    assert_eq!(disposition, Disposition::Unprocessable);
    assert_eq!(disposition.status_code(), 422);
}

#[rstest]
#[tokio::test]
async fn bad_signature_is_forbidden_before_decoding() {
    let registry = Registry::builder().build();
    let executor = Executor::new(Arc::new(InMemoryReplyDelivery::new()), Handle::current());
    let authenticator =
        Authenticator::from_settings(false, Some("secret")).expect("verified authenticator");
    let router = Router::new(Arc::new(registry), authenticator, executor);

    let disposition = router.handle(b"not even a form", Some("1"), Some("v0=00"));

    assert_eq!(disposition, Disposition::Forbidden);
    assert_eq!(disposition.status_code(), 403);
}

struct CountingObserver(Arc<AtomicUsize>);

#[async_trait]
impl RequestObserver for CountingObserver {
    async fn observe(&self, _request: &SlashRequest) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[rstest]
#[tokio::test]
async fn observers_see_well_formed_requests() {
    let seen = Arc::new(AtomicUsize::new(0));
    let router = harness(RouterSettings::default())
        .router
        .with_observer(CountingObserver(Arc::clone(&seen)));

    let unknown = router.handle(&form_body("nope"), None, None);
    let malformed = router.handle(b"token=abc", None, None);

    assert!(matches!(unknown, Disposition::Message(_)));
    assert_eq!(malformed, Disposition::Unprocessable);
    tokio::time::timeout(WAIT, async {
        while seen.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("observer ran");
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn delivery_failure_is_not_retried_and_does_not_affect_routing() {
    let delivery = InMemoryReplyDelivery::failing_with(DeliveryError::Status {
        status: 404,
        body: "expired_url".to_owned(),
    });
    let registry = Registry::builder()
        .register(math_spec(), |args: CommandArgs| async move {
            add(&args).map(Reply::from)
        })
        .expect("math registers")
        .build();
    let executor = Executor::new(Arc::new(delivery.clone()), Handle::current());
    let authenticator: Authenticator = Authenticator::Trusted;
    let router = Router::new(Arc::new(registry), authenticator, executor);

    let first = router.route(slash_request("math 1 + 2"));
    assert_eq!(first, Disposition::Ack(None));
    let attempted = delivery.wait_for(1, WAIT).await;
    assert_eq!(attempted.len(), 1);

    let second = router.route(slash_request("math 2 + 2"));
    assert_eq!(second, Disposition::Ack(None));
    let both = delivery.wait_for(2, WAIT).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(both.len(), 2);
    assert_eq!(delivery.len(), 2);
}
