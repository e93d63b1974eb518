//! Behavioural tests for slash-command dispatch.

use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, eyre};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use slashbind::auth::{Authenticator, SignatureVerifier};
use slashbind::command::{
    adapters::{DeliveredReply, InMemoryReplyDelivery},
    domain::{ArgType, BlockMessage, CommandArgs, HandlerError, Parameter, Reply, ResponseType},
    services::{CommandSpec, Disposition, Executor, Registry, Router},
};
use tokio::runtime::Handle;

const SECRET: &str = "behaviour-secret";
const SETTLE: Duration = Duration::from_millis(200);
const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct DispatchWorld {
    trigger: String,
    router: Option<Router<InMemoryReplyDelivery>>,
    delivery: InMemoryReplyDelivery,
    disposition: Option<Disposition>,
}

impl DispatchWorld {
    fn router(&self) -> Result<&Router<InMemoryReplyDelivery>> {
        self.router
            .as_ref()
            .ok_or_else(|| eyre!("router should be configured"))
    }

    fn disposition(&self) -> Result<&Disposition> {
        self.disposition
            .as_ref()
            .ok_or_else(|| eyre!("a request should have been handled"))
    }

    fn message_text(&self) -> Result<String> {
        match self.disposition()? {
            Disposition::Message(message) => {
                Ok(message.section_texts().collect::<Vec<_>>().join("\n"))
            }
            other => Err(eyre!("expected a message, got {other:?}")),
        }
    }

    fn only_delivery(&self) -> Result<DeliveredReply> {
        let delivered = run_async(self.delivery.wait_for(1, WAIT));
        match delivered.as_slice() {
            [reply] => Ok(reply.clone()),
            other => Err(eyre!("expected one delivery, got {}", other.len())),
        }
    }

    fn form(&self, text: &str) -> Vec<u8> {
        serde_urlencoded::to_string([
            ("token", "deprecated"),
            ("team_id", "T1"),
            ("team_domain", "example"),
            ("channel_id", "C1"),
            ("channel_name", "general"),
            ("user_id", "U1"),
            ("user_name", "ada"),
            ("command", self.trigger.as_str()),
            ("text", text),
            ("response_url", "https://hooks.example.test/commands/T1/7"),
            ("trigger_id", "trigger-7"),
            ("api_app_id", "A1"),
        ])
        .map(String::into_bytes)
        .unwrap_or_default()
    }
}

#[fixture]
fn world() -> DispatchWorld {
    DispatchWorld::default()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| Handle::current().block_on(future))
}

fn timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

#[expect(clippy::float_arithmetic, reason = "calculator handler")]
fn evaluate(args: &CommandArgs) -> Result<f64, HandlerError> {
    let x = args.float("x")?;
    let y = args.float("y")?;
    match args.text("symbol")? {
        "+" => Ok(x + y),
        "-" => Ok(x - y),
        "*" => Ok(x * y),
        _ => Ok(x / y),
    }
}

#[given(r#"a calculator app registered under "{trigger}""#)]
fn calculator_app(world: &mut DispatchWorld, trigger: String) -> Result<()> {
    let registry = Registry::builder()
        .register(
            CommandSpec::new("math")
                .summary("Applies an operator to two numbers")
                .parameter(Parameter::argument("x", ArgType::float()))
                .parameter(
                    Parameter::argument("symbol", ArgType::choice(["*", "+", "-", "/"]))
                        .help("operator to apply"),
                )
                .parameter(Parameter::argument("y", ArgType::float())),
            |args: CommandArgs| async move { evaluate(&args).map(Reply::from) },
        )?
        .register(
            CommandSpec::new("divide")
                .parameter(Parameter::argument("x", ArgType::int()))
                .parameter(Parameter::argument("y", ArgType::int())),
            |args: CommandArgs| async move {
                let x = args.int("x")?;
                let y = args.int("y")?;
                x.checked_div(y)
                    .map(Reply::from)
                    .ok_or_else(|| HandlerError::failed("division by zero"))
            },
        )?
        .build();

    let executor = Executor::new(Arc::new(world.delivery.clone()), Handle::current());
    let authenticator = Authenticator::from_settings(false, Some(SECRET))?;
    world.router = Some(Router::new(Arc::new(registry), authenticator, executor));
    world.trigger = trigger;
    Ok(())
}

#[when(r#"the user runs "{text}""#)]
fn user_runs(world: &mut DispatchWorld, text: String) -> Result<()> {
    let body = world.form(&text);
    let ts = timestamp();
    let signature = SignatureVerifier::new(SECRET).sign(&ts, &body);
    world.disposition = Some(world.router()?.handle(&body, Some(&ts), Some(&signature)));
    Ok(())
}

#[when(r#"a request for "{text}" arrives with a forged signature"#)]
fn forged_request(world: &mut DispatchWorld, text: String) -> Result<()> {
    let body = world.form(&text);
    let ts = timestamp();
    let signature = SignatureVerifier::new("someone-else").sign(&ts, &body);
    world.disposition = Some(world.router()?.handle(&body, Some(&ts), Some(&signature)));
    Ok(())
}

#[then("the request is acknowledged with an empty body")]
fn acknowledged(world: &mut DispatchWorld) -> Result<()> {
    assert_eq!(world.disposition()?, &Disposition::Ack(None));
    Ok(())
}

#[then(r#"the reply "{text}" is delivered ephemerally"#)]
fn delivered_ephemerally(world: &mut DispatchWorld, text: String) -> Result<()> {
    let reply = world.only_delivery()?;
    assert_eq!(reply.message, BlockMessage::text(text, ResponseType::Ephemeral));
    Ok(())
}

#[then(r#"the reply "{text}" is delivered in channel"#)]
fn delivered_in_channel(world: &mut DispatchWorld, text: String) -> Result<()> {
    let reply = world.only_delivery()?;
    assert_eq!(reply.message, BlockMessage::text(text, ResponseType::InChannel));
    Ok(())
}

#[then("an apology is delivered")]
fn apology_delivered(world: &mut DispatchWorld) -> Result<()> {
    let reply = world.only_delivery()?;
    let text = reply.message.section_texts().collect::<String>();
    assert!(text.starts_with("I was unable to respond to your request"));
    assert_eq!(reply.message.response_type(), Some(ResponseType::Ephemeral));
    Ok(())
}

#[then(r#"the response explains that "{command}" could not parse the arguments"#)]
fn parse_failure_explained(world: &mut DispatchWorld, command: String) -> Result<()> {
    let text = world.message_text()?;
    assert!(text.contains(&format!("parsed by the `{command}` input schema")));
    Ok(())
}

#[then("the response says the command was not found")]
fn command_not_found(world: &mut DispatchWorld) -> Result<()> {
    let text = world.message_text()?;
    assert!(text.contains("did not match any commands I know"));
    Ok(())
}

#[then(r#"the response lists the command "{command}""#)]
fn lists_command(world: &mut DispatchWorld, command: String) -> Result<()> {
    let text = world.message_text()?;
    assert!(text.contains(&format!("> `{}` {command}", world.trigger)));
    Ok(())
}

#[then(r#"the response describes the argument "{name}""#)]
fn describes_argument(world: &mut DispatchWorld, name: String) -> Result<()> {
    let text = world.message_text()?;
    assert!(text.contains("*Arguments:*"));
    assert!(text.contains(&format!("> `{name}` ")));
    Ok(())
}

#[then("the request is rejected with status {status:u16}")]
fn rejected_with_status(world: &mut DispatchWorld, status: u16) -> Result<()> {
    assert_eq!(world.disposition()?.status_code(), status);
    Ok(())
}

#[then("no reply is delivered")]
fn nothing_delivered(world: &mut DispatchWorld) {
    run_async(tokio::time::sleep(SETTLE));
    assert!(world.delivery.is_empty());
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Valid command is acknowledged and answered later"
)]
#[tokio::test(flavor = "multi_thread")]
async fn valid_command(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Visible flag broadcasts the reply"
)]
#[tokio::test(flavor = "multi_thread")]
async fn visible_flag(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Arguments outside the schema are rejected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_arguments(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Unknown command is rejected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_command(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Global help lists every command"
)]
#[tokio::test(flavor = "multi_thread")]
async fn global_help(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Command help describes the arguments"
)]
#[tokio::test(flavor = "multi_thread")]
async fn command_help(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Failing handler produces an apology"
)]
#[tokio::test(flavor = "multi_thread")]
async fn failing_handler(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/slash_command.feature",
    name = "Forged request is forbidden"
)]
#[tokio::test(flavor = "multi_thread")]
async fn forged_request_forbidden(world: DispatchWorld) {
    let _ = world;
}
