//! Demo slash-command server.
//!
//! Usage:
//!
//! ```text
//! SLACK_SIGNING_SECRET=... slash_server --listen 0.0.0.0:9002 --path /slash
//! ```
//!
//! Registers a handful of example commands:
//!
//! ```text
//! /demo echo hello world --upper
//! /demo math 4 + 5
//! /demo avg 1 2 3 4
//! /demo agg sum 1 2 3 --round
//! /demo whoami --visible
//! ```

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use slashbind::command::adapters::HttpReplyDelivery;
use slashbind::command::domain::{
    ArgType, CommandArgs, HandlerError, Parameter, Reply, SlashRequest,
};
use slashbind::command::ports::{HandlerResult, RequestObserver};
use slashbind::command::services::{CommandSpec, Executor, Registry, Router};
use slashbind::config::{ConfigurationError, ServerConfig};
use slashbind::{server, telemetry};
use tokio::net::TcpListener;
use tokio::runtime::Handle;

/// Boxed error type for the main result.
type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ServerConfig::parse();
    telemetry::init_subscriber(config.log_format)?;

    let registry = Arc::new(demo_registry()?);
    let authenticator = config.authenticator()?;
    let delivery = Arc::new(
        HttpReplyDelivery::with_default_timeout().map_err(ConfigurationError::from)?,
    );
    let executor = Executor::new(delivery, Handle::current());
    let router = Router::new(registry, authenticator, executor)
        .with_settings(config.router_settings())
        .with_observer(RequestLogger);

    let listener = TcpListener::bind(config.listen_address()?).await?;
    server::serve(listener, server::app(&config.path, Arc::new(router))).await?;
    Ok(())
}

fn demo_registry() -> Result<Registry, ConfigurationError> {
    let registry = Registry::builder()
        .register(
            CommandSpec::new("echo")
                .summary("Echoes the text back")
                .help("Repeats the given text, optionally changing its case.")
                .parameter(Parameter::argument("content", ArgType::text()).help("text to echo"))
                .parameter(Parameter::flag("upper").help("convert to upper case"))
                .parameter(Parameter::flag("lower").help("convert to lower case")),
            echo,
        )?
        .register(
            CommandSpec::new("math")
                .summary("Applies an operator to two numbers")
                .parameter(Parameter::argument("x", ArgType::float()))
                .parameter(Parameter::argument("symbol", ArgType::choice(["*", "+", "-", "/"])))
                .parameter(Parameter::argument("y", ArgType::float())),
            math,
        )?
        .register(
            CommandSpec::new("avg")
                .summary("Averages a list of numbers")
                .parameter(Parameter::argument("nums", ArgType::list(ArgType::float()))),
            avg,
        )?
        .register(
            CommandSpec::new("agg")
                .summary("Aggregates a list of numbers")
                .parameter(Parameter::argument("fn", ArgType::choice(["avg", "sum", "count"])))
                .parameter(Parameter::argument("nums", ArgType::list(ArgType::float())))
                .parameter(Parameter::flag("round").help("round the result")),
            agg,
        )?
        .register(
            CommandSpec::new("whoami")
                .summary("Tells you who you are")
                .parameter(Parameter::context("request")),
            whoami,
        )?
        .build();
    Ok(registry)
}

async fn echo(args: CommandArgs) -> HandlerResult {
    let content = args.text("content")?;
    let text = if args.flag("upper")? {
        content.to_uppercase()
    } else if args.flag("lower")? {
        content.to_lowercase()
    } else {
        content.to_owned()
    };
    Ok(Reply::text(text))
}

#[expect(clippy::float_arithmetic, reason = "the command is a calculator")]
async fn math(args: CommandArgs) -> HandlerResult {
    let x = args.float("x")?;
    let y = args.float("y")?;
    let symbol = args.text("symbol")?;
    let result = match symbol {
        "*" => x * y,
        "+" => x + y,
        "-" => x - y,
        "/" => x / y,
        other => return Err(HandlerError::failed(format!("unknown operator '{other}'"))),
    };
    if !result.is_finite() {
        return Err(HandlerError::failed(format!("{x} {symbol} {y} has no finite result")));
    }
    Ok(Reply::from(result))
}

async fn avg(args: CommandArgs) -> HandlerResult {
    let nums = args.float_list("nums")?;
    Ok(mean(&nums).map_or_else(|| Reply::text("No numbers given."), Reply::from))
}

async fn agg(args: CommandArgs) -> HandlerResult {
    let nums = args.float_list("nums")?;
    let result = match args.text("fn")? {
        "avg" => mean(&nums),
        "sum" => Some(nums.iter().sum()),
        "count" => count(&nums),
        other => return Err(HandlerError::failed(format!("unknown aggregate '{other}'"))),
    };
    let Some(value) = result else {
        return Ok(Reply::text("No numbers given."));
    };
    Ok(Reply::from(if args.flag("round")? { value.round() } else { value }))
}

async fn whoami(args: CommandArgs) -> HandlerResult {
    let request: &SlashRequest = args.request()?;
    Ok(Reply::text(format!(
        "You are <@{}> in #{}",
        request.user_id, request.channel_name
    ))
    .with_header("Who am I?"))
}

fn count(nums: &[f64]) -> Option<f64> {
    u32::try_from(nums.len()).ok().map(f64::from)
}

#[expect(clippy::float_arithmetic, reason = "averaging is float division")]
fn mean(nums: &[f64]) -> Option<f64> {
    let total: f64 = nums.iter().sum();
    count(nums)
        .filter(|n| *n > 0.0)
        .map(|n| total / n)
}

/// Logs every accepted request.
struct RequestLogger;

#[async_trait]
impl RequestObserver for RequestLogger {
    async fn observe(&self, request: &SlashRequest) {
        tracing::info!(
            user = %request.user_name,
            channel = %request.channel_name,
            command = %request.command,
            "received slash command"
        );
    }
}
