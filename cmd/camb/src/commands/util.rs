//! Utility functions for CLI commands.

use std::time::Duration;

use clap::Args;

use camb::{CancellationToken, Client, PollOptions, RunId, Task, TaskBackend};
use camb_cli_core::config::{load_config, Config, Context};
use camb_cli_core::Output;

pub use camb_cli_core::{load_request, print_success};

use crate::Cli;

/// Flags controlling how long and how often a task is polled.
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Seconds between status checks (default: context setting, then 2)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Give up after this many seconds (default: wait until the task finishes)
    #[arg(long, value_name = "SECS")]
    pub max_wait: Option<u64>,

    /// Directory for downloaded audio (default: context setting, then ./audio_tts)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,
}

/// Flags shared by every command that runs a remote task.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskArgs {
    /// Resume an already submitted task instead of submitting a new one
    #[arg(long, value_name = "ID")]
    pub task_id: Option<String>,

    /// Submit the task and print its id without waiting
    #[arg(long, conflicts_with = "task_id")]
    pub no_wait: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Gets the context to use.
///
/// Returns `None` when no context is selected, in which case the client
/// falls back to `CAMB_API_KEY`. Naming a context that does not exist is an
/// error.
pub fn get_context(cli: &Cli) -> anyhow::Result<Option<Context>> {
    let cfg = get_config(cli)?;

    match (cfg.resolve_context(cli.context.as_deref()), cli.context.as_deref()) {
        (Some(ctx), _) => Ok(Some(ctx.clone())),
        (None, Some(name)) if !name.is_empty() => anyhow::bail!("context '{}' not found", name),
        (None, _) => Ok(None),
    }
}

/// Requires input file to be provided.
pub fn require_input_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("input file is required, use -f flag"))
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(cli: &Cli, result: &T) -> anyhow::Result<()> {
    Output::from_flags(cli.json, cli.output.as_deref()).write(result)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    camb_cli_core::print_verbose(cli.verbose, msg);
}

/// Creates a CAMB.AI client from the context, if any.
///
/// `output_dir` overrides the context's audio directory.
pub fn create_client(ctx: Option<&Context>, output_dir: Option<&str>) -> anyhow::Result<Client> {
    let mut builder = Client::builder();

    if let Some(ctx) = ctx {
        if !ctx.api_key.is_empty() {
            builder = builder.api_key(&ctx.api_key);
        }
        if !ctx.base_url.is_empty() {
            builder = builder.base_url(&ctx.base_url);
        }
        if ctx.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(ctx.timeout));
        }
        if !ctx.output_dir.is_empty() {
            builder = builder.output_dir(&ctx.output_dir);
        }
    }

    if let Some(dir) = output_dir {
        builder = builder.output_dir(dir);
    }

    Ok(builder.build()?)
}

/// Builds poll options from the flags, then the context, then the defaults.
pub fn poll_options(ctx: Option<&Context>, wait: &WaitArgs) -> PollOptions {
    let mut opts = PollOptions::new();

    let interval = wait
        .interval
        .or_else(|| ctx.map(|c| c.polling_interval).filter(|secs| *secs > 0));
    if let Some(secs) = interval {
        opts = opts.interval(Duration::from_secs(secs));
    }
    if let Some(secs) = wait.max_wait {
        opts = opts.max_wait(Duration::from_secs(secs));
    }

    opts
}

/// Returns a token that is cancelled on Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling wait");
            trigger.cancel();
        }
    });
    token
}

/// Resolves the context and builds the client and poll options for a task command.
pub fn prepare(cli: &Cli, wait: &WaitArgs) -> anyhow::Result<(Client, PollOptions)> {
    let ctx = get_context(cli)?;
    match &ctx {
        Some(ctx) => print_verbose(cli, &format!("Using context: {}", ctx.name)),
        None => print_verbose(cli, "No context selected, using CAMB_API_KEY"),
    }

    let client = create_client(ctx.as_ref(), wait.output_dir.as_deref())?;
    let opts = poll_options(ctx.as_ref(), wait).cancel_token(cancel_on_ctrl_c());
    tracing::debug!(
        context = ctx.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
        base_url = client.base_url(),
        output_dir = %client.output_dir().display(),
        interval = ?opts.interval,
        max_wait = ?opts.max_wait,
        "task command prepared"
    );

    Ok((client, opts))
}

/// Waits for `task` to succeed and fetches its result.
pub async fn wait_and_fetch<B: TaskBackend>(
    cli: &Cli,
    task: &Task<B>,
    opts: &PollOptions,
) -> anyhow::Result<(RunId, B::Output)> {
    print_verbose(cli, &format!("Waiting for {} task {}", task.kind(), task.id()));
    let run_id = task.wait_run_id(opts).await?;
    print_verbose(cli, &format!("Task {} succeeded with run {}", task.id(), run_id));

    let output = task.fetch(&run_id).await?;
    tracing::debug!(kind = %task.kind(), task_id = task.id(), %run_id, "result fetched");
    Ok((run_id, output))
}

/// Prints the id of a task that was submitted without waiting.
pub fn output_submitted(cli: &Cli, task_id: &str) -> anyhow::Result<()> {
    output_result(
        cli,
        &serde_json::json!({
            "task_id": task_id,
            "status": "submitted",
        }),
    )
}
