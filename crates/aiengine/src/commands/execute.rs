//! Execute command - run specific functions without planning.

use anyhow::Result;
use clap::Args;

use aiengine_client::{Session, SessionOptions};

use super::display::{print_dim, print_message};
use super::{Connected, Context, print_json};

/// Arguments for the execute command.
#[derive(Args, Debug)]
pub struct ExecuteArgs {
    /// Function group the functions belong to
    #[arg(short, long)]
    pub group: String,

    /// Function ID to execute (repeatable)
    #[arg(short, long = "function", required = true)]
    pub functions: Vec<String>,

    /// Objective passed along with the functions
    #[arg(short, long, default_value = "")]
    pub objective: String,

    /// Extra context
    #[arg(long)]
    pub context: Option<String>,

    /// Model to request
    #[arg(short, long)]
    pub model: Option<String>,

    /// Delay between polls in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Consecutive empty polls before giving up
    #[arg(long)]
    pub max_empty_polls: Option<u32>,
}

/// Run the execute command.
pub async fn run(args: ExecuteArgs, ctx: &Context) -> Result<()> {
    let connected = ctx.connect()?;

    let mut options = SessionOptions::default();
    if let Some(model) = args.model.clone().or_else(|| connected.defaults.model.clone()) {
        options = options.with_model(model);
    }

    let mut session = connected
        .client
        .sessions()
        .create(&args.group, options)
        .await?;

    let outcome = watch(&mut session, &connected, &args, ctx.json_output).await;
    let deleted = session.delete().await;
    outcome?;
    deleted?;
    Ok(())
}

async fn watch(
    session: &mut Session,
    connected: &Connected,
    args: &ExecuteArgs,
    json_output: bool,
) -> Result<()> {
    let policy = connected.poll_policy(args.poll_interval_ms, args.max_empty_polls);
    session
        .execute_functions(
            args.functions.iter().cloned(),
            &args.objective,
            args.context.as_deref(),
        )
        .await?;

    while !session.is_ended() {
        let batch = session.next_messages(&policy).await?;
        if batch.is_empty() {
            print_dim(&format!(
                "No new messages after {} polls.",
                policy.max_empty_polls
            ));
            break;
        }
        for message in &batch {
            if json_output {
                print_json(message)?;
            } else {
                print_message(message);
            }
        }
    }

    Ok(())
}
