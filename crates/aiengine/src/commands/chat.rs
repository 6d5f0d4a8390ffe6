//! Chat command - interactive session with a function group.

use anyhow::Result;
use clap::Args;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use aiengine_client::{
    Confirmation, Error as EngineError, FreeTextPrompt, Message, PollPolicy, Session,
    SessionOptions, TaskSelection,
};

use super::display::{print_dim, print_error, print_message};
use super::{Context, print_json};

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Function group to chat with
    #[arg(short, long)]
    pub group: String,

    /// Objective (prompted for when omitted)
    #[arg(short, long)]
    pub objective: Option<String>,

    /// Extra context for the objective
    #[arg(long)]
    pub context: Option<String>,

    /// Model to request (default: config, then talkative-01)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Email associated with the session
    #[arg(long)]
    pub email: Option<String>,

    /// Delay between polls in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Consecutive empty polls before giving up
    #[arg(long)]
    pub max_empty_polls: Option<u32>,
}

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let connected = ctx.connect()?;
    let policy = connected.poll_policy(args.poll_interval_ms, args.max_empty_polls);

    let mut options = SessionOptions::default();
    if let Some(model) = args.model.or_else(|| connected.defaults.model.clone()) {
        options = options.with_model(model);
    }
    if let Some(email) = args.email {
        options = options.with_email(email);
    }

    let mut repl = ChatRepl::new(ctx.json_output)?;
    let Some(objective) = args.objective.or_else(|| repl.read("Objective")) else {
        return Ok(());
    };

    let mut session = connected
        .client
        .sessions()
        .create(&args.group, options)
        .await?;
    if ctx.verbose {
        print_dim(&format!("Session {}", session.id()));
    }

    let outcome = repl
        .converse(&mut session, &objective, args.context.as_deref(), &policy)
        .await;

    // The session is removed whatever happened during the conversation.
    let deleted = session.delete().await;
    outcome?;
    deleted?;
    Ok(())
}

/// Interactive turn loop over one session.
struct ChatRepl {
    editor: Editor<(), DefaultHistory>,
    json_output: bool,
}

impl ChatRepl {
    fn new(json_output: bool) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        Ok(Self {
            editor: Editor::with_config(config)?,
            json_output,
        })
    }

    async fn converse(
        &mut self,
        session: &mut Session,
        objective: &str,
        context: Option<&str>,
        policy: &PollPolicy,
    ) -> Result<()> {
        session.start(objective, context).await?;

        loop {
            let batch = session.next_messages(policy).await?;
            if batch.is_empty() {
                print_dim(&format!(
                    "No new messages after {} polls; ending the conversation.",
                    policy.max_empty_polls
                ));
                return Ok(());
            }

            for message in batch {
                self.show(&message)?;
                match self.respond(session, &message).await? {
                    Turn::Continue => {}
                    Turn::Exit => return Ok(()),
                }
            }
        }
    }

    fn show(&self, message: &Message) -> Result<()> {
        if self.json_output {
            print_json(message)
        } else {
            print_message(message);
            Ok(())
        }
    }

    async fn respond(&mut self, session: &Session, message: &Message) -> Result<Turn> {
        match message {
            Message::EngineInfo(_) => Ok(Turn::Continue),
            Message::AgentUtterance(utterance) => self.answer(session, utterance).await,
            Message::DataRequest(request) => self.answer(session, request).await,
            Message::TaskSelection(selection) => self.select(session, selection).await,
            Message::Confirmation(confirmation) => self.confirm(session, confirmation).await,
            Message::Stop(_) => Ok(Turn::Exit),
        }
    }

    /// Free-text reply; empty input skips the prompt.
    async fn answer<P: FreeTextPrompt>(&mut self, session: &Session, prompt: &P) -> Result<Turn> {
        match self.read_line("You") {
            Input::Line(line) if line.is_empty() => Ok(Turn::Continue),
            Input::Line(line) => {
                session.submit_response(prompt, line).await?;
                Ok(Turn::Continue)
            }
            Input::Exit => Ok(Turn::Exit),
        }
    }

    /// Option keys separated by spaces or commas; re-prompts on unknown keys or empty input.
    async fn select(&mut self, session: &Session, selection: &TaskSelection) -> Result<Turn> {
        loop {
            let line = match self.read_line("Select") {
                Input::Line(line) => line,
                Input::Exit => return Ok(Turn::Exit),
            };
            let keys = selection_keys(&line);
            if keys.is_empty() {
                print_dim("Select at least one option, or press Ctrl+D to leave.");
                continue;
            }

            match session.submit_task_selection(selection, keys).await {
                Ok(_) => return Ok(Turn::Continue),
                Err(e @ (EngineError::InvalidSelection { .. } | EngineError::EmptySelection(_))) => {
                    print_error(&e.to_string());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Empty input confirms; anything else rejects with that text as the reason.
    async fn confirm(&mut self, session: &Session, confirmation: &Confirmation) -> Result<Turn> {
        print_dim("Press Enter to confirm, or type a reason to reject.");
        match self.read_line("Confirm") {
            Input::Line(line) if line.is_empty() => {
                session.submit_confirmation(confirmation).await?;
                Ok(Turn::Continue)
            }
            Input::Line(reason) => {
                session.reject_confirmation(confirmation, reason).await?;
                Ok(Turn::Continue)
            }
            Input::Exit => Ok(Turn::Exit),
        }
    }

    /// Read a single value; `None` on Ctrl+C, Ctrl+D or empty input.
    fn read(&mut self, label: &str) -> Option<String> {
        match self.read_line(label) {
            Input::Line(line) if !line.is_empty() => Some(line),
            _ => None,
        }
    }

    fn read_line(&mut self, label: &str) -> Input {
        let prompt = format!("{} ", style(format!("{}>", label)).cyan().bold());
        match self.editor.readline(&prompt) {
            Ok(line) => Input::Line(line.trim().to_string()),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                Input::Exit
            }
            Err(e) => {
                print_error(&format!("Input error: {}", e));
                Input::Exit
            }
        }
    }
}

/// Option keys typed at a selection prompt, separated by commas or spaces.
fn selection_keys(line: &str) -> Vec<&str> {
    line.split([',', ' ']).filter(|k| !k.is_empty()).collect()
}

/// What the user typed.
enum Input {
    Line(String),
    Exit,
}

/// Control flow for the turn loop.
enum Turn {
    Continue,
    Exit,
}
