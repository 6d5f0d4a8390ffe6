//! HTTP client SDK for the AI engine service.
//!
//! This crate provides a typed client for function groups, functions, credits
//! and chat sessions, plus the session message protocol.
//!
//! # Example
//!
//! ```no_run
//! use aiengine_client::{EngineClient, Message, PollPolicy, Result, SessionOptions};
//!
//! # async fn example() -> Result<()> {
//! let client = EngineClient::builder().api_key("secret").build()?;
//!
//! let group = client
//!     .function_groups()
//!     .find_by_name("Fetch Verified")
//!     .await?
//!     .expect("group exists");
//!
//! let mut session = client
//!     .sessions()
//!     .create(&group.uuid, SessionOptions::default())
//!     .await?;
//! session.start("Find a flight to Warsaw", None).await?;
//!
//! let policy = PollPolicy::default();
//! 'conversation: loop {
//!     let batch = session.next_messages(&policy).await?;
//!     if batch.is_empty() {
//!         break;
//!     }
//!     for message in batch {
//!         match message {
//!             Message::AgentUtterance(question) => {
//!                 println!("Agent: {}", question.text);
//!                 session.submit_response(&question, "Warsaw").await?;
//!             }
//!             Message::Confirmation(confirmation) => {
//!                 session.submit_confirmation(&confirmation).await?;
//!             }
//!             Message::Stop(_) => break 'conversation,
//!             other => println!("{:?}", other),
//!         }
//!     }
//! }
//!
//! session.delete().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Function groups**: list (private + public), create, delete, share, functions
//! - **Functions**: list, create, groups of a function
//! - **Credits**: balance, per-model credits, model catalogue
//! - **Sessions**: create, start, execute functions, poll, reply, delete

pub mod api;
pub mod client;
pub mod error;
pub mod messages;
pub mod models;
pub mod session;
pub mod types;

pub use client::{ClientBuilder, DEFAULT_BASE_URL, EngineClient};
pub use error::{Error, Result};
pub use messages::{
    AgentUtterance, ClassifyError, Confirmation, DataRequest, DataRequestKind, EngineInfo,
    FreeTextPrompt, Message, MessageKind, RawMessage, SelectionKind, Stop, TaskOption,
    TaskSelection, classify,
};
pub use models::{CustomModel, DEFAULT_MODEL_ID, DEFAULT_MODEL_IDS, ModelRef};
pub use session::{PollPolicy, Session, SessionStatus};
pub use types::*;

pub use api::ListFunctionsQuery;
