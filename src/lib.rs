//! Model gateway client
//!
//! Sends prompts to the ensemble text-generation endpoint behind the model
//! gateway and returns the generated text.
//!
//! # Pieces
//!
//! - [`client::ModelClient`]: one POST per call, JSON in, `text_output` out
//! - [`prompt::StandaloneQuestionFormatter`]: rewrites follow-up questions
//!   so they stand without the chat history
//! - [`telemetry`]: logging, span export, request metrics
//! - [`config`]: environment-variable configuration
//!
//! # Example
//!
//! ```no_run
//! use llama_gateway_client::client::ModelClient;
//! use llama_gateway_client::prompt::StandaloneQuestionFormatter;
//!
//! # async fn run() -> Result<(), llama_gateway_client::RequestFailure> {
//! let client = ModelClient::from_env()?;
//! let question = StandaloneQuestionFormatter::new(&client)
//!     .rewrite_default("What is a spotlist?", "")
//!     .await?;
//! println!("{question}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod telemetry;

pub use client::{ModelClient, TextGenerator};
pub use error::{FailureKind, RequestFailure};
pub use prompt::StandaloneQuestionFormatter;
