// Copyright 2024-2026 Model Gateway Contributors
// SPDX-License-Identifier: Apache-2.0

//! `standalone` and `generate` subcommands.
//!
//! Both print the model output to stdout and the error to stderr.

use std::io::Write;

use crate::client::TextGenerator;
use crate::error::RequestFailure;
use crate::prompt::StandaloneQuestionFormatter;

use super::{EXIT_REQUEST_FAILURE, EXIT_SUCCESS};

/// Question rewritten when `standalone` is run without arguments.
pub const DEMO_QUERY: &str = "What is a spotlist?";

/// Rewrite `query` against `chat_history` and print the result.
pub async fn run_standalone<G, W>(
    generator: &G,
    query: &str,
    chat_history: &str,
    max_tokens: u32,
    out: &mut W,
) -> i32
where
    G: TextGenerator + ?Sized,
    W: Write,
{
    let result = StandaloneQuestionFormatter::new(generator)
        .rewrite(query, chat_history, max_tokens)
        .await;
    report(result, out)
}

/// Generate text for `prompt` and print it.
pub async fn run_generate<G, W>(generator: &G, prompt: &str, max_tokens: u32, out: &mut W) -> i32
where
    G: TextGenerator + ?Sized,
    W: Write,
{
    report(generator.generate(prompt, max_tokens).await, out)
}

fn report<W: Write>(result: Result<String, RequestFailure>, out: &mut W) -> i32 {
    match result {
        Ok(text) => match writeln!(out, "{text}") {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Failed to write output: {}", e);
                EXIT_REQUEST_FAILURE
            }
        },
        Err(failure) => {
            eprintln!("{}", failure);
            EXIT_REQUEST_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        prompts: Mutex<Vec<(String, u32)>>,
        fail: bool,
    }

    impl Canned {
        fn new(fail: bool) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RequestFailure> {
            self.prompts.lock().unwrap().push((prompt.to_string(), max_tokens));
            if self.fail {
                let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
                return Err(RequestFailure::Decode {
                    message: err.to_string(),
                    source: err,
                });
            }
            Ok("What is a spotlist in radio advertising?".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_standalone_prints_output() {
        let generator = Canned::new(false);
        let mut out = Vec::new();
        let code = run_standalone(&generator, DEMO_QUERY, "", 1000, &mut out).await;
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "What is a spotlist in radio advertising?\n"
        );
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains(DEMO_QUERY));
        assert_eq!(prompts[0].1, 1000);
    }

    #[tokio::test]
    async fn test_run_generate_passes_prompt_through() {
        let generator = Canned::new(false);
        let mut out = Vec::new();
        let code = run_generate(&generator, "raw prompt", 64, &mut out).await;
        assert_eq!(code, EXIT_SUCCESS);
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts[0], ("raw prompt".to_string(), 64));
    }

    #[tokio::test]
    async fn test_failure_maps_to_exit_code() {
        let generator = Canned::new(true);
        let mut out = Vec::new();
        let code = run_generate(&generator, "raw prompt", 64, &mut out).await;
        assert_eq!(code, EXIT_REQUEST_FAILURE);
        assert!(out.is_empty());
    }
}
