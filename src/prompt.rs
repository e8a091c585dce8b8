//! Standalone-question rewriting.
//!
//! Turns a follow-up question plus chat history into a single question that
//! can be answered without the history. All the work is in the prompt; the
//! model does the rewriting.

use crate::client::TextGenerator;
use crate::error::RequestFailure;

/// Generation budget for rewritten questions.
pub const STANDALONE_MAX_TOKENS: u32 = 1000;

/// Build the rewriting prompt.
///
/// `query` and `chat_history` are embedded verbatim. Quotes are not escaped.
pub fn build_prompt(query: &str, chat_history: &str) -> String {
    format!(
        "Create a SINGLE standalone question. The question should be based on the New question plus the Chat history.     \
         If the New question can stand on its own you should return the New question. \
         New question: \"{query}\", Chat history: \"{chat_history}\"."
    )
}

/// Rewrites questions through a [`TextGenerator`].
pub struct StandaloneQuestionFormatter<'a, G: ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> StandaloneQuestionFormatter<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    /// Rewrite `query` with the default budget of 1000 tokens.
    pub async fn rewrite_default(
        &self,
        query: &str,
        chat_history: &str,
    ) -> Result<String, RequestFailure> {
        self.rewrite(query, chat_history, STANDALONE_MAX_TOKENS).await
    }

    /// Rewrite `query` so it stands without `chat_history`.
    ///
    /// Issues exactly one generate call and returns its result unchanged.
    pub async fn rewrite(
        &self,
        query: &str,
        chat_history: &str,
        max_tokens: u32,
    ) -> Result<String, RequestFailure> {
        let prompt = build_prompt(query, chat_history);
        tracing::debug!(
            query_chars = query.chars().count(),
            history_chars = chat_history.chars().count(),
            "rewriting standalone question"
        );
        self.generator.generate(&prompt, max_tokens).await
    }
}
