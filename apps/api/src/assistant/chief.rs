//! Chief — the assistant that turns stored documents into completion requests.
//!
//! Each request runs `Idle → Composing → Invoking → {Succeeded, Failed}` and makes
//! exactly one outbound call. Failures never reach the caller: they are logged
//! and replaced by a fixed apology.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::assistant::prompts::{
    application_analysis_prompt, comparison_prompt, cover_letter_prompt, resume_analysis_prompt,
    CHIEF_SYSTEM, COVER_LETTER_APOLOGY, COVER_LETTER_BANNER, COVER_LETTER_SYSTEM,
    RESPOND_APOLOGY,
};
use crate::assistant::truncate::{Truncator, GLOBAL_TOKEN_BUDGET};
use crate::llm_client::{CompletionBackend, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Composing,
    Invoking,
    Succeeded,
    Failed,
}

/// Phase tracker for one assistant request; transitions are logged at debug level.
struct RequestTrace {
    operation: &'static str,
    phase: RequestPhase,
}

impl RequestTrace {
    fn start(operation: &'static str) -> Self {
        Self {
            operation,
            phase: RequestPhase::Idle,
        }
    }

    fn advance(&mut self, next: RequestPhase) {
        debug!(
            operation = self.operation,
            from = ?self.phase,
            to = ?next,
            "assistant request phase"
        );
        self.phase = next;
    }
}

/// Why a request fell back to its apology.
#[derive(Debug, Error)]
enum RequestError {
    #[error("prompt composition failed: {0}")]
    Compose(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Share of `budget` for a prompt built around one document.
fn single_share(budget: usize) -> usize {
    budget / 2
}

/// Share of `budget` for each document of a two-document prompt.
fn paired_share(budget: usize) -> usize {
    budget / 3
}

#[derive(Clone)]
pub struct Assistant {
    backend: Arc<dyn CompletionBackend>,
    truncator: Truncator,
    token_budget: usize,
}

impl Assistant {
    pub fn new(backend: Arc<dyn CompletionBackend>, truncator: Truncator) -> Self {
        Self {
            backend,
            truncator,
            token_budget: GLOBAL_TOKEN_BUDGET,
        }
    }

    pub fn with_token_budget(mut self, token_budget: usize) -> Self {
        self.token_budget = token_budget;
        self
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    pub fn single_document_budget(&self) -> usize {
        single_share(self.token_budget)
    }

    /// Fixed share for each document of a two-document prompt. Unused budget
    /// from a short document is not handed to the other one.
    pub fn paired_document_budget(&self) -> usize {
        paired_share(self.token_budget)
    }

    /// Free-form chat. Returns the trimmed completion or `RESPOND_APOLOGY`.
    pub async fn respond(&self, user_text: &str) -> String {
        let text = user_text.to_owned();
        self.chat("respond", move |t, budget| t.truncate(&text, budget))
            .await
    }

    pub async fn analyze_resume(&self, resume_text: &str) -> String {
        let resume = resume_text.to_owned();
        self.chat("analyze_resume", move |t, budget| {
            let prompt = resume_analysis_prompt(&t.truncate(&resume, single_share(budget)));
            t.truncate(&prompt, budget)
        })
        .await
    }

    pub async fn analyze_application(&self, application_text: &str) -> String {
        let application = application_text.to_owned();
        self.chat("analyze_application", move |t, budget| {
            let prompt =
                application_analysis_prompt(&t.truncate(&application, single_share(budget)));
            t.truncate(&prompt, budget)
        })
        .await
    }

    pub async fn compare(&self, resume_text: &str, application_text: &str) -> String {
        let (resume, application) = (resume_text.to_owned(), application_text.to_owned());
        self.chat("compare", move |t, budget| {
            let share = paired_share(budget);
            let prompt =
                comparison_prompt(&t.truncate(&resume, share), &t.truncate(&application, share));
            t.truncate(&prompt, budget)
        })
        .await
    }

    /// Drafts a cover letter under its own system instruction. The result is
    /// prefixed with `COVER_LETTER_BANNER`; failures yield `COVER_LETTER_APOLOGY`.
    pub async fn generate_cover_letter(&self, resume_text: &str, application_text: &str) -> String {
        let (resume, application) = (resume_text.to_owned(), application_text.to_owned());
        let mut trace = RequestTrace::start("generate_cover_letter");
        let outcome = self
            .run(&mut trace, COVER_LETTER_SYSTEM, move |t, budget| {
                let share = paired_share(budget);
                cover_letter_prompt(&t.truncate(&resume, share), &t.truncate(&application, share))
            })
            .await;

        match outcome {
            Ok(letter) => format!("{COVER_LETTER_BANNER}\n\n{letter}"),
            Err(e) => {
                error!("Error in generate_cover_letter: {e}");
                COVER_LETTER_APOLOGY.to_string()
            }
        }
    }

    /// Runs a request under the general system instruction; failures become
    /// `RESPOND_APOLOGY`.
    async fn chat<F>(&self, operation: &'static str, compose: F) -> String
    where
        F: FnOnce(&Truncator, usize) -> String + Send + 'static,
    {
        let mut trace = RequestTrace::start(operation);
        match self.run(&mut trace, CHIEF_SYSTEM, compose).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error in {operation}: {e}");
                RESPOND_APOLOGY.to_string()
            }
        }
    }

    /// Composes the prompt on the blocking pool (BPE encoding is CPU-bound),
    /// then makes the single outbound call.
    async fn run<F>(
        &self,
        trace: &mut RequestTrace,
        system: &str,
        compose: F,
    ) -> Result<String, RequestError>
    where
        F: FnOnce(&Truncator, usize) -> String + Send + 'static,
    {
        trace.advance(RequestPhase::Composing);
        let truncator = self.truncator.clone();
        let budget = self.token_budget;
        let (prompt, tokens) = tokio::task::spawn_blocking(move || {
            let prompt = compose(&truncator, budget);
            let tokens = truncator.count_tokens(&prompt);
            (prompt, tokens)
        })
        .await?;
        debug!(operation = trace.operation, tokens, budget, "prompt composed");

        Ok(self.invoke(trace, system, &prompt).await?)
    }

    async fn invoke(
        &self,
        trace: &mut RequestTrace,
        system: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        trace.advance(RequestPhase::Invoking);
        let outcome = self
            .backend
            .complete(system, prompt)
            .await
            .and_then(|text| {
                let text = text.trim();
                if text.is_empty() {
                    Err(LlmError::EmptyContent)
                } else {
                    Ok(text.to_owned())
                }
            });
        trace.advance(if outcome.is_ok() {
            RequestPhase::Succeeded
        } else {
            RequestPhase::Failed
        });
        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;
    use crate::assistant::truncate::test_truncator;
    use crate::llm_client::LlmClient;

    fn assistant_with(backend: Arc<FakeBackend>) -> Assistant {
        Assistant::new(backend, test_truncator())
    }

    fn long_document(word: &str) -> String {
        format!("{word} ").repeat(8_000)
    }

    #[tokio::test]
    async fn test_respond_returns_trimmed_reply() {
        let backend = Arc::new(FakeBackend::replying("  Good luck!\n"));
        let chief = assistant_with(backend.clone());

        assert_eq!(chief.respond("Any tips?").await, "Good luck!");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, CHIEF_SYSTEM);
        assert_eq!(calls[0].1, "Any tips?");
    }

    #[tokio::test]
    async fn test_respond_failure_yields_apology() {
        let backend = Arc::new(FakeBackend::failing());
        let chief = assistant_with(backend.clone());

        assert_eq!(chief.respond("hello").await, RESPOND_APOLOGY);
        assert_eq!(backend.calls().len(), 1, "no retries on failure");
    }

    #[tokio::test]
    async fn test_blank_reply_counts_as_failure() {
        let chief = assistant_with(Arc::new(FakeBackend::replying("   ")));
        assert_eq!(chief.respond("hello").await, RESPOND_APOLOGY);
    }

    #[tokio::test]
    async fn test_network_fault_yields_apology() {
        let client = LlmClient::new("sk-test".into(), Some("http://127.0.0.1:9/v1")).unwrap();
        let chief = Assistant::new(Arc::new(client), test_truncator());
        assert_eq!(chief.respond("hello").await, RESPOND_APOLOGY);
    }

    #[tokio::test]
    async fn test_respond_truncates_to_global_budget() {
        let backend = Arc::new(FakeBackend::replying("ok"));
        let chief = assistant_with(backend.clone()).with_token_budget(100);
        let truncator = test_truncator();

        chief.respond(&long_document("hello")).await;

        let sent = &backend.calls()[0].1;
        assert_eq!(truncator.count_tokens(sent), 100);
    }

    #[tokio::test]
    async fn test_analyze_resume_uses_half_budget() {
        let backend = Arc::new(FakeBackend::replying("Strong Rust background."));
        let chief = assistant_with(backend.clone()).with_token_budget(300);
        let truncator = test_truncator();

        let reply = chief.analyze_resume(&long_document("rust")).await;
        assert_eq!(reply, "Strong Rust background.");

        let sent = &backend.calls()[0].1;
        let overhead = truncator.count_tokens(&resume_analysis_prompt(""));
        assert!(sent.starts_with("Analyze the following resume"));
        assert!(truncator.count_tokens(sent) <= 150 + overhead + 2);
    }

    #[tokio::test]
    async fn test_analyze_application_short_text_untouched() {
        let backend = Arc::new(FakeBackend::replying("Needs Rust."));
        let chief = assistant_with(backend.clone());

        chief.analyze_application("We need a Rust engineer.").await;

        let sent = &backend.calls()[0].1;
        assert_eq!(sent, &application_analysis_prompt("We need a Rust engineer."));
    }

    #[tokio::test]
    async fn test_compare_truncates_each_document_independently() {
        let backend = Arc::new(FakeBackend::replying("Good match."));
        let chief = assistant_with(backend.clone());
        let truncator = test_truncator();
        let share = GLOBAL_TOKEN_BUDGET / 3;

        let resume = long_document("engineer");
        let application = long_document("python");
        assert!(truncator.count_tokens(&resume) > share);
        assert!(truncator.count_tokens(&application) > share);

        assert_eq!(chief.compare(&resume, &application).await, "Good match.");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let sent = &calls[0].1;
        let overhead = truncator.count_tokens(&comparison_prompt("", ""));
        assert!(truncator.count_tokens(sent) <= 2 * share + overhead + 4);

        // Both documents made it in, each cut to its own share.
        let expected_resume = truncator.truncate(&resume, share);
        let expected_application = truncator.truncate(&application, share);
        assert_eq!(sent, &comparison_prompt(&expected_resume, &expected_application));
    }

    #[tokio::test]
    async fn test_compare_does_not_redistribute_unused_budget() {
        let backend = Arc::new(FakeBackend::replying("ok"));
        let chief = assistant_with(backend.clone()).with_token_budget(300);
        let truncator = test_truncator();

        let application = long_document("python");
        chief.compare("Short resume.", &application).await;

        let sent = &backend.calls()[0].1;
        let expected = comparison_prompt("Short resume.", &truncator.truncate(&application, 100));
        assert_eq!(sent, &expected);
    }

    #[tokio::test]
    async fn test_cover_letter_banner_and_system_instruction() {
        let backend = Arc::new(FakeBackend::replying("Dear Hiring Manager,\n..."));
        let chief = assistant_with(backend.clone());

        let letter = chief.generate_cover_letter("My resume", "Their job").await;
        assert_eq!(
            letter,
            "Here's the generated cover letter:\n\nDear Hiring Manager,\n..."
        );

        let calls = backend.calls();
        assert_eq!(calls[0].0, COVER_LETTER_SYSTEM);
        assert_eq!(calls[0].1, cover_letter_prompt("My resume", "Their job"));
    }

    #[tokio::test]
    async fn test_cover_letter_failure_has_its_own_apology() {
        let chief = assistant_with(Arc::new(FakeBackend::failing()));
        let letter = chief.generate_cover_letter("r", "a").await;
        assert_eq!(letter, COVER_LETTER_APOLOGY);
        assert_ne!(letter, RESPOND_APOLOGY);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_requests_each_make_one_call() {
        let backend = Arc::new(FakeBackend::replying("ok"));
        let chief = assistant_with(backend.clone()).with_token_budget(300);
        let resume = long_document("rust");
        let application = long_document("python");

        let (a, b, c) = tokio::join!(
            chief.analyze_resume(&resume),
            chief.compare(&resume, &application),
            chief.generate_cover_letter(&resume, &application),
        );
        assert_eq!(a, "ok");
        assert_eq!(b, "ok");
        assert!(c.ends_with("\n\nok"));

        let truncator = test_truncator();
        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        for (_, sent) in &calls {
            assert!(truncator.count_tokens(sent) <= 300);
        }
    }

    #[test]
    fn test_budget_shares() {
        let chief = assistant_with(Arc::new(FakeBackend::replying("")));
        assert_eq!(chief.token_budget(), 16_000);
        assert_eq!(chief.single_document_budget(), 8_000);
        assert_eq!(chief.paired_document_budget(), 5_333);
    }
}
