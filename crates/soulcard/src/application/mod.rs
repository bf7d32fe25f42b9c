//! Application Layer (Use Cases)
//!
//! One orchestrator per user-facing feature. Each builds its prompts, calls
//! the [`CompletionProvider`], runs the response pipeline and turns any
//! failure into a [`FeatureError`].

mod daily_fortune;
mod diagnosis;
mod fortune_card;
mod note_card;
mod personality;

#[cfg(test)]
pub(crate) mod testing;

pub use daily_fortune::{DailyFortuneRequest, DailyFortuneService, DAILY_FORTUNE_TEMPERATURE};
pub use diagnosis::DiagnosisService;
pub use fortune_card::{FortuneCardService, FORTUNE_CARD_TEMPERATURE};
pub use note_card::{NoteCardService, NOTE_CARD_TEMPERATURE};
pub use personality::{PersonalityService, TurnOutcome, CHAT_TEMPERATURE, PROFILE_TEMPERATURE};

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::domain::errors::{Feature, FeatureError, PipelineError};
use crate::pipeline::{classify, normalize, validate, Schema};
use crate::ports::services::{ChatMessage, CompletionOptions, CompletionProvider};

/// Trailer appended to every structured user prompt
const JSON_ONLY: &str = "只返回 JSON，不要包含任何其他文字。";

/// Provider handle plus per-request settings shared by every orchestrator
pub(crate) struct FeatureRunner<P: CompletionProvider + ?Sized> {
    provider: Arc<P>,
    cancellation: Option<CancellationToken>,
}

impl<P: CompletionProvider + ?Sized> Clone for FeatureRunner<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            cancellation: self.cancellation.clone(),
        }
    }
}

impl<P: CompletionProvider + ?Sized> FeatureRunner<P> {
    pub(crate) fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            cancellation: None,
        }
    }

    pub(crate) fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn options(&self, temperature: f32) -> CompletionOptions {
        let options = CompletionOptions::with_temperature(temperature);
        match &self.cancellation {
            Some(token) => options.cancel_on(token.clone()),
            None => options,
        }
    }

    /// Prompt → completion → normalize → validate
    pub(crate) async fn structured<T: Schema>(
        &self,
        feature: Feature,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<T, FeatureError> {
        self.structured_with(feature, system, user, temperature, |_| {})
            .await
    }

    /// Like [`Self::structured`], with `pin` applied to the parsed value
    /// before validation. Used for fields the model is not authoritative for.
    pub(crate) async fn structured_with<T: Schema>(
        &self,
        feature: Feature,
        system: &str,
        user: &str,
        temperature: f32,
        pin: impl FnOnce(&mut Value) + Send,
    ) -> Result<T, FeatureError> {
        debug!(
            feature = feature.label(),
            model = self.provider.model_id(),
            temperature,
            "Running structured completion"
        );
        let outcome = async {
            let raw = self
                .provider
                .complete_prompt(system, user, &self.options(temperature))
                .await?;
            let mut value = normalize(&raw)?;
            pin(&mut value);
            Ok::<T, PipelineError>(validate::<T>(value)?)
        }
        .await;

        outcome.map_err(|err| self.fail(feature, err))
    }

    /// Free-text chat completion, no schema
    pub(crate) async fn chat(
        &self,
        feature: Feature,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, FeatureError> {
        self.provider
            .complete(messages, &self.options(temperature))
            .await
            .map(|reply| reply.trim().to_string())
            .map_err(|err| self.fail(feature, err))
    }

    /// Log the internal detail and classify
    pub(crate) fn fail(&self, feature: Feature, err: impl Into<PipelineError>) -> FeatureError {
        let err = err.into();
        let classified = classify(feature, &err);
        error!(
            feature = feature.label(),
            kind = %classified.kind,
            error = %err,
            "Feature request failed"
        );
        classified
    }
}
