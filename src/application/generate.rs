//! Generate prompt use case
//!
//! Validates a form, runs it through the orchestrator and hands the result
//! to history. History failures are logged and never change the result.

use std::sync::Arc;

use tracing::{debug, warn};

use super::history::{HistoryEntry, HistoryRecorder};
use super::orchestrator::GenerationOrchestrator;
use crate::domain::error::FormError;
use crate::domain::generation::FormFields;
use crate::domain::templates::{
    BatchForm, OptimizationResult, OptimizationVariant, PromptTemplate, VariantOptimizeForm,
};

/// A generated prompt ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPrompt {
    pub title: String,
    pub category: String,
    pub text: String,
    pub vendor: String,
    pub fallback: bool,
}

pub struct GeneratePromptUseCase {
    orchestrator: Arc<GenerationOrchestrator>,
    history: Arc<HistoryRecorder>,
}

impl GeneratePromptUseCase {
    pub fn new(orchestrator: Arc<GenerationOrchestrator>, history: Arc<HistoryRecorder>) -> Self {
        Self {
            orchestrator,
            history,
        }
    }

    /// Generate from one form. Fails only on invalid input.
    pub async fn execute<T: PromptTemplate + ?Sized>(
        &self,
        template: &T,
    ) -> Result<GeneratedPrompt, FormError> {
        template.validate()?;

        let request = template.request();
        let outcome = self.orchestrator.generate_with_outcome(&request).await;

        let prompt = GeneratedPrompt {
            title: template.title(),
            category: template.category().to_string(),
            text: outcome.text,
            vendor: outcome.vendor,
            fallback: outcome.fallback,
        };
        self.remember(&prompt, request.context().clone()).await;
        Ok(prompt)
    }

    /// Run the variant optimizer for each requested variant, in order
    pub async fn optimize_variants(
        &self,
        form: &VariantOptimizeForm,
        variants: &[OptimizationVariant],
    ) -> Result<Vec<OptimizationResult>, FormError> {
        form.validate()?;

        let mut results = Vec::with_capacity(variants.len());
        for &variant in variants {
            let prompt = self.execute(&form.for_variant(variant)).await?;
            results.push(OptimizationResult::new(variant, prompt.text));
        }
        Ok(results)
    }

    /// Expand the batch form and generate every variation sequentially.
    /// `on_progress` sees `(done, total)` before each variation and once at the end.
    pub async fn batch<F>(
        &self,
        form: &BatchForm,
        mut on_progress: F,
    ) -> Result<Vec<GeneratedPrompt>, FormError>
    where
        F: FnMut(usize, usize),
    {
        form.validate()?;

        let variations = form.expand();
        let total = variations.len();
        let mut prompts = Vec::with_capacity(total);
        for variation in &variations {
            on_progress(prompts.len(), total);
            prompts.push(self.execute(variation).await?);
        }
        on_progress(total, total);
        Ok(prompts)
    }

    async fn remember(&self, prompt: &GeneratedPrompt, form_data: FormFields) {
        let settings = self.orchestrator.settings().snapshot().await;
        if !settings.preferences.auto_save {
            debug!("Auto-save disabled, skipping history");
            return;
        }

        let entry = HistoryEntry::new(
            &prompt.title,
            &prompt.text,
            &prompt.category,
            form_data,
            &prompt.vendor,
            prompt.fallback,
        );
        if let Err(e) = self.history.record(entry).await {
            warn!(error = %e, "Failed to save history");
        }
    }
}
