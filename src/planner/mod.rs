use tracing::Instrument;
use uuid::Uuid;

use crate::errors::PlannerError;
use crate::extract;
use crate::prompt;
use crate::provider::Provider;
use crate::wire::{GenerationResult, LessonPlan, LessonPlanRequest};

/// Build the prompt, call the provider once and parse what comes back.
pub async fn try_generate(
    provider: &dyn Provider,
    req: &LessonPlanRequest,
) -> Result<LessonPlan, PlannerError> {
    if req.credential.is_empty() {
        return Err(PlannerError::MissingCredential);
    }
    let prompt = prompt::lesson_prompt(req);
    let raw = provider.generate(&req.credential, &prompt).await?;
    tracing::debug!(raw = %raw, "model output");
    extract::parse_lesson_plan(&raw)
}

/// Same as `try_generate`, with every failure folded into `{error}`.
pub async fn generate(provider: &dyn Provider, req: &LessonPlanRequest) -> GenerationResult {
    let span = tracing::info_span!(
        "generate",
        request_id = %Uuid::new_v4(),
        grade = %req.grade,
        subject = %req.subject,
        topic = %req.topic,
    );
    async {
        match try_generate(provider, req).await {
            Ok(plan) => {
                tracing::info!("lesson plan generated");
                GenerationResult::Plan(Box::new(plan))
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                GenerationResult::error(e.to_string())
            }
        }
    }
    .instrument(span)
    .await
}
