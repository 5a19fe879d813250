use serde::Deserialize;

use crate::cli::{Duration, Grade};
use crate::images::{self, ImageProbe, ImageSection, ImageSettings};
use crate::planner;
use crate::provider::Provider;
use crate::wire::{Activity, Credential, GenerationResult, LessonPlan, LessonPlanRequest};

pub const MISSING_KEY_MESSAGE: &str =
    "Please provide your Gemini API Key (form field, --api-key, or GEMINI_API_KEY).";
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields (Subject and Topic are required).";
pub const INVALID_CHOICE_MESSAGE: &str = "Please choose a Class/Grade and Duration from the list.";
pub const NO_IMAGES_MESSAGE: &str = "Not images available right now";

/// Raw form fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Bullets(Vec<String>),
    Text(String),
    Activities(Vec<Activity>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub icon: &'static str,
    pub heading: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonView {
    pub title: String,
    pub caption: String,
    pub sections: Vec<Section>,
    /// `None` when image resolution was skipped.
    pub images: Option<ImageSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Welcome,
    InvalidInput(String),
    Failed(String),
    Lesson(Box<LessonView>),
}

fn bullets(icon: &'static str, heading: &'static str, items: Option<Vec<String>>) -> Option<Section> {
    items.map(|v| Section { icon, heading, body: SectionBody::Bullets(v) })
}

/// Sections in display order; absent keys produce no section.
pub fn sections(p: LessonPlan) -> Vec<Section> {
    [
        bullets("📘", "Learning Objectives", p.objectives),
        p.introduction.map(|t| Section { icon: "🧠", heading: "Introduction", body: SectionBody::Text(t) }),
        bullets("📚", "Explanation Steps", p.explanation_steps),
        p.activities.map(|a| Section { icon: "🎲", heading: "Activities", body: SectionBody::Activities(a) }),
        bullets("💡", "Real-Life Examples", p.real_life_examples),
        bullets("🖤", "Blackboard Summary", p.blackboard_summary),
        bullets("🏠", "Homework", p.homework),
        bullets("📝", "Assessment", p.assessment),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Title and caption, using the request values where the model left a field out.
pub fn lesson_view(plan: LessonPlan, req: &LessonPlanRequest, images: Option<ImageSection>) -> LessonView {
    let or = |v: &Option<String>, fallback: &str| v.clone().unwrap_or_else(|| fallback.to_string());
    let title = format!("Lesson Plan: {}", or(&plan.topic, &req.topic));
    let caption = format!(
        "{} | {} | {}",
        or(&plan.grade, &req.grade),
        or(&plan.subject, &req.subject),
        or(&plan.duration, &req.duration)
    );
    LessonView { title, caption, sections: sections(plan), images }
}

/// Everything the presentation needs besides the form.
pub struct Presenter<'a> {
    pub provider: &'a dyn Provider,
    pub probe: &'a dyn ImageProbe,
    pub images: &'a ImageSettings,
    /// Credential configured outside the form, if any.
    pub configured_key: &'a Credential,
    pub resolve_images: bool,
}

impl Presenter<'_> {
    /// Validate locally, then call the adapter at most once.
    pub async fn present(&self, form: &FormInput, submitted: bool) -> Page {
        if !submitted {
            return Page::Welcome;
        }
        let credential = if form.api_key.trim().is_empty() {
            self.configured_key.clone()
        } else {
            Credential::new(form.api_key.clone())
        };
        if credential.is_empty() {
            return Page::InvalidInput(MISSING_KEY_MESSAGE.into());
        }
        if form.subject.trim().is_empty() || form.topic.trim().is_empty() {
            return Page::InvalidInput(MISSING_FIELDS_MESSAGE.into());
        }
        let (Some(grade), Some(duration)) = (Grade::from_label(&form.grade), Duration::from_label(&form.duration)) else {
            tracing::debug!(grade = %form.grade, duration = %form.duration, "rejected form choice");
            return Page::InvalidInput(INVALID_CHOICE_MESSAGE.into());
        };

        let req = LessonPlanRequest {
            grade: grade.label().to_string(),
            subject: form.subject.trim().to_string(),
            topic: form.topic.trim().to_string(),
            duration: duration.label().to_string(),
            credential,
        };
        match planner::generate(self.provider, &req).await {
            GenerationResult::Error { error } => Page::Failed(error),
            GenerationResult::Plan(plan) => {
                let images = if self.resolve_images {
                    Some(images::resolve_images(plan.image_keywords.as_deref(), self.probe, self.images).await)
                } else {
                    None
                };
                Page::Lesson(Box::new(lesson_view(*plan, &req, images)))
            }
        }
    }
}
