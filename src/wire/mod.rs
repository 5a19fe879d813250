use serde::{Deserialize, Serialize};
use std::fmt;

/// ========================================
/// Request/Result records for one generation
/// ========================================

/// API credential. Never printed, never serialized.
#[derive(Clone, Default)]
pub struct Credential(String);

impl Credential {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

#[derive(Debug, Clone)]
pub struct LessonPlanRequest {
    pub grade: String,
    pub subject: String,
    pub topic: String,
    pub duration: String,
    pub credential: Credential,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
}

/// What the model was asked to return. Nothing is guaranteed present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub objectives: Option<Vec<String>>,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub explanation_steps: Option<Vec<String>>,
    #[serde(default)]
    pub activities: Option<Vec<Activity>>,
    #[serde(default)]
    pub real_life_examples: Option<Vec<String>>,
    #[serde(default)]
    pub blackboard_summary: Option<Vec<String>>,
    #[serde(default)]
    pub homework: Option<Vec<String>>,
    #[serde(default)]
    pub assessment: Option<Vec<String>>,
    #[serde(default)]
    pub image_keywords: Option<Vec<String>>,
}

/// Exactly one of these per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Plan(Box<LessonPlan>),
    Error { error: String },
}

impl GenerationResult {
    pub fn error(msg: impl Into<String>) -> Self {
        GenerationResult::Error { error: msg.into() }
    }
}
