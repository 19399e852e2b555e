//! Canonical AI request types
//!
//! Every feature that needs generated text (resume optimization, cover letters,
//! job matching, ...) builds an [`AIRequest`] and hands it to the orchestrator.
//! Adapters translate it into their backend's native request body.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind of generation task the caller is performing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    ResumeOptimize,
    CoverLetterGenerate,
    JobMatch,
    SkillExtract,
    InterviewPrep,
    CareerInsights,
}

impl TaskType {
    /// Stable name used in logs and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::ResumeOptimize => "resume_optimize",
            TaskType::CoverLetterGenerate => "cover_letter_generate",
            TaskType::JobMatch => "job_match",
            TaskType::SkillExtract => "skill_extract",
            TaskType::InterviewPrep => "interview_prep",
            TaskType::CareerInsights => "career_insights",
        }
    }

    /// Completion budget applied when the caller does not set `max_tokens`
    pub fn default_max_tokens(&self) -> u32 {
        match self {
            TaskType::ResumeOptimize | TaskType::CoverLetterGenerate => 2048,
            TaskType::InterviewPrep | TaskType::CareerInsights => 1536,
            TaskType::JobMatch | TaskType::SkillExtract => 1024,
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling parameters shared by all backends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// Canonical text-generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIRequest {
    pub task_type: TaskType,
    pub prompt: String,
    /// Optional system instruction, sent in whatever slot the backend provides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default)]
    pub parameters: GenerationParams,
    /// Caller-supplied ceiling for the whole dispatch, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl AIRequest {
    pub fn new(task_type: TaskType, prompt: impl Into<String>) -> Self {
        Self {
            task_type,
            prompt: prompt.into(),
            system: None,
            parameters: GenerationParams::default(),
            deadline_ms: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_parameters(mut self, parameters: GenerationParams) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// `max_tokens` to send, falling back to the task default
    pub fn max_tokens(&self) -> u32 {
        self.parameters
            .max_tokens
            .unwrap_or_else(|| self.task_type.default_max_tokens())
    }
}
