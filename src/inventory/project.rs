//! Per-project inventory record and stage derivation.

use std::path::Path;

use chrono::Utc;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Production pipeline stages, in order.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Prompts,
    Images,
    Slides,
    Audio,
    Video,
}

/// Derived progress status of a project. Never set directly; recomputed
/// from the artifact counters on every scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    InProgress,
    PromptsComplete,
    ImagesComplete,
    SlidesComplete,
    AudioComplete,
    VideoComplete,
}

impl StageStatus {
    /// Dashboard section heading for this status.
    pub fn label(&self) -> &'static str {
        match self {
            StageStatus::InProgress => "[WAIT] STARTING",
            StageStatus::PromptsComplete => "[PROMPTS] PROMPTS READY",
            StageStatus::ImagesComplete => "[IMAGES] IMAGES READY",
            StageStatus::SlidesComplete => "[SLIDES] SLIDES READY",
            StageStatus::AudioComplete => "[AUDIO] AUDIO READY",
            StageStatus::VideoComplete => "[OK] VIDEOS COMPLETE",
        }
    }

    /// All statuses in pipeline order, for grouped reporting.
    pub fn ordered() -> [StageStatus; 6] {
        [
            StageStatus::InProgress,
            StageStatus::PromptsComplete,
            StageStatus::ImagesComplete,
            StageStatus::SlidesComplete,
            StageStatus::AudioComplete,
            StageStatus::VideoComplete,
        ]
    }
}

/// Inventory record for a single production project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInventory {
    pub name: String,
    #[serde(default)]
    pub deck_path: String,
    pub project_dir: String,

    // Artifact counts
    #[serde(default)]
    pub total_slides: u32,
    #[serde(default)]
    pub prompts_generated: u32,
    #[serde(default)]
    pub images_ready: u32,
    #[serde(default)]
    pub slides_created: bool,
    #[serde(default)]
    pub audio_ready: u32,
    #[serde(default)]
    pub video_created: bool,

    // Timestamps
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,

    // Derived
    #[serde(default)]
    pub current_stage: StageStatus,
    #[serde(default)]
    pub completion_percent: u8,
}

impl ProjectInventory {
    pub fn new(name: &str, project_dir: &Path) -> Self {
        Self {
            name: name.to_string(),
            deck_path: String::new(),
            project_dir: project_dir.display().to_string(),
            total_slides: 0,
            prompts_generated: 0,
            images_ready: 0,
            slides_created: false,
            audio_ready: 0,
            video_created: false,
            created_at: Utc::now().to_rfc3339(),
            updated_at: String::new(),
            current_stage: StageStatus::InProgress,
            completion_percent: 0,
        }
    }

    /// Recompute `current_stage` and `completion_percent` from the artifact
    /// counters. Evaluated top-down from the end of the pipeline; first
    /// match wins.
    ///
    /// A project with no prompts yet (`total_slides == 0`) is in progress at
    /// 0% no matter what else exists on disk: nothing can be judged complete
    /// before at least one prompt establishes the expected slide count.
    pub fn update_stage(&mut self) {
        if self.total_slides == 0 {
            self.current_stage = StageStatus::InProgress;
            self.completion_percent = 0;
            return;
        }

        if self.video_created {
            self.current_stage = StageStatus::VideoComplete;
            self.completion_percent = 100;
        } else if self.audio_ready >= self.total_slides {
            self.current_stage = StageStatus::AudioComplete;
            self.completion_percent = 90;
        } else if self.slides_created {
            self.current_stage = StageStatus::SlidesComplete;
            self.completion_percent = 70;
        } else if self.images_ready >= self.total_slides {
            self.current_stage = StageStatus::ImagesComplete;
            self.completion_percent = 50;
        } else if self.prompts_generated >= self.total_slides {
            self.current_stage = StageStatus::PromptsComplete;
            self.completion_percent = 20;
        } else {
            self.current_stage = StageStatus::InProgress;
            self.completion_percent =
                ((self.prompts_generated as f64 / self.total_slides as f64) * 20.0) as u8;
        }
    }

    /// Next actionable step for this project, or `None` once the video
    /// exists (terminal) or the current stage is still incomplete.
    pub fn next_action(&self) -> Option<&'static str> {
        match self.current_stage {
            StageStatus::PromptsComplete if self.images_ready < self.total_slides => {
                Some("Generate images")
            }
            StageStatus::ImagesComplete if !self.slides_created => Some("Create slides"),
            StageStatus::SlidesComplete if self.audio_ready < self.total_slides => {
                Some("Generate audio")
            }
            StageStatus::AudioComplete if !self.video_created => Some("Create video"),
            _ => None,
        }
    }
}
