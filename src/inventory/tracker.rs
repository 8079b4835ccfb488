//! Filesystem scanner and persisted inventory store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use super::project::{ProjectInventory, Stage};

/// Errors that can occur reading or writing the inventory file.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Inventory file error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tracks every project's progress through the pipeline by scanning the
/// artifacts actually on disk. Counts are re-derived on every scan, which
/// makes the tracker crash-safe: a crashed run is simply re-classified the
/// next time its directory is scanned.
pub struct InventoryTracker {
    base_dir: PathBuf,
    inventory_path: PathBuf,
    projects: BTreeMap<String, ProjectInventory>,
}

impl InventoryTracker {
    /// Open the tracker rooted at `base_dir`, loading any prior inventory.
    /// A missing or unreadable inventory file means an empty store.
    pub fn open(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let inventory_path = base_dir.join("inventory.json");

        let mut tracker = Self {
            base_dir,
            inventory_path,
            projects: BTreeMap::new(),
        };

        if let Err(e) = tracker.load() {
            warn!("could not load inventory: {e}");
        }

        tracker
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn projects(&self) -> impl Iterator<Item = &ProjectInventory> {
        self.projects.values()
    }

    pub fn get(&self, name: &str) -> Option<&ProjectInventory> {
        self.projects.get(name)
    }

    pub fn load(&mut self) -> Result<(), InventoryError> {
        if !self.inventory_path.exists() {
            return Ok(());
        }

        let json = fs::read_to_string(&self.inventory_path)?;
        self.projects = serde_json::from_str(&json)?;

        Ok(())
    }

    pub fn save(&self) -> Result<(), InventoryError> {
        fs::create_dir_all(&self.base_dir)?;
        fs::write(
            &self.inventory_path,
            serde_json::to_string_pretty(&self.projects)?,
        )?;

        Ok(())
    }

    /// Scan one project directory, update (or create) its inventory record,
    /// and persist the store. Missing subdirectories count as zero artifacts
    /// for their stage; a scan never fails because a directory is malformed.
    pub fn scan_project(&mut self, name: &str, project_dir: &Path) -> ProjectInventory {
        let mut project = self
            .projects
            .remove(name)
            .unwrap_or_else(|| ProjectInventory::new(name, project_dir));

        project.updated_at = Utc::now().to_rfc3339();

        let prompts = count_files(&project_dir.join("image_prompts"), "slide_", None, &["txt"]);
        project.prompts_generated = prompts;
        project.total_slides = project.total_slides.max(prompts);

        project.images_ready = count_files(
            &project_dir.join("images"),
            "slide_",
            None,
            &["png", "jpg"],
        );

        let redesigned =
            count_files(project_dir, "", Some("_redesigned"), &["pptx"]) > 0;
        project.slides_created = project_dir.join("slides_rendered").is_dir() || redesigned;

        let output_dir = project_dir.join("output");
        project.audio_ready = count_files(&output_dir, "slide_", Some("_audio"), &["wav"]);
        project.video_created = count_files(&output_dir, "", None, &["mp4"]) > 0;

        project.update_stage();

        self.projects.insert(name.to_string(), project.clone());
        if let Err(e) = self.save() {
            warn!("could not save inventory: {e}");
        }

        project
    }

    /// Scan every subdirectory of the projects root.
    pub fn scan_all_projects(&mut self) {
        let Ok(entries) = fs::read_dir(&self.base_dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && !name.starts_with('.')
            {
                let name = name.to_string();
                self.scan_project(&name, &path);
            }
        }
    }

    /// Projects eligible to begin work at the given stage.
    pub fn pending_work(&self, stage: Stage) -> Vec<&ProjectInventory> {
        self.projects
            .values()
            .filter(|p| match stage {
                Stage::Prompts => p.total_slides > 0 && p.prompts_generated < p.total_slides,
                Stage::Images => p.prompts_generated > 0 && p.images_ready < p.prompts_generated,
                Stage::Slides => p.images_ready > 0 && !p.slides_created,
                Stage::Audio => p.slides_created && p.audio_ready < p.total_slides,
                Stage::Video => {
                    p.total_slides > 0 && p.audio_ready >= p.total_slides && !p.video_created
                }
            })
            .collect()
    }

    /// Human-readable dashboard: projects grouped by stage with progress
    /// bars, aggregate counts, and suggested next actions.
    pub fn dashboard(&self) -> String {
        let mut lines = Vec::new();
        lines.push("=".repeat(62));
        lines.push("|              PRODUCTION INVENTORY DASHBOARD                |".to_string());
        lines.push("=".repeat(62));
        lines.push(String::new());

        if self.projects.is_empty() {
            lines.push("No projects in inventory yet.".to_string());
            lines.push(String::new());
            lines.push("To add projects:".to_string());
            lines.push("  slidecast --project <name>".to_string());
            return lines.join("\n");
        }

        let total = self.projects.len();
        let completed = self.projects.values().filter(|p| p.video_created).count();

        lines.push(format!("Total Projects: {total}"));
        lines.push(format!("  Completed: {completed}"));
        lines.push(format!("  In Progress: {}", total - completed));
        lines.push(String::new());

        for status in super::StageStatus::ordered() {
            let group: Vec<_> = self
                .projects
                .values()
                .filter(|p| p.current_stage == status)
                .collect();
            if group.is_empty() {
                continue;
            }

            lines.push(status.label().to_string());
            lines.push(format!("+{}+", "-".repeat(58)));

            for project in group {
                lines.push(format!("| {}", truncate(&project.name, 30)));
                lines.push(format!(
                    "|   [{}] {}%",
                    progress_bar(project.completion_percent, 20),
                    project.completion_percent
                ));

                if project.total_slides > 0 {
                    let mut details = Vec::new();
                    if project.prompts_generated > 0 {
                        details.push(format!(
                            "Prompts: {}/{}",
                            project.prompts_generated, project.total_slides
                        ));
                    }
                    if project.images_ready > 0 {
                        details.push(format!(
                            "Images: {}/{}",
                            project.images_ready, project.total_slides
                        ));
                    }
                    if project.slides_created {
                        details.push("Slides: [OK]".to_string());
                    }
                    if project.audio_ready > 0 {
                        details.push(format!(
                            "Audio: {}/{}",
                            project.audio_ready, project.total_slides
                        ));
                    }
                    if project.video_created {
                        details.push("Video: [OK]".to_string());
                    }
                    if !details.is_empty() {
                        lines.push(format!("|   {}", details.join(" | ")));
                    }
                }

                if let Some(action) = project.next_action() {
                    lines.push(format!("|   -> Next: {action}"));
                }
                lines.push("|".to_string());
            }

            lines.push(format!("+{}+", "-".repeat(58)));
            lines.push(String::new());
        }

        lines.push("=".repeat(60));
        lines.push("NEXT ACTIONS:".to_string());
        lines.push(String::new());

        let actions: Vec<_> = self
            .projects
            .values()
            .filter_map(|p| p.next_action().map(|a| format!("  * {}: {a}", p.name)))
            .collect();

        if actions.is_empty() {
            lines.push("  [OK] All projects at current stage completion".to_string());
        } else {
            lines.extend(actions);
        }

        lines.join("\n")
    }
}

/// Count files in `dir` whose names start with `prefix`, contain `infix`
/// (when given), and carry one of the `extensions`. A missing directory
/// counts as zero.
fn count_files(dir: &Path, prefix: &str, infix: Option<&str>, extensions: &[&str]) -> u32 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let ext_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e));

        if ext_matches
            && file_name.starts_with(prefix)
            && infix.is_none_or(|i| file_name.contains(i))
        {
            count += 1;
        }
    }

    count
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
