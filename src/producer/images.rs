//! Drives slide image generation across the account pool.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};
use tracing::{debug, warn};

use crate::imagegen::ImageBackend;
use crate::pool::AccountPool;

const MAX_ATTEMPTS: u32 = 3;

const PLACEHOLDER_WIDTH: u32 = 1920;
const PLACEHOLDER_HEIGHT: u32 = 1080;
const PLACEHOLDER_COLOR: Rgb<u8> = Rgb([18, 26, 38]);

/// One prompt to render, tied to a slide number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePrompt {
    pub slide_number: u32,
    pub text: String,
}

/// Outcome counts for one production run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProductionReport {
    pub generated: u32,
    pub reused: u32,
    pub placeholders: u32,
    pub failures: u32,
}

/// Generates slide images, reusing existing files, rotating API accounts on
/// quota errors, and falling back to placeholder images when the whole pool
/// is exhausted. Pool exhaustion degrades the run, it never aborts it.
pub struct ImageProducer<B: ImageBackend> {
    backend: B,
    output_dir: PathBuf,
}

impl<B: ImageBackend> ImageProducer<B> {
    pub fn new(backend: B, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            output_dir: output_dir.into(),
        }
    }

    /// Render every prompt into `output_dir` as `slide_NN.png`.
    pub fn produce(&self, pool: &mut AccountPool, prompts: &[SlidePrompt]) -> ProductionReport {
        let mut report = ProductionReport::default();

        if let Err(e) = fs::create_dir_all(&self.output_dir) {
            warn!("could not create image output dir: {e}");
            report.failures = prompts.len() as u32;
            return report;
        }

        for prompt in prompts {
            if let Some(existing) = self.existing_image(prompt.slide_number) {
                debug!(slide = prompt.slide_number, "reusing {}", existing.display());
                report.reused += 1;
                continue;
            }

            match self.generate_one(pool, prompt) {
                Some(_) => report.generated += 1,
                None => {
                    if self.write_placeholder(prompt.slide_number) {
                        report.placeholders += 1;
                    } else {
                        report.failures += 1;
                    }
                }
            }
        }

        report
    }

    /// Previously generated or manually supplied image for a slide, if any.
    fn existing_image(&self, slide_number: u32) -> Option<PathBuf> {
        for ext in ["png", "jpg", "jpeg"] {
            let path = self.output_dir.join(format!("slide_{slide_number:02}.{ext}"));
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    fn image_path(&self, slide_number: u32) -> PathBuf {
        self.output_dir.join(format!("slide_{slide_number:02}.png"))
    }

    /// Generate one image, rotating accounts on quota errors. `None` means
    /// every account is exhausted or the call kept failing; the caller falls
    /// back to a placeholder.
    fn generate_one(&self, pool: &mut AccountPool, prompt: &SlidePrompt) -> Option<PathBuf> {
        let mut attempts = 0;

        while attempts < MAX_ATTEMPTS {
            let api_key = pool.api_key()?;

            match self.backend.generate(&prompt.text, &api_key) {
                Ok(bytes) => {
                    pool.mark_success();

                    let path = self.image_path(prompt.slide_number);
                    return match fs::write(&path, &bytes) {
                        Ok(()) => Some(path),
                        Err(e) => {
                            warn!("could not write {}: {e}", path.display());
                            None
                        }
                    };
                }
                Err(e) if e.is_quota_exceeded() => {
                    // Rotation advances the pool cursor; retry does not count
                    // against the attempt budget. The loop terminates once
                    // every account is exhausted and api_key() returns None.
                    pool.mark_failure(&e.to_string(), true);
                }
                Err(e) => {
                    attempts += 1;
                    pool.mark_failure(&e.to_string(), false);
                    warn!(
                        slide = prompt.slide_number,
                        "generation attempt {attempts} failed: {e}"
                    );
                }
            }
        }

        None
    }

    /// Solid-color stand-in written when no account can serve the request.
    fn write_placeholder(&self, slide_number: u32) -> bool {
        let path = self.image_path(slide_number);
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, PLACEHOLDER_COLOR);

        match img.save(&path) {
            Ok(()) => true,
            Err(e) => {
                warn!("could not write placeholder {}: {e}", path.display());
                false
            }
        }
    }
}

/// Load `slide_NN.txt` prompt files from a directory, ordered by slide
/// number. A missing directory yields an empty list.
pub fn load_prompts(prompt_dir: &Path) -> std::io::Result<Vec<SlidePrompt>> {
    let mut prompts = Vec::new();

    let entries = match fs::read_dir(prompt_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(prompts),
        Err(e) => return Err(e),
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let is_txt = path.extension().and_then(|e| e.to_str()) == Some("txt");

        if let Some(number) = stem.strip_prefix("slide_").and_then(|n| n.parse::<u32>().ok())
            && is_txt
        {
            let text = fs::read_to_string(&path)?.trim().to_string();
            prompts.push(SlidePrompt {
                slide_number: number,
                text,
            });
        }
    }

    prompts.sort_by_key(|p| p.slide_number);

    Ok(prompts)
}
