use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::{
    config::GeneratorConfig,
    encode_ffmpeg::{self, default_mp4_config},
    foundation::core::Rgb8,
    foundation::error::SwapResult,
    prompt::{self, PromptStyle},
    render::FrameRGBA,
    sequence::PositionedSymbol,
    task::{Task, TaskDescription},
};

pub const FIRST_FRAME_FILE: &str = "first_frame.png";
pub const FINAL_FRAME_FILE: &str = "final_frame.png";
pub const PROMPT_FILE: &str = "prompt.txt";
pub const METADATA_FILE: &str = "metadata.json";
pub const VIDEO_FILE: &str = "ground_truth.mp4";

pub fn task_id(domain: &str, index: u64) -> String {
    format!("{domain}_{index:08}")
}

#[derive(serde::Serialize)]
struct TaskMetadata<'a> {
    task_id: &'a str,
    seed: u64,
    description: TaskDescription,
    initial_sequence: &'a [PositionedSymbol],
    final_sequence: &'a [PositionedSymbol],
    video: Option<&'a str>,
}

/// Writes finished tasks to `<output_dir>/<domain>_task/<task_id>/`.
///
/// Each task is staged in a hidden sibling directory and renamed into place once every
/// artifact is on disk, so a failed task leaves nothing behind.
pub struct TaskWriter {
    root: PathBuf,
    prompt_style: PromptStyle,
    video: Option<VideoSettings>,
}

#[derive(Clone, Debug)]
struct VideoSettings {
    program: PathBuf,
    fps: u32,
    background: Rgb8,
    timeout: Duration,
}

impl TaskWriter {
    pub fn new(cfg: &GeneratorConfig) -> Self {
        let video = if cfg.generate_videos {
            if encode_ffmpeg::is_ffmpeg_available(&cfg.ffmpeg_path) {
                Some(VideoSettings {
                    program: cfg.ffmpeg_path.clone(),
                    fps: cfg.video_fps,
                    background: cfg.background,
                    timeout: Duration::from_secs(cfg.encode_timeout_secs),
                })
            } else {
                tracing::warn!(
                    ffmpeg = %cfg.ffmpeg_path.display(),
                    "ffmpeg not available; ground-truth videos will be skipped"
                );
                None
            }
        } else {
            None
        };

        Self {
            root: cfg.task_root(),
            prompt_style: PromptStyle::Default,
            video,
        }
    }

    pub fn with_prompt_style(mut self, style: PromptStyle) -> Self {
        self.prompt_style = style;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn writes_videos(&self) -> bool {
        self.video.is_some()
    }

    pub fn task_dir(&self, task: &Task) -> PathBuf {
        self.root.join(task.id())
    }

    fn staging_dir(&self, task: &Task) -> PathBuf {
        self.root.join(format!(".{}.partial", task.id()))
    }

    /// Writes every artifact of `task` and returns its directory. An existing directory for
    /// the same task id is replaced.
    pub fn write(&self, task: &Task) -> SwapResult<PathBuf> {
        let dir = self.task_dir(task);
        let staging = self.staging_dir(task);
        if staging.exists() {
            std::fs::remove_dir_all(&staging)
                .with_context(|| format!("clear stale staging dir '{}'", staging.display()))?;
        }
        std::fs::create_dir_all(&staging)
            .with_context(|| format!("create task dir '{}'", staging.display()))?;

        if let Err(err) = self
            .write_artifacts(&staging, task)
            .and_then(|()| publish(&staging, &dir))
        {
            if let Err(cleanup) = std::fs::remove_dir_all(&staging) {
                tracing::warn!(dir = %staging.display(), %cleanup, "failed to remove staging dir");
            }
            return Err(err);
        }

        tracing::info!(task = task.id(), dir = %dir.display(), "wrote task");
        Ok(dir)
    }

    fn write_artifacts(&self, dir: &Path, task: &Task) -> SwapResult<()> {
        write_png(&dir.join(FIRST_FRAME_FILE), task.initial_frame())?;
        write_png(&dir.join(FINAL_FRAME_FILE), task.final_frame())?;

        let desc = task.description();
        let text = prompt::compose(&desc, self.prompt_style, task.seed() as usize);
        let prompt_path = dir.join(PROMPT_FILE);
        std::fs::write(&prompt_path, text)
            .with_context(|| format!("write prompt '{}'", prompt_path.display()))?;

        let video = match (&self.video, task.frames()) {
            (Some(settings), Some(frames)) if !frames.is_empty() => {
                let mut cfg = default_mp4_config(
                    dir.join(VIDEO_FILE),
                    task.initial_frame().width,
                    task.initial_frame().height,
                    settings.fps,
                );
                cfg.program = settings.program.clone();
                encode_ffmpeg::encode_frames(cfg, frames, settings.background, settings.timeout)?;
                Some(VIDEO_FILE)
            }
            _ => None,
        };

        let meta = TaskMetadata {
            task_id: task.id(),
            seed: task.seed(),
            description: desc,
            initial_sequence: task.sequence().symbols(),
            final_sequence: task.final_sequence().symbols(),
            video,
        };
        let meta_path = dir.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(&meta).context("serialize task metadata")?;
        std::fs::write(&meta_path, json)
            .with_context(|| format!("write metadata '{}'", meta_path.display()))?;
        Ok(())
    }
}

/// Moves a fully written staging directory to `dir`, replacing a previous run's output.
fn publish(staging: &Path, dir: &Path) -> SwapResult<()> {
    match std::fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(dir)
            .with_context(|| format!("replace task dir '{}'", dir.display()))?,
        Ok(_) => {
            return Err(anyhow::anyhow!(
                "task path '{}' exists and is not a directory",
                dir.display()
            )
            .into());
        }
        Err(_) => {}
    }
    std::fs::rename(staging, dir)
        .with_context(|| format!("move '{}' to '{}'", staging.display(), dir.display()))?;
    Ok(())
}

pub fn write_png(path: &Path, frame: &FrameRGBA) -> SwapResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
