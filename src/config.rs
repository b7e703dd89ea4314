use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    anim::AnimationSpec,
    foundation::core::{Canvas, Rgb8},
    foundation::error::{SwapError, SwapResult},
    layout::RowLayout,
    sample::LengthBounds,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub domain: String,
    pub num_samples: u32,
    pub image_size: Canvas,
    pub symbol_size: u32,
    pub min_sequence_length: usize,
    pub max_sequence_length: usize,
    pub symbol_spacing: u32,
    pub target_border_width: u32,
    pub target_border_color: Rgb8,
    pub target_border_padding: u32,
    pub background: Rgb8,
    /// Black outline drawn around every symbol; `0` disables it.
    pub outline_width: f64,
    pub generate_videos: bool,
    pub video_fps: u32,
    pub hold_frames: u32,
    pub transform_frames: u32,
    /// Base seed for the run. `None` draws one from the OS.
    pub random_seed: Option<u64>,
    pub output_dir: PathBuf,
    /// Wall-clock budget for encoding one task's video.
    pub encode_timeout_secs: u64,
    pub ffmpeg_path: PathBuf,
    pub threads: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            domain: "symbol_worlds_symbol_editing".to_string(),
            num_samples: 10,
            image_size: Canvas {
                width: 512,
                height: 512,
            },
            symbol_size: 60,
            min_sequence_length: 3,
            max_sequence_length: 7,
            symbol_spacing: 80,
            target_border_width: 4,
            target_border_color: [255, 0, 0],
            target_border_padding: 8,
            background: [255, 255, 255],
            outline_width: 2.0,
            generate_videos: true,
            video_fps: 15,
            hold_frames: 8,
            transform_frames: 30,
            random_seed: None,
            output_dir: PathBuf::from("data/questions"),
            encode_timeout_secs: 120,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            threads: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_path(path: &Path) -> SwapResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            SwapError::configuration(format!("invalid config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SwapResult<()> {
        self.length_bounds().validate()?;
        self.image_size.validate()?;

        if self.symbol_size == 0 {
            return Err(SwapError::configuration("symbol_size must be positive"));
        }
        if self.target_border_width == 0 {
            return Err(SwapError::configuration(
                "target_border_width must be positive",
            ));
        }
        if !self.outline_width.is_finite() || self.outline_width < 0.0 {
            return Err(SwapError::configuration(
                "outline_width must be a finite, non-negative number",
            ));
        }
        let min_spacing = self.symbol_size + self.target_border_padding;
        if self.symbol_spacing < min_spacing {
            return Err(SwapError::configuration(format!(
                "symbol_spacing ({}) must be at least symbol_size + target_border_padding ({min_spacing})",
                self.symbol_spacing
            )));
        }
        if self.generate_videos && self.video_fps == 0 {
            return Err(SwapError::configuration(
                "video_fps must be positive when videos are enabled",
            ));
        }
        if self.generate_videos && self.encode_timeout_secs == 0 {
            return Err(SwapError::configuration(
                "encode_timeout_secs must be positive when videos are enabled",
            ));
        }

        let margin = f64::from(self.symbol_size) / 2.0 + f64::from(self.target_border_padding);
        if !self.layout().fits(self.max_sequence_length, margin) {
            tracing::warn!(
                max_len = self.max_sequence_length,
                width = self.image_size.width,
                spacing = self.symbol_spacing,
                "longest rows extend past the canvas and will be clipped"
            );
        }
        Ok(())
    }

    pub fn length_bounds(&self) -> LengthBounds {
        LengthBounds {
            min: self.min_sequence_length,
            max: self.max_sequence_length,
        }
    }

    pub fn layout(&self) -> RowLayout {
        RowLayout::new(self.image_size, self.symbol_spacing)
    }

    pub fn animation(&self) -> AnimationSpec {
        AnimationSpec {
            hold_frames: self.hold_frames,
            transform_frames: self.transform_frames,
        }
    }

    pub fn task_root(&self) -> PathBuf {
        self.output_dir.join(format!("{}_task", self.domain))
    }
}
