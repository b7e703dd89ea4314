pub mod cpu;
pub mod geometry;

use crate::{
    config::GeneratorConfig,
    foundation::core::{Canvas, Point, Rgb8},
    foundation::error::{SwapError, SwapResult},
    palette::SymbolIdentity,
    sequence::{Sequence, TargetMark},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn to_rgba_image(&self) -> SwapResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            SwapError::render(format!(
                "frame buffer of {} bytes does not match {}x{}",
                self.data.len(),
                self.width,
                self.height
            ))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderStyle {
    pub width: f64,
    pub color: Rgb8,
    pub padding: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    pub canvas: Canvas,
    pub background: Rgb8,
    pub symbol_size: f64,
    pub outline_width: f64,
    pub border: BorderStyle,
}

impl RenderSettings {
    pub fn from_config(cfg: &GeneratorConfig) -> Self {
        Self {
            canvas: cfg.image_size,
            background: cfg.background,
            symbol_size: f64::from(cfg.symbol_size),
            outline_width: cfg.outline_width,
            border: BorderStyle {
                width: f64::from(cfg.target_border_width),
                color: cfg.target_border_color,
                padding: f64::from(cfg.target_border_padding),
            },
        }
    }

    /// Distance from a symbol centre to the outer edge of its target border.
    pub fn border_half_extent(&self) -> f64 {
        self.symbol_size / 2.0 + self.border.padding
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    Symbol {
        identity: SymbolIdentity,
        center: Point,
        opacity: f32,
    },
    Border {
        center: Point,
        opacity: f32,
    },
}

/// Ordered draw list over a uniform background.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FramePlan {
    pub ops: Vec<DrawOp>,
}

impl FramePlan {
    /// All symbols in index order, then the border (if any) last.
    pub fn still(seq: &Sequence, marked: Option<TargetMark>) -> SwapResult<Self> {
        let mut ops: Vec<DrawOp> = seq
            .symbols()
            .iter()
            .map(|s| DrawOp::Symbol {
                identity: s.identity,
                center: s.center,
                opacity: 1.0,
            })
            .collect();

        if let Some(mark) = marked {
            let target = seq.check_target(mark)?;
            ops.push(DrawOp::Border {
                center: target.center,
                opacity: 1.0,
            });
        }
        Ok(Self { ops })
    }

    /// Mid-transition frame: the target slot shows `old` at `1 - alpha` and `replacement`
    /// at `alpha`, with the border fading out over it.
    pub fn crossfade(
        seq: &Sequence,
        target: TargetMark,
        replacement: SymbolIdentity,
        alpha: f64,
    ) -> SwapResult<Self> {
        let marked = seq.check_target(target)?;
        let alpha = alpha.clamp(0.0, 1.0) as f32;

        let mut ops = Vec::with_capacity(seq.len() + 2);
        for s in seq.symbols() {
            if s.index != target.0 {
                ops.push(DrawOp::Symbol {
                    identity: s.identity,
                    center: s.center,
                    opacity: 1.0,
                });
                continue;
            }
            ops.push(DrawOp::Symbol {
                identity: s.identity,
                center: s.center,
                opacity: 1.0 - alpha,
            });
            ops.push(DrawOp::Symbol {
                identity: replacement,
                center: s.center,
                opacity: alpha,
            });
        }
        ops.push(DrawOp::Border {
            center: marked.center,
            opacity: 1.0 - alpha,
        });
        Ok(Self { ops })
    }

    pub fn border_opacity(&self) -> f32 {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Border { opacity, .. } => Some(*opacity),
                DrawOp::Symbol { .. } => None,
            })
            .fold(0.0, f32::max)
    }

    pub fn border_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Border { opacity, .. } if *opacity > 0.0))
            .count()
    }
}

/// Turns plans into pixels for one fixed set of [`RenderSettings`].
pub struct FrameRenderer {
    settings: RenderSettings,
    backend: cpu::CpuRasterizer,
}

impl FrameRenderer {
    pub fn new(settings: RenderSettings) -> SwapResult<Self> {
        settings.canvas.validate()?;
        if settings.symbol_size <= 0.0 {
            return Err(SwapError::configuration("symbol_size must be positive"));
        }
        Ok(Self {
            backend: cpu::CpuRasterizer::new(settings)?,
            settings,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn render(&self, seq: &Sequence, marked: Option<TargetMark>) -> SwapResult<FrameRGBA> {
        self.render_plan(&FramePlan::still(seq, marked)?)
    }

    pub fn render_crossfade(
        &self,
        seq: &Sequence,
        target: TargetMark,
        replacement: SymbolIdentity,
        alpha: f64,
    ) -> SwapResult<FrameRGBA> {
        self.render_plan(&FramePlan::crossfade(seq, target, replacement, alpha)?)
    }

    pub fn render_plan(&self, plan: &FramePlan) -> SwapResult<FrameRGBA> {
        self.backend.rasterize(plan)
    }
}
