//! Generator for symbol-substitution visual reasoning tasks.
//!
//! A task is a horizontal row of distinct `(shape, color)` symbols with one of them framed by
//! a border, an instruction naming the exact replacement symbol, the row after substitution,
//! and optionally a cross-fade animation between the two states.
//!
//! - Sample a task with [`TaskGenerator::generate`]
//! - Read its frames and [`TaskDescription`]
//! - Write datasets with [`BatchRunner`]
#![forbid(unsafe_code)]

mod foundation;

pub mod anim;
pub mod batch;
pub mod config;
pub mod encode_ffmpeg;
pub mod layout;
pub mod output;
pub mod palette;
pub mod prompt;
pub mod render;
pub mod sample;
pub mod sequence;
pub mod task;

pub use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgb8};
pub use crate::foundation::error::{SwapError, SwapResult};

pub use crate::anim::{AnimationSpec, FrameKind, Substitution};
pub use crate::batch::{BatchReport, BatchRunner, CancelFlag, TaskFailure, derive_task_seed};
pub use crate::config::GeneratorConfig;
pub use crate::layout::RowLayout;
pub use crate::output::TaskWriter;
pub use crate::palette::{Color, Shape, SymbolIdentity, UNIVERSE_SIZE};
pub use crate::prompt::PromptStyle;
pub use crate::render::{DrawOp, FramePlan, FrameRGBA, FrameRenderer, RenderSettings};
pub use crate::sample::LengthBounds;
pub use crate::sequence::{PositionedSymbol, Sequence, TargetMark};
pub use crate::task::{Task, TaskDescription, TaskGenerator};
