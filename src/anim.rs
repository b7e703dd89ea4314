//! Hold / cross-fade / hold animation between the initial and final frames.

use crate::{
    foundation::error::SwapResult,
    palette::SymbolIdentity,
    render::{FrameRGBA, FramePlan, FrameRenderer},
    sequence::{Sequence, TargetMark},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    pub hold_frames: u32,
    pub transform_frames: u32,
}

impl AnimationSpec {
    pub fn total_frames(self) -> usize {
        2 * self.hold_frames as usize + self.transform_frames as usize
    }

    /// Blend parameter for transform step `step` (0-based). The first step has already
    /// moved off the initial state; the last lands exactly on 1.
    pub fn alpha(self, step: u32) -> f64 {
        if self.transform_frames == 0 {
            return 1.0;
        }
        f64::from(step.saturating_add(1).min(self.transform_frames))
            / f64::from(self.transform_frames)
    }

    /// Frame-by-frame schedule, independent of the content being animated.
    pub fn schedule(self) -> Vec<FrameKind> {
        let mut out = Vec::with_capacity(self.total_frames());
        out.extend((0..self.hold_frames).map(|_| FrameKind::Initial));
        out.extend((0..self.transform_frames).map(|i| FrameKind::Transition {
            alpha: self.alpha(i),
        }));
        out.extend((0..self.hold_frames).map(|_| FrameKind::Final));
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameKind {
    Initial,
    Transition { alpha: f64 },
    Final,
}

/// Everything the animation needs about one task.
#[derive(Clone, Copy, Debug)]
pub struct Substitution<'a> {
    pub sequence: &'a Sequence,
    pub target: TargetMark,
    pub replacement: SymbolIdentity,
    pub initial: &'a FrameRGBA,
    pub final_frame: &'a FrameRGBA,
}

impl Substitution<'_> {
    pub fn plan_for(&self, kind: FrameKind) -> SwapResult<Option<FramePlan>> {
        match kind {
            FrameKind::Initial | FrameKind::Final => Ok(None),
            FrameKind::Transition { alpha } => Ok(Some(FramePlan::crossfade(
                self.sequence,
                self.target,
                self.replacement,
                alpha,
            )?)),
        }
    }
}

/// Materializes the full frame list. Hold frames reuse the already rendered stills.
#[tracing::instrument(skip_all, fields(frames = spec.total_frames()))]
pub fn synthesize(
    renderer: &FrameRenderer,
    sub: &Substitution<'_>,
    spec: AnimationSpec,
) -> SwapResult<Vec<FrameRGBA>> {
    let mut frames = Vec::with_capacity(spec.total_frames());
    for kind in spec.schedule() {
        let frame = match kind {
            FrameKind::Initial => sub.initial.clone(),
            FrameKind::Final => sub.final_frame.clone(),
            FrameKind::Transition { alpha } => renderer.render_crossfade(
                sub.sequence,
                sub.target,
                sub.replacement,
                alpha,
            )?,
        };
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_length_follows_frame_count_law() {
        for (hold, transform) in [(8, 30), (0, 5), (3, 0), (0, 0)] {
            let spec = AnimationSpec {
                hold_frames: hold,
                transform_frames: transform,
            };
            assert_eq!(spec.schedule().len(), (2 * hold + transform) as usize);
            assert_eq!(spec.total_frames(), (2 * hold + transform) as usize);
        }
    }

    #[test]
    fn alpha_rises_to_exactly_one() {
        let spec = AnimationSpec {
            hold_frames: 8,
            transform_frames: 30,
        };
        let alphas: Vec<f64> = (0..30).map(|i| spec.alpha(i)).collect();
        assert!(alphas[0] > 0.0);
        assert_eq!(alphas[29], 1.0);
        for w in alphas.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn schedule_phases_are_ordered() {
        let spec = AnimationSpec {
            hold_frames: 2,
            transform_frames: 3,
        };
        let s = spec.schedule();
        assert_eq!(s[0], FrameKind::Initial);
        assert_eq!(s[1], FrameKind::Initial);
        assert!(matches!(s[2], FrameKind::Transition { .. }));
        assert!(matches!(s[4], FrameKind::Transition { alpha } if alpha == 1.0));
        assert_eq!(s[5], FrameKind::Final);
        assert_eq!(s[6], FrameKind::Final);
    }
}
