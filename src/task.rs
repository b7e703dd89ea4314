use rand::{SeedableRng as _, rngs::StdRng};

use crate::{
    anim::{self, Substitution},
    config::GeneratorConfig,
    foundation::error::SwapResult,
    palette::SymbolIdentity,
    render::{FrameRGBA, FrameRenderer, RenderSettings},
    sample::{SampledSequence, sample_sequence, select_replacement},
    sequence::{Sequence, TargetMark},
};

/// What the prompt writer needs to know about a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TaskDescription {
    pub target_index: usize,
    pub target_identity: SymbolIdentity,
    pub replacement_identity: SymbolIdentity,
    pub sequence_length: usize,
}

/// One fully assembled task. Read-only once built.
#[derive(Clone, Debug)]
pub struct Task {
    id: String,
    seed: u64,
    sequence: Sequence,
    target: TargetMark,
    target_identity: SymbolIdentity,
    replacement: SymbolIdentity,
    final_sequence: Sequence,
    initial_frame: FrameRGBA,
    final_frame: FrameRGBA,
    frames: Option<Vec<FrameRGBA>>,
}

impl Task {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn target(&self) -> TargetMark {
        self.target
    }

    pub fn replacement(&self) -> SymbolIdentity {
        self.replacement
    }

    pub fn final_sequence(&self) -> &Sequence {
        &self.final_sequence
    }

    pub fn initial_frame(&self) -> &FrameRGBA {
        &self.initial_frame
    }

    pub fn final_frame(&self) -> &FrameRGBA {
        &self.final_frame
    }

    pub fn frames(&self) -> Option<&[FrameRGBA]> {
        self.frames.as_deref()
    }

    pub fn description(&self) -> TaskDescription {
        TaskDescription {
            target_index: self.target.0,
            target_identity: self.target_identity,
            replacement_identity: self.replacement,
            sequence_length: self.sequence.len(),
        }
    }
}

pub struct TaskGenerator {
    config: GeneratorConfig,
    renderer: FrameRenderer,
}

impl TaskGenerator {
    pub fn new(config: GeneratorConfig) -> SwapResult<Self> {
        config.validate()?;
        let renderer = FrameRenderer::new(RenderSettings::from_config(&config))?;
        Ok(Self { config, renderer })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// Samples and renders one task from `seed`. Same config and seed give identical tasks.
    #[tracing::instrument(skip(self))]
    pub fn generate(&self, task_id: &str, seed: u64) -> SwapResult<Task> {
        let mut rng = StdRng::seed_from_u64(seed);
        let SampledSequence { identities, target } =
            sample_sequence(&mut rng, self.config.length_bounds())?;
        let replacement = select_replacement(&mut rng, &identities)?;

        tracing::debug!(
            len = identities.len(),
            target = target.0,
            %replacement,
            "sampled task"
        );

        self.assemble(task_id, seed, &identities, target, replacement)
    }

    /// Builds a task from explicit parts: places the row, applies the substitution and
    /// renders stills plus (when enabled) the animation.
    pub fn assemble(
        &self,
        task_id: &str,
        seed: u64,
        identities: &[SymbolIdentity],
        target: TargetMark,
        replacement: SymbolIdentity,
    ) -> SwapResult<Task> {
        let sequence = Sequence::place(identities, &self.config.layout())?;
        let target_identity = sequence.check_target(target)?.identity;
        let final_sequence = sequence.substitute(target, replacement)?;

        let initial_frame = self.renderer.render(&sequence, Some(target))?;
        let final_frame = self.renderer.render(&final_sequence, None)?;

        let frames = if self.config.generate_videos {
            let sub = Substitution {
                sequence: &sequence,
                target,
                replacement,
                initial: &initial_frame,
                final_frame: &final_frame,
            };
            Some(anim::synthesize(
                &self.renderer,
                &sub,
                self.config.animation(),
            )?)
        } else {
            None
        };

        Ok(Task {
            id: task_id.to_string(),
            seed,
            sequence,
            target,
            target_identity,
            replacement,
            final_sequence,
            initial_frame,
            final_frame,
            frames,
        })
    }
}
