//! Seeded sampling of symbol sequences, targets and replacements.

use rand::{Rng, seq::SliceRandom as _};

use crate::{
    foundation::error::{SwapError, SwapResult},
    palette::{SymbolIdentity, UNIVERSE_SIZE},
    sequence::TargetMark,
};

/// Upper bound on identity draws while collecting one sequence.
pub const MAX_DRAW_ATTEMPTS: usize = 1000;

/// Inclusive bounds on sequence length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub fn new(min: usize, max: usize) -> SwapResult<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(self) -> SwapResult<()> {
        if self.min == 0 || self.max == 0 {
            return Err(SwapError::configuration(
                "sequence length bounds must be positive",
            ));
        }
        if self.min > self.max {
            return Err(SwapError::configuration(format!(
                "min_sequence_length ({}) exceeds max_sequence_length ({})",
                self.min, self.max
            )));
        }
        if self.max > UNIVERSE_SIZE {
            return Err(SwapError::configuration(format!(
                "max_sequence_length ({}) exceeds the {UNIVERSE_SIZE} distinct symbols available",
                self.max
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampledSequence {
    pub identities: Vec<SymbolIdentity>,
    pub target: TargetMark,
}

/// Draws a length, then that many distinct identities by rejection sampling, then a target
/// index. Identities keep their draw order.
pub fn sample_sequence<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: LengthBounds,
) -> SwapResult<SampledSequence> {
    bounds.validate()?;

    let len = rng.gen_range(bounds.min..=bounds.max);
    let mut identities: Vec<SymbolIdentity> = Vec::with_capacity(len);
    let mut attempts = 0usize;
    while identities.len() < len {
        if attempts >= MAX_DRAW_ATTEMPTS {
            return Err(SwapError::invariant(format!(
                "collected only {} of {len} distinct symbols after {MAX_DRAW_ATTEMPTS} draws",
                identities.len()
            )));
        }
        attempts += 1;

        let Some(candidate) = SymbolIdentity::from_ordinal(rng.gen_range(0..UNIVERSE_SIZE)) else {
            continue;
        };
        if !identities.contains(&candidate) {
            identities.push(candidate);
        }
    }

    let target = TargetMark(rng.gen_range(0..len));
    Ok(SampledSequence { identities, target })
}

/// Uniform draw from the identities not already in `existing`.
pub fn select_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    existing: &[SymbolIdentity],
) -> SwapResult<SymbolIdentity> {
    let candidates: Vec<SymbolIdentity> = SymbolIdentity::universe()
        .filter(|id| !existing.contains(id))
        .collect();

    candidates.choose(rng).copied().ok_or_else(|| {
        SwapError::invariant(format!(
            "no replacement symbol left: all {UNIVERSE_SIZE} identities are in use"
        ))
    })
}
