use std::collections::HashSet;

use crate::{
    foundation::core::Point,
    foundation::error::{SwapError, SwapResult},
    layout::RowLayout,
    palette::SymbolIdentity,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PositionedSymbol {
    pub index: usize,
    pub identity: SymbolIdentity,
    pub center: Point,
}

/// The symbol selected for substitution.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TargetMark(pub usize);

/// Ordered row of pairwise-distinct symbols, placed left to right in index order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Sequence {
    symbols: Vec<PositionedSymbol>,
}

impl Sequence {
    pub fn place(identities: &[SymbolIdentity], layout: &RowLayout) -> SwapResult<Self> {
        let mut seen = HashSet::with_capacity(identities.len());
        for id in identities {
            if !seen.insert(*id) {
                return Err(SwapError::invariant(format!(
                    "duplicate symbol '{id}' in sequence"
                )));
            }
        }

        let symbols = identities
            .iter()
            .zip(layout.centers(identities.len()))
            .enumerate()
            .map(|(index, (&identity, center))| PositionedSymbol {
                index,
                identity,
                center,
            })
            .collect();
        Ok(Self { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[PositionedSymbol] {
        &self.symbols
    }

    pub fn get(&self, index: usize) -> Option<&PositionedSymbol> {
        self.symbols.get(index)
    }

    pub fn identities(&self) -> Vec<SymbolIdentity> {
        self.symbols.iter().map(|s| s.identity).collect()
    }

    pub fn contains(&self, identity: SymbolIdentity) -> bool {
        self.symbols.iter().any(|s| s.identity == identity)
    }

    pub fn check_target(&self, target: TargetMark) -> SwapResult<&PositionedSymbol> {
        self.symbols.get(target.0).ok_or_else(|| {
            SwapError::invariant(format!(
                "target index {} out of range for sequence of length {}",
                target.0,
                self.len()
            ))
        })
    }

    /// Returns a new sequence with the symbol at `target` swapped for `replacement`; every
    /// other entry, and the target's centre, is carried over unchanged.
    pub fn substitute(&self, target: TargetMark, replacement: SymbolIdentity) -> SwapResult<Self> {
        self.check_target(target)?;
        if self.contains(replacement) {
            return Err(SwapError::invariant(format!(
                "replacement '{replacement}' already present in sequence"
            )));
        }

        let symbols = self
            .symbols
            .iter()
            .map(|s| {
                if s.index == target.0 {
                    PositionedSymbol {
                        identity: replacement,
                        ..*s
                    }
                } else {
                    *s
                }
            })
            .collect();
        Ok(Self { symbols })
    }
}
