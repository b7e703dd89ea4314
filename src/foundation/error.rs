pub type SwapResult<T> = Result<T, SwapError>;

#[derive(thiserror::Error, Debug)]
pub enum SwapError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SwapError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            SwapError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            SwapError::invariant("x")
                .to_string()
                .contains("invariant violation:")
        );
        assert!(SwapError::render("x").to_string().contains("render error:"));
        assert!(SwapError::encode("x").to_string().contains("encode error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = SwapError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
        assert!(!err.is_configuration());
    }
}
