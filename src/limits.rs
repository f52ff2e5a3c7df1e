use crate::{ErrorCode, GdvError};

/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parse-time resource limits.
///
/// The parser is recursive, so bounding nesting keeps hostile input from
/// exhausting the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum container nesting depth. The top-level container is depth 1.
    pub max_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseLimits {
    /// Limits with the given maximum depth.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// No effective depth limit. Only use with trusted input.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    /// Check that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` if `max_depth` is 0.
    pub fn validate(&self) -> Result<(), GdvError> {
        if self.max_depth == 0 {
            return Err(GdvError::new(
                ErrorCode::InvalidOptions,
                "max_depth must be at least 1",
            ));
        }
        Ok(())
    }
}
