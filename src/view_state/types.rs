//! Core view-state newtypes

/// Estimated height of one rendered line, in scroll units.
///
/// The terminal renders every line in exactly one row, so the default is 1.
/// Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineHeight(u32);

/// Error returned when attempting to create a LineHeight of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("LineHeight must be >= 1 (got {0})")]
pub struct InvalidLineHeight(pub u32);

impl LineHeight {
    /// One scroll unit per line.
    pub const ONE: Self = Self(1);

    /// Smart constructor that validates line height is >= 1.
    pub fn new(height: u32) -> Result<Self, InvalidLineHeight> {
        if height == 0 {
            Err(InvalidLineHeight(height))
        } else {
            Ok(Self(height))
        }
    }

    /// Get the raw value.
    pub fn get(&self) -> u64 {
        u64::from(self.0)
    }
}

impl Default for LineHeight {
    fn default() -> Self {
        Self::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_height_rejects_zero() {
        assert_eq!(LineHeight::new(0), Err(InvalidLineHeight(0)));
    }

    #[test]
    fn line_height_accepts_positive() {
        assert_eq!(LineHeight::new(20).unwrap().get(), 20);
    }

    #[test]
    fn line_height_default_is_one() {
        assert_eq!(LineHeight::default(), LineHeight::ONE);
    }
}
