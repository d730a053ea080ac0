// Thu Oct 15 2026 - Alex

use crate::structure::StructureError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Alignment {
    value: usize,
}

impl Alignment {
    pub const BYTE: Alignment = Alignment { value: 1 };

    pub fn new(value: usize) -> Result<Self, StructureError> {
        if value == 0 || !value.is_power_of_two() {
            return Err(StructureError::InvalidAlignment(value));
        }
        Ok(Self { value })
    }

    pub fn as_usize(&self) -> usize {
        self.value
    }

    pub fn as_u64(&self) -> u64 {
        self.value as u64
    }

    /// Rounds `offset` up to the next multiple of this alignment, or `None`
    /// past `u64::MAX`.
    pub fn align(&self, offset: u64) -> Option<u64> {
        let mask = self.as_u64() - 1;
        offset.checked_add(mask).map(|end| end & !mask)
    }

    pub fn padding_for(&self, offset: u64) -> Option<u64> {
        self.align(offset).map(|aligned| aligned - offset)
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::BYTE
    }
}

impl TryFrom<usize> for Alignment {
    type Error = StructureError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alignment> for usize {
    fn from(alignment: Alignment) -> Self {
        alignment.value
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_power_of_two() {
        assert_eq!(Alignment::new(0), Err(StructureError::InvalidAlignment(0)));
        assert_eq!(Alignment::new(12), Err(StructureError::InvalidAlignment(12)));
        assert!(Alignment::new(16).is_ok());
    }

    #[test]
    fn test_align_and_padding() {
        let four = Alignment::new(4).unwrap();
        assert_eq!(four.align(0), Some(0));
        assert_eq!(four.align(129), Some(132));
        assert_eq!(four.align(132), Some(132));
        assert_eq!(four.padding_for(489), Some(3));
        assert_eq!(four.padding_for(172), Some(0));
    }

    #[test]
    fn test_align_near_u64_max() {
        let eight = Alignment::new(8).unwrap();
        assert_eq!(eight.align(u64::MAX - 7), Some(u64::MAX - 7));
        assert_eq!(eight.align(u64::MAX - 6), None);
        assert_eq!(Alignment::BYTE.align(u64::MAX), Some(u64::MAX));
    }
}
