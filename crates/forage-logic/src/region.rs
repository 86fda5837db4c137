//! Region identity and numeric wire codes.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// One of the three contested regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    A,
    B,
    C,
}

impl Region {
    /// All regions, in code order.
    pub const ALL: [Region; 3] = [Region::A, Region::B, Region::C];

    /// Stable numeric code used by referees: 1/2/3.
    pub fn code(self) -> i32 {
        match self {
            Region::A => 1,
            Region::B => 2,
            Region::C => 3,
        }
    }

    /// Decode a referee code. Anything outside 1..=3 is `None` — referees
    /// send a non-region code before the first round of a match.
    pub fn from_code(code: i32) -> Option<Region> {
        match code {
            1 => Some(Region::A),
            2 => Some(Region::B),
            3 => Some(Region::C),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Region::A => 0,
            Region::B => 1,
            Region::C => 2,
        }
    }
}

impl TryFrom<i32> for Region {
    type Error = AgentError;

    /// Strict conversion for callers that treat an out-of-range code as a
    /// hard failure rather than an absent move.
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Region::from_code(code).ok_or(AgentError::InvalidRegionCode(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::from_code(region.code()), Some(region));
        }
        assert_eq!(Region::A.code(), 1);
        assert_eq!(Region::B.code(), 2);
        assert_eq!(Region::C.code(), 3);
    }

    #[test]
    fn test_from_code_out_of_range() {
        for code in [-1, 0, 4, 100] {
            assert_eq!(Region::from_code(code), None);
        }
    }

    #[test]
    fn test_try_from_surfaces_invalid_code() {
        assert_eq!(Region::try_from(2), Ok(Region::B));
        assert_eq!(Region::try_from(7), Err(AgentError::InvalidRegionCode(7)));
    }
}
