//! Processing options shared by the processor and settings crates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a perimeter block that is still open when the input ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnterminatedBlockPolicy {
    /// Emit the buffered lines unchanged
    PassThrough,
    /// Discard the buffered lines
    Drop,
    /// Reverse the block as if a role change had closed it
    Reverse,
}

impl Default for UnterminatedBlockPolicy {
    fn default() -> Self {
        Self::PassThrough
    }
}

impl fmt::Display for UnterminatedBlockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassThrough => write!(f, "pass-through"),
            Self::Drop => write!(f, "drop"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

impl FromStr for UnterminatedBlockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass-through" | "passthrough" | "keep" => Ok(Self::PassThrough),
            "drop" | "discard" => Ok(Self::Drop),
            "reverse" => Ok(Self::Reverse),
            _ => Err(format!("Unknown unterminated block policy: {}", s)),
        }
    }
}

/// Options controlling how a stream is segmented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    /// Handling of a perimeter block still open at end of input
    pub unterminated_block: UnterminatedBlockPolicy,
    /// Also fold lines outside `; printing object` regions into the machine state.
    ///
    /// Slicers usually emit layer changes (`G1 Z..`) between objects, so without
    /// this the Z restored after a reversed block is the last Z seen inside an object.
    pub track_outside_objects: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_round_trips_through_display() {
        for policy in [
            UnterminatedBlockPolicy::PassThrough,
            UnterminatedBlockPolicy::Drop,
            UnterminatedBlockPolicy::Reverse,
        ] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }

    #[test]
    fn test_policy_aliases() {
        assert_eq!(
            "Keep".parse::<UnterminatedBlockPolicy>(),
            Ok(UnterminatedBlockPolicy::PassThrough)
        );
        assert!("flush".parse::<UnterminatedBlockPolicy>().is_err());
    }

    #[test]
    fn test_default_options() {
        let options = ProcessingOptions::default();
        assert_eq!(options.unterminated_block, UnterminatedBlockPolicy::PassThrough);
        assert!(!options.track_outside_objects);
    }

    #[test]
    fn test_default_keeps_data() {
        assert_eq!(
            UnterminatedBlockPolicy::default(),
            UnterminatedBlockPolicy::PassThrough
        );
    }
}
