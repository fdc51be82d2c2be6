//! Transport equipment kinds.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// The equipment a transport request moves between departments.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransportKind {
    #[default]
    Stretcher,
    Wheelchair,
    Bed,
}

impl TransportKind {
    /// All kinds, for uniform random selection by the simulator.
    pub const ALL: [TransportKind; 3] =
        [TransportKind::Stretcher, TransportKind::Wheelchair, TransportKind::Bed];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Stretcher => "stretcher",
            TransportKind::Wheelchair => "wheelchair",
            TransportKind::Bed => "bed",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stretcher" => Ok(TransportKind::Stretcher),
            "wheelchair" => Ok(TransportKind::Wheelchair),
            "bed" => Ok(TransportKind::Bed),
            other => Err(CoreError::Parse(format!("unknown transport kind: {other:?}"))),
        }
    }
}
