use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

/// Phase of the host's fishing event handler.
///
/// Raw values are the bytes the client stores in the handler's state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FishingState {
    #[default]
    None,
    PoleOut,
    PullPoleIn,
    Quit,
    PoleReady,
    Bite,
    Reeling,
    Waiting,
    Waiting2,
    Other(u8),
}

impl FishingState {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => FishingState::None,
            1 => FishingState::PoleOut,
            2 => FishingState::PullPoleIn,
            3 => FishingState::Quit,
            4 => FishingState::PoleReady,
            5 => FishingState::Bite,
            6 => FishingState::Reeling,
            8 => FishingState::Waiting,
            9 => FishingState::Waiting2,
            other => FishingState::Other(other),
        }
    }

    pub fn is_bite(self) -> bool {
        self == FishingState::Bite
    }
}

impl std::fmt::Display for FishingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FishingState::Other(value) => write!(f, "Other({:#04X})", value),
            state => write!(f, "{:?}", state),
        }
    }
}

/// Strength of a bite as stored in the bite type byte.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum BiteIntensity {
    #[default]
    Unknown = 0,
    Weak = 36,
    Strong = 37,
    Legendary = 38,
    None = 255,
}

impl BiteIntensity {
    /// Decode a raw byte. Unrecognized values are `Unknown`.
    pub fn from_u8(value: u8) -> Self {
        Self::from_repr(value).unwrap_or(BiteIntensity::Unknown)
    }

    /// Weak, Strong and Legendary bites produce alerts; Unknown and None do not.
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            BiteIntensity::Weak | BiteIntensity::Strong | BiteIntensity::Legendary
        )
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for BiteIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
