use core::fmt;

use crate::sim::SessionOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    DampingWithBandStrategy,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DampingWithBandStrategy => write!(
                f,
                "overshoot_damping only applies to the aim strategy; disable it or use strategy=aim"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, PartialEq)]
pub enum TapeError {
    TapeTooShort { actual: usize, min: usize },
    InvalidMagic { found: u32 },
    UnsupportedVersion { found: u8 },
    UnknownFlags { found: u8 },
    HeaderReservedNonZero,
    FooterReservedNonZero,
    TickCountOutOfRange { tick_count: u32, max_ticks: u32 },
    TapeLengthMismatch { expected: usize, actual: usize },
    ReservedPressBitsNonZero { tick: u32, byte: u8 },
    UnknownOutcome { found: u8 },
    CrcMismatch { stored: u32, computed: u32 },
    BossFlagMismatch { claimed: bool, computed: bool },
    TickCountMismatch { claimed: u32, computed: u32 },
    OutcomeMismatch { claimed: SessionOutcome, computed: SessionOutcome },
    TreasureMismatch { claimed: bool, computed: bool },
    DistanceMismatch { claimed: f32, computed: f32 },
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TapeTooShort { actual, min } => {
                write!(f, "tape too short: got {actual} bytes, need at least {min}")
            }
            Self::InvalidMagic { found } => write!(f, "invalid tape magic: 0x{found:08x}"),
            Self::UnsupportedVersion { found } => write!(f, "unsupported tape version: {found}"),
            Self::UnknownFlags { found } => write!(f, "unknown header flags: 0x{found:02x}"),
            Self::HeaderReservedNonZero => write!(f, "header reserved bytes are non-zero"),
            Self::FooterReservedNonZero => write!(f, "footer reserved bytes are non-zero"),
            Self::TickCountOutOfRange {
                tick_count,
                max_ticks,
            } => write!(
                f,
                "tick count out of range: {tick_count} (allowed 1..={max_ticks})"
            ),
            Self::TapeLengthMismatch { expected, actual } => write!(
                f,
                "tape length mismatch: expected {expected} bytes, got {actual}"
            ),
            Self::ReservedPressBitsNonZero { tick, byte } => write!(
                f,
                "press byte reserved bits set at tick {tick}: 0x{byte:02x}"
            ),
            Self::UnknownOutcome { found } => write!(f, "unknown outcome code: {found}"),
            Self::CrcMismatch { stored, computed } => write!(
                f,
                "crc mismatch: stored=0x{stored:08x}, computed=0x{computed:08x}"
            ),
            Self::BossFlagMismatch { claimed, computed } => write!(
                f,
                "boss flag mismatch: claimed={claimed}, computed={computed}"
            ),
            Self::TickCountMismatch { claimed, computed } => {
                write!(f, "tick-count mismatch: claimed={claimed}, computed={computed}")
            }
            Self::OutcomeMismatch { claimed, computed } => {
                write!(f, "outcome mismatch: claimed={claimed}, computed={computed}")
            }
            Self::TreasureMismatch { claimed, computed } => write!(
                f,
                "treasure mismatch: claimed={claimed}, computed={computed}"
            ),
            Self::DistanceMismatch { claimed, computed } => write!(
                f,
                "final distance mismatch: claimed={claimed}, computed={computed}"
            ),
        }
    }
}

impl std::error::Error for TapeError {}
