//! errors reported to the producers of caves, replays and configurations
use crate::cave::ObjectId;
use crate::element::Element;

/// A cave template or one of its objects is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum TemplateError {
    #[error("level {0} is out of range, levels are 1 to 5")]
    InvalidLevel(u8),
    #[error("cave size {width}x{height} is invalid")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("map is {actual_width}x{actual_height}, cave is {width}x{height}")]
    MapSizeMismatch {
        width: i32,
        height: i32,
        actual_width: i32,
        actual_height: i32,
    },
    #[error("invalid {object} object: {reason}")]
    InvalidObject {
        object: &'static str,
        reason: &'static str,
    },
    #[error("no object with id {0:?}")]
    UnknownObject(ObjectId),
    #[error("index {index} is out of range for {len} objects")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid character {0:?} in map")]
    InvalidMapCharacter(char),
    #[error("{param} cannot be {value}")]
    InvalidParameter { param: &'static str, value: i32 },
    #[error("element {0:?} has an out of range state")]
    InvalidElement(Element),
}

/// A template could not be turned in to a playable instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum BakeError {
    #[error("cave has zero width or height")]
    EmptyCave,
    #[error("cave has no inbox and the engine requires one")]
    NoInbox,
    #[error("caveset has no caves to play")]
    NoCaves,
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// A replay could not be played back or does not match what it claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReplayError {
    #[error("cave cannot be played: {0}")]
    Bake(#[from] BakeError),
    #[error("replay was recorded on a cave with checksum {recorded:08x}, this one has {actual:08x}")]
    ChecksumMismatch { recorded: u32, actual: u32 },
    #[error("replay claims score {recorded}, playing it gives {actual}")]
    ScoreMismatch { recorded: u32, actual: u32 },
    #[error("replay claims success {recorded}, playing it gives {actual}")]
    OutcomeMismatch { recorded: bool, actual: bool },
}

/// An engine configuration could not be read.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("invalid engine configuration: {0}")]
    Json(#[from] serde_json::Error),
}
