use thiserror::Error;

/// Errors which stop the screen from starting up.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("could not load the {asset} overlay: {reason}")]
    AssetLoadFailure { asset: &'static str, reason: String },
}

/// Reasons a single inbound update is rejected.
///
/// These are never fatal, the update is logged and dropped while the previous display state stays.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MalformedUpdate {
    #[error("payload could not be decoded ({0})")]
    Decode(String),
    #[error("screen buffer of {actual} bytes is too short for {width}x{height}, need {required} bytes")]
    TruncatedScreen {
        width: u32,
        height: u32,
        required: usize,
        actual: usize,
    },
    #[error("screen buffer declared with an empty dimension {width}x{height}")]
    EmptyScreen { width: u32, height: u32 },
}

impl ScreenError {
    pub fn asset(asset: &'static str, reason: impl ToString) -> Self {
        ScreenError::AssetLoadFailure {
            asset,
            reason: reason.to_string(),
        }
    }
}
