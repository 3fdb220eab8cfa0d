use thiserror::Error;

use crate::stream::StreamId;

/// Success code of the numeric error table.
pub const S_OK: u32 = 0;

/// First code of the range reserved for "unopened or invalid file" conditions.
pub const E_FILE_RANGE_START: u32 = 0x8100_0000;
/// Last code of the range reserved for "unopened or invalid file" conditions.
pub const E_FILE_RANGE_END: u32 = 0x8100_00FF;

pub const E_IO_ERROR: u32 = 0x8100_0001;
pub const E_NOT_AN_ADV_FILE: u32 = 0x8100_0002;
pub const E_UNSUPPORTED_VERSION: u32 = 0x8100_0003;
pub const E_TRUNCATED_DATA: u32 = 0x8100_0004;
pub const E_INVALID_DIMENSIONS: u32 = 0x8100_0005;
pub const E_CORRUPT_STRUCTURE: u32 = 0x8100_0006;

pub const E_FRAME_OUT_OF_RANGE: u32 = 0x8100_1001;
pub const E_FRAME_INTEGRITY: u32 = 0x8100_1002;
pub const E_INVALID_LAYOUT: u32 = 0x8100_1003;
pub const E_PAYLOAD_SIZE_MISMATCH: u32 = 0x8100_1004;
pub const E_IMAGE_EXPORT: u32 = 0x8100_1005;

pub const E_INVALID_STATE: u32 = 0x8100_2001;

#[derive(Error, Debug)]
pub enum AdvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an ADV file: {0}")]
    NotAnAdvFile(String),

    #[error("Unsupported ADV format version {version} (only version 2 is supported)")]
    UnsupportedVersion { version: u8 },

    #[error(
        "Truncated data at offset {offset}: requested {requested} bytes, {available} available"
    )]
    TruncatedData {
        offset: u64,
        requested: u64,
        available: u64,
    },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Corrupt file structure at offset {offset}: {reason}")]
    CorruptStructure { offset: u64, reason: String },

    #[error("Frame {frame} out of range for {stream} stream (total: {total})")]
    FrameNumberOutOfRange {
        stream: StreamId,
        frame: i64,
        total: u32,
    },

    #[error(
        "Checksum mismatch in {stream} frame {frame} at offset {offset}: \
         expected {expected:#010x}, computed {actual:#010x}"
    )]
    FrameIntegrity {
        stream: StreamId,
        frame: u32,
        offset: u64,
        expected: u32,
        actual: u32,
    },

    #[error("Invalid image layout {layout_id}: {reason}")]
    InvalidLayout { layout_id: u8, reason: String },

    #[error(
        "Payload size mismatch in {stream} frame {frame} at offset {offset}: \
         layout expects {expected} bytes, index declares {actual}"
    )]
    PayloadSizeMismatch {
        stream: StreamId,
        frame: u32,
        offset: u64,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

impl AdvError {
    /// Numeric code of this error, resolvable through [`resolve_error_message`].
    pub fn code(&self) -> u32 {
        match self {
            AdvError::Io(_) => E_IO_ERROR,
            AdvError::NotAnAdvFile(_) => E_NOT_AN_ADV_FILE,
            AdvError::UnsupportedVersion { .. } => E_UNSUPPORTED_VERSION,
            AdvError::TruncatedData { .. } => E_TRUNCATED_DATA,
            AdvError::InvalidDimensions { .. } => E_INVALID_DIMENSIONS,
            AdvError::CorruptStructure { .. } => E_CORRUPT_STRUCTURE,
            AdvError::FrameNumberOutOfRange { .. } => E_FRAME_OUT_OF_RANGE,
            AdvError::FrameIntegrity { .. } => E_FRAME_INTEGRITY,
            AdvError::InvalidLayout { .. } => E_INVALID_LAYOUT,
            AdvError::PayloadSizeMismatch { .. } => E_PAYLOAD_SIZE_MISMATCH,
            AdvError::InvalidState(_) => E_INVALID_STATE,
            AdvError::ImageError(_) => E_IMAGE_EXPORT,
        }
    }

    /// Errors local to one frame: the session stays usable and other frames
    /// can still be read.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AdvError::FrameIntegrity { .. }
                | AdvError::PayloadSizeMismatch { .. }
                | AdvError::InvalidLayout { .. }
                | AdvError::TruncatedData { .. }
                | AdvError::FrameNumberOutOfRange { .. }
        )
    }
}

/// Whether `code` falls in the reserved "unopened or invalid file" range.
pub fn is_file_error_code(code: u32) -> bool {
    (E_FILE_RANGE_START..=E_FILE_RANGE_END).contains(&code)
}

/// Fixed code → message table.
pub fn resolve_error_message(code: u32) -> &'static str {
    match code {
        S_OK => "Success",
        E_IO_ERROR => "The file could not be read",
        E_NOT_AN_ADV_FILE => "The file is not an ADV file",
        E_UNSUPPORTED_VERSION => "The ADV file version is not supported",
        E_TRUNCATED_DATA => "The file is shorter than its structure declares",
        E_INVALID_DIMENSIONS => "The image dimensions are invalid",
        E_CORRUPT_STRUCTURE => "The file structure is corrupt",
        E_FRAME_OUT_OF_RANGE => "The requested frame number is out of range",
        E_FRAME_INTEGRITY => "The frame data failed its checksum",
        E_INVALID_LAYOUT => "The image layout is invalid or unsupported",
        E_PAYLOAD_SIZE_MISMATCH => "The frame payload size does not match its layout",
        E_IMAGE_EXPORT => "The frame could not be exported as an image",
        E_INVALID_STATE => "The reader is not in a valid state for this call",
        code if is_file_error_code(code) => "The file could not be opened",
        _ => "Unknown error",
    }
}

pub type Result<T> = std::result::Result<T, AdvError>;
