use serde::Serialize;
use tracing::debug;

use crate::consts::{
    ADV_MAGIC, ADV_SUPPORTED_VERSION, FLAG_CALIBRATION_STREAM, FLAG_FRAME_CHECKSUMS,
    PREAMBLE_FIXED_SIZE,
};
use crate::cursor::BinaryCursor;
use crate::error::{AdvError, Result};
use crate::tags::TagDictionary;

/// Absolute byte offsets of the sections following the preamble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SectionOffsets {
    /// Start of the stream definitions (end of the file-level tags).
    pub stream_definitions: u64,
    pub frame_index: u64,
    /// The frame data section runs from here to the end of the file.
    pub frame_data: u64,
}

/// File-level facts from the preamble. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub version: u8,
    pub width: u32,
    pub height: u32,
    pub count_main_frames: u32,
    pub count_calibration_frames: u32,
    pub system_metadata_tags_count: u16,
    pub user_metadata_tags_count: u16,
    pub image_layouts_count: u8,
    pub has_checksums: bool,
    pub has_calibration_stream: bool,
    pub file_size: u64,
    pub sections: SectionOffsets,
}

impl FileInfo {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Parsed preamble plus the two file-level tag dictionaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FileHeader {
    pub info: FileInfo,
    pub system_metadata: TagDictionary,
    pub user_metadata: TagDictionary,
}

/// Parse the preamble starting at the cursor's current position (normally 0).
///
/// On success the cursor sits at the first stream definition.
pub fn parse_header(cursor: &mut BinaryCursor<'_>) -> Result<FileHeader> {
    let start = cursor.position();
    if cursor.remaining() < 4 {
        return Err(AdvError::NotAnAdvFile(format!(
            "file too small for the ADV signature ({} bytes)",
            cursor.remaining()
        )));
    }
    let magic = cursor.read_u32()?;
    if magic != ADV_MAGIC {
        return Err(AdvError::NotAnAdvFile(format!(
            "bad signature {magic:#010x}, expected {ADV_MAGIC:#010x}"
        )));
    }

    let version = cursor.read_u8()?;
    if version != ADV_SUPPORTED_VERSION {
        return Err(AdvError::UnsupportedVersion { version });
    }

    let flags = cursor.read_u8()?;
    let width = cursor.read_u32()?;
    let height = cursor.read_u32()?;
    let count_main_frames = cursor.read_u32()?;
    let calibration_count_offset = cursor.position();
    let count_calibration_frames = cursor.read_u32()?;
    let layouts_offset = cursor.position();
    let image_layouts_count = cursor.read_u8()?;
    let offsets_offset = cursor.position();
    let frame_index = cursor.read_u64()?;
    let frame_data = cursor.read_u64()?;
    debug_assert_eq!(cursor.position() - start, PREAMBLE_FIXED_SIZE);

    if width == 0 || height == 0 {
        return Err(AdvError::InvalidDimensions { width, height });
    }

    let has_checksums = flags & FLAG_FRAME_CHECKSUMS != 0;
    let has_calibration_stream = flags & FLAG_CALIBRATION_STREAM != 0;
    if !has_calibration_stream && count_calibration_frames != 0 {
        return Err(AdvError::CorruptStructure {
            offset: calibration_count_offset,
            reason: format!(
                "{count_calibration_frames} calibration frames declared without a calibration stream"
            ),
        });
    }
    if image_layouts_count == 0 {
        return Err(AdvError::CorruptStructure {
            offset: layouts_offset,
            reason: "no image layouts declared".into(),
        });
    }

    let system_metadata_tags_count = cursor.read_u16()?;
    let system_metadata = TagDictionary::read_from(cursor, system_metadata_tags_count)?;
    let user_metadata_tags_count = cursor.read_u16()?;
    let user_metadata = TagDictionary::read_from(cursor, user_metadata_tags_count)?;

    let file_size = cursor.len();
    if frame_data > file_size {
        return Err(AdvError::TruncatedData {
            offset: file_size,
            requested: frame_data - file_size,
            available: 0,
        });
    }
    if frame_index > frame_data {
        return Err(AdvError::CorruptStructure {
            offset: offsets_offset,
            reason: format!("frame index offset {frame_index} follows frame data offset {frame_data}"),
        });
    }

    let stream_definitions = cursor.position();
    if frame_index < stream_definitions {
        return Err(AdvError::CorruptStructure {
            offset: offsets_offset,
            reason: format!(
                "frame index offset {frame_index} overlaps the header (ends at {stream_definitions})"
            ),
        });
    }

    let sections = SectionOffsets {
        stream_definitions,
        frame_index,
        frame_data,
    };
    debug!(?sections, width, height, "ADV2 header parsed");

    Ok(FileHeader {
        info: FileInfo {
            version,
            width,
            height,
            count_main_frames,
            count_calibration_frames,
            system_metadata_tags_count,
            user_metadata_tags_count,
            image_layouts_count,
            has_checksums,
            has_calibration_stream,
            file_size,
            sections,
        },
        system_metadata,
        user_metadata,
    })
}
