use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{COMPRESSION_UNCOMPRESSED, MAX_BITS_PER_PIXEL, TAG_SECTION_DATA_COMPRESSION};
use crate::cursor::BinaryCursor;
use crate::error::{AdvError, Result};
use crate::header::FileInfo;
use crate::tags::TagDictionary;

/// Logical frame sequence within a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamId {
    Main,
    Calibration,
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamId::Main => write!(f, "main"),
            StreamId::Calibration => write!(f, "calibration"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StreamDefinition {
    pub id: StreamId,
    pub frame_count: u32,
    /// Stream clock frequency in Hz, always positive.
    pub clock_frequency: i64,
    pub timing_accuracy: i64,
    pub tags: TagDictionary,
    /// Whether this stream's index entries carry a payload CRC-32.
    pub has_checksums: bool,
}

/// How a layout's section data is compressed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Compression {
    Uncompressed,
    Other(String),
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Uncompressed => write!(f, "{COMPRESSION_UNCOMPRESSED}"),
            Compression::Other(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageLayoutDefinition {
    pub layout_id: u8,
    pub bits_per_pixel: u8,
    pub tags: TagDictionary,
}

impl ImageLayoutDefinition {
    pub fn compression(&self) -> Compression {
        match self.tags.get(TAG_SECTION_DATA_COMPRESSION) {
            None => Compression::Uncompressed,
            Some(v) if v.eq_ignore_ascii_case(COMPRESSION_UNCOMPRESSED) => {
                Compression::Uncompressed
            }
            Some(v) => Compression::Other(v.to_string()),
        }
    }

    /// Bytes used to store one sample, or `None` for packed sub-byte depths.
    pub fn bytes_per_sample(&self) -> Option<usize> {
        match self.bits_per_pixel {
            1..=7 => None,
            8 => Some(1),
            9..=16 => Some(2),
            _ => Some(4),
        }
    }

    /// Exact payload length of an uncompressed frame of `pixel_count` samples,
    /// or `None` if it does not fit in a `u64`.
    pub fn expected_payload_len(&self, pixel_count: u64) -> Option<u64> {
        match self.bytes_per_sample() {
            Some(bytes) => pixel_count.checked_mul(bytes as u64),
            None => pixel_count
                .checked_mul(self.bits_per_pixel as u64)
                .map(|bits| bits.div_ceil(8)),
        }
    }

    /// Largest sample value this layout can produce.
    pub fn max_sample_value(&self) -> u32 {
        if self.bits_per_pixel >= 32 {
            u32::MAX
        } else {
            (1u32 << self.bits_per_pixel) - 1
        }
    }
}

/// Read one stream definition: frame count, clock frequency, timing accuracy
/// and its tags.
fn read_stream(
    cursor: &mut BinaryCursor<'_>,
    id: StreamId,
    declared_frames: u32,
    has_checksums: bool,
) -> Result<StreamDefinition> {
    let start = cursor.position();
    let frame_count = cursor.read_u32()?;
    let clock_frequency = cursor.read_i64()?;
    let timing_accuracy = cursor.read_i64()?;
    let tags = TagDictionary::read_counted(cursor)?;

    if frame_count != declared_frames {
        return Err(AdvError::CorruptStructure {
            offset: start,
            reason: format!(
                "{id} stream declares {frame_count} frames, header declares {declared_frames}"
            ),
        });
    }
    if clock_frequency <= 0 {
        return Err(AdvError::CorruptStructure {
            offset: start + 4,
            reason: format!("{id} stream clock frequency {clock_frequency} is not positive"),
        });
    }

    Ok(StreamDefinition {
        id,
        frame_count,
        clock_frequency,
        timing_accuracy,
        tags,
        has_checksums,
    })
}

pub fn read_main_stream(cursor: &mut BinaryCursor<'_>, info: &FileInfo) -> Result<StreamDefinition> {
    read_stream(cursor, StreamId::Main, info.count_main_frames, info.has_checksums)
}

pub fn read_calibration_stream(
    cursor: &mut BinaryCursor<'_>,
    info: &FileInfo,
) -> Result<StreamDefinition> {
    read_stream(
        cursor,
        StreamId::Calibration,
        info.count_calibration_frames,
        info.has_checksums,
    )
}

pub fn read_image_layout(cursor: &mut BinaryCursor<'_>) -> Result<ImageLayoutDefinition> {
    let layout_id = cursor.read_u8()?;
    let bits_per_pixel = cursor.read_u8()?;
    let tags = TagDictionary::read_counted(cursor)?;

    if bits_per_pixel == 0 || bits_per_pixel > MAX_BITS_PER_PIXEL {
        return Err(AdvError::InvalidLayout {
            layout_id,
            reason: format!(
                "{bits_per_pixel} bits per pixel is outside 1..={MAX_BITS_PER_PIXEL}"
            ),
        });
    }

    Ok(ImageLayoutDefinition {
        layout_id,
        bits_per_pixel,
        tags,
    })
}

/// Stream and image layout definitions of an open file.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamDefinitionTable {
    pub main: StreamDefinition,
    pub calibration: Option<StreamDefinition>,
    layouts: Vec<ImageLayoutDefinition>,
}

impl StreamDefinitionTable {
    /// Read the stream definitions and image layouts that follow the header.
    pub fn read(cursor: &mut BinaryCursor<'_>, info: &FileInfo) -> Result<Self> {
        let main = read_main_stream(cursor, info)?;
        let calibration = if info.has_calibration_stream {
            Some(read_calibration_stream(cursor, info)?)
        } else {
            None
        };

        let mut layouts: Vec<ImageLayoutDefinition> =
            Vec::with_capacity(info.image_layouts_count as usize);
        for _ in 0..info.image_layouts_count {
            let layout = read_image_layout(cursor)?;
            if layouts.iter().any(|l| l.layout_id == layout.layout_id) {
                return Err(AdvError::InvalidLayout {
                    layout_id: layout.layout_id,
                    reason: "duplicate layout id".into(),
                });
            }
            layouts.push(layout);
        }

        Ok(Self {
            main,
            calibration,
            layouts,
        })
    }

    pub fn stream(&self, id: StreamId) -> Option<&StreamDefinition> {
        match id {
            StreamId::Main => Some(&self.main),
            StreamId::Calibration => self.calibration.as_ref(),
        }
    }

    pub fn layouts(&self) -> &[ImageLayoutDefinition] {
        &self.layouts
    }

    pub fn layout(&self, layout_id: u8) -> Result<&ImageLayoutDefinition> {
        self.layouts
            .iter()
            .find(|l| l.layout_id == layout_id)
            .ok_or_else(|| AdvError::InvalidLayout {
                layout_id,
                reason: "no layout with this id is defined".into(),
            })
    }
}
