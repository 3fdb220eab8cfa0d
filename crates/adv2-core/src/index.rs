use std::ops::Range;

use tracing::debug;

use crate::consts::{INDEX_ENTRY_SIZE, INDEX_ENTRY_SIZE_WITH_CHECKSUM};
use crate::cursor::BinaryCursor;
use crate::error::{AdvError, Result};
use crate::stream::StreamId;

/// Location of one frame record in the frame data section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameIndexEntry {
    /// Absolute offset of the pixel payload.
    pub byte_offset: u64,
    /// Length of the pixel payload.
    pub encoded_length: u32,
    /// CRC-32 of the payload, for files that carry checksums.
    pub checksum: Option<u32>,
}

impl FrameIndexEntry {
    /// Payload byte range, or `None` when the end does not fit in a `u64`.
    pub fn byte_range(&self) -> Option<Range<u64>> {
        let end = self.byte_offset.checked_add(self.encoded_length as u64)?;
        Some(self.byte_offset..end)
    }
}

/// Frame number → payload location for one stream. Built once at open.
#[derive(Clone, Debug)]
pub struct FrameIndex {
    stream: StreamId,
    entries: Vec<FrameIndexEntry>,
}

impl FrameIndex {
    /// Read `frame_count` entries in ascending frame order.
    ///
    /// The block starts with its own `u32` entry count, which must agree with
    /// the stream definition. Every payload must lie inside `data_section`.
    pub fn build(
        cursor: &mut BinaryCursor<'_>,
        stream: StreamId,
        frame_count: u32,
        has_checksums: bool,
        data_section: Range<u64>,
    ) -> Result<Self> {
        let block_start = cursor.position();
        let declared = cursor.read_u32()?;
        if declared != frame_count {
            return Err(AdvError::CorruptStructure {
                offset: block_start,
                reason: format!(
                    "{stream} index holds {declared} entries, stream defines {frame_count} frames"
                ),
            });
        }

        let entry_size = if has_checksums {
            INDEX_ENTRY_SIZE_WITH_CHECKSUM
        } else {
            INDEX_ENTRY_SIZE
        };
        let needed = frame_count as u64 * entry_size;
        if needed > cursor.remaining() {
            return Err(AdvError::TruncatedData {
                offset: cursor.position(),
                requested: needed,
                available: cursor.remaining(),
            });
        }

        let mut entries = Vec::with_capacity(frame_count as usize);
        for frame in 0..frame_count {
            let entry_offset = cursor.position();
            let byte_offset = cursor.read_u64()?;
            let encoded_length = cursor.read_u32()?;
            let checksum = if has_checksums {
                Some(cursor.read_u32()?)
            } else {
                None
            };
            let entry = FrameIndexEntry {
                byte_offset,
                encoded_length,
                checksum,
            };

            let Some(range) = entry.byte_range() else {
                return Err(AdvError::CorruptStructure {
                    offset: entry_offset,
                    reason: format!(
                        "{stream} frame {frame} offset {byte_offset} plus length {encoded_length} overflows"
                    ),
                });
            };
            if range.start < data_section.start || range.end > data_section.end {
                return Err(AdvError::CorruptStructure {
                    offset: entry_offset,
                    reason: format!(
                        "{stream} frame {frame} spans {}..{}, outside frame data section {}..{}",
                        range.start, range.end, data_section.start, data_section.end
                    ),
                });
            }
            entries.push(entry);
        }

        debug!(%stream, frames = frame_count, "Frame index built");
        Ok(Self { stream, entries })
    }

    pub fn stream(&self) -> StreamId {
        self.stream
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// O(1) lookup; negative or too-large frame numbers are rejected.
    pub fn entry_for(&self, frame_number: i64) -> Result<&FrameIndexEntry> {
        usize::try_from(frame_number)
            .ok()
            .and_then(|i| self.entries.get(i))
            .ok_or(AdvError::FrameNumberOutOfRange {
                stream: self.stream,
                frame: frame_number,
                total: self.entries.len() as u32,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameIndexEntry> {
        self.entries.iter()
    }
}
