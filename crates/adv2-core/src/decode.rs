use byteorder::{ByteOrder, LittleEndian};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use tracing::warn;

use crate::config::{ChecksumPolicy, ReaderConfig};
use crate::consts::{FRAME_INFO_RECORD_SIZE, PARALLEL_PIXEL_THRESHOLD};
use crate::cursor::BinaryCursor;
use crate::error::{AdvError, Result};
use crate::frame::{Frame, FrameInfo, PixelBuffer};
use crate::index::FrameIndexEntry;
use crate::stream::{Compression, StreamDefinitionTable, StreamId};
use crate::tags::TagDictionary;

/// Turns one frame record into a [`Frame`].
///
/// Stateless apart from the image geometry and decode options, so the same
/// decoder can serve every frame of a file.
#[derive(Clone, Debug)]
pub struct FrameDecoder {
    width: usize,
    height: usize,
    checksum_policy: ChecksumPolicy,
    parallel_unpack: bool,
}

impl FrameDecoder {
    pub fn new(width: u32, height: u32, config: &ReaderConfig) -> Self {
        Self {
            width: width as usize,
            height: height as usize,
            checksum_policy: config.checksum_policy,
            parallel_unpack: config.parallel_unpack,
        }
    }

    /// Decode the frame record located by `entry`.
    ///
    /// Reads the payload, verifies its checksum when one is present, reads the
    /// FrameInfo record and frame tags that follow it, then unpacks the
    /// payload with the layout named by the FrameInfo.
    pub fn decode(
        &self,
        cursor: &mut BinaryCursor<'_>,
        stream: StreamId,
        frame: u32,
        entry: &FrameIndexEntry,
        definitions: &StreamDefinitionTable,
    ) -> Result<Frame> {
        cursor.seek(entry.byte_offset)?;
        let payload = cursor.read_fixed_bytes(entry.encoded_length as usize)?;

        if let (Some(expected), ChecksumPolicy::Verify) = (entry.checksum, self.checksum_policy) {
            let actual = crc32fast::hash(payload);
            if actual != expected {
                warn!(%stream, frame, offset = entry.byte_offset, "Frame checksum mismatch");
                return Err(AdvError::FrameIntegrity {
                    stream,
                    frame,
                    offset: entry.byte_offset,
                    expected,
                    actual,
                });
            }
        }

        let info = read_frame_info(cursor)?;
        let layout = definitions.layout(info.image_layout_id)?;
        if let Compression::Other(name) = layout.compression() {
            return Err(AdvError::InvalidLayout {
                layout_id: layout.layout_id,
                reason: format!("unsupported section compression {name}"),
            });
        }

        let expected_len = (self.width as u64)
            .checked_mul(self.height as u64)
            .and_then(|pixels| layout.expected_payload_len(pixels))
            .ok_or(AdvError::InvalidDimensions {
                width: self.width as u32,
                height: self.height as u32,
            })?;
        if expected_len != payload.len() as u64 {
            return Err(AdvError::PayloadSizeMismatch {
                stream,
                frame,
                offset: entry.byte_offset,
                expected: expected_len,
                actual: payload.len() as u64,
            });
        }

        let data = unpack_samples(
            payload,
            self.height,
            self.width,
            layout.bits_per_pixel,
            self.parallel_unpack,
        );

        Ok(Frame {
            stream,
            index: frame,
            pixels: PixelBuffer::new(data, layout.bits_per_pixel),
            info,
        })
    }
}

/// Read the fixed FrameInfo record and the frame tag dictionary after it.
pub fn read_frame_info(cursor: &mut BinaryCursor<'_>) -> Result<FrameInfo> {
    let start = cursor.position();
    let image_layout_id = cursor.read_u8()?;
    let start_ticks = cursor.read_u64()?;
    let end_ticks = cursor.read_u64()?;
    let utc_mid_exposure_timestamp_lo = cursor.read_u32()?;
    let utc_mid_exposure_timestamp_hi = cursor.read_u32()?;
    let exposure = cursor.read_f64()?;
    let status_flags = cursor.read_u32()?;
    debug_assert_eq!(cursor.position() - start, FRAME_INFO_RECORD_SIZE);
    let frame_tags = TagDictionary::read_counted(cursor)?;

    Ok(FrameInfo {
        image_layout_id,
        start_ticks,
        end_ticks,
        utc_mid_exposure_timestamp_lo,
        utc_mid_exposure_timestamp_hi,
        exposure,
        status_flags,
        frame_tags,
    })
}

/// Unpack a payload whose length already matches the layout.
fn unpack_samples(
    payload: &[u8],
    height: usize,
    width: usize,
    bits_per_pixel: u8,
    parallel: bool,
) -> Array2<u32> {
    let mut data = Array2::<u32>::zeros((height, width));

    if parallel && height * width >= PARALLEL_PIXEL_THRESHOLD {
        data.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut out)| {
                for (col, v) in out.iter_mut().enumerate() {
                    *v = sample_at(payload, row * width + col, bits_per_pixel);
                }
            });
    } else {
        for ((row, col), v) in data.indexed_iter_mut() {
            *v = sample_at(payload, row * width + col, bits_per_pixel);
        }
    }

    data
}

/// Sample `index` of the payload. Bits above the layout depth are dropped.
fn sample_at(payload: &[u8], index: usize, bits_per_pixel: u8) -> u32 {
    let mask = if bits_per_pixel >= 32 {
        u32::MAX
    } else {
        (1u32 << bits_per_pixel) - 1
    };

    match bits_per_pixel {
        8 => payload[index] as u32,
        9..=16 => LittleEndian::read_u16(&payload[index * 2..index * 2 + 2]) as u32 & mask,
        17..=32 => LittleEndian::read_u32(&payload[index * 4..index * 4 + 4]) & mask,
        _ => {
            // Packed MSB-first; a sub-byte sample spans at most two bytes.
            let bit = index * bits_per_pixel as usize;
            let byte = bit / 8;
            let shift = 16 - (bit % 8) - bits_per_pixel as usize;
            let hi = payload[byte] as u32;
            let lo = payload.get(byte + 1).copied().unwrap_or(0) as u32;
            ((hi << 8 | lo) >> shift) & mask
        }
    }
}
