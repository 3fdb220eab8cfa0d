use ndarray::{Array2, ArrayView1};

use crate::stream::{StreamDefinition, StreamId};
use crate::tags::TagDictionary;
use crate::timestamp::{self, SplitTimestamp};

/// Decoded image samples, row-major, shape = (height, width).
///
/// Samples are unsigned and never exceed `2^bits_per_pixel - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array2<u32>,
    bits_per_pixel: u8,
}

impl PixelBuffer {
    pub fn new(data: Array2<u32>, bits_per_pixel: u8) -> Self {
        Self {
            data,
            bits_per_pixel,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Element strides for (row, column).
    pub fn strides(&self) -> (isize, isize) {
        let s = self.data.strides();
        (s[0], s[1])
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    pub fn max_value(&self) -> u32 {
        if self.bits_per_pixel >= 32 {
            u32::MAX
        } else {
            (1u32 << self.bits_per_pixel) - 1
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.data.get([row, col]).copied()
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, u32> {
        self.data.row(row)
    }

    pub fn as_array(&self) -> &Array2<u32> {
        &self.data
    }

    pub fn into_array(self) -> Array2<u32> {
        self.data
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (u32, u32) {
        self.data
            .iter()
            .fold((u32::MAX, 0), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

/// Per-frame timing and status record.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInfo {
    pub image_layout_id: u8,
    /// Stream clock ticks at exposure start.
    pub start_ticks: u64,
    /// Stream clock ticks at exposure end.
    pub end_ticks: u64,
    pub utc_mid_exposure_timestamp_lo: u32,
    pub utc_mid_exposure_timestamp_hi: u32,
    /// Exposure duration in seconds.
    pub exposure: f64,
    pub status_flags: u32,
    pub frame_tags: TagDictionary,
}

impl FrameInfo {
    pub fn utc_mid_exposure(&self) -> SplitTimestamp {
        SplitTimestamp {
            lo: self.utc_mid_exposure_timestamp_lo,
            hi: self.utc_mid_exposure_timestamp_hi,
        }
    }

    pub fn start_seconds(&self, stream: &StreamDefinition) -> f64 {
        timestamp::ticks_to_seconds(self.start_ticks, stream.clock_frequency)
    }

    pub fn end_seconds(&self, stream: &StreamDefinition) -> f64 {
        timestamp::ticks_to_seconds(self.end_ticks, stream.clock_frequency)
    }

    /// Exposure measured by the stream clock (end - start ticks).
    pub fn clock_exposure(&self, stream: &StreamDefinition) -> f64 {
        timestamp::ticks_to_seconds(
            self.end_ticks.saturating_sub(self.start_ticks),
            stream.clock_frequency,
        )
    }

    pub fn has_status_flag(&self, mask: u32) -> bool {
        self.status_flags & mask == mask
    }
}

/// One decoded frame: its samples plus its FrameInfo.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub stream: StreamId,
    pub index: u32,
    pub pixels: PixelBuffer,
    pub info: FrameInfo,
}

impl Frame {
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }
}
