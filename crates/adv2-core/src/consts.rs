/// File signature, stored little-endian (bytes `FSTF` on disk).
pub const ADV_MAGIC: u32 = 0x4654_5346;

/// The only container version this reader accepts.
pub const ADV_SUPPORTED_VERSION: u8 = 2;

/// Size of the fixed part of the preamble, up to the system metadata tags.
pub const PREAMBLE_FIXED_SIZE: u64 = 39;

/// Preamble flag: every frame index entry carries a CRC-32 of its payload.
pub const FLAG_FRAME_CHECKSUMS: u8 = 0b0000_0001;

/// Preamble flag: a calibration stream definition follows the main stream.
pub const FLAG_CALIBRATION_STREAM: u8 = 0b0000_0010;

/// Size of one index entry without a checksum (offset + length).
pub const INDEX_ENTRY_SIZE: u64 = 12;

/// Size of one index entry with a trailing CRC-32.
pub const INDEX_ENTRY_SIZE_WITH_CHECKSUM: u64 = 16;

/// Size of the fixed FrameInfo record that follows each pixel payload.
pub const FRAME_INFO_RECORD_SIZE: u64 = 37;

/// Widest sample a layout may declare.
pub const MAX_BITS_PER_PIXEL: u8 = 32;

/// Layout tag naming the section compression.
pub const TAG_SECTION_DATA_COMPRESSION: &str = "SECTION-DATA-COMPRESSION";

/// Compression value for raw pixel payloads.
pub const COMPRESSION_UNCOMPRESSED: &str = "UNCOMPRESSED";

/// ADV epoch (2010-01-01T00:00:00Z) as seconds since the Unix epoch.
pub const ADV_EPOCH_UNIX_SECONDS: u64 = 1_262_304_000;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism when unpacking.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
