use adv2_core::consts::{ADV_MAGIC, FLAG_CALIBRATION_STREAM, FLAG_FRAME_CHECKSUMS};

/// Offset of the frame-index offset field inside the preamble.
pub const INDEX_OFFSET_FIELD: usize = 23;
/// Offset of the frame-data offset field inside the preamble.
pub const DATA_OFFSET_FIELD: usize = 31;

pub type Tags = Vec<(String, String)>;

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// One frame record to place in the frame data section.
#[derive(Clone, Debug)]
pub struct FrameSpec {
    pub layout_id: u8,
    pub payload: Vec<u8>,
    pub start_ticks: u64,
    pub end_ticks: u64,
    pub utc_lo: u32,
    pub utc_hi: u32,
    pub exposure: f64,
    pub status_flags: u32,
    pub tags: Tags,
}

impl FrameSpec {
    pub fn new(layout_id: u8, payload: Vec<u8>) -> Self {
        Self {
            layout_id,
            payload,
            start_ticks: 0,
            end_ticks: 0,
            utc_lo: 0,
            utc_hi: 0,
            exposure: 0.0,
            status_flags: 0,
            tags: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StreamSpec {
    pub clock_frequency: i64,
    pub timing_accuracy: i64,
    pub tags: Tags,
    pub frames: Vec<FrameSpec>,
}

impl StreamSpec {
    pub fn new(frames: Vec<FrameSpec>) -> Self {
        Self {
            clock_frequency: 10_000_000,
            timing_accuracy: 1,
            tags: Vec::new(),
            frames,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayoutSpec {
    pub layout_id: u8,
    pub bits_per_pixel: u8,
    pub tags: Tags,
}

/// Assembles an ADV2 byte image field by field.
#[derive(Clone, Debug)]
pub struct AdvBuilder {
    pub magic: u32,
    pub version: u8,
    pub width: u32,
    pub height: u32,
    pub checksums: bool,
    pub system_tags: Tags,
    pub user_tags: Tags,
    pub layouts: Vec<LayoutSpec>,
    pub main: StreamSpec,
    pub calibration: Option<StreamSpec>,
}

impl AdvBuilder {
    /// A file with a single layout (id 1) of the given depth and no frames.
    pub fn new(width: u32, height: u32, bits_per_pixel: u8) -> Self {
        Self {
            magic: ADV_MAGIC,
            version: 2,
            width,
            height,
            checksums: false,
            system_tags: Vec::new(),
            user_tags: Vec::new(),
            layouts: vec![LayoutSpec {
                layout_id: 1,
                bits_per_pixel,
                tags: tags(&[("DATA-LAYOUT", "FULL-IMAGE-RAW")]),
            }],
            main: StreamSpec::new(Vec::new()),
            calibration: None,
        }
    }

    /// Add a main-stream frame with layout 1 built from `samples`.
    pub fn with_main_samples(mut self, samples: &[u32]) -> Self {
        let bpp = self.layouts[0].bits_per_pixel;
        let index = self.main.frames.len() as u32;
        let mut frame = FrameSpec::new(1, encode_samples(samples, bpp));
        frame.start_ticks = 1_000 * index as u64;
        frame.end_ticks = 1_000 * index as u64 + 400;
        frame.utc_lo = 100 + index;
        frame.utc_hi = 7;
        frame.exposure = 0.04;
        self.main.frames.push(frame);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut flags = 0u8;
        if self.checksums {
            flags |= FLAG_FRAME_CHECKSUMS;
        }
        if self.calibration.is_some() {
            flags |= FLAG_CALIBRATION_STREAM;
        }
        let calibration_count = self.calibration.as_ref().map_or(0, |c| c.frames.len());

        buf.extend_from_slice(&self.magic.to_le_bytes());
        buf.push(self.version);
        buf.push(flags);
        buf.extend_from_slice(&self.width.to_le_bytes());
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.extend_from_slice(&(self.main.frames.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(calibration_count as u32).to_le_bytes());
        buf.push(self.layouts.len() as u8);
        // Section offsets, patched below.
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&0u64.to_le_bytes());
        assert_eq!(buf.len(), 39);

        write_tags(&mut buf, &self.system_tags);
        write_tags(&mut buf, &self.user_tags);

        let mut streams = vec![&self.main];
        if let Some(ref c) = self.calibration {
            streams.push(c);
        }
        for s in &streams {
            buf.extend_from_slice(&(s.frames.len() as u32).to_le_bytes());
            buf.extend_from_slice(&s.clock_frequency.to_le_bytes());
            buf.extend_from_slice(&s.timing_accuracy.to_le_bytes());
            write_tags(&mut buf, &s.tags);
        }

        for l in &self.layouts {
            buf.push(l.layout_id);
            buf.push(l.bits_per_pixel);
            write_tags(&mut buf, &l.tags);
        }

        let index_offset = buf.len() as u64;
        let entry_size = if self.checksums { 16 } else { 12 };
        let index_size: usize = streams
            .iter()
            .map(|s| 4 + s.frames.len() * entry_size)
            .sum();
        let data_offset = index_offset + index_size as u64;

        let mut index = Vec::new();
        let mut data = Vec::new();
        for s in &streams {
            index.extend_from_slice(&(s.frames.len() as u32).to_le_bytes());
            for f in &s.frames {
                let offset = data_offset + data.len() as u64;
                index.extend_from_slice(&offset.to_le_bytes());
                index.extend_from_slice(&(f.payload.len() as u32).to_le_bytes());
                if self.checksums {
                    index.extend_from_slice(&crc32fast::hash(&f.payload).to_le_bytes());
                }
                write_frame(&mut data, f);
            }
        }
        assert_eq!(index.len(), index_size);

        buf.extend_from_slice(&index);
        buf.extend_from_slice(&data);
        buf[INDEX_OFFSET_FIELD..INDEX_OFFSET_FIELD + 8].copy_from_slice(&index_offset.to_le_bytes());
        buf[DATA_OFFSET_FIELD..DATA_OFFSET_FIELD + 8].copy_from_slice(&data_offset.to_le_bytes());
        buf
    }
}

pub fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u16).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

pub fn write_tags(buf: &mut Vec<u8>, tags: &Tags) {
    buf.extend_from_slice(&(tags.len() as u16).to_le_bytes());
    for (k, v) in tags {
        write_string(buf, k);
        write_string(buf, v);
    }
}

pub fn write_frame(buf: &mut Vec<u8>, f: &FrameSpec) {
    buf.extend_from_slice(&f.payload);
    buf.push(f.layout_id);
    buf.extend_from_slice(&f.start_ticks.to_le_bytes());
    buf.extend_from_slice(&f.end_ticks.to_le_bytes());
    buf.extend_from_slice(&f.utc_lo.to_le_bytes());
    buf.extend_from_slice(&f.utc_hi.to_le_bytes());
    buf.extend_from_slice(&f.exposure.to_le_bytes());
    buf.extend_from_slice(&f.status_flags.to_le_bytes());
    write_tags(buf, &f.tags);
}

/// Encode samples the way a layout of `bits_per_pixel` stores them.
pub fn encode_samples(samples: &[u32], bits_per_pixel: u8) -> Vec<u8> {
    match bits_per_pixel {
        8 => samples.iter().map(|&v| v as u8).collect(),
        9..=16 => samples
            .iter()
            .flat_map(|&v| (v as u16).to_le_bytes())
            .collect(),
        17..=32 => samples.iter().flat_map(|&v| v.to_le_bytes()).collect(),
        bpp => {
            let bpp = bpp as usize;
            let mut out = vec![0u8; (samples.len() * bpp).div_ceil(8)];
            for (i, &v) in samples.iter().enumerate() {
                for b in 0..bpp {
                    if v >> (bpp - 1 - b) & 1 == 1 {
                        let bit = i * bpp + b;
                        out[bit / 8] |= 0x80 >> (bit % 8);
                    }
                }
            }
            out
        }
    }
}

/// Write an ADV buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_adv(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write ADV data");
    f.flush().expect("flush");
    f
}
