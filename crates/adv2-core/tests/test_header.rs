#[allow(dead_code)]
mod common;

use adv2_core::cursor::BinaryCursor;
use adv2_core::error::AdvError;
use adv2_core::header::parse_header;
use adv2_core::session::AdvSession;
use adv2_core::stream::{Compression, StreamDefinitionTable};

use common::{tags, write_test_adv, AdvBuilder, StreamSpec};

#[test]
fn test_parse_basic_header() {
    let mut builder = AdvBuilder::new(640, 480, 16);
    builder.system_tags = tags(&[("RECORDER-SOFTWARE", "OccuRec"), ("FSTF-TYPE", "ADV")]);
    builder.user_tags = tags(&[("OBSERVER", "Test")]);
    let data = builder.build();

    let mut cursor = BinaryCursor::new(&data);
    let header = parse_header(&mut cursor).unwrap();
    let info = &header.info;

    assert_eq!(info.version, 2);
    assert_eq!(info.width, 640);
    assert_eq!(info.height, 480);
    assert_eq!(info.count_main_frames, 0);
    assert_eq!(info.count_calibration_frames, 0);
    assert_eq!(info.system_metadata_tags_count, 2);
    assert_eq!(info.user_metadata_tags_count, 1);
    assert_eq!(info.image_layouts_count, 1);
    assert!(!info.has_checksums);
    assert!(!info.has_calibration_stream);
    assert_eq!(info.file_size, data.len() as u64);
    assert_eq!(info.sections.stream_definitions, cursor.position());
    assert_eq!(header.system_metadata.get("RECORDER-SOFTWARE"), Some("OccuRec"));
    assert_eq!(header.user_metadata.get("OBSERVER"), Some("Test"));
}

#[test]
fn test_stream_table_follows_header() {
    let mut builder = AdvBuilder::new(4, 2, 12);
    builder.main.clock_frequency = 1_000_000;
    builder.main.timing_accuracy = 5;
    builder.main.tags = tags(&[("NAME", "MAIN")]);
    builder.calibration = Some(StreamSpec::new(Vec::new()));
    builder.layouts[0]
        .tags
        .push(("SECTION-DATA-COMPRESSION".into(), "UNCOMPRESSED".into()));
    let data = builder.build();

    let mut cursor = BinaryCursor::new(&data);
    let header = parse_header(&mut cursor).unwrap();
    let table = StreamDefinitionTable::read(&mut cursor, &header.info).unwrap();

    assert_eq!(table.main.clock_frequency, 1_000_000);
    assert_eq!(table.main.timing_accuracy, 5);
    assert_eq!(table.main.tags.get("NAME"), Some("MAIN"));
    assert!(table.calibration.is_some());

    let layout = table.layout(1).unwrap();
    assert_eq!(layout.bits_per_pixel, 12);
    assert_eq!(layout.compression(), Compression::Uncompressed);
    assert_eq!(layout.bytes_per_sample(), Some(2));
    assert_eq!(layout.expected_payload_len(8), Some(16));
    assert_eq!(layout.expected_payload_len(u64::MAX), None);
    assert_eq!(layout.max_sample_value(), 4095);
    assert_eq!(cursor.position(), header.info.sections.frame_index);
}

#[test]
fn test_bad_magic_is_not_an_adv_file() {
    let mut data = AdvBuilder::new(4, 4, 8).build();
    data[0] ^= 0xFF;
    let mut cursor = BinaryCursor::new(&data);
    assert!(matches!(
        parse_header(&mut cursor),
        Err(AdvError::NotAnAdvFile(_))
    ));
}

#[test]
fn test_tiny_file_is_not_an_adv_file() {
    let data = [0x46u8, 0x53];
    let mut cursor = BinaryCursor::new(&data);
    assert!(matches!(
        parse_header(&mut cursor),
        Err(AdvError::NotAnAdvFile(_))
    ));
}

#[test]
fn test_version_1_and_3_rejected() {
    for version in [1u8, 3] {
        let mut builder = AdvBuilder::new(4, 4, 8);
        builder.version = version;
        let data = builder.build();
        let mut cursor = BinaryCursor::new(&data);
        match parse_header(&mut cursor) {
            Err(AdvError::UnsupportedVersion { version: v }) => assert_eq!(v, version),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }
}

#[test]
fn test_truncated_mid_header() {
    let mut builder = AdvBuilder::new(4, 4, 8);
    builder.system_tags = tags(&[("KEY", "VALUE")]);
    let data = builder.build();

    // Inside the fixed preamble, and inside the system tags.
    for cut in [6usize, 20, 38, 44] {
        let mut cursor = BinaryCursor::new(&data[..cut]);
        match parse_header(&mut cursor) {
            Err(AdvError::TruncatedData { .. }) => {}
            other => panic!("cut at {cut}: expected TruncatedData, got {other:?}"),
        }
    }
}

#[test]
fn test_zero_dimensions_rejected() {
    let data = AdvBuilder::new(0, 4, 8).build();
    let mut cursor = BinaryCursor::new(&data);
    assert!(matches!(
        parse_header(&mut cursor),
        Err(AdvError::InvalidDimensions { width: 0, height: 4 })
    ));
}

#[test]
fn test_index_offset_after_data_offset_is_corrupt() {
    let mut data = AdvBuilder::new(2, 2, 8).with_main_samples(&[1, 2, 3, 4]).build();
    let data_offset = u64::from_le_bytes(
        data[common::DATA_OFFSET_FIELD..common::DATA_OFFSET_FIELD + 8]
            .try_into()
            .unwrap(),
    );
    data[common::INDEX_OFFSET_FIELD..common::INDEX_OFFSET_FIELD + 8]
        .copy_from_slice(&(data_offset + 1).to_le_bytes());

    let mut cursor = BinaryCursor::new(&data);
    assert!(matches!(
        parse_header(&mut cursor),
        Err(AdvError::CorruptStructure { .. })
    ));
}

#[test]
fn test_invalid_bits_per_pixel() {
    for bpp in [0u8, 33] {
        let data = AdvBuilder::new(2, 2, bpp).build();
        let file = write_test_adv(&data);
        match AdvSession::open_path(file.path()) {
            Err(AdvError::InvalidLayout { layout_id, .. }) => assert_eq!(layout_id, 1),
            Err(other) => panic!("bpp {bpp}: expected InvalidLayout, got {other:?}"),
            Ok(_) => panic!("bpp {bpp}: expected InvalidLayout"),
        }
    }
}

#[test]
fn test_non_positive_clock_frequency_is_corrupt() {
    let mut builder = AdvBuilder::new(2, 2, 8);
    builder.main.clock_frequency = 0;
    let data = builder.build();
    let mut cursor = BinaryCursor::new(&data);
    let header = parse_header(&mut cursor).unwrap();
    assert!(matches!(
        StreamDefinitionTable::read(&mut cursor, &header.info),
        Err(AdvError::CorruptStructure { .. })
    ));
}

#[test]
fn test_zero_layouts_is_corrupt() {
    let mut builder = AdvBuilder::new(2, 2, 8);
    builder.layouts.clear();
    let data = builder.build();
    let mut cursor = BinaryCursor::new(&data);
    match parse_header(&mut cursor) {
        Err(AdvError::CorruptStructure { reason, .. }) => {
            assert!(reason.contains("layout"), "got: {reason}");
        }
        other => panic!("expected CorruptStructure, got {other:?}"),
    }
}

#[test]
fn test_calibration_count_without_flag_is_corrupt() {
    let mut data = AdvBuilder::new(2, 2, 8).build();
    // Calibration frame count field; the calibration flag stays clear.
    data[18..22].copy_from_slice(&3u32.to_le_bytes());
    let mut cursor = BinaryCursor::new(&data);
    match parse_header(&mut cursor) {
        Err(AdvError::CorruptStructure { offset, .. }) => assert_eq!(offset, 18),
        other => panic!("expected CorruptStructure, got {other:?}"),
    }
}

#[test]
fn test_data_offset_past_eof_is_truncated() {
    let mut data = AdvBuilder::new(2, 2, 8).with_main_samples(&[1, 2, 3, 4]).build();
    let past_end = data.len() as u64 + 10;
    data[common::DATA_OFFSET_FIELD..common::DATA_OFFSET_FIELD + 8]
        .copy_from_slice(&past_end.to_le_bytes());
    let mut cursor = BinaryCursor::new(&data);
    match parse_header(&mut cursor) {
        Err(AdvError::TruncatedData { requested, .. }) => assert_eq!(requested, 10),
        other => panic!("expected TruncatedData, got {other:?}"),
    }
}
