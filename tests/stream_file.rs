use std::path::PathBuf;

use ledgrid::{Color, Geometry, LedgridError, PixelCanvas, StreamReader, StreamWriter};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "ledgrid_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame_with_tag(geometry: Geometry, tag: u8) -> PixelCanvas {
    let mut c = PixelCanvas::with_geometry(geometry);
    c.fill(Color::new(tag, tag, tag));
    c.set_pixel(0, 0, Color::new(tag, 0, 0));
    c
}

#[test]
fn record_reopen_replay_rewind() {
    let path = temp_path("roundtrip");
    let geometry = Geometry::new(4, 4).unwrap();

    let mut writer = StreamWriter::create(&path, geometry).unwrap();
    writer.append_frame(&frame_with_tag(geometry, 1), 100).unwrap();
    writer.append_frame(&frame_with_tag(geometry, 2), 200).unwrap();
    drop(writer);

    let mut reader = StreamReader::open(&path).unwrap();
    assert_eq!(reader.geometry(), geometry);

    let mut frame = PixelCanvas::with_geometry(geometry);
    reader.check_header(&frame).unwrap();

    assert_eq!(reader.next_frame(&mut frame).unwrap(), Some(100));
    assert_eq!(frame, frame_with_tag(geometry, 1));
    assert_eq!(reader.next_frame(&mut frame).unwrap(), Some(200));
    assert_eq!(frame, frame_with_tag(geometry, 2));
    assert_eq!(reader.next_frame(&mut frame).unwrap(), None);

    reader.rewind().unwrap();
    assert_eq!(reader.next_frame(&mut frame).unwrap(), Some(100));
    assert_eq!(frame, frame_with_tag(geometry, 1));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn rewound_pass_reproduces_the_first_pass_exactly() {
    let path = temp_path("two_pass");
    let geometry = Geometry::new(3, 5).unwrap();

    let mut writer = StreamWriter::create(&path, geometry).unwrap();
    for (tag, hold) in [(10u8, 1_000u32), (20, 0), (30, 33_000)] {
        writer.append_frame(&frame_with_tag(geometry, tag), hold).unwrap();
    }
    drop(writer);

    let mut reader = StreamReader::open(&path).unwrap();
    let mut frame = PixelCanvas::with_geometry(geometry);

    let mut first_pass = Vec::new();
    while let Some(hold) = reader.next_frame(&mut frame).unwrap() {
        first_pass.push((frame.clone(), hold));
    }
    assert_eq!(first_pass.len(), 3);

    reader.rewind().unwrap();
    let mut second_pass = Vec::new();
    while let Some(hold) = reader.next_frame(&mut frame).unwrap() {
        second_pass.push((frame.clone(), hold));
    }
    assert_eq!(first_pass, second_pass);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn mismatched_append_leaves_the_file_unchanged() {
    let path = temp_path("mismatch");
    let geometry = Geometry::new(4, 4).unwrap();

    let mut writer = StreamWriter::create(&path, geometry).unwrap();
    writer.append_frame(&frame_with_tag(geometry, 1), 50).unwrap();

    let wrong = PixelCanvas::new(5, 4).unwrap();
    assert!(matches!(
        writer.append_frame(&wrong, 50),
        Err(LedgridError::GeometryMismatch { .. })
    ));
    drop(writer);

    let expected_len = 12 + (4 + geometry.byte_len()) as u64;
    assert_eq!(std::fs::metadata(&path).unwrap().len(), expected_len);

    // And the single complete record still replays.
    let mut reader = StreamReader::open(&path).unwrap();
    let mut frame = PixelCanvas::with_geometry(geometry);
    assert_eq!(reader.next_frame(&mut frame).unwrap(), Some(50));
    assert_eq!(reader.next_frame(&mut frame).unwrap(), None);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn crash_truncated_file_replays_complete_records() {
    let path = temp_path("truncated");
    let geometry = Geometry::new(4, 4).unwrap();

    let mut writer = StreamWriter::create(&path, geometry).unwrap();
    writer.append_frame(&frame_with_tag(geometry, 1), 100).unwrap();
    writer.append_frame(&frame_with_tag(geometry, 2), 200).unwrap();
    drop(writer);

    // Simulate a crash mid-append of the second record.
    let full = std::fs::read(&path).unwrap();
    std::fs::write(&path, &full[..full.len() - 7]).unwrap();

    let mut reader = StreamReader::open(&path).unwrap();
    let mut frame = PixelCanvas::with_geometry(geometry);
    assert_eq!(reader.next_frame(&mut frame).unwrap(), Some(100));
    assert_eq!(frame, frame_with_tag(geometry, 1));
    assert_eq!(reader.next_frame(&mut frame).unwrap(), None);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn non_stream_file_is_invalid_format() {
    let path = temp_path("not_a_stream");
    std::fs::write(&path, b"PNG or whatever this is, not a stream").unwrap();

    assert!(matches!(
        StreamReader::open(&path),
        Err(LedgridError::InvalidFormat(_))
    ));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_io_error() {
    assert!(matches!(
        StreamReader::open(temp_path("does_not_exist")),
        Err(LedgridError::Io(_))
    ));
}
