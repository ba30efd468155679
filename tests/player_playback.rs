use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use ledgrid::{
    Color, Geometry, LedgridError, LoopCount, PixelCanvas, StreamReader, StreamWriter,
    TerminalEmulator, pair, play,
};

fn recorded_stream(geometry: Geometry, frames: u8) -> Cursor<Vec<u8>> {
    let mut writer = StreamWriter::new(Vec::new(), geometry).unwrap();
    let mut canvas = PixelCanvas::with_geometry(geometry);
    for i in 0..frames {
        canvas.fill(Color::new(i + 1, 0, 0));
        // Tiny hold times keep the pacing real but the test fast.
        writer.append_frame(&canvas, 500).unwrap();
    }
    Cursor::new(writer.into_inner().unwrap())
}

#[test]
fn plays_the_requested_number_of_loops() {
    let geometry = Geometry::new(4, 4).unwrap();
    let mut reader = StreamReader::new(recorded_stream(geometry, 3)).unwrap();

    let (mut exchange, driver) = pair(geometry);
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let pump = thread::spawn(move || {
        while !stop_flag.load(Ordering::Relaxed) {
            driver.scan_out(|_| ());
            thread::sleep(Duration::from_micros(100));
        }
    });

    let stats = play(&mut reader, &mut exchange, LoopCount::Count(2)).unwrap();
    assert_eq!(stats.frames_shown, 6);
    assert_eq!(stats.loops_completed, 2);

    // The last frame of the last loop is what stays on screen.
    let shown = exchange.with_active(|c| c.pixel(0, 0)).unwrap();
    assert_eq!(shown, Some(Color::new(3, 0, 0)));

    stop.store(true, Ordering::Relaxed);
    pump.join().unwrap();
}

#[test]
fn playback_through_the_terminal_emulator() {
    let geometry = Geometry::new(4, 4).unwrap();
    let mut reader = StreamReader::new(recorded_stream(geometry, 3)).unwrap();

    let (mut exchange, driver) = pair(geometry);
    let emulator = TerminalEmulator::spawn(driver, std::io::sink(), 500);

    let stats = play(&mut reader, &mut exchange, LoopCount::Count(1)).unwrap();
    assert_eq!(stats.frames_shown, 3);
    assert_eq!(stats.loops_completed, 1);

    emulator.stop();
    // Emulator teardown also tears down the exchange.
    assert!(matches!(
        exchange.with_active(|_| ()),
        Err(LedgridError::ShuttingDown)
    ));
}

#[test]
fn geometry_mismatch_fails_before_any_frame_shows() {
    let mut reader =
        StreamReader::new(recorded_stream(Geometry::new(4, 4).unwrap(), 2)).unwrap();
    let (mut exchange, _driver) = pair(Geometry::new(8, 8).unwrap());

    assert!(matches!(
        play(&mut reader, &mut exchange, LoopCount::Count(1)),
        Err(LedgridError::GeometryMismatch { .. })
    ));
}

#[test]
fn empty_stream_finishes_instead_of_spinning() {
    let geometry = Geometry::new(4, 4).unwrap();
    let mut reader = StreamReader::new(recorded_stream(geometry, 0)).unwrap();
    let (mut exchange, _driver) = pair(geometry);

    let stats = play(&mut reader, &mut exchange, LoopCount::Forever).unwrap();
    assert_eq!(stats.frames_shown, 0);
}

#[test]
fn shutdown_mid_playback_returns_partial_stats() {
    let geometry = Geometry::new(4, 4).unwrap();
    let mut reader = StreamReader::new(recorded_stream(geometry, 3)).unwrap();

    let (mut exchange, driver) = pair(geometry);
    // Complete exactly one swap, then tear down.
    let pump = thread::spawn(move || {
        let mut swapped = false;
        for _ in 0..10_000 {
            driver.scan_out(|canvas| {
                if canvas.pixel(0, 0) != Some(Color::BLACK) {
                    swapped = true;
                }
            });
            if swapped {
                break;
            }
            thread::sleep(Duration::from_micros(100));
        }
        drop(driver);
    });

    let stats = play(&mut reader, &mut exchange, LoopCount::Forever).unwrap();
    assert!(stats.frames_shown >= 1);
    pump.join().unwrap();
}
