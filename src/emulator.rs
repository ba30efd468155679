//! A terminal stand-in for real panel hardware.
//!
//! [`TerminalEmulator`] owns the refresh side of a buffer exchange: a
//! background thread scans the active canvas out as 24-bit ANSI half-block
//! cells at a fixed refresh rate, which doubles as the vsync boundary for
//! [`swap_on_vsync`](crate::exchange::BufferExchange::swap_on_vsync). The
//! brightness property scales the emitted colors the way a panel's PWM
//! brightness would.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::canvas::PixelCanvas;
use crate::exchange::RefreshDriver;
use crate::foundation::Color;

/// Background refresh loop rendering to any `Write` sink (normally stdout).
pub struct TerminalEmulator {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl TerminalEmulator {
    /// Take ownership of `driver` and start refreshing at `refresh_hz`.
    ///
    /// The driver is dropped when the thread exits, which tears down the
    /// exchange and unblocks any waiting swap.
    pub fn spawn<W: Write + Send + 'static>(
        driver: RefreshDriver,
        mut sink: W,
        refresh_hz: u32,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let period = Duration::from_micros(1_000_000 / u64::from(refresh_hz.max(1)));

        let handle = thread::spawn(move || {
            debug!(geometry = %driver.geometry(), refresh_hz, "terminal emulator refresh loop started");
            let mut ansi = String::new();
            // Clear once; afterwards each pass repaints from the home position.
            let mut prefix = "\x1b[2J\x1b[H";
            while !stop_flag.load(Ordering::Relaxed) {
                let brightness = driver.brightness();
                driver.scan_out(|active| render_ansi(&mut ansi, prefix, active, brightness));
                prefix = "\x1b[H";
                if sink
                    .write_all(ansi.as_bytes())
                    .and_then(|()| sink.flush())
                    .is_err()
                {
                    break;
                }
                thread::sleep(period);
            }
            debug!("terminal emulator refresh loop stopped");
        });

        Self {
            handle: Some(handle),
            stop,
        }
    }

    /// Stop the refresh loop and wait for it; tears down the exchange.
    pub fn stop(mut self) {
        self.join();
    }

    fn join(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TerminalEmulator {
    fn drop(&mut self) {
        self.join();
    }
}

/// Paint the canvas as half-block cells: each terminal row carries two
/// pixel rows, upper pixel in the foreground, lower in the background.
fn render_ansi(out: &mut String, prefix: &str, canvas: &PixelCanvas, brightness: u8) {
    out.clear();
    out.push_str(prefix);
    for y in (0..canvas.height() as i32).step_by(2) {
        for x in 0..canvas.width() as i32 {
            let upper = canvas.pixel(x, y).unwrap_or(Color::BLACK).scaled(brightness);
            let lower = canvas
                .pixel(x, y + 1)
                .unwrap_or(Color::BLACK)
                .scaled(brightness);
            let _ = write!(
                out,
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                upper.r, upper.g, upper.b, lower.r, lower.g, lower.b
            );
        }
        out.push_str("\x1b[0m\n");
    }
}
