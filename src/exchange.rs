//! Double-buffer ownership hand-off between the drawing side and the
//! display refresh side.
//!
//! [`pair`] builds the two halves around shared state. The application draws
//! into an offscreen [`PixelCanvas`] and trades it for the displayed one
//! through [`BufferExchange::swap_on_vsync`]; the hardware (or emulator)
//! refresh loop repeatedly calls [`RefreshDriver::scan_out`], which shows
//! the active canvas and completes any pending swap at that refresh
//! boundary. Canvases move through these calls, so exactly one owner ever
//! touches a given buffer's pixels and no locking of pixel data is needed
//! beyond the brief state hand-off.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::canvas::PixelCanvas;
use crate::error::{LedgridError, LedgridResult};
use crate::foundation::Geometry;

struct ExchangeState {
    active: PixelCanvas,
    /// Parked by the producer, waiting for the next refresh boundary.
    pending: Option<PixelCanvas>,
    /// Previous active canvas, waiting for the blocked producer to collect.
    returned: Option<PixelCanvas>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<ExchangeState>,
    vsync: Condvar,
    brightness: AtomicU8,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ExchangeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build a connected exchange for a display of `geometry`.
///
/// The [`BufferExchange`] goes to the application; the [`RefreshDriver`] is
/// handed to whatever runs the refresh loop (hardware driver, emulator, or
/// a test pump). Dropping the driver half tears the exchange down.
pub fn pair(geometry: Geometry) -> (BufferExchange, RefreshDriver) {
    let shared = Arc::new(Shared {
        state: Mutex::new(ExchangeState {
            active: PixelCanvas::with_geometry(geometry),
            pending: None,
            returned: None,
            shutdown: false,
        }),
        vsync: Condvar::new(),
        brightness: AtomicU8::new(255),
    });
    (
        BufferExchange {
            shared: shared.clone(),
            geometry,
        },
        RefreshDriver { shared, geometry },
    )
}

/// Application half of the exchange: allocate offscreen canvases, swap them
/// in on vsync, and adjust brightness.
pub struct BufferExchange {
    shared: Arc<Shared>,
    geometry: Geometry,
}

impl BufferExchange {
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// A fresh black canvas of the display geometry, owned by the caller.
    pub fn create_offscreen(&self) -> PixelCanvas {
        PixelCanvas::with_geometry(self.geometry)
    }

    /// Hand `offscreen` to the display and get the previously shown canvas
    /// back for reuse.
    ///
    /// Blocks until the refresh side passes its next vsync boundary. After
    /// the call the passed canvas belongs to the display; keep drawing on
    /// the returned one instead. Fails with `GeometryMismatch` (no swap
    /// performed) on a size disagreement, and with `ShuttingDown` if the
    /// driver half is torn down before or while waiting.
    pub fn swap_on_vsync(&mut self, offscreen: PixelCanvas) -> LedgridResult<PixelCanvas> {
        if offscreen.size() != self.geometry {
            return Err(LedgridError::geometry_mismatch(
                self.geometry,
                offscreen.size(),
            ));
        }

        let mut state = self.shared.lock();
        if state.shutdown {
            return Err(LedgridError::ShuttingDown);
        }
        state.pending = Some(offscreen);
        loop {
            state = self
                .shared
                .vsync
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = state.returned.take() {
                return Ok(previous);
            }
            if state.shutdown {
                state.pending = None;
                return Err(LedgridError::ShuttingDown);
            }
        }
    }

    /// Run `f` against the canvas currently being displayed.
    ///
    /// Changes land on the live buffer immediately, outside the vsync
    /// hand-off; the normal flow is [`swap_on_vsync`](Self::swap_on_vsync),
    /// this is the escape hatch for advanced use.
    pub fn with_active<T>(&mut self, f: impl FnOnce(&mut PixelCanvas) -> T) -> LedgridResult<T> {
        let mut state = self.shared.lock();
        if state.shutdown {
            return Err(LedgridError::ShuttingDown);
        }
        Ok(f(&mut state.active))
    }

    /// Current value of the opaque brightness property (0–255).
    pub fn brightness(&self) -> u8 {
        self.shared.brightness.load(Ordering::Relaxed)
    }

    /// Set the opaque brightness property; the refresh side picks it up on
    /// its next pass.
    pub fn set_brightness(&self, value: u8) {
        self.shared.brightness.store(value, Ordering::Relaxed);
    }
}

/// Refresh-loop half of the exchange, consumed by the hardware driver or an
/// emulator.
///
/// Dropping it (or calling [`shutdown`](Self::shutdown)) wakes any blocked
/// [`BufferExchange::swap_on_vsync`] with `ShuttingDown`.
pub struct RefreshDriver {
    shared: Arc<Shared>,
    geometry: Geometry,
}

impl RefreshDriver {
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Run one refresh pass: show the active canvas via `f`, then complete
    /// a pending swap at this vsync boundary and wake the producer.
    pub fn scan_out<T>(&self, f: impl FnOnce(&PixelCanvas) -> T) -> T {
        let mut state = self.shared.lock();
        let shown = f(&state.active);
        if let Some(next) = state.pending.take() {
            let previous = std::mem::replace(&mut state.active, next);
            state.returned = Some(previous);
            self.shared.vsync.notify_all();
        }
        shown
    }

    /// Read side of the opaque brightness property.
    pub fn brightness(&self) -> u8 {
        self.shared.brightness.load(Ordering::Relaxed)
    }

    /// Tear down the exchange. Idempotent; also runs on drop.
    pub fn shutdown(&self) {
        let mut state = self.shared.lock();
        if !state.shutdown {
            state.shutdown = true;
            debug!("buffer exchange shutting down");
        }
        self.shared.vsync.notify_all();
    }
}

impl Drop for RefreshDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Color;

    fn geometry() -> Geometry {
        Geometry::new(4, 4).unwrap()
    }

    #[test]
    fn offscreen_canvases_match_display_geometry() {
        let (exchange, _driver) = pair(geometry());
        assert_eq!(exchange.create_offscreen().size(), geometry());
        assert_eq!(exchange.geometry(), geometry());
    }

    #[test]
    fn mismatched_swap_fails_without_swapping() {
        let (mut exchange, driver) = pair(geometry());
        let wrong = PixelCanvas::new(2, 2).unwrap();
        assert!(matches!(
            exchange.swap_on_vsync(wrong),
            Err(LedgridError::GeometryMismatch { .. })
        ));
        // Nothing pending: a scan-out completes no swap.
        driver.scan_out(|active| assert_eq!(active.size(), geometry()));
    }

    #[test]
    fn with_active_writes_are_visible_to_scan_out() {
        let (mut exchange, driver) = pair(geometry());
        exchange
            .with_active(|canvas| canvas.set_pixel(1, 1, Color::WHITE))
            .unwrap();
        let seen = driver.scan_out(|active| active.pixel(1, 1));
        assert_eq!(seen, Some(Color::WHITE));
    }

    #[test]
    fn swap_after_shutdown_is_shutting_down() {
        let (mut exchange, driver) = pair(geometry());
        driver.shutdown();
        let offscreen = exchange.create_offscreen();
        assert!(matches!(
            exchange.swap_on_vsync(offscreen),
            Err(LedgridError::ShuttingDown)
        ));
        assert!(matches!(
            exchange.with_active(|_| ()),
            Err(LedgridError::ShuttingDown)
        ));
    }

    #[test]
    fn shutdown_survives_driver_drop_and_is_idempotent() {
        let (mut exchange, driver) = pair(geometry());
        driver.shutdown();
        drop(driver);
        assert!(matches!(
            exchange.with_active(|_| ()),
            Err(LedgridError::ShuttingDown)
        ));
    }

    #[test]
    fn brightness_is_shared_between_halves() {
        let (exchange, driver) = pair(geometry());
        assert_eq!(exchange.brightness(), 255);
        exchange.set_brightness(42);
        assert_eq!(driver.brightness(), 42);
        assert_eq!(exchange.brightness(), 42);
    }
}
