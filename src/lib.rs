//! ledgrid drives addressable RGB LED matrix panels through a
//! double-buffered rendering model and records/replays pre-rendered
//! animations from a compact binary content-stream format.
//!
//! # Flow
//!
//! 1. **Draw**: get an offscreen [`PixelCanvas`] and mutate it with the
//!    [`draw`] primitives (or decode a frame into it from a
//!    [`StreamReader`]).
//! 2. **Swap**: hand it to [`BufferExchange::swap_on_vsync`], which blocks
//!    until the display's next refresh boundary, shows your canvas and
//!    returns the previously displayed one for reuse.
//! 3. **Record/replay**: snapshot canvases with per-frame hold times into a
//!    stream file via [`StreamWriter`]; replay with [`player::play`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Exclusive ownership**: a canvas always has exactly one owner; swaps
//!   move buffers between the application and the display instead of
//!   sharing pointers, so pixel data needs no locking.
//! - **Clip, don't crash**: per-pixel access outside the canvas is a no-op;
//!   only structural mismatches (geometry, stream format) are errors.
//! - **Hardware behind capabilities**: fonts and the refresh loop are
//!   injected interfaces; the [`emulator`] stands in for real panels.

#![forbid(unsafe_code)]

pub mod canvas;
pub mod draw;
pub mod emulator;
pub mod error;
pub mod exchange;
pub mod foundation;
pub mod options;
pub mod player;
pub mod stream;

pub use canvas::PixelCanvas;
pub use draw::{Font, Glyph, TextOrientation, draw_circle, draw_line, draw_text};
pub use emulator::TerminalEmulator;
pub use error::{LedgridError, LedgridResult};
pub use exchange::{BufferExchange, RefreshDriver, pair};
pub use foundation::{Color, Geometry};
pub use options::{MatrixOptions, OPTIONS_VERSION};
pub use player::{LoopCount, PlayStats, play};
pub use stream::{STREAM_MAGIC, StreamReader, StreamWriter};
