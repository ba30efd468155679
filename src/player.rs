//! Stream playback: decode, swap, pace.
//!
//! The same loop backs the CLI `play` command and tests: pull a frame into
//! the offscreen canvas, trade it in on vsync, then hold it on screen for
//! the recorded duration. Rewinding the reader at end-of-stream gives
//! multi-pass and infinite playback.

use std::io::{Read, Seek};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{LedgridError, LedgridResult};
use crate::exchange::BufferExchange;
use crate::stream::StreamReader;

/// How many passes over the stream to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCount {
    Count(u64),
    Forever,
}

impl FromStr for LoopCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("forever") {
            return Ok(LoopCount::Forever);
        }
        s.parse::<u64>()
            .map(LoopCount::Count)
            .map_err(|_| format!("expected a loop count or 'forever', got '{s}'"))
    }
}

/// What a playback run got through before returning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayStats {
    pub frames_shown: u64,
    pub loops_completed: u64,
}

/// Replay `reader` against the display behind `exchange`.
///
/// Pre-flights the stream geometry against the display and fails fast with
/// `GeometryMismatch`. A zero hold time imposes no pacing beyond the vsync
/// block itself. Returns the accumulated stats when the requested loops
/// finish, when the stream turns out to be empty, or cleanly (not as an
/// error) when the display shuts down mid-playback.
pub fn play<R: Read + Seek>(
    reader: &mut StreamReader<R>,
    exchange: &mut BufferExchange,
    loops: LoopCount,
) -> LedgridResult<PlayStats> {
    let mut offscreen = exchange.create_offscreen();
    reader.check_header(&offscreen)?;

    let mut stats = PlayStats::default();
    loop {
        match reader.next_frame(&mut offscreen)? {
            Some(hold_time_us) => {
                offscreen = match exchange.swap_on_vsync(offscreen) {
                    Ok(previous) => previous,
                    Err(LedgridError::ShuttingDown) => {
                        debug!(?stats, "display shut down mid-playback");
                        return Ok(stats);
                    }
                    Err(e) => return Err(e),
                };
                stats.frames_shown += 1;
                if hold_time_us > 0 {
                    thread::sleep(Duration::from_micros(u64::from(hold_time_us)));
                }
            }
            None => {
                stats.loops_completed += 1;
                let finished = match loops {
                    LoopCount::Forever => false,
                    LoopCount::Count(n) => stats.loops_completed >= n,
                };
                // An empty stream would loop forever without ever blocking.
                if finished || stats.frames_shown == 0 {
                    debug!(?stats, "playback finished");
                    return Ok(stats);
                }
                reader.rewind()?;
            }
        }
    }
}
