//! The content-stream codec: record and replay sequences of pre-rendered
//! frames with per-frame hold times.
//!
//! Layout (all integers little-endian, bit-exact for interoperability):
//!
//! ```text
//! header:  magic u32 | width u32 | height u32
//! record:  hold_time_us u32 | width*height packed RGB triples, row-major
//! ```
//!
//! There is no trailer or frame count; the reader detects end-of-stream by
//! hitting EOF where a record should start. A truncated trailing record
//! (crash during append) is treated as end-of-stream too, so previously
//! appended complete records always replay.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::canvas::PixelCanvas;
use crate::error::{LedgridError, LedgridResult};
use crate::foundation::Geometry;

/// Sentinel identifying the stream format (and catching endian confusion).
pub const STREAM_MAGIC: u32 = 0xED0C_5A48;

const HEADER_LEN: u64 = 12;

/// Appends frames of a fixed geometry to any byte sink.
///
/// Open a file-backed writer with [`StreamWriter::create`], or write to
/// memory through a `Vec<u8>` sink for tests and tooling.
pub struct StreamWriter<W: Write> {
    sink: W,
    geometry: Geometry,
    record: Vec<u8>,
}

impl StreamWriter<BufWriter<File>> {
    /// Create (truncating) a stream file and write its header.
    pub fn create(path: impl AsRef<Path>, geometry: Geometry) -> LedgridResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), geometry)
    }
}

impl<W: Write> StreamWriter<W> {
    /// Write the stream header for `geometry` and return the writer.
    pub fn new(mut sink: W, geometry: Geometry) -> LedgridResult<Self> {
        let mut header = [0u8; HEADER_LEN as usize];
        header[0..4].copy_from_slice(&STREAM_MAGIC.to_le_bytes());
        header[4..8].copy_from_slice(&geometry.width.to_le_bytes());
        header[8..12].copy_from_slice(&geometry.height.to_le_bytes());
        sink.write_all(&header)?;
        sink.flush()?;
        Ok(Self {
            record: Vec::with_capacity(4 + geometry.byte_len()),
            sink,
            geometry,
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Append one frame snapshot with its hold time.
    ///
    /// Fails with `GeometryMismatch` before touching the sink when `frame`
    /// does not match the declared geometry. The record is assembled in
    /// memory and written in one flushed `write_all`, so earlier records
    /// survive a failure mid-append.
    pub fn append_frame(&mut self, frame: &PixelCanvas, hold_time_us: u32) -> LedgridResult<()> {
        if frame.size() != self.geometry {
            return Err(LedgridError::geometry_mismatch(self.geometry, frame.size()));
        }
        self.record.clear();
        self.record.extend_from_slice(&hold_time_us.to_le_bytes());
        self.record.extend_from_slice(frame.as_bytes());
        self.sink.write_all(&self.record)?;
        self.sink.flush()?;
        debug!(hold_time_us, "appended stream frame");
        Ok(())
    }

    /// Flush and hand back the underlying sink.
    pub fn into_inner(mut self) -> LedgridResult<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Sequential reader over a recorded stream, with rewind for looping.
///
/// A reader belongs to exactly one playback loop; every decode takes
/// `&mut self`, so concurrent `next_frame` calls are ruled out by the
/// borrow checker rather than internal locking.
pub struct StreamReader<R: Read + Seek> {
    source: R,
    geometry: Geometry,
    scratch: Vec<u8>,
}

impl StreamReader<BufReader<File>> {
    /// Open a stream file and validate its header.
    pub fn open(path: impl AsRef<Path>) -> LedgridResult<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> StreamReader<R> {
    /// Validate the magic value and read the declared geometry.
    pub fn new(mut source: R) -> LedgridResult<Self> {
        source.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; HEADER_LEN as usize];
        if !matches!(read_full(&mut source, &mut header)?, Fill::Complete) {
            return Err(LedgridError::invalid_format(
                "stream shorter than its header",
            ));
        }
        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if magic != STREAM_MAGIC {
            return Err(LedgridError::invalid_format(format!(
                "bad magic 0x{magic:08x}, expected 0x{STREAM_MAGIC:08x}"
            )));
        }
        let width = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let height = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        let geometry = Geometry::new(width, height).map_err(|_| {
            LedgridError::invalid_format(format!("stream declares {width}x{height} geometry"))
        })?;
        Ok(Self {
            scratch: vec![0; geometry.byte_len()],
            source,
            geometry,
        })
    }

    /// The geometry every record in this stream was written with.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Pre-flight check that `frame` can receive records from this stream,
    /// so callers fail fast instead of mid-playback.
    pub fn check_header(&self, frame: &PixelCanvas) -> LedgridResult<()> {
        if frame.size() != self.geometry {
            return Err(LedgridError::geometry_mismatch(self.geometry, frame.size()));
        }
        Ok(())
    }

    /// Decode the next record into `frame` in place and return its hold
    /// time, or `Ok(None)` at end-of-stream.
    ///
    /// A truncated trailing record also ends the stream cleanly (logged
    /// once per encounter), matching the append crash-tolerance contract.
    pub fn next_frame(&mut self, frame: &mut PixelCanvas) -> LedgridResult<Option<u32>> {
        self.check_header(frame)?;

        let mut hold = [0u8; 4];
        match read_full(&mut self.source, &mut hold)? {
            Fill::Complete => {}
            Fill::Eof { read: 0 } => return Ok(None),
            Fill::Eof { .. } => {
                warn!("ignoring truncated record header at end of stream");
                return Ok(None);
            }
        }
        match read_full(&mut self.source, &mut self.scratch)? {
            Fill::Complete => {}
            Fill::Eof { .. } => {
                warn!("ignoring truncated trailing frame at end of stream");
                return Ok(None);
            }
        }
        frame.copy_from_bytes(&self.scratch)?;
        Ok(Some(u32::from_le_bytes(hold)))
    }

    /// Reposition to the first record; the next [`next_frame`] replays the
    /// stream from the start. This is the loop primitive for infinite
    /// playback.
    ///
    /// [`next_frame`]: Self::next_frame
    pub fn rewind(&mut self) -> LedgridResult<()> {
        self.source.seek(SeekFrom::Start(HEADER_LEN))?;
        Ok(())
    }
}

enum Fill {
    Complete,
    Eof { read: usize },
}

/// Read exactly `buf.len()` bytes, retrying short reads; reports how much
/// arrived when EOF cuts the fill short.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<Fill> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => return Ok(Fill::Eof { read: filled }),
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(Fill::Complete)
}
