// Serial input path for pose commands
//
// Provides:
// - Line framing of the raw byte stream
// - "<roll>,<pitch>,<height>" frame parsing
// - Per-axis exponential smoothing
// - Publication of the smoothed pose to the control loop

pub mod filter;
pub mod frame;
pub mod parser;
pub mod serial;

use tracing::{error, info, trace};

pub use filter::InputFilter;
pub use frame::{FRAME_CAPACITY, FrameAssembler};
pub use parser::{ParseError, parse_pose};
pub use serial::{ByteSource, SerialSource};

use crate::error::InputError;
use crate::messages::FilteredPose;
use crate::pose::PosePublisher;

/// Bytes requested per serial read
pub const READ_CHUNK: usize = 256;

/// Owns the framing and filter state of the input path
pub struct InputPipeline {
    assembler: FrameAssembler,
    filter: InputFilter,
    publisher: PosePublisher,
}

impl InputPipeline {
    pub fn new(alpha: f32, publisher: PosePublisher) -> Self {
        Self {
            assembler: FrameAssembler::new(),
            filter: InputFilter::new(alpha),
            publisher,
        }
    }

    /// Feed raw bytes. Each valid frame updates the filter and publishes the
    /// new pose; malformed frames are dropped. Returns the number accepted.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            let Some(frame) = self.assembler.push(byte) else {
                continue;
            };
            match parse_pose(frame) {
                Ok(cmd) => {
                    let pose = self.filter.update(&cmd);
                    self.publisher.publish(pose);
                    accepted += 1;
                }
                Err(e) => trace!("Dropping frame: {}", e),
            }
        }
        accepted
    }

    pub fn filtered(&self) -> FilteredPose {
        self.filter.state()
    }

    /// Blocking read loop; returns only when the source fails
    pub fn run<S: ByteSource>(mut self, mut source: S) -> Result<(), InputError> {
        info!("Input path started");
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match source.read_available(&mut buf) {
                Ok(n) => {
                    self.feed(&buf[..n]);
                }
                Err(e) => {
                    error!("Serial input failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
