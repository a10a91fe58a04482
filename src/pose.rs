// Single-producer/single-consumer hand-off of the filtered pose.
//
// The input path publishes a whole `FilteredPose` value at once; the control
// path copies the latest value out. A reader never sees a mix of axes from
// two different updates.

use tokio::sync::watch;

use crate::messages::FilteredPose;

pub fn pose_channel(initial: FilteredPose) -> (PosePublisher, PoseReader) {
    let (tx, rx) = watch::channel(initial);
    (PosePublisher { tx }, PoseReader { rx })
}

pub struct PosePublisher {
    tx: watch::Sender<FilteredPose>,
}

impl PosePublisher {
    /// Replace the shared pose. Succeeds even if the reader is gone.
    pub fn publish(&self, pose: FilteredPose) {
        self.tx.send_replace(pose);
    }
}

pub struct PoseReader {
    rx: watch::Receiver<FilteredPose>,
}

/// Copy of the shared pose plus whether it changed since the last read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    pub pose: FilteredPose,
    pub fresh: bool,
}

impl PoseReader {
    pub fn snapshot(&mut self) -> PoseSnapshot {
        // Value and freshness come from the same lock acquisition
        let latest = self.rx.borrow_and_update();
        PoseSnapshot {
            pose: *latest,
            fresh: latest.has_changed(),
        }
    }
}
