//! Image stack metadata and selection data structures

/// Geometry and time calibration of a (hyper)stack
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackMetadata {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of time points
    pub frame_count: u32,
    /// Number of channels
    pub channel_count: u32,
    /// Number of z-slices
    pub slice_count: u32,
    /// Time between consecutive frames, in `time_unit`
    pub frame_interval: f64,
    /// Calibration unit token, e.g. "s" or "min"
    pub time_unit: String,
}

impl StackMetadata {
    /// Creates metadata for a single-channel, single-slice time series
    pub fn new(
        width: u32,
        height: u32,
        frame_count: u32,
        frame_interval: f64,
        time_unit: impl Into<String>,
    ) -> Self {
        Self {
            width,
            height,
            frame_count,
            channel_count: 1,
            slice_count: 1,
            frame_interval,
            time_unit: time_unit.into(),
        }
    }

    /// Sets the channel and slice counts of a hyperstack
    pub fn with_hyperstack(mut self, channel_count: u32, slice_count: u32) -> Self {
        self.channel_count = channel_count;
        self.slice_count = slice_count;
        self
    }

    /// 1-based index of a (channel, slice, frame) position in the flat stack.
    ///
    /// Channels vary fastest, then slices, then frames.
    pub fn stack_index(&self, position: StackPosition) -> u32 {
        let channels = self.channel_count.max(1);
        let slices = self.slice_count.max(1);
        position.frame.saturating_sub(1) * channels * slices
            + position.slice.saturating_sub(1) * channels
            + position.channel
    }

    /// Checks that a 1-based position lies inside the hyperstack
    pub fn contains(&self, position: StackPosition) -> bool {
        (1..=self.channel_count.max(1)).contains(&position.channel)
            && (1..=self.slice_count.max(1)).contains(&position.slice)
            && (1..=self.frame_count).contains(&position.frame)
    }
}

/// A 1-based (channel, slice, frame) position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackPosition {
    pub channel: u32,
    pub slice: u32,
    pub frame: u32,
}

impl StackPosition {
    pub fn new(channel: u32, slice: u32, frame: u32) -> Self {
        Self {
            channel,
            slice,
            frame,
        }
    }
}

/// User selection on the image. Only the origin is used for anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionOfInterest {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RegionOfInterest {
    /// Creates a selection from its bounding box
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a selection known only by its top-left corner
    pub fn at(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_index_order() {
        let meta = StackMetadata::new(64, 64, 4, 1.0, "s").with_hyperstack(2, 3);
        assert_eq!(meta.stack_index(StackPosition::new(1, 1, 1)), 1);
        assert_eq!(meta.stack_index(StackPosition::new(2, 1, 1)), 2);
        assert_eq!(meta.stack_index(StackPosition::new(1, 2, 1)), 3);
        assert_eq!(meta.stack_index(StackPosition::new(1, 1, 2)), 7);
        assert_eq!(meta.stack_index(StackPosition::new(2, 3, 4)), 24);
    }

    #[test]
    fn test_contains() {
        let meta = StackMetadata::new(64, 64, 4, 1.0, "s").with_hyperstack(2, 1);
        assert!(meta.contains(StackPosition::new(2, 1, 4)));
        assert!(!meta.contains(StackPosition::new(3, 1, 1)));
        assert!(!meta.contains(StackPosition::new(1, 1, 0)));
        assert!(!meta.contains(StackPosition::new(1, 1, 5)));
    }
}
