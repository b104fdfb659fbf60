use glam::Quat;

/// Calibrated orientation published to the consumer.
#[derive(Debug, Clone, Copy)]
pub struct Orientation {
    /// Rotation relative to the calibrated zero pose.
    pub quaternion: Quat,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            quaternion: Quat::IDENTITY,
        }
    }
}
