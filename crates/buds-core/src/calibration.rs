use crate::prefs::{PrefsStore, KEY_CALIB_W, KEY_CALIB_X, KEY_CALIB_Y, KEY_CALIB_Z};
use glam::Quat;
use tracing::{info, warn};

/// Calibration state: either no zero reference yet, or a captured offset.
///
/// The offset is the inverse of the mapped orientation at the moment of
/// calibration, so composing it with that same orientation yields identity:
/// the physical pose at calibration time becomes the logical zero pose.
/// There is no transition back to `Uncalibrated` short of wiping the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calibration {
    Uncalibrated,
    Calibrated { offset: Quat },
}

impl Calibration {
    /// Restore calibration from the store. All four components must be
    /// present; anything less means a first run.
    pub fn load(store: &dyn PrefsStore) -> Self {
        let (Some(x), Some(y), Some(z), Some(w)) = (
            store.get_float(KEY_CALIB_X),
            store.get_float(KEY_CALIB_Y),
            store.get_float(KEY_CALIB_Z),
            store.get_float(KEY_CALIB_W),
        ) else {
            return Self::Uncalibrated;
        };
        info!("Calibration offset restored from saved state");
        Self::Calibrated {
            offset: Quat::from_xyzw(x, y, z, w),
        }
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self, Self::Calibrated { .. })
    }

    /// Capture the current mapped orientation as the zero pose. Calling this
    /// again simply re-zeroes. The offset is saved immediately; a write
    /// failure is non-fatal and the in-memory offset stays authoritative.
    pub fn calibrate(&mut self, last_mapped: Quat, store: &mut dyn PrefsStore) {
        let offset = last_mapped.inverse();
        *self = Self::Calibrated { offset };

        let write = [
            (KEY_CALIB_X, offset.x),
            (KEY_CALIB_Y, offset.y),
            (KEY_CALIB_Z, offset.z),
            (KEY_CALIB_W, offset.w),
        ]
        .into_iter()
        .try_for_each(|(key, value)| store.set_float(key, value));

        match write {
            Ok(()) => info!("Calibration captured and saved"),
            Err(e) => warn!(?e, "Calibration captured but could not be saved"),
        }
    }

    /// Apply the offset as a left-multiplying rotation correction. `None`
    /// while uncalibrated: no output may be delivered.
    pub fn compose(&self, mapped: Quat) -> Option<Quat> {
        match self {
            Self::Uncalibrated => None,
            Self::Calibrated { offset } => Some(*offset * mapped),
        }
    }
}
