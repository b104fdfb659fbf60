use anyhow::Result;
use std::collections::HashMap;

/// Key under which the committed mapping index is stored.
pub const KEY_MAPPING_INDEX: &str = "mapping_index";
/// Keys under which the calibration offset components are stored.
pub const KEY_CALIB_X: &str = "calib_x";
pub const KEY_CALIB_Y: &str = "calib_y";
pub const KEY_CALIB_Z: &str = "calib_z";
pub const KEY_CALIB_W: &str = "calib_w";

/// Key-value persistence port for the committed mapping and calibration.
///
/// Reads are infallible (a missing key is simply `None`). Writes may fail;
/// callers treat failure as non-fatal and keep the in-memory state
/// authoritative for the rest of the run.
pub trait PrefsStore {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn get_float(&self, key: &str) -> Option<f32>;
    fn set_int(&mut self, key: &str, value: i64) -> Result<()>;
    fn set_float(&mut self, key: &str, value: f32) -> Result<()>;
}

impl<P: PrefsStore + ?Sized> PrefsStore for &mut P {
    fn get_int(&self, key: &str) -> Option<i64> {
        (**self).get_int(key)
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        (**self).get_float(key)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        (**self).set_int(key, value)
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<()> {
        (**self).set_float(key, value)
    }
}

/// In-memory store for tests and embeddings that need no durable state.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    ints: HashMap<String, i64>,
    floats: HashMap<String, f32>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefsStore for MemoryPrefs {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        self.floats.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.ints.insert(key.to_string(), value);
        Ok(())
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<()> {
        self.floats.insert(key.to_string(), value);
        Ok(())
    }
}
