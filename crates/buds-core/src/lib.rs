//! Core pipeline for the Galaxy Buds head-orientation bridge.
//!
//! Raw orientation quaternions from the earbuds arrive in an unknown axis
//! convention relative to the scene, and the wearer's rest pose is unknown
//! relative to the scene's zero. This crate enumerates all 48 plausible axis
//! remappings (6 permutations x 8 sign flips), lets the user cycle through
//! and commit one, and captures a calibration offset that turns the pose at
//! calibration time into the logical zero.
//!
//! # Calibration goes stale when the mapping changes
//!
//! Cycling the mapping does NOT clear an existing calibration. The offset was
//! captured under the previous axis convention, so the output is physically
//! misaligned until the user calibrates again. This is a deliberate tradeoff
//! (simplicity over auto-invalidation); embedders should surface a
//! recalibration hint when the mapping changes.

pub mod calibration;
pub mod mapping;
pub mod prefs;
pub mod processor;
pub mod selector;
pub mod types;

pub use calibration::Calibration;
pub use mapping::{MappingCandidate, MappingCatalog, CANDIDATE_COUNT};
pub use prefs::{MemoryPrefs, PrefsStore};
pub use processor::{OrientationProcessor, OrientationSink, SampleOutcome};
pub use selector::MappingSelector;
pub use types::Orientation;
