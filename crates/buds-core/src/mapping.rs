use glam::Quat;

/// Number of axis-remapping candidates: 6 permutations x 8 sign vectors.
pub const CANDIDATE_COUNT: usize = 48;

/// Destination-slot <- source-axis permutations, in canonical order.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Per-slot sign vectors, in canonical order.
const SIGNS: [[f32; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
];

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Label of the known-good Buds-to-scene convention, used as the
/// out-of-the-box default when no mapping has been committed.
const PREFERRED_LABEL: &str = "(-z, x, -y)";

/// One axis remapping: a permutation of (x, y, z) with per-slot sign flips.
///
/// The w component always passes through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingCandidate {
    permutation: [usize; 3],
    signs: [f32; 3],
    label: String,
}

impl MappingCandidate {
    fn new(permutation: [usize; 3], signs: [f32; 3]) -> Self {
        let fragment = |slot: usize| {
            let glyph = if signs[slot] < 0.0 { "-" } else { "" };
            format!("{glyph}{}", AXIS_NAMES[permutation[slot]])
        };
        let label = format!("({}, {}, {})", fragment(0), fragment(1), fragment(2));
        Self {
            permutation,
            signs,
            label,
        }
    }

    /// Remap a sensor-space quaternion into target space.
    pub fn apply(&self, q: Quat) -> Quat {
        let v = [q.x, q.y, q.z];
        Quat::from_xyzw(
            v[self.permutation[0]] * self.signs[0],
            v[self.permutation[1]] * self.signs[1],
            v[self.permutation[2]] * self.signs[2],
            q.w,
        )
    }

    /// Human-readable form, e.g. `"(-z, x, -y)"`.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The fixed, ordered set of all 48 remapping candidates.
///
/// Generated once at startup and never mutated afterwards. The order is
/// fully deterministic: permutations iterate in canonical order as the
/// outer loop, sign vectors as the inner loop.
pub struct MappingCatalog {
    candidates: Vec<MappingCandidate>,
    default_index: usize,
}

impl MappingCatalog {
    pub fn generate() -> Self {
        let mut candidates = Vec::with_capacity(CANDIDATE_COUNT);
        for permutation in PERMUTATIONS {
            for signs in SIGNS {
                candidates.push(MappingCandidate::new(permutation, signs));
            }
        }
        let default_index = candidates
            .iter()
            .position(|c| c.label == PREFERRED_LABEL)
            .unwrap_or(0);
        Self {
            candidates,
            default_index,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate at `index`. The index must be in [0, 48); the selector
    /// maintains that invariant.
    pub fn get(&self, index: usize) -> &MappingCandidate {
        &self.candidates[index]
    }

    /// Index used when no committed mapping exists in the store.
    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingCandidate> {
        self.candidates.iter()
    }
}
