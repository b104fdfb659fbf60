use crate::calibration::Calibration;
use crate::mapping::MappingCatalog;
use crate::prefs::PrefsStore;
use crate::selector::MappingSelector;
use glam::{EulerRot, Quat};
use tracing::{debug, info, warn};

/// Consumer of the final, calibrated orientation.
pub trait OrientationSink {
    fn deliver(&mut self, orientation: Quat);
}

/// What the pipeline did with one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Too few components, or no consumer attached. Nothing changed.
    Dropped,
    /// Mapped and remembered, but output stays suppressed until calibration.
    AwaitingCalibration,
    /// Delivered to the consumer.
    Delivered(Quat),
}

/// Per-sample pipeline: axis mapping, calibration offset, delivery.
///
/// Samples and user actions must arrive serialized through one driving
/// loop; the processor holds plain mutable state and never blocks beyond
/// the synchronous writes of the persistence port.
///
/// Cycling the mapping after calibrating leaves the existing offset in
/// effect even though it was captured under the previous axis convention,
/// so the output is misaligned until the user recalibrates. Intentional;
/// see the crate docs.
pub struct OrientationProcessor<P: PrefsStore> {
    catalog: MappingCatalog,
    selector: MappingSelector,
    calibration: Calibration,
    last_mapped: Quat,
    warned_uncalibrated: bool,
    store: P,
}

impl<P: PrefsStore> OrientationProcessor<P> {
    /// Build the catalog and restore the selector and calibration from
    /// `store`. A store without the relevant keys means a first run.
    pub fn new(store: P) -> Self {
        let catalog = MappingCatalog::generate();
        let selector = MappingSelector::load(&store, catalog.default_index());
        let calibration = Calibration::load(&store);
        Self {
            catalog,
            selector,
            calibration,
            last_mapped: Quat::IDENTITY,
            warned_uncalibrated: false,
            store,
        }
    }

    /// Run one sample through the pipeline.
    ///
    /// `components` are the raw (x, y, z, w) fields in sensor space; extra
    /// fields are ignored. `sink` is the attached consumer, if any.
    pub fn process_sample(
        &mut self,
        components: &[f32],
        sink: Option<&mut dyn OrientationSink>,
    ) -> SampleOutcome {
        let Some(sink) = sink else {
            return SampleOutcome::Dropped;
        };
        let [x, y, z, w, ..] = components else {
            return SampleOutcome::Dropped;
        };
        let raw = Quat::from_xyzw(*x, *y, *z, *w);

        // Remap unconditionally, calibrated or not, so that a calibrate
        // action zeroes against the freshest pose.
        let mapped = self.catalog.get(self.selector.current_index()).apply(raw);
        self.last_mapped = mapped;

        let Some(output) = self.calibration.compose(mapped) else {
            if !self.warned_uncalibrated {
                warn!("Not calibrated yet, output suppressed until the calibrate action");
                self.warned_uncalibrated = true;
            }
            return SampleOutcome::AwaitingCalibration;
        };

        sink.deliver(output);

        // Display-only angles; never fed back into any state.
        let (yaw, pitch, roll) = output.to_euler(EulerRot::YXZ);
        debug!(
            mapping = self.current_label(),
            pitch = pitch.to_degrees(),
            yaw = yaw.to_degrees(),
            roll = roll.to_degrees(),
            "Orientation delivered"
        );

        SampleOutcome::Delivered(output)
    }

    /// Capture the most recent mapped orientation as the zero pose.
    pub fn on_calibrate(&mut self) {
        self.calibration.calibrate(self.last_mapped, &mut self.store);
        self.warned_uncalibrated = false;
    }

    /// Cycle to the next mapping candidate. Calibration is left untouched.
    pub fn on_cycle_mapping(&mut self) {
        let index = self.selector.advance();
        info!(index, mapping = self.current_label(), "Mapping cycled");
    }

    /// Persist the active mapping as the default for future runs.
    pub fn on_commit_mapping(&mut self) {
        self.selector.commit(&mut self.store);
        info!(
            index = self.selector.current_index(),
            mapping = self.current_label(),
            "Mapping committed"
        );
    }

    /// Label of the active mapping candidate.
    pub fn current_label(&self) -> &str {
        self.catalog.get(self.selector.current_index()).label()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{MemoryPrefs, KEY_MAPPING_INDEX};

    #[derive(Default)]
    struct RecordingSink {
        delivered: Vec<Quat>,
    }

    impl OrientationSink for RecordingSink {
        fn deliver(&mut self, orientation: Quat) {
            self.delivered.push(orientation);
        }
    }

    fn assert_quat_eq(a: Quat, b: Quat) {
        assert!((a.x - b.x).abs() < 1e-6, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-6, "{a:?} != {b:?}");
        assert!((a.z - b.z).abs() < 1e-6, "{a:?} != {b:?}");
        assert!((a.w - b.w).abs() < 1e-6, "{a:?} != {b:?}");
    }

    fn assert_delivered_identity(outcome: SampleOutcome) {
        match outcome {
            SampleOutcome::Delivered(q) => assert_quat_eq(q, Quat::IDENTITY),
            other => panic!("expected delivery, got {other:?}"),
        }
    }

    #[test]
    fn fresh_state_suppresses_output_until_calibrated() {
        let mut processor = OrientationProcessor::new(MemoryPrefs::new());
        let mut sink = RecordingSink::default();

        let outcome = processor.process_sample(&[0.0, 0.0, 0.0, 1.0], Some(&mut sink));
        assert_eq!(outcome, SampleOutcome::AwaitingCalibration);
        assert!(sink.delivered.is_empty());

        processor.on_calibrate();

        let outcome = processor.process_sample(&[0.0, 0.0, 0.0, 1.0], Some(&mut sink));
        assert_delivered_identity(outcome);
        assert_eq!(sink.delivered.len(), 1);
        assert_quat_eq(sink.delivered[0], Quat::IDENTITY);
    }

    #[test]
    fn never_delivers_while_uncalibrated() {
        let mut processor = OrientationProcessor::new(MemoryPrefs::new());
        let mut sink = RecordingSink::default();

        for i in 0..100 {
            let half = i as f32 * 0.01;
            let outcome =
                processor.process_sample(&[half.sin(), 0.0, 0.0, half.cos()], Some(&mut sink));
            assert_eq!(outcome, SampleOutcome::AwaitingCalibration);
        }
        assert!(sink.delivered.is_empty());
    }

    #[test]
    fn short_sample_is_dropped_without_state_change() {
        let mut processor = OrientationProcessor::new(MemoryPrefs::new());
        let mut sink = RecordingSink::default();
        let pose = [0.0, 0.7071068, 0.0, 0.7071068];

        processor.process_sample(&pose, Some(&mut sink));
        assert_eq!(
            processor.process_sample(&[1.0, 2.0, 3.0], Some(&mut sink)),
            SampleOutcome::Dropped
        );

        // Calibration must zero against the last complete sample.
        processor.on_calibrate();
        assert_delivered_identity(processor.process_sample(&pose, Some(&mut sink)));
    }

    #[test]
    fn missing_sink_drops_the_sample() {
        let mut processor = OrientationProcessor::new(MemoryPrefs::new());
        assert_eq!(
            processor.process_sample(&[0.0, 0.0, 0.0, 1.0], None),
            SampleOutcome::Dropped
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let mut processor = OrientationProcessor::new(MemoryPrefs::new());
        let mut sink = RecordingSink::default();
        let pose = [0.1, 0.2, 0.3, 0.9, 42.0, 7.0];

        processor.process_sample(&pose, Some(&mut sink));
        processor.on_calibrate();
        assert_delivered_identity(processor.process_sample(&pose, Some(&mut sink)));
    }

    #[test]
    fn cycling_mapping_keeps_calibration() {
        let mut processor = OrientationProcessor::new(MemoryPrefs::new());
        let mut sink = RecordingSink::default();
        let pose = [0.2, 0.3, 0.1, 0.9];

        processor.process_sample(&pose, Some(&mut sink));
        processor.on_calibrate();
        assert!(processor.is_calibrated());

        // The stale offset stays in effect under the new mapping.
        processor.on_cycle_mapping();
        assert!(processor.is_calibrated());
        let outcome = processor.process_sample(&pose, Some(&mut sink));
        assert!(matches!(outcome, SampleOutcome::Delivered(_)));
    }

    #[test]
    fn committed_mapping_survives_restart() {
        let mut store = MemoryPrefs::new();
        {
            let mut processor = OrientationProcessor::new(&mut store);
            assert_eq!(processor.current_label(), "(-z, x, -y)");
            processor.on_cycle_mapping();
            processor.on_commit_mapping();
        }
        assert_eq!(store.get_int(KEY_MAPPING_INDEX), Some(38));

        let processor = OrientationProcessor::new(&mut store);
        assert_eq!(processor.current_label(), "(-z, -x, y)");
    }

    #[test]
    fn cycling_alone_does_not_persist() {
        let mut store = MemoryPrefs::new();
        {
            let mut processor = OrientationProcessor::new(&mut store);
            processor.on_cycle_mapping();
        }
        assert_eq!(store.get_int(KEY_MAPPING_INDEX), None);

        let processor = OrientationProcessor::new(&mut store);
        assert_eq!(processor.current_label(), "(-z, x, -y)");
    }

    #[test]
    fn calibration_survives_restart() {
        let mut store = MemoryPrefs::new();
        let pose = [0.0, 0.38268343, 0.0, 0.92387953];
        {
            let mut processor = OrientationProcessor::new(&mut store);
            processor.process_sample(&pose, Some(&mut RecordingSink::default()));
            processor.on_calibrate();
        }

        let mut processor = OrientationProcessor::new(&mut store);
        assert!(processor.is_calibrated());
        let mut sink = RecordingSink::default();
        assert_delivered_identity(processor.process_sample(&pose, Some(&mut sink)));
    }
}
