use anyhow::Result;

use crate::time::{FrameScheduler, HostTick};

use super::skeleton::segments;
use super::types::{Hand, Handedness, Keypoint2, Keypoint3};

/// Detector options.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Upper bound on hands reported per frame.
    pub max_hands: usize,

    /// Mirror keypoints horizontally before reporting.
    pub flip_horizontal: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: 2,
            flip_horizontal: false,
        }
    }
}

/// Video frame provider (camera, file, test fixture).
pub trait FrameSource {
    type Frame;

    /// Returns the current frame, or `None` while the source has no decodable data yet.
    fn poll_frame(&mut self) -> Option<Self::Frame>;
}

/// Hand-pose model.
pub trait HandDetector<F> {
    fn estimate_hands(&mut self, frame: &F, config: &DetectorConfig) -> Result<Vec<Hand>>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    type Frame = T::Frame;

    fn poll_frame(&mut self) -> Option<Self::Frame> {
        (**self).poll_frame()
    }
}

impl<F, T: HandDetector<F> + ?Sized> HandDetector<F> for Box<T> {
    fn estimate_hands(&mut self, frame: &F, config: &DetectorConfig) -> Result<Vec<Hand>> {
        (**self).estimate_hands(frame, config)
    }
}

/// Drawing surface for pipeline output.
pub trait PoseSink<F> {
    /// Called once per processed frame before any skeleton is drawn.
    fn draw_frame(&mut self, frame: &F) {
        let _ = frame;
    }

    /// 2D skeleton of one hand, as bone endpoint pairs.
    fn draw_2d(&mut self, hand: &Hand, bones: &[(Keypoint2, Keypoint2)]);

    /// 3D skeleton of the primary hand.
    fn draw_3d(&mut self, handedness: Handedness, points: &[Keypoint3], bones: &[(Keypoint3, Keypoint3)]);
}

/// Per-tick pipeline summary.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PoseFrame {
    /// `false` when the source had no frame ready.
    pub frame_ready: bool,
    pub hands: usize,
    pub bones_2d: usize,
    pub bones_3d: usize,
}

/// Capture → detect → draw, once per host tick.
///
/// The pipeline's scheduler is active only while both a source and a detector are
/// attached; until then host ticks are ignored.
pub struct PosePipeline<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    source: Option<S>,
    detector: Option<D>,
    config: DetectorConfig,
    scheduler: FrameScheduler,
}

impl<S, D> PosePipeline<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            source: None,
            detector: None,
            config,
            scheduler: FrameScheduler::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// `true` once both a source and a detector are attached.
    pub fn is_ready(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn attach_source(&mut self, source: S) {
        self.source = Some(source);
        self.sync_readiness();
    }

    pub fn attach_detector(&mut self, detector: D) {
        self.detector = Some(detector);
        self.sync_readiness();
    }

    /// Releases the source and detector; the pipeline stops processing ticks.
    pub fn detach(&mut self) -> (Option<S>, Option<D>) {
        let out = (self.source.take(), self.detector.take());
        self.sync_readiness();
        out
    }

    fn sync_readiness(&mut self) {
        let ready = self.source.is_some() && self.detector.is_some();
        if ready != self.scheduler.is_active() {
            log::debug!("pose pipeline {}", if ready { "ready" } else { "idle" });
        }
        self.scheduler.set_active(ready);
    }

    /// Runs one pipeline step if ready.
    ///
    /// Returns `Ok(None)` while not ready. Detector failures are returned as-is.
    pub fn on_tick<K>(&mut self, tick: HostTick, sink: &mut K) -> Result<Option<PoseFrame>>
    where
        K: PoseSink<S::Frame>,
    {
        let (Some(source), Some(detector)) = (self.source.as_mut(), self.detector.as_mut()) else {
            return Ok(None);
        };
        let config = &self.config;

        self.scheduler
            .tick(tick, |_| step(source, detector, config, sink))
            .transpose()
    }
}

fn step<S, D, K>(source: &mut S, detector: &mut D, config: &DetectorConfig, sink: &mut K) -> Result<PoseFrame>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
    K: PoseSink<S::Frame>,
{
    let Some(frame) = source.poll_frame() else {
        log::warn!("video not ready, skipping frame");
        return Ok(PoseFrame::default());
    };

    sink.draw_frame(&frame);

    let mut hands = detector.estimate_hands(&frame, config)?;
    hands.truncate(config.max_hands);

    let mut out = PoseFrame {
        frame_ready: true,
        hands: hands.len(),
        ..PoseFrame::default()
    };

    for hand in &hands {
        let bones: Vec<_> = segments(&hand.keypoints).collect();
        out.bones_2d += bones.len();
        sink.draw_2d(hand, &bones);
    }

    if let Some(primary) = hands.first() {
        let bones: Vec<_> = segments(&primary.keypoints_3d).collect();
        out.bones_3d = bones.len();
        sink.draw_3d(primary.handedness, &primary.keypoints_3d, &bones);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{HAND_CONNECTIONS, HAND_KEYPOINTS};
    use std::time::{Duration, Instant};

    struct StubSource {
        frames: Vec<Option<u32>>,
    }

    impl FrameSource for StubSource {
        type Frame = u32;

        fn poll_frame(&mut self) -> Option<u32> {
            if self.frames.is_empty() {
                None
            } else {
                self.frames.remove(0)
            }
        }
    }

    struct StubDetector {
        hands_per_frame: usize,
        fail: bool,
        calls: usize,
    }

    impl HandDetector<u32> for StubDetector {
        fn estimate_hands(&mut self, _frame: &u32, _config: &DetectorConfig) -> Result<Vec<Hand>> {
            self.calls += 1;
            anyhow::ensure!(!self.fail, "model not loaded");
            Ok((0..self.hands_per_frame).map(|i| hand(i % 2 == 0)).collect())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<u32>,
        hands_2d: usize,
        bones_3d: Vec<usize>,
    }

    impl PoseSink<u32> for RecordingSink {
        fn draw_frame(&mut self, frame: &u32) {
            self.frames.push(*frame);
        }

        fn draw_2d(&mut self, _hand: &Hand, _bones: &[(Keypoint2, Keypoint2)]) {
            self.hands_2d += 1;
        }

        fn draw_3d(&mut self, _h: Handedness, _points: &[Keypoint3], bones: &[(Keypoint3, Keypoint3)]) {
            self.bones_3d.push(bones.len());
        }
    }

    fn hand(left: bool) -> Hand {
        Hand {
            handedness: if left { Handedness::Left } else { Handedness::Right },
            score: 0.9,
            keypoints: vec![Keypoint2::default(); HAND_KEYPOINTS],
            keypoints_3d: vec![Keypoint3::default(); HAND_KEYPOINTS],
        }
    }

    fn tick(i: u64) -> HostTick {
        HostTick::new(Instant::now() + Duration::from_millis(i * 16), i)
    }

    fn pipeline(frames: Vec<Option<u32>>, hands: usize, fail: bool) -> PosePipeline<StubSource, StubDetector> {
        let mut p = PosePipeline::new(DetectorConfig::default());
        p.attach_source(StubSource { frames });
        p.attach_detector(StubDetector { hands_per_frame: hands, fail, calls: 0 });
        p
    }

    #[test]
    fn idle_until_fully_attached() {
        let mut p: PosePipeline<StubSource, StubDetector> = PosePipeline::new(DetectorConfig::default());
        let mut sink = RecordingSink::default();
        assert!(!p.is_ready());
        assert_eq!(p.on_tick(tick(0), &mut sink).unwrap(), None);

        p.attach_source(StubSource { frames: vec![Some(1)] });
        assert!(!p.is_ready());
        assert_eq!(p.on_tick(tick(1), &mut sink).unwrap(), None);

        p.attach_detector(StubDetector { hands_per_frame: 1, fail: false, calls: 0 });
        assert!(p.is_ready());
        assert!(p.on_tick(tick(2), &mut sink).unwrap().is_some());
    }

    #[test]
    fn draws_every_hand_and_first_in_3d() {
        let mut p = pipeline(vec![Some(7)], 2, false);
        let mut sink = RecordingSink::default();

        let out = p.on_tick(tick(0), &mut sink).unwrap().unwrap();
        assert_eq!(
            out,
            PoseFrame {
                frame_ready: true,
                hands: 2,
                bones_2d: 2 * HAND_CONNECTIONS.len(),
                bones_3d: HAND_CONNECTIONS.len(),
            }
        );
        assert_eq!(sink.frames, vec![7]);
        assert_eq!(sink.hands_2d, 2);
        assert_eq!(sink.bones_3d, vec![HAND_CONNECTIONS.len()]);
    }

    #[test]
    fn truncates_to_max_hands() {
        let mut p = pipeline(vec![Some(1)], 5, false);
        let mut sink = RecordingSink::default();
        let out = p.on_tick(tick(0), &mut sink).unwrap().unwrap();
        assert_eq!(out.hands, 2);
    }

    #[test]
    fn no_hands_skips_3d() {
        let mut p = pipeline(vec![Some(1)], 0, false);
        let mut sink = RecordingSink::default();
        let out = p.on_tick(tick(0), &mut sink).unwrap().unwrap();
        assert_eq!(out.hands, 0);
        assert!(sink.bones_3d.is_empty());
    }

    #[test]
    fn frame_not_ready_skips_detection() {
        let mut p = pipeline(vec![None, Some(3)], 1, false);
        let mut sink = RecordingSink::default();

        let out = p.on_tick(tick(0), &mut sink).unwrap().unwrap();
        assert!(!out.frame_ready);

        let out = p.on_tick(tick(1), &mut sink).unwrap().unwrap();
        assert!(out.frame_ready);
        assert_eq!(sink.frames, vec![3]);

        let (_, detector) = p.detach();
        assert_eq!(detector.unwrap().calls, 1);
    }

    #[test]
    fn detector_error_propagates() {
        let mut p = pipeline(vec![Some(1)], 1, true);
        let mut sink = RecordingSink::default();
        let err = p.on_tick(tick(0), &mut sink).unwrap_err();
        assert!(err.to_string().contains("model not loaded"));
        assert_eq!(sink.hands_2d, 0);
    }

    #[test]
    fn boxed_trait_objects_drive_the_pipeline() {
        type DynSource = Box<dyn FrameSource<Frame = u32>>;
        type DynDetector = Box<dyn HandDetector<u32>>;

        let mut p: PosePipeline<DynSource, DynDetector> = PosePipeline::new(DetectorConfig::default());
        p.attach_source(Box::new(StubSource { frames: vec![Some(9)] }));
        p.attach_detector(Box::new(StubDetector { hands_per_frame: 1, fail: false, calls: 0 }));

        let mut sink = RecordingSink::default();
        let out = p.on_tick(tick(0), &mut sink).unwrap().unwrap();
        assert_eq!(out.hands, 1);
        assert_eq!(sink.frames, vec![9]);
    }

    #[test]
    fn detach_stops_processing() {
        let mut p = pipeline(vec![Some(1), Some(2)], 1, false);
        let mut sink = RecordingSink::default();
        p.on_tick(tick(0), &mut sink).unwrap();
        let (source, detector) = p.detach();
        assert!(source.is_some() && detector.is_some());
        assert!(!p.is_ready());
        assert_eq!(p.on_tick(tick(1), &mut sink).unwrap(), None);
        assert_eq!(sink.frames, vec![1]);
    }
}
