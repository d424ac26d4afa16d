use handview_engine::core::{App, AppControl, FrameCtx};
use handview_engine::input::{InputFrame, Key, MouseButton};
use handview_engine::paint::Color;
use handview_engine::pose::{
    DetectorConfig, FrameSource, Hand, HandDetector, Handedness, Keypoint2, Keypoint3, PoseFrame,
    PosePipeline, PoseSink, VideoFrame,
};
use handview_engine::rate::{FpsBand, FpsMeter};
use handview_engine::time::HostTick;
use winit::window::WindowId;

/// How strongly the band color tints the backdrop.
const BAND_TINT: f32 = 0.35;

/// Overlay wired for runtime-attached camera and model implementations.
pub type StudioOverlay =
    FpsOverlay<Box<dyn FrameSource<Frame = VideoFrame>>, Box<dyn HandDetector<VideoFrame>>>;

/// What the last pose step drew, reduced to what the title can show.
#[derive(Debug, Default)]
struct PoseSummary {
    last: Option<PoseFrame>,
    primary: Option<Handedness>,
}

impl<F> PoseSink<F> for PoseSummary {
    fn draw_2d(&mut self, _hand: &Hand, _bones: &[(Keypoint2, Keypoint2)]) {}

    fn draw_3d(&mut self, handedness: Handedness, _points: &[Keypoint3], _bones: &[(Keypoint3, Keypoint3)]) {
        self.primary = Some(handedness);
    }
}

/// Fps overlay plus hand-pose status: band-tinted backdrop, counters in the window title.
///
/// The pose pipeline stays idle until a source and a detector are attached. A detector
/// failure detaches both and is shown in the title until new ones are attached.
pub struct FpsOverlay<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    base_title: String,
    meter: FpsMeter,
    pose: PosePipeline<S, D>,
    summary: PoseSummary,
    pose_error: Option<String>,
}

impl<S, D> FpsOverlay<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    pub fn new(base_title: impl Into<String>) -> Self {
        Self {
            base_title: base_title.into(),
            meter: FpsMeter::new(),
            pose: PosePipeline::new(DetectorConfig::default()),
            summary: PoseSummary::default(),
            pose_error: None,
        }
    }

    pub fn meter(&self) -> &FpsMeter {
        &self.meter
    }

    pub fn pose_error(&self) -> Option<&str> {
        self.pose_error.as_deref()
    }

    pub fn attach_source(&mut self, source: S) {
        self.pose_error = None;
        self.pose.attach_source(source);
    }

    pub fn attach_detector(&mut self, detector: D) {
        self.pose_error = None;
        self.pose.attach_detector(detector);
    }

    /// Applies this frame's input. Returns `Exit` on Escape.
    pub fn handle_input(&mut self, input: &InputFrame) -> AppControl {
        if input.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        if input.key_pressed(Key::F) || input.button_pressed(MouseButton::Left) {
            let visible = self.meter.toggle();
            log::info!("{} fps counter", if visible { "showing" } else { "hiding" });
        }

        AppControl::Continue
    }

    /// Drives the meter and the pose pipeline with one host tick.
    pub fn advance(&mut self, tick: HostTick) {
        self.meter.on_tick(tick);

        self.summary.primary = None;
        match self.pose.on_tick(tick, &mut self.summary) {
            Ok(Some(frame)) => self.summary.last = Some(frame),
            Ok(None) => {}
            Err(err) => {
                log::error!("hand detection failed: {err:#}");
                self.pose_error = Some(format!("{err:#}"));
                self.summary = PoseSummary::default();
                self.pose.detach();
            }
        }
    }

    pub fn title(&self) -> String {
        let mut title = if self.meter.is_visible() {
            format!("{} | {} [{}]", self.base_title, self.meter.label(), self.meter.band())
        } else {
            format!("{} | press F to show FPS", self.base_title)
        };

        if let Some(err) = &self.pose_error {
            title.push_str(&format!(" | pose error: {err}"));
        } else if let Some(frame) = self.summary.last.filter(|_| self.pose.is_ready()) {
            match (frame.frame_ready, self.summary.primary) {
                (false, _) => title.push_str(" | camera not ready"),
                (true, Some(hand)) => title.push_str(&format!(" | hands: {} ({hand})", frame.hands)),
                (true, None) => title.push_str(" | hands: 0"),
            }
        }

        title
    }

    pub fn clear_color(&self) -> Color {
        if self.pose_error.is_some() {
            Color::BACKDROP.mix(FpsBand::Low.color(), BAND_TINT)
        } else if self.meter.is_visible() {
            Color::BACKDROP.mix(self.meter.band().color(), BAND_TINT)
        } else {
            Color::BACKDROP
        }
    }
}

impl<S, D> App for FpsOverlay<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_input(ctx.input_frame) == AppControl::Exit {
            return AppControl::Exit;
        }

        self.advance(ctx.tick);

        ctx.window.set_title(&self.title());
        ctx.present(self.clear_color())
    }

    fn on_window_destroyed(&mut self, window_id: WindowId) {
        log::debug!("window {window_id:?} gone, stopping fps counter and pose pipeline");
        self.meter.hide();
        self.pose.detach();
    }
}
