mod overlay;

use anyhow::Result;
use handview_engine::device::GpuInit;
use handview_engine::logging::{init_logging, LoggingConfig};
use handview_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use overlay::StudioOverlay;

const TITLE: &str = "Handview";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("starting {TITLE}: F or click toggles the fps counter, Esc quits");

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(960.0, 540.0),
    };

    Runtime::run(config, GpuInit::default(), StudioOverlay::new(TITLE))
}
