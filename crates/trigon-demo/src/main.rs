use trigon_engine::device::GpuInit;
use trigon_engine::logging::{init_logging, LoggingConfig};
use trigon_engine::scene::{SceneConfig, TriangleScene};
use trigon_engine::window::{Runtime, RuntimeConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Triangle".to_string(),
        ..Default::default()
    };
    let scene = TriangleScene::new(SceneConfig::default());

    log::info!("opening `{}`; press Escape to quit", config.title);
    Runtime::run(config, GpuInit::default(), scene)
}
