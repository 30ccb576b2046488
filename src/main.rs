use anyhow::Context;
use clap::Parser;
use tinyscene::{app::AppConfig, cli::Cli};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("tinyscene=info,wgpu_core=warn,wgpu_hal=warn"),
    )
    .init();

    let cli = Cli::parse();
    let config = AppConfig {
        window_size: (cli.width, cli.height),
        show_stats: !cli.no_stats,
        scene: cli.scene_config(),
    };

    tinyscene::run(config).context("tinyscene stopped with an error")
}
