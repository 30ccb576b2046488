// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::assembly::{SceneConfig, DEFAULT_WALL_TEXTURE};

#[derive(Parser, Debug, Clone)]
#[command(name = "tinyscene")]
#[command(about = "Textured walls, a spinning arrow and an orbit camera", long_about = None)]
pub struct Cli {
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Image used for both walls
    #[arg(long, default_value = DEFAULT_WALL_TEXTURE)]
    pub texture: PathBuf,

    /// Hide the FPS overlay
    #[arg(long = "no-stats", default_value = "false")]
    pub no_stats: bool,
}

impl Cli {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            wall_texture: self.texture.clone(),
            ..SceneConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let cli = Cli::parse_from(["tinyscene"]);
        assert_eq!((cli.width, cli.height), (1200, 800));
        assert!(!cli.no_stats);
        assert_eq!(cli.scene_config(), SceneConfig::default());
    }

    #[test]
    fn texture_flag_reaches_the_scene_config() {
        let cli = Cli::parse_from(["tinyscene", "--texture", "walls/stone.png", "--no-stats"]);
        assert!(cli.no_stats);
        assert_eq!(cli.scene_config().wall_texture, PathBuf::from("walls/stone.png"));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
