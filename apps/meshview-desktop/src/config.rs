use clap::Parser;
use meshview_common::Viewport;
use meshview_render::{DEFAULT_MOVE_SPEED, DEFAULT_SENSITIVITY, LoopConfig};
use std::path::PathBuf;

pub const DEFAULT_VERTEX_SHADER: &str = "assets/shaders/mesh.vert.wgsl";
pub const DEFAULT_FRAGMENT_SHADER: &str = "assets/shaders/mesh.frag.wgsl";
pub const DEFAULT_MODEL: &str = "assets/models/cube.obj";
pub const DEFAULT_TITLE: &str = "meshview";

#[derive(Parser, Debug)]
#[command(name = "meshview-desktop", about = "Fly-through viewer for a single mesh")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// WGSL vertex shader
    #[arg(long, default_value = DEFAULT_VERTEX_SHADER)]
    pub vertex_shader: PathBuf,

    /// WGSL fragment shader
    #[arg(long, default_value = DEFAULT_FRAGMENT_SHADER)]
    pub fragment_shader: PathBuf,

    /// Scene file (.obj, .gltf or .glb)
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: PathBuf,

    /// Window width in pixels
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Camera speed in units per second
    #[arg(long, default_value_t = DEFAULT_MOVE_SPEED)]
    pub speed: f32,

    /// Degrees of rotation per pixel of mouse movement
    #[arg(long, default_value_t = DEFAULT_SENSITIVITY)]
    pub sensitivity: f32,
}

/// Everything the viewer needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub model: PathBuf,
    pub viewport: Viewport,
    pub title: String,
    pub loop_config: LoopConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            vertex_shader: DEFAULT_VERTEX_SHADER.into(),
            fragment_shader: DEFAULT_FRAGMENT_SHADER.into(),
            model: DEFAULT_MODEL.into(),
            viewport: Viewport::default(),
            title: DEFAULT_TITLE.to_string(),
            loop_config: LoopConfig::default(),
        }
    }
}

impl From<Cli> for ViewerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            vertex_shader: cli.vertex_shader,
            fragment_shader: cli.fragment_shader,
            model: cli.model,
            viewport: Viewport::new(cli.width, cli.height),
            title: cli.title,
            loop_config: LoopConfig {
                move_speed: cli.speed,
                mouse_sensitivity: cli.sensitivity,
            },
        }
    }
}
