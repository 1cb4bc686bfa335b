mod config;
mod error;
mod keys;
mod platform;

use clap::Parser;
use config::{Cli, ViewerConfig};
use error::{StartupError, ViewerError};
use keys::KeyBindings;
use meshview_assets::ModelLoader;
use meshview_common::Viewport;
use meshview_render::{LoopSummary, RenderLoop, ShaderProgramBuilder};
use meshview_render_wgpu::{GpuContext, MeshBuffers, WgpuRenderer, WgpuShaderBackend};
use platform::WinitPlatform;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bring the viewer up in order (window, GPU, shaders, model, buffers) and
/// run the loop until the window closes. Anything created before a failure
/// is released on return.
fn run(config: &ViewerConfig) -> Result<LoopSummary, ViewerError> {
    let mut platform = WinitPlatform::new(config, KeyBindings::default())?;

    let window = platform.window();
    let size = window.inner_size();
    let viewport = Viewport::new(size.width, size.height);
    let context = GpuContext::new(window, viewport).map_err(StartupError::from)?;

    let program = ShaderProgramBuilder::new(WgpuShaderBackend::new(
        context.device(),
        context.format(),
    ))
    .build_from_files(&config.vertex_shader, &config.fragment_shader)?;

    let mesh = ModelLoader::new().load(&config.model)?;
    let buffers = MeshBuffers::upload(context.device(), &mesh);

    let mut renderer = WgpuRenderer::new(context, program, buffers);
    let mut render_loop = RenderLoop::new(config.loop_config, viewport);
    Ok(render_loop.run(&mut platform, &mut renderer)?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("meshview-desktop starting");

    let config = ViewerConfig::from(cli);
    match run(&config) {
        Ok(summary) => {
            let fps = if summary.elapsed > 0.0 {
                summary.frames as f64 / summary.elapsed
            } else {
                0.0
            };
            tracing::info!(
                frames = summary.frames,
                seconds = summary.elapsed,
                fps,
                "viewer closed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            e.exit_code()
        }
    }
}
