use meshview_assets::ModelLoadError;
use meshview_render::{RenderError, ShaderError};
use meshview_render_wgpu::GpuError;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop exited before a window was created")]
    NoWindow,
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Top-level failure of the viewer, one variant per exit code.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("startup failed: {0}")]
    Startup(#[from] StartupError),
    #[error("shader program build failed: {0}")]
    ShaderBuild(#[from] ShaderError),
    #[error("model load failed: {0}")]
    ModelLoad(#[from] ModelLoadError),
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl ViewerError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            ViewerError::Startup(_) => 1,
            ViewerError::ShaderBuild(_) => 2,
            ViewerError::ModelLoad(_) => 3,
            ViewerError::Render(_) => 4,
        }
    }
}
