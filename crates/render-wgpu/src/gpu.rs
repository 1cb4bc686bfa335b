use crate::buffers::MeshBuffers;
use crate::context::GpuContext;
use crate::program::{DEPTH_FORMAT, ShaderProgram};
use meshview_common::Viewport;
use meshview_render::{FrameRenderer, FrameStatus, FrameTransforms, RenderError};

/// Draws one mesh with one program into the window surface.
///
/// Fields drop in declaration order: the in-flight surface texture goes
/// before the surface that owns it, and the context goes last.
pub struct WgpuRenderer {
    pending: Option<wgpu::SurfaceTexture>,
    depth_view: wgpu::TextureView,
    uniform_bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    mesh: MeshBuffers,
    program: ShaderProgram,
    context: GpuContext,
}

impl WgpuRenderer {
    pub fn new(context: GpuContext, program: ShaderProgram, mesh: MeshBuffers) -> Self {
        let device = context.device();

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("transforms_buffer"),
            size: program.uniforms().size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("transforms_bind_group"),
            layout: program.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let depth_view = create_depth_view(device, context.extent());

        Self {
            pending: None,
            depth_view,
            uniform_bind_group,
            uniform_buffer,
            mesh,
            program,
            context,
        }
    }

    fn acquire(&self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.context.surface().get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                tracing::warn!("surface {e}, reconfiguring");
                self.context.reconfigure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("surface acquire timed out");
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RenderError::OutOfMemory),
            Err(e) => Err(RenderError::Backend(e.to_string())),
        }
    }
}

impl FrameRenderer for WgpuRenderer {
    fn render(&mut self, transforms: &FrameTransforms) -> Result<FrameStatus, RenderError> {
        let Some(frame) = self.acquire()? else {
            return Ok(FrameStatus::Skipped);
        };

        let queue = self.context.queue();
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            &self.program.uniforms().write(transforms),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("mesh_encoder"),
                });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mesh_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(self.program.pipeline());
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            self.mesh.draw(&mut pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
        self.pending = Some(frame);
        Ok(FrameStatus::Drawn)
    }

    fn present(&mut self) {
        if let Some(frame) = self.pending.take() {
            frame.present();
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        // A frame acquired at the old size must not outlive the reconfigure.
        self.pending = None;
        self.context.resize(viewport);
        self.depth_view = create_depth_view(self.context.device(), self.context.extent());
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "render target resized"
        );
    }
}

fn create_depth_view(device: &wgpu::Device, extent: Viewport) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: extent.width.max(1),
            height: extent.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
