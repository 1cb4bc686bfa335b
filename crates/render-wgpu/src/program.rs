use crate::reflect::{self, CompiledStage, ProgramInterface, UniformLayout};
use meshview_render::{ShaderBackend, ShaderError, StageKind};

/// Depth buffer format shared by the pipeline and the renderer.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Byte stride of one position attribute (three `f32`s, tightly packed).
const POSITION_STRIDE: u64 = 3 * std::mem::size_of::<f32>() as u64;

/// A compiled, not yet linked, shader stage.
pub struct WgpuStage {
    reflected: CompiledStage,
    module: wgpu::ShaderModule,
}

/// A linked program: render pipeline plus the uniform layout it expects.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    interface: ProgramInterface,
}

impl ShaderProgram {
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn uniforms(&self) -> &UniformLayout {
        &self.interface.uniforms
    }
}

/// Shader backend creating wgpu modules and pipelines.
///
/// Sources go through the naga checks first; wgpu validation errors raised
/// while creating the GPU objects are captured with an error scope and
/// reported as compile or link diagnostics.
pub struct WgpuShaderBackend<'a> {
    device: &'a wgpu::Device,
    color_format: wgpu::TextureFormat,
}

impl<'a> WgpuShaderBackend<'a> {
    pub fn new(device: &'a wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            color_format,
        }
    }

    fn scoped<T>(&self, create: impl FnOnce() -> T) -> Result<T, String> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create();
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(e) => Err(e.to_string()),
            None => Ok(value),
        }
    }
}

impl ShaderBackend for WgpuShaderBackend<'_> {
    type Stage = WgpuStage;
    type Program = ShaderProgram;

    fn compile(&mut self, kind: StageKind, source: &str) -> Result<WgpuStage, ShaderError> {
        let reflected = reflect::compile_wgsl(kind, source)?;
        let label = format!("{kind}_shader");
        let module = self
            .scoped(|| {
                self.device
                    .create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(&label),
                        source: wgpu::ShaderSource::Wgsl(source.into()),
                    })
            })
            .map_err(|log| ShaderError::Compile { stage: kind, log })?;

        tracing::debug!(stage = %kind, entry = reflected.entry_point(), "compiled shader stage");
        Ok(WgpuStage { reflected, module })
    }

    fn link(&mut self, vertex: WgpuStage, fragment: WgpuStage) -> Result<ShaderProgram, ShaderError> {
        let interface = reflect::link_stages(&vertex.reflected, &fragment.reflected)?;

        let bind_group_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("transforms_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(interface.uniforms.size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("mesh_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = self
            .scoped(|| {
                self.device
                    .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("mesh_pipeline"),
                        layout: Some(&pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &vertex.module,
                            entry_point: Some(&interface.vertex_entry),
                            compilation_options: Default::default(),
                            buffers: &[wgpu::VertexBufferLayout {
                                array_stride: POSITION_STRIDE,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                            }],
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &fragment.module,
                            entry_point: Some(&interface.fragment_entry),
                            compilation_options: Default::default(),
                            targets: &[Some(wgpu::ColorTargetState {
                                format: self.color_format,
                                blend: Some(wgpu::BlendState::REPLACE),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                        }),
                        primitive: wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::TriangleList,
                            cull_mode: None,
                            ..Default::default()
                        },
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: DEPTH_FORMAT,
                            depth_write_enabled: true,
                            depth_compare: wgpu::CompareFunction::Less,
                            stencil: Default::default(),
                            bias: Default::default(),
                        }),
                        multisample: Default::default(),
                        multiview: None,
                        cache: None,
                    })
            })
            .map_err(|log| ShaderError::Link { log })?;

        // Both stage modules are dropped here; the pipeline keeps what it needs.
        tracing::info!(
            vertex = %interface.vertex_entry,
            fragment = %interface.fragment_entry,
            uniform_bytes = interface.uniforms.size(),
            "shader program linked"
        );
        Ok(ShaderProgram {
            pipeline,
            bind_group_layout,
            interface,
        })
    }
}
