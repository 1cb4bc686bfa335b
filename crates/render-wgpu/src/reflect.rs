//! GPU-free WGSL compilation and interface checks.
//!
//! "Compiling" a stage parses and validates it with naga. "Linking" checks
//! that the two stages fit together and that the vertex stage exposes the
//! transform uniform block and position attribute the renderer feeds.

use meshview_render::{FrameTransforms, ShaderBackend, ShaderError, StageKind};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Handle, Module, Scalar, Type, TypeInner, VectorSize};
use std::collections::BTreeMap;

/// Size in bytes of a `mat4x4<f32>`.
const MAT4_SIZE: usize = 64;

/// A parsed and validated shader stage.
#[derive(Debug)]
pub struct CompiledStage {
    kind: StageKind,
    module: Module,
    entry_index: usize,
}

impl CompiledStage {
    pub fn entry_point(&self) -> &str {
        &self.module.entry_points[self.entry_index].name
    }

    fn entry_function(&self) -> &naga::Function {
        &self.module.entry_points[self.entry_index].function
    }
}

/// Byte layout of the transform uniform block, keyed by member name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformLayout {
    size: u32,
    offsets: BTreeMap<String, u32>,
}

impl UniformLayout {
    pub fn size(&self) -> u64 {
        self.size as u64
    }

    pub fn offset_of(&self, name: &str) -> Option<u32> {
        self.offsets.get(name).copied()
    }

    /// Serialise `transforms` into a buffer matching this layout, placing
    /// each matrix at the offset of the member with the same name.
    pub fn write(&self, transforms: &FrameTransforms) -> Vec<u8> {
        let mut bytes = vec![0u8; self.size as usize];
        for (name, &offset) in &self.offsets {
            if let Some(matrix) = transforms.by_name(name) {
                let start = offset as usize;
                bytes[start..start + MAT4_SIZE]
                    .copy_from_slice(bytemuck::cast_slice(&matrix.to_cols_array()));
            }
        }
        bytes
    }
}

/// Result of linking a vertex and a fragment stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInterface {
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub uniforms: UniformLayout,
}

/// Parse and validate WGSL for one stage. Diagnostics are naga's own,
/// rendered against the source.
pub fn compile_wgsl(kind: StageKind, source: &str) -> Result<CompiledStage, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage: kind,
        log: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage: kind,
            log: e.emit_to_string(source),
        })?;

    let stage = match kind {
        StageKind::Vertex => naga::ShaderStage::Vertex,
        StageKind::Fragment => naga::ShaderStage::Fragment,
    };
    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == stage)
        .ok_or_else(|| ShaderError::Compile {
            stage: kind,
            log: format!("no @{kind} entry point"),
        })?;

    Ok(CompiledStage {
        kind,
        module,
        entry_index,
    })
}

/// Check that `vertex` and `fragment` form a usable program.
pub fn link_stages(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
) -> Result<ProgramInterface, ShaderError> {
    if vertex.kind != StageKind::Vertex || fragment.kind != StageKind::Fragment {
        return Err(link_error(format!(
            "expected vertex and fragment stages, got {} and {}",
            vertex.kind, fragment.kind
        )));
    }

    let vs = vertex.entry_function();
    let fs = fragment.entry_function();

    let attributes: Vec<(u32, Handle<Type>)> = vs
        .arguments
        .iter()
        .flat_map(|arg| locations(&vertex.module, arg.binding.as_ref(), arg.ty))
        .collect();
    match attributes.as_slice() {
        [(0, ty)] if is_vec3_f32(&vertex.module, *ty) => {}
        _ => {
            let found: Vec<u32> = attributes.iter().map(|(l, _)| *l).collect();
            return Err(link_error(format!(
                "vertex stage must read exactly one vec3<f32> attribute at @location(0), found locations {found:?}"
            )));
        }
    }

    let outputs: Vec<u32> = vs
        .result
        .iter()
        .flat_map(|r| locations(&vertex.module, r.binding.as_ref(), r.ty))
        .map(|(location, _)| location)
        .collect();
    for (location, _) in fs
        .arguments
        .iter()
        .flat_map(|arg| locations(&fragment.module, arg.binding.as_ref(), arg.ty))
    {
        if !outputs.contains(&location) {
            return Err(link_error(format!(
                "fragment input @location({location}) is not written by the vertex stage"
            )));
        }
    }

    let uniforms = uniform_layout(&vertex.module)?
        .ok_or_else(|| link_error("vertex stage declares no uniform block at @group(0) @binding(0)".into()))?;
    if let Some(fragment_uniforms) = uniform_layout(&fragment.module)? {
        if fragment_uniforms != uniforms {
            return Err(link_error(
                "fragment stage declares a different uniform block at @group(0) @binding(0)".into(),
            ));
        }
    }

    Ok(ProgramInterface {
        vertex_entry: vertex.entry_point().to_string(),
        fragment_entry: fragment.entry_point().to_string(),
        uniforms,
    })
}

/// naga-only backend: compiles and links without a GPU.
#[derive(Debug, Default, Clone, Copy)]
pub struct NagaBackend;

impl ShaderBackend for NagaBackend {
    type Stage = CompiledStage;
    type Program = ProgramInterface;

    fn compile(&mut self, kind: StageKind, source: &str) -> Result<CompiledStage, ShaderError> {
        compile_wgsl(kind, source)
    }

    fn link(
        &mut self,
        vertex: CompiledStage,
        fragment: CompiledStage,
    ) -> Result<ProgramInterface, ShaderError> {
        link_stages(&vertex, &fragment)
    }
}

fn link_error(log: String) -> ShaderError {
    ShaderError::Link { log }
}

/// User-defined `@location`s of a binding, looking through structs.
fn locations(module: &Module, binding: Option<&Binding>, ty: Handle<Type>) -> Vec<(u32, Handle<Type>)> {
    match binding {
        Some(Binding::Location { location, .. }) => vec![(*location, ty)],
        Some(Binding::BuiltIn(_)) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .flat_map(|m| locations(module, m.binding.as_ref(), m.ty))
                .collect(),
            _ => Vec::new(),
        },
    }
}

fn is_vec3_f32(module: &Module, ty: Handle<Type>) -> bool {
    matches!(
        module.types[ty].inner,
        TypeInner::Vector {
            size: VectorSize::Tri,
            scalar: Scalar::F32,
        }
    )
}

fn is_mat4_f32(module: &Module, ty: Handle<Type>) -> bool {
    matches!(
        module.types[ty].inner,
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            scalar: Scalar::F32,
        }
    )
}

/// Reflect the uniform block at group 0, binding 0. It must hold exactly
/// the `model`, `view` and `projection` matrices. Any other resource
/// binding is rejected since the pipeline layout has none.
fn uniform_layout(module: &Module) -> Result<Option<UniformLayout>, ShaderError> {
    let mut layout = None;

    for (_, global) in module.global_variables.iter() {
        let Some(binding) = &global.binding else {
            continue;
        };
        if binding.group != 0 || binding.binding != 0 || global.space != AddressSpace::Uniform {
            return Err(link_error(format!(
                "unsupported resource binding @group({}) @binding({})",
                binding.group, binding.binding
            )));
        }

        let TypeInner::Struct { members, span } = &module.types[global.ty].inner else {
            return Err(link_error("uniform block must be a struct".into()));
        };

        let mut offsets = BTreeMap::new();
        for member in members {
            let name = member.name.as_deref().unwrap_or_default();
            if !FrameTransforms::UNIFORM_NAMES.contains(&name) {
                return Err(link_error(format!("unexpected uniform member `{name}`")));
            }
            if !is_mat4_f32(module, member.ty) {
                return Err(link_error(format!("uniform `{name}` must be mat4x4<f32>")));
            }
            offsets.insert(name.to_string(), member.offset);
        }
        for name in FrameTransforms::UNIFORM_NAMES {
            if !offsets.contains_key(name) {
                return Err(link_error(format!("missing uniform `{name}`")));
            }
        }

        layout = Some(UniformLayout {
            size: *span,
            offsets,
        });
    }

    Ok(layout)
}
