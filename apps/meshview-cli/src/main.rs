use anyhow::Context;
use clap::{Parser, Subcommand};
use meshview_assets::ModelLoader;
use meshview_render::{FrameTransforms, ShaderProgramBuilder};
use meshview_render_wgpu::NagaBackend;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshview-cli", about = "CLI tool for meshview: inspect models and shaders")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and supported formats
    Info,
    /// Load a scene file and print statistics for its first mesh
    Model {
        /// Scene file (.obj, .gltf or .glb)
        path: PathBuf,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compile and link a WGSL shader pair without a GPU
    Shaders {
        /// WGSL vertex shader
        vertex: PathBuf,
        /// WGSL fragment shader
        fragment: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("meshview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("model formats: obj, gltf, glb");
            println!("shader language: WGSL");
            println!("uniforms: model, view, projection (mat4x4<f32>, group 0 binding 0)");
            println!("vertex input: location 0, vec3<f32>");
        }
        Commands::Model { path, json } => {
            let mesh = ModelLoader::new()
                .load(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            let stats = mesh.stats();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Model: {}", path.display());
                println!("  vertices:  {}", stats.vertex_count);
                println!("  indices:   {}", stats.index_count);
                println!("  triangles: {}", stats.triangle_count);
                println!(
                    "  bounds:    [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
                    stats.bounds_min[0],
                    stats.bounds_min[1],
                    stats.bounds_min[2],
                    stats.bounds_max[0],
                    stats.bounds_max[1],
                    stats.bounds_max[2],
                );
            }
        }
        Commands::Shaders { vertex, fragment } => {
            let interface = ShaderProgramBuilder::new(NagaBackend)
                .build_from_files(&vertex, &fragment)
                .context("shader pair rejected")?;

            println!("Shaders: OK");
            println!("  vertex entry:   {}", interface.vertex_entry);
            println!("  fragment entry: {}", interface.fragment_entry);
            println!("  uniform block:  {} bytes", interface.uniforms.size());
            for name in FrameTransforms::UNIFORM_NAMES {
                if let Some(offset) = interface.uniforms.offset_of(name) {
                    println!("    {name:<10} @ {offset}");
                }
            }
        }
    }

    Ok(())
}
