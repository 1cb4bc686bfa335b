use meshview_assets::Mesh;
use wgpu::util::DeviceExt;

/// Vertex and index buffers for one mesh. Immutable after upload; both
/// buffers are destroyed on drop.
pub struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    pub fn upload(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let index_count = mesh.index_count() as u32;

        tracing::debug!(
            vertices = mesh.vertex_count(),
            indices = index_count,
            "uploaded mesh buffers"
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Bind both buffers and draw every index once.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl Drop for MeshBuffers {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        tracing::debug!("released mesh buffers");
    }
}
