use super::uniforms::GradientUniforms;

/// Uniform buffer holding one [`GradientUniforms`] record.
pub struct GradientUniformBuffer {
    buffer: wgpu::Buffer,
}

impl GradientUniformBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gradient uniforms"),
            size: GradientUniforms::SIZE as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer }
    }

    /// Queues the packed record for upload before the next submitted dispatch.
    pub fn write(&self, queue: &wgpu::Queue, uniforms: &GradientUniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Layout entry matching this buffer for a compute-stage bind group.
    pub fn layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(GradientUniforms::SIZE as u64),
            },
            count: None,
        }
    }
}
