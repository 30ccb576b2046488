use std::marker::PhantomData;

/// A uniform buffer sized for exactly one `T`
///
/// Keeps the bytes of the last write so unchanged frames skip the upload.
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    last_written: Vec<u8>,
    _content: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    /// Short type name for buffer labels, e.g. `MaterialUniform`
    fn type_label() -> &'static str {
        let full = std::any::type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Allocates the buffer and fills it with `initial`
    pub fn new(device: &wgpu::Device, initial: &T) -> Self {
        let bytes = bytemuck::bytes_of(initial);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} uniform", Self::type_label())),
            size: bytes.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        buffer.slice(..).get_mapped_range_mut().copy_from_slice(bytes);
        buffer.unmap();

        Self {
            buffer,
            last_written: bytes.to_vec(),
            _content: PhantomData,
        }
    }

    /// Queues a write of `content`. Returns false when it matched the last
    /// write and nothing was queued.
    pub fn write(&mut self, queue: &wgpu::Queue, content: &T) -> bool {
        let bytes = bytemuck::bytes_of(content);
        if self.last_written == bytes {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.last_written.clear();
        self.last_written.extend_from_slice(bytes);
        true
    }

    pub fn as_binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}
