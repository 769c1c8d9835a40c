use anyhow::{Context, Result};

use super::init::open_device;
use super::GpuInit;

/// A device and queue with no window or surface attached.
///
/// Used for offscreen rendering and for tests that need a real GPU.
pub struct Headless {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Headless {
    pub async fn new(init: &GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let (_adapter, device, queue) = open_device(&instance, init, None).await?;
        Ok(Self { device, queue })
    }

    /// Blocking variant of [`Headless::new`].
    pub fn request(init: &GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// A color texture that can be rendered to and read back on the CPU.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("trigon offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            format,
            width,
            height,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copies the texture back and returns its pixels row-major, top row first.
    ///
    /// Only 4-byte-per-texel formats are supported; channels come back in the
    /// texture's own order.
    pub fn read_rgba8(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Vec<[u8; 4]>> {
        anyhow::ensure!(
            self.format.block_copy_size(None) == Some(4),
            "readback of {:?} is not supported",
            self.format
        );

        let unpadded = self.width * 4;
        let padded = padded_bytes_per_row(unpadded);

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trigon readback buffer"),
            size: u64::from(padded) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("trigon readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed waiting for readback")?;
        rx.recv()
            .context("readback callback dropped")?
            .context("failed to map readback buffer")?;

        let pixels = {
            let data = slice.get_mapped_range();
            data.chunks_exact(padded as usize)
                .flat_map(|row| row[..unpadded as usize].chunks_exact(4))
                .map(|px| [px[0], px[1], px[2], px[3]])
                .collect()
        };
        staging.unmap();

        Ok(pixels)
    }
}

fn padded_bytes_per_row(unpadded: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::render::RenderTarget;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(4), 256);
        assert_eq!(padded_bytes_per_row(256), 256);
        assert_eq!(padded_bytes_per_row(64 * 4 + 1), 512);
    }

    #[test]
    fn offscreen_target_reads_back_its_clear_color() {
        let Ok(gpu) = Headless::request(&GpuInit::default()) else {
            eprintln!("no GPU adapter available, skipping");
            return;
        };
        let target = OffscreenTarget::new(gpu.device(), 5, 3, wgpu::TextureFormat::Rgba8Unorm);

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut rt = RenderTarget::new(&mut encoder, target.view());
            let _pass = rt.clear_pass("clear only", Color::from_premul(0.0, 0.0, 1.0, 1.0));
        }
        gpu.queue().submit(std::iter::once(encoder.finish()));

        let pixels = target.read_rgba8(gpu.device(), gpu.queue()).unwrap();
        assert_eq!(pixels.len(), 15);
        assert!(pixels.iter().all(|p| *p == [0, 0, 255, 255]));
    }
}
