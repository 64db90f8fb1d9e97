//! SDF-based WebGPU map renderer
//!
//! Draws the whole map in one fullscreen fragment pass. Visible cells are
//! uploaded as a dense row-major grid of packed words, so each pixel finds
//! its cell with a single lookup.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::sim::{CellId, CellRange, GameState};

/// Upper bound on cells uploaded per frame (a 4K screen at the game zoom
/// shows a few thousand)
const MAX_CELLS: usize = 16384;

/// Packed cell word layout (must match shader)
pub const CELL_VALUE_MASK: u32 = 0xFFFF;
pub const CELL_NEAR: u32 = 1 << 16;
pub const CELL_PRESENT: u32 = 1 << 17;

/// Globals flag bits (must match shader)
const FLAG_WON: u32 = 1;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],  // offset 0
    grid_origin: [f32; 2], // offset 8 - device px of the south-west corner of range.min
    player_pos: [f32; 2],  // offset 16
    cell_px: f32,          // offset 24
    time: f32,             // offset 28
    cols: u32,             // offset 32
    rows: u32,             // offset 36
    flags: u32,            // offset 40
    _pad: u32,             // pad to 48 bytes
}

/// Pack one overlay into a cell word
pub fn pack_cell(value: u32, near: bool) -> u32 {
    let mut word = CELL_PRESENT | value.min(CELL_VALUE_MASK);
    if near {
        word |= CELL_NEAR;
    }
    word
}

/// Dense cell words for the registry's current range, clamped to `MAX_CELLS`
fn cell_words(state: &GameState) -> (CellRange, Vec<u32>) {
    let Some(mut range) = state.overlays.range() else {
        return (CellRange::new(CellId::new(0, 0), CellId::new(0, 0)), Vec::new());
    };
    if range.len() > MAX_CELLS {
        log::warn!("{} visible cells, drawing only {}", range.len(), MAX_CELLS);
        let cols = range.cols().max(1) as usize;
        let rows = (MAX_CELLS / cols).max(1) as i32;
        range.max.i = range.min.i + rows - 1;
        range.max.j = range.min.j + (cols.min(MAX_CELLS) as i32) - 1;
    }

    let mut words = vec![0u32; range.len()];
    for overlay in state.overlays.iter() {
        if let Some(idx) = range.index_of(overlay.cell) {
            words[idx] = pack_cell(overlay.value, overlay.near);
        }
    }
    (range, words)
}

// ============================================================================
// MAP RENDER STATE
// ============================================================================

pub struct MapRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    cells_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    /// Device pixels per CSS pixel
    scale: f64,
}

impl MapRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        scale: f64,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("map-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("map_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("map_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                grid_origin: [0.0, 0.0],
                player_pos: [-1000.0, -1000.0],
                cell_px: 1.0,
                time: 0.0,
                cols: 0,
                rows: 0,
                flags: 0,
                _pad: 0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let cells_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cells"),
            size: (std::mem::size_of::<u32>() * MAX_CELLS) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("map_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("map_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: cells_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("map_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("map_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            cells_buffer,
            bind_group,
            size: (width, height),
            scale,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32, scale: f64) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.scale = scale;
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the visible overlays and player, then draw
    pub fn render(&mut self, state: &GameState, time: f64) -> Result<(), wgpu::SurfaceError> {
        // time is ms since page load from requestAnimationFrame, convert to seconds
        let elapsed = (time / 1000.0) as f32;

        let (range, words) = cell_words(state);
        if !words.is_empty() {
            self.queue
                .write_buffer(&self.cells_buffer, 0, bytemuck::cast_slice(&words));
        }

        // Projection stays in f64 until it is in device pixels
        let view = &state.view;
        let origin = view.latlng_to_screen(state.grid.cell_corner(range.min)) * self.scale;
        let player = view.latlng_to_screen(state.player.position(&state.grid)) * self.scale;
        let cell_px = state.grid.tile_deg * view.pixels_per_degree() * self.scale;

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            grid_origin: [origin.x as f32, origin.y as f32],
            player_pos: [player.x as f32, player.y as f32],
            cell_px: cell_px as f32,
            time: elapsed,
            cols: if words.is_empty() { 0 } else { range.cols() },
            rows: if words.is_empty() { 0 } else { range.rows() },
            flags: if state.won { FLAG_WON } else { 0 },
            _pad: 0,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("map_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("map_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_globals_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 48);
    }

    #[test]
    fn test_pack_cell() {
        assert_eq!(pack_cell(0, false), CELL_PRESENT);
        assert_eq!(pack_cell(8, true), CELL_PRESENT | CELL_NEAR | 8);
        assert_eq!(pack_cell(1 << 20, false) & CELL_VALUE_MASK, CELL_VALUE_MASK);
    }

    #[test]
    fn test_cell_words_cover_every_overlay() {
        let state = GameState::new(GameConfig::default(), 640.0, 480.0);
        let (range, words) = cell_words(&state);
        assert_eq!(words.len(), state.overlays.len());
        assert!(words.iter().all(|w| w & CELL_PRESENT != 0));
        for overlay in state.overlays.iter() {
            let idx = range.index_of(overlay.cell).unwrap();
            assert_eq!(words[idx], pack_cell(overlay.value, overlay.near));
        }
    }

    #[test]
    fn test_cell_words_are_clamped() {
        let state = GameState::new(GameConfig::default(), 8000.0, 8000.0);
        let (range, words) = cell_words(&state);
        assert!(words.len() <= MAX_CELLS);
        assert_eq!(words.len(), range.len());
    }
}
