//! Non-blocking readback of the per-frame luminance sum.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const IDLE: u8 = 0;
const PENDING: u8 = 1;
const READY: u8 = 2;
const FAILED: u8 = 3;

/// Mean luminance in `[0, 1]` from a sum of 8-bit per-pixel values.
pub fn mean_luminance(sum: u32, pixel_count: u64) -> f64 {
    if pixel_count == 0 {
        return 0.0;
    }
    sum as f64 / (255.0 * pixel_count as f64)
}

/// True when a fully white `pixel_count` target would overflow the `u32`
/// luminance counter, making the mean unreliable.
pub fn sum_can_wrap(pixel_count: u64) -> bool {
    pixel_count.saturating_mul(255) > u32::MAX as u64
}

/// What a readback belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Seconds since startup at the frame the sum was produced.
    pub time: f32,
    pub preset: String,
    pub pixel_count: u64,
}

/// Copies the GPU luminance counter into a staging buffer and maps it back.
///
/// One readback is in flight at a time. While it is, new frames are not
/// sampled. Call [`record_copy`] inside the frame, [`begin_map`] after the
/// frame was submitted, and [`take_ready`] after polling the device.
///
/// [`record_copy`]: LuminanceReadback::record_copy
/// [`begin_map`]: LuminanceReadback::begin_map
/// [`take_ready`]: LuminanceReadback::take_ready
pub struct LuminanceReadback {
    staging: Option<wgpu::Buffer>,
    state: Arc<AtomicU8>,
    recorded: Option<Sample>,
    in_flight: Option<Sample>,
    warned_wrap: bool,
}

impl Default for LuminanceReadback {
    fn default() -> Self {
        Self::new()
    }
}

impl LuminanceReadback {
    pub fn new() -> Self {
        Self {
            staging: None,
            state: Arc::new(AtomicU8::new(IDLE)),
            recorded: None,
            in_flight: None,
            warned_wrap: false,
        }
    }

    /// True when no readback is recorded or in flight.
    pub fn is_idle(&self) -> bool {
        self.recorded.is_none() && self.in_flight.is_none()
    }

    /// Records a copy of `source` into the staging buffer, unless a readback
    /// is already under way.
    pub fn record_copy(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::Buffer,
        sample: Sample,
    ) {
        if !self.is_idle() {
            return;
        }
        self.check_target_size(sample.pixel_count);
        let staging = self.staging.get_or_insert_with(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("algol luminance staging"),
                size: std::mem::size_of::<u32>() as u64,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        encoder.copy_buffer_to_buffer(source, 0, staging, 0, std::mem::size_of::<u32>() as u64);
        self.recorded = Some(sample);
    }

    /// Warns once when targets this large can wrap the counter. Returns `true`
    /// when the warning was emitted by this call.
    fn check_target_size(&mut self, pixel_count: u64) -> bool {
        if self.warned_wrap || !sum_can_wrap(pixel_count) {
            return false;
        }
        log::warn!(
            "{pixel_count} pixels can overflow the luminance counter; bright frames will report a wrong mean"
        );
        self.warned_wrap = true;
        true
    }

    /// Requests the mapping for the copy recorded this frame.
    ///
    /// Must run after the frame's commands were submitted. If the frame was
    /// never submitted, pass `submitted = false` to discard the recording.
    pub fn begin_map(&mut self, submitted: bool) {
        let Some(sample) = self.recorded.take() else { return };
        if !submitted {
            return;
        }
        let Some(staging) = self.staging.as_ref() else { return };

        self.state.store(PENDING, Ordering::Release);
        let state = Arc::clone(&self.state);
        staging.slice(..).map_async(wgpu::MapMode::Read, move |result| {
            let next = match result {
                Ok(()) => READY,
                Err(e) => {
                    log::warn!("luminance readback failed: {e}");
                    FAILED
                }
            };
            state.store(next, Ordering::Release);
        });
        self.in_flight = Some(sample);
    }

    /// Returns the finished readback, if any. Call after polling the device.
    pub fn take_ready(&mut self) -> Option<(Sample, u32)> {
        match self.state.load(Ordering::Acquire) {
            READY => {
                let staging = self.staging.as_ref()?;
                let sum = {
                    let view = staging.slice(..).get_mapped_range();
                    bytemuck::pod_read_unaligned::<u32>(&view[..std::mem::size_of::<u32>()])
                };
                staging.unmap();
                self.state.store(IDLE, Ordering::Release);
                self.in_flight.take().map(|sample| (sample, sum))
            }
            FAILED => {
                self.state.store(IDLE, Ordering::Release);
                self.in_flight = None;
                None
            }
            _ => None,
        }
    }
}
