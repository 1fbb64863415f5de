use crate::bvh::Bvh;
use crate::camera::Camera;
use crate::intersect::Ray;
use crate::primitive::HitInfo;
use crate::sampling::{cosine_sample_hemisphere, face_forward, tangent_to_world};
use glam::Vec3;
use lumen_geom::Rng;
use rayon::prelude::*;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Offset applied along the shading normal to the origin of bounce rays,
/// keeping them from immediately re-hitting the surface they left.
const BOUNCE_EPSILON: f32 = 0.01;

/// What the renderer writes into the pixel buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderOutput {
    /// Full path-traced lighting.
    Beaut,
    /// Material color of the first hit.
    Albedo,
    /// First-hit shading normal, remapped to `0.5 * (n + 1)`.
    Normal,
    /// First-hit barycentric coordinates (triangles only).
    Barycentric,
    /// First-hit distance over the camera far plane.
    Depth,
}

/// Parameters of a render, bundled in the options-struct style used across
/// the workspace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Number of bounces before a path is cut off.
    ///
    /// Default value: `RenderOptions::DEFAULT_MAX_DEPTH`.
    pub max_depth: u32,

    /// Monte-Carlo samples per pixel.
    ///
    /// Default value: `RenderOptions::DEFAULT_SAMPLES_PER_PIXEL`.
    pub samples_per_pixel: u32,

    /// Default value: `RenderOutput::Beaut`.
    pub output: RenderOutput,
}

impl RenderOptions {
    pub const DEFAULT_MAX_DEPTH: u32 = 4;
    pub const DEFAULT_SAMPLES_PER_PIXEL: u32 = 64;

    pub const DEFAULT: Self = RenderOptions {
        max_depth: Self::DEFAULT_MAX_DEPTH,
        samples_per_pixel: Self::DEFAULT_SAMPLES_PER_PIXEL,
        output: RenderOutput::Beaut,
    };

    #[inline]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn with_samples_per_pixel(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    #[inline]
    pub fn with_output(mut self, output: RenderOutput) -> Self {
        self.output = output;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An error that can happen when kicking off a render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The pixel buffer does not hold exactly `width * height` words.
    BufferSize { expected: usize, actual: usize },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::BufferSize { expected, actual } => {
                write!(f, "pixel buffer holds {actual} words, expected {expected}")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Per-ray state carried through a bounce chain.
struct Payload {
    rng: Rng,
    origin: Vec3,
    direction: Vec3,
    radiance: Vec3,
    attenuation: Vec3,
    done: bool,
    hit: HitInfo,
}

/// Camera quantities hoisted out of the per-pixel loop.
struct FrameParams {
    ndc_x_scale: f32,
    ndc_y_scale: f32,
    position: Vec3,
    right: Vec3,
    up: Vec3,
    front: Vec3,
}

/// Renders a [`Bvh`] scene through a [`Camera`] into a pixel buffer.
///
/// Everything the pixel tasks read is held here immutably for the duration
/// of a frame, so the renderer can fan pixels out over rayon without locks:
/// every task owns exactly one word of the output buffer.
pub struct Renderer {
    pub camera: Camera,
    pub scene: Bvh,
    pub options: RenderOptions,
    progress_callback: Option<Box<dyn Fn(f32) + Send + Sync>>,
}

impl Renderer {
    pub fn new(scene: Bvh) -> Self {
        Renderer {
            camera: Camera::new(),
            scene,
            options: RenderOptions::default(),
            progress_callback: None,
        }
    }

    /// Invoke `callback` with the completed percentage (0 to 100) whenever
    /// progress advances by more than a tenth of a percent. In parallel
    /// renders the callback runs on worker threads.
    pub fn set_progress_callback<F>(&mut self, callback: F)
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
    }

    pub fn clear_progress_callback(&mut self) {
        self.progress_callback = None;
    }

    /// Render `width` x `height` pixels into `buffer`, packed
    /// `0x00RRGGBB` (the alpha byte is left untouched for the host).
    ///
    /// `parallel` schedules pixels over rayon's thread pool; results are
    /// bit-identical to the sequential mode.
    pub fn render(
        &self,
        width: u32,
        height: u32,
        buffer: &mut [u32],
        parallel: bool,
    ) -> Result<(), RenderError> {
        let expected = (width * height) as usize;
        if buffer.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        let (right, up, front) = self.camera.basis_vectors();
        let ndc_y_scale = self.camera.fov_y().to_radians().tan();
        let params = FrameParams {
            ndc_x_scale: ndc_y_scale * self.camera.aspect(),
            ndc_y_scale,
            position: self.camera.position(),
            right,
            up,
            front,
        };

        let completed = AtomicU32::new(0);
        let last_progress = AtomicU32::new(0.0f32.to_bits());
        let total = expected as f32;

        let render_pixel = |index: usize, out: &mut u32| {
            let x = index as u32 % width;
            let y = index as u32 / width;

            let color = match self.options.output {
                RenderOutput::Beaut => self.ray_gen(x, y, width, height, &params),
                _ => self.ray_gen_single(x, y, width, height, &params),
            };
            *out = pack_rgb(color);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            let progress = done as f32 / total;
            let last = f32::from_bits(last_progress.load(Ordering::Relaxed));
            if progress - last > 0.001 || progress == 1.0 {
                last_progress.store(progress.to_bits(), Ordering::Relaxed);
                if let Some(callback) = &self.progress_callback {
                    callback(progress * 100.0);
                }
            }
        };

        let start = Instant::now();
        if parallel {
            buffer
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, out)| render_pixel(index, out));
        } else {
            for y in (0..height).rev() {
                for x in 0..width {
                    let index = (y * width + x) as usize;
                    render_pixel(index, &mut buffer[index]);
                }
            }
        }
        log::debug!(
            "rendered {}x{} ({}) in {:.3}s",
            width,
            height,
            if parallel { "parallel" } else { "sequential" },
            start.elapsed().as_secs_f64()
        );

        Ok(())
    }

    /// Integrate one pixel: jittered primary rays, multi-bounce Lambertian
    /// transport with cosine-weighted bounces, averaged over the sample
    /// count.
    fn ray_gen(&self, x: u32, y: u32, width: u32, height: u32, params: &FrameParams) -> Vec3 {
        let samples = self.options.samples_per_pixel;
        if samples == 0 {
            return Vec3::ZERO;
        }

        let mut result = Vec3::ZERO;
        // Counting the sample index down keeps seeds distinct per sample.
        for sample in (1..=samples).rev() {
            let mut rng = Rng::from_seeds(x + y * width, sample);

            let jitter_x = rng.next_f32();
            let jitter_y = rng.next_f32();
            let u = (x as f32 + jitter_x) / (width - 1) as f32;
            let v = (y as f32 + jitter_y) / (height - 1) as f32;

            let mut ray = self.primary_ray(u, v, params);
            let mut payload = Payload {
                rng,
                origin: Vec3::ZERO,
                direction: Vec3::ZERO,
                radiance: Vec3::ZERO,
                attenuation: Vec3::ONE,
                done: false,
                hit: HitInfo::default(),
            };

            for _depth in 0..self.options.max_depth {
                payload.radiance = Vec3::ZERO;

                self.trace_ray(&ray, &mut payload);

                result += payload.attenuation * payload.radiance;

                if payload.done {
                    break;
                }

                ray.origin = payload.origin;
                ray.direction = payload.direction;
            }
        }

        result / samples as f32
    }

    /// One centered, unjittered ray per pixel for the debug output modes.
    fn ray_gen_single(&self, x: u32, y: u32, width: u32, height: u32, params: &FrameParams) -> Vec3 {
        let u = (x as f32 + 0.5) / (width - 1) as f32;
        let v = (y as f32 + 0.5) / (height - 1) as f32;

        let ray = self.primary_ray(u, v, params);

        let mut hit = HitInfo::default();
        self.scene.ray_intersect(&ray, &mut hit);

        if hit.t < f32::INFINITY {
            match self.options.output {
                RenderOutput::Albedo => hit.material.color,
                RenderOutput::Normal => (hit.normal + Vec3::ONE) * 0.5,
                RenderOutput::Barycentric => hit.bary,
                RenderOutput::Depth => {
                    Vec3::splat((hit.t / self.camera.far()).clamp(0.0, 1.0))
                }
                // Beaut does not come through the single-sample path.
                RenderOutput::Beaut => Vec3::new(1.0, 0.0, 1.0),
            }
        } else {
            Vec3::splat(0.1)
        }
    }

    /// Map pixel-space `(u, v)` in `[0, 1]²` through the camera frame.
    fn primary_ray(&self, u: f32, v: f32, params: &FrameParams) -> Ray {
        // NDC remap to [-1, 1], scaled by the field of view.
        let ndc_u = (u * 2.0 - 1.0) * params.ndc_x_scale;
        let ndc_v = (v * 2.0 - 1.0) * params.ndc_y_scale;

        let direction =
            (params.right * ndc_u + params.up * ndc_v + params.front).normalize();
        Ray::new(params.position, direction)
    }

    fn trace_ray(&self, ray: &Ray, payload: &mut Payload) {
        let mut hit = HitInfo::default();
        if self.scene.ray_intersect(ray, &mut hit) {
            payload.hit = hit;
            self.closest_hit(ray, payload);
        } else {
            miss_hit(ray, payload);
        }
    }

    /// Lambertian surface interaction: attenuate, pick up emission and
    /// bounce through a cosine-weighted direction around the face-forward
    /// normal.
    fn closest_hit(&self, ray: &Ray, payload: &mut Payload) {
        let n = payload.hit.normal;
        let p = ray.at(payload.hit.t);
        let ffnormal = face_forward(-ray.direction, n);

        let (wi, _pdf) =
            cosine_sample_hemisphere(payload.rng.next_f32(), payload.rng.next_f32());
        let wi = tangent_to_world(wi, ffnormal);

        payload.attenuation *= payload.hit.material.color;
        payload.radiance += payload.hit.material.emissive;
        payload.direction = wi;
        payload.origin = p + ffnormal * BOUNCE_EPSILON;
    }
}

/// The miss shader: a vertical white-to-blue sky gradient, and the path
/// terminates.
fn miss_hit(ray: &Ray, payload: &mut Payload) {
    let t = 0.5 * (ray.direction.y + 1.0);
    payload.radiance = Vec3::ONE * (1.0 - t) + Vec3::new(0.5, 0.7, 1.0) * t;
    payload.done = true;
}

/// Pack a linear color into `(r << 16) | (g << 8) | b`, clamping each
/// channel so bright radiance cannot spill into the neighboring bytes.
fn pack_rgb(color: Vec3) -> u32 {
    let r = (color.x * 255.0).clamp(0.0, 255.0) as u32;
    let g = (color.y * 255.0).clamp(0.0, 255.0) as u32;
    let b = (color.z * 255.0).clamp(0.0, 255.0) as u32;

    (r << 16) | (g << 8) | b
}
