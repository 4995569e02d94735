//! Bucket-based parallel rendering.
//!
//! Divides the image into tiles (buckets) rendered independently with rayon.
//! Each bucket seeds its own random generator from the render seed and its
//! position, so the image does not depend on thread count or scheduling.

use crate::sampling::JitterGrid;
use crate::{Camera, RayTracer};
use glint_math::{Color, GeometryError};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Render settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Anti-aliasing rays per pixel, rounded up to a square grid
    pub samples_per_pixel: u32,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Seed for all jittered sampling
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            samples_per_pixel: 1,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
        }
    }
}

impl RenderSettings {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::InvalidConfig("image resolution must be non-zero"));
        }
        if self.bucket_size == 0 {
            return Err(GeometryError::InvalidConfig("bucket size must be non-zero"));
        }
        Ok(())
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA, clamping each channel to [0, 1].
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f64| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [channel(color.r()), channel(color.g()), channel(color.b()), 255]
}

/// Linear color image in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width as usize) * (height as usize)],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Overlay grid lines every `interval` pixels, plus the right and bottom
    /// borders. Handy for checking camera framing.
    pub fn draw_grid(&mut self, interval: u32, color: Color) {
        let interval = interval.max(1);
        for y in 0..self.height {
            for x in 0..self.width {
                if x % interval == 0 || y % interval == 0 || x == self.width - 1 || y == self.height - 1 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to gamma-corrected RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }
}

/// A tile of the image traced on one worker with its own generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Top-left pixel column
    pub x: u32,
    /// Top-left pixel row
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the center-out render order
    pub order: usize,
    /// Seed for this tile's `StdRng`, fixed by the render seed and the
    /// tile's position
    pub seed: u64,
}

impl Bucket {
    fn at(x: u32, y: u32, width: u32, height: u32, render_seed: u64) -> Self {
        let position = (u64::from(x) << 32) | u64::from(y);
        Self {
            x,
            y,
            width,
            height,
            order: 0,
            seed: render_seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ position,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Squared distance from the tile center to the image center, in
    /// half-pixel units so it stays integral.
    fn center_distance(&self, image_width: u32, image_height: u32) -> i64 {
        let dx = 2 * i64::from(self.x) + i64::from(self.width) - i64::from(image_width);
        let dy = 2 * i64::from(self.y) + i64::from(self.height) - i64::from(image_height);
        dx * dx + dy * dy
    }
}

/// Split an image into tiles of at most `bucket_size` pixels a side,
/// ordered from the image center outwards.
///
/// Ties keep row-major order, so the order is fully determined by the
/// image and tile sizes.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32, seed: u64) -> Vec<Bucket> {
    let step = bucket_size.max(1);
    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(step as usize)
        .flat_map(|y| (0..width).step_by(step as usize).map(move |x| (x, y)))
        .map(|(x, y)| Bucket::at(x, y, step.min(width - x), step.min(height - y), seed))
        .collect();

    buckets.sort_by_key(|b| (b.center_distance(width, height), b.y, b.x));
    for (order, bucket) in buckets.iter_mut().enumerate() {
        bucket.order = order;
    }
    buckets
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

/// Thread-safe count of finished buckets, for observation only.
#[derive(Debug, Default)]
pub struct Progress {
    completed: AtomicUsize,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    fn tick(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Buckets finished so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Render a single pixel: trace its anti-aliasing bundle and average.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    tracer: &RayTracer<'_>,
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    grid: &JitterGrid,
    rng: &mut dyn RngCore,
) -> Color {
    let rays = camera.construct_rays(width, height, x, y, grid, rng);
    tracer.trace_rays(&rays, rng)
}

/// Render a single bucket. Pixels come back in row-major order.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    tracer: &RayTracer<'_>,
    settings: &RenderSettings,
) -> BucketResult {
    let grid = JitterGrid::for_sample_count(settings.samples_per_pixel);
    let mut rng = StdRng::seed_from_u64(bucket.seed);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(
                camera,
                tracer,
                settings.width,
                settings.height,
                bucket.x + local_x,
                bucket.y + local_y,
                &grid,
                &mut rng,
            );
            pixels.push(color);
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Render the whole image in parallel.
pub fn render(
    camera: &Camera,
    tracer: &RayTracer<'_>,
    settings: &RenderSettings,
) -> Result<ImageBuffer, GeometryError> {
    render_with_progress(camera, tracer, settings, &Progress::new())
}

/// Render the whole image in parallel, counting finished buckets in
/// `progress` as they complete.
pub fn render_with_progress(
    camera: &Camera,
    tracer: &RayTracer<'_>,
    settings: &RenderSettings,
    progress: &Progress,
) -> Result<ImageBuffer, GeometryError> {
    settings.validate()?;

    let start = Instant::now();
    let buckets = generate_buckets(
        settings.width,
        settings.height,
        settings.bucket_size,
        settings.seed,
    );
    let total = buckets.len();
    log::info!(
        "Rendering '{}' at {}x{}: {} buckets, {} spp",
        tracer.scene().name(),
        settings.width,
        settings.height,
        total,
        settings.samples_per_pixel.max(1)
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, tracer, settings);
            let done = progress.tick();
            log::debug!("Bucket {} at ({}, {}) done [{done}/{total}]", bucket.order, bucket.x, bucket.y);
            result
        })
        .collect();

    let mut image = ImageBuffer::new(settings.width, settings.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}
