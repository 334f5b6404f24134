//! Headless raster stage.
//!
//! Draws an orthographic projection of the structure onto the XY plane: every
//! atom as a small disk (the licorice layer) and non-CHON atoms as larger
//! disks (the ball+stick layer), colored by element. Cartoon and label layers
//! have no raster counterpart and are kept only for bookkeeping.

use std::io::Cursor;
use std::sync::Arc;

use esi_model::{Bounds, Structure};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::Result;
use crate::policy::{GeometryKind, RepresentationRequest, Style};
use crate::stage::{Stage, StageFactory};

/// Default snapshot width in pixels.
pub const DEFAULT_WIDTH: u32 = 640;

/// Default snapshot height in pixels.
pub const DEFAULT_HEIGHT: u32 = 480;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Stick radius in pixels; spheres are scaled by the style's aspect ratio.
const STICK_RADIUS: f64 = 2.0;

/// Fraction of the canvas kept free around the content after `auto_view`.
const MARGIN: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Camera {
    center: [f64; 3],
    scale: f64,
}

struct Layer {
    structure: Arc<Structure>,
    request: RepresentationRequest,
}

/// Stage rendering to an in-memory RGBA canvas.
pub struct RasterStage {
    mount_id: String,
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    camera: Option<Camera>,
}

impl RasterStage {
    /// Create a stage with the given canvas size.
    pub fn new(mount_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            mount_id: mount_id.into(),
            width: width.max(1),
            height: height.max(1),
            layers: Vec::new(),
            camera: None,
        }
    }

    /// Mount point this stage is bound to.
    #[must_use]
    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    /// Geometry kinds added so far, in order.
    #[must_use]
    pub fn layer_kinds(&self) -> Vec<GeometryKind> {
        self.layers.iter().map(|layer| layer.request.kind).collect()
    }

    fn fit(&self, bounds: Bounds) -> Camera {
        let usable = f64::from(self.width.min(self.height)) * (1.0 - 2.0 * MARGIN);
        let extent = bounds.extent();
        let scale = if extent > 0.0 { usable / extent } else { 1.0 };
        Camera {
            center: bounds.center(),
            scale,
        }
    }

    fn project(&self, camera: Camera, position: [f64; 3]) -> (f64, f64) {
        let x = (position[0] - camera.center[0]) * camera.scale + f64::from(self.width) / 2.0;
        // Image rows grow downwards
        let y = f64::from(self.height) / 2.0 - (position[1] - camera.center[1]) * camera.scale;
        (x, y)
    }

    fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let Some(camera) = self.camera.or_else(|| self.content_bounds().map(|b| self.fit(b)))
        else {
            return canvas;
        };

        for layer in &self.layers {
            let radius = match layer.request.style {
                Style::Licorice { .. } => STICK_RADIUS,
                Style::BallAndStick { aspect_ratio, .. } => STICK_RADIUS * f64::from(aspect_ratio),
                Style::Cartoon | Style::Label { .. } => continue,
            };
            for &i in layer.request.selection.indices() {
                let Some(atom) = layer.structure.atoms().get(i) else {
                    continue;
                };
                let (cx, cy) = self.project(camera, atom.position);
                fill_disk(&mut canvas, cx, cy, radius, element_color(atom.element.as_str()));
            }
        }
        canvas
    }

    fn content_bounds(&self) -> Option<Bounds> {
        let mut merged: Option<Bounds> = None;
        for layer in &self.layers {
            let Some(bounds) = layer.structure.bounds() else {
                continue;
            };
            merged = Some(match merged {
                None => bounds,
                Some(acc) => Bounds {
                    min: std::array::from_fn(|a| acc.min[a].min(bounds.min[a])),
                    max: std::array::from_fn(|a| acc.max[a].max(bounds.max[a])),
                },
            });
        }
        merged
    }
}

impl Stage for RasterStage {
    fn add_representation(&mut self, structure: &Arc<Structure>, request: &RepresentationRequest) {
        tracing::trace!(
            viewer = %self.mount_id,
            kind = ?request.kind,
            atoms = request.selection.len(),
            "Adding representation"
        );
        self.layers.push(Layer {
            structure: Arc::clone(structure),
            request: request.clone(),
        });
    }

    fn auto_view(&mut self) {
        self.camera = self.content_bounds().map(|bounds| self.fit(bounds));
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        self.render()
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

/// Creates [`RasterStage`]s of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct RasterStageFactory {
    width: u32,
    height: u32,
}

impl RasterStageFactory {
    /// Create a factory producing `width` x `height` stages.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for RasterStageFactory {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl StageFactory for RasterStageFactory {
    fn create(&self, mount_id: &str) -> Box<dyn Stage> {
        Box::new(RasterStage::new(mount_id, self.width, self.height))
    }
}

fn fill_disk(canvas: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil().max(0.0) as u32).min(width.saturating_sub(1));
    let y1 = ((cy + radius).ceil().max(0.0) as u32).min(height.saturating_sub(1));
    let r2 = radius * radius;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// CPK-style colors for common elements.
fn element_color(symbol: &str) -> Rgba<u8> {
    match symbol {
        "H" => Rgba([200, 200, 200, 255]),
        "C" => Rgba([80, 80, 80, 255]),
        "N" => Rgba([48, 80, 248, 255]),
        "O" => Rgba([255, 13, 13, 255]),
        "S" => Rgba([255, 200, 50, 255]),
        "P" => Rgba([255, 128, 0, 255]),
        "F" | "Cl" => Rgba([31, 240, 31, 255]),
        "Br" => Rgba([166, 41, 41, 255]),
        "I" => Rgba([148, 0, 148, 255]),
        "Fe" => Rgba([224, 102, 51, 255]),
        _ => Rgba([255, 20, 147, 255]),
    }
}
