use glam::{DAffine3, DVec2, DVec3};
use scaled_perspective::{geometry::Plane, Camera, Corner, Viewport};

const MAX_CELL_INDEX: f64 = (1u64 << 52) as f64;

/// Preview plane as seen through the viewport, with a transform from
/// logical pixels on that plane into scene space.
///
/// Grid space: x to the right, y down the screen, z away from the camera,
/// one unit per logical pixel, origin at the anchor point. Depends on the
/// anchor, the camera and the viewport size, so it's rebuilt every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneGrid {
    corners: [DVec3; 4],
    transform: DAffine3,
}

impl PlaneGrid {
    /// None if a viewport corner ray misses the plane, e.g. with the anchor
    /// behind a perspective eye.
    pub fn new(anchor: DVec3, camera: &impl Camera, viewport: &Viewport) -> Option<Self> {
        if viewport.is_empty() {
            return None;
        }

        let plane = Plane::new(anchor, camera.direction())?;

        let mut corners = [DVec3::ZERO; 4];
        for corner in Corner::ALL {
            corners[corner as usize] = plane.intersect_ray(&viewport.corner_ray(camera, corner))?;
        }

        let size = viewport.size();
        let x_axis = (corners[Corner::TopRight as usize] - corners[Corner::TopLeft as usize]) / size.x;
        let y_span = (corners[Corner::BottomLeft as usize] - corners[Corner::TopLeft as usize]) / size.y;

        // right x down = away from the camera
        let normal = x_axis.cross(y_span).try_normalize()?;
        // orthogonalize y against x, keeping its per-pixel length
        let y_axis = normal.cross(x_axis).try_normalize()? * y_span.length();
        let z_axis = normal * x_axis.length();

        Some(Self {
            corners,
            transform: DAffine3::from_cols(x_axis, y_axis, z_axis, anchor),
        })
    }

    /// Visible corners, indexed by `Corner`
    pub fn corners(&self) -> [DVec3; 4] {
        self.corners
    }

    /// Corners in drawing order, walking around the quad
    pub fn quad(&self) -> [DVec3; 4] {
        let [top_left, top_right, bottom_left, bottom_right] = self.corners;
        [top_left, top_right, bottom_right, bottom_left]
    }

    pub fn transform(&self) -> DAffine3 {
        self.transform
    }

    pub fn anchor(&self) -> DVec3 {
        self.transform.translation
    }

    pub fn normal(&self) -> DVec3 {
        self.transform.matrix3.z_axis.normalize()
    }

    pub fn to_scene(&self, grid: DVec2) -> DVec3 {
        self.transform.transform_point3(grid.extend(0.0))
    }

    pub fn to_grid(&self, point: DVec3) -> DVec2 {
        self.transform.inverse().transform_point3(point).truncate()
    }

    /// Dark cells of a checkerboard covering the visible quad, one cell
    /// corner pinned to the anchor. At most `max_cells` are returned.
    pub fn checker_cells(&self, cell_size: f64, max_cells: usize) -> Vec<[DVec3; 4]> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Vec::new();
        }

        let inverse = self.transform.inverse();
        let (min, max) = self.corners.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(min, max), corner| {
                let grid = inverse.transform_point3(*corner).truncate();
                (min.min(grid), max.max(grid))
            },
        );

        let first = (min / cell_size).floor();
        let last = (max / cell_size).ceil();
        // cell indices must stay exact integers
        if !(first.is_finite() && last.is_finite())
            || first.abs().max_element() > MAX_CELL_INDEX
            || last.abs().max_element() > MAX_CELL_INDEX
        {
            tracing::warn!("checker cell size {cell_size} too small for the view, skipping");
            return Vec::new();
        }

        let mut cells = Vec::new();
        let mut row = first.y as i64;
        while row < last.y as i64 {
            let mut column = first.x as i64;
            while column < last.x as i64 {
                if column.rem_euclid(2) == row.rem_euclid(2) {
                    if cells.len() >= max_cells {
                        tracing::debug!("checkerboard capped at {max_cells} cells");
                        return cells;
                    }
                    let origin = DVec2::new(column as f64, row as f64) * cell_size;
                    cells.push([
                        self.to_scene(origin),
                        self.to_scene(origin + DVec2::new(cell_size, 0.0)),
                        self.to_scene(origin + DVec2::splat(cell_size)),
                        self.to_scene(origin + DVec2::new(0.0, cell_size)),
                    ]);
                }
                column += 1;
            }
            row += 1;
        }
        cells
    }
}
