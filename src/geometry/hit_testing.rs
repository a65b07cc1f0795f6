use super::{CellCoord, MapPoint, PixelSize, RasterBounds};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// The point lies outside the raster extent along `0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds(pub Axis);

/// Finds the raster cell under `point`.
///
/// Both edges of the extent count as inside. The x axis is checked first, so a
/// point outside on both axes reports [`Axis::X`]. A point exactly on the east
/// or south edge belongs to the last column or row.
pub fn cell_at(
    bounds: &RasterBounds,
    pixel_size: PixelSize,
    point: MapPoint,
) -> Result<CellCoord, OutOfBounds> {
    if !(bounds.xmin <= point.x && point.x <= bounds.xmax) {
        return Err(OutOfBounds(Axis::X));
    }
    let col = ((point.x - bounds.xmin) / pixel_size.x).floor();

    if !(bounds.ymin <= point.y && point.y <= bounds.ymax) {
        return Err(OutOfBounds(Axis::Y));
    }
    let row = ((bounds.ymax - point.y) / pixel_size.y).floor();

    let last_col = last_index(bounds.width(), pixel_size.x);
    let last_row = last_index(bounds.height(), pixel_size.y);
    Ok(CellCoord::new(
        col.min(last_col) as usize,
        row.min(last_row) as usize,
    ))
}

fn last_index(extent: f64, pixel_size: f64) -> f64 {
    ((extent / pixel_size).round() - 1.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid() -> (RasterBounds, PixelSize) {
        (RasterBounds::new(0.0, 0.0, 10.0, 10.0), PixelSize::new(1.0, 1.0))
    }

    #[test]
    fn north_west_cell_is_origin() {
        let (bounds, size) = unit_grid();
        assert_eq!(cell_at(&bounds, size, MapPoint::new(0.5, 9.5)), Ok(CellCoord::new(0, 0)));
    }

    #[test]
    fn south_east_cell() {
        let (bounds, size) = unit_grid();
        assert_eq!(cell_at(&bounds, size, MapPoint::new(9.9, 0.1)), Ok(CellCoord::new(9, 9)));
    }

    #[test]
    fn outside_reports_axis() {
        let (bounds, size) = unit_grid();
        assert_eq!(cell_at(&bounds, size, MapPoint::new(10.1, 5.0)), Err(OutOfBounds(Axis::X)));
        assert_eq!(cell_at(&bounds, size, MapPoint::new(5.0, -0.1)), Err(OutOfBounds(Axis::Y)));
        assert_eq!(cell_at(&bounds, size, MapPoint::new(-1.0, -1.0)), Err(OutOfBounds(Axis::X)));
    }

    #[test]
    fn far_edges_belong_to_last_cell() {
        let (bounds, size) = unit_grid();
        assert_eq!(cell_at(&bounds, size, MapPoint::new(10.0, 0.0)), Ok(CellCoord::new(9, 9)));
        assert_eq!(cell_at(&bounds, size, MapPoint::new(0.0, 10.0)), Ok(CellCoord::new(0, 0)));
    }

    #[test]
    fn non_square_pixels_and_offset_origin() {
        let bounds = RasterBounds::new(100.0, 200.0, 140.0, 230.0);
        let size = PixelSize::new(4.0, 3.0);
        assert_eq!(
            cell_at(&bounds, size, MapPoint::new(109.0, 222.5)),
            Ok(CellCoord::new(2, 2))
        );
    }
}
