//! Scatter-plot rendering, behind the `plot` feature. Off by default so the core and CLI build
//! without a plotting backend, mirroring `imlet`'s optional `viewer` feature.

use plotters::prelude::*;

use crate::error::{CrError, CrResult};

const DEFAULT_COLOR: RGBColor = RGBColor(0xED, 0x82, 0x3D);
const CLUSTER_PALETTE: [RGBColor; 6] = [
    RGBColor(0xED, 0x82, 0x3D),
    RGBColor(0x3D, 0x7D, 0xED),
    RGBColor(0x3D, 0xED, 0x82),
    RGBColor(0xED, 0x3D, 0xC0),
    RGBColor(0xC0, 0xED, 0x3D),
    RGBColor(0x82, 0x3D, 0xED),
];

/// Render `(xs, ys)` as a scatter plot PNG at `path`, optionally colour-coding points by
/// `clusters` (one label per point; `None` renders every point in [`DEFAULT_COLOR`], matching
/// the reference implementation's `visualization/plotter.py::compose_scatter_plot`).
pub fn render_scatter(
    xs: &[f32],
    ys: &[f32],
    clusters: Option<&[i64]>,
    path: &str,
) -> CrResult<()> {
    if xs.len() != ys.len() {
        return Err(CrError::InvalidConfig(
            "xs and ys must have the same length".to_string(),
        ));
    }
    if let Some(clusters) = clusters {
        if clusters.len() != xs.len() {
            return Err(CrError::InvalidConfig(
                "clusters must have one entry per point".to_string(),
            ));
        }
    }

    let (x_min, x_max) = bounds(xs);
    let (y_min, y_max) = bounds(ys);

    let root = BitMapBackend::new(path, (900, 900)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|err| CrError::InvalidConfig(format!("failed to fill plot background: {err}")))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|err| CrError::InvalidConfig(format!("failed to build chart: {err}")))?;

    chart
        .configure_mesh()
        .draw()
        .map_err(|err| CrError::InvalidConfig(format!("failed to draw mesh: {err}")))?;

    chart
        .draw_series(xs.iter().zip(ys.iter()).enumerate().map(|(i, (&x, &y))| {
            let color = match clusters {
                Some(labels) => CLUSTER_PALETTE[(labels[i].max(0) as usize) % CLUSTER_PALETTE.len()],
                None => DEFAULT_COLOR,
            };
            Circle::new((x, y), 2, color.filled())
        }))
        .map_err(|err| CrError::InvalidConfig(format!("failed to draw points: {err}")))?;

    root.present()
        .map_err(|err| CrError::InvalidConfig(format!("failed to write {path}: {err}")))?;

    Ok(())
}

fn bounds(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if (max - min).abs() < f32::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        let xs = [0.0_f32, 1.0];
        let ys = [0.0_f32];
        assert!(render_scatter(&xs, &ys, None, "/tmp/osipenko-plot-test.png").is_err());
    }

    #[test]
    fn degenerate_bounds_widen_to_a_unit_window() {
        assert_eq!(bounds(&[1.0, 1.0, 1.0]), (0.5, 1.5));
    }
}
