//! Debug figures of the density used for clustering.
//!
//! The pipeline only assembles a [`DensityFigure`]; rendering is delegated to a
//! [`FigureWriter`]. With the `plot` feature enabled the default writer renders SVG
//! through plotters, otherwise the figure is summarised in the log.

use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::error::Result;

/// Suffix substituted into the figure path template.
pub const DENSITY_FIGURE_SUFFIX: &str = "_density_cluster";

/// Everything needed to draw one clustering call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityFigure {
    /// Flattened input scores.
    pub scores: Vec<f64>,
    /// Positions of the density samples.
    pub positions: Vec<f64>,
    /// Smoothed density.
    pub smoothed: Vec<f64>,
    /// Positions of the local maxima.
    pub maxima: Vec<f64>,
    /// Positions of the local minima.
    pub minima: Vec<f64>,
    /// `(min, max)` score range of every accepted cluster.
    pub clusters: Vec<(f64, f64)>,
}

/// Persists a [`DensityFigure`].
pub trait FigureWriter: Send + Sync {
    /// Write `figure` to `path`.
    fn write(&self, figure: &DensityFigure, path: &Path) -> Result<()>;
}

/// Writer that only logs a summary of the figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFigureWriter;

impl FigureWriter for LogFigureWriter {
    fn write(&self, figure: &DensityFigure, path: &Path) -> Result<()> {
        debug!(
            "density figure for {}: {} scores, {} density samples, {} maxima, {} minima, clusters {:?}",
            path.display(),
            figure.scores.len(),
            figure.smoothed.len(),
            figure.maxima.len(),
            figure.minima.len(),
            figure.clusters
        );
        Ok(())
    }
}

#[cfg(feature = "plot")]
pub use svg::SvgFigureWriter;

#[cfg(feature = "plot")]
mod svg {
    use std::path::Path;

    use plotters::prelude::*;

    use super::{DensityFigure, FigureWriter};
    use crate::cluster::histogram::{self, DENSITY_SCALE};
    use crate::error::{Error, Result};

    fn figure_err(e: impl std::fmt::Display) -> Error {
        Error::Figure(e.to_string())
    }

    /// Renders the normalised score histogram with maxima (red) and minima (blue).
    #[derive(Debug, Clone, Copy)]
    pub struct SvgFigureWriter {
        size: (u32, u32),
    }

    impl Default for SvgFigureWriter {
        fn default() -> Self {
            Self { size: (720, 360) }
        }
    }

    impl SvgFigureWriter {
        /// Set the figure size in pixels.
        pub fn with_size(mut self, width: u32, height: u32) -> Self {
            self.size = (width, height);
            self
        }
    }

    impl FigureWriter for SvgFigureWriter {
        fn write(&self, figure: &DensityFigure, path: &Path) -> Result<()> {
            let root = SVGBackend::new(path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(figure_err)?;

            if figure.scores.is_empty() {
                root.present().map_err(figure_err)?;
                return Ok(());
            }

            let edges = histogram::auto_bin_edges(&figure.scores)?;
            let bars: Vec<f64> = histogram::density_histogram(&figure.scores, None, &edges)?
                .into_iter()
                .map(|h| h * DENSITY_SCALE)
                .collect();
            let x_min = edges[0];
            let x_max = edges[edges.len() - 1];
            let y_max = bars.iter().copied().fold(0.0f64, f64::max).max(f64::EPSILON) * 1.1;

            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(30)
                .y_label_area_size(40)
                .build_cartesian_2d(x_min..x_max, 0.0..y_max)
                .map_err(figure_err)?;

            chart
                .configure_mesh()
                .x_desc("deviation score")
                .y_desc("pdf")
                .draw()
                .map_err(figure_err)?;

            chart
                .draw_series(bars.iter().zip(edges.windows(2)).map(|(&h, e)| {
                    Rectangle::new([(e[0], 0.0), (e[1], h)], BLUE.mix(0.3).filled())
                }))
                .map_err(figure_err)?
                .label("density")
                .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], BLUE.mix(0.3).filled()));

            let visible = |x: f64| (x_min..=x_max).contains(&x);
            chart
                .draw_series(figure.maxima.iter().filter(|&&x| visible(x)).map(|&x| {
                    PathElement::new(vec![(x, 0.0), (x, y_max)], RED.mix(0.5).stroke_width(1))
                }))
                .map_err(figure_err)?
                .label("relmax")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], RED));
            chart
                .draw_series(figure.minima.iter().filter(|&&x| visible(x)).map(|&x| {
                    PathElement::new(vec![(x, 0.0), (x, y_max)], BLUE.mix(0.5).stroke_width(1))
                }))
                .map_err(figure_err)?
                .label("relmin")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], BLUE));

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(figure_err)?;

            root.present().map_err(figure_err)?;
            Ok(())
        }
    }
}

/// Default writer for the enabled feature set.
pub fn default_writer() -> Arc<dyn FigureWriter> {
    #[cfg(feature = "plot")]
    {
        Arc::new(SvgFigureWriter::default())
    }
    #[cfg(not(feature = "plot"))]
    {
        Arc::new(LogFigureWriter)
    }
}
