//! Plot feature - line plots of one dataset, or one against another.
//!
//! `p` plots the selected dataset against its index. `P` marks the selected
//! dataset as the Y series; the next `p` plots it against the dataset
//! selected then.

pub mod ui;

use crate::error::{H5LensError, Result};
use ndarray::{ArrayD, Axis, IxDyn};

/// A dataset marked as the Y series of a pending "plot against".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotMark {
    /// Tree key of the marked node.
    pub key: String,
    /// Dataset path.
    pub path: String,
}

/// One line of a plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label.
    pub name: String,
    /// Points in plot order.
    pub points: Vec<(f64, f64)>,
}

/// Data ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    /// Plot title.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Lines to draw.
    pub series: Vec<Series>,
}

/// Remove every axis of length one.
fn squeeze(array: ArrayD<f64>) -> Result<ArrayD<f64>> {
    let shape: Vec<usize> = array.shape().iter().copied().filter(|&d| d != 1).collect();
    array
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order(IxDyn(&shape))
        .map_err(|e| H5LensError::Plot(e.to_string()))
}

impl PlotData {
    /// Build plot data from `y` and an optional `x`.
    ///
    /// Singleton axes are squeezed first. A 0-D or 1-D `y` gives one series,
    /// a 2-D `y` one series per column. Without `x` the row index is used;
    /// with `x` it must be 1-D and as long as `y` has rows.
    pub fn build(y_name: &str, y: ArrayD<f64>, x: Option<(&str, ArrayD<f64>)>) -> Result<Self> {
        let y = squeeze(y)?;
        let columns: Vec<Vec<f64>> = match y.ndim() {
            0 | 1 => vec![y.iter().copied().collect()],
            2 => y
                .axis_iter(Axis(1))
                .map(|column| column.iter().copied().collect())
                .collect(),
            n => {
                return Err(H5LensError::Plot(format!(
                    "{} has {} dimensions; only 1-D and 2-D data can be plotted",
                    y_name, n
                )))
            },
        };
        let rows = columns.first().map_or(0, Vec::len);

        let (x_label, x_values) = match x {
            None => ("index".to_string(), (0..rows).map(|i| i as f64).collect::<Vec<_>>()),
            Some((x_name, x)) => {
                let x = squeeze(x)?;
                if x.ndim() > 1 {
                    return Err(H5LensError::Plot(format!(
                        "X data {} must be one-dimensional",
                        x_name
                    )));
                }
                if x.len() != rows {
                    return Err(H5LensError::Plot(format!(
                        "X data {} has {} values but {} has {} rows",
                        x_name,
                        x.len(),
                        y_name,
                        rows
                    )));
                }
                (x_name.to_string(), x.iter().copied().collect())
            },
        };

        let multiple = columns.len() > 1;
        let series = columns
            .into_iter()
            .enumerate()
            .map(|(i, column)| Series {
                name: if multiple {
                    format!("{}[:, {}]", y_name, i)
                } else {
                    y_name.to_string()
                },
                points: x_values.iter().copied().zip(column).collect(),
            })
            .collect();

        let title = if x_label == "index" {
            y_name.to_string()
        } else {
            format!("{} vs {}", y_name, x_label)
        };

        Ok(Self {
            title,
            x_label,
            series,
        })
    }

    /// Bounds of all finite points as `((x_min, x_max), (y_min, y_max))`.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut finite = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .peekable();
        finite.peek()?;

        let init = ((f64::INFINITY, f64::NEG_INFINITY), (f64::INFINITY, f64::NEG_INFINITY));
        Some(finite.fold(init, |((x0, x1), (y0, y1)), &(x, y)| {
            ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))
        }))
    }
}

/// Plot view state.
#[derive(Debug, Default)]
pub struct PlotState {
    /// Whether the plot popup is shown.
    pub visible: bool,
    /// Marked Y series, if any.
    pub mark: Option<PlotMark>,
    /// Data of the current plot.
    pub data: Option<PlotData>,
    /// Error shown instead of a plot.
    pub error: Option<String>,
}

impl PlotState {
    /// Create a new plot state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a plot.
    pub fn show(&mut self, data: PlotData) {
        self.data = Some(data);
        self.error = None;
        self.visible = true;
    }

    /// Show an error instead of a plot.
    pub fn set_error(&mut self, error: String) {
        self.data = None;
        self.error = Some(error);
        self.visible = true;
    }

    /// Close the popup.
    pub fn close(&mut self) {
        self.visible = false;
        self.data = None;
        self.error = None;
    }

    /// Mark a dataset as the Y series.
    pub fn mark(&mut self, key: String, path: String) {
        self.mark = Some(PlotMark { key, path });
    }

    /// Take the pending mark, leaving none.
    pub fn take_mark(&mut self) -> Option<PlotMark> {
        self.mark.take()
    }

    /// Forget the pending mark.
    pub fn reset(&mut self) {
        self.mark = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn vector_plots_against_index() {
        let data = PlotData::build("y", arr1(&[3.0, 4.0, 5.0]).into_dyn(), None).unwrap();
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].points, vec![(0.0, 3.0), (1.0, 4.0), (2.0, 5.0)]);
        assert_eq!(data.x_label, "index");
    }

    #[test]
    fn row_vector_is_squeezed() {
        let y = arr2(&[[1.0, 2.0]]).into_dyn();
        let data = PlotData::build("y", y, None).unwrap();
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].points.len(), 2);
    }

    #[test]
    fn matrix_gives_one_series_per_column() {
        let y = arr2(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]).into_dyn();
        let x = arr1(&[0.5, 1.0, 1.5]).into_dyn();
        let data = PlotData::build("y", y, Some(("x", x))).unwrap();
        assert_eq!(data.series.len(), 2);
        assert_eq!(data.series[1].name, "y[:, 1]");
        assert_eq!(data.series[1].points[2], (1.5, 30.0));
        assert_eq!(data.title, "y vs x");
    }

    #[test]
    fn mismatched_x_is_rejected() {
        let y = arr1(&[1.0, 2.0, 3.0]).into_dyn();
        let x = arr1(&[1.0, 2.0]).into_dyn();
        assert!(matches!(
            PlotData::build("y", y, Some(("x", x))),
            Err(H5LensError::Plot(_))
        ));
    }

    #[test]
    fn three_dimensional_data_is_rejected() {
        let y = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
        assert!(PlotData::build("cube", y, None).is_err());
    }

    #[test]
    fn bounds_skip_non_finite_points() {
        let y = arr1(&[1.0, f64::NAN, 5.0]).into_dyn();
        let data = PlotData::build("y", y, None).unwrap();
        assert_eq!(data.bounds(), Some(((0.0, 2.0), (1.0, 5.0))));
    }

    #[test]
    fn mark_is_taken_once() {
        let mut state = PlotState::new();
        state.mark("/y".into(), "/y".into());
        assert!(state.take_mark().is_some());
        assert!(state.take_mark().is_none());
    }
}
