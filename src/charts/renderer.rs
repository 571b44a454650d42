//! Static Chart Renderer
//! Renders the four exploration charts to PNG files with plotters.
//!
//! Charts:
//! 1. Outcome proportions as a pie with percentage labels
//! 2. Correlation matrix of numeric columns as an annotated heatmap
//! 3. Age histogram per outcome with a kernel density overlay
//! 4. BMI against glucose level, colored by outcome

use crate::charts::{ChartDataset, ChartError, OutcomeGroup};
use crate::config::ColumnNames;
use crate::stats::{CorrelationMatrix, StatsCalculator};
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use polars::prelude::DataFrame;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

// Colors
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const SALMON: RGBColor = RGBColor(250, 128, 114);
const COOL: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL: RGBColor = RGBColor(221, 221, 221);
const WARM: RGBColor = RGBColor(180, 4, 38);
const NAN_CELL: RGBColor = RGBColor(240, 240, 240);

const PIE_COLORS: [RGBColor; 4] = [
    SKY_BLUE,
    SALMON,
    RGBColor(144, 238, 144),
    RGBColor(221, 160, 221),
];

/// Hue palette for outcome groups
const HUE_COLORS: [RGBColor; 4] = [
    RGBColor(247, 112, 136),
    RGBColor(51, 176, 122),
    RGBColor(56, 168, 208),
    RGBColor(204, 121, 244),
];

const CHART_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (1000, 800);
const KDE_POINTS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    OutcomeShare,
    Correlation,
    AgeDistribution,
    BmiVsGlucose,
}

impl ChartKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::OutcomeShare => "outcome_share.png",
            ChartKind::Correlation => "correlation_heatmap.png",
            ChartKind::AgeDistribution => "age_distribution.png",
            ChartKind::BmiVsGlucose => "bmi_vs_glucose.png",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::OutcomeShare => "Proportion of Stroke Outcomes",
            ChartKind::Correlation => "Feature Correlation Matrix",
            ChartKind::AgeDistribution => "Patient Age Distribution",
            ChartKind::BmiVsGlucose => "BMI vs Glucose Relation",
        }
    }
}

pub struct StaticChartRenderer {
    output_dir: PathBuf,
    columns: ColumnNames,
    bins: usize,
}

impl StaticChartRenderer {
    pub fn new(output_dir: PathBuf, columns: ColumnNames, bins: usize) -> Self {
        Self {
            output_dir,
            columns,
            bins: bins.max(1),
        }
    }

    /// Render one chart and return the written file.
    pub fn render(&self, kind: ChartKind, df: &DataFrame) -> Result<PathBuf, ChartError> {
        let names = &self.columns;
        let path = self.output_dir.join(kind.file_name());

        // Gather data first so missing columns surface before touching disk.
        let drawn = match kind {
            ChartKind::OutcomeShare => {
                let shares = ChartDataset::outcome_shares(df, &names.stroke)?;
                fs::create_dir_all(&self.output_dir)?;
                Self::draw_pie(&path, kind.title(), &shares)
            }
            ChartKind::Correlation => {
                let matrix = ChartDataset::correlation(df)?;
                fs::create_dir_all(&self.output_dir)?;
                Self::draw_heatmap(&path, kind.title(), &matrix)
            }
            ChartKind::AgeDistribution => {
                let groups = ChartDataset::values_by_outcome(df, &names.age, &names.stroke)?;
                fs::create_dir_all(&self.output_dir)?;
                self.draw_histogram(&path, kind.title(), &groups)
            }
            ChartKind::BmiVsGlucose => {
                let groups =
                    ChartDataset::points_by_outcome(df, &names.bmi, &names.glucose, &names.stroke)?;
                fs::create_dir_all(&self.output_dir)?;
                self.draw_scatter(&path, kind.title(), &groups)
            }
        };

        drawn.map_err(|e| ChartError::Render(e.to_string()))?;
        log::info!("rendered {:?} chart to {}", kind, path.display());
        Ok(path)
    }

    fn draw_pie(
        path: &Path,
        title: &str,
        shares: &[(String, usize)],
    ) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(title, ("sans-serif", 28))?;

        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = w.min(h) as f64 * 0.4;

        let sizes: Vec<f64> = shares.iter().map(|(_, count)| *count as f64).collect();
        let colors: Vec<RGBColor> = (0..shares.len())
            .map(|i| PIE_COLORS[i % PIE_COLORS.len()])
            .collect();
        let labels: Vec<&str> = shares.iter().map(|(label, _)| label.as_str()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 22).into_font().color(&BLACK));
        pie.percentages(("sans-serif", radius * 0.09).into_font().color(&BLACK));
        area.draw(&pie)?;

        root.present()?;
        Ok(())
    }

    fn draw_heatmap(
        path: &Path,
        title: &str,
        matrix: &CorrelationMatrix,
    ) -> Result<(), Box<dyn Error>> {
        let n = matrix.columns.len();
        let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        // Cell i spans [i - 0.5, i + 0.5]; row 0 is drawn at the top.
        let extent = -0.5..(n as f64 - 0.5);
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(170)
            .y_label_area_size(190)
            .build_cartesian_2d(extent.clone(), extent)?;

        let label_for = |v: f64, reversed: bool| -> String {
            let idx = v.round();
            if (v - idx).abs() > 1e-6 || idx < 0.0 || idx as usize >= n {
                return String::new();
            }
            let idx = idx as usize;
            let idx = if reversed { n - 1 - idx } else { idx };
            matrix.columns[idx].clone()
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|v| label_for(*v, false))
            .y_label_formatter(&|v| label_for(*v, true))
            .x_label_style(
                ("sans-serif", 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_style(("sans-serif", 14))
            .draw()?;

        let cells = (0..n).flat_map(|row| (0..n).map(move |col| (row, col)));
        chart.draw_series(cells.clone().map(|(row, col)| {
            let x = col as f64;
            let y = (n - 1 - row) as f64;
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                coolwarm(matrix.get(row, col)).filled(),
            )
        }))?;

        chart.draw_series(cells.map(|(row, col)| {
            let value = matrix.get(row, col);
            let text_color = if value.abs() > 0.6 { WHITE } else { BLACK };
            let style = ("sans-serif", 16)
                .into_font()
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            let label = if value.is_nan() {
                "nan".to_string()
            } else {
                format!("{:.2}", value)
            };
            Text::new(label, (col as f64, (n - 1 - row) as f64), style)
        }))?;

        root.present()?;
        Ok(())
    }

    fn draw_histogram(
        &self,
        path: &Path,
        title: &str,
        groups: &[OutcomeGroup<f64>],
    ) -> Result<(), Box<dyn Error>> {
        let (min, max) = value_range(groups.iter().flat_map(|g| g.values.iter().copied()));
        let width = (max - min) / self.bins as f64;

        let grid: Vec<f64> = (0..KDE_POINTS)
            .map(|i| min + (max - min) * i as f64 / (KDE_POINTS - 1) as f64)
            .collect();

        // Densities are scaled to counts so they share the histogram's axis.
        let layers: Vec<(Vec<usize>, Option<Vec<f64>>)> = groups
            .iter()
            .map(|g| {
                let counts = histogram_counts(&g.values, min, width, self.bins);
                let density = StatsCalculator::kernel_density(&g.values, &grid).map(|d| {
                    d.into_iter()
                        .map(|y| y * g.values.len() as f64 * width)
                        .collect()
                });
                (counts, density)
            })
            .collect();

        let y_max = layers
            .iter()
            .flat_map(|(counts, density)| {
                counts
                    .iter()
                    .map(|c| *c as f64)
                    .chain(density.iter().flatten().copied())
            })
            .fold(1.0f64, f64::max);

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(min..max, 0.0..y_max * 1.1)?;

        chart
            .configure_mesh()
            .x_desc(self.columns.age.as_str())
            .y_desc("Count")
            .draw()?;

        for (i, (group, (counts, density))) in groups.iter().zip(layers.iter()).enumerate() {
            let color = HUE_COLORS[i % HUE_COLORS.len()];

            chart
                .draw_series(counts.iter().enumerate().map(|(bin, count)| {
                    let x0 = min + bin as f64 * width;
                    Rectangle::new(
                        [(x0, 0.0), (x0 + width, *count as f64)],
                        color.mix(0.45).filled(),
                    )
                }))?
                .label(format!("{} = {}", self.columns.stroke, group.label))
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });

            if let Some(density) = density {
                chart.draw_series(LineSeries::new(
                    grid.iter().copied().zip(density.iter().copied()),
                    color.stroke_width(2),
                ))?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    fn draw_scatter(
        &self,
        path: &Path,
        title: &str,
        groups: &[OutcomeGroup<(f64, f64)>],
    ) -> Result<(), Box<dyn Error>> {
        let (x_min, x_max) = padded(value_range(
            groups.iter().flat_map(|g| g.values.iter().map(|(x, _)| *x)),
        ));
        let (y_min, y_max) = padded(value_range(
            groups.iter().flat_map(|g| g.values.iter().map(|(_, y)| *y)),
        ));

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(self.columns.bmi.as_str())
            .y_desc(self.columns.glucose.as_str())
            .draw()?;

        for (i, group) in groups.iter().enumerate() {
            let color = HUE_COLORS[i % HUE_COLORS.len()];
            chart
                .draw_series(
                    group
                        .values
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.6).filled())),
                )?
                .label(format!("{} = {}", self.columns.stroke, group.label))
                .legend(move |(x, y)| Circle::new((x + 6, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

/// Diverging blue-white-red scale over [-1, 1].
fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return NAN_CELL;
    }
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COOL, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, WARM, v)
    };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Counts per equal-width bin; the maximum lands in the last bin.
fn histogram_counts(values: &[f64], min: f64, width: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    for &v in values {
        let idx = ((v - min) / width).floor();
        let idx = if idx.is_finite() && idx > 0.0 { idx as usize } else { 0 };
        counts[idx.min(bins - 1)] += 1;
    }
    counts
}

/// Minimum and maximum, widened when they coincide.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_infinite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    (min, max)
}

fn padded((min, max): (f64, f64)) -> (f64, f64) {
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
