//! # E–V 曲线图
//!
//! 原始采样点 + 由已存储 Vinet 参数求值的拟合曲线（不做任何拟合）。
//!
//! ## 依赖关系
//! - 被 `db/eos.rs` 调用
//! - 使用 `models/eos.rs` 的 EosRecord, VinetFit

use crate::error::{Result, SemidbError};
use crate::models::EosRecord;
use crate::plot::{padded_range, plot_err, PlotOptions, PRIMARY_COLOR, SECONDARY_COLOR};

use plotters::coord::Shift;
use plotters::prelude::*;

/// 拟合曲线采样点数
const CURVE_POINTS: usize = 200;

/// 生成 E–V 图 (PNG 或 SVG)
pub fn render(title: &str, record: &EosRecord, options: &PlotOptions) -> Result<()> {
    if record.samples.is_empty() && record.fit.is_none() {
        return Err(SemidbError::Other(format!("Nothing to plot for {}", title)));
    }

    if options.is_svg() {
        let root =
            SVGBackend::new(&options.output, (options.width, options.height)).into_drawing_area();
        draw_chart(&root, title, record)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(&options.output, (options.width, options.height))
            .into_drawing_area();
        draw_chart(&root, title, record)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 拟合曲线：有采样时覆盖采样体积范围，否则取 V0 ± 10%
fn fit_curve(record: &EosRecord) -> Vec<(f64, f64)> {
    let fit = match record.fit {
        Some(fit) => fit,
        None => return Vec::new(),
    };

    let (v_lo, v_hi) = record
        .volume_range()
        .unwrap_or((fit.v0 * 0.9, fit.v0 * 1.1));
    let step = (v_hi - v_lo) / (CURVE_POINTS - 1) as f64;

    (0..CURVE_POINTS)
        .map(|i| {
            let v = v_lo + step * i as f64;
            (v, fit.energy_at(v))
        })
        .collect()
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    record: &EosRecord,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let samples = record.curve();
    let curve = fit_curve(record);

    let (x_min, x_max) = padded_range(samples.iter().chain(curve.iter()).map(|(v, _)| *v));
    let (y_min, y_max) = padded_range(samples.iter().chain(curve.iter()).map(|(_, e)| *e));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Volume (Å³)")
        .y_desc("Energy (eV)")
        .y_label_formatter(&|y| format!("{:.3}", y))
        .draw()
        .map_err(plot_err)?;

    if !curve.is_empty() {
        chart
            .draw_series(LineSeries::new(
                curve.iter().copied(),
                SECONDARY_COLOR.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label("Vinet fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &SECONDARY_COLOR));
    }

    if !samples.is_empty() {
        chart
            .draw_series(
                samples
                    .iter()
                    .map(|(v, e)| Circle::new((*v, *e), 5, PRIMARY_COLOR.filled())),
            )
            .map_err(plot_err)?
            .label("E-V data")
            .legend(|(x, y)| Circle::new((x + 10, y), 5, PRIMARY_COLOR.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvSample, VinetFit};

    #[test]
    fn test_fit_curve_spans_samples() {
        let record = EosRecord {
            fit: Some(VinetFit {
                e0: -10.0,
                v0: 40.0,
                b0: 80.0,
                bp: 4.0,
            }),
            samples: vec![
                EvSample {
                    volume: 36.0,
                    energy: -9.9,
                },
                EvSample {
                    volume: 44.0,
                    energy: -9.95,
                },
            ],
        };
        let curve = fit_curve(&record);
        assert_eq!(curve.len(), CURVE_POINTS);
        assert!((curve[0].0 - 36.0).abs() < 1e-12);
        assert!((curve[CURVE_POINTS - 1].0 - 44.0).abs() < 1e-9);
        assert!(curve.iter().all(|(_, e)| *e >= -10.0 - 1e-12));
    }

    #[test]
    fn test_fit_curve_without_fit_is_empty() {
        let record = EosRecord::default();
        assert!(fit_curve(&record).is_empty());
    }
}
