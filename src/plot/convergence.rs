//! # 收敛图
//!
//! 左侧 k 点收敛，右侧 ENCUT 收敛；缺失的序列在对应面板中显示提示文字。
//!
//! ## 依赖关系
//! - 被 `db/convergence.rs` 调用
//! - 使用 `models/convergence.rs` 的 ConvergenceSeries
//! - 使用 `plotters` 渲染图表

use crate::error::Result;
use crate::models::{ConvType, ConvergenceSeries, EnergyBasis};
use crate::plot::{padded_range, plot_err, PlotOptions, PRIMARY_COLOR, SECONDARY_COLOR};

use plotters::coord::Shift;
use plotters::prelude::*;

/// 双面板收敛图的输入
pub struct ConvergencePanels<'a> {
    /// 标题前缀，例如 "GaN (zb, PBE)"
    pub title: String,
    pub kpt: Option<&'a ConvergenceSeries>,
    pub encut: Option<&'a ConvergenceSeries>,
    pub basis: EnergyBasis,
}

impl<'a> ConvergencePanels<'a> {
    fn series(&self, conv_type: ConvType) -> Option<&'a ConvergenceSeries> {
        match conv_type {
            ConvType::Kpt => self.kpt,
            ConvType::Encut => self.encut,
        }
    }
}

/// 生成收敛图 (PNG 或 SVG)
pub fn render(panels: &ConvergencePanels<'_>, options: &PlotOptions) -> Result<()> {
    if options.is_svg() {
        let root =
            SVGBackend::new(&options.output, (options.width, options.height)).into_drawing_area();
        draw_panels(&root, panels)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(&options.output, (options.width, options.height))
            .into_drawing_area();
        draw_panels(&root, panels)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panels: &ConvergencePanels<'_>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let areas = root.split_evenly((1, 2));
    for (area, conv_type) in areas.iter().zip(ConvType::ALL) {
        match panels.series(conv_type) {
            Some(series) if !series.is_empty() => {
                draw_series_panel(area, series, conv_type, panels)?
            }
            _ => draw_empty_panel(area, conv_type)?,
        }
    }

    Ok(())
}

fn draw_series_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &ConvergenceSeries,
    conv_type: ConvType,
    panels: &ConvergencePanels<'_>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let points = series.points(panels.basis);
    let (x_min, x_max) = padded_range(points.iter().map(|(x, _)| *x));
    let (y_min, y_max) = padded_range(points.iter().map(|(_, y)| *y));

    let (label, color) = match conv_type {
        ConvType::Kpt => ("k-point", PRIMARY_COLOR),
        ConvType::Encut => ("ENCUT", SECONDARY_COLOR),
    };

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{} {}", panels.title, label),
            ("sans-serif", 20).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(conv_type.axis_label())
        .y_desc(panels.basis.axis_label())
        .y_label_formatter(&|y| format!("{:.4}", y))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
        .map_err(plot_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 4, color.filled())),
        )
        .map_err(plot_err)?;

    Ok(())
}

fn draw_empty_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    conv_type: ConvType,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    let style = ("sans-serif", 18).into_font().color(&BLACK);
    area.draw(&Text::new(
        format!("No {} data", conv_type),
        ((w / 2) as i32 - 50, (h / 2) as i32),
        style,
    ))
    .map_err(plot_err)?;
    Ok(())
}
