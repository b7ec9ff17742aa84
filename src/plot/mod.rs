//! # 图表生成模块
//!
//! 使用 `plotters` 绘制收敛曲线和 E–V 曲线。
//!
//! ## 子模块
//! - `convergence`: k 点 / ENCUT 双面板收敛图
//! - `eos`: E–V 采样 + Vinet 曲线
//!
//! ## 依赖关系
//! - 被 `db/convergence.rs`, `db/eos.rs` 调用
//! - 使用 `plotters` 渲染 PNG / SVG

pub mod convergence;
pub mod eos;

use crate::error::SemidbError;

use std::path::PathBuf;

/// 曲线主色
pub const PRIMARY_COLOR: plotters::style::RGBColor = plotters::style::RGBColor(0, 102, 204);
/// 第二曲线颜色
pub const SECONDARY_COLOR: plotters::style::RGBColor = plotters::style::RGBColor(255, 140, 0);

/// 图像输出选项
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl PlotOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        PlotOptions {
            output: output.into(),
            width: 1000,
            height: 400,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// 按扩展名判断是否输出 SVG
    pub fn is_svg(&self) -> bool {
        self.output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("svg"))
            .unwrap_or(false)
    }
}

/// plotters 错误转换
pub(crate) fn plot_err<E: std::fmt::Debug>(e: E) -> SemidbError {
    SemidbError::PlotError(format!("{:?}", e))
}

/// 带 10% 边距的坐标范围；所有值相等时给出一个很小的非零范围
pub(crate) fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.1
    } else {
        max.abs().max(1.0) * 1e-3
    };
    (min - pad, max + pad)
}
