//! # 数据模型模块
//!
//! 定义材料键、收敛序列、状态方程和合金记录。
//!
//! ## 依赖关系
//! - 被 `dataset/`, `db/`, `plot/` 和 `commands/` 使用
//! - 子模块: material, convergence, eos, alloy

pub mod alloy;
pub mod convergence;
pub mod eos;
pub mod material;

pub use alloy::{AlloyEntry, AlloyProperty, AlloyValue};
pub use convergence::{
    ConvType, ConvergencePoint, ConvergenceSeries, EnergyBasis, SeriesKey, DEFAULT_FUNCTIONAL,
};
pub use eos::{EosRecord, EosValue, EvSample, FitParam, VinetFit};
pub use material::MaterialKey;
