//! # 状态方程数据模型
//!
//! Vinet 拟合参数与原始 E–V 采样。
//!
//! ## 依赖关系
//! - 被 `db/eos.rs`, `plot/eos.rs` 使用

use crate::error::{Result, SemidbError};

use std::str::FromStr;

/// 1 eV/Å³ = 160.21766208 GPa
pub const GPA_PER_EV_PER_A3: f64 = 160.217_662_08;

/// 可查询的拟合量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitParam {
    /// 平衡能量 (eV)
    E,
    /// 平衡体积 (Å³)
    V,
    /// 体弹模量 (GPa)
    B,
    /// 体弹模量压力导数
    Bp,
    /// 完整 E–V 曲线
    EV,
}

impl FitParam {
    pub fn unit(&self) -> &'static str {
        match self {
            FitParam::E => "eV",
            FitParam::V => "Ang^3",
            FitParam::B => "GPa",
            FitParam::Bp => "",
            FitParam::EV => "Ang^3, eV",
        }
    }
}

impl FromStr for FitParam {
    type Err = SemidbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "E" => Ok(FitParam::E),
            "V" => Ok(FitParam::V),
            "B" => Ok(FitParam::B),
            "BP" => Ok(FitParam::Bp),
            "E-V" | "EV" | "E_V" => Ok(FitParam::EV),
            _ => Err(SemidbError::InvalidArgument(format!(
                "fit_param must be one of: E, V, B, Bp, E-V (got '{}')",
                s.trim()
            ))),
        }
    }
}

impl std::fmt::Display for FitParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitParam::E => write!(f, "E"),
            FitParam::V => write!(f, "V"),
            FitParam::B => write!(f, "B"),
            FitParam::Bp => write!(f, "Bp"),
            FitParam::EV => write!(f, "E-V"),
        }
    }
}

/// Vinet 拟合结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VinetFit {
    /// 平衡能量 E0 (eV)
    pub e0: f64,
    /// 平衡体积 V0 (Å³)
    pub v0: f64,
    /// 体弹模量 B0 (GPa)
    pub b0: f64,
    /// B0' (无量纲)
    pub bp: f64,
}

impl VinetFit {
    /// 取单个标量；`EV` 不是标量，返回 `None`
    pub fn scalar(&self, param: FitParam) -> Option<f64> {
        match param {
            FitParam::E => Some(self.e0),
            FitParam::V => Some(self.v0),
            FitParam::B => Some(self.b0),
            FitParam::Bp => Some(self.bp),
            FitParam::EV => None,
        }
    }

    /// 在体积 `v` (Å³) 处求 Vinet 能量 (eV)
    pub fn energy_at(&self, v: f64) -> f64 {
        vinet_energy(self, v)
    }
}

/// Vinet 状态方程能量
///
/// E(V) = E0 + 2 B0 V0 / (B'-1)^2 * [2 - (5 + 3B'(η-1) - 3η) exp(-3/2 (B'-1)(η-1))],
/// η = (V/V0)^(1/3)，B0 先换算为 eV/Å³。
pub fn vinet_energy(fit: &VinetFit, v: f64) -> f64 {
    let b0 = fit.b0 / GPA_PER_EV_PER_A3;
    let eta = (v / fit.v0).cbrt();
    let a = fit.bp - 1.0;
    let prefactor = 2.0 * b0 * fit.v0 / (a * a);
    let x = eta - 1.0;
    let bracket = 2.0 - (5.0 + 3.0 * fit.bp * x - 3.0 * eta) * (-1.5 * a * x).exp();
    fit.e0 + prefactor * bracket
}

/// E–V 采样点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvSample {
    /// 体积 (Å³)
    pub volume: f64,
    /// 能量 (eV)
    pub energy: f64,
}

/// 单个 (material, structure) 的状态方程记录
#[derive(Debug, Clone, Default)]
pub struct EosRecord {
    pub fit: Option<VinetFit>,
    /// 按体积升序
    pub samples: Vec<EvSample>,
}

impl EosRecord {
    pub fn curve(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.volume, s.energy)).collect()
    }

    /// 采样体积范围
    pub fn volume_range(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.volume, last.volume))
    }
}

/// `get` 的查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum EosValue {
    Scalar(f64),
    /// (volume, energy) 序列
    Curve(Vec<(f64, f64)>),
}

impl EosValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            EosValue::Scalar(v) => Some(*v),
            EosValue::Curve(_) => None,
        }
    }

    pub fn as_curve(&self) -> Option<&[(f64, f64)]> {
        match self {
            EosValue::Scalar(_) => None,
            EosValue::Curve(c) => Some(c),
        }
    }
}
