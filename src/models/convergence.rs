//! # 收敛测试数据模型
//!
//! k 点密度 / ENCUT 收敛序列。
//!
//! ## 依赖关系
//! - 被 `db/convergence.rs`, `plot/convergence.rs` 使用
//! - 使用 `regex` 解析参数字符串 (`k4x4x4`, `encut_400`)

use crate::error::{Result, SemidbError};

use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// 默认交换关联泛函
pub const DEFAULT_FUNCTIONAL: &str = "PBE";

/// 收敛测试类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConvType {
    /// k 点网格收敛
    Kpt,
    /// 平面波截断能收敛
    Encut,
}

impl ConvType {
    pub const ALL: [ConvType; 2] = [ConvType::Kpt, ConvType::Encut];

    /// 从原始参数字符串提取收敛参数
    ///
    /// - `Kpt`: `k4x4x4` -> 4*4*4 = 64 个 k 点
    /// - `Encut`: 第一个整数，例如 `encut_400` -> 400 eV
    pub fn parse_parameter(&self, raw: &str) -> Option<f64> {
        match self {
            ConvType::Kpt => {
                let caps = kpt_regex().captures(raw)?;
                let mut total = 1.0;
                for i in 1..=3 {
                    total *= caps.get(i)?.as_str().parse::<f64>().ok()?;
                }
                Some(total)
            }
            ConvType::Encut => encut_regex()
                .captures(raw)?
                .get(1)?
                .as_str()
                .parse::<f64>()
                .ok(),
        }
    }

    /// x 轴标签
    pub fn axis_label(&self) -> &'static str {
        match self {
            ConvType::Kpt => "Total k-points",
            ConvType::Encut => "ENCUT (eV)",
        }
    }

    /// 表头中参数列名称
    pub fn column_name(&self) -> &'static str {
        match self {
            ConvType::Kpt => "N_kpoints",
            ConvType::Encut => "ENCUT",
        }
    }
}

fn kpt_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"k(\d+)x(\d+)x(\d+)").expect("k-point mesh regex is valid"))
}

fn encut_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)").expect("cutoff regex is valid"))
}

impl FromStr for ConvType {
    type Err = SemidbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "kpt" => Ok(ConvType::Kpt),
            "encut" => Ok(ConvType::Encut),
            other => Err(SemidbError::InvalidArgument(format!(
                "conv_type must be 'kpt' or 'encut', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ConvType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvType::Kpt => write!(f, "kpt"),
            ConvType::Encut => write!(f, "encut"),
        }
    }
}

/// 能量口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyBasis {
    /// 每原子能量 (eV/atom)
    #[default]
    PerAtom,
    /// 总能量 (eV)
    Total,
}

impl EnergyBasis {
    pub fn axis_label(&self) -> &'static str {
        match self {
            EnergyBasis::PerAtom => "Energy (eV/atom)",
            EnergyBasis::Total => "Energy (eV)",
        }
    }
}

/// 单个收敛采样点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergencePoint {
    /// 收敛参数 (总 k 点数或 ENCUT)
    pub parameter: f64,
    pub energy_total: f64,
    pub energy_per_atom: f64,
}

impl ConvergencePoint {
    pub fn energy(&self, basis: EnergyBasis) -> f64 {
        match basis {
            EnergyBasis::PerAtom => self.energy_per_atom,
            EnergyBasis::Total => self.energy_total,
        }
    }
}

/// 收敛序列的唯一键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub material: String,
    pub structure: String,
    pub functional: String,
    pub conv_type: ConvType,
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {}) {}",
            self.material, self.structure, self.functional, self.conv_type
        )
    }
}

/// 收敛序列，按参数严格递增
#[derive(Debug, Clone)]
pub struct ConvergenceSeries {
    pub key: SeriesKey,
    points: Vec<ConvergencePoint>,
}

impl ConvergenceSeries {
    /// 排序并去重，返回序列和被丢弃的重复参数
    pub fn from_points(key: SeriesKey, mut points: Vec<ConvergencePoint>) -> (Self, Vec<f64>) {
        // 稳定排序，重复参数保留最先出现的记录
        points.sort_by(|a, b| a.parameter.total_cmp(&b.parameter));

        let mut dropped = Vec::new();
        let mut unique: Vec<ConvergencePoint> = Vec::with_capacity(points.len());
        for p in points {
            match unique.last() {
                Some(last) if last.parameter == p.parameter => dropped.push(p.parameter),
                _ => unique.push(p),
            }
        }

        (
            ConvergenceSeries {
                key,
                points: unique,
            },
            dropped,
        )
    }

    /// 按给定能量口径输出 (x, y) 序列
    pub fn points(&self, basis: EnergyBasis) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.parameter, p.energy(basis)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SeriesKey {
        SeriesKey {
            material: "GaN".to_string(),
            structure: "zb".to_string(),
            functional: DEFAULT_FUNCTIONAL.to_string(),
            conv_type: ConvType::Kpt,
        }
    }

    fn point(x: f64, e: f64) -> ConvergencePoint {
        ConvergencePoint {
            parameter: x,
            energy_total: e * 2.0,
            energy_per_atom: e,
        }
    }

    #[test]
    fn test_parse_kpt_parameter() {
        assert_eq!(ConvType::Kpt.parse_parameter("k4x4x4"), Some(64.0));
        assert_eq!(ConvType::Kpt.parse_parameter("k6x6x3"), Some(108.0));
        assert_eq!(ConvType::Kpt.parse_parameter("400"), None);
    }

    #[test]
    fn test_parse_encut_parameter() {
        assert_eq!(ConvType::Encut.parse_parameter("encut_400"), Some(400.0));
        assert_eq!(ConvType::Encut.parse_parameter("550"), Some(550.0));
        assert_eq!(ConvType::Encut.parse_parameter("high"), None);
    }

    #[test]
    fn test_conv_type_from_str() {
        assert_eq!("kpt".parse::<ConvType>().unwrap(), ConvType::Kpt);
        assert_eq!(" ENCUT ".parse::<ConvType>().unwrap(), ConvType::Encut);
        assert!(matches!(
            "bogus".parse::<ConvType>(),
            Err(SemidbError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_series_sorted_and_deduplicated() {
        let (series, dropped) = ConvergenceSeries::from_points(
            key(),
            vec![point(64.0, -5.0), point(8.0, -4.0), point(64.0, -9.0), point(27.0, -4.8)],
        );

        assert_eq!(dropped, vec![64.0]);
        let xy = series.points(EnergyBasis::PerAtom);
        assert_eq!(xy, vec![(8.0, -4.0), (27.0, -4.8), (64.0, -5.0)]);
        assert!(xy.windows(2).all(|w| w[0].0 < w[1].0));

        let total = series.points(EnergyBasis::Total);
        assert_eq!(total[0], (8.0, -8.0));
    }
}
