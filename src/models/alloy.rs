//! # 合金性质数据模型
//!
//! 二元合金 (e.g. `GaAs InAs`) 在给定组分下的性质。
//!
//! ## 依赖关系
//! - 被 `db/alloy.rs` 使用
//! - 使用 `regex` 解析晶格矩阵字符串

use crate::error::{Result, SemidbError};

use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// 可查询的合金性质
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlloyProperty {
    /// Γ 点带隙 (eV)
    Gap,
    /// 晶格矩阵 (Å)
    Lattice,
    /// 混合焓 (meV/formula)
    HMix,
    /// 体积 (Å³)
    Volume,
}

impl FromStr for AlloyProperty {
    type Err = SemidbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "GAP" | "BANDGAP" => Ok(AlloyProperty::Gap),
            "LATTICE" | "LAT" => Ok(AlloyProperty::Lattice),
            "H_MIX" | "HMIX" | "H-MIX" => Ok(AlloyProperty::HMix),
            "VOLUME" | "VOL" => Ok(AlloyProperty::Volume),
            _ => Err(SemidbError::InvalidArgument(format!(
                "Invalid property '{}'. Use one of: GAP, LATTICE, H_MIX, VOLUME",
                s.trim()
            ))),
        }
    }
}

impl std::fmt::Display for AlloyProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlloyProperty::Gap => write!(f, "bandgap_Gamma(eV)"),
            AlloyProperty::Lattice => write!(f, "lattice_matrix"),
            AlloyProperty::HMix => write!(f, "hmix_meV_per_formula"),
            AlloyProperty::Volume => write!(f, "volume(Ang^3)"),
        }
    }
}

/// 合金数据表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct AlloyEntry {
    pub binary: String,
    pub structure: String,
    pub functional: String,
    /// 两个组元及其摩尔分数，顺序与文件列顺序一致
    pub components: [(String, f64); 2],
    pub formula: String,
    /// 原始晶格矩阵字符串
    pub lattice_matrix: String,
    pub volume: f64,
    pub num_atoms: usize,
    pub total_energy: f64,
    pub bandgap: f64,
    pub hmix: f64,
}

impl AlloyEntry {
    /// 组元名称 (按存储顺序)
    pub fn component_names(&self) -> [&str; 2] {
        [&self.components[0].0, &self.components[1].0]
    }

    /// 组分 (按存储顺序)
    pub fn fractions(&self) -> [f64; 2] {
        [self.components[0].1, self.components[1].1]
    }

    /// 解析晶格矩阵
    pub fn lattice(&self) -> Result<[[f64; 3]; 3]> {
        parse_lattice_matrix(&self.lattice_matrix)
    }
}

/// 查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum AlloyValue {
    Scalar(f64),
    Lattice([[f64; 3]; 3]),
    Record(Box<AlloyEntry>),
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("number regex is valid")
    })
}

/// 解析形如 `[[a, 0, 0], [0, a, 0], [0, 0, a]]` 的晶格矩阵字符串
pub fn parse_lattice_matrix(text: &str) -> Result<[[f64; 3]; 3]> {
    let values: Vec<f64> = number_regex()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    if values.len() != 9 {
        return Err(SemidbError::ParseError {
            format: "lattice matrix".to_string(),
            path: text.to_string(),
            reason: format!("expected 9 numbers, found {}", values.len()),
        });
    }

    let mut matrix = [[0.0; 3]; 3];
    for (i, v) in values.into_iter().enumerate() {
        matrix[i / 3][i % 3] = v;
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lattice_matrix() {
        let m = parse_lattice_matrix("[[5.87, 0.0, 0.0], [0.0, 5.87, 0.0], [0.0, 0.0, 1.2e1]]")
            .unwrap();
        assert_eq!(m[0][0], 5.87);
        assert_eq!(m[1][1], 5.87);
        assert_eq!(m[2][2], 12.0);
        assert_eq!(m[0][1], 0.0);
    }

    #[test]
    fn test_parse_lattice_matrix_negative_entries() {
        let m = parse_lattice_matrix("[[0 2.8 2.8] [2.8 0 2.8] [-2.8 .5 0]]").unwrap();
        assert_eq!(m[2][0], -2.8);
        assert_eq!(m[2][1], 0.5);
    }

    #[test]
    fn test_parse_lattice_matrix_wrong_size() {
        let err = parse_lattice_matrix("[[1, 2], [3, 4]]").unwrap_err();
        assert!(matches!(err, SemidbError::ParseError { .. }));
    }

    #[test]
    fn test_property_aliases() {
        assert_eq!("bandgap".parse::<AlloyProperty>().unwrap(), AlloyProperty::Gap);
        assert_eq!("LAT".parse::<AlloyProperty>().unwrap(), AlloyProperty::Lattice);
        assert_eq!("h_mix".parse::<AlloyProperty>().unwrap(), AlloyProperty::HMix);
        assert_eq!("vol".parse::<AlloyProperty>().unwrap(), AlloyProperty::Volume);
        assert!("density".parse::<AlloyProperty>().is_err());
    }
}
