//! # 收敛数据库
//!
//! 加载 `convergence/` 目录下所有 CSV，按 (material, structure, functional, conv_type)
//! 组织为收敛序列，提供查询与绘图。
//!
//! ## CSV 列
//! `material, structure, functional, test_type, parameter, energy_total, energy_per_atom`
//! (`functional` 可省略，默认 PBE)
//!
//! ## 依赖关系
//! - 被 `commands/conv.rs` 使用
//! - 使用 `dataset/` 加载, `plot/convergence.rs` 绘图

use crate::dataset;
use crate::error::{Result, SemidbError};
use crate::models::{
    ConvType, ConvergencePoint, ConvergenceSeries, EnergyBasis, SeriesKey, DEFAULT_FUNCTIONAL,
};
use crate::plot::convergence::{self as conv_plot, ConvergencePanels};
use crate::plot::PlotOptions;
use crate::utils::output;

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

fn default_functional() -> String {
    DEFAULT_FUNCTIONAL.to_string()
}

/// CSV 中的一行
#[derive(Debug, Clone, Deserialize)]
struct ConvergenceRow {
    material: String,
    structure: String,
    #[serde(default = "default_functional")]
    functional: String,
    test_type: String,
    parameter: String,
    energy_total: f64,
    energy_per_atom: f64,
}

/// 收敛数据库
#[derive(Debug)]
pub struct ConvergenceDb {
    series: BTreeMap<SeriesKey, ConvergenceSeries>,
}

impl ConvergenceDb {
    /// 从目录加载所有 `*.csv`
    pub fn open(folder: impl Into<PathBuf>) -> Result<Self> {
        let folder = folder.into();
        let rows: Vec<ConvergenceRow> = dataset::load_folder(&folder, |p| dataset::read_rows(p))?;
        Ok(Self::from_rows(rows))
    }

    fn from_rows(rows: Vec<ConvergenceRow>) -> Self {
        let mut grouped: BTreeMap<SeriesKey, Vec<ConvergencePoint>> = BTreeMap::new();

        for row in rows {
            let conv_type: ConvType = match row.test_type.parse() {
                Ok(t) => t,
                Err(_) => {
                    output::print_warning(&format!(
                        "Skipping row for {} ({}): unknown test_type '{}'",
                        row.material, row.structure, row.test_type
                    ));
                    continue;
                }
            };

            let parameter = match conv_type.parse_parameter(&row.parameter) {
                Some(p) => p,
                None => {
                    output::print_warning(&format!(
                        "Skipping row for {} ({}): cannot read {} parameter '{}'",
                        row.material, row.structure, conv_type, row.parameter
                    ));
                    continue;
                }
            };

            // 空单元格与缺失列同样视为默认泛函
            let functional = if row.functional.is_empty() {
                default_functional()
            } else {
                row.functional
            };

            let key = SeriesKey {
                material: row.material,
                structure: row.structure,
                functional,
                conv_type,
            };

            grouped.entry(key).or_default().push(ConvergencePoint {
                parameter,
                energy_total: row.energy_total,
                energy_per_atom: row.energy_per_atom,
            });
        }

        let series = grouped
            .into_iter()
            .map(|(key, points)| {
                let (series, dropped) = ConvergenceSeries::from_points(key.clone(), points);
                if !dropped.is_empty() {
                    output::print_warning(&format!(
                        "{}: dropped duplicate parameters {:?}",
                        key, dropped
                    ));
                }
                (key, series)
            })
            .collect();

        ConvergenceDb { series }
    }

    /// 序列数量
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// 所有材料名称
    pub fn materials(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.series.keys().map(|k| k.material.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    /// 某材料的所有结构
    pub fn structures(&self, material: &str) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .series
            .keys()
            .filter(|k| k.material == material)
            .map(|k| k.structure.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// 某材料/结构的所有泛函
    pub fn functionals(&self, material: &str, structure: &str) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .series
            .keys()
            .filter(|k| k.material == material && k.structure == structure)
            .map(|k| k.functional.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// 查询默认泛函 (PBE) 下的收敛序列
    pub fn get(
        &self,
        material: &str,
        structure: &str,
        conv_type: ConvType,
    ) -> Result<&ConvergenceSeries> {
        self.get_with(material, structure, conv_type, DEFAULT_FUNCTIONAL)
    }

    /// 查询指定泛函下的收敛序列
    pub fn get_with(
        &self,
        material: &str,
        structure: &str,
        conv_type: ConvType,
        functional: &str,
    ) -> Result<&ConvergenceSeries> {
        let key = SeriesKey {
            material: material.to_string(),
            structure: structure.to_string(),
            functional: functional.to_string(),
            conv_type,
        };
        self.series
            .get(&key)
            .ok_or_else(|| SemidbError::not_found("convergence", &key))
    }

    /// 绘制 k 点 / ENCUT 双面板收敛图
    ///
    /// 两个序列都不存在时返回 `NotFound`；只缺一个时该面板显示提示。
    pub fn plot(
        &self,
        material: &str,
        structure: &str,
        functional: &str,
        basis: EnergyBasis,
        options: &PlotOptions,
    ) -> Result<()> {
        let kpt = self
            .get_with(material, structure, ConvType::Kpt, functional)
            .ok();
        let encut = self
            .get_with(material, structure, ConvType::Encut, functional)
            .ok();

        if kpt.is_none() && encut.is_none() {
            return Err(SemidbError::not_found(
                "convergence",
                format!("{} ({}, {})", material, structure, functional),
            ));
        }

        let panels = ConvergencePanels {
            title: format!("{} ({}, {})", material, structure, functional),
            kpt,
            encut,
            basis,
        };
        conv_plot::render(&panels, options)
    }
}
