//! # 状态方程数据库 (e_v_db)
//!
//! 读取 E–V 采样与 Vinet 拟合汇总，按 (material, structure) 提供查询。
//! 查询时不做任何拟合，仅读取已存储的值。
//!
//! ## 数据文件
//! - `e_v_data.csv`: `material, structure, Volume(Ang^3), Energy(eV)`
//! - `vinet_fit_summary.csv`: `material, structure, E (eV), V (Ang^3), B (GPa), Bp`
//!
//! ## 依赖关系
//! - 被 `commands/eos.rs` 使用
//! - 使用 `dataset/` 读取 CSV, `plot/eos.rs` 绘图

use crate::dataset;
use crate::error::{Result, SemidbError};
use crate::models::{EosRecord, EosValue, EvSample, FitParam, MaterialKey, VinetFit};
use crate::plot::{self, PlotOptions};
use crate::utils::output;

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub const EV_DATA_FILE: &str = "e_v_data.csv";
pub const FIT_SUMMARY_FILE: &str = "vinet_fit_summary.csv";

#[derive(Debug, Deserialize)]
struct EvRow {
    material: String,
    structure: String,
    #[serde(rename = "Volume(Ang^3)")]
    volume: f64,
    #[serde(rename = "Energy(eV)")]
    energy: f64,
}

#[derive(Debug, Deserialize)]
struct FitRow {
    material: String,
    structure: String,
    #[serde(rename = "E (eV)")]
    e0: f64,
    #[serde(rename = "V (Ang^3)")]
    v0: f64,
    #[serde(rename = "B (GPa)")]
    b0: f64,
    #[serde(rename = "Bp")]
    bp: f64,
}

/// 状态方程数据库
#[derive(Debug)]
pub struct EosDb {
    records: BTreeMap<MaterialKey, EosRecord>,
}

impl EosDb {
    /// 从目录加载两个数据文件（缺一不可）
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let ev_path = base_dir.join(EV_DATA_FILE);
        let fit_path = base_dir.join(FIT_SUMMARY_FILE);

        for path in [&ev_path, &fit_path] {
            if !path.exists() {
                return Err(SemidbError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
        }

        let ev_rows: Vec<EvRow> = dataset::read_rows(&ev_path)?;
        let fit_rows: Vec<FitRow> = dataset::read_rows(&fit_path)?;

        Ok(Self::from_rows(ev_rows, fit_rows))
    }

    fn from_rows(ev_rows: Vec<EvRow>, fit_rows: Vec<FitRow>) -> Self {
        let mut records: BTreeMap<MaterialKey, EosRecord> = BTreeMap::new();

        for row in fit_rows {
            let key = MaterialKey::new(row.material, row.structure);
            let record = records.entry(key.clone()).or_default();
            if record.fit.is_some() {
                output::print_warning(&format!(
                    "Duplicate Vinet fit for {}, keeping the first row",
                    key
                ));
                continue;
            }
            record.fit = Some(VinetFit {
                e0: row.e0,
                v0: row.v0,
                b0: row.b0,
                bp: row.bp,
            });
        }

        for row in ev_rows {
            let key = MaterialKey::new(row.material, row.structure);
            records.entry(key).or_default().samples.push(EvSample {
                volume: row.volume,
                energy: row.energy,
            });
        }

        for record in records.values_mut() {
            record
                .samples
                .sort_by(|a, b| a.volume.total_cmp(&b.volume));
        }

        EosDb { records }
    }

    /// 拥有 Vinet 拟合结果的全部 (material, structure)
    pub fn list_materials(&self) -> Vec<MaterialKey> {
        self.records
            .iter()
            .filter(|(_, r)| r.fit.is_some())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// 某材料在任一数据文件中出现的结构
    pub fn structures(&self, material: &str) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .keys()
            .filter(|k| k.material == material)
            .map(|k| k.structure.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// 原始记录
    pub fn record(&self, material: &str, structure: &str) -> Result<&EosRecord> {
        let key = MaterialKey::new(material, structure);
        self.records
            .get(&key)
            .ok_or_else(|| SemidbError::not_found("equation-of-state", &key))
    }

    /// Vinet 拟合参数
    pub fn fit(&self, material: &str, structure: &str) -> Result<&VinetFit> {
        self.record(material, structure)?
            .fit
            .as_ref()
            .ok_or_else(|| {
                SemidbError::not_found("fit", MaterialKey::new(material, structure))
            })
    }

    /// 查询拟合量或 E–V 曲线
    pub fn get(&self, material: &str, structure: &str, param: FitParam) -> Result<EosValue> {
        match param {
            FitParam::EV => {
                let record = self.record(material, structure)?;
                if record.samples.is_empty() {
                    return Err(SemidbError::not_found(
                        "E-V",
                        MaterialKey::new(material, structure),
                    ));
                }
                Ok(EosValue::Curve(record.curve()))
            }
            FitParam::E | FitParam::V | FitParam::B | FitParam::Bp => {
                let fit = self.fit(material, structure)?;
                fit.scalar(param)
                    .map(EosValue::Scalar)
                    .ok_or_else(|| SemidbError::InvalidArgument(param.to_string()))
            }
        }
    }

    /// 绘制 E–V 采样与 Vinet 曲线
    pub fn plot(&self, material: &str, structure: &str, options: &PlotOptions) -> Result<()> {
        let key = MaterialKey::new(material, structure);
        let record = self.record(material, structure)?;
        plot::eos::render(&format!("{} E-V (Vinet)", key), record, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::eos::{vinet_energy, GPA_PER_EV_PER_A3};
    use std::fmt::Write as _;
    use std::fs;

    fn alas_fit() -> VinetFit {
        VinetFit {
            e0: -9.6784,
            v0: 45.94,
            b0: 67.1,
            bp: 4.28,
        }
    }

    /// 用 Vinet 方程生成一致的采样数据
    fn fixture() -> (tempfile::TempDir, EosDb) {
        let dir = tempfile::tempdir().unwrap();
        let fit = alas_fit();

        let mut ev = String::from("material,structure,Volume(Ang^3),Energy(eV)\n");
        for i in (0..11).rev() {
            let v = fit.v0 * (0.94 + 0.012 * i as f64);
            writeln!(ev, "AlAs,zb,{:.6},{:.8}", v, vinet_energy(&fit, v)).unwrap();
        }
        ev.push_str("GaN,wz,46.0,-24.1\nGaN,wz,47.0,-24.2\n");
        fs::write(dir.path().join(EV_DATA_FILE), ev).unwrap();

        let summary = format!(
            "material,structure,E (eV),V (Ang^3),B (GPa),Bp\n\
             AlAs,zb,{},{},{},{}\n\
             GaN,zb,-24.3,45.6,172.0,4.5\n\
             GaN,zb,-99.0,1.0,1.0,1.0\n",
            fit.e0, fit.v0, fit.b0, fit.bp
        );
        fs::write(dir.path().join(FIT_SUMMARY_FILE), summary).unwrap();

        let db = EosDb::open(dir.path()).unwrap();
        (dir, db)
    }

    #[test]
    fn test_scalar_lookup_is_idempotent() {
        let (_dir, db) = fixture();
        let first = db.get("AlAs", "zb", FitParam::B).unwrap();
        let second = db.get("AlAs", "zb", FitParam::B).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_scalar(), Some(67.1));
        assert_eq!(db.get("AlAs", "zb", FitParam::Bp).unwrap(), EosValue::Scalar(4.28));
    }

    #[test]
    fn test_duplicate_fit_keeps_first() {
        let (_dir, db) = fixture();
        assert_eq!(db.get("GaN", "zb", FitParam::E).unwrap(), EosValue::Scalar(-24.3));
    }

    #[test]
    fn test_curve_sorted_and_consistent_with_fit() {
        let (_dir, db) = fixture();
        let curve = match db.get("AlAs", "zb", FitParam::EV).unwrap() {
            EosValue::Curve(c) => c,
            other => panic!("expected curve, got {:?}", other),
        };
        assert_eq!(curve.len(), 11);
        assert!(curve.windows(2).all(|w| w[0].0 < w[1].0));

        let e0 = db.get("AlAs", "zb", FitParam::E).unwrap().as_scalar().unwrap();
        let v0 = db.get("AlAs", "zb", FitParam::V).unwrap().as_scalar().unwrap();
        assert!(curve.iter().all(|(_, e)| *e >= e0 - 1e-6));
        assert!(curve.first().unwrap().0 < v0 && v0 < curve.last().unwrap().0);
    }

    #[test]
    fn test_bulk_modulus_matches_curve_curvature() {
        let (_dir, db) = fixture();
        let b = db.get("AlAs", "zb", FitParam::B).unwrap().as_scalar().unwrap();
        let curve = db.get("AlAs", "zb", FitParam::EV).unwrap();
        let curve = curve.as_curve().unwrap();

        // 最低点附近三点差分估计 d²E/dV²
        let i = curve
            .iter()
            .enumerate()
            .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
            .map(|(i, _)| i)
            .unwrap();
        let (v0, e0) = curve[i];
        let (vm, em) = curve[i - 1];
        let (vp, ep) = curve[i + 1];
        let d2 = 2.0 * ((ep - e0) / (vp - v0) - (e0 - em) / (v0 - vm)) / (vp - vm);
        let implied = v0 * d2 * GPA_PER_EV_PER_A3;

        assert!((implied - b).abs() / b < 0.05, "implied {} vs stored {}", implied, b);
    }

    #[test]
    fn test_list_materials_only_fitted_pairs() {
        let (_dir, db) = fixture();
        // GaN wz 只有 E–V 采样，没有拟合
        assert_eq!(
            db.list_materials(),
            vec![MaterialKey::new("AlAs", "zb"), MaterialKey::new("GaN", "zb")]
        );
        assert_eq!(db.structures("GaN"), vec!["wz", "zb"]);
    }

    #[test]
    fn test_missing_pieces_are_not_found() {
        let (_dir, db) = fixture();
        let err = db.get("Unobtanium", "zb", FitParam::E).unwrap_err();
        assert!(matches!(err, SemidbError::NotFound { .. }));

        // 只有采样、没有拟合
        let err = db.get("GaN", "wz", FitParam::V).unwrap_err();
        assert!(matches!(err, SemidbError::NotFound { .. }));
        assert!(db.get("GaN", "wz", FitParam::EV).is_ok());

        // 只有拟合、没有采样
        let err = db.get("GaN", "zb", FitParam::EV).unwrap_err();
        assert!(matches!(err, SemidbError::NotFound { .. }));
    }

    #[test]
    fn test_plot_renders_png_and_svg() {
        let (dir, db) = fixture();

        let png = dir.path().join("ev.png");
        db.plot("AlAs", "zb", &PlotOptions::new(&png).with_size(800, 600))
            .unwrap();
        assert!(fs::metadata(&png).unwrap().len() > 0);

        let svg = dir.path().join("ev.svg");
        db.plot("AlAs", "zb", &PlotOptions::new(&svg).with_size(800, 600))
            .unwrap();
        assert!(fs::read_to_string(&svg).unwrap().contains("<svg"));
    }

    #[test]
    fn test_plot_unknown_material_is_not_found() {
        let (dir, db) = fixture();
        let out = dir.path().join("none.png");
        let err = db.plot("Unobtanium", "zb", &PlotOptions::new(&out)).unwrap_err();
        assert!(matches!(err, SemidbError::NotFound { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_open_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(EV_DATA_FILE),
            "material,structure,Volume(Ang^3),Energy(eV)\n",
        )
        .unwrap();
        let err = EosDb::open(dir.path()).unwrap_err();
        match err {
            SemidbError::FileNotFound { path } => assert!(path.ends_with(FIT_SUMMARY_FILE)),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
