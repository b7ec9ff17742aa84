//! # 合金数据库
//!
//! 加载 `alloy/` 目录下的 CSV，按二元体系、结构、泛函和组分查询性质。
//!
//! ## CSV 列
//! `binary, structure, functional, x_<A>, x_<B>, formula, lattice_matrix,
//! volume(Ang^3), num_atoms, total_energy(eV), bandgap_Gamma(eV), hmix_meV_per_formula`
//!
//! 组分列名随体系变化 (e.g. `x_GaAs`, `x_InAs`)，因此按原始记录解析。
//!
//! ## 依赖关系
//! - 被 `commands/alloy.rs` 使用
//! - 使用 `dataset/` 读取 CSV

use crate::dataset::{self, RawTable};
use crate::error::{Result, SemidbError};
use crate::models::{AlloyEntry, AlloyProperty, AlloyValue};

use csv::StringRecord;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// 默认组分匹配容差
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// 合金数据库
#[derive(Debug)]
pub struct AlloyDb {
    tolerance: f64,
    entries: Vec<AlloyEntry>,
}

/// 一个文件内各列的位置
struct Columns {
    binary: usize,
    structure: usize,
    functional: usize,
    fractions: [(usize, String); 2],
    formula: usize,
    lattice: usize,
    volume: usize,
    num_atoms: usize,
    total_energy: usize,
    bandgap: usize,
    hmix: usize,
}

impl Columns {
    fn locate(table: &RawTable) -> Result<Self> {
        let fraction_cols: Vec<(usize, String)> = table
            .headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.strip_prefix("x_").map(|name| (i, name.to_string())))
            .collect();

        let fractions: [(usize, String); 2] = fraction_cols.try_into().map_err(|cols: Vec<_>| {
            SemidbError::ParseError {
                format: "alloy CSV".to_string(),
                path: table.path.display().to_string(),
                reason: format!("expected two composition columns (x_A, x_B), found {}", cols.len()),
            }
        })?;

        Ok(Columns {
            binary: table.require_column("binary")?,
            structure: table.require_column("structure")?,
            functional: table.require_column("functional")?,
            fractions,
            formula: table.require_column("formula")?,
            lattice: table.require_column("lattice_matrix")?,
            volume: table.require_column("volume(Ang^3)")?,
            num_atoms: table.require_column("num_atoms")?,
            total_energy: table.require_column("total_energy(eV)")?,
            bandgap: table.require_column("bandgap_Gamma(eV)")?,
            hmix: table.require_column("hmix_meV_per_formula")?,
        })
    }
}

fn field<'r>(record: &'r StringRecord, idx: usize, path: &Path) -> Result<&'r str> {
    record.get(idx).ok_or_else(|| SemidbError::ParseError {
        format: "alloy CSV".to_string(),
        path: path.display().to_string(),
        reason: format!("row has no column {}", idx),
    })
}

fn number<T: std::str::FromStr>(record: &StringRecord, idx: usize, path: &Path) -> Result<T> {
    let raw = field(record, idx, path)?;
    raw.parse::<T>().map_err(|_| SemidbError::ParseError {
        format: "alloy CSV".to_string(),
        path: path.display().to_string(),
        reason: format!("'{}' is not a number", raw),
    })
}

/// 解析单个合金文件
fn load_alloy_file(path: &Path) -> Result<Vec<AlloyEntry>> {
    let table = dataset::read_raw(path)?;
    let cols = Columns::locate(&table)?;

    table
        .records
        .iter()
        .map(|rec| {
            let [(ia, name_a), (ib, name_b)] = &cols.fractions;
            Ok(AlloyEntry {
                binary: field(rec, cols.binary, path)?.to_string(),
                structure: field(rec, cols.structure, path)?.to_string(),
                functional: field(rec, cols.functional, path)?.to_string(),
                components: [
                    (name_a.clone(), number(rec, *ia, path)?),
                    (name_b.clone(), number(rec, *ib, path)?),
                ],
                formula: field(rec, cols.formula, path)?.to_string(),
                lattice_matrix: field(rec, cols.lattice, path)?.to_string(),
                volume: number(rec, cols.volume, path)?,
                num_atoms: number(rec, cols.num_atoms, path)?,
                total_energy: number(rec, cols.total_energy, path)?,
                bandgap: number(rec, cols.bandgap, path)?,
                hmix: number(rec, cols.hmix, path)?,
            })
        })
        .collect()
}

/// 拆分二元体系名称 "GaAs InAs" -> ("GaAs", "InAs")
fn split_binary(binary: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = binary.split_whitespace().collect();
    match parts.as_slice() {
        [a, b] => Ok((*a, *b)),
        _ => Err(SemidbError::InvalidArgument(format!(
            "Invalid binary format: '{}'. Expected two components (e.g. 'GaAs InAs')",
            binary
        ))),
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

impl AlloyDb {
    /// 从目录加载所有 `*.csv`
    pub fn open(folder: impl Into<PathBuf>) -> Result<Self> {
        let folder = folder.into();
        let entries = dataset::load_folder(&folder, load_alloy_file)?;
        Ok(AlloyDb {
            tolerance: DEFAULT_TOLERANCE,
            entries,
        })
    }

    /// 设置组分匹配容差
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有二元体系
    pub fn binaries(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.entries.iter().map(|e| e.binary.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    /// 某体系的所有结构
    pub fn structures(&self, binary: &str) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .entries
            .iter()
            .filter(|e| e.binary == binary)
            .map(|e| e.structure.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// 某体系/结构的所有泛函
    pub fn functionals(&self, binary: &str, structure: &str) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .entries
            .iter()
            .filter(|e| e.binary == binary && e.structure == structure)
            .map(|e| e.functional.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// 可用组分（按存储列顺序，保留三位小数）
    pub fn compositions(&self, binary: &str, structure: &str, functional: &str) -> Vec<[f64; 2]> {
        self.entries
            .iter()
            .filter(|e| e.binary == binary && e.structure == structure && e.functional == functional)
            .map(|e| {
                let [a, b] = e.fractions();
                [round3(a), round3(b)]
            })
            .collect()
    }

    /// 查询合金性质
    ///
    /// `binary` 的组元顺序可与数据文件相反，`comp` 始终按 `binary` 中的顺序给出。
    /// `property` 为 `None` 时返回整行记录。
    pub fn get(
        &self,
        binary: &str,
        structure: &str,
        functional: &str,
        comp: [f64; 2],
        property: Option<AlloyProperty>,
    ) -> Result<AlloyValue> {
        let (first, second) = split_binary(binary)?;
        let reversed = format!("{} {}", second, first);

        let candidates: Vec<&AlloyEntry> = self
            .entries
            .iter()
            .filter(|e| {
                (e.binary == binary || e.binary == reversed)
                    && e.structure == structure
                    && e.functional == functional
            })
            .collect();

        if candidates.is_empty() {
            return Err(SemidbError::not_found(
                "alloy",
                format!("{} ({}, {})", binary, structure, functional),
            ));
        }

        let mut matched = None;
        for entry in candidates {
            let target = match entry.component_names() {
                [a, b] if a == first && b == second => comp,
                [a, b] if a == second && b == first => [comp[1], comp[0]],
                [a, b] => {
                    return Err(SemidbError::InvalidArgument(format!(
                        "Column mismatch: stored [{}, {}], requested [{}, {}]",
                        a, b, first, second
                    )))
                }
            };

            let [xa, xb] = entry.fractions();
            if (xa - target[0]).abs() <= self.tolerance && (xb - target[1]).abs() <= self.tolerance
            {
                matched = Some(entry);
                break;
            }
        }

        let entry = matched.ok_or_else(|| {
            SemidbError::not_found(
                "alloy composition",
                format!("{} with composition [{}, {}]", binary, comp[0], comp[1]),
            )
        })?;

        match property {
            None => Ok(AlloyValue::Record(Box::new(entry.clone()))),
            Some(AlloyProperty::Gap) => Ok(AlloyValue::Scalar(entry.bandgap)),
            Some(AlloyProperty::HMix) => Ok(AlloyValue::Scalar(entry.hmix)),
            Some(AlloyProperty::Volume) => Ok(AlloyValue::Scalar(entry.volume)),
            Some(AlloyProperty::Lattice) => Ok(AlloyValue::Lattice(entry.lattice()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "binary,structure,functional,x_GaAs,x_InAs,formula,lattice_matrix,volume(Ang^3),num_atoms,total_energy(eV),bandgap_Gamma(eV),hmix_meV_per_formula";

    fn fixture() -> (tempfile::TempDir, AlloyDb) {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{}\n\
             GaAs InAs,zb,PBE,0.25,0.75,Ga1In3As4,\"[[6.0, 0, 0], [0, 6.0, 0], [0, 0, 6.0]]\",216.0,8,-30.5,0.41,12.5\n\
             GaAs InAs,zb,PBE,0.5,0.5,Ga2In2As4,\"[[5.9, 0, 0], [0, 5.9, 0], [0, 0, 5.9]]\",205.4,8,-31.0,0.62,15.0\n\
             GaAs InAs,zb,HSE,0.5,0.5,Ga2In2As4,\"[[5.9, 0, 0], [0, 5.9, 0], [0, 0, 5.9]]\",205.4,8,-40.0,1.10,14.0\n",
            HEADER
        );
        fs::write(dir.path().join("gaas_inas.csv"), content).unwrap();
        fs::write(dir.path().join("broken.csv"), "binary,structure,x_A\nA B,zb,1.0\n").unwrap();

        let db = AlloyDb::open(dir.path()).unwrap();
        (dir, db)
    }

    #[test]
    fn test_listing() {
        let (_dir, db) = fixture();
        // broken.csv 只有一个组分列，被跳过
        assert_eq!(db.len(), 3);
        assert_eq!(db.binaries(), vec!["GaAs InAs"]);
        assert_eq!(db.structures("GaAs InAs"), vec!["zb"]);
        assert_eq!(db.functionals("GaAs InAs", "zb"), vec!["HSE", "PBE"]);
        assert_eq!(
            db.compositions("GaAs InAs", "zb", "PBE"),
            vec![[0.25, 0.75], [0.5, 0.5]]
        );
    }

    #[test]
    fn test_scalar_properties() {
        let (_dir, db) = fixture();
        let gap = db
            .get("GaAs InAs", "zb", "PBE", [0.25, 0.75], Some(AlloyProperty::Gap))
            .unwrap();
        assert_eq!(gap, AlloyValue::Scalar(0.41));
        let hmix = db
            .get("GaAs InAs", "zb", "HSE", [0.5, 0.5], Some(AlloyProperty::HMix))
            .unwrap();
        assert_eq!(hmix, AlloyValue::Scalar(14.0));
    }

    #[test]
    fn test_reversed_binary_realigns_composition() {
        let (_dir, db) = fixture();
        // InAs 0.75 / GaAs 0.25 与存储的 GaAs 0.25 / InAs 0.75 是同一行
        let vol = db
            .get("InAs GaAs", "zb", "PBE", [0.75, 0.25], Some(AlloyProperty::Volume))
            .unwrap();
        assert_eq!(vol, AlloyValue::Scalar(216.0));
    }

    #[test]
    fn test_lattice_and_record() {
        let (_dir, db) = fixture();
        let lat = db
            .get("GaAs InAs", "zb", "PBE", [0.5, 0.5], Some(AlloyProperty::Lattice))
            .unwrap();
        match lat {
            AlloyValue::Lattice(m) => assert_eq!(m[1][1], 5.9),
            other => panic!("expected lattice, got {:?}", other),
        }

        let rec = db.get("GaAs InAs", "zb", "PBE", [0.5, 0.5], None).unwrap();
        match rec {
            AlloyValue::Record(e) => {
                assert_eq!(e.formula, "Ga2In2As4");
                assert_eq!(e.num_atoms, 8);
                assert_eq!(e.component_names(), ["GaAs", "InAs"]);
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_errors() {
        let (_dir, db) = fixture();
        let err = db.get("GaAs", "zb", "PBE", [0.5, 0.5], None).unwrap_err();
        assert!(matches!(err, SemidbError::InvalidArgument(_)));

        let err = db.get("GaAs GaSb", "zb", "PBE", [0.5, 0.5], None).unwrap_err();
        assert!(matches!(err, SemidbError::NotFound { .. }));

        let err = db.get("GaAs InAs", "zb", "PBE", [0.4, 0.6], None).unwrap_err();
        assert!(matches!(err, SemidbError::NotFound { .. }));

        // 容差放宽后可以匹配
        let db = db.with_tolerance(0.2);
        assert!(db.get("GaAs InAs", "zb", "PBE", [0.4, 0.6], None).is_ok());
    }
}
