//! # CSV 表格读取
//!
//! 统一的 CSV 读取入口：强类型行、原始记录、以及整个目录的批量加载。
//!
//! ## 依赖关系
//! - 被 `db/` 所有数据库使用
//! - 使用 `dataset/collector.rs` 收集文件
//! - 使用 `utils/output.rs`, `utils/progress.rs` 报告进度与跳过的文件

use crate::dataset::collector::FileCollector;
use crate::error::{Result, SemidbError};
use crate::utils::{output, progress};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// 已读取的原始表格：表头 + 数据行
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
}

impl RawTable {
    /// 列名对应的下标
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 必需列，缺失时返回解析错误
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| SemidbError::ParseError {
            format: "CSV".to_string(),
            path: self.path.display().to_string(),
            reason: format!("missing column '{}'", name),
        })
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(SemidbError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(ReaderBuilder::new().trim(Trim::All).from_path(path)?)
}

/// 按表头反序列化每一行
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = open_reader(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// 读取原始记录（用于列名不固定的表格）
pub fn read_raw(path: &Path) -> Result<RawTable> {
    let mut rdr = open_reader(path)?;
    let headers = rdr.headers()?.clone();
    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        records,
    })
}

/// 加载目录下所有 CSV 文件
///
/// 单个文件失败时打印警告并跳过；全部失败返回 `NoData`。
pub fn load_folder<T, F>(dir: &Path, loader: F) -> Result<Vec<T>>
where
    F: Fn(&Path) -> Result<Vec<T>>,
{
    let collector = FileCollector::new(dir);
    let files = collector.collect()?;

    if files.is_empty() {
        return Err(SemidbError::NoFilesFound {
            pattern: collector.pattern_display(),
        });
    }

    let pb = progress::create_progress_bar(files.len() as u64, "Loading CSV");
    let mut loaded_files = 0;
    let mut items = Vec::new();

    for file in &files {
        match loader(file) {
            Ok(mut rows) => {
                items.append(&mut rows);
                loaded_files += 1;
            }
            Err(e) => {
                pb.suspend(|| {
                    output::print_warning(&format!("Skipping {}: {}", file.display(), e));
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if loaded_files == 0 {
        return Err(SemidbError::NoData {
            path: dir.display().to_string(),
        });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        name: String,
        #[serde(rename = "E (eV)")]
        energy: f64,
    }

    #[test]
    fn test_read_rows_trims_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        fs::write(&path, "name, E (eV)\nGaN , -12.5\nAlAs,-9.6\n").unwrap();

        let rows: Vec<Row> = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "GaN");
        assert_eq!(rows[1].energy, -9.6);
    }

    #[test]
    fn test_read_raw_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "binary,x_GaAs,x_InAs\nGaAs InAs,0.25,0.75\n").unwrap();

        let table = read_raw(&path).unwrap();
        assert_eq!(table.column("x_InAs"), Some(2));
        assert!(table.require_column("formula").is_err());
        assert_eq!(&table.records[0][1], "0.25");
    }

    #[test]
    fn test_load_folder_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.csv"), "name,E (eV)\nSi,-5.4\n").unwrap();
        fs::write(dir.path().join("bad.csv"), "name,E (eV)\nSi,not-a-number\n").unwrap();

        let rows: Vec<Row> = load_folder(dir.path(), |p| read_rows(p)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Si");
    }

    #[test]
    fn test_load_folder_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_folder::<Row, _>(dir.path(), |p| read_rows(p)).unwrap_err();
        assert!(matches!(err, SemidbError::NoFilesFound { .. }));

        fs::write(dir.path().join("bad.csv"), "name,E (eV)\nSi,oops\n").unwrap();
        let err = load_folder::<Row, _>(dir.path(), |p| read_rows(p)).unwrap_err();
        assert!(matches!(err, SemidbError::NoData { .. }));
    }
}
