//! # 数据集路径配置
//!
//! 把三个数据库的数据位置显式化，由命令行参数（或环境变量）构造。
//!
//! ## 默认布局（相对数据根目录）
//! - `convergence/`          收敛测试 CSV
//! - `e_v_data.csv`, `vinet_fit_summary.csv`  状态方程数据
//! - `alloy/`                合金 CSV
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 构造, `commands/` 使用

use std::path::{Path, PathBuf};

/// 数据集位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub convergence_dir: PathBuf,
    pub eos_dir: PathBuf,
    pub alloy_dir: PathBuf,
}

impl DatasetConfig {
    /// 以 `root` 为根的默认布局
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        DatasetConfig {
            convergence_dir: root.join("convergence"),
            eos_dir: root.to_path_buf(),
            alloy_dir: root.join("alloy"),
        }
    }

    pub fn with_convergence_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.convergence_dir = dir;
        }
        self
    }

    pub fn with_eos_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.eos_dir = dir;
        }
        self
    }

    pub fn with_alloy_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.alloy_dir = dir;
        }
        self
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig::from_root(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let cfg = DatasetConfig::from_root("/data");
        assert_eq!(cfg.convergence_dir, PathBuf::from("/data/convergence"));
        assert_eq!(cfg.eos_dir, PathBuf::from("/data"));
        assert_eq!(cfg.alloy_dir, PathBuf::from("/data/alloy"));
    }

    #[test]
    fn test_overrides() {
        let cfg = DatasetConfig::from_root("/data")
            .with_eos_dir(Some(PathBuf::from("/fits")))
            .with_alloy_dir(None);
        assert_eq!(cfg.eos_dir, PathBuf::from("/fits"));
        assert_eq!(cfg.alloy_dir, PathBuf::from("/data/alloy"));
    }
}
