//! # 数据文件收集器
//!
//! 根据目录和模式收集待加载的数据文件列表。
//!
//! ## 功能
//! - glob 模式匹配 (`*.csv`)
//! - 只扫描目录顶层
//! - 结果按路径排序，保证加载顺序确定
//!
//! ## 依赖关系
//! - 被 `dataset/table.rs` 调用
//! - 使用 `walkdir` 遍历目录, `glob` 匹配文件名

use crate::error::{Result, SemidbError};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入目录
    input: PathBuf,
    /// 文件名匹配模式
    pattern: String,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            pattern: "*.csv".to_string(),
        }
    }

    /// 模式的可读形式（用于错误信息）
    pub fn pattern_display(&self) -> String {
        format!("{} in {}", self.pattern, self.input.display())
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.input.is_dir() {
            return Err(SemidbError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let pattern = glob::Pattern::new(&self.pattern).map_err(|e| {
            SemidbError::InvalidArgument(format!("Invalid pattern '{}': {}", self.pattern, e))
        })?;

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| Self::matches(&pattern, e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }

    /// 检查文件名是否匹配
    fn matches(pattern: &glob::Pattern, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => pattern.matches(name),
            None => false,
        }
    }
}
