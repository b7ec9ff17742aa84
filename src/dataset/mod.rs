//! # 数据集加载模块
//!
//! 三个数据库共享的 CSV 加载辅助。
//!
//! ## 依赖关系
//! - 被 `db/` 使用
//! - 子模块: collector, table

pub mod collector;
pub mod table;

pub use table::{load_folder, read_raw, read_rows, RawTable};
