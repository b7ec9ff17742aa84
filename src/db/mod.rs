//! # 数据库模块
//!
//! 三个相互独立的只读查询外观，构造时一次性加载，之后只做内存查询。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `dataset/`, `models/`, `plot/`
//! - 子模块: convergence, eos, alloy

pub mod alloy;
pub mod convergence;
pub mod eos;

pub use alloy::AlloyDb;
pub use convergence::ConvergenceDb;
pub use eos::EosDb;
