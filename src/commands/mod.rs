//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `db/`, `utils/`
//! - 子模块: conv, eos, alloy

pub mod alloy;
pub mod conv;
pub mod eos;

use crate::cli::Commands;
use crate::config::DatasetConfig;
use crate::error::Result;

/// 执行命令
pub fn run(config: &DatasetConfig, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Conv(args) => conv::execute(config, args),
        Commands::Eos(args) => eos::execute(config, args),
        Commands::Alloy(args) => alloy::execute(config, args),
    }
}
