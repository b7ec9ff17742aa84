//! # alloy 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/alloy.rs`

use clap::{Args, Subcommand};

/// alloy 主命令参数
#[derive(Args, Debug)]
pub struct AlloyArgs {
    #[command(subcommand)]
    pub command: AlloyCommands,
}

/// alloy 子命令
#[derive(Subcommand, Debug)]
pub enum AlloyCommands {
    /// List binaries with their structures, functionals and compositions
    List,

    /// Look up an alloy property at a given composition
    Get(AlloyGetArgs),
}

/// alloy get 参数
#[derive(Args, Debug)]
pub struct AlloyGetArgs {
    /// Binary system, two components separated by a space (e.g. "GaAs InAs")
    pub binary: String,

    /// Structure / polytype tag (e.g. zb)
    pub structure: String,

    /// Composition in the order of the binary name (e.g. 0.25,0.75)
    #[arg(long, value_delimiter = ',', required = true)]
    pub comp: Vec<f64>,

    /// Property: GAP, LATTICE, H_MIX, VOLUME (default: full record)
    #[arg(long)]
    pub property: Option<String>,

    /// Exchange-correlation functional
    #[arg(long, default_value = "PBE")]
    pub functional: String,

    /// Composition matching tolerance
    #[arg(long, default_value_t = 1e-6)]
    pub tolerance: f64,
}
