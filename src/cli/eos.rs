//! # eos 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/eos.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// eos 主命令参数
#[derive(Args, Debug)]
pub struct EosArgs {
    #[command(subcommand)]
    pub command: EosCommands,
}

/// eos 子命令
#[derive(Subcommand, Debug)]
pub enum EosCommands {
    /// List (material, structure) pairs with a Vinet fit
    List,

    /// Get a fitted quantity (E, V, B, Bp) or the E-V curve
    Get(EosGetArgs),

    /// Plot E-V samples with the stored Vinet curve
    Plot(EosPlotArgs),
}

/// eos get 参数
#[derive(Args, Debug)]
pub struct EosGetArgs {
    /// Material name (e.g. AlAs)
    pub material: String,

    /// Structure / polytype tag (e.g. zb)
    pub structure: String,

    /// One of: E, V, B, Bp, E-V
    pub fit_param: String,

    /// Write the E-V curve to this CSV file (E-V only)
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}

/// eos plot 参数
#[derive(Args, Debug)]
pub struct EosPlotArgs {
    /// Material name (e.g. AlAs)
    pub material: String,

    /// Structure / polytype tag (e.g. zb)
    pub structure: String,

    /// Output image (PNG, or SVG by extension)
    #[arg(short, long, default_value = "e_v.png")]
    pub output: PathBuf,

    /// Figure width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}
