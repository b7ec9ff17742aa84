//! # conv 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/conv.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// conv 主命令参数
#[derive(Args, Debug)]
pub struct ConvArgs {
    #[command(subcommand)]
    pub command: ConvCommands,
}

/// conv 子命令
#[derive(Subcommand, Debug)]
pub enum ConvCommands {
    /// List materials, structures and functionals with convergence data
    List,

    /// Print one convergence series
    Get(ConvGetArgs),

    /// Plot k-point and ENCUT convergence side by side
    Plot(ConvPlotArgs),
}

/// conv get 参数
#[derive(Args, Debug)]
pub struct ConvGetArgs {
    /// Material name (e.g. GaN)
    pub material: String,

    /// Structure / polytype tag (e.g. zb)
    pub structure: String,

    /// Convergence type: kpt or encut
    pub conv_type: String,

    /// Exchange-correlation functional
    #[arg(long, default_value = "PBE")]
    pub functional: String,

    /// Use total energy instead of energy per atom
    #[arg(long, default_value_t = false)]
    pub total: bool,

    /// Also write the series to this CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}

/// conv plot 参数
#[derive(Args, Debug)]
pub struct ConvPlotArgs {
    /// Material name (e.g. GaN)
    pub material: String,

    /// Structure / polytype tag (e.g. zb)
    pub structure: String,

    /// Exchange-correlation functional
    #[arg(long, default_value = "PBE")]
    pub functional: String,

    /// Use total energy instead of energy per atom
    #[arg(long, default_value_t = false)]
    pub total: bool,

    /// Output image (PNG, or SVG by extension)
    #[arg(short, long, default_value = "convergence.png")]
    pub output: PathBuf,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 400)]
    pub height: u32,
}
