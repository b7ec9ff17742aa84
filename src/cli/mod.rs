//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `conv`: 收敛数据 (list / get / plot)
//! - `eos`: 状态方程数据 (list / get / plot)
//! - `alloy`: 合金数据 (list / get)
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: conv, eos, alloy

pub mod alloy;
pub mod conv;
pub mod eos;

use crate::config::DatasetConfig;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// semidb - 半导体预计算结果查询工具
#[derive(Parser)]
#[command(name = "semidb")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Query and plot precomputed semiconductor simulation results", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Root directory of the dataset
    #[arg(long, global = true, env = "SEMIDB_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Directory with convergence CSV files (default: <data-dir>/convergence)
    #[arg(long, global = true, env = "SEMIDB_CONVERGENCE_DIR")]
    pub convergence_dir: Option<PathBuf>,

    /// Directory with e_v_data.csv and vinet_fit_summary.csv (default: <data-dir>)
    #[arg(long, global = true, env = "SEMIDB_EOS_DIR")]
    pub eos_dir: Option<PathBuf>,

    /// Directory with alloy CSV files (default: <data-dir>/alloy)
    #[arg(long, global = true, env = "SEMIDB_ALLOY_DIR")]
    pub alloy_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// 由参数构造数据集配置
    pub fn dataset_config(&self) -> DatasetConfig {
        DatasetConfig::from_root(&self.data_dir)
            .with_convergence_dir(self.convergence_dir.clone())
            .with_eos_dir(self.eos_dir.clone())
            .with_alloy_dir(self.alloy_dir.clone())
    }
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// k-point / ENCUT convergence series
    Conv(conv::ConvArgs),

    /// Vinet equation-of-state fits and E-V curves
    Eos(eos::EosArgs),

    /// Binary alloy properties by composition
    Alloy(alloy::AlloyArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conv_get() {
        let cli = Cli::try_parse_from([
            "semidb", "--data-dir", "/data", "conv", "get", "GaN", "zb", "kpt", "--total",
        ])
        .unwrap();
        assert_eq!(cli.dataset_config().convergence_dir, PathBuf::from("/data/convergence"));
        match cli.command {
            Commands::Conv(conv::ConvArgs {
                command: conv::ConvCommands::Get(args),
            }) => {
                assert_eq!(args.material, "GaN");
                assert_eq!(args.conv_type, "kpt");
                assert_eq!(args.functional, "PBE");
                assert!(args.total);
            }
            _ => panic!("expected conv get"),
        }
    }

    #[test]
    fn test_parse_alloy_comp() {
        let cli = Cli::try_parse_from([
            "semidb", "alloy", "get", "GaAs InAs", "zb", "--comp", "0.25,0.75", "--eos-dir", "/x",
        ])
        .unwrap();
        assert_eq!(cli.dataset_config().eos_dir, PathBuf::from("/x"));
        match cli.command {
            Commands::Alloy(alloy::AlloyArgs {
                command: alloy::AlloyCommands::Get(args),
            }) => assert_eq!(args.comp, vec![0.25, 0.75]),
            _ => panic!("expected alloy get"),
        }
    }
}
