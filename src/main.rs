//! # semidb - 半导体预计算结果查询工具
//!
//! 读取已有的收敛测试、Vinet 状态方程和合金数据表，提供查询与绘图。
//! 不运行模拟、不做拟合、不解析第一性原理程序的原始输出。
//!
//! ## 子命令
//! - `conv`  - k 点 / ENCUT 收敛序列 (list / get / plot)
//! - `eos`   - Vinet 拟合参数与 E–V 曲线 (list / get / plot)
//! - `alloy` - 二元合金性质 (list / get)
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── config.rs   (数据集路径)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── db/       (查询外观: convergence, eos, alloy)
//!   │     │     ├── dataset/ (CSV 加载)
//!   │     │     └── plot/    (plotters 绘图)
//!   │     └── models/   (数据模型)
//!   ├── utils/      (终端输出, 进度条)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod config;
mod dataset;
mod db;
mod error;
mod models;
mod plot;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    let config = cli.dataset_config();

    if let Err(e) = commands::run(&config, cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
