//! # conv 命令实现
//!
//! ## 功能
//! - 列出已有的收敛数据
//! - 打印单条收敛序列（可导出 CSV）
//! - 绘制 k 点 / ENCUT 双面板收敛图
//!
//! ## 依赖关系
//! - 使用 `cli/conv.rs` 定义的参数
//! - 使用 `db/convergence.rs`
//! - 使用 `utils/output.rs`

use crate::cli::conv::{ConvArgs, ConvCommands, ConvGetArgs, ConvPlotArgs};
use crate::config::DatasetConfig;
use crate::db::ConvergenceDb;
use crate::error::{Result, SemidbError};
use crate::models::{ConvType, ConvergenceSeries, EnergyBasis, DEFAULT_FUNCTIONAL};
use crate::plot::PlotOptions;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 概览表格行
#[derive(Debug, Clone, Tabled)]
struct SeriesRow {
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "Functional")]
    functional: String,
    #[tabled(rename = "Type")]
    conv_type: String,
    #[tabled(rename = "Points")]
    points: usize,
}

/// 序列表格行
#[derive(Debug, Clone, Tabled)]
struct PointRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "ΔE vs last")]
    delta: String,
}

/// 执行 conv 命令
pub fn execute(config: &DatasetConfig, args: ConvArgs) -> Result<()> {
    output::print_info(&format!(
        "Loading convergence data from '{}'",
        config.convergence_dir.display()
    ));
    let db = ConvergenceDb::open(&config.convergence_dir)?;

    match args.command {
        ConvCommands::List => list(&db),
        ConvCommands::Get(get_args) => get(&db, get_args),
        ConvCommands::Plot(plot_args) => plot(&db, plot_args),
    }
}

fn basis(total: bool) -> EnergyBasis {
    if total {
        EnergyBasis::Total
    } else {
        EnergyBasis::PerAtom
    }
}

fn list(db: &ConvergenceDb) -> Result<()> {
    output::print_header("Available Convergence Series");

    if db.is_empty() {
        output::print_warning("No convergence series loaded.");
        return Ok(());
    }

    let materials = db.materials();
    let mut rows = Vec::with_capacity(db.len());
    for material in &materials {
        for structure in db.structures(material) {
            for functional in db.functionals(material, &structure) {
                for conv_type in ConvType::ALL {
                    if let Ok(series) = db.get_with(material, &structure, conv_type, &functional) {
                        rows.push(SeriesRow {
                            material: material.clone(),
                            structure: structure.clone(),
                            functional: functional.clone(),
                            conv_type: conv_type.to_string(),
                            points: series.len(),
                        });
                    }
                }
            }
        }
    }

    println!("{}", Table::new(&rows));
    output::print_done(&format!(
        "{} series across {} materials",
        db.len(),
        materials.len()
    ));
    Ok(())
}

fn get(db: &ConvergenceDb, args: ConvGetArgs) -> Result<()> {
    let conv_type: ConvType = args.conv_type.parse()?;
    let basis = basis(args.total);
    let series = if args.functional == DEFAULT_FUNCTIONAL {
        db.get(&args.material, &args.structure, conv_type)?
    } else {
        db.get_with(&args.material, &args.structure, conv_type, &args.functional)?
    };

    output::print_header(&format!("{} convergence", series.key));
    output::print_info(&format!(
        "Parameter: {}, energy: {}",
        conv_type.axis_label(),
        basis.axis_label()
    ));

    let points = series.points(basis);
    let last = points.last().map(|(_, e)| *e).unwrap_or(0.0);
    let rows: Vec<PointRow> = points
        .iter()
        .enumerate()
        .map(|(i, (x, e))| PointRow {
            index: i + 1,
            parameter: format!("{}", x),
            energy: format!("{:.6}", e),
            delta: format!("{:.6}", e - last),
        })
        .collect();
    println!("{}", Table::new(&rows));

    if let Some(ref path) = args.output_csv {
        save_series_csv(series, conv_type, basis, path)?;
        output::print_success(&format!("Series saved to '{}'", path.display()));
    }

    Ok(())
}

fn plot(db: &ConvergenceDb, args: ConvPlotArgs) -> Result<()> {
    let options = PlotOptions::new(&args.output).with_size(args.width, args.height);
    db.plot(
        &args.material,
        &args.structure,
        &args.functional,
        basis(args.total),
        &options,
    )?;
    output::print_success(&format!(
        "Convergence plot saved to '{}'",
        args.output.display()
    ));
    Ok(())
}

/// 保存序列到 CSV
fn save_series_csv(
    series: &ConvergenceSeries,
    conv_type: ConvType,
    basis: EnergyBasis,
    output_path: &Path,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record([conv_type.column_name(), basis.axis_label()])?;
    for (x, e) in series.points(basis) {
        wtr.write_record([x.to_string(), format!("{:.10}", e)])?;
    }
    wtr.flush().map_err(|e| SemidbError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
