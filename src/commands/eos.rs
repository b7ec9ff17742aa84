//! # eos 命令实现
//!
//! ## 功能
//! - 列出拥有 Vinet 拟合的材料
//! - 查询 E / V / B / Bp 或完整 E–V 曲线
//! - 绘制 E–V 图
//!
//! ## 依赖关系
//! - 使用 `cli/eos.rs` 定义的参数
//! - 使用 `db/eos.rs`
//! - 使用 `utils/output.rs`

use crate::cli::eos::{EosArgs, EosCommands, EosGetArgs, EosPlotArgs};
use crate::config::DatasetConfig;
use crate::db::EosDb;
use crate::error::{Result, SemidbError};
use crate::models::{FitParam, MaterialKey};
use crate::plot::PlotOptions;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 拟合汇总表格行
#[derive(Debug, Clone, Tabled)]
struct FitRow {
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "E (eV)")]
    e0: String,
    #[tabled(rename = "V (Å³)")]
    v0: String,
    #[tabled(rename = "B (GPa)")]
    b0: String,
    #[tabled(rename = "Bp")]
    bp: String,
    #[tabled(rename = "All structures")]
    structures: String,
}

/// E–V 表格行
#[derive(Debug, Clone, Tabled)]
struct SampleRow {
    #[tabled(rename = "V (Å³)")]
    volume: String,
    #[tabled(rename = "E (eV)")]
    energy: String,
}

/// 执行 eos 命令
pub fn execute(config: &DatasetConfig, args: EosArgs) -> Result<()> {
    output::print_info(&format!(
        "Loading equation-of-state data from '{}'",
        config.eos_dir.display()
    ));
    let db = EosDb::open(&config.eos_dir)?;

    match args.command {
        EosCommands::List => list(&db),
        EosCommands::Get(get_args) => get(&db, get_args),
        EosCommands::Plot(plot_args) => plot(&db, plot_args),
    }
}

fn list(db: &EosDb) -> Result<()> {
    output::print_header("Vinet Equation-of-State Fits");

    let rows = db
        .list_materials()
        .into_iter()
        .map(|key| -> Result<FitRow> {
            let fit = db.fit(&key.material, &key.structure)?;
            let structures = db.structures(&key.material).join(", ");
            Ok(FitRow {
                material: key.material,
                structure: key.structure,
                e0: format!("{:.6}", fit.e0),
                v0: format!("{:.4}", fit.v0),
                b0: format!("{:.2}", fit.b0),
                bp: format!("{:.3}", fit.bp),
                structures,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{}", Table::new(&rows));
    output::print_done(&format!("{} fitted materials", rows.len()));
    Ok(())
}

fn get(db: &EosDb, args: EosGetArgs) -> Result<()> {
    let param: FitParam = args.fit_param.parse()?;
    let key = MaterialKey::new(args.material.as_str(), args.structure.as_str());

    let value = db.get(&args.material, &args.structure, param)?;

    if let Some(scalar) = value.as_scalar() {
        output::print_header(&format!("{} {}", key, param));
        output::print_value(&param.to_string(), &format!("{} {}", scalar, param.unit()));
        if args.output_csv.is_some() {
            output::print_warning("--output-csv applies to E-V only; ignored.");
        }
    } else if let Some(curve) = value.as_curve() {
        output::print_header(&format!("{} E-V curve", key));
        let rows: Vec<SampleRow> = curve
            .iter()
            .map(|(v, e)| SampleRow {
                volume: format!("{:.4}", v),
                energy: format!("{:.6}", e),
            })
            .collect();
        println!("{}", Table::new(&rows));

        if let Some(ref path) = args.output_csv {
            save_curve_csv(curve, path)?;
            output::print_success(&format!("E-V curve saved to '{}'", path.display()));
        }
    }

    Ok(())
}

fn plot(db: &EosDb, args: EosPlotArgs) -> Result<()> {
    let options = PlotOptions::new(&args.output).with_size(args.width, args.height);
    db.plot(&args.material, &args.structure, &options)?;
    output::print_success(&format!("E-V plot saved to '{}'", args.output.display()));
    Ok(())
}

/// 保存 E–V 曲线到 CSV，列名与输入文件一致
fn save_curve_csv(curve: &[(f64, f64)], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record(["Volume(Ang^3)", "Energy(eV)"])?;
    for (v, e) in curve {
        wtr.write_record([v.to_string(), e.to_string()])?;
    }
    wtr.flush().map_err(|e| SemidbError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_save_curve_csv_round_trips_through_reader() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("curve.csv");
        save_curve_csv(&[(40.5, -9.1), (41.0, -9.2)], &out).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text, "Volume(Ang^3),Energy(eV)\n40.5,-9.1\n41,-9.2\n");
    }

    #[test]
    fn test_list_and_reject_unknown_fit_param() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("e_v_data.csv"),
            "material,structure,Volume(Ang^3),Energy(eV)\nSi,dia,40.0,-10.8\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("vinet_fit_summary.csv"),
            "material,structure,E (eV),V (Ang^3),B (GPa),Bp\nSi,dia,-10.85,40.9,88.0,4.2\n",
        )
        .unwrap();
        let db = EosDb::open(dir.path()).unwrap();
        list(&db).unwrap();

        let args = EosGetArgs {
            material: "Si".to_string(),
            structure: "dia".to_string(),
            fit_param: "G0".to_string(),
            output_csv: None,
        };
        assert!(matches!(get(&db, args), Err(SemidbError::InvalidArgument(_))));
    }
}
