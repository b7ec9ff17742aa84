//! # alloy 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/alloy.rs` 定义的参数
//! - 使用 `db/alloy.rs`
//! - 使用 `utils/output.rs`

use crate::cli::alloy::{AlloyArgs, AlloyCommands, AlloyGetArgs};
use crate::config::DatasetConfig;
use crate::db::AlloyDb;
use crate::error::{Result, SemidbError};
use crate::models::{AlloyProperty, AlloyValue};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 体系概览表格行
#[derive(Debug, Clone, Tabled)]
struct SystemRow {
    #[tabled(rename = "Binary")]
    binary: String,
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "Functional")]
    functional: String,
    #[tabled(rename = "Compositions")]
    compositions: usize,
}

/// 执行 alloy 命令
pub fn execute(config: &DatasetConfig, args: AlloyArgs) -> Result<()> {
    output::print_info(&format!(
        "Loading alloy data from '{}'",
        config.alloy_dir.display()
    ));
    let db = AlloyDb::open(&config.alloy_dir)?;

    match args.command {
        AlloyCommands::List => list(&db),
        AlloyCommands::Get(get_args) => {
            let db = db.with_tolerance(get_args.tolerance);
            get(&db, get_args)
        }
    }
}

fn list(db: &AlloyDb) -> Result<()> {
    output::print_header("Available Alloy Systems");

    if db.is_empty() {
        output::print_warning("No alloy entries loaded.");
        return Ok(());
    }

    let mut rows = Vec::new();
    for binary in db.binaries() {
        for structure in db.structures(&binary) {
            for functional in db.functionals(&binary, &structure) {
                let compositions = db.compositions(&binary, &structure, &functional).len();
                rows.push(SystemRow {
                    binary: binary.clone(),
                    structure: structure.clone(),
                    functional,
                    compositions,
                });
            }
        }
    }

    println!("{}", Table::new(&rows));
    output::print_done(&format!("{} alloy entries", db.len()));
    Ok(())
}

/// 把 `--comp` 参数整理为两元组分
fn composition(values: &[f64]) -> Result<[f64; 2]> {
    match values {
        [a, b] => Ok([*a, *b]),
        _ => Err(SemidbError::InvalidArgument(
            "Composition must be given as two values, e.g. --comp 0.25,0.75".to_string(),
        )),
    }
}

fn get(db: &AlloyDb, args: AlloyGetArgs) -> Result<()> {
    let comp = composition(&args.comp)?;
    let property: Option<AlloyProperty> = args.property.as_deref().map(str::parse).transpose()?;

    let value = db.get(&args.binary, &args.structure, &args.functional, comp, property)?;

    output::print_header(&format!(
        "{} ({}, {}) at [{}, {}]",
        args.binary, args.structure, args.functional, comp[0], comp[1]
    ));

    match value {
        AlloyValue::Scalar(v) => {
            let label = property.map(|p| p.to_string()).unwrap_or_default();
            output::print_value(&label, &v.to_string());
        }
        AlloyValue::Lattice(m) => {
            output::print_info("Lattice matrix (Ang):");
            for row in m {
                println!("  {:>10.5} {:>10.5} {:>10.5}", row[0], row[1], row[2]);
            }
        }
        AlloyValue::Record(entry) => {
            output::print_value("formula", &entry.formula);
            for (name, x) in &entry.components {
                output::print_value(&format!("x_{}", name), &x.to_string());
            }
            output::print_value("volume(Ang^3)", &entry.volume.to_string());
            output::print_value("num_atoms", &entry.num_atoms.to_string());
            output::print_value("total_energy(eV)", &entry.total_energy.to_string());
            output::print_value("bandgap_Gamma(eV)", &entry.bandgap.to_string());
            output::print_value("hmix_meV_per_formula", &entry.hmix.to_string());
            output::print_value("lattice_matrix", &entry.lattice_matrix);
        }
    }

    Ok(())
}
