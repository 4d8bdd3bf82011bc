use crate::Calibration::calibration_harness::CalibrationHarness;
use crate::Calibration::reference_data::table7_298;
use crate::Thermodynamics::DBhandlers::ZeleznikParams::{Family, ParameterDatabase, Species};
use crate::Thermodynamics::DBhandlers::basis::{basis_fun, basis_sym, evaluate};
use crate::Thermodynamics::ExcessFunctions::composition::Composition;
use crate::Thermodynamics::ExcessFunctions::model_variant::ModelVariant;
use crate::Thermodynamics::ExcessFunctions::partial_molar::PartialMolarExtractor;
use crate::Utils::grid_export::{GridExporter, GridSpec, Range};
use prettytable::{Table, row};
use std::str::FromStr;

pub fn zeleznik_examples(task: usize) {
    let db = ParameterDatabase::seed().unwrap();
    match task {
        0 => {
            println!(
                "table {} ({})",
                db.version(),
                db.source().unwrap_or("no source")
            );
            db.pretty_print();
        }
        1 => {
            // μ_111 symbolically, then compared with the numeric basis
            let set = db.lookup(Family::Interaction, Species::A, Species::A, Species::A);
            let sym = basis_sym(&set);
            println!("mu_111(T) = {}", sym);
            let f_sym = sym.lambdify1D();
            let f_num = basis_fun(&set);
            for t in [250.0, 298.15, 350.0] {
                println!(
                    "T = {:7.2} K: symbolic {:.8}, closure {:.8}, direct {:.8}",
                    t,
                    f_sym(t),
                    f_num(t),
                    evaluate(&set, t).unwrap()
                );
            }
        }
        2 => {
            let variant = ModelVariant::from_str("asym/k/raw").unwrap();
            let slice = PartialMolarExtractor::new(db).slice(298.15).unwrap();
            let x = Composition::from_solute(0.3).unwrap();
            let mut table = Table::new();
            table.add_row(row!["i", "j", "k", "Φ(i)", "μ", "ε", "ln x", "term"]);
            for term in slice.terms(&x, &variant) {
                table.add_row(row![
                    term.i.index(),
                    term.j.index(),
                    term.k.index(),
                    format!("{:.4}", term.phi),
                    format!("{:.4}", term.mu),
                    format!("{:.4}", term.eps),
                    format!("{:.4}", term.ln_x),
                    format!("{:.6}", term.value)
                ]);
            }
            table.printstd();
            println!("Q = {:.6}", slice.excess_q(&x, &variant));
        }
        3 => {
            let variant = ModelVariant::default();
            let ex = PartialMolarExtractor::new(db);
            let mut table = Table::new();
            table.add_row(row!["x_A", "scheme", "dQ/dx_A", "water", "acid", "a_w"]);
            for x_a in [0.0, 1e-8, 0.1, 0.5, 0.9, 1.0 - 1e-8, 1.0] {
                table.add_row(row![
                    format!("{:e}", x_a),
                    format!("{:?}", ex.scheme(x_a)),
                    format!("{:.6}", ex.derivative(x_a, 298.15, &variant).unwrap()),
                    format!("{:.6}", ex.partial_molar(x_a, 298.15, &variant).unwrap()),
                    format!(
                        "{:.6}",
                        ex.partial_molar_for(Species::A, x_a, 298.15, &variant)
                            .unwrap()
                    ),
                    format!(
                        "{:.6e}",
                        ex.water_activity(x_a, 298.15, &variant).unwrap()
                    )
                ]);
            }
            table.printstd();
        }
        4 => {
            let harness = CalibrationHarness::new(db);
            let sweep = harness
                .sweep(&ModelVariant::catalog(false), table7_298(), None)
                .unwrap();
            sweep.pretty_print();
            let best = sweep.best().unwrap();
            best.pretty_print();
        }
        5 => {
            let grid = GridSpec::new(Range::new(0.0, 0.1, 0.1), Range::new(50.0, 50.1, 0.1));
            let exporter =
                GridExporter::new(PartialMolarExtractor::new(db), ModelVariant::default());
            let summary = exporter.export(&grid, &mut std::io::stdout()).unwrap();
            println!("{:?}", summary);
        }
        _ => println!("no example with number {}", task),
    }
}
