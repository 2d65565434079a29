//! Text and JSON rendering of an optimization outcome.

use std::io::{self, Write};

use powderopt_observers::Record;
use powderopt_process::{
    DerivedState, EQUALITY_LABELS, INEQUALITY_LABELS, ImpactBreakdown, ImpactCategory, Outcome,
    Region, Request, VARIABLE_NAMES, VARIABLE_UNITS,
};
use powderopt_solvers::optimization::sqp::Status;
use serde::Serialize;

/// Everything printed for one run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    category: ImpactCategory,
    category_name: &'static str,
    region: Region,
    status: &'static str,
    iterations: usize,
    evaluations: usize,
    variables: Variables,
    derived: &'a DerivedState,
    breakdown: &'a ImpactBreakdown,
    total: f64,
    initial_total: f64,
    improvement: f64,
    max_violation: f64,
    constraints: Vec<Residual>,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Serialize)]
struct Variables {
    electrode_diameter_m: f64,
    atomization_pressure_mpa: f64,
    tio2_fraction: f64,
}

#[derive(Debug, Serialize)]
struct Residual {
    label: &'static str,
    kind: &'static str,
    value: f64,
}

#[derive(Debug, Serialize)]
struct HistoryEntry {
    iter: usize,
    x: [f64; 3],
    objective: f64,
    violation: f64,
    alpha: f64,
}

impl<'a> Report<'a> {
    pub fn new(request: &Request, outcome: &'a Outcome, history: Option<&[Record<3>]>) -> Self {
        let [phi, p, beta] = outcome.variables.to_array();

        let constraints = INEQUALITY_LABELS
            .iter()
            .zip(&outcome.residuals.inequalities)
            .map(|(&label, &value)| Residual {
                label,
                kind: "g <= 0",
                value,
            })
            .chain(
                EQUALITY_LABELS
                    .iter()
                    .zip(&outcome.residuals.equalities)
                    .map(|(&label, &value)| Residual {
                        label,
                        kind: "h = 0",
                        value,
                    }),
            )
            .collect();

        let history = history.map(|records| {
            records
                .iter()
                .map(|record| HistoryEntry {
                    iter: record.iter,
                    x: record.point.x,
                    objective: record.point.objective,
                    violation: record.point.violation,
                    alpha: record.alpha,
                })
                .collect()
        });

        Self {
            category: request.category(),
            category_name: request.category().name(),
            region: request.region(),
            status: status_tag(outcome.status),
            iterations: outcome.iters,
            evaluations: outcome.evals,
            variables: Variables {
                electrode_diameter_m: phi,
                atomization_pressure_mpa: p,
                tio2_fraction: beta,
            },
            derived: &outcome.derived,
            breakdown: &outcome.breakdown,
            total: outcome.total(),
            initial_total: outcome.initial.total(),
            improvement: outcome.improvement(),
            max_violation: outcome.residuals.max_violation(),
            constraints,
            history,
        }
    }

    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "{} ({}), {}",
            self.category_name, self.category, self.region
        )?;
        writeln!(
            out,
            "status: {} after {} iterations ({} evaluations)",
            self.status, self.iterations, self.evaluations
        )?;

        writeln!(out, "\ndecision variables")?;
        let values = [
            self.variables.electrode_diameter_m,
            self.variables.atomization_pressure_mpa,
            self.variables.tio2_fraction,
        ];
        for ((name, unit), value) in VARIABLE_NAMES.iter().zip(VARIABLE_UNITS).zip(values) {
            writeln!(out, "  {name:<28} {value:>12.6} {unit}")?;
        }

        writeln!(out, "\nderived state")?;
        for (name, value, unit) in derived_rows(self.derived) {
            writeln!(out, "  {name:<28} {value:>12.6} {unit}")?;
        }

        writeln!(out, "\nimpact by stage")?;
        for (stage, value) in self.breakdown.stages() {
            let share = if self.total == 0.0 {
                0.0
            } else {
                100.0 * value / self.total
            };
            writeln!(out, "  {:<28} {value:>12.6} {share:>6.1}%", stage.name())?;
        }
        writeln!(out, "  {:<28} {:>12.6}", "total", self.total)?;
        writeln!(
            out,
            "  {:<28} {:>12.6} ({:+.1}% change)",
            "initial guess",
            self.initial_total,
            -100.0 * self.improvement
        )?;

        writeln!(out, "\nconstraints (max violation {:.3e})", self.max_violation)?;
        for residual in &self.constraints {
            writeln!(
                out,
                "  {:<40} {:<7} {:>12.3e}",
                residual.label, residual.kind, residual.value
            )?;
        }

        if let Some(history) = &self.history {
            writeln!(out, "\nhistory")?;
            writeln!(
                out,
                "  {:>5} {:>12} {:>10} {:>10} {:>14} {:>10} {:>8}",
                "iter", "diameter", "pressure", "TiO2", "objective", "violation", "alpha"
            )?;
            for entry in history {
                let [phi, p, beta] = entry.x;
                writeln!(
                    out,
                    "  {:>5} {phi:>12.6} {p:>10.4} {beta:>10.4} {:>14.6} {:>10.2e} {:>8.4}",
                    entry.iter, entry.objective, entry.violation, entry.alpha
                )?;
            }
        }
        Ok(())
    }
}

fn status_tag(status: Status) -> &'static str {
    match status {
        Status::Converged => "converged",
        Status::MaxIterationsReached => "max-iterations-reached",
        Status::MaxEvaluationsReached => "max-evaluations-reached",
        Status::InfeasibleStart => "infeasible-start",
        Status::NumericalFailure => "numerical-failure",
        Status::StoppedByObserver => "stopped-by-observer",
    }
}

fn derived_rows(state: &DerivedState) -> [(&'static str, f64, &'static str); 18] {
    [
        ("argon consumption", state.argon_consumption, "kg/kg"),
        ("median diameter d50", state.d50, "µm"),
        ("atomization efficiency", state.efficiency, "-"),
        ("atomized powder", state.atomized_powder, "kg"),
        ("waste powder", state.waste_powder, "kg"),
        ("Ti6Al4V ingot", state.ingot, "kg"),
        ("Ti sponge", state.sponge, "kg"),
        ("aluminum", state.aluminum, "kg"),
        ("vanadium", state.vanadium, "kg"),
        ("TiCl4", state.ticl4, "kg"),
        ("TiO2", state.tio2, "kg"),
        ("Ti slag", state.slag, "kg"),
        ("ilmenite", state.ilmenite, "kg"),
        ("smelting energy", state.smelting_energy, "kWh/kg"),
        ("chlorination energy", state.chlorination_energy, "kWh/kg"),
        ("remelting energy", state.remelting_energy, "kWh/kg"),
        ("atomization melt energy", state.atomization_melt_energy, "kWh/kg"),
        ("compression energy", state.compression_energy, "kWh/kg"),
    ]
}
