use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use powderopt_observers::{Recorder, TracingObserver};
use powderopt_process::{ImpactCategory, InputError, Region, Request, optimize};
use uom::si::{
    f64::{Length, Mass},
    length::micrometer,
    mass::kilogram,
};

use crate::{config::RunConfig, prompt::Prompter, report::Report};

#[derive(Parser, Debug)]
#[command(
    name = "powderopt",
    version,
    about = "Minimize the life-cycle impact of Ti6Al4V powder production"
)]
pub struct Cli {
    /// Final powder mass to produce, in kg.
    #[arg(long)]
    pub mass: Option<f64>,

    /// Target median particle diameter, in µm.
    #[arg(long)]
    pub diameter: Option<f64>,

    /// Impact category code to minimize (see --list-categories).
    #[arg(long)]
    pub category: Option<ImpactCategory>,

    /// Production region: EU or CN.
    #[arg(long)]
    pub region: Option<Region>,

    /// TOML file with solver, search-space and plant overrides.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Include the iterate history in the report.
    #[arg(long)]
    pub trace: bool,

    /// Print the impact category codes and exit.
    #[arg(long)]
    pub list_categories: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list_categories {
        for category in ImpactCategory::ALL {
            writeln!(out, "{:<6} {}", category.code(), category.name())?;
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let table = config.table()?;

    let stdin = io::stdin();
    let request = if stdin.is_terminal() {
        let mut prompter = Prompter::new(stdin.lock(), io::stderr());
        collect_request(cli, Some(&mut prompter))?
    } else {
        collect_request::<io::StdinLock<'_>, io::Stderr>(cli, None)?
    };

    let mut recorder = Recorder::new();
    let outcome = optimize(
        &request,
        &table,
        &config.settings(),
        (TracingObserver, &mut recorder),
    )
    .context("optimization failed")?;

    let history = cli.trace.then(|| recorder.iterates());
    let report = Report::new(&request, &outcome, history);
    match cli.format {
        Format::Text => report.write_text(&mut out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Builds the request from flags, prompting for anything missing.
///
/// Without a prompter every value must come from a flag.
fn collect_request<R: BufRead, W: Write>(
    cli: &Cli,
    mut prompter: Option<&mut Prompter<R, W>>,
) -> Result<Request> {
    let mass = match cli.mass {
        Some(mass) => mass,
        None => ask(&mut prompter, "mass", "final powder mass [kg]", |s| {
            positive(s, InputError::FinalMass)
        })?,
    };
    let diameter = match cli.diameter {
        Some(diameter) => diameter,
        None => ask(
            &mut prompter,
            "diameter",
            "target particle diameter [µm]",
            |s| positive(s, InputError::TargetDiameter),
        )?,
    };
    let category = match cli.category {
        Some(category) => category,
        None => ask(&mut prompter, "category", "impact category code", str::parse)?,
    };
    let region = match cli.region {
        Some(region) => region,
        None => ask(&mut prompter, "region", "region (EU or CN)", str::parse)?,
    };

    Ok(Request::new(
        Mass::new::<kilogram>(mass),
        Length::new::<micrometer>(diameter),
        category,
        region,
    )?)
}

fn ask<R, W, T>(
    prompter: &mut Option<&mut Prompter<R, W>>,
    flag: &str,
    label: &str,
    parse: impl Fn(&str) -> Result<T, InputError>,
) -> Result<T>
where
    R: BufRead,
    W: Write,
{
    match prompter {
        Some(prompter) => prompter.ask(label, |s| parse(s).map_err(|e| e.to_string())),
        None => bail!("missing --{flag} (pass it on the command line or run interactively)"),
    }
}

fn positive(s: &str, error: fn(f64) -> InputError) -> Result<f64, InputError> {
    let value: f64 = s.parse().map_err(|_| error(f64::NAN))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(error(value))
    }
}
