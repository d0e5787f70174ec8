//! Run projections for every member in a CSV file
//!
//! Outputs one row of headline figures per member

use anyhow::{Context, Result};
use clap::Parser;
use pension_assistant::{
    member::load_members,
    projection::CarePayMethod,
    Assumptions, CalculatorState, ProjectionConfig, ScenarioRunner,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "run_batch")]
#[command(about = "Project pensions for a file of scheme members", long_about = None)]
struct Cli {
    /// Member CSV (MemberID, Scheme, CurrentSalary, YearsOfService, CurrentAge, RetirementAge, NormalPensionAge)
    #[arg(long, default_value = "members.csv")]
    input: PathBuf,

    /// Where to write the projections
    #[arg(long, default_value = "member_projections.csv")]
    output: PathBuf,

    /// Assumptions as JSON (calculator defaults when omitted)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Use the growth-midpoint CARE pay approximation
    #[arg(long)]
    care_midpoint: bool,
}

/// One output row
#[derive(Debug, Serialize)]
struct OutputRow {
    #[serde(rename = "MemberID")]
    member_id: u32,
    #[serde(rename = "Scheme")]
    scheme: String,
    #[serde(rename = "YearsToRetirement")]
    years_to_retirement: u32,
    #[serde(rename = "PensionablePay")]
    pensionable_pay: f64,
    #[serde(rename = "EarlyLateFactor")]
    early_late_factor: f64,
    #[serde(rename = "AnnualPension")]
    annual_pension: f64,
    #[serde(rename = "MonthlyPension")]
    monthly_pension: f64,
    #[serde(rename = "TotalLumpSum")]
    total_lump_sum: f64,
    #[serde(rename = "RealAnnualPension")]
    real_annual_pension: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    println!("Loading members from {}...", cli.input.display());

    let members = load_members(&cli.input).with_context(|| format!("loading {}", cli.input.display()))?;
    println!("Loaded {} members in {:?}", members.len(), start.elapsed());

    let assumptions: Assumptions = match &cli.assumptions {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Assumptions::default(),
    };
    for warning in assumptions.range_violations() {
        log::warn!("{}", warning);
    }

    let runner = ScenarioRunner::new(ProjectionConfig {
        care_pay: if cli.care_midpoint {
            CarePayMethod::GrowthMidpoint
        } else {
            CarePayMethod::FlatPercentage
        },
    });

    // Loader guarantees every mandatory field is present
    let mut inputs = Vec::with_capacity(members.len());
    for member in &members {
        let state = CalculatorState {
            profile: member.profile.clone(),
            assumptions: assumptions.clone(),
        };
        for warning in state.profile.range_violations() {
            log::warn!("member {}: {}", member.member_id, warning);
        }
        inputs.push(
            state
                .projection_inputs()
                .with_context(|| format!("member {}", member.member_id))?,
        );
    }

    println!("Running projections...");
    let proj_start = Instant::now();
    let results = runner.run_batch(&inputs);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    let mut total_annual = 0.0;
    let mut total_lump = 0.0;
    for (member, result) in members.iter().zip(&results) {
        total_annual += result.annual_pension_after_commutation;
        total_lump += result.total_lump_sum;

        writer.serialize(OutputRow {
            member_id: member.member_id,
            scheme: result.scheme.short_name().to_string(),
            years_to_retirement: result.years_to_retirement,
            pensionable_pay: result.pensionable_pay,
            early_late_factor: result.early_late_adjustment_factor,
            annual_pension: result.annual_pension_after_commutation,
            monthly_pension: result.monthly_pension(),
            total_lump_sum: result.total_lump_sum,
            real_annual_pension: result.real_annual_pension,
        })?;
    }
    writer.flush()?;

    println!("Output written to {}", cli.output.display());

    println!("\nBatch Summary:");
    println!("  Members:             {}", results.len());
    println!("  Total annual pension: £{:.2}", total_annual);
    println!("  Total lump sums:      £{:.2}", total_lump);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
