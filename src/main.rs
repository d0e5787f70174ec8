//! Pension Assistant CLI
//!
//! Command-line interface for NHS pension projections and the chat assistant

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pension_assistant::{
    assistant::{ApiKey, AssistantConfig},
    calculator::{format::format_currency_pence, reconcile},
    projection::CarePayMethod,
    take_turn, CalculatorState, CalculatorUpdate, Field, OpenAiClient, ProjectionConfig, ProjectionResult,
    ScenarioOutcome, ScenarioRunner, SchemeId, Session,
};

#[derive(Parser)]
#[command(name = "pension")]
#[command(about = "NHS pension projections with a conversational calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// CARE pensionable pay approximation for the 2015 scheme
    #[arg(long, value_enum, default_value_t = CarePay::Flat, global = true)]
    care_pay: CarePay,

    /// Start from an empty profile instead of the calculator defaults
    #[arg(long, global = true)]
    blank: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a single pension
    Project {
        #[command(flatten)]
        overrides: Overrides,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the same member under every scheme section
    Compare {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Project at several retirement ages
    Sweep {
        #[command(flatten)]
        overrides: Overrides,

        /// Retirement ages to project (e.g. "60,62,65,67")
        #[arg(long, value_delimiter = ',', default_values_t = [60, 62, 65, 67, 70])]
        ages: Vec<u32>,
    },

    /// Talk to the assistant; it can change the calculator as you go
    Chat {
        #[command(flatten)]
        overrides: Overrides,

        /// OpenAI API key (falls back to OPENAI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Model name (falls back to OPENAI_MODEL, then the built-in default)
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CarePay {
    /// Current pay scaled by the CARE percentage
    Flat,
    /// Pay at the growth midpoint of the service period
    Midpoint,
}

impl From<CarePay> for CarePayMethod {
    fn from(value: CarePay) -> Self {
        match value {
            CarePay::Flat => CarePayMethod::FlatPercentage,
            CarePay::Midpoint => CarePayMethod::GrowthMidpoint,
        }
    }
}

/// Per-field overrides applied on top of the starting calculator state
#[derive(Args, Default)]
struct Overrides {
    /// Current annual salary (GBP)
    #[arg(long)]
    salary: Option<f64>,

    /// Years of pensionable service
    #[arg(long)]
    years: Option<f64>,

    /// Scheme section, e.g. "1995 Section" or "2015 Scheme"
    #[arg(long)]
    scheme: Option<SchemeId>,

    /// Current age
    #[arg(long)]
    age: Option<u32>,

    /// Planned retirement age
    #[arg(long)]
    retire: Option<u32>,

    /// Normal pension age
    #[arg(long)]
    npa: Option<u32>,

    /// Early retirement reduction per year (%)
    #[arg(long)]
    early: Option<f64>,

    /// Late retirement increase per year (%)
    #[arg(long)]
    late: Option<f64>,

    /// Share of pension commuted for a lump sum (%)
    #[arg(long)]
    commutation: Option<u32>,

    /// Lump sum per £1 of pension given up
    #[arg(long)]
    factor: Option<f64>,

    /// CARE earnings as a percentage of current pay
    #[arg(long)]
    care_pct: Option<u32>,

    /// Salary growth (%)
    #[arg(long)]
    growth: Option<f64>,

    /// Investment growth (%)
    #[arg(long)]
    investment: Option<f64>,

    /// Inflation (%)
    #[arg(long)]
    inflation: Option<f64>,
}

impl Overrides {
    fn to_update(&self) -> CalculatorUpdate {
        CalculatorUpdate {
            current_salary: self.salary,
            years_of_service: self.years,
            scheme: self.scheme,
            current_age: self.age,
            retirement_age: self.retire,
            normal_pension_age: self.npa,
            early_reduction_per_year: self.early,
            late_increase_per_year: self.late,
            commutation_proportion: self.commutation,
            commutation_factor: self.factor,
            care_salary_pct: self.care_pct,
            salary_growth_rate: self.growth,
            investment_growth_rate: self.investment,
            inflation_rate: self.inflation,
        }
    }
}

/// Starting state with the command-line overrides merged in
fn initial_state(blank: bool, overrides: &Overrides) -> CalculatorState {
    let base = if blank { CalculatorState::blank() } else { CalculatorState::seeded() };
    let state = reconcile(&base, &overrides.to_update()).state;

    for warning in state
        .profile
        .range_violations()
        .into_iter()
        .chain(state.assumptions.range_violations())
    {
        log::warn!("{}", warning);
    }

    state
}

fn print_state(state: &CalculatorState) {
    println!("Calculator:");
    for field in Field::ALL {
        println!("  {:<34} {}", field.label(), field.render(state.get(field)));
    }
}

fn print_result(result: &ProjectionResult) {
    println!("\nProjection ({}):", result.scheme);
    println!("  Years to retirement:          {}", result.years_to_retirement);
    println!("  Projected salary:             {}", format_currency_pence(result.projected_salary));
    println!("  Pensionable pay:              {}", format_currency_pence(result.pensionable_pay));
    println!("  Base annual pension:          {}", format_currency_pence(result.base_annual_pension));
    println!("  Early/late factor:            {:.4}", result.early_late_adjustment_factor);
    println!("  Adjusted annual pension:      {}", format_currency_pence(result.adjusted_annual_pension));
    println!(
        "  Annual pension after commut.: {}",
        format_currency_pence(result.annual_pension_after_commutation)
    );
    println!("  Monthly pension:              {}", format_currency_pence(result.monthly_pension()));
    println!("  Automatic lump sum:           {}", format_currency_pence(result.automatic_lump_sum));
    println!("  Commutation lump sum:         {}", format_currency_pence(result.extra_commutation_lump_sum));
    println!("  Total lump sum:               {}", format_currency_pence(result.total_lump_sum));
    if result.has_future_projection() {
        println!("  Real annual pension:          {}", format_currency_pence(result.real_annual_pension));
        println!("  Real lump sum:                {}", format_currency_pence(result.real_lump_sum));
    }
}

fn print_outcomes(outcomes: &[ScenarioOutcome]) {
    println!(
        "{:<16} {:>4} {:>8} {:>16} {:>14} {:>16}",
        "Scenario", "NPA", "Factor", "Annual pension", "Monthly", "Lump sum"
    );
    println!("{}", "-".repeat(80));
    for outcome in outcomes {
        let r = &outcome.result;
        println!(
            "{:<16} {:>4} {:>8.4} {:>16} {:>14} {:>16}",
            outcome.label,
            outcome.inputs.normal_pension_age,
            r.early_late_adjustment_factor,
            format_currency_pence(r.annual_pension_after_commutation),
            format_currency_pence(r.monthly_pension()),
            format_currency_pence(r.total_lump_sum),
        );
    }
}

async fn chat(mut session: Session, client: OpenAiClient, runner: &ScenarioRunner) -> Result<()> {
    println!("Chatting with {}. Commands: /state, /clear, /quit", client.config().model);

    let stdin = io::stdin();
    loop {
        print!("\nyou> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear_chat();
                println!("Chat cleared.");
                continue;
            }
            "/state" => {
                print_state(&session.state);
                continue;
            }
            _ => {}
        }

        match take_turn(&mut session, &client, runner.engine(), &line).await {
            Ok(reply) => {
                println!("\nassistant> {}", reply);
                if let Some(notice) = session.take_notice() {
                    println!("\nCalculator updated:\n{}", notice.text);
                    match session.state.project(runner.engine()) {
                        Ok(result) => println!(
                            "Annual pension now {} ({} a month)",
                            format_currency_pence(result.annual_pension_after_commutation),
                            format_currency_pence(result.monthly_pension())
                        ),
                        Err(missing) => println!("Still needed: {}", missing),
                    }
                }
            }
            Err(e) if e.is_precondition() => eprintln!("{}", e),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runner = ScenarioRunner::new(ProjectionConfig {
        care_pay: cli.care_pay.into(),
    });

    match cli.command {
        Commands::Project { overrides, json } => {
            let state = initial_state(cli.blank, &overrides);
            let result = state
                .project(runner.engine())
                .context("cannot project yet; supply the missing fields as flags")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_state(&state);
                print_result(&result);
            }
        }
        Commands::Compare { overrides } => {
            let state = initial_state(cli.blank, &overrides);
            let outcomes = runner.compare_schemes(&state).context("cannot compare schemes")?;
            print_outcomes(&outcomes);
        }
        Commands::Sweep { overrides, ages } => {
            if ages.is_empty() {
                bail!("no retirement ages given");
            }
            let state = initial_state(cli.blank, &overrides);
            let outcomes = runner
                .retirement_age_sweep(&state, &ages)
                .context("cannot sweep retirement ages")?;
            print_outcomes(&outcomes);
        }
        Commands::Chat {
            overrides,
            api_key,
            model,
        } => {
            let mut session = Session::new(initial_state(cli.blank, &overrides));
            session.set_credential(api_key.and_then(ApiKey::new).or_else(ApiKey::from_env));

            let mut config = AssistantConfig::from_env();
            if let Some(model) = model {
                config.model = model;
            }

            chat(session, OpenAiClient::new(config), &runner).await?;
        }
    }

    Ok(())
}
