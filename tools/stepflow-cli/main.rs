use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::fs;
use std::time::Instant;
use stepflow::prelude::*;
use stepflow::presets;

/// Built-in workflows selectable with `--preset`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetCli {
    ClientSignup,
    ProfessionalOnboarding,
    ProviderWizard,
    ServiceBooking,
}

/// Replays a scripted session through a stepflow workflow
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow definition JSON file
    definition_path: Option<String>,

    /// Use a built-in workflow instead of a definition file
    #[arg(short, long, value_enum)]
    preset: Option<PresetCli>,

    /// Optional path to a catalog JSON file with extra option lists
    #[arg(short, long)]
    catalog: Option<String>,

    /// Optional path to an operation script JSON file
    #[arg(short, long)]
    script: Option<String>,

    /// Path to a JSON array of service add-ons (booking workflows and quotes)
    #[arg(short, long)]
    options: Option<String>,

    /// Base price of the booked service; prints a quote for the selected add-ons
    #[arg(short, long)]
    base_price: Option<Decimal>,

    /// Optional path to a quote policy JSON file (deposit, escrowFraction)
    #[arg(long)]
    policy: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        exit_with_error(&e.to_string());
    }
}

fn run(cli: Cli) -> Result<()> {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let service_options = match &cli.options {
        Some(path) => read_service_options(path)?,
        None => Vec::new(),
    };
    let definition = load_definition(&cli, &service_options)?;
    println!(
        "Loaded workflow '{}' with {} steps (entry: {})",
        definition.name(),
        definition.step_count(),
        definition.entry_step_id()
    );

    // --- 2. Replay ---
    let engine = WorkflowEngine::new(definition);
    let script = match &cli.script {
        Some(path) => Script::from_file(path)?,
        None => {
            println!("No script provided. Showing the starting state only.");
            Script::default()
        }
    };

    let replay_start = Instant::now();
    let snapshots = script.replay(&engine)?;
    let replay_duration = replay_start.elapsed();

    println!("\n--- Session ---");
    for (i, state) in snapshots.iter().enumerate() {
        let label = match i {
            0 => "start".to_string(),
            _ => script.operations[i - 1].to_string(),
        };
        println!(
            "[{:>2}] {:<32} step={:<20} progress={:>5.1}% visited={}{}",
            i,
            label,
            state.current_step_id(),
            engine.progress(state) * 100.0,
            state.visited_step_ids().len(),
            if state.is_terminal() { " (terminal)" } else { "" }
        );
    }

    // --- 3. Submission ---
    let Some(last) = snapshots.last() else {
        return Ok(());
    };
    println!("\n--- Submission ---");
    let payload = match engine.assemble(last) {
        Ok(payload) => {
            println!("{}", payload.to_json_pretty()?);
            Some(payload)
        }
        Err(SubmissionError::WorkflowIncomplete) => {
            println!("Workflow not finished; stopped at '{}'.", last.current_step_id());
            for (step_id, complete) in engine.step_completion(last) {
                println!("  {:<24} {}", step_id, if complete { "complete" } else { "open" });
            }
            None
        }
        Err(e) => return Err(e.into()),
    };

    // --- 4. Quote ---
    if let Some(base_price) = cli.base_price {
        let policy = match &cli.policy {
            Some(path) => QuotePolicy::from_file(path)?,
            None => QuotePolicy::default(),
        };
        let selected = payload
            .as_ref()
            .and_then(|p| p.get(presets::ADD_ONS_FIELD))
            .and_then(Answer::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| stepflow::quote::default_selection(&service_options));

        let quote = compute_quote(base_price, &service_options, &selected, &policy)?;
        println!("\n--- Quote ---");
        println!("Base price:   {}", quote.base_price);
        println!("Add-ons:      [{}]", quote.selected_option_ids.join(", "));
        println!("Subtotal:     {}", quote.subtotal);
        println!("Deposit:      {}", quote.deposit);
        println!("Remaining:    {}", quote.remaining);
        println!("Escrow hold:  {}", quote.escrow_hold);
    }

    println!("\nReplay:  {:?}", replay_duration);
    println!("Total:   {:?}", total_start.elapsed());
    Ok(())
}

fn load_definition(cli: &Cli, service_options: &[ServiceOption]) -> Result<WorkflowDefinition> {
    let definition = match (&cli.definition_path, cli.preset) {
        (Some(path), _) => {
            let mut catalog = presets::catalog()?;
            if let Some(catalog_path) = &cli.catalog {
                let extra = fs::read_to_string(catalog_path).map_err(|e| {
                    format!("Failed to read catalog file '{}': {}", catalog_path, e)
                })?;
                catalog = catalog.merge(Catalog::from_json(&extra)?);
            }
            let raw = RawWorkflow::from_file(path)?;
            Loader::builder(raw).with_catalog(catalog).build().load()?
        }
        (None, Some(PresetCli::ClientSignup)) => presets::client_signup()?,
        (None, Some(PresetCli::ProfessionalOnboarding)) => presets::professional_onboarding()?,
        (None, Some(PresetCli::ProviderWizard)) => presets::provider_wizard()?,
        (None, Some(PresetCli::ServiceBooking)) => presets::service_booking(service_options)?,
        (None, None) => return Err("A definition path or --preset is required.".into()),
    };
    Ok(definition)
}

fn read_service_options(path: &str) -> Result<Vec<ServiceOption>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read options file '{}': {}", path, e))?;
    Ok(serde_json::from_str(&json)?)
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
