use chrono::Utc;
use clap::{Parser, Subcommand};
use nutri_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nutri")]
#[command(about = "Daily calorie and macro calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate daily calories and macros
    Calc {
        /// Height in centimeters
        #[arg(long, allow_negative_numbers = true)]
        height_cm: f64,

        /// Weight in kilograms
        #[arg(long, allow_negative_numbers = true)]
        weight_kg: f64,

        /// Age in years
        #[arg(long, allow_negative_numbers = true)]
        age_years: i64,

        /// "male" or "female" (anything else is treated as female)
        #[arg(long)]
        gender: String,

        /// sedentary, light, moderate, very or extra
        #[arg(long)]
        activity_level: String,

        /// Display name recorded with a saved entry
        #[arg(long, default_value = "")]
        name: String,

        /// Save this calculation to the entry store
        #[arg(long)]
        save: bool,
    },

    /// List saved entries, newest first (default)
    List {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export saved entries to CSV, newest first
    Export {
        /// Destination CSV file
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr; keep them quiet unless RUST_LOG asks otherwise
    nutri_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = JsonFileStore::new(config.entries_path(&data_dir));

    match cli.command {
        Some(Commands::Calc {
            height_cm,
            weight_kg,
            age_years,
            gender,
            activity_level,
            name,
            save,
        }) => {
            let input = CalculationInput {
                height_cm,
                weight_kg,
                age_years,
                gender,
                activity_level,
            };
            cmd_calc(&store, input, &name, save, &config)
        }
        Some(Commands::List { limit }) => cmd_list(&store, limit),
        Some(Commands::Export { output }) => cmd_export(&store, &output),
        None => cmd_list(&store, None),
    }
}

fn cmd_calc(
    store: &JsonFileStore,
    input: CalculationInput,
    name: &str,
    save: bool,
    config: &Config,
) -> Result<()> {
    warn_on_defaulted_input(&input);

    let result = calculate(&input);
    display_result(&input, &result);

    if save {
        let entry = Entry::with_default_name(
            name,
            &config.entries.default_name,
            input,
            result,
            Utc::now(),
        );
        store.append(&entry)?;
        tracing::info!("Saved entry for {} to {:?}", entry.name, store.path());
        println!("\n✓ Entry saved for {}", entry.name);
    }

    Ok(())
}

fn cmd_list(store: &JsonFileStore, limit: Option<usize>) -> Result<()> {
    let entries = store.list_sorted_descending()?;

    if entries.is_empty() {
        println!("No saved entries yet.");
        return Ok(());
    }

    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    println!("Saved entries ({} of {}), newest first:\n", shown, entries.len());

    for entry in entries.iter().take(shown) {
        println!(
            "  {}  {:<16} {:>5} kcal  P {:>4}g  F {:>4}g  C {:>4}g  ({}, {})",
            entry.timestamp.format("%Y-%m-%d %H:%M UTC"),
            entry.name,
            entry.results.calories,
            entry.results.protein_g,
            entry.results.fat_g,
            entry.results.carb_g,
            entry.inputs.gender,
            entry.inputs.activity_level,
        );
    }

    Ok(())
}

fn cmd_export(store: &JsonFileStore, output: &Path) -> Result<()> {
    let entries = store.list_sorted_descending()?;
    let count = entries_to_csv(&entries, output)?;

    println!("✓ Exported {} entries to CSV", count);
    println!("  CSV: {}", output.display());
    Ok(())
}

fn warn_on_defaulted_input(input: &CalculationInput) {
    let gender = input.gender.to_lowercase();
    if gender != "male" && gender != "female" {
        eprintln!(
            "Note: gender '{}' is not recognized, calculating as female.",
            input.gender
        );
    }

    if ActivityLevel::from_key(&input.activity_level).is_none() {
        let known: Vec<_> = ActivityLevel::ALL.iter().map(|l| l.key()).collect();
        eprintln!(
            "Note: unknown activity level '{}', using sedentary. Known levels: {}",
            input.activity_level,
            known.join(", ")
        );
    }
}

fn display_result(input: &CalculationInput, result: &CalculationResult) {
    let activity = input.activity();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  DAILY TARGET");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Calories: {} kcal/day", result.calories);
    println!(
        "  BMR: {} kcal × {} ({}: {})",
        result.bmr,
        result.activity_multiplier,
        activity.key(),
        activity.description()
    );
    println!();
    println!("  → Protein: {} g", result.protein_g);
    println!("  → Fat:     {} g", result.fat_g);
    println!("  → Carbs:   {} g", result.carb_g);
}
