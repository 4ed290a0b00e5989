//! Climind CLI - Reshape and summarise indicator sheets per country
//!
//! # Main Commands
//!
//! ```bash
//! climind run                          # Full analysis with the default config
//! climind run --config analysis.json   # Full analysis with a config file
//! climind run --save --export out/     # Also write charts and tables
//! ```
//!
//! # Utility Commands
//!
//! ```bash
//! climind countries                    # Print the country code mapping
//! climind clean gdp.csv --countries GBR,CHN --from 1970 --to 2020
//! climind example-config               # Print the default config as JSON
//! ```

use clap::{Parser, Subcommand};
use climind::{
    clean_indicator, load_indicator, print_country_mapping, run, write_csv, write_sheet, AnalysisConfig, RunOptions,
    YearBounds, YearIndexed,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "climind")]
#[command(about = "Reshape and summarise climate indicator sheets per country", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis pipeline
    Run {
        /// Config JSON file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the indicator sheets
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory chart files are written to
        #[arg(long)]
        plots_dir: Option<PathBuf>,

        /// Save chart data files
        #[arg(short, long)]
        save: bool,

        /// Export cleaned and per-country tables to this directory
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Print the country code/name mapping
    Countries {
        /// Config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Select countries from one sheet and reshape it to a year index
    Clean {
        /// Input indicator sheet
        input: PathBuf,

        /// Country codes, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        countries: Vec<String>,

        /// First year kept
        #[arg(long, default_value = "1970")]
        from: i32,

        /// Last year kept
        #[arg(long, default_value = "2020")]
        to: i32,

        /// Row holding the column header
        #[arg(long, default_value_t = climind::HEADER_ROW)]
        header_row: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the default analysis config
    ExampleConfig,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            data_dir,
            plots_dir,
            save,
            export,
        } => cmd_run(config.as_deref(), data_dir, plots_dir, save, export),

        Commands::Countries { config } => cmd_countries(config.as_deref()),

        Commands::Clean {
            input,
            countries,
            from,
            to,
            header_row,
            output,
        } => cmd_clean(&input, &countries, from, to, header_row, output.as_deref()),

        Commands::ExampleConfig => cmd_example_config(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Config file (or defaults) with environment overrides applied.
fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => {
            eprintln!("⚙️  Config: {}", p.display());
            AnalysisConfig::from_file(p)?
        }
        None => AnalysisConfig::default(),
    };
    Ok(config.apply_env())
}

fn cmd_run(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
    plots_dir: Option<PathBuf>,
    save: bool,
    export: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = plots_dir {
        config.plots_dir = dir;
    }

    eprintln!("📂 Data: {}", config.data_dir.display());

    let options = RunOptions {
        save_charts: save,
        export_dir: export,
    };
    let result = run(&config, &options)?;

    eprintln!(
        "\n✨ {} indicators, {} countries, {} charts",
        result.cleaned.len(),
        result.countries.len(),
        result.charts.len()
    );
    Ok(())
}

fn cmd_countries(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    print_country_mapping(&config.countries);
    Ok(())
}

fn cmd_clean(
    input: &Path,
    countries: &[String],
    from: i32,
    to: i32,
    header_row: usize,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Cleaning: {}", input.display());

    let parsed = load_indicator(input)?;
    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(parsed.delimiter));
    eprintln!("   Rows: {}", parsed.table.len());

    let bounds = YearBounds::new(from, to)?;
    let table = clean_indicator(&parsed.table, countries, bounds, header_row)?;
    eprintln!("✅ {} years × {} countries", table.len(), table.columns().len());

    let sheet = table.to_sheet();
    match output {
        Some(p) => {
            write_csv(p, &sheet)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => write_sheet(std::io::stdout().lock(), &sheet)?,
    }
    Ok(())
}

fn cmd_example_config() -> Result<(), Box<dyn std::error::Error>> {
    let json = AnalysisConfig::default().to_json()?;
    println!("{}", json);
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
