use anyhow::{bail, Context, Result};
use cardwise_core::{
    evaluate_portfolio, find_best_portfolio, flat_rebates_disabled, Card, Category, Rebate,
    RebateUsage, SearchConfig, SpendingProfile,
};
use cardwise_ingest::{
    annualized_spending, convert_catalog_file, load_catalog, load_spending_csv, parse_assignments,
    parse_statement_csv, MONTHLY_DEFAULTS,
};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

mod config;
mod report;
mod state;
mod telemetry;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "cardwise",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARDWISE_BUILD_SHA"), ")"),
    about = "Find the credit card portfolio with the highest net annual value"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog for the best portfolio
    Optimize {
        #[command(flatten)]
        inputs: InputArgs,

        /// Prefilter the catalog to this many cards (default from config: 16)
        #[arg(long, conflicts_with = "no_prefilter")]
        max_cards: Option<usize>,

        /// Search the whole catalog without prefiltering
        #[arg(long)]
        no_prefilter: bool,

        /// Largest portfolio to consider (default from config: 4)
        #[arg(long, conflicts_with = "no_size_limit")]
        max_size: Option<usize>,

        /// Allow portfolios of any size
        #[arg(long)]
        no_size_limit: bool,

        /// Give flat rebates no credit (category rebates still apply)
        #[arg(long)]
        ignore_rebates: bool,

        /// Reserved: sign-up offers are not modeled separately yet, so this
        /// currently has no effect
        #[arg(long)]
        ignore_offers: bool,
    },

    /// Evaluate a fixed set of cards
    Evaluate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Card names, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        cards: Vec<String>,

        /// Give flat rebates no credit (category rebates still apply)
        #[arg(long)]
        ignore_rebates: bool,
    },

    /// Inspect or toggle flat rebates
    Rebates {
        #[command(subcommand)]
        command: RebatesCommand,
    },

    /// Convert a raw issuer catalog into the engine schema
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },

    /// Manage ~/.cardwise/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RebatesCommand {
    /// List every rebate in the catalog with its toggle state
    List {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Turn a flat rebate on or off
    Toggle {
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        card: String,
        #[arg(long)]
        index: usize,
        #[arg(long, conflicts_with = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

/// Catalog and spending inputs shared by optimize/evaluate.
#[derive(Args, Debug)]
struct InputArgs {
    /// Card catalog JSON (default from config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Monthly spending as a category,amount CSV
    #[arg(long)]
    spending_csv: Option<PathBuf>,

    /// Derive annual spending from a statement CSV export
    #[arg(long)]
    statement: Option<PathBuf>,

    /// Monthly spending override, e.g. --monthly dining=400 (repeatable)
    #[arg(long = "monthly", value_name = "CATEGORY=AMOUNT")]
    monthly: Vec<String>,

    /// Print a JSON report instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    telemetry::init(&cfg.logging)?;

    match cli.command {
        Command::Optimize {
            inputs,
            max_cards,
            no_prefilter,
            max_size,
            no_size_limit,
            ignore_rebates,
            ignore_offers,
        } => {
            let mut search = cfg.search;
            if no_prefilter {
                search.max_cards_to_consider = None;
            } else if max_cards.is_some() {
                search.max_cards_to_consider = max_cards;
            }
            if no_size_limit {
                search.max_portfolio_size = None;
            } else if max_size.is_some() {
                search.max_portfolio_size = max_size;
            }
            search.include_rebates &= !ignore_rebates;
            search.include_offers &= !ignore_offers;
            optimize(&cfg, &inputs, &search)?;
        }

        Command::Evaluate { inputs, cards, ignore_rebates } => {
            evaluate(&cfg, &inputs, &cards, cfg.search.include_rebates && !ignore_rebates)?;
        }

        Command::Rebates { command } => match command {
            RebatesCommand::List { catalog } => list_rebates(&cfg, catalog)?,
            RebatesCommand::Toggle { catalog, card, index, on, off } => {
                if !on && !off {
                    bail!("pass --on or --off");
                }
                toggle_rebate(&cfg, catalog, &card, index, on)?;
            }
        },

        Command::Convert { input, output } => {
            let n = convert_catalog_file(&input, &output)?;
            println!("Wrote {} cards to {}", n, output.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn catalog_path(cfg: &Config, catalog: Option<PathBuf>) -> PathBuf {
    catalog.unwrap_or_else(|| cfg.paths.catalog.clone())
}

fn load_inputs(cfg: &Config, inputs: &InputArgs) -> Result<(Vec<Card>, SpendingProfile)> {
    let path = catalog_path(cfg, inputs.catalog.clone());
    if !path.exists() {
        bail!("Catalog not found: {} (pass --catalog <path>)", path.display());
    }
    let catalog = load_catalog(&path)?;
    let spending = build_spending(inputs)?;
    Ok((catalog, spending))
}

/// Annual spending from the statement (if any) or the monthly defaults, then
/// monthly overrides from the CSV and `--monthly`, annualized.
fn build_spending(inputs: &InputArgs) -> Result<SpendingProfile> {
    let mut annual: BTreeMap<Category, f64> = match &inputs.statement {
        Some(p) => {
            let txns = parse_statement_csv(p).with_context(|| format!("parsing {}", p.display()))?;
            tracing::info!(transactions = txns.len(), "derived spending from statement");
            annualized_spending(&txns)
        }
        None => MONTHLY_DEFAULTS.iter().map(|(c, v)| (*c, v * 12.0)).collect(),
    };

    let mut monthly = BTreeMap::new();
    if let Some(p) = &inputs.spending_csv {
        monthly.extend(load_spending_csv(p)?);
    }
    monthly.extend(parse_assignments(&inputs.monthly)?);

    for (category, amount) in monthly {
        annual.insert(category, amount * 12.0);
    }
    Ok(SpendingProfile::new(annual)?)
}

/// Toggles the evaluation actually ran with: the stored ones, or every flat
/// rebate off when rebates are ignored.
fn effective_usage(stored: RebateUsage, cards: &[&Card], include_rebates: bool) -> RebateUsage {
    if include_rebates { stored } else { flat_rebates_disabled(cards) }
}

fn optimize(cfg: &Config, inputs: &InputArgs, search: &SearchConfig) -> Result<()> {
    let (catalog, spending) = load_inputs(cfg, inputs)?;
    let usage = state::read_rebate_usage(&state::rebate_usage_path()?)?;

    let outcome = find_best_portfolio(&catalog, &spending, &usage, search)?;

    let cards: Vec<&Card> = outcome
        .portfolio
        .iter()
        .filter_map(|name| catalog.iter().find(|c| &c.name == name))
        .collect();
    let usage = effective_usage(usage, &cards, search.include_rebates);
    let rows = report::rebate_rows(&cards, &outcome.evaluation, &usage);

    if inputs.json {
        let out = report::JsonReport {
            generated_at: chrono::Utc::now(),
            config: Some(search),
            portfolio: &outcome.portfolio,
            evaluation: &outcome.evaluation,
            candidates_considered: Some(outcome.candidates_considered),
            portfolios_evaluated: Some(outcome.portfolios_evaluated),
            elapsed_ms: Some(outcome.elapsed.as_millis()),
            rebates: rows,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        report::print_search(&outcome, &rows);
    }
    Ok(())
}

fn evaluate(cfg: &Config, inputs: &InputArgs, names: &[String], include_rebates: bool) -> Result<()> {
    let (catalog, spending) = load_inputs(cfg, inputs)?;

    let mut cards: Vec<&Card> = Vec::new();
    for name in names {
        let name = name.trim();
        let Some(card) = catalog.iter().find(|c| c.name == name) else {
            bail!("no card named '{}' in the catalog", name);
        };
        if !cards.iter().any(|c| c.name == card.name) {
            cards.push(card);
        }
    }

    let stored = state::read_rebate_usage(&state::rebate_usage_path()?)?;
    let usage = effective_usage(stored, &cards, include_rebates);
    let evaluation = evaluate_portfolio(&cards, &spending, &usage);
    let portfolio: Vec<String> = cards.iter().map(|c| c.name.clone()).collect();
    let rows = report::rebate_rows(&cards, &evaluation, &usage);

    if inputs.json {
        let out = report::JsonReport {
            generated_at: chrono::Utc::now(),
            config: None,
            portfolio: &portfolio,
            evaluation: &evaluation,
            candidates_considered: None,
            portfolios_evaluated: None,
            elapsed_ms: None,
            rebates: rows,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        report::print_evaluation(&portfolio, &evaluation, &rows);
    }
    Ok(())
}

fn list_rebates(cfg: &Config, catalog: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(catalog_path(cfg, catalog))?;
    let usage = state::read_rebate_usage(&state::rebate_usage_path()?)?;

    for card in &catalog {
        for (index, rebate) in card.rebates.iter().enumerate() {
            let state = match rebate {
                Rebate::Category { category, .. } => format!("category:{category}"),
                Rebate::Flat { .. } if usage.is_used(&card.name, index) => "on".to_string(),
                Rebate::Flat { .. } => "off".to_string(),
            };
            println!(
                "{} #{} | {} | ${:.2} | {}",
                card.name,
                index,
                rebate.description(),
                rebate.amount(),
                state
            );
        }
    }
    Ok(())
}

fn toggle_rebate(cfg: &Config, catalog: Option<PathBuf>, card: &str, index: usize, on: bool) -> Result<()> {
    let catalog = load_catalog(catalog_path(cfg, catalog))?;
    let Some(found) = catalog.iter().find(|c| c.name == card) else {
        bail!("no card named '{}' in the catalog", card);
    };
    match found.rebates.get(index) {
        None => bail!("{} has no rebate #{} ({} rebates)", card, index, found.rebates.len()),
        Some(Rebate::Category { .. }) => {
            bail!("{} rebate #{} is a category rebate; those always apply", card, index)
        }
        Some(Rebate::Flat { .. }) => {}
    }

    let path = state::rebate_usage_path()?;
    let mut usage = state::read_rebate_usage(&path)?;
    usage.set(card, index, on);
    state::write_rebate_usage(&path, &usage)?;

    println!("{} rebate #{} is now {}", card, index, if on { "on" } else { "off" });
    Ok(())
}
