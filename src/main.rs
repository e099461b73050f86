use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_dispatch::config::DispatchConfig;
use u_dispatch::generate::{generate_instance, GeneratorSettings};
use u_dispatch::io::{
    read_distance_matrix, read_orders, write_distance_matrix, write_orders, write_schedule,
};
use u_dispatch::models::WeeklyPlan;
use u_dispatch::planner::{plan_week, PlanOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds the weekly delivery schedule from orders and distances
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },
    /// Writes a synthetic orders.csv and distances.csv
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Orders table (ORDERID, TOZIP, CUBE, DayOfWeek)
    #[arg(long, default_value = "data/orders.csv")]
    orders: PathBuf,

    /// Square distance table keyed by location code
    #[arg(long, default_value = "data/distances.csv")]
    distances: PathBuf,

    /// JSON file overriding regulatory parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Depot location code (defaults to the order table's depot row)
    #[arg(long)]
    depot: Option<usize>,

    /// Schedule CSV to write
    #[arg(short, long, default_value = "results/final_schedule.csv")]
    output: PathBuf,

    /// Also write the full plan as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Solve the days concurrently
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of customers
    #[arg(short, long, default_value_t = 40)]
    customers: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Depot location code
    #[arg(long, default_value_t = 1000)]
    depot: usize,

    /// Directory receiving orders.csv and distances.csv
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Plan { args } => run_plan(args),
        Commands::Generate { args } => run_generate(args),
    }
}

fn run_plan(args: PlanArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            DispatchConfig::from_json_reader(BufReader::new(file))
                .with_context(|| format!("reading {}", path.display()))?
        }
        None => DispatchConfig::default(),
    };

    let file = File::open(&args.orders)
        .with_context(|| format!("opening {}", args.orders.display()))?;
    let book = read_orders(BufReader::new(file))
        .with_context(|| format!("reading {}", args.orders.display()))?;

    let file = File::open(&args.distances)
        .with_context(|| format!("opening {}", args.distances.display()))?;
    let matrix = read_distance_matrix(BufReader::new(file))
        .with_context(|| format!("reading {}", args.distances.display()))?;

    let depot = config.resolve_depot_code(args.depot, book.depot_code);
    info!(depot, "depot resolved");

    let plan = plan_week(
        &book.orders,
        &matrix,
        &config,
        PlanOptions {
            parallel: args.parallel,
        },
    )?;

    print_summary(&plan);

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_schedule(BufWriter::new(file), &plan, &config)?;
    println!("\nSchedule written to {}", args.output.display());

    if let Some(path) = &args.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &plan)?;
        println!("Plan written to {}", path.display());
    }

    Ok(())
}

fn print_summary(plan: &WeeklyPlan) {
    let rule = "=".repeat(65);
    println!("\n{rule}");
    println!(
        "{:<5} | {:<6} | {:<10} | {:<12} | {:<8}",
        "DAY", "ROUTES", "MILES", "HOURS (Duty)", "SLEEPERS"
    );
    println!("{}", "-".repeat(65));
    for day in plan.days.iter().filter(|d| d.num_routes() > 0) {
        let totals = day.totals();
        println!(
            "{:<5} | {:<6} | {:<10.2} | {:<12.2} | {}",
            day.day.as_str(),
            totals.num_routes,
            totals.total_distance,
            totals.duty_hours,
            totals.overnight_rests
        );
    }
    println!("{rule}");

    let week = plan.weekly_totals();
    let year = plan.annual_estimate();
    println!("\nWeekly distance: {:.2}", week.total_distance);
    println!("Annual estimate: {:.2}", year.total_distance);
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let settings = GeneratorSettings {
        customers: args.customers,
        depot_code: args.depot,
        ..GeneratorSettings::default()
    };
    let instance = generate_instance(&settings, args.seed);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let orders_path = args.out_dir.join("orders.csv");
    let file = File::create(&orders_path)
        .with_context(|| format!("creating {}", orders_path.display()))?;
    write_orders(BufWriter::new(file), &instance.orders, instance.depot_code)?;

    let distances_path = args.out_dir.join("distances.csv");
    let file = File::create(&distances_path)
        .with_context(|| format!("creating {}", distances_path.display()))?;
    write_distance_matrix(BufWriter::new(file), &instance.distances)?;

    info!(
        customers = args.customers,
        orders = instance.orders.len(),
        dir = %args.out_dir.display(),
        "instance generated"
    );
    Ok(())
}
