//! TrendWatch CLI — watch, advise, and replay commands.
//!
//! Commands:
//! - `watch` — run a monitoring session over a CSV file or a synthetic feed,
//!   appending decided cycles to a JSONL record file
//! - `advise` — stream a CSV through the engine once and print the final
//!   snapshot and recommendation
//! - `replay` — replay one or more CSV files through the RSI reversion
//!   strategy, in parallel when several are given

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trendwatch_core::{CycleOutput, TrendEngine};
use trendwatch_monitor::{
    admissible, run_replay, run_replay_many, CsvPriceSource, CycleEvent, JsonlSink, MonitorConfig,
    MonitorSession, PriceSource, SessionSummary, StdoutSink, SyntheticPriceSource, TrendSink,
};

#[derive(Parser)]
#[command(
    name = "trendwatch",
    about = "TrendWatch CLI — technical indicator trend monitor"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a monitoring session and record decided cycles as JSON lines.
    Watch {
        /// Path to a TOML config file. Built-in defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV price file to monitor.
        #[arg(long)]
        input: Option<PathBuf>,

        /// CSV column to read prices from.
        #[arg(long, default_value = "price")]
        column: String,

        /// Use a seeded synthetic price feed instead of a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic feed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of synthetic prices to emit.
        #[arg(long, default_value_t = 250)]
        cycles: usize,

        /// Record file (JSON lines). Records print to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Sleep poll_interval_secs between cycles and error_backoff_secs
        /// after a failed fetch.
        #[arg(long, default_value_t = false)]
        paced: bool,
    },
    /// Stream a CSV through the engine once and print the recommendation.
    Advise {
        /// CSV price file.
        input: PathBuf,

        /// Path to a TOML config file. Built-in defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV column to read prices from.
        #[arg(long, default_value = "price")]
        column: String,

        /// Print the final cycle output as JSON instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay price files through the RSI reversion strategy.
    Replay {
        /// CSV price files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// CSV column to read prices from.
        #[arg(long, default_value = "price")]
        column: String,

        /// RSI period for the entry/exit rule.
        #[arg(long, default_value_t = 14)]
        rsi_period: usize,
    },
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            config,
            input,
            column,
            synthetic,
            seed,
            cycles,
            out,
            paced,
        } => run_watch(config, input, &column, synthetic, seed, cycles, out, paced),
        Commands::Advise {
            input,
            config,
            column,
            json,
        } => run_advise(&input, config, &column, json),
        Commands::Replay {
            inputs,
            column,
            rsi_period,
        } => run_replay_cmd(&inputs, &column, rsi_period),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<MonitorConfig> {
    match path {
        Some(p) => Ok(MonitorConfig::from_file(&p)?),
        None => Ok(MonitorConfig::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_watch(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    column: &str,
    synthetic: bool,
    seed: u64,
    cycles: usize,
    out: Option<PathBuf>,
    paced: bool,
) -> Result<()> {
    // Validate mutually exclusive options
    if input.is_some() && synthetic {
        bail!("--input and --synthetic are mutually exclusive");
    }
    let config = load_config(config_path)?;

    let source: Box<dyn PriceSource> = match input {
        Some(path) => Box::new(CsvPriceSource::open(&path, column)?),
        None if synthetic => Box::new(SyntheticPriceSource::new(seed, cycles)),
        None => bail!("one of --input or --synthetic is required"),
    };
    let sink: Box<dyn TrendSink> = match &out {
        Some(path) => Box::new(JsonlSink::new(path.clone())),
        None => Box::new(StdoutSink::new()),
    };

    let mut session = MonitorSession::new(&config, source, sink)?;

    if paced {
        let poll_interval = Duration::from_secs(config.monitor.poll_interval_secs);
        let backoff = Duration::from_secs(config.monitor.error_backoff_secs);
        loop {
            match session.run_cycle() {
                CycleEvent::Exhausted => break,
                CycleEvent::SkippedFetch(_) => std::thread::sleep(backoff),
                _ => std::thread::sleep(poll_interval),
            }
        }
    } else {
        session.run_to_exhaustion();
    }

    print_watch_summary(&config, session.session_id(), &session.summary(), out.as_deref());
    Ok(())
}

fn run_advise(input: &Path, config_path: Option<PathBuf>, column: &str, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    config.validate()?;
    let mut engine = TrendEngine::new(&config.engine_config())?;
    let mut source = CsvPriceSource::open(input, column)?;

    let mut last = None;
    while let Some(price) = source.poll()? {
        if !admissible(price) {
            bail!("row {}: inadmissible price {price}", source.rows_read());
        }
        last = Some(engine.observe(price));
    }
    let Some(output) = last else {
        bail!("no prices in {}", input.display());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_advice(&config, &output, source.rows_read());
    Ok(())
}

fn run_replay_cmd(inputs: &[PathBuf], column: &str, rsi_period: usize) -> Result<()> {
    let reports = if inputs.len() > 1 {
        run_replay_many(inputs, column, rsi_period)
    } else {
        vec![run_replay(&inputs[0], column, rsi_period)]
    };

    println!();
    println!("=== RSI Strategy Replay (period {rsi_period}) ===");
    let mut failures = 0usize;
    for (path, report) in inputs.iter().zip(&reports) {
        match report {
            Ok(r) => {
                let win_rate = r
                    .result
                    .win_rate
                    .map(|w| format!("{:.1}%", w * 100.0))
                    .unwrap_or_else(|| "n/a".into());
                println!(
                    "{:<32} {:>6} samples {:>4} trades  return {:>9.2}  win rate {:>6}",
                    r.path.display(),
                    r.samples,
                    r.result.trade_count,
                    r.result.total_return,
                    win_rate
                );
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error for {}: {e}", path.display());
            }
        }
    }
    println!();

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_watch_summary(
    config: &MonitorConfig,
    session_id: &str,
    summary: &SessionSummary,
    out: Option<&Path>,
) {
    println!();
    println!("=== Session Summary ===");
    println!("Symbol:          {}", config.monitor.symbol);
    println!("Session:         {session_id}");
    println!("Policy:          {:?}", config.fusion.policy);
    println!("Cycles:          {}", summary.cycles);
    println!("Decisions:       {}", summary.decisions);
    println!("Records written: {}", summary.records_written);
    println!("Skipped fetches: {}", summary.skipped_fetches);
    match out {
        Some(path) => println!("Record file:     {}", path.display()),
        None => println!("Record file:     (stdout)"),
    }
    if let Some(last) = &summary.last {
        println!();
        println!("--- Last Cycle ---");
        println!("Price:           {:.2}", last.price);
        match last.decision.action() {
            Some(action) => println!("Action:          {action}"),
            None => println!("Action:          (insufficient data)"),
        }
    }
    println!();
}

fn print_advice(config: &MonitorConfig, output: &CycleOutput, samples: u64) {
    println!();
    println!("=== Trend Advice ===");
    println!("Symbol:          {}", config.monitor.symbol);
    println!("Policy:          {:?}", config.fusion.policy);
    println!("Samples:         {samples}");
    println!("Price:           {:.2}", output.price);
    println!();
    println!("--- Indicators ---");
    match output.snapshot.rsi {
        Some(v) => println!("RSI:             {v:.2}"),
        None => println!("RSI:             (warming up)"),
    }
    match output.snapshot.macd {
        Some(m) => {
            println!("MACD line:       {:.4}", m.line);
            println!("MACD signal:     {:.4}", m.signal);
            println!("MACD histogram:  {:.4}", m.histogram);
        }
        None => println!("MACD:            (warming up)"),
    }
    match output.snapshot.bollinger {
        Some(b) => {
            println!("Bollinger upper: {:.4}", b.upper);
            println!("Bollinger mid:   {:.4}", b.middle);
            println!("Bollinger lower: {:.4}", b.lower);
        }
        None => println!("Bollinger:       (warming up)"),
    }
    match output.snapshot.stochastic {
        Some(s) => {
            println!("Stochastic %K:   {:.2}", s.percent_k);
            println!("Stochastic %D:   {:.2}", s.percent_d);
        }
        None => println!("Stochastic:      (warming up)"),
    }
    match output.snapshot.sma {
        Some(v) => println!("SMA:             {v:.2}"),
        None => println!("SMA:             (warming up)"),
    }
    println!();
    match output.decision.action() {
        Some(action) => {
            println!("Recommendation:  {}", action.to_string().to_uppercase());
        }
        None => println!("Recommendation:  insufficient data (keep collecting)"),
    }
    println!();
}
