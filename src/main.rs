use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use qspec::{
    classical::{self, format_assignment},
    construct_circuit, CheckerConfig, QuantumChecker, Specification,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    Classical,
    Quantum,
    Both,
}

#[derive(Parser)]
#[command(name = "qspec")]
#[command(about = "Check whether a set of 0/1/x terms has a common satisfying assignment")]
struct Args {
    /// Terms such as 0x1 00x, one function oracle per term
    terms: Vec<String>,

    /// Number of variables, defaults to the length of the first term
    #[arg(short = 'n', long)]
    var_count: Option<usize>,

    /// JSON list of systems: [{"terms": [...], "var_count": n, "function_count": m}]
    #[arg(short, long, conflicts_with = "terms")]
    file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Engine::Both)]
    engine: Engine,

    /// Estimate probabilities from sampled shots instead of the exact state vector
    #[arg(long)]
    sample: bool,

    /// Shots per circuit when sampling [default: 1024]
    #[arg(long, requires = "sample")]
    shots: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Statistic threshold above which a system is consistent
    #[arg(long, default_value_t = 0.0)]
    epsilon: f64,

    /// Print the constructed circuit as OpenQASM 3
    #[arg(long)]
    qasm: bool,
}

fn load_systems(args: &Args) -> anyhow::Result<Vec<Specification>> {
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()));
    }

    let Some(first) = args.terms.first() else {
        bail!("no terms given, pass terms or --file");
    };
    let var_count = args.var_count.unwrap_or(first.chars().count());
    Ok(vec![Specification::from_terms(var_count, &args.terms)?])
}

fn checker_config(args: &Args) -> CheckerConfig {
    let mut config = CheckerConfig::default().with_epsilon(args.epsilon);
    if let Some(shots) = args.shots {
        config = config.with_shots(shots);
    }
    match args.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    let systems = load_systems(&args)?;

    let config = checker_config(&args);
    let mut exact = QuantumChecker::exact(config.clone());
    let mut sampling = QuantumChecker::sampling(config);

    for spec in &systems {
        let terms = spec.terms().iter().map(ToString::to_string).collect::<Vec<_>>();
        println!("System {terms:?} ({} variables)", spec.variable_count());

        let mut classical_verdict = None;
        if args.engine != Engine::Quantum {
            let result = classical::enumerate(spec);
            classical_verdict = Some(result.witness.is_some());
            match &result.witness {
                Some(witness) => println!(
                    "  classical: consistent, witness {} after {} assignments",
                    format_assignment(witness),
                    result.assignments_visited
                ),
                None => println!(
                    "  classical: inconsistent, {} assignments checked",
                    result.assignments_visited
                ),
            }
        }

        if args.engine != Engine::Classical {
            let (verdict, source) = if args.sample {
                let shots = sampling.config().shots;
                (sampling.check(spec)?, format!("{shots} shots"))
            } else {
                (exact.check(spec)?, "exact".to_string())
            };
            println!(
                "  quantum ({source}): {}, C={:.6} (P_0011={:.6}, P_1100={:.6})",
                if verdict.consistent { "consistent" } else { "inconsistent" },
                verdict.statistic,
                verdict.probabilities[0],
                verdict.probabilities[1]
            );

            if classical_verdict.is_some_and(|consistent| consistent != verdict.consistent) {
                log::warn!(
                    "quantum verdict ({source}) disagrees with the classical one, \
                     rare witnesses need more shots or exact probabilities"
                );
            }
        }

        if args.qasm {
            print!("{}", construct_circuit(spec)?);
        }
    }

    Ok(())
}
