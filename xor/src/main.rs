use evonn::logging::{EvolutionLogger, ReportingLevel, Stats};
use evonn::{EvolutionConfig, EvolutionDriver, EvolutionError};
use evonn_nn::io;
use evonn_nn::mutation::{MutationConfig, MutationWeights, WeightMutationBreadth};
use evonn_nn::networks::Network;

use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use std::env;
use std::error::Error;
use std::fs;

const ERROR_MARGIN: f64 = 0.3;
const CHAMPIONS_FILE: &str = "xor_champions.txt";

/// Scores in `[0, 1]`, reaching 1 once every case is
/// within the error margin.
fn evaluate_xor(network: &mut Network) -> f64 {
    let values = [
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ];

    let mut errors = [0.0; 4];
    for (i, (input, output)) in values.iter().enumerate() {
        network.reset_state();
        errors[i] = match network.compute_activation(input) {
            Ok(outputs) => (outputs[0] - output).abs(),
            Err(_) => return 0.0,
        };
        if errors[i] < ERROR_MARGIN {
            errors[i] = 0.0;
        }
    }

    (4.0 - errors.iter().sum::<f64>()).powi(2) / 16.0
}

fn default_config() -> EvolutionConfig {
    EvolutionConfig {
        desired_fitness: 1.0,
        max_pool_count: 60,
        best_agent_count: 10,
        pool_size: 30,
        next_gen_num_to_preserve: 4,
        next_gen_num_to_breed: 18,
        next_gen_num_to_mutate_simple: 8,
        num_new_pools_to_create: 6,
        num_generation_iterations: 25,
        mutation_weights: MutationWeights {
            add_link: 20,
            add_node: 15,
            delete_link: 5,
            delete_node: 5,
            ..MutationWeights::default()
        },
        mutation: MutationConfig {
            weight_mutation_breadth: WeightMutationBreadth::SingleLink,
            weight_reset_chance: 0.2,
            weight_mutation_power: 2.5,
            weight_bound: 8.0,
            allow_recurrent_links: false,
        },
        parallel_evaluation: true,
        max_cycles: Some(200),
        ..EvolutionConfig::new(2, 1)
    }
}

/// Usage: `xor [--stress] [CONFIG.ron]`
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut stress = false;
    let mut config = default_config();
    for arg in env::args().skip(1) {
        if arg == "--stress" {
            stress = true;
        } else {
            config = ron::from_str(&fs::read_to_string(&arg)?)?;
            info!(path = %arg, "loaded configuration");
        }
    }

    if stress {
        stress_test(&config)
    } else {
        single_run(config)
    }
}

fn single_run(config: EvolutionConfig) -> Result<(), Box<dyn Error>> {
    let max_cycles = config.max_cycles;
    let desired_fitness = config.desired_fitness;
    let mut driver = EvolutionDriver::new(config, evaluate_xor)?;
    let mut logger = EvolutionLogger::new(ReportingLevel::NoAgents);

    while driver.best_fitness() < desired_fitness
        && max_cycles.map_or(true, |max| driver.cycle() < max)
    {
        driver.step_cycle()?;
        logger.log(&driver);
    }
    if let Some(log) = logger.latest() {
        println!("{}", log);
    }

    match driver.leaderboard().best() {
        Some(champion) if champion.fitness() >= desired_fitness => {
            println!("Solved after {} cycles: {}", driver.cycle(), champion);
        }
        Some(champion) => warn!(best = %champion, "no solution found"),
        None => warn!("nothing was evaluated"),
    }

    io::save_to_file(
        CHAMPIONS_FILE,
        driver.best_agents().iter().map(|agent| agent.network()),
    )?;
    info!(
        path = CHAMPIONS_FILE,
        count = driver.best_agents().len(),
        "saved best networks"
    );
    Ok(())
}

/// Repeats seeded runs and reports how many cycles solving took.
fn stress_test(config: &EvolutionConfig) -> Result<(), Box<dyn Error>> {
    const ITERATIONS: u64 = 100;

    let cycles = (0..ITERATIONS)
        .into_par_iter()
        .map(|seed| {
            let config = EvolutionConfig {
                seed: Some(seed),
                parallel_evaluation: false,
                ..config.clone()
            };
            let summary = EvolutionDriver::new(config, evaluate_xor)?.run()?;
            Ok(summary.reached_target.then(|| summary.cycles))
        })
        .collect::<Result<Vec<Option<usize>>, EvolutionError>>()?;

    println!(
        "Successful run cycle count {:?}, {}% failure rate over {} iterations",
        Stats::of(cycles.iter().flatten().map(|c| *c as f64)),
        cycles.iter().filter(|c| c.is_none()).count() as f64 * 100.0 / ITERATIONS as f64,
        ITERATIONS
    );
    Ok(())
}
