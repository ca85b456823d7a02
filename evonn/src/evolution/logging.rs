use super::{EvolutionDriver, FitnessFunction};
use crate::Agent;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the champion of every pool.
    PoolChampions,
    /// Clones only the best agent ever seen.
    OverallChampion,
    /// Clones no agents.
    NoAgents,
}

/// A snapshot of a driver, taken between cycles.
#[derive(Clone, Debug)]
pub struct Log {
    pub cycle: usize,
    pub pool_count: usize,
    pub best_fitness: f64,
    pub cycle_sample: CycleSample,
    /// Named statistics over the pool champions.
    pub champion_stats: Vec<(String, Stats)>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tcycle: {}", self.cycle)?;
        writeln!(f, "\tpool_count: {}", self.pool_count)?;
        writeln!(f, "\tbest_fitness: {}", self.best_fitness)?;
        for (name, stats) in &self.champion_stats {
            writeln!(f, "\t{}: {:?}", name, stats)?;
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if it is empty.
    ///
    /// # Examples
    /// ```
    /// use evonn::logging::Stats;
    ///
    /// let stats = Stats::of([-2.0, -1.0, 0.5, 1.0, 1.5]).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert_eq!(Stats::of([4.0, 1.0, 3.0, 2.0]).unwrap().median, 2.5);
    /// assert!(Stats::of(std::iter::empty()).is_none());
    /// ```
    pub fn of(data: impl IntoIterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.into_iter().collect();
        if data.is_empty() {
            return None;
        }
        data.sort_by(f64::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f64>() / data.len() as f64,
            median,
        })
    }
}

/// A reporting-level dependant store of agents from a driver.
#[derive(Clone, Debug)]
pub enum CycleSample {
    /// The champion of each pool, in pool order.
    PoolChampions(Vec<Agent>),
    /// The best agent ever seen.
    OverallChampion(Agent),
    /// Empty.
    None,
}

/// A log of an evolution's progress over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of a driver, with statistics on the
    /// fitness, node count and link count of its pool champions.
    ///
    /// # Examples
    /// ```
    /// use evonn::logging::{EvolutionLogger, ReportingLevel};
    /// use evonn::{EvolutionConfig, EvolutionDriver};
    /// use evonn_nn::networks::Network;
    ///
    /// let config = EvolutionConfig {
    ///     num_generation_iterations: 2,
    ///     ..EvolutionConfig::new(1, 1)
    /// };
    /// let fitness = |n: &mut Network| n.compute_activation(&[0.5]).unwrap()[0];
    /// let mut driver = EvolutionDriver::new(config, fitness).unwrap();
    /// let mut logger = EvolutionLogger::new(ReportingLevel::NoAgents);
    ///
    /// driver.step_cycle().unwrap();
    /// logger.log(&driver);
    ///
    /// let names: Vec<&str> = logger.iter().next().unwrap()
    ///     .champion_stats.iter().map(|(name, _)| name.as_str()).collect();
    /// assert_eq!(names, ["fitness", "nodes", "links"]);
    /// ```
    pub fn log<F: FitnessFunction>(&mut self, driver: &EvolutionDriver<F>) {
        self.log_with(
            driver,
            &|a| {
                [
                    a.fitness(),
                    a.network().node_count() as f64,
                    a.network().link_count() as f64,
                ]
            },
            ["fitness", "nodes", "links"],
        )
    }

    /// Store a snapshot of a driver.
    ///
    /// The `champion_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the pool champions,
    /// where each statistic is named by `stat_names`.
    pub fn log_with<F, CSE, const N: usize>(
        &mut self,
        driver: &EvolutionDriver<F>,
        champion_stat_extractor: &CSE,
        stat_names: [&str; N],
    ) where
        F: FitnessFunction,
        CSE: Fn(&Agent) -> [f64; N],
    {
        let champions: Vec<&Agent> = driver.pools().iter().filter_map(|p| p.champion()).collect();
        let stats = stat_names
            .iter()
            .map(|name| name.to_string())
            .zip(unzip_n_vecs(champions.iter().map(|a| champion_stat_extractor(*a))))
            .filter_map(|(name, data)| Stats::of(data).map(|stats| (name, stats)))
            .collect();

        self.logs.push(Log {
            cycle: driver.cycle(),
            pool_count: driver.pools().len(),
            best_fitness: driver.best_fitness(),
            cycle_sample: match self.reporting_level {
                ReportingLevel::PoolChampions => {
                    CycleSample::PoolChampions(champions.into_iter().cloned().collect())
                }
                ReportingLevel::OverallChampion => match driver.leaderboard().best() {
                    Some(best) => CycleSample::OverallChampion(best.clone()),
                    None => CycleSample::None,
                },
                ReportingLevel::NoAgents => CycleSample::None,
            },
            champion_stats: stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> Option<&Log> {
        self.logs.last()
    }
}

fn unzip_n_vecs<T: Clone, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs = vec![Vec::default(); N];
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}
