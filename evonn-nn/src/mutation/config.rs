use rand::Rng;
use serde::{Deserialize, Serialize};

/// How many links a single weight mutation touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightMutationBreadth {
    /// One uniformly chosen link.
    SingleLink,
    /// Every link in the network.
    AllLinks,
}

/// Configuration for the mutation operators.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0].
/// [`validate`](MutationConfig::validate) checks this.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Links touched by a weight mutation.
    pub weight_mutation_breadth: WeightMutationBreadth,
    /// Chance that a touched link's weight is redrawn from
    /// `[-1, 1)` instead of being nudged.
    pub weight_reset_chance: f64,
    /// Nudges are drawn uniformly from
    /// `[-weight_mutation_power, weight_mutation_power)`.
    pub weight_mutation_power: f64,
    /// Maximum magnitude of a nudged weight.
    pub weight_bound: f64,
    /// Whether new links may close a directed cycle.
    pub allow_recurrent_links: bool,
}

impl MutationConfig {
    /// Returns a "zero-valued" configuration: weight
    /// mutations touch a single link and change nothing,
    /// and new links never close cycles.
    ///
    /// Meant as a starting point for setting only the
    /// fields a caller cares about.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::mutation::MutationConfig;
    ///
    /// let config = MutationConfig {
    ///     weight_reset_chance: 1.0,
    ///     ..MutationConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub const fn zero() -> MutationConfig {
        MutationConfig {
            weight_mutation_breadth: WeightMutationBreadth::SingleLink,
            weight_reset_chance: 0.0,
            weight_mutation_power: 0.0,
            weight_bound: 0.0,
            allow_recurrent_links: false,
        }
    }

    /// Checks that probabilities are probabilities and that
    /// magnitudes are finite and non-negative.
    ///
    /// # Errors
    /// Returns a description of the first bad field.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.weight_reset_chance) {
            return Err(format!(
                "weight_reset_chance must be in [0, 1], got {}",
                self.weight_reset_chance
            ));
        }
        for (name, value) in [
            ("weight_mutation_power", self.weight_mutation_power),
            ("weight_bound", self.weight_bound),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be finite and >= 0, got {}", name, value));
            }
        }
        Ok(())
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        MutationConfig {
            weight_mutation_breadth: WeightMutationBreadth::AllLinks,
            weight_reset_chance: 0.1,
            weight_mutation_power: 0.5,
            weight_bound: 8.0,
            allow_recurrent_links: true,
        }
    }
}

/// The kinds of mutation a network can undergo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationType {
    ModifyWeight,
    AddLink,
    AddNode,
    DeleteLink,
    DeleteNode,
}

impl MutationType {
    /// Returns `true` for every type that changes topology.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::ModifyWeight)
    }
}

/// Relative selection weights for each [`MutationType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationWeights {
    pub modify_weight: u32,
    pub add_link: u32,
    pub add_node: u32,
    pub delete_link: u32,
    pub delete_node: u32,
}

impl MutationWeights {
    /// Returns weights that never select anything.
    pub const fn zero() -> MutationWeights {
        MutationWeights {
            modify_weight: 0,
            add_link: 0,
            add_node: 0,
            delete_link: 0,
            delete_node: 0,
        }
    }

    /// Weights in selection order.
    fn table(&self) -> [(MutationType, u32); 5] {
        [
            (MutationType::ModifyWeight, self.modify_weight),
            (MutationType::AddLink, self.add_link),
            (MutationType::AddNode, self.add_node),
            (MutationType::DeleteLink, self.delete_link),
            (MutationType::DeleteNode, self.delete_node),
        ]
    }

    /// Sum of the structural weights only.
    pub fn structural_total(&self) -> u64 {
        self.table()
            .iter()
            .filter(|(t, _)| t.is_structural())
            .map(|(_, w)| *w as u64)
            .sum()
    }

    /// Picks a mutation type with probability proportional to
    /// its weight. Returns `None` if every weight is zero.
    ///
    /// # Examples
    /// ```
    /// use evonn_nn::mutation::{MutationType, MutationWeights};
    ///
    /// let weights = MutationWeights {
    ///     add_node: 3,
    ///     ..MutationWeights::zero()
    /// };
    /// let mut rng = rand::thread_rng();
    ///
    /// assert_eq!(weights.choose(&mut rng), Some(MutationType::AddNode));
    /// assert_eq!(MutationWeights::zero().choose(&mut rng), None);
    /// ```
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MutationType> {
        Self::choose_from(&self.table(), rng)
    }

    /// Like [`choose`](Self::choose), but ignores the
    /// weight-modification entry.
    pub fn choose_structural<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MutationType> {
        Self::choose_from(&self.table()[1..], rng)
    }

    fn choose_from<R: Rng + ?Sized>(
        table: &[(MutationType, u32)],
        rng: &mut R,
    ) -> Option<MutationType> {
        let total: u64 = table.iter().map(|(_, w)| *w as u64).sum();
        if total == 0 {
            return None;
        }
        let mut draw = rng.gen_range(0..total);
        for (mutation, weight) in table {
            if draw < *weight as u64 {
                return Some(*mutation);
            }
            draw -= *weight as u64;
        }
        None
    }
}

impl Default for MutationWeights {
    fn default() -> Self {
        MutationWeights {
            modify_weight: 100,
            add_link: 10,
            add_node: 10,
            delete_link: 5,
            delete_node: 5,
        }
    }
}
