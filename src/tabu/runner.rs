//! Tabu search execution engine.
//!
//! # Algorithm
//!
//! 1. Start from a caller-supplied rule; current = elite = clone of it.
//! 2. At each iteration:
//!    a. Generate a bounded set of neighbors by mutating one random
//!       variable each, rejecting tabu and duplicate bit patterns
//!    b. Accept the best-scoring neighbor *unconditionally* (the driver
//!       performs a walk, not hill-climbing; the elite slot remembers the
//!       best point visited)
//!    c. Record every variable of the accepted rule in long-term memory
//!    d. On improvement over the elite, reset the stagnation counter;
//!       otherwise count up and reinitialize from long-term memory once
//!       the threshold is hit
//! 3. Terminate when the iteration budget is exhausted (or on external
//!    cancellation) and return the elite.
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bitvec::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::config::TabuConfig;
use super::types::{LongTermMemory, SearchContext, TabuList};
use crate::evaluation::{self, ContingencyTable, EvalError};
use crate::rule::Rule;

/// Result of one tabu-search refinement run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuResult {
    /// Best rule found during the run (a clone, never an alias of the
    /// caller's input).
    pub elite: Rule,
    /// Quality of the elite rule.
    pub elite_quality: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// How many times the stagnation threshold triggered reinitialization.
    pub reinitializations: usize,
    /// Whether the elite improved on the initial rule's quality.
    pub improved: bool,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// Elite quality at the end of each iteration (non-decreasing).
    pub quality_history: Vec<f64>,
}

/// Result of refining a population through the local search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationResult {
    /// The refined population. Same length and order as the input; at most
    /// one member is replaced by its refined clone.
    pub population: Vec<Rule>,
    /// Index of the replaced member, if any attempt improved.
    pub improved_index: Option<usize>,
    /// How many members were actually attempted.
    pub attempts: usize,
}

/// Tabu search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Refines a single rule.
    ///
    /// `initial_quality` is the caller's precomputed quality for the rule,
    /// if it has one; pass `None` to have it recomputed. The input rule is
    /// never mutated.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (call
    /// [`TabuConfig::validate`] first to get a descriptive error).
    pub fn refine(
        ctx: &SearchContext,
        initial: &Rule,
        initial_quality: Option<f64>,
        config: &TabuConfig,
    ) -> Result<TabuResult, EvalError> {
        Self::refine_with_cancel(ctx, initial, initial_quality, config, None)
    }

    /// Refines a single rule with an optional cancellation token.
    ///
    /// The token is checked once per iteration, so a caller can bound
    /// wall-clock time without waiting for the full iteration budget; the
    /// elite found so far is still returned.
    pub fn refine_with_cancel(
        ctx: &SearchContext,
        initial: &Rule,
        initial_quality: Option<f64>,
        config: &TabuConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TabuResult, EvalError> {
        config.validate().expect("invalid TabuConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let initial_quality = match initial_quality {
            // An empty rule's defined quality, so a caller may hand it
            // straight back in.
            Some(q) if q == f64::NEG_INFINITY => q,
            Some(q) => {
                config.measure.validate(q)?;
                q
            }
            None => evaluate_quality(ctx, initial, config)?,
        };

        let num_vars = initial.num_variables();
        if num_vars == 0 {
            // Nothing to mutate; hand the caller's rule straight back.
            return Ok(TabuResult {
                elite: initial.clone(),
                elite_quality: initial_quality,
                iterations: 0,
                reinitializations: 0,
                improved: false,
                cancelled: false,
                quality_history: Vec::new(),
            });
        }
        let tenure = ((num_vars as f64) * config.tenure_fraction).ceil() as usize;
        let mut tabu = TabuList::new(tenure);
        let mut memory = LongTermMemory::new();
        let max_no_improve =
            (((config.max_iterations as f64) * config.stagnation_fraction).round() as usize).max(1);

        let mut current = initial.clone();
        let mut elite = initial.clone();
        let mut elite_quality = initial_quality;
        let mut no_improve = 0usize;
        let mut reinitializations = 0usize;
        let mut cancelled = false;
        let mut quality_history = Vec::with_capacity(config.max_iterations.min(4096));

        for _ in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Accept the best neighbor unconditionally, even a worse one.
            let (neighbor, quality) =
                best_neighbor(ctx, &current, &mut tabu, config, &mut rng)?;
            current = neighbor;

            for var in 0..current.num_variables() {
                memory.record(current.variable(var));
            }

            if quality > elite_quality {
                elite = current.clone();
                elite_quality = quality;
                no_improve = 0;
            } else {
                no_improve += 1;
                if no_improve >= max_no_improve {
                    reinitialize(&mut current, &mut tabu, &mut memory, config.favor_most_frequent);
                    reinitializations += 1;
                    no_improve = 0;
                }
            }

            quality_history.push(elite_quality);
        }

        Ok(TabuResult {
            improved: elite_quality > initial_quality,
            iterations: quality_history.len(),
            elite,
            elite_quality,
            reinitializations,
            cancelled,
            quality_history,
        })
    }

    /// Refines a population: ranks its members by quality and runs the
    /// tabu search on up to `config.population_attempts` members of
    /// *distinct* quality, best first, stopping at the first improvement.
    ///
    /// Returns a new population; the improved member (if any) is replaced
    /// by its refined clone, everything else is cloned unchanged. The
    /// caller's rules are never mutated.
    pub fn refine_population(
        ctx: &SearchContext,
        population: &[Rule],
        config: &TabuConfig,
    ) -> Result<PopulationResult, EvalError> {
        config.validate().expect("invalid TabuConfig");

        let mut qualities = Vec::with_capacity(population.len());
        for (i, rule) in population.iter().enumerate() {
            qualities.push((i, evaluate_quality(ctx, rule, config)?));
        }
        // Best first; index order breaks quality ties deterministically.
        qualities.sort_by(|a, b| b.1.partial_cmp(&a.1).expect("quality is never NaN"));

        let mut refined: Vec<Rule> = population.to_vec();
        let mut improved_index = None;
        let mut attempts = 0usize;
        let mut last_attempted = f64::NAN;

        for &(index, quality) in &qualities {
            if attempts >= config.population_attempts {
                break;
            }
            // Equal-quality members are near-duplicates of the one just
            // tried; skip to the next distinct quality level.
            if quality == last_attempted {
                continue;
            }
            last_attempted = quality;
            attempts += 1;

            let result = Self::refine(ctx, &population[index], Some(quality), config)?;
            if result.improved {
                debug!(
                    index,
                    old_quality = quality,
                    new_quality = result.elite_quality,
                    "local search improved a population member"
                );
                refined[index] = result.elite;
                improved_index = Some(index);
                break;
            }
            debug!(index, quality, "local search could not improve member");
        }

        Ok(PopulationResult {
            population: refined,
            improved_index,
            attempts,
        })
    }
}

/// Scores a rule: the worst-possible sentinel for empty rules, otherwise
/// the configured measure over the rule's contingency table, validated.
fn evaluate_quality(ctx: &SearchContext, rule: &Rule, config: &TabuConfig) -> Result<f64, EvalError> {
    if rule.is_empty() {
        return Ok(f64::NEG_INFINITY);
    }
    let table = build_table(ctx, rule, config.parallel);
    table.validate(ctx.dataset.num_instances())?;
    let quality = config.measure.value(&table);
    config.measure.validate(quality)?;
    Ok(quality)
}

fn build_table(ctx: &SearchContext, rule: &Rule, parallel: bool) -> ContingencyTable {
    #[cfg(feature = "parallel")]
    if parallel {
        return evaluation::contingency_table_par(rule, ctx.labels, ctx.dataset);
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;
    evaluation::contingency_table(rule, ctx.labels, ctx.dataset)
}

/// Generates `neighbors_per_iteration` candidates by mutating one random
/// variable each and returns the best-scoring one (ties keep the first
/// found). The winning mutation is inserted into the tabu list.
fn best_neighbor(
    ctx: &SearchContext,
    current: &Rule,
    tabu: &mut TabuList,
    config: &TabuConfig,
    rng: &mut StdRng,
) -> Result<(Rule, f64), EvalError> {
    let mut best: Option<(Rule, f64)> = None;
    let mut winning_pattern: Option<BitVec> = None;
    let mut tried: Vec<BitVec> = Vec::with_capacity(config.neighbors_per_iteration);

    for _ in 0..config.neighbors_per_iteration {
        let var = rng.random_range(0..current.num_variables());

        let mut retries = 0usize;
        let mutated = loop {
            let candidate = mutate(current.variable(var), config.mutation_probability, rng);
            retries += 1;
            let clash = tabu.contains(&candidate)
                || tried.iter().any(|t| t == &candidate)
                || (0..current.num_variables())
                    .any(|i| current.variable(i) == candidate.as_bitslice());
            if !clash {
                break candidate;
            }
            if retries > config.max_mutation_retries {
                // Degenerate neighborhood: accept the mutation anyway to
                // guarantee forward progress.
                warn!(
                    retries,
                    var, "mutation retry ceiling reached, accepting a forbidden pattern"
                );
                break candidate;
            }
        };
        tried.push(mutated.clone());

        let mut neighbor = current.clone();
        neighbor.set_variable(var, mutated.clone());
        let quality = evaluate_quality(ctx, &neighbor, config)?;

        if best.as_ref().map_or(true, |(_, q)| quality > *q) {
            best = Some((neighbor, quality));
            winning_pattern = Some(mutated);
        }
    }

    if let Some(pattern) = winning_pattern {
        tabu.insert(pattern);
    }
    // neighbors_per_iteration >= 1 is enforced by config validation.
    Ok(best.expect("at least one neighbor is generated"))
}

/// Flips each bit of `pattern` independently with probability `p`.
fn mutate(pattern: &BitSlice, p: f64, rng: &mut StdRng) -> BitVec {
    let mut out = pattern.to_bitvec();
    for j in 0..out.len() {
        if rng.random_bool(p) {
            let bit = out[j];
            out.set(j, !bit);
        }
    }
    out
}

/// Rebuilds the stagnating rule from the extreme entries of long-term
/// memory, resets the tabu list, and decays the memory counters.
///
/// Memory entries are consumed one per variable, walking from the favored
/// end of the frequency ranking; a variable takes the next unused pattern
/// matching its bit width, so the rule's shape is always preserved. When
/// the memory runs out, the remaining variables are left untouched.
fn reinitialize(
    rule: &mut Rule,
    tabu: &mut TabuList,
    memory: &mut LongTermMemory,
    favor_most_frequent: bool,
) {
    debug!(
        memory_len = memory.len(),
        favor_most_frequent, "stagnation threshold hit, reinitializing from long-term memory"
    );

    {
        let ranked = memory.ranked(favor_most_frequent);
        let mut used = vec![false; ranked.len()];
        for var in 0..rule.num_variables() {
            let width = rule.width(var);
            if let Some(pos) = (0..ranked.len()).find(|&i| !used[i] && ranked[i].len() == width) {
                used[pos] = true;
                rule.set_variable(var, ranked[pos].clone());
            }
        }
    }

    tabu.reset();
    memory.decay();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Attribute, Dataset};
    use crate::fuzzy::FuzzyLabels;
    use crate::tabu::TabuConfig;

    /// A dataset where class 1 clusters at high attribute values, so a
    /// discriminating rule exists and the search has something to find.
    fn separable_dataset() -> Dataset {
        let mut data = Dataset::new(
            vec![
                Attribute::Numeric {
                    name: "x".into(),
                    min: 0.0,
                    max: 10.0,
                },
                Attribute::Nominal {
                    name: "shape".into(),
                    categories: vec!["square".into(), "circle".into()],
                },
            ],
            2,
        );
        let rows: &[(f64, f64, usize)] = &[
            (0.5, 0.0, 0),
            (1.5, 0.0, 0),
            (2.0, 1.0, 0),
            (3.0, 0.0, 0),
            (4.0, 1.0, 0),
            (7.0, 1.0, 1),
            (8.0, 1.0, 1),
            (8.5, 0.0, 1),
            (9.0, 1.0, 1),
            (9.5, 1.0, 1),
        ];
        for &(x, shape, class) in rows {
            data.push(vec![Some(x), Some(shape)], class).unwrap();
        }
        data
    }

    fn small_config() -> TabuConfig {
        TabuConfig::default()
            .with_max_iterations(200)
            .with_neighbors_per_iteration(5)
            .with_seed(42)
    }

    #[test]
    fn test_refine_improves_empty_rule() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        let result = TabuRunner::refine(&ctx, &initial, None, &small_config()).unwrap();

        assert!(result.improved);
        assert!(result.elite_quality > 0.0);
        assert!(!result.elite.is_empty());
        assert_eq!(result.iterations, 200);
    }

    #[test]
    fn test_elite_quality_history_non_decreasing() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        let result = TabuRunner::refine(&ctx, &initial, None, &small_config()).unwrap();

        for window in result.quality_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "elite quality regressed: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_refine_preserves_rule_shape() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        // Tiny stagnation threshold so reinitialization actually fires.
        let config = small_config().with_stagnation_fraction(0.05);
        let result = TabuRunner::refine(&ctx, &initial, None, &config).unwrap();

        assert_eq!(result.elite.num_variables(), initial.num_variables());
        for var in 0..initial.num_variables() {
            assert_eq!(result.elite.width(var), initial.width(var));
        }
    }

    #[test]
    fn test_refine_is_reproducible_with_seed() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);
        let config = small_config();

        let a = TabuRunner::refine(&ctx, &initial, None, &config).unwrap();
        let b = TabuRunner::refine(&ctx, &initial, None, &config).unwrap();

        assert_eq!(a.elite, b.elite);
        assert_eq!(a.elite_quality, b.elite_quality);
        assert_eq!(a.quality_history, b.quality_history);
        assert_eq!(a.reinitializations, b.reinitializations);
    }

    #[test]
    fn test_refine_does_not_mutate_input() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);
        let snapshot = initial.clone();

        TabuRunner::refine(&ctx, &initial, None, &small_config()).unwrap();
        assert_eq!(initial, snapshot);
    }

    #[test]
    fn test_stagnation_triggers_reinitialization() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        // Threshold of round(200 * 0.02) = 4 non-improving iterations.
        let config = small_config().with_stagnation_fraction(0.02);
        let result = TabuRunner::refine(&ctx, &initial, None, &config).unwrap();

        assert!(result.reinitializations > 0);
    }

    #[test]
    fn test_both_reinitialization_directions_run() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);
        let base = small_config().with_stagnation_fraction(0.02);

        let most = TabuRunner::refine(&ctx, &initial, None, &base.clone()).unwrap();
        let least =
            TabuRunner::refine(&ctx, &initial, None, &base.with_favor_most_frequent(false))
                .unwrap();

        assert!(most.reinitializations > 0);
        assert!(least.reinitializations > 0);
        // Both directions keep the elite invariantly monotone.
        assert!(most.elite_quality >= f64::NEG_INFINITY);
        assert!(least.elite_quality >= f64::NEG_INFINITY);
    }

    #[test]
    fn test_cancellation_stops_early() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        let cancel = Arc::new(AtomicBool::new(true));
        let result = TabuRunner::refine_with_cancel(
            &ctx,
            &initial,
            None,
            &small_config(),
            Some(cancel),
        )
        .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.elite, initial);
        // The empty initial rule carries the worst-possible sentinel.
        assert_eq!(result.elite_quality, f64::NEG_INFINITY);
    }

    #[test]
    fn test_cancellation_mid_run_keeps_elite() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);
        let config = small_config().with_max_iterations(1_000_000);

        let cancel = Arc::new(AtomicBool::new(false));

        // Cancel after a few iterations
        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let result =
            TabuRunner::refine_with_cancel(&ctx, &initial, None, &config, Some(cancel))
                .unwrap();

        assert!(result.cancelled, "expected cancelled result");
        assert!(result.iterations < 1_000_000, "should have stopped early");
        // The elite found so far is still handed back, history included.
        assert_eq!(result.quality_history.len(), result.iterations);
        assert!(result.elite_quality >= f64::NEG_INFINITY);
    }

    #[test]
    fn test_reinitialize_takes_most_frequent_patterns() {
        let data = separable_dataset();
        let mut rule = Rule::empty(&data, 3, 1); // widths 3 and 2

        let mut memory = LongTermMemory::new();
        let a = bitvec![1, 0, 0]; // 5 occurrences
        let b = bitvec![0, 1, 0]; // 2 occurrences
        let c = bitvec![0, 0, 1]; // 8 occurrences
        for _ in 0..5 {
            memory.record(&a);
        }
        for _ in 0..2 {
            memory.record(&b);
        }
        for _ in 0..8 {
            memory.record(&c);
        }

        let mut tabu = TabuList::new(2);
        tabu.insert(bitvec![1, 1, 0]);
        reinitialize(&mut rule, &mut tabu, &mut memory, true);

        // Only one width-3 variable exists: it takes the most frequent
        // pattern; the width-2 variable finds no matching pattern and is
        // left untouched.
        assert_eq!(rule.variable(0), c.as_bitslice());
        assert_eq!(rule.variable(1), bits![0, 0]);
        // Tabu list is back to placeholders, counters are halved.
        assert!(!tabu.contains(bits![1, 1, 0]));
        assert_eq!(memory.count(&c), Some(4));
        assert_eq!(memory.count(&a), Some(3));
        assert_eq!(memory.count(&b), Some(1));
    }

    #[test]
    fn test_reinitialize_least_frequent_direction() {
        let data = separable_dataset();
        let mut rule = Rule::empty(&data, 3, 1);

        let mut memory = LongTermMemory::new();
        let a = bitvec![1, 0, 0];
        let b = bitvec![0, 1, 0];
        for _ in 0..5 {
            memory.record(&a);
        }
        for _ in 0..2 {
            memory.record(&b);
        }

        let mut tabu = TabuList::new(2);
        reinitialize(&mut rule, &mut tabu, &mut memory, false);

        assert_eq!(rule.variable(0), b.as_bitslice());
    }

    #[test]
    fn test_nan_initial_quality_rejected() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        let err = TabuRunner::refine(&ctx, &initial, Some(f64::NAN), &small_config());
        assert!(matches!(err, Err(EvalError::InvalidQuality { .. })));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_result_serializes_to_json() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        // A participating variable keeps every recorded quality finite;
        // JSON has no encoding for the infinite sentinel.
        let mut initial = Rule::empty(&data, 3, 1);
        initial.set_variable(0, bitvec![0, 0, 1]);

        let result = TabuRunner::refine(&ctx, &initial, None, &small_config()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: TabuResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.elite, result.elite);
        assert_eq!(back.iterations, result.iterations);
    }

    #[test]
    fn test_out_of_range_initial_quality_rejected() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        // 2.0 is outside WRAcc_Norm's [0, 1]; accepting it would make the
        // elite unbeatable and the whole run a silent no-op.
        let err = TabuRunner::refine(&ctx, &initial, Some(2.0), &small_config());
        assert!(matches!(err, Err(EvalError::InvalidQuality { .. })));
    }

    #[test]
    fn test_sentinel_initial_quality_accepted() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        // An empty rule's quality is negative infinity; callers that
        // evaluated the rule themselves pass it back unchanged.
        let result =
            TabuRunner::refine(&ctx, &initial, Some(f64::NEG_INFINITY), &small_config())
                .unwrap();
        assert!(result.improved);
    }

    #[test]
    fn test_caller_supplied_quality_is_respected() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);
        let initial = Rule::empty(&data, 3, 1);

        // An unbeatable quality: the run cannot improve on it.
        let result =
            TabuRunner::refine(&ctx, &initial, Some(1.0), &small_config()).unwrap();
        assert!(!result.improved);
        assert_eq!(result.elite, initial);
    }

    #[test]
    fn test_refine_population_replaces_one_member() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);

        let empty = Rule::empty(&data, 3, 1);
        let mut low = Rule::empty(&data, 3, 1);
        low.set_variable(0, bitvec![1, 0, 0]); // fires on the wrong class
        let population = vec![empty.clone(), low.clone()];

        let result =
            TabuRunner::refine_population(&ctx, &population, &small_config()).unwrap();

        assert_eq!(result.population.len(), 2);
        assert!(result.attempts >= 1);
        let index = result.improved_index.expect("search should improve a member");
        assert_ne!(result.population[index], population[index]);
        // Inputs are untouched.
        assert_eq!(population[0], empty);
        assert_eq!(population[1], low);
    }

    #[test]
    fn test_refine_population_skips_duplicate_qualities() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);

        // Three members of identical quality count as a single attempt.
        let empty = Rule::empty(&data, 3, 1);
        let population = vec![empty.clone(), empty.clone(), empty];
        let config = small_config().with_population_attempts(3);

        let result = TabuRunner::refine_population(&ctx, &population, &config).unwrap();
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_refine_population_empty_input() {
        let data = separable_dataset();
        let labels = FuzzyLabels::build(&data, 3);
        let ctx = SearchContext::new(&data, &labels);

        let result = TabuRunner::refine_population(&ctx, &[], &small_config()).unwrap();
        assert!(result.population.is_empty());
        assert!(result.improved_index.is_none());
        assert_eq!(result.attempts, 0);
    }
}
