
use std::collections::VecDeque;

use rayon::prelude::*;
use tracing::*;

use crate::cost::{cost, not_too_noisy};
use crate::data::{Count, Item, TrId, TransactionStore};
use crate::pattern::{Pattern, PatternCollection};
use crate::state::SearchState;

/// Parameters of a mining run. Validated before any mining happens; the
/// search never clamps anything silently.
#[derive(Clone, Copy, Debug)]
pub struct MiningConfig {
    /// Upper bound on the number of returned patterns
    pub max_patterns: usize,
    /// Tolerated fraction of missing items per pattern row, 1.0 disables
    pub max_row_noise: f64,
    /// Tolerated fraction of missing rows per pattern column, 1.0 disables
    pub max_column_noise: f64,
    /// Trades pattern parsimony against explanatory accuracy
    pub complexity_weight: f64,
}

impl Default for MiningConfig {
    fn default() -> MiningConfig {
	MiningConfig{
	    max_patterns: 8,
	    max_row_noise: 1.0,
	    max_column_noise: 1.0,
	    complexity_weight: 0.8,
	}
    }
}

impl MiningConfig {

    pub fn validate( &self ) -> Result<(), String> {
	if !( 0.0 ..= 1.0 ).contains( &self.max_row_noise ) {
	    return Err( format!( "max_row_noise must lie in [0, 1], got {}", self.max_row_noise ));
	}
	if !( 0.0 ..= 1.0 ).contains( &self.max_column_noise ) {
	    return Err( format!( "max_column_noise must lie in [0, 1], got {}", self.max_column_noise ));
	}
	if !self.complexity_weight.is_finite() || self.complexity_weight < 0.0 {
	    return Err( format!( "complexity_weight must be a non-negative number, got {}", self.complexity_weight ));
	}
	Ok( () )
    }
}

/// Seeds a pattern from the most frequent residual item and grows its item set
/// greedily. Returns the core, the queue of items it rejected (reconsidered
/// during extension) and the core's false-negative count. An empty core
/// signals an exhausted residual dataset.
pub fn find_core<T: Item>( state: &SearchState<T>, complexity_weight: f64 ) -> (Pattern<T>, VecDeque<T>, Count) {
    let mut core = Pattern::new();
    let mut deferred = VecDeque::new();
    let residual = state.residual();
    if residual.el_count() == 0 {
	return (core, deferred, 0);
    }

    let ranked = residual.items_by_freq();
    let seed = ranked[ 0 ];
    core.add_item( seed );
    for transaction in residual.transactions() {
	if transaction.includes( &seed ) {
	    core.add_transaction( transaction.tr_id() );
	}
    }

    let base_complexity = state.patterns().complexity();
    let false_positives = state.current_false_positives();
    let mut false_negatives = residual.el_count() - core.transaction_count();
    let mut core_cost = cost(
	false_positives,
	false_negatives,
	base_complexity + core.get_complexity(),
	complexity_weight,
    );

    for &next in &ranked[ 1 .. ] {
	// rows that would drop out if the item joined the core
	let dropped: Vec<TrId> = core.transaction_ids()
	    .filter( |tr_id| !residual.includes( **tr_id, &next ))
	    .copied()
	    .collect();
	let trial_items = core.item_count() + 1;
	let trial_transactions = core.transaction_count() - dropped.len();
	// every surviving row holds all trial items, so the covered cells are
	// exactly the trial block
	let trial_false_negatives = residual.el_count() - trial_items * trial_transactions;
	let trial_cost = cost(
	    false_positives,
	    trial_false_negatives,
	    base_complexity + trial_items + trial_transactions,
	    complexity_weight,
	);

	// ties favor inclusion: larger cores tend to extend further
	if trial_cost <= core_cost {
	    core.add_item( next );
	    for tr_id in dropped {
		core.remove_transaction( tr_id );
	    }
	    false_negatives = trial_false_negatives;
	    core_cost = trial_cost;
	} else {
	    deferred.push_back( next );
	}
    }

    (core, deferred, false_negatives)
}

/// Incremental effect of adding one uncovered row to the core: how many core
/// items it would claim falsely and how many residual cells it would explain.
fn row_delta<T: Item>( state: &SearchState<T>, core: &Pattern<T>, tr_id: TrId ) -> (Count, Count) {
    let mut extra_positives = 0;
    let mut explained = 0;
    for item in core.items() {
	if state.residual().includes( tr_id, item ) {
	    explained += 1;
	} else if !state.dataset().includes( tr_id, item )
	    && !state.patterns().covers( tr_id, item )
	{
	    extra_positives += 1;
	}
    }
    (extra_positives, explained)
}

/// Incremental effect of adding one deferred item over the core's rows
fn item_delta<T: Item>( state: &SearchState<T>, core: &Pattern<T>, item: &T ) -> (Count, Count) {
    let mut extra_positives = 0;
    let mut explained = 0;
    for &tr_id in core.transaction_ids() {
	if state.residual().includes( tr_id, item ) {
	    explained += 1;
	} else if !state.dataset().includes( tr_id, item )
	    && !state.patterns().covers( tr_id, item )
	{
	    extra_positives += 1;
	}
    }
    (extra_positives, explained)
}

/// Refines a core to a fixed point, alternating a row-growth pass with one
/// reconsidered item from the deferred queue. Per-row and per-item
/// contributions are independent, so each pass fans out over rayon before the
/// sequential accept loop; nothing shared is mutated until the fan-out is
/// collected. Returns the refined pattern with its false-positive and
/// false-negative counts.
pub fn extend_core<T: Item>(
    state: &SearchState<T>,
    core: Pattern<T>,
    mut deferred: VecDeque<T>,
    false_negatives: Count,
    max_row_noise: f64,
    max_column_noise: f64,
    complexity_weight: f64,
) -> (Pattern<T>, Count, Count) {
    let mut current = core;
    let mut false_positives = state.current_false_positives();
    let mut false_negatives = false_negatives;
    let base_complexity = state.patterns().complexity();

    let mut added_item = true;
    while added_item {
	// row pass: deltas depend only on the core's items, which this pass
	// never changes, so one fan-out serves all candidate rows
	let candidate_rows = current.transactions_uncovered( state.dataset().len() );
	let row_deltas: Vec<(TrId, Count, Count)> = candidate_rows.par_iter()
	    .map( |&tr_id| {
		let (extra_positives, explained) = row_delta( state, &current, tr_id );
		(tr_id, extra_positives, explained)
	    })
	    .collect();

	for (tr_id, extra_positives, explained) in row_deltas {
	    let current_cost = cost(
		false_positives,
		false_negatives,
		base_complexity + current.get_complexity(),
		complexity_weight,
	    );
	    let trial_cost = cost(
		false_positives + extra_positives,
		false_negatives - explained,
		base_complexity + current.get_complexity() + 1,
		complexity_weight,
	    );
	    if trial_cost <= current_cost {
		current.add_transaction( tr_id );
		if not_too_noisy( state.dataset(), &current, max_row_noise, max_column_noise ) {
		    false_positives += extra_positives;
		    false_negatives -= explained;
		} else {
		    current.remove_transaction( tr_id );
		}
	    }
	}

	added_item = false;

	// item pass: stop at the first accepted item and grow rows again
	let queued: Vec<T> = deferred.iter().copied().collect();
	let item_deltas: Vec<(Count, Count)> = queued.par_iter()
	    .map( |item| item_delta( state, &current, item ))
	    .collect();

	for (item, (extra_positives, explained)) in queued.into_iter().zip( item_deltas ) {
	    deferred.pop_front();
	    let current_cost = cost(
		false_positives,
		false_negatives,
		base_complexity + current.get_complexity(),
		complexity_weight,
	    );
	    let trial_cost = cost(
		false_positives + extra_positives,
		false_negatives - explained,
		base_complexity + current.get_complexity() + 1,
		complexity_weight,
	    );
	    if trial_cost <= current_cost {
		current.add_item( item );
		if not_too_noisy( state.dataset(), &current, max_row_noise, max_column_noise ) {
		    false_positives += extra_positives;
		    false_negatives -= explained;
		    added_item = true;
		    break;
		}
		current.remove_item( &item );
	    }
	}
    }

    (current, false_positives, false_negatives)
}

/// Greedy top-K driver: repeats find + extend, committing each candidate that
/// strictly improves the committed objective.
pub struct PandaMiner {
    config: MiningConfig,
}

impl PandaMiner {

    pub fn new( config: MiningConfig ) -> Result<PandaMiner, String> {
	config.validate()?;
	Ok( PandaMiner{ config } )
    }

    pub fn config( &self ) -> &MiningConfig {
	&self.config
    }

    /// Mines up to `max_patterns` patterns, most explanatory first. Stops
    /// early when the residual dataset is exhausted or the best candidate of
    /// a round no longer improves the objective.
    pub fn mine<T: Item>( &self, dataset: TransactionStore<T> ) -> PatternCollection<T> {
	let weight = self.config.complexity_weight;
	let mut state = SearchState::new( dataset );

	for round in 1 ..= self.config.max_patterns {
	    if state.current_false_negatives() == 0 {
		break;
	    }
	    let round_span = info_span!( "round", number = round );
	    let _entered = round_span.enter();

	    let committed_cost = state.current_cost( weight );
	    let (core, deferred, false_negatives) = find_core( &state, weight );
	    if core.is_empty() {
		break;
	    }
	    debug!(
		"core of {} items over {} transactions, {} deferred",
		core.item_count(), core.transaction_count(), deferred.len(),
	    );

	    let (candidate, false_positives, false_negatives) = extend_core(
		&state,
		core,
		deferred,
		false_negatives,
		self.config.max_row_noise,
		self.config.max_column_noise,
		weight,
	    );
	    let candidate_cost = cost(
		false_positives,
		false_negatives,
		state.patterns().complexity() + candidate.get_complexity(),
		weight,
	    );

	    if candidate_cost < committed_cost {
		info!(
		    "accepted {} items x {} transactions, cost {:.3} improves {:.3}",
		    candidate.item_count(), candidate.transaction_count(),
		    candidate_cost, committed_cost,
		);
		state.commit_pattern( candidate );
		debug_assert!(
		    ( state.current_cost( weight )
		      - crate::cost::exhaustive_cost( state.dataset(), state.patterns(), weight )
		    ).abs() < 1e-6
		);
	    } else {
		debug!( "candidate cost {:.3} does not improve {:.3}", candidate_cost, committed_cost );
		break;
	    }
	}

	info!(
	    "mined {} patterns: cost {:.3}, noise {}, false positives {}, false negatives {}, complexity {}",
	    state.patterns().len(),
	    state.current_cost( weight ),
	    state.current_noise(),
	    state.current_false_positives(),
	    state.current_false_negatives(),
	    state.patterns().complexity(),
	);
	state.into_patterns()
    }
}

/// Sole entry point for one-shot mining runs
pub fn mine<T: Item>( dataset: TransactionStore<T>, config: MiningConfig ) -> Result<PatternCollection<T>, String> {
    let miner = PandaMiner::new( config )?;
    Ok( miner.mine( dataset ))
}
