
use crate::data::{Count, Item, TransactionStore};
use crate::pattern::{Pattern, PatternCollection};

/// The objective every search step minimizes. Committed state and hypothetical
/// candidates must both go through this one function.
pub fn cost( false_positives: Count, false_negatives: Count, complexity: usize, complexity_weight: f64 ) -> f64 {
    complexity_weight * complexity as f64 + ( false_positives + false_negatives ) as f64
}

/// Full-scan false positives: cells claimed by some pattern's cross product
/// but absent from the dataset, summed per pattern. Matches the incremental
/// accounting, which also adds one unit per claiming pattern.
pub fn exhaustive_false_positives<T: Item>( dataset: &TransactionStore<T>, patterns: &PatternCollection<T> ) -> Count {
    patterns.iter()
	.map( |pattern| dataset.calc_pattern_false_positives( pattern ))
	.sum()
}

/// Full-scan false negatives: dataset cells not explained by any pattern
pub fn exhaustive_false_negatives<T: Item>( dataset: &TransactionStore<T>, patterns: &PatternCollection<T> ) -> Count {
    let mut false_negatives = 0;
    for transaction in dataset.transactions() {
	for item in transaction.items() {
	    if !patterns.covers( transaction.tr_id(), item ) {
		false_negatives += 1;
	    }
	}
    }
    false_negatives
}

/// Recomputes the objective from scratch. The driver's incremental counters
/// must agree with this at every committed round.
pub fn exhaustive_cost<T: Item>( dataset: &TransactionStore<T>, patterns: &PatternCollection<T>, complexity_weight: f64 ) -> f64 {
    cost(
	exhaustive_false_positives( dataset, patterns ),
	exhaustive_false_negatives( dataset, patterns ),
	patterns.complexity(),
	complexity_weight,
    )
}

/// Noise-tolerance predicate: every pattern column must be present in at least
/// `(1 - max_column_noise)` of the pattern's rows, and symmetrically for rows.
/// Tolerances of 1.0 disable the corresponding check.
pub fn not_too_noisy<T: Item>(
    dataset: &TransactionStore<T>,
    core: &Pattern<T>,
    max_row_noise: f64,
    max_column_noise: f64,
) -> bool {
    if max_row_noise >= 1.0 && max_column_noise >= 1.0 {
	return true;
    }

    if max_column_noise < 1.0 {
	let min_column = ( 1.0 - max_column_noise ) * core.transaction_count() as f64;
	for item in core.items() {
	    let column_sum = core.transaction_ids()
		.filter( |tr_id| dataset.includes( **tr_id, item ))
		.count();
	    if ( column_sum as f64 ) < min_column {
		return false;
	    }
	}
    }

    if max_row_noise < 1.0 {
	let min_row = ( 1.0 - max_row_noise ) * core.item_count() as f64;
	for &tr_id in core.transaction_ids() {
	    let row_sum = core.items()
		.filter( |item| dataset.includes( tr_id, *item ))
		.count();
	    if ( row_sum as f64 ) < min_row {
		return false;
	    }
	}
    }

    true
}
