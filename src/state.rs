
use crate::cost::cost;
use crate::data::{Count, Item, TransactionStore};
use crate::pattern::{Pattern, PatternCollection};

/// Couples the original dataset, the accepted patterns and the residual view,
/// with incrementally tracked false positives. False negatives are implicit:
/// they equal the residual element count. `commit_pattern` is the only place
/// a mining run permanently changes state; the `try_*` evaluations are pure.
#[derive(Clone, Debug)]
pub struct SearchState<T> {
    dataset: TransactionStore<T>,
    patterns: PatternCollection<T>,
    residual: TransactionStore<T>,
    current_false_positives: Count,
}

impl<T: Item> SearchState<T> {

    pub fn new( dataset: TransactionStore<T> ) -> SearchState<T> {
	let residual = dataset.clone();
	SearchState{
	    dataset,
	    patterns: PatternCollection::new(),
	    residual,
	    current_false_positives: 0,
	}
    }

    pub fn dataset( &self ) -> &TransactionStore<T> {
	&self.dataset
    }

    pub fn patterns( &self ) -> &PatternCollection<T> {
	&self.patterns
    }

    pub fn residual( &self ) -> &TransactionStore<T> {
	&self.residual
    }

    pub fn current_false_positives( &self ) -> Count {
	self.current_false_positives
    }

    /// Dataset cells not yet explained by any accepted pattern
    pub fn current_false_negatives( &self ) -> Count {
	self.residual.el_count()
    }

    pub fn current_noise( &self ) -> Count {
	self.current_false_positives + self.residual.el_count()
    }

    /// Objective value of the committed state
    pub fn current_cost( &self, complexity_weight: f64 ) -> f64 {
	cost(
	    self.current_false_positives,
	    self.current_false_negatives(),
	    self.patterns.complexity(),
	    complexity_weight,
	)
    }

    /// Accepts a pattern: records its false positives against the original
    /// dataset, strips its footprint from the residual and appends it to the
    /// collection.
    pub fn commit_pattern( &mut self, pattern: Pattern<T> ) {
	self.current_false_positives += self.dataset.calc_pattern_false_positives( &pattern );
	self.residual.remove_pattern( &pattern );
	self.patterns.add_pattern( pattern );
    }

    /// Cost the state would have after committing the pattern, without
    /// committing anything.
    pub fn try_add_pattern( &self, pattern: &Pattern<T>, complexity_weight: f64 ) -> f64 {
	let false_positives = self.current_false_positives
	    + self.dataset.calc_pattern_false_positives( pattern );
	let false_negatives = self.residual.try_remove_pattern( pattern );
	cost(
	    false_positives,
	    false_negatives,
	    self.patterns.complexity() + pattern.get_complexity(),
	    complexity_weight,
	)
    }

    pub fn into_patterns( self ) -> PatternCollection<T> {
	self.patterns
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::cost::exhaustive_cost;

    fn state_for( rows: Vec<Vec<usize>> ) -> SearchState<usize> {
	SearchState::new( rows.into_iter().collect() )
    }

    #[test]
    fn test_noise_with_overlapping_false_positives() {
	let mut state = state_for( vec!(
	    vec!( 0, 1 ),
	    vec!( 0, 2, 3 ),
	    vec!( 1, 2, 3 ),
	));
	assert_eq!( state.current_noise(), 8 );

	let first = Pattern::from_parts( vec!( 0, 1 ), vec!( 0, 1 ));
	assert!( ( state.try_add_pattern( &first, 0.5 ) - 8.0 ).abs() < 0.01 );
	state.commit_pattern( first );
	assert_eq!( state.current_noise(), 6 );
	assert_eq!( state.current_false_positives(), 1 );

	let second = Pattern::from_parts( vec!( 1, 2, 3 ), vec!( 1, 2 ));
	assert!( ( state.try_add_pattern( &second, 0.5 ) - ( 9.0 / 2.0 + 2.0 )).abs() < 0.01 );
	state.commit_pattern( second );
	assert_eq!( state.current_noise(), 2 );
    }

    #[test]
    fn test_try_add_does_not_mutate() {
	let state = state_for( vec!(
	    vec!( 0, 1 ),
	    vec!( 0, 1 ),
	));
	let pattern = Pattern::from_parts( vec!( 0, 1 ), vec!( 0, 1 ));
	state.try_add_pattern( &pattern, 0.5 );

	assert_eq!( state.current_false_positives(), 0 );
	assert_eq!( state.current_false_negatives(), 4 );
	assert!( state.patterns().is_empty() );
    }

    #[test]
    fn test_incremental_cost_matches_exhaustive_recount() {
	let mut state = state_for( vec!(
	    vec!( 0, 1, 2 ),
	    vec!( 0, 1 ),
	    vec!( 0, 1, 2 ),
	    vec!( 3, 4 ),
	));
	let weight = 0.8;
	assert_eq!(
	    state.current_cost( weight ),
	    exhaustive_cost( state.dataset(), state.patterns(), weight ),
	);

	state.commit_pattern( Pattern::from_parts( vec!( 0, 1, 2 ), vec!( 0, 1, 2 )));
	assert_eq!(
	    state.current_cost( weight ),
	    exhaustive_cost( state.dataset(), state.patterns(), weight ),
	);

	state.commit_pattern( Pattern::from_parts( vec!( 3, 4 ), vec!( 3 )));
	assert_eq!(
	    state.current_cost( weight ),
	    exhaustive_cost( state.dataset(), state.patterns(), weight ),
	);
    }
}
