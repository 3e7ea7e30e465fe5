
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FromIterator;

use rustc_hash::FxHashMap;

use crate::pattern::Pattern;

/// Types usable as item identifiers: ordered for the sorted-row representation,
/// hashable for pattern membership, shareable across the rayon fan-out.
pub trait Item: Copy + Ord + Hash + Debug + Send + Sync {}

impl<T: Copy + Ord + Hash + Debug + Send + Sync> Item for T {}

/// Index of a transaction within its store
pub type TrId = usize;

pub type Count = usize;

/// A single row of the dataset. Items are kept sorted ascending so membership
/// is a binary search.
#[derive(Clone, Debug)]
pub struct Transaction<T> {
    tr_id: TrId,
    items: Vec<T>,
}

impl<T: Item> Transaction<T> {

    fn new( tr_id: TrId, mut items: Vec<T> ) -> Transaction<T> {
	items.sort_unstable();
	Transaction{ tr_id, items }
    }

    pub fn tr_id( &self ) -> TrId {
	self.tr_id
    }

    pub fn items( &self ) -> &[T] {
	&self.items
    }

    pub fn len( &self ) -> usize {
	self.items.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.items.is_empty()
    }

    pub fn includes( &self, item: &T ) -> bool {
	self.items.binary_search( item ).is_ok()
    }
}

/// An ordered collection of transactions with a running element count.
/// Two instances exist per mining run: the immutable original dataset and the
/// residual copy that shrinks as patterns are committed.
#[derive(Clone, Debug)]
pub struct TransactionStore<T> {
    transactions: Vec<Transaction<T>>,
    el_count: usize,
}

impl<T: Item> TransactionStore<T> {

    pub fn new() -> TransactionStore<T> {
	TransactionStore{
	    transactions: Vec::new(),
	    el_count: 0,
	}
    }

    /// Normalizes the row, appends it under the next sequential index and
    /// bumps the running element count.
    pub fn add_transaction( &mut self, items: Vec<T> ) {
	let transaction = Transaction::new( self.transactions.len(), items );
	self.el_count += transaction.len();
	self.transactions.push( transaction );
    }

    pub fn len( &self ) -> usize {
	self.transactions.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.transactions.is_empty()
    }

    /// Number of cells currently stored. Maintained incrementally, never by
    /// rescanning the rows.
    pub fn el_count( &self ) -> usize {
	self.el_count
    }

    pub fn transactions( &self ) -> &[Transaction<T>] {
	&self.transactions
    }

    /// Direct row access. Panics on an out-of-range index, which is a contract
    /// violation on the caller's side.
    pub fn transaction( &self, tr_id: TrId ) -> &Transaction<T> {
	&self.transactions[ tr_id ]
    }

    /// Membership test for a single cell. Absent indices count as absent cells.
    pub fn includes( &self, tr_id: TrId, item: &T ) -> bool {
	self.transactions.get( tr_id )
	    .map_or( false, |transaction| transaction.includes( item ))
    }

    /// Strips the pattern's footprint: every pattern item is filtered out of
    /// every row the pattern names. Rows outside the pattern are untouched.
    /// Removing the same pattern twice is a no-op the second time.
    pub fn remove_pattern( &mut self, pattern: &Pattern<T> ) {
	for &tr_id in pattern.transaction_ids() {
	    let row = &mut self.transactions[ tr_id ];
	    let size_before = row.items.len();
	    row.items.retain( |item| !pattern.has_item( item ));
	    self.el_count -= size_before - row.items.len();
	}
    }

    /// Element count this store would have after `remove_pattern`, computed
    /// without mutating anything. Backs hypothetical cost evaluation.
    pub fn try_remove_pattern( &self, pattern: &Pattern<T> ) -> Count {
	let mut removed = 0;
	for &tr_id in pattern.transaction_ids() {
	    let row = self.transaction( tr_id );
	    removed += pattern.items().filter( |item| row.includes( *item )).count();
	}
	self.el_count - removed
    }

    /// Counts the cells of the pattern's cross product that are absent from
    /// this store. This is the authoritative false-positive contribution of a
    /// pattern and feeds the same cost function as everything else.
    pub fn calc_pattern_false_positives( &self, pattern: &Pattern<T> ) -> Count {
	let mut false_positives = 0;
	for &tr_id in pattern.transaction_ids() {
	    let row = self.transaction( tr_id );
	    for item in pattern.items() {
		if !row.includes( item ) {
		    false_positives += 1;
		}
	    }
	}
	false_positives
    }

    /// All items occurring anywhere in the store, most frequent first. Ties
    /// keep first-encounter order so the seed ranking is deterministic.
    pub fn items_by_freq( &self ) -> Vec<T> {
	let mut frequencies: FxHashMap<T, Count> = FxHashMap::default();
	let mut items: Vec<T> = Vec::new();
	for transaction in &self.transactions {
	    for item in transaction.items() {
		match frequencies.get_mut( item ) {
		    Some( count ) => *count += 1,
		    None => {
			frequencies.insert( *item, 1 );
			items.push( *item );
		    }
		}
	    }
	}
	// stable sort preserves encounter order between equal frequencies
	items.sort_by( |left, right| frequencies[ right ].cmp( &frequencies[ left ] ));
	items
    }
}

impl<T: Item> Default for TransactionStore<T> {
    fn default() -> TransactionStore<T> {
	TransactionStore::new()
    }
}

impl<T: Item> FromIterator<Vec<T>> for TransactionStore<T> {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>( rows: I ) -> TransactionStore<T> {
	let mut store = TransactionStore::new();
	for row in rows {
	    store.add_transaction( row );
	}
	store
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn store( rows: Vec<Vec<usize>> ) -> TransactionStore<usize> {
	rows.into_iter().collect()
    }

    #[test]
    fn test_el_count_and_construction() {
	let mut dataset: TransactionStore<usize> = TransactionStore::new();
	assert_eq!( dataset.el_count(), 0 );

	dataset.add_transaction( vec!( 0, 1, 2 ));
	assert_eq!( dataset.el_count(), 3 );
	assert_eq!( dataset.transaction( 0 ).tr_id(), 0 );

	dataset.add_transaction( vec!( 3, 4 ));
	assert_eq!( dataset.el_count(), 5 );
	assert_eq!( dataset.transaction( 1 ).tr_id(), 1 );

	assert!( dataset.transaction( 1 ).includes( &3 ));
	assert!( !dataset.transaction( 1 ).includes( &5 ));
	assert!( dataset.includes( 0, &2 ));
	assert!( !dataset.includes( 7, &2 )); // absent row has no cells
    }

    #[test]
    fn test_rows_are_sorted_on_insertion() {
	let dataset = store( vec!( vec!( 2, 0, 1 )));
	assert_eq!( dataset.transaction( 0 ).items(), &[ 0, 1, 2 ] );
	assert!( dataset.includes( 0, &1 ));
    }

    #[test]
    fn test_remove_pattern_is_idempotent() {
	let mut dataset = store( vec!(
	    vec!( 0, 1, 2 ),
	    vec!( 0, 1, 2 ),
	    vec!( 3, 4 ),
	));
	let pattern = Pattern::from_parts( vec!( 0, 1 ), vec!( 0, 1 ));

	dataset.remove_pattern( &pattern );
	assert_eq!( dataset.el_count(), 4 );
	assert_eq!( dataset.transaction( 0 ).items(), &[ 2 ] );
	assert_eq!( dataset.transaction( 2 ).items(), &[ 3, 4 ] );

	dataset.remove_pattern( &pattern );
	assert_eq!( dataset.el_count(), 4 );
    }

    #[test]
    fn test_false_positive_accounting() {
	let mut dataset = store( vec!(
	    vec!( 0, 1, 2 ),
	    vec!( 0, 1, 2 ),
	    vec!( 0, 1, 2 ),
	    vec!( 3, 4, 5 ),
	));
	let pattern = Pattern::from_parts( vec!( 0, 1, 2 ), vec!( 0, 1, 2 ));
	assert_eq!( dataset.calc_pattern_false_positives( &pattern ), 0 );

	dataset.remove_pattern( &pattern );
	// the emptied rows now claim all three items falsely
	assert_eq!( dataset.calc_pattern_false_positives( &pattern ), 9 );
    }

    #[test]
    fn test_items_by_freq_ranking() {
	let dataset = store( vec!(
	    vec!( 5, 9 ),
	    vec!( 5, 9, 7 ),
	    vec!( 5 ),
	));
	assert_eq!( dataset.items_by_freq(), vec!( 5, 9, 7 ));
    }

    #[test]
    fn test_items_by_freq_breaks_ties_by_first_encounter() {
	let dataset = store( vec!(
	    vec!( 3, 1 ),
	    vec!( 3, 1 ),
	));
	// rows are sorted, so 1 is encountered before 3
	assert_eq!( dataset.items_by_freq(), vec!( 1, 3 ));
    }
}
