
use rustc_hash::FxHashSet;

use crate::data::{Item, TrId};

/// A candidate or accepted pattern: an item set and a transaction-index set
/// that together claim a (noisy) dense block of the dataset. Both sets are
/// hash based so the extension inner loops get O(1) membership.
#[derive(Clone, Debug)]
pub struct Pattern<T> {
    item_ids: FxHashSet<T>,
    transaction_ids: FxHashSet<TrId>,
}

impl<T: Item> Pattern<T> {

    pub fn new() -> Pattern<T> {
	Pattern{
	    item_ids: FxHashSet::default(),
	    transaction_ids: FxHashSet::default(),
	}
    }

    pub fn from_parts<I, J>( items: I, transactions: J ) -> Pattern<T> where
	I: IntoIterator<Item = T>,
	J: IntoIterator<Item = TrId>,
    {
	Pattern{
	    item_ids: items.into_iter().collect(),
	    transaction_ids: transactions.into_iter().collect(),
	}
    }

    pub fn add_item( &mut self, item: T ) {
	self.item_ids.insert( item );
    }

    pub fn remove_item( &mut self, item: &T ) {
	self.item_ids.remove( item );
    }

    pub fn has_item( &self, item: &T ) -> bool {
	self.item_ids.contains( item )
    }

    pub fn add_transaction( &mut self, tr_id: TrId ) {
	self.transaction_ids.insert( tr_id );
    }

    pub fn remove_transaction( &mut self, tr_id: TrId ) {
	self.transaction_ids.remove( &tr_id );
    }

    pub fn has_transaction( &self, tr_id: TrId ) -> bool {
	self.transaction_ids.contains( &tr_id )
    }

    pub fn items( &self ) -> impl Iterator<Item = &T> {
	self.item_ids.iter()
    }

    pub fn transaction_ids( &self ) -> impl Iterator<Item = &TrId> {
	self.transaction_ids.iter()
    }

    pub fn item_count( &self ) -> usize {
	self.item_ids.len()
    }

    pub fn transaction_count( &self ) -> usize {
	self.transaction_ids.len()
    }

    /// Description length of the pattern
    pub fn get_complexity( &self ) -> usize {
	self.item_ids.len() + self.transaction_ids.len()
    }

    /// Number of cells the pattern claims to explain. Diagnostic only, the
    /// cost function never uses it.
    pub fn get_size( &self ) -> usize {
	self.item_ids.len() * self.transaction_ids.len()
    }

    /// True if either set is empty, in which case the pattern explains nothing
    pub fn is_empty( &self ) -> bool {
	self.item_ids.is_empty() || self.transaction_ids.is_empty()
    }

    pub fn covers( &self, tr_id: TrId, item: &T ) -> bool {
	self.has_transaction( tr_id ) && self.has_item( item )
    }

    /// Transaction indices in [0, total) outside this pattern, ascending.
    /// These are the row-growth candidates of the extension phase.
    pub fn transactions_uncovered( &self, total: usize ) -> Vec<TrId> {
	( 0 .. total ).filter( |tr_id| !self.has_transaction( *tr_id )).collect()
    }

    /// Items in ascending order, for rendering and stable output
    pub fn sorted_items( &self ) -> Vec<T> {
	let mut items: Vec<T> = self.item_ids.iter().copied().collect();
	items.sort_unstable();
	items
    }

    /// Transaction indices in ascending order
    pub fn sorted_transaction_ids( &self ) -> Vec<TrId> {
	let mut tr_ids: Vec<TrId> = self.transaction_ids.iter().copied().collect();
	tr_ids.sort_unstable();
	tr_ids
    }
}

impl<T: Item> Default for Pattern<T> {
    fn default() -> Pattern<T> {
	Pattern::new()
    }
}

/// The accepted pattern set with its running complexity. Collections stay
/// small (bounded by the K of top-K), so `covers` scans linearly.
#[derive(Clone, Debug)]
pub struct PatternCollection<T> {
    patterns: Vec<Pattern<T>>,
    complexity: usize,
}

impl<T: Item> PatternCollection<T> {

    pub fn new() -> PatternCollection<T> {
	PatternCollection{
	    patterns: Vec::new(),
	    complexity: 0,
	}
    }

    pub fn with_capacity( capacity: usize ) -> PatternCollection<T> {
	PatternCollection{
	    patterns: Vec::with_capacity( capacity ),
	    complexity: 0,
	}
    }

    pub fn add_pattern( &mut self, pattern: Pattern<T> ) {
	self.complexity += pattern.get_complexity();
	self.patterns.push( pattern );
    }

    /// Sum of member complexities, maintained on insertion
    pub fn complexity( &self ) -> usize {
	self.complexity
    }

    pub fn len( &self ) -> usize {
	self.patterns.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.patterns.is_empty()
    }

    pub fn patterns( &self ) -> &[Pattern<T>] {
	&self.patterns
    }

    pub fn iter( &self ) -> std::slice::Iter<'_, Pattern<T>> {
	self.patterns.iter()
    }

    /// True iff some accepted pattern claims the cell
    pub fn covers( &self, tr_id: TrId, item: &T ) -> bool {
	self.patterns.iter().any( |pattern| pattern.covers( tr_id, item ))
    }
}

impl<T: Item> Default for PatternCollection<T> {
    fn default() -> PatternCollection<T> {
	PatternCollection::new()
    }
}

impl<T> IntoIterator for PatternCollection<T> {
    type Item = Pattern<T>;
    type IntoIter = std::vec::IntoIter<Pattern<T>>;

    fn into_iter( self ) -> Self::IntoIter {
	self.patterns.into_iter()
    }
}
