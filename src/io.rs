
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;

use crate::data::{Item, TrId, TransactionStore};
use crate::pattern::PatternCollection;

/// Reads a whitespace-separated integer matrix, one transaction per line.
/// Repeated items within a line are deduplicated; blank lines become empty
/// transactions so transaction indices stay aligned with line numbers.
pub fn read_transactions( path: &Path ) -> Result<TransactionStore<u32>, String> {
    let file = File::open( path ).map_err( |e| format!( "{}: {}", path.display(), e ))?;
    let reader = BufReader::new( file );

    let mut store = TransactionStore::new();
    for (number, line) in reader.lines().enumerate() {
	let line = line.map_err( |e| e.to_string() )?;
	let items = parse_transaction( &line )
	    .map_err( |e| format!( "line {}: {}", number + 1, e ))?;
	store.add_transaction( items );
    }
    Ok( store )
}

/// Parses one line of whitespace-separated item identifiers
pub fn parse_transaction( line: &str ) -> Result<Vec<u32>, String> {
    let mut items = Vec::new();
    for chunk in line.split_whitespace() {
	match chunk.parse() {
	    Ok( item ) => items.push( item ),
	    Err( _ ) => return Err( format!( "invalid item '{}'", chunk )),
	}
    }
    items.sort_unstable();
    items.dedup();
    Ok( items )
}

/// Renders one pattern per line: the sorted item list, then the size of the
/// transaction set in parentheses.
pub fn render_patterns<T, W>( patterns: &PatternCollection<T>, out: &mut W ) -> Result<(), String> where
    T: Item + ToString,
    W: Write,
{
    for pattern in patterns.iter() {
	let items: Vec<String> = pattern.sorted_items().iter()
	    .map( |item| item.to_string() )
	    .collect();
	writeln!( out, "{} ({})", items.join( " " ), pattern.transaction_count() )
	    .map_err( |e| e.to_string() )?;
    }
    Ok( () )
}

/// Serializable view of a mined pattern
#[derive(Serialize)]
pub struct PatternSummary<T> {
    pub items: Vec<T>,
    pub transaction_ids: Vec<TrId>,
}

pub fn summarize<T: Item>( patterns: &PatternCollection<T> ) -> Vec<PatternSummary<T>> {
    patterns.iter()
	.map( |pattern| PatternSummary{
	    items: pattern.sorted_items(),
	    transaction_ids: pattern.sorted_transaction_ids(),
	})
	.collect()
}

/// Writes the mined patterns to a JSON file
pub fn write_patterns_json<T>( patterns: &PatternCollection<T>, path: &Path ) -> Result<(), String> where
    T: Item + Serialize,
{
    let summaries = summarize( patterns );
    let rendered = serde_json::to_string_pretty( &summaries ).map_err( |e| e.to_string() )?;
    let mut file = File::create( path ).map_err( |e| format!( "{}: {}", path.display(), e ))?;
    write!( file, "{}", rendered ).map_err( |e| e.to_string() )
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::pattern::Pattern;

    #[test]
    fn test_parse_transaction() {
	assert_eq!( parse_transaction( "3 1 2" ).unwrap(), vec!( 1, 2, 3 ));
	assert_eq!( parse_transaction( "  7\t7 5 " ).unwrap(), vec!( 5, 7 )); // deduplicated
	assert_eq!( parse_transaction( "" ).unwrap(), Vec::<u32>::new() );
	assert!( parse_transaction( "1 x 2" ).is_err() );
	assert!( parse_transaction( "-1" ).is_err() );
    }

    #[test]
    fn test_render_patterns() {
	let mut patterns: PatternCollection<u32> = PatternCollection::new();
	patterns.add_pattern( Pattern::from_parts( vec!( 2, 0, 1 ), vec!( 0, 1 )));
	patterns.add_pattern( Pattern::from_parts( vec!( 5 ), vec!( 2, 3, 4 )));

	let mut out: Vec<u8> = Vec::new();
	render_patterns( &patterns, &mut out ).unwrap();
	assert_eq!( String::from_utf8( out ).unwrap(), "0 1 2 (2)\n5 (3)\n" );
    }

    #[test]
    fn test_summaries_serialize_deterministically() {
	let mut patterns: PatternCollection<u32> = PatternCollection::new();
	patterns.add_pattern( Pattern::from_parts( vec!( 9, 4 ), vec!( 3, 1 )));

	let rendered = serde_json::to_string( &summarize( &patterns )).unwrap();
	assert_eq!( rendered, r#"[{"items":[4,9],"transaction_ids":[1,3]}]"# );
    }
}
