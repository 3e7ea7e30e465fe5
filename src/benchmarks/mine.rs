
use std::time::Instant;

use rand::prelude::*;
use tracing::info;

use pandamine::{MiningConfig, PandaMiner, TransactionStore};

fn main() -> Result<(), String> {
    prepare_logging();

    let dataset = generate_planted_dataset( 2000, 64, 4, 0.05, 0.01, 7 );
    info!(
	"generated {} transactions, {} cells",
	dataset.len(), dataset.el_count(),
    );

    benchmark_mining( &dataset, 0.8 )?;
    benchmark_mining( &dataset, 0.5 )?;

    Ok( () )
}

fn benchmark_mining( dataset: &TransactionStore<u32>, complexity_weight: f64 ) -> Result<(), String> {
    let config = MiningConfig{ complexity_weight, ..MiningConfig::default() };
    let miner = PandaMiner::new( config )?;

    info!( "start mining with complexity weight {complexity_weight}" );
    let start = Instant::now();
    let patterns = miner.mine( dataset.clone() );
    info!(
	"mined {} patterns in {}ms",
	patterns.len(), start.elapsed().as_millis(),
    );
    for pattern in patterns.iter() {
	info!(
	    "pattern: {} items x {} transactions",
	    pattern.item_count(), pattern.transaction_count(),
	);
    }
    Ok( () )
}

/// Plants block patterns into a noisy binary matrix: every row belongs to one
/// block, keeps each block item with high probability and picks up background
/// items with low probability.
fn generate_planted_dataset(
    num_rows: usize,
    universe: u32,
    num_blocks: usize,
    drop_probability: f64,
    background_probability: f64,
    seed: u64,
) -> TransactionStore<u32> {
    let mut rng = StdRng::seed_from_u64( seed );
    let items_per_block = universe / num_blocks as u32;
    let rows_per_block = num_rows / num_blocks;

    let mut store = TransactionStore::new();
    for row in 0 .. num_rows {
	let block = ( row / rows_per_block ).min( num_blocks - 1 ) as u32;
	let block_items = block * items_per_block .. ( block + 1 ) * items_per_block;

	let mut items = Vec::new();
	for item in 0 .. universe {
	    let keep = if block_items.contains( &item ) {
		!rng.gen_bool( drop_probability )
	    } else {
		rng.gen_bool( background_probability )
	    };
	    if keep {
		items.push( item );
	    }
	}
	store.add_transaction( items );
    }
    store
}

fn prepare_logging() {
    let tracer = tracing_subscriber::fmt::fmt()
	.with_max_level( tracing_subscriber::filter::LevelFilter::INFO )
	.finish();
    tracing::subscriber::set_global_default( tracer ).unwrap();
}
