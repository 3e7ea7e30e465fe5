
use std::path::PathBuf;

use clap::Parser;

use pandamine::{io, mine, MiningConfig};

/// Finds approximate patterns in datasets with noise.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Max number of patterns
    #[arg( short = 'k', long = "max-patterns", default_value_t = 8 )]
    max_patterns: usize,

    /// Pattern complexity weight
    #[arg( short = 'w', long = "complexity-weight", default_value_t = 0.8 )]
    complexity_weight: f64,

    /// Row tolerance ratio, 1.0 disables the check
    #[arg( short = 'y', long = "row-noise", default_value_t = 1.0 )]
    max_row_noise: f64,

    /// Column tolerance ratio, 1.0 disables the check
    #[arg( short = 'c', long = "column-noise", default_value_t = 1.0 )]
    max_column_noise: f64,

    /// Also write the mined patterns to this path as JSON
    #[arg( long )]
    json: Option<PathBuf>,

    /// Log candidate decisions
    #[arg( short, long )]
    verbose: bool,

    /// The dataset to process
    filename: PathBuf,
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    prepare_logging( cli.verbose );

    let dataset = io::read_transactions( &cli.filename )?;
    let config = MiningConfig{
	max_patterns: cli.max_patterns,
	max_row_noise: cli.max_row_noise,
	max_column_noise: cli.max_column_noise,
	complexity_weight: cli.complexity_weight,
    };
    let patterns = mine( dataset, config )?;

    println!( "Patterns:" );
    let stdout = std::io::stdout();
    io::render_patterns( &patterns, &mut stdout.lock() )?;

    if let Some( path ) = &cli.json {
	io::write_patterns_json( &patterns, path )?;
    }

    Ok( () )
}

fn prepare_logging( verbose: bool ) {
    let level = if verbose {
	tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
	tracing_subscriber::filter::LevelFilter::INFO
    };
    let tracer = tracing_subscriber::fmt::fmt()
	.with_max_level( level )
	.with_writer( std::io::stderr )
	.finish();
    tracing::subscriber::set_global_default( tracer ).unwrap();
}
