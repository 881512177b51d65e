mod logger;

use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "huffpack", version)]
#[command(about = "Compress and decompress files with Huffman coding.", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
struct Cli {
    /// Compress the input file
    #[arg(short = 'c')]
    compress: bool,

    /// Decompress the input file
    #[arg(short = 'u')]
    decompress: bool,

    /// Input file
    #[arg(short, long)]
    file: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Print how long the run took
    #[arg(short = 't')]
    time: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let start = Instant::now();
    let result = if cli.compress {
        huffpack::encode(&cli.file, &cli.output)
            .map(|s| [s.original, s.compressed, s.header])
    } else {
        huffpack::decode(&cli.file, &cli.output)
            .map(|s| [s.compressed, s.original, s.header])
    };

    match result {
        Ok(sizes) => {
            for size in sizes {
                println!("{size}");
            }
            if cli.time {
                println!(
                    "Time of execution: {} seconds",
                    start.elapsed().as_secs_f64()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Huffman error!");
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
