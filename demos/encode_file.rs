use huffpack::{decode, encode};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = PathBuf::from(
        env::args()
            .nth(1)
            .ok_or("Please provide path to input file as first argument.")?,
    );
    let packed = input.with_extension("huff");
    let unpacked = input.with_extension("decoded");

    // encode scope - save to file
    {
        let stats = encode(&input, &packed)?;
        println!(
            "{}: {} bytes -> {} payload + {} header",
            input.display(),
            stats.original,
            stats.compressed,
            stats.header
        );
    }

    // decode scope - read from file
    {
        let stats = decode(&packed, &unpacked)?;
        println!("{}: restored {} bytes", unpacked.display(), stats.original);
    }

    if fs::read(&input)? != fs::read(&unpacked)? {
        return Err("decoded file differs from the input".into());
    }
    println!("round trip ok");

    Ok(())
}
