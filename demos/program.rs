use std::env;
use std::fs;

use nitrokit::Result;
use nitrokit::compression::prs::decompress;
use nitrokit::formats::narc::{Narc, is_narc};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: program <file.narc | file.prs>");
        return Ok(());
    };

    let raw = fs::read(&path)?;
    let archive = if is_narc(&raw) {
        raw
    } else {
        decompress(&raw)?
    };

    let narc = Narc::parse(&archive)?;
    println!(
        "{} directories, {} files",
        narc.directories.len(),
        narc.files.len()
    );
    for file in narc.files() {
        println!("{:>8}  {}", file.size(), file.name);
    }

    Ok(())
}
