//! Generate command - writes sitemap.xml and robots.txt once

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use seogen_generator::{GenerationStats, Generator};

use super::load_config;

/// Run the generate command.
///
/// Scans the content tree and rewrites both output files.
pub fn run(config_path: &Path) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, "Starting generation");

    let config = load_config(config_path)?;
    let generator = Generator::from_config(config);
    println!();
    println!("  Scanning: {}", generator.content_dir().display());

    let stats = generator.run().wrap_err("Generation failed")?;

    print_stats(&stats);
    println!("  Duration: {:.2}s", start.elapsed().as_secs_f64());
    println!();

    tracing::info!(?stats, "Generation completed successfully");

    Ok(())
}

/// Print generation statistics in a user-friendly format.
pub(crate) fn print_stats(stats: &GenerationStats) {
    println!();
    println!("  Boards:    {:>4}", stats.boards());
    if !stats.board_names.is_empty() {
        println!("             {}", stats.board_names.join(", "));
    }
    println!("  Published: {:>4}", stats.published_posts);
    println!("  Featured:  {:>4}", stats.featured_posts);
    println!();
    println!("  ✓ sitemap.xml written: {}", stats.sitemap_path.display());
    println!("  ✓ robots.txt written:  {}", stats.robots_path.display());
}
