use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::SourceArgs;
use crate::config::Config;
use crate::slide::Slide;

/// Fetch the slide list once and print it.
pub fn run(args: &SourceArgs, json: bool) -> Result<()> {
    let config = Config::load_or_default();
    let source = args.build(&config)?;
    let slides = source
        .list_slides()
        .with_context(|| format!("Failed to load slides from {}", source.describe()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&slides)?);
        return Ok(());
    }

    if slides.is_empty() {
        println!("{}", "No slides available.".yellow());
        return Ok(());
    }

    print!("{}", render_table(&slides));
    println!(
        "{}",
        format!("{} slide(s) from {}", slides.len(), source.describe()).dimmed()
    );
    Ok(())
}

fn render_table(slides: &[Slide]) -> String {
    let title_width = slides
        .iter()
        .map(|s| s.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("TITLE".len());

    let mut out = format!(
        "{:>3}  {:>6}  {:<title_width$}  {}\n",
        "#", "ID", "TITLE", "URL"
    );
    for (index, slide) in slides.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:>6}  {:<title_width$}  {}\n",
            index + 1,
            slide.id,
            slide.title,
            slide.url
        ));
    }
    out
}
