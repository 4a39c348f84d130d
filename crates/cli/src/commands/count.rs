//! `lengthwise count`: Word count and token estimate using the gateway's rules.

use std::path::PathBuf;

use lengthwise_core::text;

pub async fn run(file: Option<PathBuf>, height: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(height) = height {
        println!("{} words fit a {height}px panel", text::words_for_height(height));
        return Ok(());
    }

    let source = super::read_source(file.as_deref())?;
    println!("Words:            {}", text::count_words(&source));
    println!("Estimated tokens: {}", text::estimate_tokens(&source));
    Ok(())
}
