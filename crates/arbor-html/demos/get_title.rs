//! Print the text of a document's `<title>` element.
//!
//! Walks the tree by hand: the document element, then its `<head>`, then
//! the `<title>` inside it, whose first child must be text.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use arbor_html::{NodeKind, Tag};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "get_title")]
#[command(about = "Print the title of an HTML file", long_about = None)]
struct Cli {
    /// HTML file to read
    file: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbor_html=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let title = arbor_html::parse_with(&bytes, |document| -> Result<String> {
        let root = document
            .root()
            .first_child()
            .and_then(|node| node.as_element())
            .context("document has no root element")?;
        let Some(head) = root.child(Tag::Head) else {
            bail!("<head> element not found");
        };
        let Some(title) = head.child(Tag::Title) else {
            bail!("<title> element not found");
        };
        let Some(text) = title.node().first_child() else {
            bail!("empty <title> element");
        };
        match (text.kind(), text.as_text()) {
            (NodeKind::Text, Some(text)) => Ok(text.text().to_string()),
            _ => bail!("invalid <title> element"),
        }
    })
    .with_context(|| format!("Failed to parse {}", cli.file.display()))??;

    println!("{title}");
    Ok(())
}
