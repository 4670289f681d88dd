//! `lectio search` and `lectio parse`.
//!
//! Results go to stdout, either as the same JSON payload the HTTP server
//! returns (`--json`) or as a human-readable listing.

use anyhow::Result;

use lectio_core::reference::parse_query;
use lectio_core::router::{
    classify, CommentaryHit, DocumentHit, FreeTextResponse, ReferenceResponse, SearchResponse,
};

use crate::config::Config;
use crate::engine::Engine;

pub async fn run_search(config: &Config, query: &str, json: bool) -> Result<()> {
    let engine = Engine::open(config).await?;
    let result = engine.search(query).await;
    engine.close().await;
    let response = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match &response {
        SearchResponse::Reference(r) => print_reference(r),
        SearchResponse::FreeText(r) => print_free_text(r),
    }
    Ok(())
}

fn print_reference(resp: &ReferenceResponse) {
    if resp.references.is_empty() {
        println!("No references recognized.");
    }
    for reference in &resp.references {
        println!("{}", reference);
        for verse in resp.results.iter().filter(|v| {
            v.book == reference.book_id
                && v.chapter == reference.chapter
                && (reference.start_verse..=reference.end_verse).contains(&v.verse)
        }) {
            println!("  {:>3}  {}", verse.verse, verse.text);
        }
        println!();
    }

    if !resp.commentary.is_empty() {
        println!("--- Commentary ({}) ---", resp.commentary.len());
        for hit in &resp.commentary {
            print_commentary(hit);
        }
    }

    if !resp.documents.is_empty() {
        println!("--- Documents ({}) ---", resp.documents.len());
        print_documents(&resp.documents);
    }
}

fn print_commentary(hit: &CommentaryHit) {
    println!("[{}] {} / {}", hit.id, hit.h1, hit.breadcrumb);
    println!("    file: {}", hit.file_path);
    println!("    excerpt: \"{}\"", hit.content_snippet.replace('\n', " ").trim());
    println!();
}

fn print_free_text(resp: &FreeTextResponse) {
    if resp.results.is_empty() {
        println!("No results.");
        return;
    }
    print_documents(&resp.results);
}

fn print_documents(hits: &[DocumentHit]) {
    for (i, hit) in hits.iter().enumerate() {
        println!("{}. {}", i + 1, hit.h1);
        if !hit.breadcrumb.is_empty() {
            println!("    path: {}", hit.breadcrumb);
        }
        println!("    file: {}", hit.file_path);
        println!("    excerpt: \"{}\"", hit.content_snippet.replace('\n', " ").trim());
        println!("    contexts: {}", hit.contexts.len());
        println!();
    }
}

/// Print how a query would be routed without touching any store.
pub fn run_parse(config: &Config, query: &str) -> Result<()> {
    let parsed = parse_query(query, config.bible.default_translation);
    println!("kind:        {:?}", classify(query));
    println!(
        "translation: {}{}",
        parsed.translation,
        if parsed.explicit_translation { "" } else { " (default)" }
    );
    if parsed.references.is_empty() {
        println!("references:  none");
    } else {
        println!("references:");
        for r in &parsed.references {
            println!("  {}  [book {}]", r, r.book_id);
        }
    }
    Ok(())
}
