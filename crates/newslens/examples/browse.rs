//! Browse a region's news feeds from the command line.
//!
//! Expects the index endpoint (and optionally an API key) in the
//! environment:
//!
//! ```bash
//! NEWSLENS_ENDPOINT=https://search.example.com \
//! NEWSLENS_API_KEY=... \
//! cargo run --example browse -- Western Colombo
//! ```

use newslens::{DatasetProfile, FeedBrowser, HttpIndexClient, IndexConfig, LevelPick};

fn main() -> Result<(), newslens::error::NewslensError> {
    newslens::init_logging(tracing::Level::INFO)?;

    let endpoint = std::env::var("NEWSLENS_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:9200".to_owned());
    let api_key = std::env::var("NEWSLENS_API_KEY").ok();

    let client = HttpIndexClient::new(IndexConfig { endpoint, api_key })?;
    let browser = FeedBrowser::new(client, DatasetProfile::sri_lanka());

    let provinces = browser.top_regions();
    if let Some(notice) = &provinces.notice {
        eprintln!("{notice}");
    }
    println!("Provinces: {}", provinces.names.join(", "));

    let mut args = std::env::args().skip(1);
    let province = args.next();
    let district = args.next();

    let profile = browser.profile().clone();
    let top = LevelPick::parse(province.as_deref(), profile.top_level());
    let sub = LevelPick::parse(district.as_deref(), profile.sub_level());

    if let LevelPick::Name(name) = &top {
        let districts = browser.child_regions(name);
        println!("Districts of {name}: {}", districts.names.join(", "));
    }

    let page = browser.fetch(&top, &sub, false);
    if let Some(notice) = &page.notice {
        eprintln!("{notice}");
    }
    println!("Total feeds: {}", page.total);
    for row in &page.rows {
        println!(
            "{:<10} {:<20} {:<6} {:<6} {:<6} {}",
            row.id, row.datetime, row.likes, row.views, row.shares, row.content
        );
    }
    Ok(())
}
