//! Market data grid walkthrough: sort toggles, range filter, page clamping
//!
//! Run with `RUST_LOG=gridview=debug cargo run --example market_grid` to see
//! the pipeline's tracing output.

use gridview::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TECHNOLOGIES: [&str; 20] = [
    "AI Diagnostics",
    "Telemedicine",
    "Surgical Robotics",
    "Gene Therapy",
    "Wearable Devices",
    "VR/AR Therapy",
    "Digital Therapeutics",
    "Precision Medicine",
    "Remote Monitoring",
    "AI Drug Discovery",
    "Robotic Surgery",
    "Mental Health Apps",
    "Blockchain Health",
    "IoT Medical Devices",
    "Nanotechnology",
    "Bioinformatics",
    "3D Bioprinting",
    "Smart Implants",
    "Health Analytics",
    "Mobile Health",
];

const STATUSES: [&str; 4] = ["Approved", "Under Review", "Pending", "Cleared"];
const RISKS: [&str; 3] = ["Low", "Medium", "High"];

/// Deterministic stand-in for the dashboard's mock market feed
fn market_rows() -> Vec<Row> {
    TECHNOLOGIES
        .iter()
        .enumerate()
        .map(|(i, tech)| {
            let i = i as i64;
            Row::new()
                .with("technology", *tech)
                .with("marketSize", (i * 17) % 50 + 5)
                .with("penetrationRate", (i * 29) % 80 + 20)
                .with("investmentVolume", (i * 7) % 15 + 1)
                .with("growthRate", (i * 13) % 40 + 10)
                .with("companies", (i * 97) % 500 + 50)
                .with("regulatoryStatus", STATUSES[(i % 4) as usize])
                .with("competitiveIndex", (i * 3) % 10 + 1)
                .with("riskLevel", RISKS[(i % 3) as usize])
        })
        .collect()
}

fn print_page(title: &str, grid: &GridView, result: &ViewResult) {
    let (meta, window) = grid.controls(result);

    println!("\n== {} ==", title);
    for row in &result.visible_rows {
        let cell = |key: &str| row.get(key).map(ToString::to_string).unwrap_or_default();
        println!(
            "  {:<22} ${:>3}B  {:>3}%  {:<12} {}",
            cell("technology"),
            cell("marketSize"),
            cell("growthRate"),
            cell("regulatoryStatus"),
            cell("riskLevel"),
        );
    }
    let buttons: Vec<String> = window.map(|i| (i + 1).to_string()).collect();
    println!(
        "  Showing {} to {} of {} technologies  [{}]  page {}/{}",
        meta.first_item,
        meta.last_item,
        meta.total,
        buttons.join(" "),
        meta.page,
        meta.total_pages,
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source = InMemoryDataSource::new(market_rows());
    let grid = GridView::new(Arc::new(GridConfig::market_data_default()));
    let dataset = source.snapshot()?;

    let state = grid.initial_state()?;
    let shown = grid.render(&dataset, &state)?;
    print_page("Default: market size, descending", &grid, &shown);

    let state = state.next_page(&shown);
    let shown = grid.render(&dataset, &state)?;
    print_page("Next page", &grid, &shown);

    let state = state.toggle_sort("growthRate").goto_page(0);
    print_page("Growth, ascending", &grid, &grid.render(&dataset, &state)?);

    let state = state.toggle_sort("growthRate");
    print_page("Growth, descending", &grid, &grid.render(&dataset, &state)?);

    let state = state
        .with_filter("marketSize", FilterPredicate::in_range(10, 40)?)
        .with_filter("riskLevel", FilterPredicate::one_of(["Low", "Medium"])?)
        .goto_page(7);
    print_page(
        "Mid-size, low/medium risk, page 8 requested",
        &grid,
        &grid.render(&dataset, &state)?,
    );

    if let Some(summary) = grid.summary(&dataset, &state, "growthRate") {
        println!(
            "\n  {} matching technologies, average growth {:.1}%, best {}%",
            summary.count, summary.mean, summary.max
        );
    }

    let bad = state.toggle_sort("sparkline");
    if let Err(e) = grid.render(&dataset, &bad) {
        println!("\n  Rejected: {}", serde_json::to_string(&e.to_response())?);
    }

    Ok(())
}
