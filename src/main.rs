//! Chronomarks demo mode.
//!
//! Seeds an in-memory bookmarks bar with dated links scattered across a few
//! folders, runs the organizer once and prints the tree before and after.

use chrono::{Local, TimeZone};

use chronomarks::app::App;
use chronomarks::database::BOOKMARKS_BAR_ID;
use chronomarks::logging::init_tracing;
use chronomarks::managers::bookmark_tree::BookmarkTree;
use chronomarks::types::bookmark::BookmarkNode;

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

fn at(year: i32, month: u32, day: u32) -> DemoResult<i64> {
    Local
        .with_ymd_and_hms(year, month, day, 9, 30, 0)
        .single()
        .map(|t| t.timestamp_millis())
        .ok_or_else(|| format!("ambiguous local date {}-{}-{}", year, month, day).into())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_node(node: &BookmarkNode, depth: usize) {
    let pad = "  ".repeat(depth + 1);
    match &node.url {
        Some(url) => println!("{}🔗 {} <{}>", pad, node.title, url),
        None => {
            let children = node.children.as_deref().unwrap_or_default();
            println!("{}📁 {} ({})", pad, node.title, children.len());
            for child in children {
                print_node(child, depth + 1);
            }
        }
    }
}

async fn seed(app: &App) -> DemoResult<()> {
    let reading = app.tree.create_folder(BOOKMARKS_BAR_ID, "Reading").await?;
    let work = app.tree.create_folder(BOOKMARKS_BAR_ID, "Work").await?;
    let rust = app.tree.create_folder(&work.id, "Rust").await?;
    app.tree
        .add_link(BOOKMARKS_BAR_ID, "Start page", "https://start.example", at(2020, 1, 1)?)
        .await?;

    for (i, month) in [2u32, 5, 9, 11].into_iter().enumerate() {
        app.tree
            .add_link(&reading.id, &format!("Essay {}", i), &format!("https://essays.example/{}", i), at(2021, month, 3)?)
            .await?;
    }

    // A busy summer in 2022: enough links to split the year, then the season.
    for i in 0..32u32 {
        let month = 6 + i % 3;
        app.tree
            .add_link(&rust.id, &format!("Crate {}", i), &format!("https://crates.example/{}", i), at(2022, month, 1 + i % 27)?)
            .await?;
    }
    for (i, month) in [1u32, 4, 10, 12].into_iter().enumerate() {
        app.tree
            .add_link(&work.id, &format!("Ticket {}", i), &format!("https://tickets.example/{}", i), at(2022, month, 15)?)
            .await?;
    }

    app.tree
        .add_link(&reading.id, "Latest", "https://latest.example", at(2024, 3, 8)?)
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> DemoResult<()> {
    let _ = init_tracing("info");

    println!();
    println!("  Chronomarks v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!();

    let app = App::open_in_memory()?;
    seed(&app).await?;

    section("Before");
    print_node(&app.tree.get_tree().await?, 0);

    let report = app.organizer.run().await?;

    section("After");
    print_node(&app.tree.get_tree().await?, 0);

    section("Report");
    println!(
        "  {} links, {} year / {} season / {} month folders, {} old folders removed",
        report.links_collected,
        report.year_folders.len(),
        report.season_folders.len(),
        report.month_folders.len(),
        report.folders_removed
    );
    Ok(())
}
