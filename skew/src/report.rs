// skew/src/report.rs
//
// Console side of the RunReporter port: emoji progress lines, a pretty
// table for the most recent years, and the framing disclosure.

use comfy_table::{Cell as TCell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};

use skew_core::domain::summary::YearlySummary;
use skew_core::ports::{RunEvent, RunReporter};

/// Rows shown in the console summary table.
const RECENT_YEARS: usize = 10;

#[derive(Default)]
pub struct ConsoleReporter;

impl RunReporter for ConsoleReporter {
    fn report(&mut self, event: RunEvent<'_>) {
        match event {
            RunEvent::DatasetLoaded {
                source,
                records,
                span,
            } => {
                println!("📥 Loaded {} records from {}", records, source);
                match span {
                    Some(span) => println!("   Year range: {}", span),
                    None => println!("   Year range: (no rows)"),
                }
            }
            RunEvent::SummaryReady { table, range } => {
                println!(
                    "\n📊 Yearly summary: {} year(s) within {}",
                    table.len(),
                    range
                );
                if !table.is_empty() {
                    println!("{}", summary_table(table.last(RECENT_YEARS)));
                }
            }
            RunEvent::CategoriesReady { table } => {
                println!(
                    "   By {}: {} rows across {} categories",
                    table.dimension,
                    table.rows.len(),
                    table.categories().len()
                );
            }
            RunEvent::ArtifactWritten { kind, path } => {
                println!("💾 Wrote {} to {}", kind, path.display());
            }
            RunEvent::ArtifactFailed { kind, path, error } => {
                eprintln!("❌ Could not produce {} ({}): {}", kind, path.display(), error);
            }
            RunEvent::FramingDisclosed { chart } => {
                println!(
                    "\n🎭 Techniques used in the {} chart ({}):",
                    chart.narrative.stance(),
                    chart.narrative
                );
                for technique in &chart.techniques {
                    println!("  • {}", technique);
                }
            }
            RunEvent::Completed { .. } => {}
        }
    }
}

pub fn summary_table(rows: &[YearlySummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        TCell::new("year"),
        TCell::new("allegations"),
        TCell::new("substantiated"),
        TCell::new("rate (%)"),
    ]);

    for row in rows {
        table.add_row(vec![
            TCell::new(row.year()),
            TCell::new(row.total_allegations()).set_alignment(CellAlignment::Right),
            TCell::new(row.substantiated_count()).set_alignment(CellAlignment::Right),
            TCell::new(format!("{:.1}", row.substantiation_rate()))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
