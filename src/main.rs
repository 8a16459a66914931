use std::path::PathBuf;

use anyhow::{Context, Result};
use balai_monitor::{
    AppConfig, Clock, DateFilter, MonthGrid, PeriodStats, PeriodUnit, SortOrder, StoreClient,
    SystemClock, TablePage, month_grid,
};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "balai-monitor")]
#[command(about = "Community-center visit analytics - summary cards, table, calendar")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Visitor totals for a period, compared to the one before it
    Summary {
        #[arg(long, value_enum, default_value_t = UnitArg::Week)]
        unit: UnitArg,
        /// Reference date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Skip the period-over-period comparison
        #[arg(long)]
        no_comparison: bool,
    },
    /// Paginated table of daily visit records
    Table {
        /// Inclusive start of the date filter
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Inclusive end of the date filter
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Month calendar merging booking requests and scheduled events
    Calendar {
        /// Month to display as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Export all visit records to a timestamped CSV file
    Export {
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum UnitArg {
    Week,
    Month,
    Year,
}

impl From<UnitArg> for PeriodUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Week => PeriodUnit::Week,
            UnitArg::Month => PeriodUnit::Month,
            UnitArg::Year => PeriodUnit::Year,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("balai_monitor=debug");

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let client = StoreClient::new(config.store.base_url.clone(), &config.network)
        .context("Failed to create store client")?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(run(args.command, config, client))
}

async fn run(command: Command, config: AppConfig, client: StoreClient) -> Result<()> {
    let clock = SystemClock;

    match command {
        Command::Summary {
            unit,
            date,
            no_comparison,
        } => {
            let raw = client.fetch_visits().await?;
            tracing::debug!("Fetched {} visit records", raw.len());
            let records = balai_monitor::normalize(&raw);

            let today = date.unwrap_or_else(|| clock.today());
            let show_comparison = config.dashboard.show_comparison && !no_comparison;
            let stats =
                balai_monitor::aggregate_unit(&records, unit.into(), today, show_comparison);
            print_summary(&stats);
        }
        Command::Table {
            from,
            to,
            order,
            page,
        } => {
            let raw = client.fetch_visits().await?;
            let records = balai_monitor::normalize(&raw);

            let filter = DateFilter {
                start: from,
                end: to,
            };
            let page_size = config.table.page_size;
            let probe = balai_monitor::apply(&records, &filter, order.into(), page, page_size);
            let page = balai_monitor::clamp_page(page, probe.total_pages);
            let table = balai_monitor::apply(&records, &filter, order.into(), page, page_size);
            print_table(&table);
        }
        Command::Calendar { month } => {
            let (year, month) = match month {
                Some(raw) => parse_month(&raw)?,
                None => {
                    let today = clock.today();
                    (today.year(), today.month())
                }
            };

            let (data, token) = client.fetch_month_data().await?;
            if !client.is_current(token) {
                tracing::debug!("Discarding superseded calendar fetch");
                return Ok(());
            }
            let grid = month_grid(year, month, &data.bookings, &data.events);
            print_calendar(&grid, clock.today());
        }
        Command::Export { out } => {
            let raw = client.fetch_visits().await?;
            let records = balai_monitor::normalize(&raw);

            let path = balai_monitor::export_visits_csv(&records, &out, &clock)?;
            tracing::info!("Exported {} records to {}", records.len(), path.display());
        }
    }

    Ok(())
}

/// Parse a `YYYY-MM` month cursor.
fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let parsed = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{raw}', expected YYYY-MM"))?;
    Ok((parsed.year(), parsed.month()))
}

fn print_summary(stats: &PeriodStats) {
    println!("{}", stats.label);
    println!("  period: {}", stats.period);
    println!("  visitors: {}", stats.value);
    if let Some(cmp) = &stats.comparison {
        println!(
            "  vs previous: {} ({:+}, {:+}%)",
            cmp.previous, cmp.change, cmp.change_percent
        );
    }
}

fn print_table(table: &TablePage<'_>) {
    println!(
        "{:<12} {:>7} {:>6} {:>7} {:>7} {:>7} {:>7}",
        "date", "balita", "anak", "remaja", "dewasa", "lansia", "total"
    );
    for row in &table.rows {
        println!(
            "{:<12} {:>7} {:>6} {:>7} {:>7} {:>7} {:>7}",
            row.date_raw, row.balita, row.anak, row.remaja, row.dewasa, row.lansia, row.total
        );
    }

    let buttons: Vec<String> = balai_monitor::page_buttons(table.page, table.total_pages)
        .into_iter()
        .map(|b| {
            if b == table.page {
                format!("[{b}]")
            } else {
                b.to_string()
            }
        })
        .collect();
    println!(
        "page {} of {}   {}",
        table.page,
        table.total_pages,
        buttons.join(" ")
    );
}

fn print_calendar(grid: &MonthGrid, today: NaiveDate) {
    println!("{:04}-{:02}", grid.year, grid.month);
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");

    for (i, cell) in grid.cells.iter().enumerate() {
        match cell.day {
            None => print!("     "),
            Some(day) => {
                let marker = if grid.is_today(i, today) { '*' } else { ' ' };
                print!("{day:>3}{marker} ");
            }
        }
        if i % 7 == 6 {
            println!();
        }
    }
    if grid.cells.len() % 7 != 0 {
        println!();
    }

    for cell in grid.cells.iter().filter(|c| c.item_count() > 0) {
        let day = cell.day.unwrap_or_default();
        let shown_visits = cell.visits.iter().take(2);
        let mut shown = 0usize;
        for visit in shown_visits {
            println!(
                "  {day:>2}: visit {} ({} peserta, {})",
                visit.institution,
                visit.participants,
                visit.status.display_name()
            );
            shown += 1;
        }
        for event in cell.events.iter().take(2usize.saturating_sub(shown)) {
            println!("  {day:>2}: event {} ({})", event.title, event.time);
        }
        if cell.overflow() > 0 {
            println!("  {day:>2}: +{} more", cell.overflow());
        }
    }
}
