//! AutoOps CLI - Inspect events and override decisions from the terminal
//!
//! Usage:
//!     autoops list --filter payout_approval
//!     autoops show evt_1001
//!     autoops override evt_1002 --reason "Approved after manual audit" --select 1
//!     autoops watch

use std::time::Duration;

use autoops_client::{ClientConfig, Console, DetailLoad};
use autoops_core::{Event, EventDetail, FilterKey};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "autoops")]
#[command(about = "AutoOps manager console")]
#[command(version)]
struct Args {
    /// API base URL (default: $AUTOOPS_API_URL or http://localhost:3000/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (show debug logs)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List events
    List {
        /// all, shift_coverage, payout_approval, onboarding, feedback_processing, unclassified
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Show an event with its decision and alternatives
    Show {
        event_id: String,
    },

    /// Override the decision recorded for an event
    Override {
        event_id: String,

        /// Justification, at least 10 characters
        #[arg(short, long)]
        reason: String,

        /// Index of the alternative to select instead
        #[arg(short, long)]
        select: Option<usize>,
    },

    /// Print the event list every refresh interval
    Watch {
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "autoops_client=debug"
    } else {
        "autoops_client=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url.clone() {
        config.base_url = url;
    }

    let console = match Console::http(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::List { filter } => list(&console, &filter, args.json).await,
        Command::Show { event_id } => show(&console, &event_id, args.json).await,
        Command::Override {
            event_id,
            reason,
            select,
        } => override_decision(&console, &event_id, reason, select, args.json).await,
        Command::Watch { filter } => watch(&console, &filter).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn apply_filter(console: &Console, filter: &str) -> Result<(), String> {
    let key: FilterKey = filter.parse().map_err(|e| format!("{}", e))?;
    console.set_filter(key).await;
    Ok(())
}

async fn list(console: &Console, filter: &str, json: bool) -> Result<(), String> {
    apply_filter(console, filter).await?;
    let events = console.visible_events().await.map_err(|e| e.to_string())?;

    if json {
        print_json(&events)?;
    } else {
        print_events(&events, console.filter().await);
    }
    Ok(())
}

async fn show(console: &Console, event_id: &str, json: bool) -> Result<(), String> {
    console.select(event_id).await;
    let detail = match console.load_selected_detail().await.map_err(|e| e.to_string())? {
        DetailLoad::Loaded(detail) => detail,
        DetailLoad::Stale | DetailLoad::NothingSelected => {
            return Err(format!("No detail loaded for {}", event_id))
        }
    };

    if json {
        print_json(&detail)?;
    } else {
        print_detail(&detail);
    }
    Ok(())
}

async fn override_decision(
    console: &Console,
    event_id: &str,
    reason: String,
    select: Option<usize>,
    json: bool,
) -> Result<(), String> {
    let response = console
        .override_event(event_id, reason, select)
        .await
        .map_err(|e| e.to_string())?;

    if json {
        print_json(&response)?;
    } else {
        println!(
            "Override recorded for {} at {}",
            response.event_id,
            response.overridden_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

async fn watch(console: &Console, filter: &str) -> Result<(), String> {
    apply_filter(console, filter).await?;
    let period = Duration::from_millis(console.config().refresh_interval_ms.max(1));
    let mut ticker = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        match console.refresh_visible().await {
            Ok(events) => print_events(&events, console.filter().await),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}

fn print_events(events: &[Event], filter: FilterKey) {
    println!("{} ({} events)", filter.label(), events.len());
    println!("{}", "-".repeat(72));
    for event in events {
        let shift = event
            .shift_id
            .as_ref()
            .map(|s| format!(" • Shift #{}", s))
            .unwrap_or_default();
        println!(
            "{:<12} {:<13} {}",
            event.id,
            event.status.label(),
            event.summary
        );
        println!(
            "{:<12} {}{}  {}",
            "",
            event.employee,
            shift,
            event.timestamp.format("%b %d, %H:%M")
        );
    }
}

fn print_detail(detail: &EventDetail) {
    let event = &detail.event;
    println!("{} [{}]", event.summary, event.status.label());
    println!("  Event:     {}", event.id);
    println!("  Employee:  {}", event.employee);
    let scheduled = event.scheduled();
    if !scheduled.is_empty() {
        println!("  Scheduled: {}", scheduled);
    }

    let Some(decision) = &detail.decision else {
        println!();
        println!("No decision recorded.");
        return;
    };

    println!();
    println!("Decision: {}", decision.action);
    if let Some(policy) = &decision.policy {
        println!("  Policy: {}", policy);
    }
    println!("  {}", decision.reason);

    if let Some(record) = &decision.override_record {
        println!(
            "  Overridden {}: {}",
            record.overridden_at.format("%Y-%m-%d %H:%M"),
            record.reason
        );
    }

    if decision.alternatives.is_empty() {
        return;
    }

    println!();
    println!("Alternatives:");
    for (index, alt) in decision.alternatives.iter().enumerate() {
        let marker = if alt.selected { "*" } else { " " };
        println!(
            " {} [{}] {:<24} {:>5.1}%",
            marker,
            index,
            alt.name,
            alt.score * 100.0
        );
        for reason in alt.supporting_reasons() {
            println!("         + {}", reason);
        }
        for reason in alt.exclusion_reasons() {
            println!("         - {}", reason);
        }
    }
}
