//! `fireline` - CLI for incident intake and record keeping
//!
//! This binary drives the multi-step incident intake flow and the listing
//! and reporting commands over the local record store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use fireline::aggregate;
use fireline::cli::{
    Cli, Command, CompleteCommand, ConfigCommand, CreateCommand, ListCommand, ReportCommand,
    ShowCommand, StatusCommand,
};
use fireline::report::{self, ListFilter};
use fireline::{init_logging, Config, IncidentRecord, Store};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Create(cmd) => handle_create(&config, &cmd),
        Command::Complete(cmd) => handle_complete(&config, &cmd),
        Command::Abandon => handle_abandon(&config),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Report(cmd) => handle_report(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::open(config.database_path()).context("opening record store")
}

fn handle_create(config: &Config, cmd: &CreateCommand) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let entries = aggregate::parse_entries(&cmd.fields)?;
    let index = aggregate::begin_incident(&mut store, &entries, &config.form)?;

    println!("Created incident record {index} (pending).");
    println!("Complete it with: fireline complete <nature> -f <key>=<value> ...");
    Ok(())
}

fn handle_complete(config: &Config, cmd: &CompleteCommand) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let entries = aggregate::parse_entries(&cmd.fields)?;
    let nature = cmd.nature.into();

    match aggregate::complete_incident(&mut store, nature, &entries, &config.form) {
        Ok(index) => {
            println!("Incident record {index} completed as {nature}.");
            Ok(())
        }
        Err(err) if err.is_missing_anchor() => {
            eprintln!("{err}");
            eprintln!("Start a new incident with: fireline create -f <key>=<value> ...");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_abandon(config: &Config) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    if aggregate::abandon_draft(&mut store)? {
        println!("Abandoned the in-progress incident draft.");
    } else {
        println!("No incident intake is in progress.");
    }
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let records = store.records()?;

    let filter = ListFilter {
        status: cmd.status.map(Into::into),
        nature: cmd.nature.map(Into::into),
        limit: Some(cmd.limit),
    };
    let listed = report::filter_records(&records, &filter);

    if cmd.json {
        let rows: Vec<_> = listed
            .iter()
            .map(|(index, record)| serde_json::json!({ "index": index, "record": record }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if listed.is_empty() {
        println!("No matching records.");
    } else {
        for (index, record) in listed {
            println!("{}", format_record_line(index, record));
        }
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let records = store.records()?;
    let record = records
        .get(cmd.index)
        .with_context(|| format!("no record at index {}", cmd.index))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", format_record_line(cmd.index, record));
        println!("  basic: {}", serde_json::to_string(&record.basic)?);
        for (nature, payload) in &record.natures {
            println!("  {nature}: {}", serde_json::to_string(payload)?);
        }
    }
    Ok(())
}

fn handle_report(config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let summary = report::summarize(&store.records()?);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Incident report");
        println!("---------------");
        println!("Total:    {}", summary.total);
        println!("Pending:  {}", summary.pending);
        println!("Ready:    {}", summary.ready);
        if !summary.by_nature.is_empty() {
            println!();
            println!("By nature:");
            for (nature, count) in &summary.by_nature {
                println!("  {nature:<12} {count}");
            }
        }
        if let Some(oldest) = summary.oldest {
            println!();
            println!("Oldest:   {}", oldest.to_rfc3339());
        }
        if let Some(newest) = summary.newest {
            println!("Newest:   {}", newest.to_rfc3339());
        }
    }
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;

    if cmd.json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fireline status");
        println!("---------------");
        println!("Database:  {}", store.path().display());
        println!("Records:   {} ({} pending)", stats.total_records, stats.pending);
        match stats.draft_index {
            Some(index) => println!("Draft:     in progress at index {index}"),
            None => println!("Draft:     none"),
        }
        println!("Size:      {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:    {}", config.database_path().display());
                println!();
                println!("[Form]");
                println!("  Conflict policy:  {:?}", config.form.conflict_policy);
                println!("  Max value length: {}", config.form.max_value_length);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn format_record_line(index: usize, record: &IncidentRecord) -> String {
    let natures = if record.natures.is_empty() {
        "-".to_string()
    } else {
        record
            .natures
            .keys()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "{index:>4}  {}  {:<7}  {natures}",
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.status
    )
}
