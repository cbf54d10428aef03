//! mcbselect 命令行入口
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mcbselect::compare::parse_ids;
use mcbselect::utils::{format_breaking_capacity_value, format_standards_value};
use mcbselect::{
    CatalogCache, CatalogLoader, CatalogSource, ComparisonRowKey, ComparisonView, ConfigManager,
    MarketSection, McbPortal, RankScope, COMPARISON_ROWS,
};

#[derive(Parser, Debug)]
#[command(name = "mcbselect", version, about = "MCB catalog comparison and market rationale tool")]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 校验目录完整性，存在问题时以非零状态退出
    Validate {
        #[arg(long, default_value = mcbselect::config::DEFAULT_CATALOG_DIR)]
        catalog: PathBuf,
    },
    /// 对比产品并标记各行最优值
    Compare {
        #[arg(long, default_value = mcbselect::config::DEFAULT_CATALOG_DIR)]
        catalog: PathBuf,
        /// 逗号分隔的产品ID
        #[arg(long)]
        ids: String,
        #[arg(long, default_value_t = RankScope::AcrossSelection)]
        scope: RankScope,
        #[arg(long)]
        json: bool,
    },
    /// 输出厂商的市场分区
    Market {
        #[arg(long, default_value = mcbselect::config::DEFAULT_CATALOG_DIR)]
        catalog: PathBuf,
        /// 厂商ID，缺省为首个启用的厂商
        #[arg(long)]
        manufacturer: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// 规范化标签
    Tags {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// 将目录写为 MessagePack 快照
    Snapshot {
        #[arg(long, default_value = mcbselect::config::DEFAULT_CATALOG_DIR)]
        catalog: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_portal(catalog: PathBuf, scope: RankScope) -> Result<McbPortal> {
    let config = ConfigManager::custom()
        .catalog_source(CatalogSource::detect(catalog))
        .rank_scope(scope)
        .build();
    let source = config.catalog_source.path().display().to_string();
    McbPortal::new(config).with_context(|| format!("Failed to load catalog from {}", source))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Validate { catalog } => {
            let portal = open_portal(catalog, RankScope::default())?;
            let report = portal.validate();
            for issue in &report.issues {
                eprintln!("- {}", issue);
            }
            if !report.is_ok() {
                bail!("[validate] {}", report.summary());
            }
            println!("[validate] {}", report.summary());
        }
        Command::Compare { catalog, ids, scope, json } => {
            let portal = open_portal(catalog, scope)?;
            let requested = parse_ids(&ids);
            let selection = portal.select(requested.iter().cloned());
            if selection.len() < requested.len() {
                warn!(
                    "{} of {} requested products were skipped (unknown, duplicate or over limit)",
                    requested.len() - selection.len(),
                    requested.len()
                );
            }
            let view = portal.compare(&selection);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_comparison(&view);
            }
        }
        Command::Market { catalog, manufacturer, json } => {
            let portal = open_portal(catalog, RankScope::default())?;
            let sections = match manufacturer {
                Some(id) => portal.market_sections_for(&id)?,
                None => match portal.default_manufacturer() {
                    Some(id) => portal.market_sections(id),
                    None => bail!("Catalog has no enabled manufacturer"),
                },
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&sections)?);
            } else {
                print_markets(&sections);
            }
        }
        Command::Tags { tags } => {
            for tag in mcbselect::normalize_tags(&tags) {
                println!("{}", tag);
            }
        }
        Command::Snapshot { catalog, out } => {
            let loaded = CatalogLoader::load(&CatalogSource::detect(catalog))?;
            CatalogCache::save(&out, &loaded)?;
            info!("Snapshot written to {}", out.display());
        }
    }

    Ok(())
}

fn display_value(key: ComparisonRowKey, value: &str) -> String {
    match key {
        ComparisonRowKey::BreakingCapacity => format_breaking_capacity_value(value),
        ComparisonRowKey::StandardsApprovals => format_standards_value(value),
        _ => value.to_string(),
    }
}

fn print_comparison(view: &ComparisonView) {
    if view.columns.is_empty() {
        println!("No products selected");
        return;
    }

    let header: Vec<&str> = view.columns.iter().map(|column| column.label.as_str()).collect();
    println!("{}", header.join(" | "));

    for row in COMPARISON_ROWS {
        println!("\n{}", row.label);
        for column in &view.columns {
            let value = column.comparison.raw(row.key).unwrap_or_default();
            let marker = if view.is_best(row.key, &column.column_id) { "*" } else { " " };
            let text = display_value(row.key, value).replace('\n', " / ");
            println!("  {} {:<24} {}", marker, column.label, text);
        }
    }
}

fn print_markets(sections: &[MarketSection]) {
    for section in sections {
        println!("== {} ==", section.market_name);
        if !section.summary_tags.is_empty() {
            println!("   {}", section.summary_tags.join(" · "));
        }
        for row in &section.rows {
            println!(
                "  - {} | {} | {} | {}",
                row.series,
                row.standards,
                row.breaking_capacity,
                row.rated_current
            );
            for tag in &row.compact_tags {
                let mark = if tag.has_evidence { "+" } else { "-" };
                println!("      [{}] {}", mark, tag.tag_value);
            }
        }
        if let Some(focus) = &section.default_focus {
            println!("  focus: {} / {}", focus.row_id, focus.tag_id);
        }
    }
}
