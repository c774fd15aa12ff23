//! shopboard - E-commerce analytics dashboard client

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shopboard_core::{
    render, BoardConfig, Dashboard, HttpBackend, PanelInputs, PanelKind, PanelStatus, PanelView,
    RenderOptions,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "shopboard",
    version,
    about = "E-commerce analytics dashboard client",
    long_about = "Queries the analytics backend and prints one dashboard panel.\n\
                  \n\
                  Examples:\n\
                    shopboard kpi --date 2024-06-01\n\
                    shopboard cohort --start 2024-01 --end 2024-06 --horizon 6\n\
                    shopboard rfm --as-of 2024-06-30 --export\n\
                    shopboard top-products --metric revenue --n 5 --start 2024-01-01 --end 2024-03-31\n\
                  \n\
                  Environment Variables:\n\
                    SHOPBOARD_API_URL                # Backend base URL\n\
                    SHOPBOARD_CONFIG                 # Config file path\n\
                    SHOPBOARD_NO_COLOR               # Disable ANSI colors\n\
                    RUST_LOG                         # Log filter (default shopboard=info)"
)]
struct Cli {
    #[command(subcommand)]
    panel: PanelCommand,

    /// Backend base URL (overrides config)
    #[arg(long, global = true, env = "SHOPBOARD_API_URL")]
    api_url: Option<String>,

    /// Config file (default: <config dir>/shopboard/config.json)
    #[arg(long, global = true, env = "SHOPBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print the raw payload as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI colors
    #[arg(long, global = true, env = "SHOPBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum PanelCommand {
    /// Daily KPI cards
    Kpi {
        #[arg(long)]
        date: Option<String>,
    },
    /// Revenue by month and category
    Revenue {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Monthly repeat purchase rate
    RepeatRate {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Cohort retention heatmap
    Cohort {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Months tracked after acquisition
        #[arg(long, default_value = "12")]
        horizon: String,
    },
    /// RFM customer segmentation
    Rfm {
        #[arg(long)]
        as_of: Option<String>,
        /// Write the full result as CSV
        #[arg(long)]
        export: bool,
        /// Directory for the CSV (overrides config)
        #[arg(long, requires = "export")]
        export_dir: Option<PathBuf>,
    },
    /// Best products by metric
    TopProducts {
        /// margin | revenue | units
        #[arg(long, default_value = "margin")]
        metric: String,
        #[arg(long, default_value = "10")]
        n: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Products below their reorder point
    LowStock {
        #[arg(long, default_value = "20")]
        n: String,
    },
    /// Orders by fulfilment status
    Funnel {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}

impl PanelCommand {
    fn kind(&self) -> PanelKind {
        match self {
            PanelCommand::Kpi { .. } => PanelKind::Kpi,
            PanelCommand::Revenue { .. } => PanelKind::Revenue,
            PanelCommand::RepeatRate { .. } => PanelKind::RepeatRate,
            PanelCommand::Cohort { .. } => PanelKind::Cohort,
            PanelCommand::Rfm { .. } => PanelKind::Rfm,
            PanelCommand::TopProducts { .. } => PanelKind::TopProducts,
            PanelCommand::LowStock { .. } => PanelKind::LowStock,
            PanelCommand::Funnel { .. } => PanelKind::Funnel,
        }
    }

    /// Inputs as the user gave them; missing values are left for validation
    fn inputs(&self) -> PanelInputs {
        let mut inputs = PanelInputs::new();
        let mut put = |name: &str, value: Option<&String>| {
            if let Some(value) = value {
                inputs.set(name, value.as_str());
            }
        };
        match self {
            PanelCommand::Kpi { date } => put("date", date.as_ref()),
            PanelCommand::Revenue { start, end }
            | PanelCommand::RepeatRate { start, end }
            | PanelCommand::Funnel { start, end } => {
                put("start", start.as_ref());
                put("end", end.as_ref());
            }
            PanelCommand::Cohort {
                start,
                end,
                horizon,
            } => {
                put("start", start.as_ref());
                put("end", end.as_ref());
                put("horizon", Some(horizon));
            }
            PanelCommand::Rfm { as_of, .. } => put("as_of", as_of.as_ref()),
            PanelCommand::TopProducts {
                metric,
                n,
                start,
                end,
            } => {
                put("metric", Some(metric));
                put("n", Some(n));
                put("start", start.as_ref());
                put("end", end.as_ref());
            }
            PanelCommand::LowStock { n } => put("n", Some(n)),
        }
        inputs
    }
}

fn init_tracing() {
    // Logs go to stderr so tables and JSON on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopboard=info,shopboard_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> BoardConfig {
    let mut config = cli
        .config
        .clone()
        .or_else(BoardConfig::default_path)
        .map(|path| BoardConfig::load(&path))
        .unwrap_or_default();

    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = Some(secs);
    }
    config
}

/// A successful response can still render as an error (undecodable rows)
fn ends_in_error(status: PanelStatus, view: &PanelView) -> bool {
    status == PanelStatus::Error || matches!(view, PanelView::Error { .. })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli);
    debug!(api = %config.api_base_url, "Using backend");

    let backend = HttpBackend::from_config(&config).context("Failed to create HTTP client")?;
    let dashboard = Dashboard::new(backend);

    let kind = cli.panel.kind();
    let status = dashboard.dispatch(kind, &cli.panel.inputs()).await;
    let state = dashboard.snapshot(kind);

    let options = RenderOptions {
        rfm_preview_rows: config.rfm_preview_rows,
    };
    let view = render(kind, &state, &options);

    if cli.json {
        println!("{}", cli::format_json(&state)?);
    } else {
        println!("{}", cli::format_view(kind, &view, cli.no_color));
    }

    if ends_in_error(status, &view) {
        return Ok(ExitCode::FAILURE);
    }

    if let PanelCommand::Rfm {
        export: true,
        export_dir,
        ..
    } = &cli.panel
    {
        let dir = export_dir.clone().unwrap_or(config.export_dir.clone());
        match dashboard.write_rfm_export(&dir) {
            Ok(path) => eprintln!("Exported {}", path.display()),
            Err(e) => {
                eprintln!("Export failed: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shopboard").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_top_products_defaults() {
        let cli = parse(&["top-products", "--start", "2024-01-01", "--end", "2024-12-31"]);
        assert_eq!(cli.panel.kind(), PanelKind::TopProducts);
        let inputs = cli.panel.inputs();
        assert_eq!(inputs.get("metric"), Some("margin"));
        assert_eq!(inputs.get("n"), Some("10"));
        assert_eq!(inputs.get("end"), Some("2024-12-31"));
    }

    #[test]
    fn test_missing_dates_left_for_validation() {
        let cli = parse(&["cohort", "--start", "2024-01"]);
        let inputs = cli.panel.inputs();
        assert_eq!(inputs.get("horizon"), Some("12"));
        assert_eq!(inputs.get("end"), None);
        assert!(inputs.query_for(PanelKind::Cohort).is_err());
    }

    #[test]
    fn test_export_dir_requires_export() {
        let result = Cli::try_parse_from([
            "shopboard",
            "rfm",
            "--as-of",
            "2024-06-30",
            "--export-dir",
            "/tmp",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_api_url_flag_overrides_config() {
        let cli = parse(&[
            "low-stock",
            "--api-url",
            "http://analytics:8080",
            "--config",
            "/nonexistent/shopboard.json",
        ]);
        let config = load_config(&cli);
        assert_eq!(config.api_base_url, "http://analytics:8080");
        assert_eq!(config.rfm_preview_rows, 100);
    }

    #[test]
    fn test_undecodable_success_ends_in_error() {
        let mut state = shopboard_core::PanelState::new();
        let generation = state.begin_loading();
        let body = serde_json::json!([
            {"cohort_month": "2024-01", "cohort_size": 5, "months_since": 0, "retention_rate": 100},
            {"cohort_month": "2024-01", "cohort_size": 5, "months_since": 0, "retention_rate": 80}
        ]);
        let records = shopboard_types::TabularRecord::from_json_body(body).unwrap();
        state.resolve(generation, Ok(records));

        let view = render(PanelKind::Cohort, &state, &RenderOptions::default());
        assert_eq!(state.status(), PanelStatus::Success);
        assert!(ends_in_error(state.status(), &view));
    }

    #[test]
    fn test_rendered_table_is_not_an_error() {
        let mut state = shopboard_core::PanelState::new();
        let generation = state.begin_loading();
        let body = serde_json::json!([{"status": "delivered", "orders": 3, "percentage": "100.00"}]);
        let records = shopboard_types::TabularRecord::from_json_body(body).unwrap();
        state.resolve(generation, Ok(records));

        let view = render(PanelKind::Funnel, &state, &RenderOptions::default());
        assert!(!ends_in_error(state.status(), &view));
    }
}
