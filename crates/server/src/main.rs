//! POD Pricer — Etsy pricing calculator for print-on-demand products
//!
//! Usage:
//!   pod-pricer serve --port 3001                          — Launch the HTTP API
//!   pod-pricer calculate --item-price 24.95 --pod-base 12.20 --pod-ship 7.50 --buyer-shipping 6.95
//!   pod-pricer optimize --product-type hoodie            — Tiered prices for a product

mod config;
mod routes;
mod settings;

use clap::{Args, Parser, Subcommand};
use engine::{
    all_profiles, calculate_profit, optimize_pricing, FeeSettings, OptimizeRequest, Percent,
    PricingResult, ProfitRequest,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{load_app_config, AppConfig};
use crate::routes::{build_router, AppState};
use crate::settings::effective_fee_defaults;

pub(crate) const APP_VERSION: &str =
    concat!(env!("CARGO_PKG_VERSION"), "-", env!("POD_PRICER_GIT_HASH"));

#[derive(Parser)]
#[command(name = "pod-pricer")]
#[command(about = "Etsy pricing calculator for print-on-demand products", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Per-run fee overrides; percentages are whole numbers (6.5 = 6.5%)
#[derive(Args, Debug, Default)]
struct FeeArgs {
    #[arg(long)]
    listing_fee: Option<Decimal>,
    #[arg(long)]
    transaction_fee_pct: Option<Decimal>,
    #[arg(long)]
    payment_processing_pct: Option<Decimal>,
    #[arg(long)]
    payment_processing_fixed: Option<Decimal>,
    #[arg(long)]
    offsite_ads_pct: Option<Decimal>,
}

impl FeeArgs {
    fn to_settings(&self) -> FeeSettings {
        FeeSettings {
            listing_fee: self.listing_fee,
            transaction_fee_pct: self.transaction_fee_pct.map(Percent),
            payment_processing_pct: self.payment_processing_pct.map(Percent),
            payment_processing_fixed: self.payment_processing_fixed,
            offsite_ads_pct: self.offsite_ads_pct.map(Percent),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the pricing HTTP API
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value_t = 3001)]
        port: u16,
    },
    /// Fees, profit and margin for a listing price
    Calculate {
        #[arg(long)]
        item_price: Decimal,
        #[arg(long)]
        pod_base: Decimal,
        #[arg(long)]
        pod_ship: Decimal,
        #[arg(long)]
        buyer_shipping: Decimal,
        #[command(flatten)]
        fees: FeeArgs,
        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },
    /// Tiered price recommendations for a product type
    Optimize {
        #[arg(long, default_value = "")]
        product_type: String,
        #[arg(long)]
        target_profit: Option<Decimal>,
        #[arg(long)]
        min_profit: Option<Decimal>,
        #[arg(long)]
        max_profit: Option<Decimal>,
        #[arg(long)]
        pod_base: Option<Decimal>,
        #[arg(long)]
        pod_ship: Option<Decimal>,
        #[arg(long)]
        buyer_shipping: Option<Decimal>,
        /// Candidate price to check against the profit range
        #[arg(long)]
        item_price: Option<Decimal>,
        #[command(flatten)]
        fees: FeeArgs,
        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },
    /// List built-in product profiles
    Profiles,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug,engine=debug,persistence=debug,pod_pricer=debug")
    } else {
        EnvFilter::new("info,engine=info,persistence=info,pod_pricer=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_app_config()?;

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, &host, port).await?;
        }
        Commands::Calculate {
            item_price,
            pod_base,
            pod_ship,
            buyer_shipping,
            fees,
            json,
        } => {
            let request = ProfitRequest {
                item_price,
                buyer_shipping,
                pod_base,
                pod_ship,
                fee_overrides: fees.to_settings(),
            };
            cmd_calculate(&config, request, json).await?;
        }
        Commands::Optimize {
            product_type,
            target_profit,
            min_profit,
            max_profit,
            pod_base,
            pod_ship,
            buyer_shipping,
            item_price,
            fees,
            json,
        } => {
            let request = OptimizeRequest {
                product_type,
                target_profit,
                min_profit,
                max_profit,
                pod_base,
                pod_ship,
                buyer_shipping,
                item_price,
                fee_overrides: fees.to_settings(),
            };
            cmd_optimize(&config, request, json).await?;
        }
        Commands::Profiles => {
            cmd_profiles();
        }
    }

    Ok(())
}

async fn open_database(config: &AppConfig) -> anyhow::Result<persistence::Database> {
    persistence::Database::new(&config.db_path)
        .await
        .map_err(|e| {
            error!("Failed to initialize database: {}", e);
            anyhow::anyhow!("Database initialization failed: {}", e)
        })
}

// ============================================================================
// Serve command — Axum web server
// ============================================================================

async fn cmd_serve(config: AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    info!("POD Pricer v{} starting...", APP_VERSION);

    let db = open_database(&config).await?;
    let db_path = config.db_path.display().to_string();
    info!("Database initialized: {}", db_path);

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
    };
    let app = build_router(state);

    let addr: std::net::SocketAddr = format!("{}:{}", host, port).parse()?;
    println!("\n=== POD Pricer v{} ===", APP_VERSION);
    println!("Listening on http://{}", addr);
    println!("\nEndpoints:");
    println!("  GET    /api/health              - Health check");
    println!("  POST   /api/pricing/calculate   - Profit for a listing price");
    println!("  POST   /api/pricing/optimize    - Tiered prices for a product type");
    println!("  GET    /api/pricing/profiles    - Built-in product profiles");
    println!("  GET    /api/pricing/history     - Recent optimizer runs");
    println!("  GET    /api/settings/fees       - Fee defaults");
    println!("  PUT    /api/settings/fees       - Store seller fee defaults");
    println!("  DELETE /api/settings/fees       - Clear stored fee defaults");
    println!("\n  Database: {}", db_path);
    println!("\nPress Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Calculate / Optimize commands — CLI mode (no web server)
// ============================================================================

async fn cmd_calculate(config: &AppConfig, request: ProfitRequest, json: bool) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let defaults = effective_fee_defaults(config, db.pool()).await?;
    let response = calculate_profit(&request, &defaults)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("\n=== POD Pricer v{} ===", APP_VERSION);
    let fees = &response.inputs.fees;
    println!(
        "Fees: listing ${} | transaction {}% | processing {}% + ${} | offsite ads {}%",
        fees.listing_fee.unwrap_or_default(),
        fees.transaction_fee_pct.unwrap_or_default().0,
        fees.payment_processing_pct.unwrap_or_default().0,
        fees.payment_processing_fixed.unwrap_or_default(),
        fees.offsite_ads_pct.unwrap_or_default().0,
    );
    print_breakdown(&response.outputs);
    Ok(())
}

fn print_breakdown(r: &PricingResult) {
    println!();
    println!("  {:<18} {:>10}", "Item price", r.item_price);
    println!("  {:<18} {:>10}", "Buyer shipping", r.buyer_shipping);
    println!("  {:<18} {:>10}", "Gross revenue", r.gross_revenue);
    println!("  {}", "-".repeat(29));
    println!("  {:<18} {:>10}", "Transaction fee", r.transaction_fee);
    println!("  {:<18} {:>10}", "Processing fee", r.processing_fee);
    println!("  {:<18} {:>10}", "Offsite ads fee", r.offsite_ads_fee);
    println!("  {:<18} {:>10}", "Listing fee", r.listing_fee);
    println!("  {:<18} {:>10}", "Total fees", r.total_fees);
    println!("  {:<18} {:>10}", "Cost of goods", r.cost_of_goods);
    println!("  {}", "-".repeat(29));
    println!("  {:<18} {:>10}", "Profit", r.profit);
    println!("  {:<18} {:>10}", "Margin %", format_optional(r.margin_pct));
    println!("  {:<18} {:>10}", "Break-even price", format_optional(r.break_even_price));
}

fn format_optional(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}

async fn cmd_optimize(config: &AppConfig, request: OptimizeRequest, json: bool) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let defaults = effective_fee_defaults(config, db.pool()).await?;
    let response = optimize_pricing(&request, &defaults)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let insights = &response.market_insights;
    println!("\n=== POD Pricer v{} ===", APP_VERSION);
    println!(
        "Product: {} ({}){}",
        insights.product_label,
        insights.resolved_product_type,
        if insights.product_type_recognized {
            ""
        } else {
            " [unrecognised type, using default profile]"
        }
    );
    let bounds = &response.inputs.profit_bounds;
    println!(
        "Profit range: ${} - ${} (target ${})",
        bounds.min, bounds.max, bounds.target
    );

    let tiers = &response.pricing_tiers;
    println!(
        "\n  {:<14} {:>10} {:>10} {:>9}",
        "Tier", "Price", "Profit", "Margin%"
    );
    println!("  {}", "-".repeat(46));
    let rows = [
        ("Minimum", &tiers.minimum),
        ("Target", &tiers.target),
        ("Maximum", &tiers.maximum),
        ("Conservative", &tiers.recommended.conservative),
        ("Optimal", &tiers.recommended.optimal),
        ("Premium", &tiers.recommended.premium),
    ];
    for (name, tier) in rows {
        println!(
            "  {:<14} {:>10} {:>10} {:>9}",
            name,
            tier.item_price,
            tier.profit,
            format_optional(tier.margin_pct),
        );
    }

    if let Some(candidate) = &response.current_pricing {
        println!(
            "\nYour price ${}: profit ${} ({})",
            candidate.pricing.item_price,
            candidate.pricing.profit,
            if candidate.in_range {
                "in range"
            } else if !candidate.meets_minimum {
                "below minimum"
            } else {
                "above maximum"
            }
        );
    }

    println!(
        "\nCompetitive range: ${} - ${}",
        insights.competitive_range.low, insights.competitive_range.high
    );
    println!("\n{}", insights.recommendation);
    Ok(())
}

fn cmd_profiles() {
    let profiles = all_profiles();
    println!("\n{} product profiles:", profiles.len());
    println!(
        "  {:<12} {:<16} {:>8} {:>8} {:>8} {:>16}",
        "Key", "Label", "Base", "Ship", "Buyer", "Profit min/opt/max"
    );
    println!("  {}", "-".repeat(74));
    for p in profiles {
        println!(
            "  {:<12} {:<16} {:>8} {:>8} {:>8} {:>16}",
            p.key,
            p.label,
            p.costs.pod_base_cost,
            p.costs.pod_shipping_cost,
            p.costs.buyer_shipping,
            format!("{}/{}/{}", p.targets.min, p.targets.optimal, p.targets.premium),
        );
    }
}
