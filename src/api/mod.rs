use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Allocation, EstimateInputs, Instrument, InstrumentRates, MAX_LIQUIDITY, MAX_YEARS,
    MIN_LIQUIDITY, PortfolioResult, allocate, project,
};

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    about = "Liquidity-weighted investment return estimator (FD + RD + SIP + mutual funds)"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 1_000_000.0,
        help = "Total amount to invest, in whole currency units"
    )]
    amount: f64,
    #[arg(long, default_value_t = 10, help = "Investment horizon in years")]
    years: u32,
    #[arg(
        long,
        default_value_t = 5,
        help = "Liquidity preference from 1 (lowest) to 10 (highest); out-of-range values are clamped"
    )]
    liquidity: i32,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Fixed deposit annual rate in percent"
    )]
    fd_rate: f64,
    #[arg(
        long,
        default_value_t = 6.5,
        help = "Recurring deposit annual rate in percent"
    )]
    rd_rate: f64,
    #[arg(
        long,
        default_value_t = 12.0,
        help = "SIP expected annual return in percent"
    )]
    sip_rate: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Mutual fund expected annual return in percent"
    )]
    mf_rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EstimatePayload {
    amount: Option<f64>,
    years: Option<u32>,
    liquidity: Option<i32>,
    fd_rate: Option<f64>,
    rd_rate: Option<f64>,
    sip_rate: Option<f64>,
    mf_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AllocationPayload {
    liquidity: Option<i32>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
enum ContributionKind {
    LumpSum,
    Monthly,
}

impl From<Instrument> for ContributionKind {
    fn from(value: Instrument) -> Self {
        if value.is_monthly() {
            ContributionKind::Monthly
        } else {
            ContributionKind::LumpSum
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstrumentResult {
    key: &'static str,
    name: &'static str,
    contribution: ContributionKind,
    allocation_pct: u32,
    invested: f64,
    returns: f64,
    total: f64,
    growth_pct: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResponse {
    total_amount: f64,
    years: u32,
    liquidity_factor: i32,
    rates: InstrumentRates,
    allocation: Allocation,
    instruments: Vec<InstrumentResult>,
    total_invested: f64,
    total_returns: f64,
    total_value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    liquidity_factor: i32,
    allocation: Allocation,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<EstimateInputs, String> {
    if !cli.amount.is_finite() || cli.amount <= 0.0 {
        return Err("--amount must be > 0".to_string());
    }

    if cli.years == 0 || cli.years > MAX_YEARS {
        return Err(format!("--years must be between 1 and {MAX_YEARS}"));
    }

    for (name, rate) in [
        ("--fd-rate", cli.fd_rate),
        ("--rd-rate", cli.rd_rate),
        ("--sip-rate", cli.sip_rate),
        ("--mf-rate", cli.mf_rate),
    ] {
        if !rate.is_finite() || rate < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    Ok(EstimateInputs {
        total_amount: cli.amount,
        years: cli.years,
        liquidity_factor: cli.liquidity,
        rates: InstrumentRates {
            fd: cli.fd_rate,
            rd: cli.rd_rate,
            sip: cli.sip_rate,
            mf: cli.mf_rate,
        },
    })
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<EstimateInputs, String> {
    let payload = serde_json::from_str::<EstimatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: EstimatePayload) -> Result<EstimateInputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.amount {
        cli.amount = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.liquidity {
        cli.liquidity = v;
    }
    if let Some(v) = payload.fd_rate {
        cli.fd_rate = v;
    }
    if let Some(v) = payload.rd_rate {
        cli.rd_rate = v;
    }
    if let Some(v) = payload.sip_rate {
        cli.sip_rate = v;
    }
    if let Some(v) = payload.mf_rate {
        cli.mf_rate = v;
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        amount: 1_000_000.0,
        years: 10,
        liquidity: 5,
        fd_rate: 7.0,
        rd_rate: 6.5,
        sip_rate: 12.0,
        mf_rate: 10.0,
    }
}

fn build_estimate_response(inputs: &EstimateInputs, result: &PortfolioResult) -> EstimateResponse {
    let instruments = Instrument::ALL
        .into_iter()
        .map(|instrument| {
            let projection = result.projection(instrument);
            let growth_pct = if projection.invested > 0.0 {
                projection.returns / projection.invested * 100.0
            } else {
                0.0
            };
            InstrumentResult {
                key: instrument.key(),
                name: instrument.display_name(),
                contribution: instrument.into(),
                allocation_pct: result.allocation.percent(instrument),
                invested: projection.invested,
                returns: projection.returns,
                total: projection.total,
                growth_pct,
            }
        })
        .collect();

    EstimateResponse {
        total_amount: inputs.total_amount,
        years: inputs.years,
        liquidity_factor: inputs.liquidity_factor.clamp(MIN_LIQUIDITY, MAX_LIQUIDITY),
        rates: inputs.rates,
        allocation: result.allocation,
        instruments,
        total_invested: result.total_invested,
        total_returns: result.total_returns,
        total_value: result.total_value,
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/estimate",
            get(estimate_get_handler).post(estimate_post_handler),
        )
        .route("/api/allocation", get(allocation_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("estimator API listening on http://{addr}");

    axum::serve(listener, app).await
}

pub fn run_cli_estimate(args: &[String]) -> Result<(), String> {
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let inputs = build_inputs(cli)?;
    let result = project(&inputs).map_err(|e| e.to_string())?;
    let response = build_estimate_response(&inputs, &result);
    let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

async fn estimate_get_handler(Query(payload): Query<EstimatePayload>) -> Response {
    estimate_handler_impl(payload).await
}

async fn estimate_post_handler(Json(payload): Json<EstimatePayload>) -> Response {
    estimate_handler_impl(payload).await
}

async fn estimate_handler_impl(payload: EstimatePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => {
            warn!("rejected estimate request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match project(&inputs) {
        Ok(result) => json_response(StatusCode::OK, build_estimate_response(&inputs, &result)),
        Err(e) => {
            warn!("estimate failed: {e}");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

async fn allocation_handler(Query(payload): Query<AllocationPayload>) -> Response {
    let liquidity = payload.liquidity.unwrap_or(default_cli_for_api().liquidity);
    json_response(
        StatusCode::OK,
        AllocationResponse {
            liquidity_factor: liquidity.clamp(MIN_LIQUIDITY, MAX_LIQUIDITY),
            allocation: allocate(liquidity),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
