use super::allocator::allocate;
use super::types::{EstimateError, EstimateInputs, Instrument, PortfolioResult, Projection};

const MONTHS_PER_YEAR: u32 = 12;
const QUARTERS_PER_YEAR: u32 = 4;

/// Longest accepted horizon. Keeps compounding exponents well inside safe
/// integer range for unchecked arithmetic.
pub const MAX_YEARS: u32 = 100;

/// Lump sum with quarterly compounding.
pub fn fixed_deposit(principal: f64, annual_rate_pct: f64, years: u32) -> Projection {
    compound_lump_sum(principal, annual_rate_pct, years, QUARTERS_PER_YEAR)
}

/// Monthly deposit stream compounded monthly, payments at period start.
pub fn recurring_deposit(monthly_deposit: f64, annual_rate_pct: f64, years: u32) -> Projection {
    annuity_due(monthly_deposit, annual_rate_pct, years)
}

/// Same annuity-due shape as a recurring deposit, applied to the SIP
/// contribution and its own expected return.
pub fn sip(monthly_contribution: f64, annual_rate_pct: f64, years: u32) -> Projection {
    annuity_due(monthly_contribution, annual_rate_pct, years)
}

/// Lump sum with annual compounding.
pub fn mutual_fund(principal: f64, annual_rate_pct: f64, years: u32) -> Projection {
    compound_lump_sum(principal, annual_rate_pct, years, 1)
}

fn compound_lump_sum(
    principal: f64,
    annual_rate_pct: f64,
    years: u32,
    periods_per_year: u32,
) -> Projection {
    // Zero duration keeps the principal as-is instead of letting the
    // exponent silently collapse to 1.
    if years == 0 {
        return Projection {
            invested: principal,
            returns: 0.0,
            total: principal,
        };
    }

    let rate_per_period = annual_rate_pct / 100.0 / periods_per_year as f64;
    let periods = (periods_per_year * years) as i32;
    let total = principal * (1.0 + rate_per_period).powi(periods);
    Projection {
        invested: principal,
        returns: total - principal,
        total,
    }
}

fn annuity_due(contribution: f64, annual_rate_pct: f64, years: u32) -> Projection {
    let months = years * MONTHS_PER_YEAR;
    if months == 0 {
        return Projection {
            invested: 0.0,
            returns: 0.0,
            total: 0.0,
        };
    }

    let invested = contribution * months as f64;
    let monthly_rate = annual_rate_pct / 100.0 / MONTHS_PER_YEAR as f64;
    // The closed form divides by the monthly rate; at zero the simple-sum
    // limit applies.
    if monthly_rate == 0.0 {
        return Projection {
            invested,
            returns: 0.0,
            total: invested,
        };
    }

    let growth_factor = (1.0 + monthly_rate).powi(months as i32);
    let total = contribution * ((growth_factor - 1.0) / monthly_rate) * (1.0 + monthly_rate);
    Projection {
        invested,
        returns: total - invested,
        total,
    }
}

fn validate(inputs: &EstimateInputs) -> Result<(), EstimateError> {
    if !inputs.total_amount.is_finite() || inputs.total_amount <= 0.0 {
        return Err(EstimateError::InvalidAmount(inputs.total_amount));
    }
    if inputs.years == 0 || inputs.years > MAX_YEARS {
        return Err(EstimateError::InvalidYears(inputs.years));
    }
    for instrument in Instrument::ALL {
        let rate = inputs.rates.percent(instrument);
        if !rate.is_finite() || rate < 0.0 {
            return Err(EstimateError::InvalidRate {
                instrument: instrument.key(),
                rate,
            });
        }
    }
    Ok(())
}

/// Splits the total amount per the liquidity allocation, projects each
/// instrument with its own rate, and aggregates the results.
///
/// fd and mf invest their share upfront; rd and sip convert theirs into an
/// equivalent monthly contribution over the full horizon, so the sum of
/// invested amounts reconstitutes the total.
pub fn project(inputs: &EstimateInputs) -> Result<PortfolioResult, EstimateError> {
    validate(inputs)?;

    let allocation = allocate(inputs.liquidity_factor);
    let months = (inputs.years * MONTHS_PER_YEAR) as f64;
    let share = |pct: u32| pct as f64 / 100.0 * inputs.total_amount;

    let fd = fixed_deposit(share(allocation.fd), inputs.rates.fd, inputs.years);
    let rd = recurring_deposit(share(allocation.rd) / months, inputs.rates.rd, inputs.years);
    let sip_result = sip(share(allocation.sip) / months, inputs.rates.sip, inputs.years);
    let mf = mutual_fund(share(allocation.mf), inputs.rates.mf, inputs.years);

    let parts = [fd, rd, sip_result, mf];
    Ok(PortfolioResult {
        allocation,
        fd,
        rd,
        sip: sip_result,
        mf,
        total_invested: parts.iter().map(|p| p.invested).sum(),
        total_returns: parts.iter().map(|p| p.returns).sum(),
        total_value: parts.iter().map(|p| p.total).sum(),
    })
}
