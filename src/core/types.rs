use serde::Serialize;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instrument {
    FixedDeposit,
    RecurringDeposit,
    Sip,
    MutualFund,
}

impl Instrument {
    /// Canonical instrument order. The allocator also uses it as the
    /// tie-break order when fractional remainders are equal.
    pub const ALL: [Instrument; 4] = [
        Instrument::FixedDeposit,
        Instrument::RecurringDeposit,
        Instrument::Sip,
        Instrument::MutualFund,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Instrument::FixedDeposit => "fd",
            Instrument::RecurringDeposit => "rd",
            Instrument::Sip => "sip",
            Instrument::MutualFund => "mf",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Instrument::FixedDeposit => "Fixed Deposit",
            Instrument::RecurringDeposit => "Recurring Deposit",
            Instrument::Sip => "SIP",
            Instrument::MutualFund => "Mutual Funds",
        }
    }

    /// fd and mf take their share as an upfront lump sum; rd and sip spread
    /// it over equal monthly contributions.
    pub fn is_monthly(self) -> bool {
        matches!(self, Instrument::RecurringDeposit | Instrument::Sip)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Allocation {
    pub fd: u32,
    pub rd: u32,
    pub sip: u32,
    pub mf: u32,
}

impl Allocation {
    pub fn percent(self, instrument: Instrument) -> u32 {
        match instrument {
            Instrument::FixedDeposit => self.fd,
            Instrument::RecurringDeposit => self.rd,
            Instrument::Sip => self.sip,
            Instrument::MutualFund => self.mf,
        }
    }

    pub fn total(self) -> u32 {
        self.fd + self.rd + self.sip + self.mf
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct InstrumentRates {
    pub fd: f64,
    pub rd: f64,
    pub sip: f64,
    pub mf: f64,
}

impl InstrumentRates {
    pub fn percent(self, instrument: Instrument) -> f64 {
        match instrument {
            Instrument::FixedDeposit => self.fd,
            Instrument::RecurringDeposit => self.rd,
            Instrument::Sip => self.sip,
            Instrument::MutualFund => self.mf,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EstimateInputs {
    pub total_amount: f64,
    pub years: u32,
    pub liquidity_factor: i32,
    pub rates: InstrumentRates,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Projection {
    pub invested: f64,
    pub returns: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResult {
    pub allocation: Allocation,
    pub fd: Projection,
    pub rd: Projection,
    pub sip: Projection,
    pub mf: Projection,
    pub total_invested: f64,
    pub total_returns: f64,
    pub total_value: f64,
}

impl PortfolioResult {
    pub fn projection(&self, instrument: Instrument) -> Projection {
        match instrument {
            Instrument::FixedDeposit => self.fd,
            Instrument::RecurringDeposit => self.rd,
            Instrument::Sip => self.sip,
            Instrument::MutualFund => self.mf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("total amount must be a finite value > 0, got {0}")]
    InvalidAmount(f64),
    #[error("years must be between 1 and 100, got {0}")]
    InvalidYears(u32),
    #[error("{instrument} rate must be a finite percentage >= 0, got {rate}")]
    InvalidRate { instrument: &'static str, rate: f64 },
}
