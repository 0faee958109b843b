mod allocator;
mod engine;
mod types;

pub use allocator::{MAX_LIQUIDITY, MIN_LIQUIDITY, allocate};
pub use engine::{MAX_YEARS, fixed_deposit, mutual_fund, project, recurring_deposit, sip};
pub use types::{
    Allocation, EstimateError, EstimateInputs, Instrument, InstrumentRates, PortfolioResult,
    Projection,
};
