//! Price data access port.

use crate::domain::error::EvalError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Prices for `symbol` within `[start_date, end_date]`, in source order.
    ///
    /// A symbol with no rows in range may be returned as an empty series;
    /// the evaluation reports it as missing data.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, EvalError>;
}
