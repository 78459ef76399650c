//! Home-loan EMI calculator shown on the property detail page

use crate::error::{Result, ZivaasError};

/// Monthly installment quote for a principal, annual rate and tenure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmiQuote {
    /// Monthly installment, rounded to whole rupees
    pub monthly_emi: f64,
    /// Total paid over the tenure
    pub total_amount: f64,
    /// Interest component of the total
    pub total_interest: f64,
}

impl EmiQuote {
    /// Quote for `principal` rupees at `annual_rate_pct` percent over
    /// `tenure_years` years.
    ///
    /// Uses the standard amortization formula
    /// `emi = p·r·(1+r)^n / ((1+r)^n − 1)` with the monthly rate
    /// `r = rate/1200`; a zero rate degenerates to straight-line `p/n`.
    ///
    /// # Errors
    /// Returns `ZivaasError::Validation` for a non-positive principal or
    /// tenure, or a negative rate
    pub fn calculate(principal: f64, annual_rate_pct: f64, tenure_years: f64) -> Result<Self> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(ZivaasError::validation("loan amount must be positive"));
        }
        if !annual_rate_pct.is_finite() || annual_rate_pct < 0.0 {
            return Err(ZivaasError::validation("interest rate cannot be negative"));
        }
        if !tenure_years.is_finite() || tenure_years <= 0.0 {
            return Err(ZivaasError::validation("loan tenure must be positive"));
        }

        let months = (tenure_years * 12.0).round();
        let monthly_rate = annual_rate_pct / (12.0 * 100.0);
        let emi = if monthly_rate == 0.0 {
            principal / months
        } else {
            let growth = (1.0 + monthly_rate).powf(months);
            (principal * monthly_rate * growth) / (growth - 1.0)
        };

        let monthly_emi = emi.round();
        let total_amount = (emi * months).round();
        Ok(Self {
            monthly_emi,
            total_amount,
            total_interest: total_amount - principal,
        })
    }
}
