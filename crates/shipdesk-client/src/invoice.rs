//! Buy4me invoice drafting.

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

/// Default service fee charged on Buy4me purchases, in percent.
pub const DEFAULT_SERVICE_FEE_PERCENT: f64 = 5.0;

/// How the purchased goods travel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    /// Sea freight.
    #[default]
    Sea,
    /// Air freight.
    Air,
}

impl ShippingMethod {
    /// Parses `sea` or `air`, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sea" => Some(Self::Sea),
            "air" => Some(Self::Air),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sea => "sea",
            Self::Air => "air",
        }
    }
}

/// An invoice about to be issued for a Buy4me request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDraft {
    /// Product cost in Chinese yuan.
    pub product_cost_rmb: f64,
    /// Exchange rate, Ghana cedis per yuan.
    pub rmb_to_ghs_rate: f64,
    /// Shipping method.
    pub shipping_method: ShippingMethod,
    /// Service fee in percent of the converted cost.
    pub service_fee_percent: f64,
}

/// Amounts shown before the invoice is issued, in cedis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    /// Product cost converted to cedis.
    pub product_cost_ghs: f64,
    /// Service fee.
    pub service_fee: f64,
    /// Amount due.
    pub total: f64,
}

impl InvoiceDraft {
    /// Creates a draft with the default service fee, shipped by sea.
    #[must_use]
    pub const fn new(product_cost_rmb: f64, rmb_to_ghs_rate: f64) -> Self {
        Self {
            product_cost_rmb,
            rmb_to_ghs_rate,
            shipping_method: ShippingMethod::Sea,
            service_fee_percent: DEFAULT_SERVICE_FEE_PERCENT,
        }
    }

    /// Sets the shipping method.
    #[must_use]
    pub const fn shipping_method(mut self, method: ShippingMethod) -> Self {
        self.shipping_method = method;
        self
    }

    /// Sets the service fee percentage.
    #[must_use]
    pub const fn service_fee_percent(mut self, percent: f64) -> Self {
        self.service_fee_percent = percent;
        self
    }

    /// Checks the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid amount.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !(self.product_cost_rmb.is_finite() && self.product_cost_rmb > 0.0) {
            errors.add("product_cost_rmb", "Product cost must be greater than zero.");
        }
        if !(self.rmb_to_ghs_rate.is_finite() && self.rmb_to_ghs_rate > 0.0) {
            errors.add("rmb_to_ghs_rate", "Exchange rate must be greater than zero.");
        }
        if !(self.service_fee_percent.is_finite() && self.service_fee_percent >= 0.0) {
            errors.add("service_fee_percent", "Service fee cannot be negative.");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Computes the amounts, rounded to the pesewa.
    #[must_use]
    pub fn totals(&self) -> InvoiceTotals {
        let product_cost_ghs = self.product_cost_rmb * self.rmb_to_ghs_rate;
        let service_fee = product_cost_ghs * self.service_fee_percent / 100.0;
        InvoiceTotals {
            product_cost_ghs: round2(product_cost_ghs),
            service_fee: round2(service_fee),
            total: round2(product_cost_ghs + service_fee),
        }
    }
}

fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
