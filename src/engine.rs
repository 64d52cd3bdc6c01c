//! Landed-cost estimation engine.
//!
//! The `engine` module turns a [`ShipmentQuoteRequest`] into a
//! [`CostBreakdown`]: an itemised landed cost, a suggested sell price
//! and the resulting profit margin.  [`estimate`] is a pure function
//! of the request and the active [`RateSchedule`], with no hidden
//! state and no failure modes, so it can be unit tested without
//! mocks and called concurrently from any number of callers.  The
//! batch entry point uses the [`rayon`] crate to price independent
//! quotes across multiple CPU cores.

use crate::models::{
    CostBreakdown, QuoteBatchInput, QuoteBatchResult, QuoteResult, ShipmentQuoteRequest,
};
use crate::rates::{
    RateSchedule, DOCUMENTATION_FEE, HANDLING_CHARGE_PER_KG, INSURANCE_RATE, PORT_CHARGE_PER_KG,
    PRICE_MARKUP,
};
use anyhow::Result;
use rayon::prelude::*;
use serde_json::json;

/// Computes the full cost breakdown for one shipment.
///
/// Deterministic and total: the same request against the same schedule
/// always produces the same breakdown, and no input can make it fail.
/// Negative product value or weight contributes zero to every term,
/// preserving the form behaviour of treating unusable numeric input
/// as empty.  Unknown destinations price at the schedule's default
/// rates.
pub fn estimate(request: &ShipmentQuoteRequest, rates: &RateSchedule) -> CostBreakdown {
    let product_value = request.product_value.max(0.0);
    let weight_kg = request.weight_kg.max(0.0);

    let freight_cost = weight_kg * rates.freight_per_kg(&request.destination_country);
    let insurance_cost = product_value * INSURANCE_RATE;
    let duty_amount = product_value * rates.duty_rate(&request.destination_country);
    let port_charges = weight_kg * PORT_CHARGE_PER_KG;
    let handling_charges = weight_kg * HANDLING_CHARGE_PER_KG;
    let documentation_fees = DOCUMENTATION_FEE;

    let total_logistics = freight_cost + port_charges + handling_charges;
    let total_compliance = duty_amount + documentation_fees;
    let total_cost = product_value
        + freight_cost
        + insurance_cost
        + duty_amount
        + port_charges
        + handling_charges
        + documentation_fees;

    let suggested_price = total_cost * PRICE_MARKUP;
    let profit_margin = if suggested_price > 0.0 {
        (suggested_price - total_cost) / suggested_price * 100.0
    } else {
        0.0
    };

    CostBreakdown {
        product_value,
        freight_cost,
        insurance_cost,
        duty_amount,
        port_charges,
        handling_charges,
        documentation_fees,
        total_logistics,
        total_compliance,
        total_cost,
        suggested_price,
        profit_margin,
    }
}

/// Prices one request and records which rate card produced the quote.
pub fn quote(request: ShipmentQuoteRequest, rates: &RateSchedule) -> QuoteResult {
    let breakdown = estimate(&request, rates);
    let details = match rates.card(&request.destination_country) {
        Some(card) => json!({
            "rateDestination": card.destination,
            "rateVersion": card.version,
        }),
        None => json!({
            "rateDestination": request.destination_country,
            "rateVersion": "default",
        }),
    };
    QuoteResult {
        request,
        breakdown,
        details,
    }
}

/// Prices a batch of independent quote requests in parallel.
///
/// Each request is priced exactly as [`quote`] would price it on its
/// own; results keep the order of the input requests.
pub fn run_quote_batch(input: QuoteBatchInput, rates: &RateSchedule) -> Result<QuoteBatchResult> {
    let results: Vec<QuoteResult> = input
        .quotes
        .into_par_iter()
        .map(|request| quote(request, rates))
        .collect();
    Ok(QuoteBatchResult { results })
}
