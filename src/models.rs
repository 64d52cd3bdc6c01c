//! Data models for the quote engine.
//!
//! The `models` module defines the serialisable structs and enums that
//! flow into and out of the estimator: the shipment quote request, the
//! itemised cost breakdown, and the batch input/result wrappers.  These
//! types derive `Serialize` and `Deserialize` so that they can be
//! accepted from and returned to HTTP clients as JSON.  Field names are
//! serialised in camelCase to match the wire format used by the
//! exporter dashboard that submits these requests.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Incoterms accepted on a quote request.
///
/// The incoterm describes which party bears shipping cost and risk at
/// each stage of the journey.  It is carried through to the quotation
/// record but does not alter the cost arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterm {
    /// Free on Board: seller delivers goods to the carrier.
    #[default]
    Fob,
    /// Cost, Insurance and Freight: seller pays transport and insurance.
    Cif,
    /// Ex Works: buyer collects from the seller's premises.
    Exw,
    /// Delivered Duty Paid: seller delivers to the buyer's door.
    Ddp,
}

impl Incoterm {
    /// All incoterms the quote form offers, in display order.
    pub const ALL: [Incoterm; 4] = [Incoterm::Fob, Incoterm::Cif, Incoterm::Exw, Incoterm::Ddp];

    /// Human-readable label, e.g. `"FOB (Free on Board)"`.
    pub fn label(&self) -> &'static str {
        match self {
            Incoterm::Fob => "FOB (Free on Board)",
            Incoterm::Cif => "CIF (Cost, Insurance, Freight)",
            Incoterm::Exw => "EXW (Ex Works)",
            Incoterm::Ddp => "DDP (Delivered Duty Paid)",
        }
    }

    /// One-line description shown alongside the label.
    pub fn description(&self) -> &'static str {
        match self {
            Incoterm::Fob => "Seller delivers goods to carrier",
            Incoterm::Cif => "Seller pays for transport and insurance",
            Incoterm::Exw => "Buyer collects from seller's premises",
            Incoterm::Ddp => "Seller delivers to buyer's door",
        }
    }
}

/// Product categories the quote form offers.  The category is recorded
/// on the quotation but does not currently affect the rate lookup,
/// which is keyed only by destination.
pub const PRODUCT_CATEGORIES: [&str; 8] = [
    "Textiles & Apparel",
    "Pharmaceuticals",
    "Agricultural Products",
    "Electronics",
    "Handicrafts",
    "Food Products",
    "Chemicals",
    "Machinery",
];

/// A single shipment to be quoted.
///
/// Requests typically originate from a web form, so the numeric fields
/// accept either a JSON number or a string; empty or unparseable text
/// deserialises to zero rather than failing the whole request.  See
/// [`ShipmentQuoteRequest::validate`] for the strict variant used at
/// the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentQuoteRequest {
    /// Declared value of the goods, in the exporter's currency unit.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub product_value: f64,
    /// Number of units shipped.  Informational only; totals are driven
    /// by value and weight.
    #[serde(default, deserialize_with = "lenient_count")]
    pub quantity: u32,
    /// Gross shipment weight in kilograms.  Drives freight, port and
    /// handling charges.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub weight_kg: f64,
    /// Destination country.  Destinations without a rate card are
    /// priced with the default rates.
    #[serde(default)]
    pub destination_country: String,
    /// Trade term for this shipment.  Recorded, not priced.
    #[serde(default)]
    pub incoterm: Incoterm,
    /// Product category from the quote form.  Recorded, not priced.
    #[serde(default)]
    pub product_category: String,
    /// Whether the exporter asked for cargo insurance.  Reserved:
    /// insurance is currently always charged at the flat rate.
    #[serde(default = "default_true")]
    pub insurance_required: bool,
    /// Whether the shipment needs special handling.  Reserved for a
    /// future surcharge.
    #[serde(default)]
    pub special_handling: bool,
}

impl Default for ShipmentQuoteRequest {
    fn default() -> Self {
        ShipmentQuoteRequest {
            product_value: 0.0,
            quantity: 0,
            weight_kg: 0.0,
            destination_country: String::new(),
            incoterm: Incoterm::default(),
            product_category: String::new(),
            insurance_required: true,
            special_handling: false,
        }
    }
}

impl ShipmentQuoteRequest {
    /// Strict validation for callers that want to reject bad input
    /// instead of pricing it as zero.
    ///
    /// Blank fields deserialising to zero remain acceptable; only
    /// values that are present and negative, or not finite, are
    /// rejected.  The estimator itself never calls this and stays
    /// total over any request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.product_value.is_finite() {
            return Err(ValidationError::NotFinite { field: "productValue" });
        }
        if !self.weight_kg.is_finite() {
            return Err(ValidationError::NotFinite { field: "weightKg" });
        }
        if self.product_value < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "productValue",
                value: self.product_value,
            });
        }
        if self.weight_kg < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "weightKg",
                value: self.weight_kg,
            });
        }
        Ok(())
    }
}

/// Error returned by [`ShipmentQuoteRequest::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A numeric field carries a negative amount.
    #[error("{field} must be non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f64 },
    /// A numeric field is NaN or infinite.
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

/// Fully itemised landed-cost breakdown for a single shipment.
///
/// Every amount is in the same currency unit as the request's product
/// value.  `total_cost` is the exact sum of the product value and the
/// six charge components; no rounding is applied until presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Product value as priced (negative input contributes zero).
    pub product_value: f64,
    /// Weight times the destination freight rate per kg.
    pub freight_cost: f64,
    /// Flat 0.2% of product value.
    pub insurance_cost: f64,
    /// Product value times the destination customs duty rate.
    pub duty_amount: f64,
    /// Weight times the per-kg port charge.
    pub port_charges: f64,
    /// Weight times the per-kg handling charge.
    pub handling_charges: f64,
    /// Fixed documentation fee.
    pub documentation_fees: f64,
    /// Freight plus port plus handling.
    pub total_logistics: f64,
    /// Duty plus documentation.
    pub total_compliance: f64,
    /// Product value plus all six charge components.
    pub total_cost: f64,
    /// Total cost marked up by 15%.
    pub suggested_price: f64,
    /// Margin of the suggested price over total cost, in percent.
    pub profit_margin: f64,
}

/// A priced quote: the request it answers, the breakdown, and details
/// about the rate card that priced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    /// The request this quote answers.
    pub request: ShipmentQuoteRequest,
    /// The itemised cost breakdown.
    pub breakdown: CostBreakdown,
    /// Which rate card priced this quote (destination and version, or
    /// the default card for unknown destinations).
    pub details: serde_json::Value,
}

impl QuoteResult {
    /// Flattened record of the headline figures, suitable for a saved
    /// quotation or a downstream document generator.
    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            destination_country: self.request.destination_country.clone(),
            incoterm: self.request.incoterm,
            product_category: self.request.product_category.clone(),
            total_cost: self.breakdown.total_cost,
            suggested_price: self.breakdown.suggested_price,
            profit_margin: self.breakdown.profit_margin,
        }
    }
}

/// Headline figures of a quote, without the full breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub destination_country: String,
    pub incoterm: Incoterm,
    pub product_category: String,
    pub total_cost: f64,
    pub suggested_price: f64,
    pub profit_margin: f64,
}

/// Input to the batch quoting entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBatchInput {
    /// The shipments to quote.  Each is priced independently.
    pub quotes: Vec<ShipmentQuoteRequest>,
}

/// Result of a batch run.  Results appear in the same order as the
/// requests that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBatchResult {
    pub results: Vec<QuoteResult>,
}

fn default_true() -> bool {
    true
}

/// Accepts a JSON number or numeric string; anything else becomes 0.
/// Matches the upstream form behaviour of coercing empty or invalid
/// numeric text to zero instead of failing the request.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer) {
        Ok(Raw::Number(n)) => n,
        Ok(Raw::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Same coercion as [`lenient_decimal`], for integer counts.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = lenient_decimal(deserializer)?;
    if n.is_finite() && n > 0.0 {
        Ok(n as u32)
    } else {
        Ok(0)
    }
}
