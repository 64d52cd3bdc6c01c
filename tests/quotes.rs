//! End-to-end library tests: a form-origin JSON request priced
//! through the default schedule, batch quoting, and the summary
//! record derived from a priced quote.

use quote_engine::engine::{estimate, quote, run_quote_batch};
use quote_engine::models::{Incoterm, QuoteBatchInput, ShipmentQuoteRequest};
use quote_engine::rates::{load_rate_cards_from_dir, RateSchedule};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn form_submission_prices_like_the_dashboard() {
    let request: ShipmentQuoteRequest = serde_json::from_str(
        r#"{
            "productValue": "100000",
            "quantity": "400",
            "weightKg": "500",
            "destinationCountry": "USA",
            "incoterm": "FOB",
            "productCategory": "Handicrafts",
            "insuranceRequired": true,
            "specialHandling": false
        }"#,
    )
    .unwrap();
    request.validate().unwrap();

    let breakdown = estimate(&request, &RateSchedule::default());
    assert_close(breakdown.freight_cost, 60000.0);
    assert_close(breakdown.insurance_cost, 200.0);
    assert_close(breakdown.duty_amount, 8000.0);
    assert_close(breakdown.port_charges, 12500.0);
    assert_close(breakdown.handling_charges, 25000.0);
    assert_close(breakdown.total_cost, 210700.0);
    assert_close(breakdown.suggested_price, 242305.0);
    assert!((breakdown.profit_margin - 13.04).abs() < 0.01);
}

#[test]
fn partially_filled_form_never_fails() {
    let request: ShipmentQuoteRequest = serde_json::from_str(
        r#"{"productValue": "abc", "weightKg": "", "destinationCountry": "Germany"}"#,
    )
    .unwrap();
    let breakdown = estimate(&request, &RateSchedule::default());
    assert_eq!(breakdown.total_cost, 5000.0);
}

#[test]
fn batch_run_over_mixed_destinations() {
    let input = QuoteBatchInput {
        quotes: vec![
            ShipmentQuoteRequest {
                product_value: 100000.0,
                weight_kg: 500.0,
                destination_country: "USA".to_string(),
                ..Default::default()
            },
            ShipmentQuoteRequest {
                product_value: 1000.0,
                weight_kg: 10.0,
                destination_country: "Atlantis".to_string(),
                ..Default::default()
            },
        ],
    };
    let batch = run_quote_batch(input, &RateSchedule::default()).unwrap();
    assert_eq!(batch.results.len(), 2);
    assert_close(batch.results[0].breakdown.total_cost, 210700.0);
    assert_close(batch.results[1].breakdown.freight_cost, 1000.0);
    assert_close(batch.results[1].breakdown.duty_amount, 100.0);
    assert_eq!(batch.results[1].details["rateVersion"], "default");
}

#[test]
fn summary_carries_the_headline_figures() {
    let request = ShipmentQuoteRequest {
        product_value: 100000.0,
        weight_kg: 500.0,
        destination_country: "USA".to_string(),
        incoterm: Incoterm::Cif,
        product_category: "Electronics".to_string(),
        ..Default::default()
    };
    let result = quote(request, &RateSchedule::default());
    let summary = result.summary();
    assert_eq!(summary.destination_country, "USA");
    assert_eq!(summary.incoterm, Incoterm::Cif);
    assert_eq!(summary.product_category, "Electronics");
    assert_close(summary.total_cost, 210700.0);
    assert_close(summary.suggested_price, 242305.0);
}

#[test]
fn rate_cards_loaded_from_disk_override_builtins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("usa.json"),
        r#"{"destination": "USA", "version": "2026-Q1", "freight_per_kg": 110.0, "duty_rate": 0.06}"#,
    )
    .unwrap();

    let mut schedule = RateSchedule::default();
    schedule.extend(load_rate_cards_from_dir(dir.path()).unwrap());

    let request = ShipmentQuoteRequest {
        product_value: 1000.0,
        weight_kg: 10.0,
        destination_country: "USA".to_string(),
        ..Default::default()
    };
    let result = quote(request, &schedule);
    assert_close(result.breakdown.freight_cost, 1100.0);
    assert_close(result.breakdown.duty_amount, 60.0);
    assert_eq!(result.details["rateVersion"], "2026-Q1");
}
