#![no_main]

use bijak::core::{FinancialYear, InvoiceSeries};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let series = InvoiceSeries::default();
    let year = FinancialYear::starting(2024);
    let next = series.sequence_after(Some(data), year);
    assert!(next >= 1);
    let _ = data.parse::<FinancialYear>();
});
