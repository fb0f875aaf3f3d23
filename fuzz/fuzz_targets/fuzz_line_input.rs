#![no_main]

use bijak::core::{LineItemBuilder, TaxMode, compute_totals, total_in_words};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (quantity, rate) = data;
    // Raw form input must never panic, and always yields a non-negative line.
    let item = LineItemBuilder::from_input("fuzz", quantity, rate).build();
    for mode in [TaxMode::IntraState, TaxMode::InterState] {
        let totals = compute_totals(mode, std::slice::from_ref(&item));
        assert!(!totals.total.is_sign_negative() || totals.total.is_zero());
        let _ = total_in_words(totals.total);
    }
});
