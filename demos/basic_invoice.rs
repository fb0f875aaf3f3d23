use chrono::NaiveDate;
use bijak::core::*;
use rust_decimal_macros::dec;

fn main() {
    let firm = FirmConfig::default();

    // An inter-state client: Delhi firm billing a Maharashtra company
    let client = ClientBuilder::new("Sahyadri Textiles Pvt Ltd")
        .gstin("27AAPFU0939F1ZV")
        .address("Plot 14, MIDC Bhosari")
        .city("Pune")
        .state("Maharashtra")
        .pincode("411026")
        .gst_treatment(GstTreatment::Registered)
        .build();

    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let existing: Vec<Invoice> = Vec::new();
    let number = next_invoice_number(&firm.series(), &existing, today);

    let invoice = InvoiceBuilder::new(number, today)
        .firm(firm)
        .client(&client)
        .add_line(
            LineItemBuilder::new("Statutory audit FY 2023-24", dec!(1), dec!(75000))
                .hsn_sac("998221")
                .detailed_description("Audit of books of accounts under the Companies Act")
                .build(),
        )
        .add_line(
            LineItemBuilder::from_input("GST return filing (monthly)", "3", "2500")
                .hsn_sac("998231")
                .build(),
        )
        .build()
        .expect("invoice should be valid");

    println!("Invoice: {}", invoice.invoice_number);
    println!("Date:    {}", invoice.invoice_date);
    println!("Client:  {}", client.name);
    println!("Supply:  {}", invoice.tax_mode.code());
    println!("---");
    for item in &invoice.items {
        println!(
            "  {} x {} @ {} = {}",
            item.quantity,
            item.description,
            item.rate,
            item.amount.unwrap_or_default()
        );
    }
    println!("---");
    println!("Subtotal: {}", invoice.subtotal);
    println!("CGST:     {}", invoice.cgst);
    println!("SGST:     {}", invoice.sgst);
    println!("IGST:     {}", invoice.igst);
    println!("Total:    {}", invoice.total);
    println!(
        "{}",
        legal_amount_line(invoice.total).expect("total is non-negative")
    );
}
