//! Issue two invoices through the in-memory store and write the second as PDF.
//!
//! Set `RUST_LOG=bijak=debug` to see the numbering and store events.

use bijak::core::*;
use bijak::render::{InvoiceView, render_pdf};
use bijak::store::{InvoiceStore, MemoryStore, issue_invoice, summarize};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let firm = FirmConfig::default();
    let store = MemoryStore::new();
    let today = today_in_india();

    let local = store.create_client(
        ClientBuilder::new("Rajouri Traders")
            .city("New Delhi")
            .state("Delhi")
            .build(),
    )?;
    let outstation = store.create_client(
        ClientBuilder::new("Sahyadri Textiles Pvt Ltd")
            .gstin("27AAPFU0939F1ZV")
            .city("Pune")
            .state("Maharashtra")
            .build(),
    )?;

    for client in [&local, &outstation] {
        let draft = InvoiceBuilder::new("", today)
            .firm(firm.clone())
            .client(client)
            .add_line(
                LineItemBuilder::new("Professional services", dec!(1), dec!(10000))
                    .hsn_sac("998221")
                    .build(),
            )
            .build_unchecked()?;
        let issued = issue_invoice(&store, draft, &firm.series(), today)?;
        println!("issued {} for {}", issued.invoice_number, client.name);
    }

    let latest = store
        .list_invoices()?
        .into_iter()
        .next()
        .ok_or("no invoices")?;
    let invoice = store.get_invoice(&latest.id)?;
    let client = store.get_client(&invoice.client_id)?;

    let view = InvoiceView::build(&invoice, &client, None, &firm)?;
    println!("{}", view.to_text());

    let pdf = render_pdf(&view)?;
    std::fs::write(&view.file_name, &pdf)?;
    println!("wrote {} ({} bytes)", view.file_name, pdf.len());

    let dashboard = summarize(&store)?;
    println!(
        "{} clients, {} invoices, revenue {}, pending {}",
        dashboard.total_clients,
        dashboard.total_invoices,
        dashboard.total_revenue,
        dashboard.pending_amount
    );
    Ok(())
}
