//! # Receipt Builders
//!
//! Text receipts for POS invoices, laid out for a 42-column roll, plus the
//! built-in sample ticket used by the test-print action.
//!
//! Invoice receipts are a single `command` segment of plain lines; the
//! encoder appends the feed and cut afterwards according to the profile's
//! [`PrintConfig`](crate::printer::PrintConfig). The sample ticket is
//! self-contained and already ends with its own cut.

use serde::{Deserialize, Serialize};

use crate::encoder::append_cut_command;
use crate::payload::{PrintPayload, Segment};
use crate::printer::{CutMode, ReceiptOptions};
use crate::protocol::commands;
use crate::protocol::text::{self, Alignment, LINE_WIDTH};

/// Tax descriptions are cut to this many characters.
const TAX_NAME_WIDTH: usize = 25;

/// Lines fed by the sample ticket before its cut.
const SAMPLE_FEED_LINES: u8 = 5;

// ============================================================================
// INVOICE MODEL
// ============================================================================

/// A POS Invoice as returned by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosInvoice {
    pub name: String,
    /// 0 = draft, 1 = submitted, 2 = cancelled
    pub docstatus: u8,
    pub company: Option<String>,
    pub owner: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub taxes: Vec<InvoiceTax>,
    pub grand_total: f64,
    pub paid_amount: f64,
    pub change_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceItem {
    pub item_code: String,
    pub item_name: String,
    pub qty: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceTax {
    pub description: String,
    pub tax_amount: f64,
}

/// Company primary address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
}

/// Lookups the renderer needs beyond the invoice itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptContext {
    pub address: Option<Address>,
    /// Company phone, used when there is no primary address
    pub company_phone: Option<String>,
    /// Display name of the invoice owner
    pub cashier: Option<String>,
}

// ============================================================================
// INVOICE RECEIPT
// ============================================================================

/// Render an invoice as receipt lines (without the trailing feed).
pub fn invoice_lines(
    invoice: &PosInvoice,
    options: &ReceiptOptions,
    ctx: &ReceiptContext,
) -> Vec<String> {
    let rule = "-".repeat(LINE_WIDTH);
    let double_rule = "=".repeat(LINE_WIDTH);
    let mut lines = Vec::new();

    // Header
    match invoice.docstatus {
        0 => lines.push("**** DRAFT RECEIPT ****".to_string()),
        1 => lines.push("**** FINAL RECEIPT ****".to_string()),
        _ => {}
    }

    let company = invoice.company.as_deref().unwrap_or("My Shop");
    lines.push(text::center(company, LINE_WIDTH));

    if options.show_address && invoice.company.is_some() {
        match &ctx.address {
            Some(addr) => {
                lines.extend(addr.address_line1.iter().filter(|s| !s.is_empty()).cloned());
                lines.extend(addr.city.iter().filter(|s| !s.is_empty()).cloned());
                if let Some(phone) = addr.phone.as_deref().filter(|s| !s.is_empty()) {
                    lines.push(format!("Tel: {}", phone));
                }
            }
            None => {
                if let Some(phone) = ctx.company_phone.as_deref().filter(|s| !s.is_empty()) {
                    lines.push(format!("Tel: {}", phone));
                }
            }
        }
    }

    lines.push(rule.clone());

    // Items
    for item in &invoice.items {
        if options.wrap_long_names {
            lines.extend(text::wrap(&item.item_name, LINE_WIDTH));
        } else {
            lines.push(item.item_name.clone());
        }

        if options.show_item_code {
            lines.push(format!("  [{}]", item.item_code));
        }

        let qty_rate = format!("{:.0} x {:.2}", item.qty, item.rate);
        lines.push(text::justify(&qty_rate, &format!("{:.2}", item.amount), LINE_WIDTH));
    }

    lines.push(rule.clone());

    // Taxes
    if options.show_tax {
        for tax in &invoice.taxes {
            let name = text::truncate(&tax.description, TAX_NAME_WIDTH);
            lines.push(text::justify(&name, &format!("{:.2}", tax.tax_amount), LINE_WIDTH));
        }
    }

    // Totals
    lines.push(double_rule.clone());
    for (label, value) in [
        ("TOTAL", invoice.grand_total),
        ("Paid", invoice.paid_amount),
        ("Change", invoice.change_amount),
    ] {
        lines.push(text::justify(label, &format!("{:.2}", value), LINE_WIDTH));
    }
    lines.push(double_rule);

    // Cashier
    if options.show_cashier {
        let cashier = ctx.cashier.as_deref().or(invoice.owner.as_deref());
        if let Some(name) = cashier {
            lines.push(format!("Cashier: {}", name));
            lines.push(rule);
        }
    }

    // Footer
    if let Some(footer) = options.custom_footer.as_deref().filter(|s| !s.is_empty()) {
        for line in text::wrap(footer, LINE_WIDTH) {
            lines.push(text::center(&line, LINE_WIDTH));
        }
    }

    lines
}

/// Render an invoice receipt as a single `command` segment.
pub fn render_invoice(
    invoice: &PosInvoice,
    options: &ReceiptOptions,
    ctx: &ReceiptContext,
) -> PrintPayload {
    let mut body = invoice_lines(invoice, options, ctx).join("\n");
    body.push_str("\n\n\n\n");

    let mut payload = PrintPayload::new();
    payload.push(Segment::command(body));
    payload
}

// ============================================================================
// SAMPLE TICKET
// ============================================================================

/// The test-print ticket: centred header, a few items, totals, thank-you
/// line, then a 5-line feed and full cut.
pub fn sample_receipt(printed_at: &str) -> PrintPayload {
    let rule = "-".repeat(LINE_WIDTH);
    let mut data = Vec::new();

    data.extend(commands::init());
    data.extend(commands::align(Alignment::Center));
    data.extend(b"NEXTPOS TEST PRINT\n");
    data.extend(commands::align(Alignment::Left));

    let mut body = vec![format!("Date: {}", printed_at), rule.clone()];
    body.push(text::justify("Item", "Qty   Price", LINE_WIDTH));
    body.push(rule.clone());
    for (item, qty, price) in [("Coffee", 1, 2.50), ("Sandwich", 2, 6.00), ("Water", 1, 1.50)] {
        body.push(text::justify(item, &format!("{}  {:>6.2}", qty, price), LINE_WIDTH));
    }
    body.push(rule);
    body.push(text::justify("TOTAL:", "10.00", LINE_WIDTH));
    for line in body {
        data.extend(line.as_bytes());
        data.push(commands::LF);
    }

    data.extend(b"\n\n");
    data.extend(commands::align(Alignment::Center));
    data.extend(b"Thank you for shopping!\n");
    data.extend(commands::align(Alignment::Left));

    let mut payload = PrintPayload::new();
    payload.push(Segment::hex(&data));
    append_cut_command(payload, CutMode::FullCut, SAMPLE_FEED_LINES)
}

/// Local timestamp in the format printed on the sample ticket.
pub fn current_datetime() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}
