//! # Ingestion
//!
//! Converts untrusted API JSON into typed invoices, and typed invoices back
//! into the wire shape the API stores.
//!
//! ## Coercion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Wire value                         │ Typed field                       │
//! │─────────────────────────────────────┼───────────────────────────────────│
//! │  "98765 43210" / 9876543210 / junk  │ phone: u64 (digits only, else 0)  │
//! │  "2" / 2 / 2.0 / junk               │ quantity: i64 (else 0)            │
//! │  "25000" / 25000.5 / junk           │ unit_price: Money (else 0)        │
//! │  true / "true" / 1                  │ flags: bool (else false)          │
//! │  null / missing products            │ products: []                      │
//! │  unknown deliveryStatus             │ DeliveryStatus::Pending           │
//! │  _id / id                           │ id: Option<String>                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here fails. A malformed field becomes its zero value and the rest
//! of the invoice still loads.

use serde_json::{json, Map, Value};

use crate::money::Money;
use crate::types::{
    CustomerDetails, DeliveryStatus, GstDetails, Invoice, LineItem, PaymentStatus, PaymentType,
    TransportDetails,
};

// =============================================================================
// Wire → Invoice
// =============================================================================

/// Builds an invoice from one API object. Non-objects yield a default invoice.
pub fn invoice_from_json(value: &Value) -> Invoice {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    Invoice {
        id: identifier(obj),
        invoice_no: text(obj.get("invoiceNo")),
        date: text(obj.get("date")),
        customer: customer_from(obj),
        gst: flag(obj.get("gst")),
        po: flag(obj.get("po")),
        quotation: flag(obj.get("quotation")),
        gst_details: gst_details_from(obj),
        products: products_from(obj.get("products")),
        transport: transport_from(obj.get("transportDetails")),
        payment_status: PaymentStatus::from(text(obj.get("paymentStatus"))),
        payment_type: PaymentType::from(text(obj.get("paymentType"))),
    }
}

/// Extracts the invoice list from a list response.
///
/// Accepts a bare array or an envelope with `data` or `invoices`. Any other
/// shape is treated as an empty list.
pub fn invoices_from_response(value: &Value) -> Vec<Invoice> {
    let list = match value {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj
            .get("data")
            .or_else(|| obj.get("invoices"))
            .and_then(Value::as_array),
        _ => None,
    };

    list.map(|items| items.iter().map(invoice_from_json).collect())
        .unwrap_or_default()
}

/// Extracts one invoice from a get/create/update response: a bare object or
/// an envelope with `data` or `invoice`.
pub fn invoice_from_response(value: &Value) -> Invoice {
    let inner = value
        .get("data")
        .or_else(|| value.get("invoice"))
        .filter(|v| v.is_object())
        .unwrap_or(value);
    invoice_from_json(inner)
}

fn identifier(obj: &Map<String, Value>) -> Option<String> {
    ["_id", "id"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .map(|v| text(Some(v)))
        .find(|id| !id.is_empty())
}

fn customer_from(obj: &Map<String, Value>) -> CustomerDetails {
    let details = obj.get("customerDetails");
    let field = |key: &str| details.and_then(|d| d.get(key));

    CustomerDetails {
        name: text(field("name").or_else(|| obj.get("customerName"))),
        phone: phone(field("phone")),
        email: text(field("email")),
        address: text(field("address")),
    }
}

fn gst_details_from(obj: &Map<String, Value>) -> GstDetails {
    let details = obj.get("gstDetails");
    // gstDetails.name, then gstDetails.gstName, then top-level gstName
    let field = |key: &str, alias: &str| {
        details
            .and_then(|d| d.get(key).or_else(|| d.get(alias)))
            .or_else(|| obj.get(alias))
    };

    GstDetails {
        name: text(field("name", "gstName")),
        number: text(field("number", "gstNumber")),
        phone: phone(field("phone", "gstPhone")),
        email: text(field("email", "gstEmail")),
        address: text(field("address", "gstAddress")),
    }
}

fn products_from(value: Option<&Value>) -> Vec<LineItem> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| LineItem {
            product_name: text(item.get("productName")),
            quantity: quantity(item.get("productQuantity")),
            unit_price: price(item.get("productPrice")),
            serial_no: text(item.get("serialNo")),
        })
        .collect()
}

fn transport_from(value: Option<&Value>) -> TransportDetails {
    TransportDetails {
        delivery_status: DeliveryStatus::parse_lenient(&text(
            value.and_then(|v| v.get("deliveryStatus")),
        )),
        delivery_date: text(value.and_then(|v| v.get("deliveryDate"))),
    }
}

// =============================================================================
// Coercion Helpers
// =============================================================================

/// Strings as-is, numbers and booleans rendered, everything else empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Accepts `true`, `"true"`, `"yes"`, `1` and `"1"`.
pub fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

/// Phone number as digits. Separators (`+`, spaces, dashes) are dropped;
/// anything else yields 0.
pub fn phone(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            let is_phone_like = trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
            if !is_phone_like {
                return 0;
            }
            let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Integer quantity. Fractional values truncate toward zero.
pub fn quantity(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Rupee amount to `Money`.
pub fn price(value: Option<&Value>) -> Money {
    let rupees = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    rupees.map(Money::from_decimal_rupees).unwrap_or_default()
}

// =============================================================================
// Invoice → Wire
// =============================================================================

/// Serializes an invoice to the body of a create or full-replace update.
///
/// The identifier is not part of the body; it travels in the URL.
pub fn invoice_to_wire(invoice: &Invoice) -> Value {
    let products: Vec<Value> = invoice
        .products
        .iter()
        .map(|item| {
            json!({
                "productName": item.product_name,
                "productQuantity": item.quantity,
                "productPrice": item.unit_price.to_decimal_rupees(),
                "serialNo": item.serial_no,
            })
        })
        .collect();

    json!({
        "invoiceNo": invoice.invoice_no,
        "date": invoice.date,
        "customerDetails": {
            "name": invoice.customer.name,
            "phone": invoice.customer.phone,
            "email": invoice.customer.email,
            "address": invoice.customer.address,
        },
        "gst": invoice.gst,
        "po": invoice.po,
        "quotation": invoice.quotation,
        "gstDetails": {
            "name": invoice.gst_details.name,
            "number": invoice.gst_details.number,
            "phone": invoice.gst_details.phone,
            "email": invoice.gst_details.email,
            "address": invoice.gst_details.address,
        },
        "products": products,
        "transportDetails": {
            "deliveryStatus": invoice.transport.delivery_status.as_str(),
            "deliveryDate": invoice.transport.delivery_date,
        },
        "paymentStatus": invoice.payment_status.as_str(),
        "paymentType": invoice.payment_type.as_str(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn api_invoice() -> Value {
        json!({
            "_id": "65f0c2a1b3",
            "invoiceNo": "INV-2025-002",
            "date": "15/03/2025",
            "customerDetails": {
                "name": "John Doe",
                "phone": "98765 43210",
                "email": "john@doe.in",
                "address": "12 MG Road"
            },
            "gst": "false",
            "po": 1,
            "quotation": null,
            "products": [
                { "productName": "Laptop", "productQuantity": "1", "productPrice": "25000", "serialNo": "LP-1" },
                { "productName": "Bag", "productQuantity": 1, "productPrice": 2000.0 }
            ],
            "transportDetails": { "deliveryStatus": "In Transit", "deliveryDate": "18/03/2025" },
            "paymentStatus": "paid",
            "paymentType": "upi"
        })
    }

    #[test]
    fn test_invoice_from_json() {
        let invoice = invoice_from_json(&api_invoice());

        assert_eq!(invoice.id.as_deref(), Some("65f0c2a1b3"));
        assert_eq!(invoice.invoice_no, "INV-2025-002");
        assert_eq!(invoice.customer.phone, 9_876_543_210);
        assert!(!invoice.gst);
        assert!(invoice.po);
        assert!(!invoice.quotation);
        assert_eq!(invoice.products.len(), 2);
        assert_eq!(invoice.products[0].unit_price, Money::from_rupees(25_000));
        assert_eq!(invoice.products[1].quantity, 1);
        assert_eq!(invoice.products[1].serial_no, "");
        assert_eq!(invoice.transport.delivery_status, DeliveryStatus::InTransit);
        assert_eq!(invoice.payment_status, PaymentStatus::Paid);
        assert_eq!(invoice.payment_type, PaymentType::Upi);
        assert_eq!(invoice.type_label(), "PO");
    }

    #[test]
    fn test_malformed_fields_coerce_to_zero() {
        let invoice = invoice_from_json(&json!({
            "id": 42,
            "customerDetails": { "phone": "call me" },
            "products": [
                { "productName": "X", "productQuantity": "many", "productPrice": "free" },
                "not an object"
            ],
            "transportDetails": { "deliveryStatus": "lost at sea" }
        }));

        assert_eq!(invoice.id.as_deref(), Some("42"));
        assert_eq!(invoice.customer.phone, 0);
        assert_eq!(invoice.products.len(), 1);
        assert_eq!(invoice.products[0].quantity, 0);
        assert_eq!(invoice.products[0].unit_price, Money::zero());
        assert_eq!(invoice.transport.delivery_status, DeliveryStatus::Pending);
    }

    #[test]
    fn test_missing_products_default_to_empty() {
        assert!(invoice_from_json(&json!({ "products": null })).products.is_empty());
        assert!(invoice_from_json(&json!({})).products.is_empty());
        assert_eq!(invoice_from_json(&json!("garbage")), Invoice::default());
    }

    #[test]
    fn test_gst_detail_aliases() {
        let nested = invoice_from_json(&json!({
            "gst": true,
            "gstDetails": { "gstName": "Doe Traders", "gstNumber": "27AAPFU0939F1ZV" }
        }));
        assert_eq!(nested.gst_details.name, "Doe Traders");
        assert_eq!(nested.gst_details.number, "27AAPFU0939F1ZV");

        let flat = invoice_from_json(&json!({
            "gst": "true",
            "gstName": "Doe Traders",
            "gstNumber": "27AAPFU0939F1ZV",
            "gstPhone": 9876543210u64
        }));
        assert!(flat.gst);
        assert_eq!(flat.gst_details.number, "27AAPFU0939F1ZV");
        assert_eq!(flat.gst_details.phone, 9_876_543_210);
    }

    #[test]
    fn test_list_response_shapes() {
        let bare = json!([api_invoice(), api_invoice()]);
        assert_eq!(invoices_from_response(&bare).len(), 2);

        let data = json!({ "data": [api_invoice()] });
        assert_eq!(invoices_from_response(&data).len(), 1);

        let named = json!({ "invoices": [api_invoice()] });
        assert_eq!(invoices_from_response(&named).len(), 1);

        assert!(invoices_from_response(&json!({ "message": "ok" })).is_empty());
        assert!(invoices_from_response(&Value::Null).is_empty());
    }

    #[test]
    fn test_single_response_shapes() {
        let enveloped = json!({ "invoice": api_invoice() });
        assert_eq!(invoice_from_response(&enveloped).invoice_no, "INV-2025-002");
        assert_eq!(invoice_from_response(&api_invoice()).invoice_no, "INV-2025-002");
    }

    #[test]
    fn test_wire_round_trip() {
        let invoice = invoice_from_json(&api_invoice());
        let wire = invoice_to_wire(&invoice);

        assert!(wire.get("_id").is_none());
        assert_eq!(wire["products"][0]["productPrice"], json!(25000.0));
        assert_eq!(wire["transportDetails"]["deliveryStatus"], "in_transit");

        let back = invoice_from_json(&wire);
        assert_eq!(back.id, None);
        assert_eq!(Invoice { id: None, ..invoice }, back);
    }

    #[test]
    fn test_flag_variants() {
        assert!(flag(Some(&json!(true))));
        assert!(flag(Some(&json!("TRUE"))));
        assert!(flag(Some(&json!(1))));
        assert!(!flag(Some(&json!(0))));
        assert!(!flag(Some(&json!("no"))));
        assert!(!flag(None));
    }
}
