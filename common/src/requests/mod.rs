use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for the `POST /generate_box_label/` endpoint.
///
/// Describes one shipment's box-label printing job. Every text field is
/// opaque: it is printed verbatim on each page and stored as-is alongside the
/// generated file. `box_count` decides how many pages the document gets, one
/// page per physical box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BoxLabelRequest {
    /// Vendor shown on the label; also the source of the output file name.
    pub vendor_name: String,
    pub po_number: String,
    pub store_code: String,
    pub delivery_date: String,
    pub sku_barcode: String,
    /// Units in the case. Negative values are rejected while decoding.
    pub quantity: u32,
    /// Printed on the label and encoded as the QR payload.
    pub case_id: String,
    #[validate(range(min = 1, message = "box_count must be at least 1"))]
    pub box_count: u32,
    pub area_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "vendor_name": "Acme Corp",
            "po_number": "PO123",
            "store_code": "ST01",
            "delivery_date": "2024-01-01",
            "sku_barcode": "SKU999",
            "quantity": 10,
            "case_id": "CASE42",
            "box_count": 3,
            "area_code": "A1"
        })
    }

    #[test]
    fn decodes_complete_body() {
        let request: BoxLabelRequest = serde_json::from_value(body()).unwrap();
        assert_eq!(request.vendor_name, "Acme Corp");
        assert_eq!(request.quantity, 10);
        assert_eq!(request.box_count, 3);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn missing_quantity_is_rejected() {
        let mut value = body();
        value.as_object_mut().unwrap().remove("quantity");
        assert!(serde_json::from_value::<BoxLabelRequest>(value).is_err());
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut value = body();
        value["quantity"] = json!(-1);
        assert!(serde_json::from_value::<BoxLabelRequest>(value).is_err());
    }

    #[test]
    fn zero_boxes_fail_validation() {
        let mut value = body();
        value["box_count"] = json!(0);
        let request: BoxLabelRequest = serde_json::from_value(value).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("box_count"));
    }
}
