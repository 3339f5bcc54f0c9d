//! Receipt data models.

use serde::{Deserialize, Serialize};

/// The structured record recovered from one receipt transcript.
///
/// Both fields are strings at the boundary: the date is the matched
/// substring exactly as it appeared on the receipt (or the formatted
/// fallback date), and the total is always rendered with two fraction
/// digits. The consuming layer populates editable form fields from this
/// record, so preserving the receipt's own spelling matters more than a
/// normalized representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFields {
    /// Transaction date as printed on the receipt.
    pub date: String,

    /// Amount due, formatted with exactly two fraction digits.
    /// `"0.00"` signals that no confident extraction was possible.
    pub total: String,
}

/// Payload handed to the upload collaborator once the user has confirmed
/// the extracted fields.
///
/// The engine never touches transport; this is the shape of the record
/// that crosses the output boundary, photo and geolocation included when
/// the capture layer provides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureUpload {
    /// Store name, user-entered or matched upstream.
    pub store: String,

    /// Confirmed transaction date.
    pub date: String,

    /// Confirmed total.
    pub total: String,

    /// Receipt photo as a data URL, when the capture layer kept one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Capture latitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Capture longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl CaptureUpload {
    /// Build a payload from extracted fields and a store name.
    pub fn new(store: impl Into<String>, fields: &ReceiptFields) -> Self {
        Self {
            store: store.into(),
            date: fields.date.clone(),
            total: fields.total.clone(),
            photo: None,
            lat: None,
            lng: None,
        }
    }

    /// Attach the capture location.
    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Attach the receipt photo.
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_payload_skips_absent_fields() {
        let fields = ReceiptFields {
            date: "04/22/24".to_string(),
            total: "22.00".to_string(),
        };

        let payload = CaptureUpload::new("Kroger", &fields);
        let json = serde_json::to_string(&payload).unwrap();

        assert!(json.contains("\"store\":\"Kroger\""));
        assert!(!json.contains("photo"));
        assert!(!json.contains("lat"));
    }

    #[test]
    fn test_upload_payload_with_location() {
        let fields = ReceiptFields {
            date: "04/22/24".to_string(),
            total: "22.00".to_string(),
        };

        let payload = CaptureUpload::new("Kroger", &fields).with_location(39.1, -84.5);
        let json = serde_json::to_string(&payload).unwrap();

        assert!(json.contains("\"lat\":39.1"));
        assert!(json.contains("\"lng\":-84.5"));
    }
}
