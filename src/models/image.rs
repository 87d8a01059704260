use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Raw HTTP response as seen by the controller.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// In-memory image produced by a successful generation.
///
/// Owned by exactly one holder; there is no `Clone`. Call [`ImageHandle::release`]
/// when it is superseded so the bytes are dropped at a known point.
#[derive(Debug)]
pub struct ImageHandle {
    id: Uuid,
    bytes: Vec<u8>,
    content_type: String,
    seed: u32,
    created_at: DateTime<Utc>,
}

impl ImageHandle {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>, seed: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytes,
            content_type: content_type.unwrap_or_else(|| "image/png".to_string()),
            seed,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `data:` URL suitable for an `<img src>` or a terminal image viewer.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }

    pub fn release(self) {
        log::debug!("Releasing image {} ({} bytes)", self.id, self.bytes.len());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSummary {
    pub id: Uuid,
    pub size: usize,
    pub seed: u32,
}

impl From<&ImageHandle> for ImageSummary {
    fn from(handle: &ImageHandle) -> Self {
        Self {
            id: handle.id,
            size: handle.len(),
            seed: handle.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        let mut response = FetchResponse {
            status: 200,
            status_text: "OK".into(),
            content_type: None,
            body: vec![],
        };
        assert!(response.is_success());
        response.status = 204;
        assert!(response.is_success());
        response.status = 302;
        assert!(!response.is_success());
        response.status = 500;
        assert!(!response.is_success());
    }

    #[test]
    fn handle_defaults_to_png_and_encodes_data_url() {
        let handle = ImageHandle::new(vec![1, 2, 3], None, 42);
        assert_eq!(handle.content_type(), "image/png");
        assert_eq!(handle.to_data_url(), "data:image/png;base64,AQID");
        assert_eq!(ImageSummary::from(&handle).size, 3);
        assert_eq!(handle.seed(), 42);
    }

    #[test]
    fn handles_get_distinct_ids() {
        let a = ImageHandle::new(vec![0], Some("image/jpeg".into()), 1);
        let b = ImageHandle::new(vec![0], Some("image/jpeg".into()), 1);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.content_type(), "image/jpeg");
    }
}
