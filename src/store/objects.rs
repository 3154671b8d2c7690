use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;

use super::{Store, StoreError};

pub const POST_BUCKET: &str = "post-images";
pub const AD_BUCKET: &str = "advertisement-images";

/// Collision-resistant object name: `[prefix/]<unix millis>_<file name>`.
pub fn object_name(prefix: Option<&str>, file_name: &str, now: DateTime<Utc>) -> String {
    let file_name: String = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let name = format!("{}_{file_name}", now.timestamp_millis());
    match prefix {
        Some(prefix) => format!("{}/{name}", prefix.trim_matches('/')),
        None => name,
    }
}

impl Store {
    pub fn public_url(&self, bucket: &str, name: &str) -> Result<String, StoreError> {
        Ok(self
            .endpoint(&format!("storage/v1/object/public/{bucket}/{name}"))?
            .to_string())
    }

    /// Store `bytes` under `bucket/name` and return their public address.
    pub fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let url = self.endpoint(&format!("storage/v1/object/{bucket}/{name}"))?;
        let request = self
            .request(reqwest::Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        self.send(&format!("upload to {bucket}"), request)?;
        self.public_url(bucket, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    #[test]
    fn test_object_name_without_prefix() {
        assert_eq!(
            object_name(None, "cover.png", at()),
            "1700000000123_cover.png"
        );
    }

    #[test]
    fn test_object_name_with_prefix_and_path() {
        assert_eq!(
            object_name(Some("ads/"), "/home/me/My Banner.jpg", at()),
            "ads/1700000000123_My_Banner.jpg"
        );
    }

    #[test]
    fn test_public_url() {
        let store = Store::new(reqwest::blocking::Client::new(), "https://proj.example.co", "k").unwrap();
        assert_eq!(
            store.public_url(AD_BUCKET, "ads/1_x.png").unwrap(),
            "https://proj.example.co/storage/v1/object/public/advertisement-images/ads/1_x.png"
        );
    }
}
