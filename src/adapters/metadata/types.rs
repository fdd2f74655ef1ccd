//! Raw off-chain metadata JSON

use serde::Deserialize;

use crate::ports::TokenMetadata;

/// Metadata document as published by pump.fun launches. Fields vary between
/// launchpads, so everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub logo: Option<String>,
    pub image_url: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

impl From<RawMetadata> for TokenMetadata {
    fn from(raw: RawMetadata) -> Self {
        // image, then logo, then imageUrl
        let image = [raw.image, raw.logo, raw.image_url]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty());

        Self {
            name: non_empty(raw.name),
            symbol: non_empty(raw.symbol),
            description: non_empty(raw.description),
            image,
            twitter: non_empty(raw.twitter),
            telegram: non_empty(raw.telegram),
            website: non_empty(raw.website),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
