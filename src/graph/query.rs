//! Typed query records
//!
//! Field names follow the query contract the components were written
//! against, so a record serializes to (and parses from) the same JSON shape.

use serde::{Deserialize, Serialize};

use super::FixedImage;
use crate::config::Social;

/// Everything the Bio component reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioQuery {
    pub avatar: AvatarNode,
    pub site: SiteNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarNode {
    #[serde(rename = "childImageSharp")]
    pub child_image_sharp: ImageSharp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSharp {
    pub fixed: FixedImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteNode {
    #[serde(rename = "siteMetadata")]
    pub site_metadata: BioMetadata,
}

/// The slice of site metadata selected by the Bio query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BioMetadata {
    pub author: String,
    pub author_first_name: String,
    pub social: Social,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "avatar": { "childImageSharp": { "fixed": { "src": "/static/ab/profile-pic.jpg", "width": 50, "height": 50 } } },
        "site": { "siteMetadata": { "author": "Jane Doe", "authorFirstName": "Jane", "social": { "twitter": "janedoe" } } }
    }"#;

    #[test]
    fn test_parse_contract_shape() {
        let query: BioQuery = serde_json::from_str(RECORD).unwrap();
        assert_eq!(query.avatar.child_image_sharp.fixed.width, 50);
        assert_eq!(query.site.site_metadata.author_first_name, "Jane");
        assert_eq!(query.site.site_metadata.social.twitter, "janedoe");

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["site"]["siteMetadata"]["authorFirstName"], "Jane");
        assert_eq!(value["avatar"]["childImageSharp"]["fixed"]["height"], 50);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let record = r#"{ "site": { "siteMetadata": { "author": "A", "authorFirstName": "A", "social": { "twitter": "a" } } } }"#;
        let err = serde_json::from_str::<BioQuery>(record).unwrap_err();
        assert!(err.to_string().contains("avatar"));
    }
}
