//! S3 static-website endpoint hosts by region

use crate::error::{Error, Result};

/// Region used when the provider reports no location constraint
pub const DEFAULT_REGION: &str = "us-east-1";

/// A region's static-website endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub region: &'static str,
    pub host: &'static str,
}

// Regions launched before 2014 use the dashed host form, later ones the
// dotted form. The split is fixed per region, not derivable from the name.
const ENDPOINTS: &[Endpoint] = &[
    Endpoint { region: "us-east-1", host: "s3-website-us-east-1.amazonaws.com" },
    Endpoint { region: "us-east-2", host: "s3-website.us-east-2.amazonaws.com" },
    Endpoint { region: "us-west-1", host: "s3-website-us-west-1.amazonaws.com" },
    Endpoint { region: "us-west-2", host: "s3-website-us-west-2.amazonaws.com" },
    Endpoint { region: "ca-central-1", host: "s3-website.ca-central-1.amazonaws.com" },
    Endpoint { region: "sa-east-1", host: "s3-website-sa-east-1.amazonaws.com" },
    Endpoint { region: "eu-west-1", host: "s3-website-eu-west-1.amazonaws.com" },
    Endpoint { region: "eu-west-2", host: "s3-website.eu-west-2.amazonaws.com" },
    Endpoint { region: "eu-west-3", host: "s3-website.eu-west-3.amazonaws.com" },
    Endpoint { region: "eu-central-1", host: "s3-website.eu-central-1.amazonaws.com" },
    Endpoint { region: "eu-north-1", host: "s3-website.eu-north-1.amazonaws.com" },
    Endpoint { region: "eu-south-1", host: "s3-website.eu-south-1.amazonaws.com" },
    Endpoint { region: "af-south-1", host: "s3-website.af-south-1.amazonaws.com" },
    Endpoint { region: "me-south-1", host: "s3-website.me-south-1.amazonaws.com" },
    Endpoint { region: "ap-east-1", host: "s3-website.ap-east-1.amazonaws.com" },
    Endpoint { region: "ap-south-1", host: "s3-website.ap-south-1.amazonaws.com" },
    Endpoint { region: "ap-northeast-1", host: "s3-website-ap-northeast-1.amazonaws.com" },
    Endpoint { region: "ap-northeast-2", host: "s3-website.ap-northeast-2.amazonaws.com" },
    Endpoint { region: "ap-northeast-3", host: "s3-website.ap-northeast-3.amazonaws.com" },
    Endpoint { region: "ap-southeast-1", host: "s3-website-ap-southeast-1.amazonaws.com" },
    Endpoint { region: "ap-southeast-2", host: "s3-website-ap-southeast-2.amazonaws.com" },
];

/// Look up the static-website endpoint for a region
pub fn website_endpoint(region: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().find(|e| e.region == region)
}

/// Compose the public website URL for a bucket in a region
///
/// Website endpoints serve plain HTTP only.
pub fn bucket_url(bucket: &str, region: &str) -> Result<String> {
    let endpoint =
        website_endpoint(region).ok_or_else(|| Error::UnknownRegion(region.to_string()))?;
    Ok(format!("http://{}.{}", bucket, endpoint.host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashed_host_for_older_region() {
        let endpoint = website_endpoint("us-east-1").unwrap();
        assert_eq!(endpoint.host, "s3-website-us-east-1.amazonaws.com");
    }

    #[test]
    fn test_dotted_host_for_newer_region() {
        let endpoint = website_endpoint("eu-west-2").unwrap();
        assert_eq!(endpoint.host, "s3-website.eu-west-2.amazonaws.com");
    }

    #[test]
    fn test_unknown_region() {
        assert!(website_endpoint("mars-north-1").is_none());
    }

    #[test]
    fn test_bucket_url() {
        let url = bucket_url("my-site", "eu-west-1").unwrap();
        assert_eq!(url, "http://my-site.s3-website-eu-west-1.amazonaws.com");
    }

    #[test]
    fn test_bucket_url_unknown_region() {
        let err = bucket_url("my-site", "nowhere-1").unwrap_err();
        assert!(matches!(err, Error::UnknownRegion(_)));
    }

    #[test]
    fn test_every_region_listed_once() {
        for endpoint in ENDPOINTS {
            let count = ENDPOINTS.iter().filter(|e| e.region == endpoint.region).count();
            assert_eq!(count, 1, "duplicate entry for {}", endpoint.region);
        }
    }
}
