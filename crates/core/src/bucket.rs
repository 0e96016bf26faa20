//! S3 bucket manager implementation using the AWS S3 SDK

use crate::endpoint::{self, DEFAULT_REGION};
use crate::error::{Error, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::Region,
    primitives::ByteStream,
    types::{
        BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
        WebsiteConfiguration,
    },
    Client,
};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Index document served for directory requests
pub const INDEX_DOCUMENT: &str = "index.html";

/// Error document served for missing keys
pub const ERROR_DOCUMENT: &str = "error.html";

/// Content type used when the key's extension is unknown or absent
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Outcome of an idempotent bucket creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketInit {
    /// Bucket was created in the session's region
    Created,
    /// Bucket already existed and is owned by this account
    AlreadyOwned,
}

/// Manager for provisioning and syncing static-website buckets
pub struct BucketManager {
    client: Client,
    region: String,
}

impl BucketManager {
    /// Create a manager from an existing client and region
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Create a manager from a named credentials profile
    ///
    /// The profile supplies authentication and the default region; an
    /// explicit region overrides the profile's.
    pub async fn from_profile(profile: &str, region: Option<String>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).profile_name(profile);
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            client: Client::new(&sdk_config),
            region,
        })
    }

    /// Get the session's region name
    pub fn region(&self) -> &str {
        &self.region
    }

    /// List the names of all buckets visible to the session
    pub async fn all_buckets(&self) -> Result<Vec<String>> {
        let response = self.client.list_buckets().send().await?;

        let buckets = response
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect();

        Ok(buckets)
    }

    /// List all objects in the named bucket
    pub async fn all_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            for obj in page.contents() {
                objects.push(ObjectInfo {
                    key: obj.key().unwrap_or("").to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified: obj.last_modified().cloned(),
                    etag: obj.e_tag().unwrap_or("").to_string(),
                });
            }
        }

        Ok(objects)
    }

    /// Ensure a bucket with the given name exists in the session's region
    ///
    /// Creation is idempotent: a bucket already owned by this account is
    /// reused, any other failure is fatal.
    pub async fn init_bucket(&self, name: &str) -> Result<BucketInit> {
        let mut request = self.client.create_bucket().bucket(name);

        // us-east-1 is the default location and must not be sent as an
        // explicit constraint.
        if self.region != DEFAULT_REGION {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                info!(bucket = name, region = %self.region, "bucket created");
                Ok(BucketInit::Created)
            }
            Err(err) => match err.as_service_error() {
                Some(service_err) if service_err.is_bucket_already_owned_by_you() => {
                    info!(bucket = name, "bucket already owned by this account, reusing");
                    Ok(BucketInit::AlreadyOwned)
                }
                _ => Err(Error::BucketCreate {
                    name: name.to_string(),
                    message: err.to_string(),
                }),
            },
        }
    }

    /// Apply the public-read policy to a bucket, returning the applied document
    ///
    /// Overwrites any existing policy unconditionally.
    pub async fn set_policy(&self, bucket: &str) -> Result<String> {
        let policy = public_read_policy(bucket)?;

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(&policy)
            .send()
            .await?;

        info!(bucket, "public-read policy applied");
        Ok(policy)
    }

    /// Enable static-website hosting on a bucket
    ///
    /// Index and error documents are fixed, not configurable.
    pub async fn configure_website(&self, bucket: &str) -> Result<()> {
        let website = WebsiteConfiguration::builder()
            .index_document(IndexDocument::builder().suffix(INDEX_DOCUMENT).build()?)
            .error_document(ErrorDocument::builder().key(ERROR_DOCUMENT).build()?)
            .build();

        self.client
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(website)
            .send()
            .await?;

        info!(bucket, "website hosting enabled");
        Ok(())
    }

    /// Upload a local file to a bucket under the given key
    ///
    /// The content type is inferred from the key's extension. Overwrites
    /// any existing object at that key.
    pub async fn upload_file(&self, bucket: &str, path: &Path, key: &str) -> Result<()> {
        let content_type = content_type_for(key);

        let mut file = File::open(path).await?;
        let metadata = file.metadata().await?;
        let mut buffer = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut buffer).await?;

        debug!(key, content_type = %content_type, size = buffer.len(), "uploading object");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(buffer))
            .content_type(content_type)
            .send()
            .await?;

        Ok(())
    }

    /// Upload every regular file under `pathname` to a bucket
    ///
    /// Keys are root-relative paths with `/` separators. Uploads only;
    /// remote objects absent locally are never deleted. Returns the number
    /// of uploaded objects.
    pub async fn sync(&self, pathname: &Path, bucket: &str) -> Result<u64> {
        let root = pathname.canonicalize()?;
        let files = collect_site_files(&root)?;

        info!(bucket, root = %root.display(), count = files.len(), "syncing directory tree");

        let mut uploaded = 0u64;
        for (path, key) in &files {
            self.upload_file(bucket, path, key).await?;
            uploaded += 1;
        }

        Ok(uploaded)
    }

    /// Get the region a bucket lives in
    pub async fn get_region_name(&self, bucket: &str) -> Result<String> {
        let response = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await?;

        // Buckets in the default region report an empty location constraint.
        let region = match response.location_constraint() {
            Some(constraint) if !constraint.as_str().is_empty() => {
                constraint.as_str().to_string()
            }
            _ => DEFAULT_REGION.to_string(),
        };

        Ok(region)
    }

    /// Get the public website URL for a bucket
    pub async fn get_bucket_url(&self, bucket: &str) -> Result<String> {
        let region = self.get_region_name(bucket).await?;
        endpoint::bucket_url(bucket, &region)
    }
}

/// Object information
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<aws_smithy_types::DateTime>,
    pub etag: String,
}

impl ObjectInfo {
    /// Last-modified timestamp as an RFC 3339 string, when present
    pub fn last_modified_rfc3339(&self) -> Option<String> {
        use aws_smithy_types::date_time::Format;
        self.last_modified
            .and_then(|dt| dt.fmt(Format::DateTime).ok())
    }
}

/// Build the fixed public-read policy document for a bucket
///
/// Parameterized only by the bucket name; repeated calls produce the same
/// document.
pub fn public_read_policy(bucket: &str) -> Result<String> {
    let policy = serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "PublicReadGetObject",
            "Effect": "Allow",
            "Principal": "*",
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{}/*", bucket)]
        }]
    });

    Ok(serde_json::to_string_pretty(&policy)?)
}

/// Determine the content type for an object key from its extension
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first()
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// Collect every regular file under `root` with its object key
///
/// Walks depth-first following symlinks, entries sorted by file name so the
/// upload order is reproducible. Keys are root-relative with `/` separators.
pub fn collect_site_files(root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };

        files.push((entry.path().to_path_buf(), object_key(relative)));
    }

    Ok(files)
}

/// Join a relative path's components with `/` regardless of platform
fn object_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_content_type_html() {
        assert_eq!(content_type_for("index.html"), "text/html");
    }

    #[test]
    fn test_content_type_css() {
        assert_eq!(content_type_for("css/style.css"), "text/css");
    }

    #[test]
    fn test_content_type_unknown_extension() {
        assert_eq!(content_type_for("data.zzz-unknown"), "text/plain");
    }

    #[test]
    fn test_content_type_no_extension() {
        assert_eq!(content_type_for("README"), "text/plain");
    }

    #[test]
    fn test_public_read_policy_shape() {
        let policy = public_read_policy("my-bucket").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&policy).unwrap();

        assert_eq!(parsed["Version"], "2012-10-17");

        let statement = &parsed["Statement"][0];
        assert_eq!(statement["Sid"], "PublicReadGetObject");
        assert_eq!(statement["Effect"], "Allow");
        assert_eq!(statement["Principal"], "*");
        assert_eq!(statement["Action"][0], "s3:GetObject");
        assert_eq!(statement["Resource"][0], "arn:aws:s3:::my-bucket/*");
    }

    #[test]
    fn test_public_read_policy_deterministic() {
        let first = public_read_policy("my-bucket").unwrap();
        let second = public_read_policy("my-bucket").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_object_key_normalizes_separators() {
        let relative: PathBuf = ["css", "style.css"].iter().collect();
        assert_eq!(object_key(&relative), "css/style.css");
    }

    #[test]
    fn test_object_key_single_component() {
        assert_eq!(object_key(Path::new("index.html")), "index.html");
    }

    #[test]
    fn test_collect_site_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css").join("style.css"), "body {}").unwrap();

        let root = dir.path().canonicalize().unwrap();
        let files = collect_site_files(&root).unwrap();

        let keys: Vec<&str> = files.iter().map(|(_, key)| key.as_str()).collect();
        assert_eq!(keys, vec!["css/style.css", "index.html"]);
    }

    #[test]
    fn test_collect_site_files_skips_empty_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("error.html"), "gone").unwrap();

        let root = dir.path().canonicalize().unwrap();
        let files = collect_site_files(&root).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1, "error.html");
    }

    #[test]
    fn test_collect_site_files_deep_nesting() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deep.js"), "export {}").unwrap();

        let root = dir.path().canonicalize().unwrap();
        let files = collect_site_files(&root).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1, "a/b/c/deep.js");
    }

    #[test]
    fn test_bucket_init_outcomes_differ() {
        assert_ne!(BucketInit::Created, BucketInit::AlreadyOwned);
    }
}
