use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads the default credential chain scoped to `region`.
///
/// Credentials are resolved lazily, so a missing or broken credential source
/// surfaces on the first service call rather than here.
pub async fn load_session(region: &str) -> SdkConfig {
    tracing::debug!("Loading AWS session for region {}", region);
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}
