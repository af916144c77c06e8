use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load AWS configuration from the default provider chain, optionally
/// pinning the region.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    loader.load().await
}

/// Build a Bedrock runtime client for converse and invoke-model calls.
pub fn build_runtime_client(config: &SdkConfig) -> aws_sdk_bedrockruntime::Client {
    aws_sdk_bedrockruntime::Client::new(config)
}
