use aws_config::SdkConfig;

/// Load the shared AWS config for a region, using the default credential
/// chain (environment, profile, or the Lambda execution role).
pub async fn load_config(region: &str) -> SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

/// Build a Bedrock runtime client from a loaded config.
pub fn runtime_client(config: &SdkConfig) -> aws_sdk_bedrockruntime::Client {
    aws_sdk_bedrockruntime::Client::new(config)
}
