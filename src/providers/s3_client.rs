use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{
    BehaviorVersion, Builder as S3ConfigBuilder, RequestChecksumCalculation,
    ResponseChecksumValidation,
};
use aws_sdk_s3::Client;

pub struct S3ClientConfig<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub endpoint_url: &'a str,
    pub force_path_style: bool,
}

/// Build an SDK client without touching the network.
///
/// Retries are disabled: every operation is a single round trip and a failure
/// goes straight back to the caller. Checksums are only computed where an
/// operation demands them, which keeps PUT bodies plain for R2.
pub fn create_s3_client(config: &S3ClientConfig<'_>) -> Client {
    let credentials = Credentials::new(
        config.access_key_id,
        config.secret_access_key,
        None,
        None,
        "r2-explorer",
    );

    let s3_config = S3ConfigBuilder::new()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new(config.region.to_string()))
        .endpoint_url(config.endpoint_url)
        .force_path_style(config.force_path_style)
        .retry_config(RetryConfig::disabled())
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
        .build();

    Client::from_conf(s3_config)
}
