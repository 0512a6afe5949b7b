//! AWS SDK adapters.
//!
//! - [`AwsConfigLoader`] builds `SdkConfig`s with `aws-config`.
//! - [`AwsStsClient`] wraps `aws_sdk_sts::Client`.
//! - `bridge` hands engine credential providers to the SDK.

mod bridge;
mod loader;
mod sts;

pub use bridge::SdkCredentialsBridge;
pub use loader::AwsConfigLoader;
pub use sts::AwsStsClient;
