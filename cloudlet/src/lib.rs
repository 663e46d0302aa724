pub mod cli;
pub mod client;
pub mod dto;
pub mod emr;
pub mod error;
pub mod invoke;
pub mod operation;
pub mod output;
pub mod pipeline;
pub mod resource_explorer;
pub mod translate;

use std::env;

use anyhow::Result;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, SdkConfig};
use aws_types::region::Region;
pub use cli::{Cli, Commands, ConnectionArgs};

/// Get the configuration to authn/authz with AWS that will be used across AWS clients
///
/// Everything the clients need is resolved here and passed on explicitly; operations never read
/// the environment themselves.
pub async fn get_sdk_config(connection: &ConnectionArgs) -> Result<SdkConfig> {
  let aws_region = match &connection.region {
    Some(region) => Some(Region::new(region.clone())),
    None => env::var("AWS_DEFAULT_REGION").ok().map(Region::new),
  };

  let region_provider = RegionProviderChain::first_try(aws_region).or_default_provider();

  let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
  if let Some(profile) = &connection.profile {
    loader = loader.profile_name(profile);
  }
  if let Some(endpoint_url) = &connection.endpoint_url {
    loader = loader.endpoint_url(endpoint_url);
  }

  Ok(loader.load().await)
}
