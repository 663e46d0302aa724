use std::sync::OnceLock;

use aws_config::{retry::RetryConfig, SdkConfig};
use phf::phf_map;
use tracing::debug;
use url::Url;

/// Endpoint host templates, keyed by service identifier
static ENDPOINT_HOSTS: phf::Map<&'static str, &'static str> = phf_map! {
  "emr" => "elasticmapreduce.{region}.amazonaws.com",
  "translate" => "translate.{region}.amazonaws.com",
  "resource-explorer-2" => "resource-explorer-2.{region}.api.aws",
};

/// AWS services with commands in this tool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
  Emr,
  Translate,
  ResourceExplorer,
}

impl Service {
  pub fn id(&self) -> &'static str {
    match self {
      Self::Emr => "emr",
      Self::Translate => "translate",
      Self::ResourceExplorer => "resource-explorer-2",
    }
  }

  /// The public endpoint host for the service in `region`
  pub fn endpoint_host(&self, region: &str) -> Option<String> {
    ENDPOINT_HOSTS
      .get(self.id())
      .map(|template| template.replace("{region}", region))
  }
}

/// Supplies a (possibly cached) client of type `C`
pub trait ProvideClient<C> {
  fn client(&self) -> &C;

  /// Host the client sends requests to, when known; used for diagnostics only
  fn endpoint_host(&self, _service: Service) -> Option<String> {
    None
  }
}

/// Builds service clients from one explicit configuration and hands out the same client on reuse
pub struct ClientFactory {
  config: SdkConfig,
  max_attempts: u32,
  emr: OnceLock<aws_sdk_emr::Client>,
  translate: OnceLock<aws_sdk_translate::Client>,
  resource_explorer: OnceLock<aws_sdk_resourceexplorer2::Client>,
}

impl ClientFactory {
  pub fn new(config: SdkConfig, max_attempts: u32) -> Self {
    Self {
      config,
      max_attempts,
      emr: OnceLock::new(),
      translate: OnceLock::new(),
      resource_explorer: OnceLock::new(),
    }
  }

  fn retry_config(&self) -> RetryConfig {
    RetryConfig::standard().with_max_attempts(self.max_attempts)
  }
}

impl ProvideClient<aws_sdk_emr::Client> for ClientFactory {
  fn client(&self) -> &aws_sdk_emr::Client {
    self.emr.get_or_init(|| {
      debug!("Creating EMR client");
      aws_sdk_emr::Client::from_conf(
        // Start with the shared environment configuration
        aws_sdk_emr::config::Builder::from(&self.config)
          .retry_config(self.retry_config())
          .build(),
      )
    })
  }

  fn endpoint_host(&self, service: Service) -> Option<String> {
    endpoint_host(&self.config, service)
  }
}

impl ProvideClient<aws_sdk_translate::Client> for ClientFactory {
  fn client(&self) -> &aws_sdk_translate::Client {
    self.translate.get_or_init(|| {
      debug!("Creating Translate client");
      aws_sdk_translate::Client::from_conf(
        aws_sdk_translate::config::Builder::from(&self.config)
          .retry_config(self.retry_config())
          .build(),
      )
    })
  }

  fn endpoint_host(&self, service: Service) -> Option<String> {
    endpoint_host(&self.config, service)
  }
}

impl ProvideClient<aws_sdk_resourceexplorer2::Client> for ClientFactory {
  fn client(&self) -> &aws_sdk_resourceexplorer2::Client {
    self.resource_explorer.get_or_init(|| {
      debug!("Creating Resource Explorer client");
      aws_sdk_resourceexplorer2::Client::from_conf(
        aws_sdk_resourceexplorer2::config::Builder::from(&self.config)
          .retry_config(self.retry_config())
          .build(),
      )
    })
  }

  fn endpoint_host(&self, service: Service) -> Option<String> {
    endpoint_host(&self.config, service)
  }
}

/// Host portion of an endpoint URL
fn url_host(url: &str) -> Option<String> {
  Url::parse(url).ok()?.host_str().map(str::to_owned)
}

/// Derive the endpoint host from an explicit endpoint URL, or from the region
fn endpoint_host(config: &SdkConfig, service: Service) -> Option<String> {
  match config.endpoint_url() {
    Some(url) => url_host(url),
    None => config
      .region()
      .and_then(|region| service.endpoint_host(region.as_ref())),
  }
}

#[cfg(test)]
mod tests {
  use aws_types::region::Region;
  use rstest::*;

  use super::*;

  #[rstest]
  #[case(Service::Emr, "us-east-1", "elasticmapreduce.us-east-1.amazonaws.com")]
  #[case(Service::Translate, "eu-west-1", "translate.eu-west-1.amazonaws.com")]
  #[case(Service::ResourceExplorer, "ap-south-1", "resource-explorer-2.ap-south-1.api.aws")]
  fn it_derives_endpoint_hosts(#[case] service: Service, #[case] region: &str, #[case] expected: &str) {
    assert_eq!(service.endpoint_host(region).unwrap(), expected);
  }

  #[rstest]
  #[case("http://localhost:4566", Some("localhost"))]
  #[case("https://emr.example.internal/path?x=1", Some("emr.example.internal"))]
  #[case("https://user@proxy.local:8443", Some("proxy.local"))]
  #[case("https://", None)]
  fn it_extracts_url_hosts(#[case] url: &str, #[case] expected: Option<&str>) {
    assert_eq!(url_host(url).as_deref(), expected);
  }

  #[test]
  fn it_prefers_the_endpoint_override() {
    let config = SdkConfig::builder()
      .region(Region::new("us-west-2"))
      .endpoint_url("http://localhost:4566")
      .build();
    assert_eq!(endpoint_host(&config, Service::Translate).as_deref(), Some("localhost"));

    let config = SdkConfig::builder().region(Region::new("us-west-2")).build();
    assert_eq!(
      endpoint_host(&config, Service::Translate).as_deref(),
      Some("translate.us-west-2.amazonaws.com")
    );
  }

  #[test]
  fn it_reuses_clients() {
    let config = SdkConfig::builder()
      .region(Region::new("us-east-1"))
      .behavior_version(aws_config::BehaviorVersion::latest())
      .build();
    let factory = ClientFactory::new(config, 3);

    let first: &aws_sdk_emr::Client = factory.client();
    let second: &aws_sdk_emr::Client = factory.client();
    assert!(std::ptr::eq(first, second));
  }
}
