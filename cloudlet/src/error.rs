use std::{error::Error as StdError, fmt::Debug, io, net::IpAddr};

use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::{display::DisplayErrorContext, metadata::ProvideErrorMetadata, operation::BuildError};
use serde::Serialize;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Resolves a host name to its addresses
pub type Resolver = fn(&str) -> io::Result<Vec<IpAddr>>;

/// Fragments that identify a name resolution failure somewhere in an error chain
const NAME_RESOLUTION_MARKERS: &[&str] = &[
  "dns error",
  "failed to lookup address",
  "name or service not known",
  "nodename nor servname provided",
  "no such host",
];

/// Problems with the supplied parameters, detected before any network call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("missing required parameter --{0}")]
  MissingRequired(&'static str),

  #[error("parameters --{0} and --{1} cannot be used together")]
  MutuallyExclusive(&'static str, &'static str),

  #[error("invalid value '{value}' for --{param}: {reason}")]
  InvalidValue {
    param: &'static str,
    value: String,
    reason: String,
  },

  #[error("unknown parameter '{0}' in pipeline input")]
  UnknownParameter(String),

  #[error("unknown output field '{field}', expected one of: {expected}")]
  UnknownField { field: String, expected: String },

  #[error("parameter '{0}' cannot be passed through by this command")]
  PassThruUnavailable(String),

  #[error("request could not be built: {0}")]
  InvalidRequest(String),
}

/// Failure reported by an operation's remote call, before the invoker adds context
#[derive(Debug)]
pub enum InvokeFailure {
  /// The request never produced a response (I/O, connect, name resolution, timeout)
  Transport(BoxError),
  /// The service answered with an error
  Service {
    code: Option<String>,
    message: String,
    source: BoxError,
  },
  /// The SDK refused to build the request
  Build(BuildError),
}

impl<E, R> From<SdkError<E, R>> for InvokeFailure
where
  E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
  R: Debug + Send + Sync + 'static,
{
  fn from(err: SdkError<E, R>) -> Self {
    let transport = match &err {
      SdkError::DispatchFailure(failure) => failure.is_io() || failure.is_timeout(),
      SdkError::TimeoutError(_) => true,
      _ => false,
    };

    if transport {
      return Self::Transport(Box::new(err));
    }

    let code = err.code().map(str::to_owned);
    let message = match err.message() {
      Some(message) => message.to_owned(),
      None => DisplayErrorContext(&err).to_string(),
    };

    Self::Service {
      code,
      message,
      source: Box::new(err),
    }
  }
}

impl From<BuildError> for InvokeFailure {
  fn from(err: BuildError) -> Self {
    Self::Build(err)
  }
}

/// Every way an invocation can fail
#[derive(Debug, Error)]
pub enum InvokeError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("{operation}: {diagnostic}")]
  Transport {
    operation: &'static str,
    diagnostic: String,
    #[source]
    source: BoxError,
  },

  #[error("{operation}: {message}")]
  Service {
    operation: &'static str,
    code: Option<String>,
    message: String,
    #[source]
    source: BoxError,
  },

  #[error("{0}: cancelled")]
  Cancelled(&'static str),

  #[error("unable to serialize output")]
  Projection(#[from] serde_json::Error),

  #[error("unable to write output")]
  Output(#[from] io::Error),
}

impl InvokeError {
  pub fn category(&self) -> &'static str {
    match self {
      Self::Validation(_) => "Validation",
      Self::Transport { .. } => "Transport",
      Self::Service { .. } => "Service",
      Self::Cancelled(_) => "Cancelled",
      Self::Projection(_) | Self::Output(_) => "Output",
    }
  }

  /// Wrap a raw failure from `operation`, enriching transport failures with diagnostics
  pub fn from_failure(operation: &'static str, failure: InvokeFailure, host: Option<&str>, resolve: Resolver) -> Self {
    match failure {
      InvokeFailure::Transport(source) => Self::Transport {
        operation,
        diagnostic: diagnose_transport(host, source.as_ref(), resolve),
        source,
      },
      InvokeFailure::Service { code, message, source } => Self::Service {
        operation,
        code,
        message,
        source,
      },
      InvokeFailure::Build(err) => Self::Validation(ValidationError::InvalidRequest(err.to_string())),
    }
  }
}

fn is_name_resolution_failure(err: &(dyn StdError + 'static)) -> bool {
  let mut current = Some(err);
  while let Some(err) = current {
    let message = err.to_string().to_lowercase();
    if NAME_RESOLUTION_MARKERS.iter().any(|marker| message.contains(marker)) {
      return true;
    }
    current = err.source();
  }
  false
}

/// Describe a transport failure against the endpoint it was headed for
fn diagnose_transport(
  host: Option<&str>,
  source: &(dyn StdError + Send + Sync + 'static),
  resolve: Resolver,
) -> String {
  let source: &(dyn StdError + 'static) = source;
  let host = match host {
    Some(host) => host,
    None => return format!("transport failure: {}", DisplayErrorContext(source)),
  };

  if !is_name_resolution_failure(source) {
    return format!("unable to reach endpoint {host}: {}", DisplayErrorContext(source));
  }

  match resolve(host) {
    Ok(addrs) if !addrs.is_empty() => {
      let addrs = addrs.iter().map(IpAddr::to_string).collect::<Vec<_>>().join(", ");
      format!(
        "name resolution failed for endpoint {host}, it now resolves to {addrs}; the failure may have been transient"
      )
    }
    Ok(_) => format!("name resolution failed for endpoint {host}: no addresses returned"),
    Err(err) => format!("name resolution failed for endpoint {host}: {err}; check the region and network settings"),
  }
}

/// Uniform error result written at the CLI boundary
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorRecord {
  pub operation: String,
  pub category: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code: Option<String>,
  pub message: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub causes: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target: Option<String>,
}

impl ErrorRecord {
  pub fn new(operation: &str, err: &InvokeError, target: Option<String>) -> Self {
    let code = match err {
      InvokeError::Service { code, .. } => code.clone(),
      _ => None,
    };

    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
      causes.push(cause.to_string());
      current = cause.source();
    }

    Self {
      operation: operation.to_owned(),
      category: err.category(),
      code,
      message: err.to_string(),
      causes,
      target,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::net::Ipv4Addr;

  use super::*;

  fn dns_failure() -> BoxError {
    let inner = io::Error::new(io::ErrorKind::Other, "failed to lookup address information: Name or service not known");
    Box::new(io::Error::new(io::ErrorKind::Other, inner))
  }

  fn unresolvable(_: &str) -> io::Result<Vec<IpAddr>> {
    Err(io::Error::new(io::ErrorKind::NotFound, "host not found"))
  }

  fn resolvable(_: &str) -> io::Result<Vec<IpAddr>> {
    Ok(vec![IpAddr::V4(Ipv4Addr::new(52, 94, 1, 2))])
  }

  #[test]
  fn it_wraps_dns_failures_with_diagnostics() {
    let failure = InvokeFailure::Transport(dns_failure());
    let host = "elasticmapreduce.xx-nowhere-1.amazonaws.com";
    let err = InvokeError::from_failure("ListClusters", failure, Some(host), unresolvable);

    let message = err.to_string();
    assert!(message.starts_with(&format!("ListClusters: name resolution failed for endpoint {host}")));
    assert!(message.contains("host not found"));

    let source = err.source().expect("original failure is kept");
    assert!(source.to_string().contains("failed to lookup address"));
    assert_eq!(err.category(), "Transport");
  }

  #[test]
  fn it_notes_transient_dns_failures() {
    let failure = InvokeFailure::Transport(dns_failure());
    let err = InvokeError::from_failure("Search", failure, Some("resource-explorer-2.us-east-1.api.aws"), resolvable);

    assert!(err.to_string().contains("it now resolves to 52.94.1.2"));
  }

  #[test]
  fn it_describes_connect_failures_without_lookup() {
    fn never(_: &str) -> io::Result<Vec<IpAddr>> {
      panic!("resolver must not run for non DNS failures")
    }

    let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    let failure = InvokeFailure::Transport(Box::new(refused));
    let err = InvokeError::from_failure("TranslateText", failure, Some("translate.us-east-1.amazonaws.com"), never);

    assert!(err
      .to_string()
      .starts_with("TranslateText: unable to reach endpoint translate.us-east-1.amazonaws.com"));
  }

  #[test]
  fn it_passes_service_failures_through() {
    let source: BoxError = Box::new(io::Error::new(io::ErrorKind::Other, "boom"));
    let failure = InvokeFailure::Service {
      code: Some("InvalidRequestException".to_string()),
      message: "Cluster id 'j-123' is not valid.".to_string(),
      source,
    };
    let err = InvokeError::from_failure("DescribeCluster", failure, None, unresolvable);

    assert_eq!(err.to_string(), "DescribeCluster: Cluster id 'j-123' is not valid.");
    let record = ErrorRecord::new("DescribeCluster", &err, Some("j-123".to_string()));
    assert_eq!(record.category, "Service");
    assert_eq!(record.code.as_deref(), Some("InvalidRequestException"));
    assert_eq!(record.causes, vec!["boom".to_string()]);
  }

  #[test]
  fn it_serializes_error_records() {
    let err = InvokeError::from(ValidationError::MissingRequired("cluster-id"));
    let record = ErrorRecord::new("DescribeCluster", &err, None);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "Operation": "DescribeCluster",
        "Category": "Validation",
        "Message": "missing required parameter --cluster-id",
      })
    );
  }
}
