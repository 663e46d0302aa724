//! Generic execution of a remote operation
//!
//! Every command follows the same linear path:
//! parameters -> context -> request -> invoke -> (next page ...) -> projected output.
//! An [`Operation`] describes the field level variation; [`execute`] runs the path once for any of them.

use std::{collections::BTreeMap, fmt::Debug, io, sync::Arc};

use clap::ValueEnum;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
  client::{ProvideClient, Service},
  error::{InvokeError, InvokeFailure, Resolver, ValidationError},
};

/// Static description of one remote operation
#[allow(async_fn_in_trait)]
pub trait Operation: Sized {
  /// Name of the remote action, e.g. `ListClusters`
  const NAME: &'static str;
  const SERVICE: Service;
  /// Operations that change remote state ask for confirmation unless forced
  const MUTATING: bool = false;
  /// Wire name of the continuation token for list operations
  const TOKEN: Option<&'static str> = None;
  /// Input parameter (wire name) that can be echoed back with `--pass-thru`
  const PASS_THRU: Option<&'static str> = None;
  /// Parameter (snake_case) bound from bare pipeline input
  const PIPELINE_BY_VALUE: Option<&'static str> = None;

  type Client;
  /// Parameter surface as parsed from the command line or pipeline
  type Params: Clone + Debug + Serialize + DeserializeOwned;
  /// Validated values that were actually supplied
  type Context: Debug;
  type Request: Clone + Debug + PartialEq + Serialize;
  type Response: Debug + Serialize;
  /// Response members that `--select` can pick
  type Field: ValueEnum + Copy + Debug + PartialEq;

  fn bind(params: &Self::Params) -> Result<Self::Context, ValidationError>;

  fn assemble(context: &Self::Context) -> Self::Request;

  async fn invoke(client: &Self::Client, request: &Self::Request) -> Result<Self::Response, InvokeFailure>;

  fn default_selection() -> Selection<Self::Field>;

  fn project(response: &Self::Response, field: Self::Field) -> serde_json::Result<Value>;

  fn pass_thru(_context: &Self::Context) -> Option<Value> {
    None
  }

  /// What the confirmation prompt names as the target of a mutating call
  fn confirm_target(context: &Self::Context) -> String {
    Self::pass_thru(context).map(|v| target_name(&v)).unwrap_or_default()
  }

  fn request_token(_request: &Self::Request) -> Option<&str> {
    None
  }

  fn set_request_token(_request: &mut Self::Request, _token: Option<String>) {}

  fn response_token(_response: &Self::Response) -> Option<&str> {
    None
  }
}

/// What part of a response (or of the input) becomes the output
#[derive(Clone, Debug, PartialEq)]
pub enum Selection<F> {
  /// One member of the response
  Field(F),
  /// The entire response
  Response,
  /// An input parameter, by wire name
  PassThru(String),
  /// No output
  Nothing,
}

impl<F: ValueEnum> Selection<F> {
  /// Parse `*`, `^Parameter` or a response member name
  pub fn parse(value: &str) -> Result<Self, ValidationError> {
    match value {
      "*" => Ok(Self::Response),
      _ => match value.strip_prefix('^') {
        Some(param) => Ok(Self::PassThru(param.to_owned())),
        None => F::from_str(value, true).map(Self::Field).map_err(|_| {
          let mut expected = F::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_owned())
            .collect::<Vec<_>>();
          expected.push("*".to_owned());
          ValidationError::UnknownField {
            field: value.to_owned(),
            expected: expected.join(", "),
          }
        }),
      },
    }
  }
}

/// One unit of output plus side channel notes that are kept apart from it
#[derive(Clone, Debug, PartialEq)]
pub struct Emitted {
  pub value: Value,
  pub notes: BTreeMap<&'static str, String>,
}

type PreHook<O> = Box<dyn Fn(&mut <O as Operation>::Request) + Send + Sync>;
type PostHook<O> = Box<dyn Fn(&<O as Operation>::Response) + Send + Sync>;

/// Customization points applied to every invocation of an operation
pub struct Hooks<O: Operation> {
  pre: Vec<PreHook<O>>,
  post: Vec<PostHook<O>>,
}

impl<O: Operation> Default for Hooks<O> {
  fn default() -> Self {
    Self {
      pre: Vec::new(),
      post: Vec::new(),
    }
  }
}

/// Gate consulted before a mutating operation runs; receives the action and its target
///
/// The gate may block (e.g. on a terminal prompt); it runs on the blocking pool and is abandoned
/// when the invocation is cancelled.
pub type Confirm = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Per-call settings for [`execute`]
pub struct Invocation<O: Operation> {
  pub selection: Option<Selection<O::Field>>,
  pub no_auto_iteration: bool,
  pub cancel: CancellationToken,
  pub hooks: Hooks<O>,
  pub confirm: Option<Confirm>,
  pub resolver: Resolver,
}

impl<O: Operation> Invocation<O> {
  pub fn new(cancel: CancellationToken) -> Self {
    Self {
      selection: None,
      no_auto_iteration: false,
      cancel,
      hooks: Hooks::default(),
      confirm: None,
      resolver: dns_lookup::lookup_host,
    }
  }

  pub fn select(mut self, selection: Selection<O::Field>) -> Self {
    self.selection = Some(selection);
    self
  }

  pub fn no_auto_iteration(mut self, value: bool) -> Self {
    self.no_auto_iteration = value;
    self
  }

  /// Adjust the assembled request before it is sent
  pub fn pre_hook(mut self, hook: impl Fn(&mut O::Request) + Send + Sync + 'static) -> Self {
    self.hooks.pre.push(Box::new(hook));
    self
  }

  /// Observe each response before it is projected
  pub fn post_hook(mut self, hook: impl Fn(&O::Response) + Send + Sync + 'static) -> Self {
    self.hooks.post.push(Box::new(hook));
    self
  }

  pub fn confirm(mut self, confirm: Confirm) -> Self {
    self.confirm = Some(confirm);
    self
  }

  pub fn resolver(mut self, resolver: Resolver) -> Self {
    self.resolver = resolver;
    self
  }
}

/// Summary of a completed invocation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
  /// Number of remote calls made
  pub pages: usize,
  /// The confirmation gate declined the call
  pub declined: bool,
}

/// Render a pass-thru value as a confirmation target
fn target_name(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Array(items) => items.iter().map(target_name).collect::<Vec<_>>().join(", "),
    other => other.to_string(),
  }
}

fn project<O: Operation>(
  response: &O::Response,
  context: &O::Context,
  selection: &Selection<O::Field>,
) -> Result<Option<Value>, InvokeError> {
  let value = match selection {
    Selection::Field(field) => Some(O::project(response, *field)?),
    Selection::Response => Some(serde_json::to_value(response)?),
    Selection::PassThru(_) => O::pass_thru(context),
    Selection::Nothing => None,
  };

  Ok(value)
}

/// Run one operation end to end
///
/// Validation happens before the client is resolved. List operations keep fetching pages, reusing the
/// same request with only its continuation token changed, until no token comes back; a caller supplied
/// starting token (or `no_auto_iteration`) limits the call to one page and exposes the next token as a
/// note. Each page is handed to `sink` as soon as it arrives, so a failure on a later page leaves the
/// earlier pages delivered.
pub async fn execute<O, P>(
  provider: &P,
  params: &O::Params,
  invocation: &Invocation<O>,
  sink: &mut dyn FnMut(Emitted) -> io::Result<()>,
) -> Result<Report, InvokeError>
where
  O: Operation,
  P: ProvideClient<O::Client>,
{
  let context = O::bind(params)?;

  let selection = invocation.selection.clone().unwrap_or_else(O::default_selection);
  if let Selection::PassThru(name) = &selection {
    match O::PASS_THRU {
      Some(param) if param.eq_ignore_ascii_case(name) => {}
      _ => return Err(ValidationError::PassThruUnavailable(name.clone()).into()),
    }
  }

  let mut request = O::assemble(&context);
  for hook in &invocation.hooks.pre {
    hook(&mut request);
  }

  if O::MUTATING {
    if let Some(confirm) = &invocation.confirm {
      let target = O::confirm_target(&context);
      if invocation.cancel.is_cancelled() {
        return Err(InvokeError::Cancelled(O::NAME));
      }

      let gate = confirm.clone();
      let action = O::NAME;
      let prompt_target = target.clone();
      let answer = tokio::select! {
        biased;
        _ = invocation.cancel.cancelled() => return Err(InvokeError::Cancelled(O::NAME)),
        answer = tokio::task::spawn_blocking(move || gate(action, &prompt_target)) => answer,
      };
      let approved = answer.unwrap_or_else(|err| {
        warn!("Confirmation for {} failed: {}", O::NAME, err);
        false
      });

      if !approved {
        info!("{} on '{}' skipped", O::NAME, target);
        return Ok(Report {
          pages: 0,
          declined: true,
        });
      }
    }
  }

  let manual = invocation.no_auto_iteration || O::request_token(&request).is_some();
  debug!(
    "{} request: {}",
    O::NAME,
    serde_json::to_string(&request).unwrap_or_default()
  );

  let client = provider.client();
  let mut report = Report::default();

  loop {
    if invocation.cancel.is_cancelled() {
      return Err(InvokeError::Cancelled(O::NAME));
    }

    let result = tokio::select! {
      biased;
      _ = invocation.cancel.cancelled() => return Err(InvokeError::Cancelled(O::NAME)),
      result = O::invoke(client, &request) => result,
    };
    let response = result.map_err(|failure| {
      let host = provider.endpoint_host(O::SERVICE);
      InvokeError::from_failure(O::NAME, failure, host.as_deref(), invocation.resolver)
    })?;
    report.pages += 1;

    for hook in &invocation.hooks.post {
      hook(&response);
    }

    let next = O::response_token(&response)
      .filter(|token| !token.is_empty())
      .map(str::to_owned);
    debug!("{} page {} received, more pages: {}", O::NAME, report.pages, next.is_some());

    if let Some(value) = project::<O>(&response, &context, &selection)? {
      let mut notes = BTreeMap::new();
      if let (true, Some(name), Some(token)) = (manual, O::TOKEN, &next) {
        notes.insert(name, token.clone());
      }
      sink(Emitted { value, notes })?;
    }

    match next {
      Some(token) if !manual => O::set_request_token(&mut request, Some(token)),
      _ => break,
    }
  }

  Ok(report)
}

/// Run [`execute`] to completion on a dedicated runtime, blocking the calling thread
///
/// Must not be called from within an async context.
pub fn execute_blocking<O, P>(
  provider: &P,
  params: &O::Params,
  invocation: &Invocation<O>,
  sink: &mut dyn FnMut(Emitted) -> io::Result<()>,
) -> Result<Report, InvokeError>
where
  O: Operation,
  P: ProvideClient<O::Client>,
{
  let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
  runtime.block_on(execute::<O, P>(provider, params, invocation, sink))
}
