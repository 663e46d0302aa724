use std::{
  io::{self, BufRead},
  sync::Arc,
};

use anyhow::{bail, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
  client::ProvideClient,
  error::{ErrorRecord, InvokeError, ValidationError},
  operation::{execute, Invocation, Operation, Selection},
  output::{OutputFormat, Printer},
  pipeline,
};

/// Flags shared by every command
#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommonArgs {
  /// Output selection: `*` for the whole response, `^Param` for an input parameter, or a response member
  #[arg(long)]
  pub select: Option<String>,

  /// Output the command's primary input parameter instead of the response
  #[arg(long, conflicts_with = "select")]
  pub pass_thru: bool,

  /// Do not ask for confirmation before changing remote state
  #[arg(long)]
  pub force: bool,

  /// Fetch a single page of a list command and report the token for the next one
  #[arg(long)]
  pub no_auto_iteration: bool,

  /// Read input from stdin, one invocation per line (JSON object or bare value)
  #[arg(long)]
  pub pipeline: bool,
}

impl CommonArgs {
  /// Selection requested on the command line; `None` keeps the operation's default
  pub fn selection<O: Operation>(&self) -> Result<Option<Selection<O::Field>>, ValidationError> {
    if self.pass_thru {
      let param = O::PASS_THRU.ok_or_else(|| ValidationError::PassThruUnavailable("--pass-thru".to_string()))?;
      return Ok(Some(Selection::PassThru(param.to_string())));
    }

    self.select.as_deref().map(Selection::parse).transpose()
  }
}

/// A command: the operation's own parameters plus the shared flags
#[derive(Args, Debug)]
pub struct Invoke<P: Args> {
  #[command(flatten)]
  pub params: P,

  #[command(flatten)]
  pub common: CommonArgs,
}

/// Tally of invocations made for one command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
  pub succeeded: usize,
  pub failed: usize,
}

/// One unit of work: the pipeline line it came from and the parameters bound from it
type Input<P> = (Option<String>, Result<P, ValidationError>);

/// Expand a command into the parameters of each invocation
fn inputs<O: Operation, R: BufRead>(
  params: &O::Params,
  common: &CommonArgs,
  stdin: R,
) -> Result<Vec<Input<O::Params>>> {
  if !common.pipeline {
    return Ok(vec![(None, Ok(params.clone()))]);
  }

  if O::MUTATING && !common.force {
    bail!(
      "{} reads its input from stdin with --pipeline and cannot prompt for confirmation; add --force",
      O::NAME
    );
  }

  let lines = pipeline::read_lines(stdin)?;
  Ok(
    lines
      .into_iter()
      .map(|line| {
        let bound = pipeline::bind_line(params, &line, O::PIPELINE_BY_VALUE);
        (Some(line), bound)
      })
      .collect(),
  )
}

/// Run a command against the given clients, writing output and error records as it goes
///
/// Failures of individual invocations are recorded and counted; only setup problems (unreadable
/// stdin, a pipeline that cannot be confirmed) are returned as errors.
pub async fn dispatch<O, P>(
  provider: &P,
  cmd: &Invoke<O::Params>,
  format: OutputFormat,
  cancel: CancellationToken,
) -> Result<Outcome>
where
  O: Operation,
  O::Params: Args,
  P: ProvideClient<O::Client>,
{
  let mut printer = Printer::stdio(format);
  let mut outcome = Outcome::default();

  let selection = match cmd.common.selection::<O>() {
    Ok(selection) => selection,
    Err(err) => {
      printer.error(&ErrorRecord::new(O::NAME, &InvokeError::from(err), None))?;
      outcome.failed += 1;
      return Ok(outcome);
    }
  };

  let mut invocation = Invocation::<O>::new(cancel).no_auto_iteration(cmd.common.no_auto_iteration);
  if let Some(selection) = selection {
    invocation = invocation.select(selection);
  }
  if O::MUTATING && !cmd.common.force {
    invocation = invocation.confirm(Arc::new(|action: &str, target: &str| {
      pipeline::confirm(action, target, &mut io::stdin().lock(), &mut io::stderr()).unwrap_or(false)
    }));
  }

  let inputs = inputs::<O, _>(&cmd.params, &cmd.common, io::stdin().lock())?;
  for (line, bound) in inputs {
    let result = match bound {
      Ok(params) => execute::<O, P>(provider, &params, &invocation, &mut |emitted| printer.emit(emitted)).await,
      Err(err) => Err(err.into()),
    };

    match result {
      Ok(report) => {
        if report.declined {
          info!("{} declined", O::NAME);
        }
        outcome.succeeded += 1;
      }
      Err(err) => {
        error!("{}", err);
        printer.error(&ErrorRecord::new(O::NAME, &err, line))?;
        outcome.failed += 1;
        if matches!(err, InvokeError::Cancelled(_)) {
          break;
        }
      }
    }
  }

  Ok(outcome)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    emr::{DescribeCluster, DescribeClusterParams, ListClusters},
    resource_explorer::DeleteView,
    translate::ListLanguages,
  };

  #[test]
  fn it_maps_pass_thru_to_the_operation_parameter() {
    let common = CommonArgs {
      pass_thru: true,
      ..Default::default()
    };

    assert_eq!(
      common.selection::<DescribeCluster>().unwrap(),
      Some(Selection::PassThru("ClusterId".to_string()))
    );
    assert!(matches!(
      common.selection::<ListLanguages>(),
      Err(ValidationError::PassThruUnavailable(_))
    ));
  }

  #[test]
  fn it_keeps_the_default_selection_without_flags() {
    assert_eq!(CommonArgs::default().selection::<ListClusters>().unwrap(), None);
  }

  #[test]
  fn it_reports_unknown_fields() {
    let common = CommonArgs {
      select: Some("Clusterz".to_string()),
      ..Default::default()
    };

    assert!(matches!(
      common.selection::<ListClusters>(),
      Err(ValidationError::UnknownField { .. })
    ));
  }

  #[test]
  fn it_runs_once_without_pipeline() {
    let params = DescribeClusterParams {
      cluster_id: Some("j-1".to_string()),
    };

    let inputs = inputs::<DescribeCluster, _>(&params, &CommonArgs::default(), "ignored\n".as_bytes()).unwrap();

    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].0, None);
    assert_eq!(inputs[0].1.as_ref().unwrap().cluster_id.as_deref(), Some("j-1"));
  }

  #[test]
  fn it_binds_each_pipeline_line() {
    let common = CommonArgs {
      pipeline: true,
      ..Default::default()
    };
    let stdin = "j-1\n\n{\"ClusterId\": \"j-2\"}\n{\"Colour\": \"blue\"}\n";

    let inputs = inputs::<DescribeCluster, _>(&DescribeClusterParams::default(), &common, stdin.as_bytes()).unwrap();

    assert_eq!(inputs.len(), 3);
    assert_eq!(inputs[0].1.as_ref().unwrap().cluster_id.as_deref(), Some("j-1"));
    assert_eq!(inputs[1].1.as_ref().unwrap().cluster_id.as_deref(), Some("j-2"));
    assert_eq!(inputs[2].0.as_deref(), Some("{\"Colour\": \"blue\"}"));
    assert!(inputs[2].1.is_err());
  }

  #[test]
  fn it_requires_force_to_pipe_into_mutating_commands() {
    let common = CommonArgs {
      pipeline: true,
      ..Default::default()
    };

    let err = inputs::<DeleteView, _>(&Default::default(), &common, "arn\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("--force"));

    let forced = CommonArgs { force: true, ..common };
    assert_eq!(
      inputs::<DeleteView, _>(&Default::default(), &forced, "arn\n".as_bytes())
        .unwrap()
        .len(),
      1
    );
  }
}
