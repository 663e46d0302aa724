use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
  client::ClientFactory,
  emr,
  invoke::{dispatch, Invoke, Outcome},
  output::OutputFormat,
  resource_explorer, translate,
};

/// Styles for CLI
fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .literal(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightCyan))),
    )
    .usage(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
}

/// Where and how requests are sent
#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConnectionArgs {
  /// AWS region; falls back to AWS_DEFAULT_REGION and then the shared config
  #[arg(long, global = true, env = "AWS_REGION")]
  pub region: Option<String>,

  /// Named profile from the shared config and credentials files
  #[arg(long, global = true, env = "AWS_PROFILE")]
  pub profile: Option<String>,

  /// Send requests to this endpoint instead of the service default
  #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
  pub endpoint_url: Option<String>,

  /// Maximum attempts per request, including the first one
  #[arg(long, global = true, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
  pub max_attempts: u32,
}

#[derive(Debug, Parser)]
#[command(author, about, version)]
#[command(propagate_version = true)]
#[command(styles=get_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  #[clap(flatten)]
  pub verbose: Verbosity,

  /// Disable colored log output
  #[arg(long, global = true)]
  pub no_color: bool,

  #[command(flatten)]
  pub connection: ConnectionArgs,

  /// Format of documents written to stdout
  #[arg(long, global = true, value_enum, default_value_t)]
  pub output: OutputFormat,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// List EMR clusters (ListClusters)
  GetEmrClusterList(Invoke<emr::ListClustersParams>),

  /// Describe an EMR cluster (DescribeCluster)
  GetEmrCluster(Invoke<emr::DescribeClusterParams>),

  /// List the EC2 instances of an EMR cluster (ListInstances)
  GetEmrInstanceList(Invoke<emr::ListInstancesParams>),

  /// Change the step concurrency of an EMR cluster (ModifyCluster)
  EditEmrCluster(Invoke<emr::ModifyClusterParams>),

  /// Resize or reconfigure an EMR instance group (ModifyInstanceGroups)
  EditEmrInstanceGroup(Invoke<emr::ModifyInstanceGroupsParams>),

  /// Turn termination protection of EMR clusters on or off (SetTerminationProtection)
  SetEmrTerminationProtection(Invoke<emr::SetTerminationProtectionParams>),

  /// Tag an EMR cluster (AddTags)
  AddEmrResourceTag(Invoke<emr::AddTagsParams>),

  /// Translate text (TranslateText)
  ConvertTrnText(Invoke<translate::TranslateTextParams>),

  /// List custom terminologies (ListTerminologies)
  GetTrnTerminologyList(Invoke<translate::ListTerminologiesParams>),

  /// List the languages Translate supports (ListLanguages)
  GetTrnLanguageList(Invoke<translate::ListLanguagesParams>),

  /// List batch text translation jobs (ListTextTranslationJobs)
  GetTrnTextTranslationJobList(Invoke<translate::ListTextTranslationJobsParams>),

  /// Delete a custom terminology (DeleteTerminology)
  RemoveTrnTerminology(Invoke<translate::DeleteTerminologyParams>),

  /// Search for resources (Search)
  SearchArexResource(Invoke<resource_explorer::SearchParams>),

  /// List Resource Explorer indexes (ListIndexes)
  GetArexIndexList(Invoke<resource_explorer::ListIndexesParams>),

  /// List Resource Explorer views (ListViews)
  GetArexViewList(Invoke<resource_explorer::ListViewsParams>),

  /// Create a Resource Explorer view (CreateView)
  NewArexView(Invoke<resource_explorer::CreateViewParams>),

  /// Delete a Resource Explorer view (DeleteView)
  RemoveArexView(Invoke<resource_explorer::DeleteViewParams>),
}

impl Cli {
  /// Run the selected command; individual invocation failures are counted in the outcome
  pub async fn run(&self, cancel: CancellationToken) -> Result<Outcome> {
    let config = crate::get_sdk_config(&self.connection).await?;
    let factory = ClientFactory::new(config, self.connection.max_attempts);
    let format = self.output;

    match &self.command {
      Commands::GetEmrClusterList(cmd) => dispatch::<emr::ListClusters, _>(&factory, cmd, format, cancel).await,
      Commands::GetEmrCluster(cmd) => dispatch::<emr::DescribeCluster, _>(&factory, cmd, format, cancel).await,
      Commands::GetEmrInstanceList(cmd) => dispatch::<emr::ListInstances, _>(&factory, cmd, format, cancel).await,
      Commands::EditEmrCluster(cmd) => dispatch::<emr::ModifyCluster, _>(&factory, cmd, format, cancel).await,
      Commands::EditEmrInstanceGroup(cmd) => {
        dispatch::<emr::ModifyInstanceGroups, _>(&factory, cmd, format, cancel).await
      }
      Commands::SetEmrTerminationProtection(cmd) => {
        dispatch::<emr::SetTerminationProtection, _>(&factory, cmd, format, cancel).await
      }
      Commands::AddEmrResourceTag(cmd) => dispatch::<emr::AddTags, _>(&factory, cmd, format, cancel).await,
      Commands::ConvertTrnText(cmd) => dispatch::<translate::TranslateText, _>(&factory, cmd, format, cancel).await,
      Commands::GetTrnTerminologyList(cmd) => {
        dispatch::<translate::ListTerminologies, _>(&factory, cmd, format, cancel).await
      }
      Commands::GetTrnLanguageList(cmd) => dispatch::<translate::ListLanguages, _>(&factory, cmd, format, cancel).await,
      Commands::GetTrnTextTranslationJobList(cmd) => {
        dispatch::<translate::ListTextTranslationJobs, _>(&factory, cmd, format, cancel).await
      }
      Commands::RemoveTrnTerminology(cmd) => {
        dispatch::<translate::DeleteTerminology, _>(&factory, cmd, format, cancel).await
      }
      Commands::SearchArexResource(cmd) => {
        dispatch::<resource_explorer::Search, _>(&factory, cmd, format, cancel).await
      }
      Commands::GetArexIndexList(cmd) => {
        dispatch::<resource_explorer::ListIndexes, _>(&factory, cmd, format, cancel).await
      }
      Commands::GetArexViewList(cmd) => {
        dispatch::<resource_explorer::ListViews, _>(&factory, cmd, format, cancel).await
      }
      Commands::NewArexView(cmd) => dispatch::<resource_explorer::CreateView, _>(&factory, cmd, format, cancel).await,
      Commands::RemoveArexView(cmd) => {
        dispatch::<resource_explorer::DeleteView, _>(&factory, cmd, format, cancel).await
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use assert_cmd::Command;
  use clap::CommandFactory;
  use rstest::*;

  use super::*;

  fn cloudlet() -> Command {
    let bin_under_test = escargot::CargoBuild::new()
      .bin("cloudlet")
      .current_release()
      .current_target()
      .run()
      .unwrap();

    let mut cmd = Command::from_std(bin_under_test.command());
    // Keep the region lookup and any stray request local and fast
    cmd
      .env("AWS_REGION", "us-east-1")
      .env("AWS_ENDPOINT_URL", "http://127.0.0.1:9")
      .env("AWS_ACCESS_KEY_ID", "test")
      .env("AWS_SECRET_ACCESS_KEY", "test")
      .env("AWS_EC2_METADATA_DISABLED", "true");
    cmd
  }

  #[test]
  fn it_verifies_the_command_definition() {
    Cli::command().debug_assert();
  }

  #[test]
  fn it_parses_global_flags_after_the_command() {
    let cli = Cli::try_parse_from([
      "cloudlet",
      "get-emr-cluster-list",
      "--cluster-states",
      "RUNNING,WAITING",
      "--region",
      "eu-west-1",
      "--output",
      "yaml",
    ])
    .unwrap();

    assert_eq!(cli.connection.region.as_deref(), Some("eu-west-1"));
    assert!(matches!(cli.output, OutputFormat::Yaml));
    match cli.command {
      Commands::GetEmrClusterList(cmd) => assert_eq!(
        cmd.params.cluster_states,
        Some(vec!["RUNNING".to_string(), "WAITING".to_string()])
      ),
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn it_rejects_select_with_pass_thru() {
    let result = Cli::try_parse_from(["cloudlet", "get-emr-cluster", "j-1", "--select", "*", "--pass-thru"]);
    assert!(result.is_err());
  }

  #[test]
  fn it_lists_every_command() {
    let help = Cli::command().render_long_help().to_string();
    for name in [
      "get-emr-cluster-list",
      "get-emr-cluster",
      "get-emr-instance-list",
      "edit-emr-cluster",
      "edit-emr-instance-group",
      "set-emr-termination-protection",
      "add-emr-resource-tag",
      "convert-trn-text",
      "get-trn-terminology-list",
      "get-trn-language-list",
      "get-trn-text-translation-job-list",
      "remove-trn-terminology",
      "search-arex-resource",
      "get-arex-index-list",
      "get-arex-view-list",
      "new-arex-view",
      "remove-arex-view",
    ] {
      assert!(help.contains(name), "{name} missing from help");
    }
  }

  #[rstest]
  #[case(&["get-emr-cluster"], "missing required parameter --cluster-id")]
  #[case(&["get-emr-cluster-list", "--active", "--cluster-states", "RUNNING"], "cannot be used together")]
  #[case(&["get-emr-instance-list", "j-1", "--instance-state", "napping"], "invalid value 'napping'")]
  #[case(&["get-trn-language-list", "--select", "Colour"], "unknown output field 'Colour'")]
  #[case(&["get-arex-view-list", "--pass-thru"], "cannot be passed through")]
  fn it_reports_validation_errors(#[case] args: &[&str], #[case] message: &str) {
    let output = cloudlet().args(args).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    let record = stderr
      .lines()
      .find(|line| line.starts_with('{'))
      .expect("error record on stderr");
    let record: serde_json::Value = serde_json::from_str(record).unwrap();
    assert_eq!(record["Category"], "Validation");
    assert!(record["Message"].as_str().unwrap().contains(message), "{record}");
  }

  #[test]
  fn it_records_each_failed_pipeline_item() {
    let output = cloudlet()
      .args(["get-emr-cluster", "--pipeline"])
      .write_stdin("{\"Colour\": \"blue\"}\n{\"Shape\": \"round\"}\n")
      .output()
      .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    let records = stderr.lines().filter(|line| line.starts_with('{')).count();
    assert_eq!(records, 2);
  }

  #[test]
  fn it_refuses_to_pipe_into_mutating_commands_without_force() {
    cloudlet()
      .args(["remove-arex-view", "--pipeline"])
      .write_stdin("arn:aws:resource-explorer-2:us-east-1:111122223333:view/v/1\n")
      .assert()
      .code(2);
  }

  #[test]
  fn it_succeeds_on_an_empty_pipeline() {
    cloudlet()
      .args(["get-emr-cluster", "--pipeline"])
      .write_stdin("\n")
      .assert()
      .success()
      .stdout("");
  }
}
