use aws_sdk_emr::{
  types::{self, ClusterState},
  Client,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  client::Service,
  dto::{enum_values, required, timestamp, Empty, KeyValue, NoField, Timestamp},
  error::{InvokeFailure, ValidationError},
  operation::{Operation, Selection},
};

/// States matched by `--active`
const ACTIVE_STATES: &[&str] = &["STARTING", "BOOTSTRAPPING", "RUNNING", "WAITING"];

/// Summary of a cluster as listed
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterSummary {
  pub id: Option<String>,
  pub name: Option<String>,
  pub state: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub state_change_reason: Option<String>,
  pub creation_date_time: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_date_time: Option<String>,
  pub normalized_instance_hours: Option<i32>,
  pub cluster_arn: Option<String>,
}

impl From<&types::ClusterSummary> for ClusterSummary {
  fn from(summary: &types::ClusterSummary) -> Self {
    let status = summary.status();
    let timeline = status.and_then(|s| s.timeline());

    Self {
      id: summary.id().map(str::to_owned),
      name: summary.name().map(str::to_owned),
      state: status.and_then(|s| s.state()).map(|s| s.as_str().to_owned()),
      state_change_reason: status
        .and_then(|s| s.state_change_reason())
        .and_then(|r| r.message())
        .map(str::to_owned),
      creation_date_time: timestamp(timeline.and_then(|t| t.creation_date_time())),
      end_date_time: timestamp(timeline.and_then(|t| t.end_date_time())),
      normalized_instance_hours: summary.normalized_instance_hours(),
      cluster_arn: summary.cluster_arn().map(str::to_owned),
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Application {
  pub name: Option<String>,
  pub version: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
  pub key: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
}

impl From<&KeyValue> for Tag {
  fn from(kv: &KeyValue) -> Self {
    Self {
      key: kv.key.clone(),
      value: kv.value.clone(),
    }
  }
}

/// Cluster details as described
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cluster {
  pub id: Option<String>,
  pub name: Option<String>,
  pub state: Option<String>,
  pub cluster_arn: Option<String>,
  pub release_label: Option<String>,
  pub instance_collection_type: Option<String>,
  pub master_public_dns_name: Option<String>,
  pub auto_terminate: Option<bool>,
  pub termination_protected: Option<bool>,
  pub step_concurrency_level: Option<i32>,
  pub normalized_instance_hours: Option<i32>,
  pub applications: Vec<Application>,
  pub tags: Vec<Tag>,
}

impl From<&types::Cluster> for Cluster {
  fn from(cluster: &types::Cluster) -> Self {
    Self {
      id: cluster.id().map(str::to_owned),
      name: cluster.name().map(str::to_owned),
      state: cluster
        .status()
        .and_then(|s| s.state())
        .map(|s| s.as_str().to_owned()),
      cluster_arn: cluster.cluster_arn().map(str::to_owned),
      release_label: cluster.release_label().map(str::to_owned),
      instance_collection_type: cluster.instance_collection_type().map(|t| t.as_str().to_owned()),
      master_public_dns_name: cluster.master_public_dns_name().map(str::to_owned),
      auto_terminate: cluster.auto_terminate(),
      termination_protected: cluster.termination_protected(),
      step_concurrency_level: cluster.step_concurrency_level(),
      normalized_instance_hours: cluster.normalized_instance_hours(),
      applications: cluster
        .applications()
        .iter()
        .map(|a| Application {
          name: a.name().map(str::to_owned),
          version: a.version().map(str::to_owned),
        })
        .collect(),
      tags: cluster
        .tags()
        .iter()
        .filter_map(|t| {
          t.key().map(|key| Tag {
            key: key.to_owned(),
            value: t.value().map(str::to_owned),
          })
        })
        .collect(),
    }
  }
}

// ListClusters

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListClustersParams {
  /// Only clusters created after this time (RFC 3339 or epoch seconds)
  #[arg(long, alias = "created-after-utc")]
  pub created_after: Option<Timestamp>,

  /// Only clusters created before this time (RFC 3339 or epoch seconds)
  #[arg(long, alias = "created-before-utc")]
  pub created_before: Option<Timestamp>,

  /// Only clusters in these states (e.g. RUNNING,WAITING)
  #[arg(long, alias = "cluster-state", value_delimiter = ',')]
  pub cluster_states: Option<Vec<String>>,

  /// Only clusters that are starting, bootstrapping, running or waiting
  #[arg(long)]
  pub active: bool,

  /// Marker returned by a previous call; only that page is fetched
  #[arg(long)]
  pub marker: Option<String>,
}

#[derive(Debug)]
pub struct ListClustersContext {
  created_after: Option<Timestamp>,
  created_before: Option<Timestamp>,
  cluster_states: Option<Vec<String>>,
  marker: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListClustersRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_after: Option<Timestamp>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_before: Option<Timestamp>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cluster_states: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub marker: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListClustersResponse {
  pub clusters: Vec<ClusterSummary>,
  pub marker: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ListClustersField {
  Clusters,
  Marker,
}

/// `get-emr-cluster-list`
pub struct ListClusters;

impl Operation for ListClusters {
  const NAME: &'static str = "ListClusters";
  const SERVICE: Service = Service::Emr;
  const TOKEN: Option<&'static str> = Some("Marker");

  type Client = Client;
  type Params = ListClustersParams;
  type Context = ListClustersContext;
  type Request = ListClustersRequest;
  type Response = ListClustersResponse;
  type Field = ListClustersField;

  fn bind(params: &ListClustersParams) -> Result<ListClustersContext, ValidationError> {
    let cluster_states = match (params.active, &params.cluster_states) {
      (true, Some(_)) => return Err(ValidationError::MutuallyExclusive("active", "cluster-states")),
      (true, None) => Some(ACTIVE_STATES.iter().map(|s| s.to_string()).collect()),
      (false, states) => enum_values("cluster-states", states, ClusterState::values())?,
    };

    Ok(ListClustersContext {
      created_after: params.created_after,
      created_before: params.created_before,
      cluster_states,
      marker: params.marker.clone(),
    })
  }

  fn assemble(context: &ListClustersContext) -> ListClustersRequest {
    ListClustersRequest {
      created_after: context.created_after,
      created_before: context.created_before,
      cluster_states: context.cluster_states.clone(),
      marker: context.marker.clone(),
    }
  }

  async fn invoke(client: &Client, request: &ListClustersRequest) -> Result<ListClustersResponse, InvokeFailure> {
    let output = client
      .list_clusters()
      .set_created_after(request.created_after.map(Timestamp::into_inner))
      .set_created_before(request.created_before.map(Timestamp::into_inner))
      .set_cluster_states(
        request
          .cluster_states
          .as_ref()
          .map(|states| states.iter().map(|s| ClusterState::from(s.as_str())).collect()),
      )
      .set_marker(request.marker.clone())
      .send()
      .await?;

    Ok(ListClustersResponse {
      clusters: output.clusters().iter().map(ClusterSummary::from).collect(),
      marker: output.marker().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<ListClustersField> {
    Selection::Field(ListClustersField::Clusters)
  }

  fn project(response: &ListClustersResponse, field: ListClustersField) -> serde_json::Result<Value> {
    match field {
      ListClustersField::Clusters => serde_json::to_value(&response.clusters),
      ListClustersField::Marker => serde_json::to_value(&response.marker),
    }
  }

  fn request_token(request: &ListClustersRequest) -> Option<&str> {
    request.marker.as_deref()
  }

  fn set_request_token(request: &mut ListClustersRequest, token: Option<String>) {
    request.marker = token;
  }

  fn response_token(response: &ListClustersResponse) -> Option<&str> {
    response.marker.as_deref()
  }
}

// DescribeCluster

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct DescribeClusterParams {
  /// Identifier of the cluster (j-XXXXXXXXXXXX)
  #[arg(value_name = "CLUSTER_ID")]
  pub cluster_id: Option<String>,
}

#[derive(Debug)]
pub struct DescribeClusterContext {
  cluster_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeClusterRequest {
  pub cluster_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeClusterResponse {
  pub cluster: Option<Cluster>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum DescribeClusterField {
  Cluster,
}

/// `get-emr-cluster`
pub struct DescribeCluster;

impl Operation for DescribeCluster {
  const NAME: &'static str = "DescribeCluster";
  const SERVICE: Service = Service::Emr;
  const PASS_THRU: Option<&'static str> = Some("ClusterId");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("cluster_id");

  type Client = Client;
  type Params = DescribeClusterParams;
  type Context = DescribeClusterContext;
  type Request = DescribeClusterRequest;
  type Response = DescribeClusterResponse;
  type Field = DescribeClusterField;

  fn bind(params: &DescribeClusterParams) -> Result<DescribeClusterContext, ValidationError> {
    Ok(DescribeClusterContext {
      cluster_id: required("cluster-id", &params.cluster_id)?,
    })
  }

  fn assemble(context: &DescribeClusterContext) -> DescribeClusterRequest {
    DescribeClusterRequest {
      cluster_id: context.cluster_id.clone(),
    }
  }

  async fn invoke(client: &Client, request: &DescribeClusterRequest) -> Result<DescribeClusterResponse, InvokeFailure> {
    let output = client
      .describe_cluster()
      .cluster_id(request.cluster_id.clone())
      .send()
      .await?;

    Ok(DescribeClusterResponse {
      cluster: output.cluster().map(Cluster::from),
    })
  }

  fn default_selection() -> Selection<DescribeClusterField> {
    Selection::Field(DescribeClusterField::Cluster)
  }

  fn project(response: &DescribeClusterResponse, field: DescribeClusterField) -> serde_json::Result<Value> {
    match field {
      DescribeClusterField::Cluster => serde_json::to_value(&response.cluster),
    }
  }

  fn pass_thru(context: &DescribeClusterContext) -> Option<Value> {
    Some(Value::String(context.cluster_id.clone()))
  }
}

// ModifyCluster

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModifyClusterParams {
  /// Identifier of the cluster (j-XXXXXXXXXXXX)
  #[arg(value_name = "CLUSTER_ID")]
  pub cluster_id: Option<String>,

  /// Number of steps that can run concurrently (0 is sent as given)
  #[arg(long)]
  pub step_concurrency_level: Option<i32>,
}

#[derive(Debug)]
pub struct ModifyClusterContext {
  cluster_id: String,
  step_concurrency_level: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyClusterRequest {
  pub cluster_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub step_concurrency_level: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyClusterResponse {
  pub step_concurrency_level: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ModifyClusterField {
  StepConcurrencyLevel,
}

/// `edit-emr-cluster`
pub struct ModifyCluster;

impl Operation for ModifyCluster {
  const NAME: &'static str = "ModifyCluster";
  const SERVICE: Service = Service::Emr;
  const MUTATING: bool = true;
  const PASS_THRU: Option<&'static str> = Some("ClusterId");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("cluster_id");

  type Client = Client;
  type Params = ModifyClusterParams;
  type Context = ModifyClusterContext;
  type Request = ModifyClusterRequest;
  type Response = ModifyClusterResponse;
  type Field = ModifyClusterField;

  fn bind(params: &ModifyClusterParams) -> Result<ModifyClusterContext, ValidationError> {
    Ok(ModifyClusterContext {
      cluster_id: required("cluster-id", &params.cluster_id)?,
      step_concurrency_level: params.step_concurrency_level,
    })
  }

  fn assemble(context: &ModifyClusterContext) -> ModifyClusterRequest {
    ModifyClusterRequest {
      cluster_id: context.cluster_id.clone(),
      step_concurrency_level: context.step_concurrency_level,
    }
  }

  async fn invoke(client: &Client, request: &ModifyClusterRequest) -> Result<ModifyClusterResponse, InvokeFailure> {
    let output = client
      .modify_cluster()
      .cluster_id(request.cluster_id.clone())
      .set_step_concurrency_level(request.step_concurrency_level)
      .send()
      .await?;

    Ok(ModifyClusterResponse {
      step_concurrency_level: output.step_concurrency_level(),
    })
  }

  fn default_selection() -> Selection<ModifyClusterField> {
    Selection::Field(ModifyClusterField::StepConcurrencyLevel)
  }

  fn project(response: &ModifyClusterResponse, field: ModifyClusterField) -> serde_json::Result<Value> {
    match field {
      ModifyClusterField::StepConcurrencyLevel => serde_json::to_value(response.step_concurrency_level),
    }
  }

  fn pass_thru(context: &ModifyClusterContext) -> Option<Value> {
    Some(Value::String(context.cluster_id.clone()))
  }
}

// SetTerminationProtection

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct SetTerminationProtectionParams {
  /// Identifiers of the clusters (job flows) to update
  #[arg(value_name = "JOB_FLOW_ID", value_delimiter = ',')]
  pub job_flow_ids: Option<Vec<String>>,

  /// Whether termination protection is enabled (true) or disabled (false)
  #[arg(long, alias = "protected")]
  pub termination_protected: Option<bool>,
}

#[derive(Debug)]
pub struct SetTerminationProtectionContext {
  job_flow_ids: Vec<String>,
  termination_protected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetTerminationProtectionRequest {
  pub job_flow_ids: Vec<String>,
  pub termination_protected: bool,
}

/// `set-emr-termination-protection`
pub struct SetTerminationProtection;

impl Operation for SetTerminationProtection {
  const NAME: &'static str = "SetTerminationProtection";
  const SERVICE: Service = Service::Emr;
  const MUTATING: bool = true;
  const PASS_THRU: Option<&'static str> = Some("JobFlowId");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("job_flow_ids");

  type Client = Client;
  type Params = SetTerminationProtectionParams;
  type Context = SetTerminationProtectionContext;
  type Request = SetTerminationProtectionRequest;
  type Response = Empty;
  type Field = NoField;

  fn bind(params: &SetTerminationProtectionParams) -> Result<SetTerminationProtectionContext, ValidationError> {
    let job_flow_ids = required("job-flow-id", &params.job_flow_ids)?;
    if job_flow_ids.is_empty() {
      return Err(ValidationError::MissingRequired("job-flow-id"));
    }

    Ok(SetTerminationProtectionContext {
      job_flow_ids,
      termination_protected: required("termination-protected", &params.termination_protected)?,
    })
  }

  fn assemble(context: &SetTerminationProtectionContext) -> SetTerminationProtectionRequest {
    SetTerminationProtectionRequest {
      job_flow_ids: context.job_flow_ids.clone(),
      termination_protected: context.termination_protected,
    }
  }

  async fn invoke(client: &Client, request: &SetTerminationProtectionRequest) -> Result<Empty, InvokeFailure> {
    client
      .set_termination_protection()
      .set_job_flow_ids(Some(request.job_flow_ids.clone()))
      .termination_protected(request.termination_protected)
      .send()
      .await?;

    Ok(Empty {})
  }

  fn default_selection() -> Selection<NoField> {
    Selection::Nothing
  }

  fn project(_response: &Empty, field: NoField) -> serde_json::Result<Value> {
    match field {}
  }

  fn pass_thru(context: &SetTerminationProtectionContext) -> Option<Value> {
    Some(Value::from(context.job_flow_ids.clone()))
  }
}

// AddTags

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct AddTagsParams {
  /// Identifier of the cluster to tag
  #[arg(value_name = "RESOURCE_ID")]
  pub resource_id: Option<String>,

  /// Tag as Key=Value (repeatable)
  #[arg(long = "tag", alias = "tags")]
  pub tags: Option<Vec<KeyValue>>,
}

#[derive(Debug)]
pub struct AddTagsContext {
  resource_id: String,
  tags: Vec<KeyValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddTagsRequest {
  pub resource_id: String,
  pub tags: Vec<Tag>,
}

/// `add-emr-resource-tag`
pub struct AddTags;

impl Operation for AddTags {
  const NAME: &'static str = "AddTags";
  const SERVICE: Service = Service::Emr;
  const MUTATING: bool = true;
  const PASS_THRU: Option<&'static str> = Some("ResourceId");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("resource_id");

  type Client = Client;
  type Params = AddTagsParams;
  type Context = AddTagsContext;
  type Request = AddTagsRequest;
  type Response = Empty;
  type Field = NoField;

  fn bind(params: &AddTagsParams) -> Result<AddTagsContext, ValidationError> {
    Ok(AddTagsContext {
      resource_id: required("resource-id", &params.resource_id)?,
      tags: required("tag", &params.tags)?,
    })
  }

  fn assemble(context: &AddTagsContext) -> AddTagsRequest {
    AddTagsRequest {
      resource_id: context.resource_id.clone(),
      tags: context.tags.iter().map(Tag::from).collect(),
    }
  }

  async fn invoke(client: &Client, request: &AddTagsRequest) -> Result<Empty, InvokeFailure> {
    let tags = request
      .tags
      .iter()
      .map(|t| {
        types::Tag::builder()
          .key(t.key.clone())
          .set_value(t.value.clone())
          .build()
      })
      .collect();

    client
      .add_tags()
      .resource_id(request.resource_id.clone())
      .set_tags(Some(tags))
      .send()
      .await?;

    Ok(Empty {})
  }

  fn default_selection() -> Selection<NoField> {
    Selection::Nothing
  }

  fn project(_response: &Empty, field: NoField) -> serde_json::Result<Value> {
    match field {}
  }

  fn pass_thru(context: &AddTagsContext) -> Option<Value> {
    Some(Value::String(context.resource_id.clone()))
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;

  #[test]
  fn it_omits_unbound_list_filters() {
    let context = ListClusters::bind(&ListClustersParams::default()).unwrap();
    let request = ListClusters::assemble(&context);

    assert_eq!(serde_json::to_value(&request).unwrap(), serde_json::json!({}));
  }

  #[test]
  fn it_expands_active_states() {
    let params = ListClustersParams {
      active: true,
      ..Default::default()
    };
    let request = ListClusters::assemble(&ListClusters::bind(&params).unwrap());

    assert_eq!(
      request.cluster_states,
      Some(vec![
        "STARTING".to_string(),
        "BOOTSTRAPPING".to_string(),
        "RUNNING".to_string(),
        "WAITING".to_string()
      ])
    );
  }

  #[test]
  fn it_rejects_active_with_explicit_states() {
    let params = ListClustersParams {
      active: true,
      cluster_states: Some(vec!["RUNNING".to_string()]),
      ..Default::default()
    };

    assert_eq!(
      ListClusters::bind(&params).unwrap_err(),
      ValidationError::MutuallyExclusive("active", "cluster-states")
    );
  }

  #[rstest]
  #[case(vec!["running"], Ok(vec!["RUNNING"]))]
  #[case(vec!["waiting", "terminated-with-errors"], Ok(vec!["WAITING", "TERMINATED_WITH_ERRORS"]))]
  #[case(vec!["napping"], Err(()))]
  fn it_validates_cluster_states(#[case] states: Vec<&str>, #[case] expected: Result<Vec<&str>, ()>) {
    let params = ListClustersParams {
      cluster_states: Some(states.iter().map(|s| s.to_string()).collect()),
      ..Default::default()
    };

    let result = ListClusters::bind(&params).map(|c| c.cluster_states.unwrap());
    match expected {
      Ok(states) => assert_eq!(result.unwrap(), states),
      Err(()) => assert!(matches!(result, Err(ValidationError::InvalidValue { .. }))),
    }
  }

  #[test]
  fn it_pages_on_the_marker() {
    let params = ListClustersParams {
      marker: Some("m1".to_string()),
      ..Default::default()
    };
    let mut request = ListClusters::assemble(&ListClusters::bind(&params).unwrap());
    assert_eq!(ListClusters::request_token(&request), Some("m1"));

    ListClusters::set_request_token(&mut request, Some("m2".to_string()));
    assert_eq!(serde_json::to_value(&request).unwrap(), serde_json::json!({"Marker": "m2"}));
  }

  #[test]
  fn it_projects_list_fields() {
    let response = ListClustersResponse {
      clusters: vec![ClusterSummary {
        id: Some("j-1".to_string()),
        ..Default::default()
      }],
      marker: Some("next".to_string()),
    };

    let clusters = ListClusters::project(&response, ListClustersField::Clusters).unwrap();
    assert_eq!(clusters[0]["Id"], "j-1");
    assert_eq!(
      ListClusters::project(&response, ListClustersField::Marker).unwrap(),
      serde_json::json!("next")
    );
  }

  #[test]
  fn it_requires_a_cluster_id() {
    assert_eq!(
      DescribeCluster::bind(&DescribeClusterParams::default()).unwrap_err(),
      ValidationError::MissingRequired("cluster-id")
    );
  }

  #[rstest]
  #[case(None, serde_json::json!({"ClusterId": "j-1"}))]
  #[case(Some(0), serde_json::json!({"ClusterId": "j-1", "StepConcurrencyLevel": 0}))]
  #[case(Some(4), serde_json::json!({"ClusterId": "j-1", "StepConcurrencyLevel": 4}))]
  fn it_distinguishes_absent_from_zero(#[case] level: Option<i32>, #[case] expected: Value) {
    let params = ModifyClusterParams {
      cluster_id: Some("j-1".to_string()),
      step_concurrency_level: level,
    };
    let context = ModifyCluster::bind(&params).unwrap();

    let request = ModifyCluster::assemble(&context);
    assert_eq!(serde_json::to_value(&request).unwrap(), expected);
    assert_eq!(request, ModifyCluster::assemble(&context));
  }

  #[test]
  fn it_requires_termination_protection_inputs() {
    let params = SetTerminationProtectionParams {
      job_flow_ids: Some(vec![]),
      termination_protected: Some(true),
    };
    assert_eq!(
      SetTerminationProtection::bind(&params).unwrap_err(),
      ValidationError::MissingRequired("job-flow-id")
    );

    let params = SetTerminationProtectionParams {
      job_flow_ids: Some(vec!["j-1".to_string()]),
      termination_protected: None,
    };
    assert_eq!(
      SetTerminationProtection::bind(&params).unwrap_err(),
      ValidationError::MissingRequired("termination-protected")
    );
  }

  #[test]
  fn it_sends_explicit_false() {
    let params = SetTerminationProtectionParams {
      job_flow_ids: Some(vec!["j-1".to_string(), "j-2".to_string()]),
      termination_protected: Some(false),
    };
    let context = SetTerminationProtection::bind(&params).unwrap();

    assert_eq!(
      serde_json::to_value(SetTerminationProtection::assemble(&context)).unwrap(),
      serde_json::json!({"JobFlowIds": ["j-1", "j-2"], "TerminationProtected": false})
    );
    assert_eq!(
      SetTerminationProtection::pass_thru(&context),
      Some(serde_json::json!(["j-1", "j-2"]))
    );
  }

  #[test]
  fn it_assembles_tags() {
    let params = AddTagsParams {
      resource_id: Some("j-1".to_string()),
      tags: Some(vec!["env=prod".parse().unwrap(), "adhoc".parse().unwrap()]),
    };
    let request = AddTags::assemble(&AddTags::bind(&params).unwrap());

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      serde_json::json!({
        "ResourceId": "j-1",
        "Tags": [{"Key": "env", "Value": "prod"}, {"Key": "adhoc"}],
      })
    );
  }
}
