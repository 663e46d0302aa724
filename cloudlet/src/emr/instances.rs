use aws_sdk_emr::{
  types::{self, InstanceFleetType, InstanceGroupType, InstanceState},
  Client,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  client::Service,
  dto::{enum_value, enum_values, required, Empty, Group, NoField},
  error::{InvokeFailure, ValidationError},
  operation::{Operation, Selection},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
  pub id: Option<String>,
  pub ec2_instance_id: Option<String>,
  pub state: Option<String>,
  pub instance_type: Option<String>,
  pub market: Option<String>,
  pub instance_group_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_fleet_id: Option<String>,
  pub private_dns_name: Option<String>,
  pub private_ip_address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub public_dns_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub public_ip_address: Option<String>,
}

impl From<&types::Instance> for Instance {
  fn from(instance: &types::Instance) -> Self {
    Self {
      id: instance.id().map(str::to_owned),
      ec2_instance_id: instance.ec2_instance_id().map(str::to_owned),
      state: instance
        .status()
        .and_then(|s| s.state())
        .map(|s| s.as_str().to_owned()),
      instance_type: instance.instance_type().map(str::to_owned),
      market: instance.market().map(|m| m.as_str().to_owned()),
      instance_group_id: instance.instance_group_id().map(str::to_owned),
      instance_fleet_id: instance.instance_fleet_id().map(str::to_owned),
      private_dns_name: instance.private_dns_name().map(str::to_owned),
      private_ip_address: instance.private_ip_address().map(str::to_owned),
      public_dns_name: instance.public_dns_name().filter(|s| !s.is_empty()).map(str::to_owned),
      public_ip_address: instance.public_ip_address().map(str::to_owned),
    }
  }
}

// ListInstances

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListInstancesParams {
  /// Identifier of the cluster (j-XXXXXXXXXXXX)
  #[arg(value_name = "CLUSTER_ID")]
  pub cluster_id: Option<String>,

  /// Only instances of this instance group
  #[arg(long)]
  pub instance_group_id: Option<String>,

  /// Only instances of these group types (MASTER, CORE, TASK)
  #[arg(long, alias = "instance-group-type", value_delimiter = ',')]
  pub instance_group_types: Option<Vec<String>>,

  /// Only instances of this instance fleet
  #[arg(long)]
  pub instance_fleet_id: Option<String>,

  /// Only instances of this fleet type (MASTER, CORE, TASK)
  #[arg(long)]
  pub instance_fleet_type: Option<String>,

  /// Only instances in these states (e.g. RUNNING,BOOTSTRAPPING)
  #[arg(long, alias = "instance-state", value_delimiter = ',')]
  pub instance_states: Option<Vec<String>>,

  /// Marker returned by a previous call; only that page is fetched
  #[arg(long)]
  pub marker: Option<String>,
}

#[derive(Debug)]
pub struct ListInstancesContext {
  cluster_id: String,
  instance_group_id: Option<String>,
  instance_group_types: Option<Vec<String>>,
  instance_fleet_id: Option<String>,
  instance_fleet_type: Option<String>,
  instance_states: Option<Vec<String>>,
  marker: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListInstancesRequest {
  pub cluster_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_group_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_group_types: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_fleet_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_fleet_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_states: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub marker: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListInstancesResponse {
  pub instances: Vec<Instance>,
  pub marker: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ListInstancesField {
  Instances,
  Marker,
}

/// `get-emr-instance-list`
pub struct ListInstances;

impl Operation for ListInstances {
  const NAME: &'static str = "ListInstances";
  const SERVICE: Service = Service::Emr;
  const TOKEN: Option<&'static str> = Some("Marker");
  const PASS_THRU: Option<&'static str> = Some("ClusterId");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("cluster_id");

  type Client = Client;
  type Params = ListInstancesParams;
  type Context = ListInstancesContext;
  type Request = ListInstancesRequest;
  type Response = ListInstancesResponse;
  type Field = ListInstancesField;

  fn bind(params: &ListInstancesParams) -> Result<ListInstancesContext, ValidationError> {
    if params.instance_group_id.is_some() && params.instance_fleet_id.is_some() {
      return Err(ValidationError::MutuallyExclusive("instance-group-id", "instance-fleet-id"));
    }

    Ok(ListInstancesContext {
      cluster_id: required("cluster-id", &params.cluster_id)?,
      instance_group_id: params.instance_group_id.clone(),
      instance_group_types: enum_values(
        "instance-group-types",
        &params.instance_group_types,
        InstanceGroupType::values(),
      )?,
      instance_fleet_id: params.instance_fleet_id.clone(),
      instance_fleet_type: params
        .instance_fleet_type
        .as_deref()
        .map(|t| enum_value("instance-fleet-type", t, InstanceFleetType::values()))
        .transpose()?,
      instance_states: enum_values("instance-states", &params.instance_states, InstanceState::values())?,
      marker: params.marker.clone(),
    })
  }

  fn assemble(context: &ListInstancesContext) -> ListInstancesRequest {
    ListInstancesRequest {
      cluster_id: context.cluster_id.clone(),
      instance_group_id: context.instance_group_id.clone(),
      instance_group_types: context.instance_group_types.clone(),
      instance_fleet_id: context.instance_fleet_id.clone(),
      instance_fleet_type: context.instance_fleet_type.clone(),
      instance_states: context.instance_states.clone(),
      marker: context.marker.clone(),
    }
  }

  async fn invoke(client: &Client, request: &ListInstancesRequest) -> Result<ListInstancesResponse, InvokeFailure> {
    let output = client
      .list_instances()
      .cluster_id(request.cluster_id.clone())
      .set_instance_group_id(request.instance_group_id.clone())
      .set_instance_group_types(
        request
          .instance_group_types
          .as_ref()
          .map(|types| types.iter().map(|t| InstanceGroupType::from(t.as_str())).collect()),
      )
      .set_instance_fleet_id(request.instance_fleet_id.clone())
      .set_instance_fleet_type(request.instance_fleet_type.as_deref().map(InstanceFleetType::from))
      .set_instance_states(
        request
          .instance_states
          .as_ref()
          .map(|states| states.iter().map(|s| InstanceState::from(s.as_str())).collect()),
      )
      .set_marker(request.marker.clone())
      .send()
      .await?;

    Ok(ListInstancesResponse {
      instances: output.instances().iter().map(Instance::from).collect(),
      marker: output.marker().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<ListInstancesField> {
    Selection::Field(ListInstancesField::Instances)
  }

  fn project(response: &ListInstancesResponse, field: ListInstancesField) -> serde_json::Result<Value> {
    match field {
      ListInstancesField::Instances => serde_json::to_value(&response.instances),
      ListInstancesField::Marker => serde_json::to_value(&response.marker),
    }
  }

  fn pass_thru(context: &ListInstancesContext) -> Option<Value> {
    Some(Value::String(context.cluster_id.clone()))
  }

  fn request_token(request: &ListInstancesRequest) -> Option<&str> {
    request.marker.as_deref()
  }

  fn set_request_token(request: &mut ListInstancesRequest, token: Option<String>) {
    request.marker = token;
  }

  fn response_token(response: &ListInstancesResponse) -> Option<&str> {
    response.marker.as_deref()
  }
}

// ModifyInstanceGroups

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModifyInstanceGroupsParams {
  /// Identifier of the instance group to modify
  #[arg(value_name = "INSTANCE_GROUP_ID")]
  pub instance_group_id: Option<String>,

  /// Identifier of the cluster that owns the instance group
  #[arg(long)]
  pub cluster_id: Option<String>,

  /// Target number of instances in the group
  #[arg(long)]
  pub instance_count: Option<i32>,

  /// EC2 instances to terminate when shrinking the group
  #[arg(long, value_delimiter = ',')]
  pub ec2_instance_ids_to_terminate: Option<Vec<String>>,

  /// Seconds to wait for tasks to drain before a node is decommissioned
  #[arg(long)]
  pub shrink_policy_decommission_timeout: Option<i32>,

  /// Seconds to wait for instances to terminate during a resize
  #[arg(long)]
  pub shrink_policy_instance_termination_timeout: Option<i32>,

  /// EC2 instances that must not be terminated during a resize
  #[arg(long, value_delimiter = ',')]
  pub shrink_policy_instances_to_protect: Option<Vec<String>>,

  /// EC2 instances to terminate during a resize
  #[arg(long, value_delimiter = ',')]
  pub shrink_policy_instances_to_terminate: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ModifyInstanceGroupsContext {
  instance_group_id: String,
  cluster_id: Option<String>,
  instance_count: Option<i32>,
  ec2_instance_ids_to_terminate: Option<Vec<String>>,
  decommission_timeout: Option<i32>,
  instance_termination_timeout: Option<i32>,
  instances_to_protect: Option<Vec<String>>,
  instances_to_terminate: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceResizePolicy {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_termination_timeout: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instances_to_protect: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instances_to_terminate: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShrinkPolicy {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub decommission_timeout: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_resize_policy: Option<InstanceResizePolicy>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceGroupModifyConfig {
  pub instance_group_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instance_count: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ec2_instance_ids_to_terminate: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub shrink_policy: Option<ShrinkPolicy>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyInstanceGroupsRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cluster_id: Option<String>,
  pub instance_groups: Vec<InstanceGroupModifyConfig>,
}

impl InstanceGroupModifyConfig {
  fn to_sdk(&self) -> types::InstanceGroupModifyConfig {
    let shrink_policy = self.shrink_policy.as_ref().map(|shrink| {
      let resize = shrink.instance_resize_policy.as_ref().map(|resize| {
        types::InstanceResizePolicy::builder()
          .set_instance_termination_timeout(resize.instance_termination_timeout)
          .set_instances_to_protect(resize.instances_to_protect.clone())
          .set_instances_to_terminate(resize.instances_to_terminate.clone())
          .build()
      });

      types::ShrinkPolicy::builder()
        .set_decommission_timeout(shrink.decommission_timeout)
        .set_instance_resize_policy(resize)
        .build()
    });

    types::InstanceGroupModifyConfig::builder()
      .instance_group_id(self.instance_group_id.clone())
      .set_instance_count(self.instance_count)
      .set_ec2_instance_ids_to_terminate(self.ec2_instance_ids_to_terminate.clone())
      .set_shrink_policy(shrink_policy)
      .build()
  }
}

/// `edit-emr-instance-group`
pub struct ModifyInstanceGroups;

impl Operation for ModifyInstanceGroups {
  const NAME: &'static str = "ModifyInstanceGroups";
  const SERVICE: Service = Service::Emr;
  const MUTATING: bool = true;
  const PASS_THRU: Option<&'static str> = Some("ClusterId");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("instance_group_id");

  type Client = Client;
  type Params = ModifyInstanceGroupsParams;
  type Context = ModifyInstanceGroupsContext;
  type Request = ModifyInstanceGroupsRequest;
  type Response = Empty;
  type Field = NoField;

  fn bind(params: &ModifyInstanceGroupsParams) -> Result<ModifyInstanceGroupsContext, ValidationError> {
    Ok(ModifyInstanceGroupsContext {
      instance_group_id: required("instance-group-id", &params.instance_group_id)?,
      cluster_id: params.cluster_id.clone(),
      instance_count: params.instance_count,
      ec2_instance_ids_to_terminate: params.ec2_instance_ids_to_terminate.clone(),
      decommission_timeout: params.shrink_policy_decommission_timeout,
      instance_termination_timeout: params.shrink_policy_instance_termination_timeout,
      instances_to_protect: params.shrink_policy_instances_to_protect.clone(),
      instances_to_terminate: params.shrink_policy_instances_to_terminate.clone(),
    })
  }

  fn assemble(context: &ModifyInstanceGroupsContext) -> ModifyInstanceGroupsRequest {
    let mut resize = Group::default();
    let resize_policy = InstanceResizePolicy {
      instance_termination_timeout: resize.member(&context.instance_termination_timeout),
      instances_to_protect: resize.member(&context.instances_to_protect),
      instances_to_terminate: resize.member(&context.instances_to_terminate),
    };
    let resize_policy = resize.finish(resize_policy);

    let mut shrink = Group::default();
    let shrink_policy = ShrinkPolicy {
      decommission_timeout: shrink.member(&context.decommission_timeout),
      instance_resize_policy: shrink.member(&resize_policy),
    };

    ModifyInstanceGroupsRequest {
      cluster_id: context.cluster_id.clone(),
      instance_groups: vec![InstanceGroupModifyConfig {
        instance_group_id: context.instance_group_id.clone(),
        instance_count: context.instance_count,
        ec2_instance_ids_to_terminate: context.ec2_instance_ids_to_terminate.clone(),
        shrink_policy: shrink.finish(shrink_policy),
      }],
    }
  }

  async fn invoke(client: &Client, request: &ModifyInstanceGroupsRequest) -> Result<Empty, InvokeFailure> {
    let groups = request
      .instance_groups
      .iter()
      .map(InstanceGroupModifyConfig::to_sdk)
      .collect();

    client
      .modify_instance_groups()
      .set_cluster_id(request.cluster_id.clone())
      .set_instance_groups(Some(groups))
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

  fn pass_thru(context: &ModifyInstanceGroupsContext) -> Option<Value> {
    context.cluster_id.clone().map(Value::String)
  }

  fn confirm_target(context: &ModifyInstanceGroupsContext) -> String {
    context.instance_group_id.clone()
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;
  use serde_json::json;

  use super::*;

  fn list_params() -> ListInstancesParams {
    ListInstancesParams {
      cluster_id: Some("j-1".to_string()),
      ..Default::default()
    }
  }

  #[test]
  fn it_rejects_group_and_fleet_together() {
    let params = ListInstancesParams {
      instance_group_id: Some("ig-1".to_string()),
      instance_fleet_id: Some("if-1".to_string()),
      ..list_params()
    };

    assert_eq!(
      ListInstances::bind(&params).unwrap_err(),
      ValidationError::MutuallyExclusive("instance-group-id", "instance-fleet-id")
    );
  }

  #[test]
  fn it_canonicalizes_instance_filters() {
    let params = ListInstancesParams {
      instance_group_types: Some(vec!["core".to_string(), "task".to_string()]),
      instance_states: Some(vec!["running".to_string()]),
      ..list_params()
    };
    let request = ListInstances::assemble(&ListInstances::bind(&params).unwrap());

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      json!({
        "ClusterId": "j-1",
        "InstanceGroupTypes": ["CORE", "TASK"],
        "InstanceStates": ["RUNNING"],
      })
    );
  }

  #[test]
  fn it_rejects_unknown_fleet_types() {
    let params = ListInstancesParams {
      instance_fleet_type: Some("spare".to_string()),
      ..list_params()
    };

    assert!(matches!(
      ListInstances::bind(&params),
      Err(ValidationError::InvalidValue {
        param: "instance-fleet-type",
        ..
      })
    ));
  }

  fn modify_params() -> ModifyInstanceGroupsParams {
    ModifyInstanceGroupsParams {
      instance_group_id: Some("ig-1".to_string()),
      ..Default::default()
    }
  }

  #[rstest]
  #[case::nothing_bound(modify_params(), json!({"InstanceGroupId": "ig-1"}))]
  #[case::explicit_zero(
    ModifyInstanceGroupsParams { instance_count: Some(0), ..modify_params() },
    json!({"InstanceGroupId": "ig-1", "InstanceCount": 0})
  )]
  #[case::outer_member_only(
    ModifyInstanceGroupsParams { shrink_policy_decommission_timeout: Some(0), ..modify_params() },
    json!({"InstanceGroupId": "ig-1", "ShrinkPolicy": {"DecommissionTimeout": 0}})
  )]
  #[case::inner_member_only(
    ModifyInstanceGroupsParams { shrink_policy_instances_to_protect: Some(vec!["i-1".to_string()]), ..modify_params() },
    json!({"InstanceGroupId": "ig-1", "ShrinkPolicy": {"InstanceResizePolicy": {"InstancesToProtect": ["i-1"]}}})
  )]
  fn it_cascades_shrink_policy(#[case] params: ModifyInstanceGroupsParams, #[case] expected: Value) {
    let context = ModifyInstanceGroups::bind(&params).unwrap();
    let request = ModifyInstanceGroups::assemble(&context);

    assert_eq!(serde_json::to_value(&request.instance_groups[0]).unwrap(), expected);
    assert_eq!(request, ModifyInstanceGroups::assemble(&context));
  }

  #[rstest]
  #[case::without_cluster(modify_params())]
  #[case::with_cluster(ModifyInstanceGroupsParams { cluster_id: Some("j-1".to_string()), ..modify_params() })]
  fn it_confirms_against_the_instance_group(#[case] params: ModifyInstanceGroupsParams) {
    let context = ModifyInstanceGroups::bind(&params).unwrap();

    assert_eq!(ModifyInstanceGroups::confirm_target(&context), "ig-1");
  }

  #[test]
  fn it_requires_an_instance_group() {
    assert_eq!(
      ModifyInstanceGroups::bind(&ModifyInstanceGroupsParams::default()).unwrap_err(),
      ValidationError::MissingRequired("instance-group-id")
    );
  }

  #[test]
  fn it_converts_to_sdk_shapes() {
    let params = ModifyInstanceGroupsParams {
      instance_count: Some(3),
      shrink_policy_instance_termination_timeout: Some(60),
      ..modify_params()
    };
    let request = ModifyInstanceGroups::assemble(&ModifyInstanceGroups::bind(&params).unwrap());

    let config = request.instance_groups[0].to_sdk();
    assert_eq!(config.instance_group_id(), Some("ig-1"));
    assert_eq!(config.instance_count(), Some(3));
    let shrink = config.shrink_policy().unwrap();
    assert_eq!(shrink.decommission_timeout(), None);
    assert_eq!(
      shrink.instance_resize_policy().unwrap().instance_termination_timeout(),
      Some(60)
    );
  }
}
