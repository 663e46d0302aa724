//! Amazon EMR (Elastic MapReduce) commands

mod clusters;
mod instances;

pub use clusters::{
  AddTags, AddTagsParams, DescribeCluster, DescribeClusterParams, ListClusters, ListClustersParams, ModifyCluster,
  ModifyClusterParams, SetTerminationProtection, SetTerminationProtectionParams,
};
pub use instances::{ListInstances, ListInstancesParams, ModifyInstanceGroups, ModifyInstanceGroupsParams};
