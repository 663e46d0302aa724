use aws_sdk_resourceexplorer2::{
  types::{self, IndexType},
  Client,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  client::Service,
  dto::{enum_value, required, timestamp},
  error::{InvokeFailure, ValidationError},
  operation::{Operation, Selection},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
  pub arn: Option<String>,
  pub owning_account_id: Option<String>,
  pub region: Option<String>,
  pub resource_type: Option<String>,
  pub service: Option<String>,
  pub last_reported_at: Option<String>,
}

impl From<&types::Resource> for Resource {
  fn from(resource: &types::Resource) -> Self {
    Self {
      arn: resource.arn().map(str::to_owned),
      owning_account_id: resource.owning_account_id().map(str::to_owned),
      region: resource.region().map(str::to_owned),
      resource_type: resource.resource_type().map(str::to_owned),
      service: resource.service().map(str::to_owned),
      last_reported_at: timestamp(resource.last_reported_at()),
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceCount {
  pub total_resources: Option<i64>,
  pub complete: Option<bool>,
}

// Search

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchParams {
  /// Search query, e.g. `service:ec2 tag:env=prod`
  #[arg(value_name = "QUERY_STRING")]
  pub query_string: Option<String>,

  /// View to search; the default view of the region when omitted
  #[arg(long)]
  pub view_arn: Option<String>,

  /// Maximum number of resources per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// Token returned by a previous call; only that page is fetched
  #[arg(long)]
  pub next_token: Option<String>,
}

#[derive(Debug)]
pub struct SearchContext {
  query_string: String,
  view_arn: Option<String>,
  max_results: Option<i32>,
  next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRequest {
  pub query_string: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub view_arn: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_results: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResponse {
  pub resources: Vec<Resource>,
  pub view_arn: Option<String>,
  pub count: Option<ResourceCount>,
  pub next_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum SearchField {
  Resources,
  ViewArn,
  Count,
  NextToken,
}

/// `search-arex-resource`
pub struct Search;

impl Operation for Search {
  const NAME: &'static str = "Search";
  const SERVICE: Service = Service::ResourceExplorer;
  const TOKEN: Option<&'static str> = Some("NextToken");
  const PASS_THRU: Option<&'static str> = Some("QueryString");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("query_string");

  type Client = Client;
  type Params = SearchParams;
  type Context = SearchContext;
  type Request = SearchRequest;
  type Response = SearchResponse;
  type Field = SearchField;

  fn bind(params: &SearchParams) -> Result<SearchContext, ValidationError> {
    Ok(SearchContext {
      query_string: required("query-string", &params.query_string)?,
      view_arn: params.view_arn.clone(),
      max_results: params.max_results,
      next_token: params.next_token.clone(),
    })
  }

  fn assemble(context: &SearchContext) -> SearchRequest {
    SearchRequest {
      query_string: context.query_string.clone(),
      view_arn: context.view_arn.clone(),
      max_results: context.max_results,
      next_token: context.next_token.clone(),
    }
  }

  async fn invoke(client: &Client, request: &SearchRequest) -> Result<SearchResponse, InvokeFailure> {
    let output = client
      .search()
      .query_string(request.query_string.clone())
      .set_view_arn(request.view_arn.clone())
      .set_max_results(request.max_results)
      .set_next_token(request.next_token.clone())
      .send()
      .await?;

    Ok(SearchResponse {
      resources: output.resources().iter().map(Resource::from).collect(),
      view_arn: output.view_arn().map(str::to_owned),
      count: output.count().map(|c| ResourceCount {
        total_resources: c.total_resources(),
        complete: c.complete(),
      }),
      next_token: output.next_token().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<SearchField> {
    Selection::Field(SearchField::Resources)
  }

  fn project(response: &SearchResponse, field: SearchField) -> serde_json::Result<Value> {
    match field {
      SearchField::Resources => serde_json::to_value(&response.resources),
      SearchField::ViewArn => serde_json::to_value(&response.view_arn),
      SearchField::Count => serde_json::to_value(&response.count),
      SearchField::NextToken => serde_json::to_value(&response.next_token),
    }
  }

  fn pass_thru(context: &SearchContext) -> Option<Value> {
    Some(Value::String(context.query_string.clone()))
  }

  fn request_token(request: &SearchRequest) -> Option<&str> {
    request.next_token.as_deref()
  }

  fn set_request_token(request: &mut SearchRequest, token: Option<String>) {
    request.next_token = token;
  }

  fn response_token(response: &SearchResponse) -> Option<&str> {
    response.next_token.as_deref()
  }
}

// ListIndexes

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Index {
  pub region: Option<String>,
  pub arn: Option<String>,
  pub r#type: Option<String>,
}

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListIndexesParams {
  /// Only indexes of this type (LOCAL, AGGREGATOR)
  #[arg(long = "type", alias = "index-type")]
  pub r#type: Option<String>,

  /// Only indexes in these regions
  #[arg(long, alias = "region-filter", value_delimiter = ',')]
  pub regions: Option<Vec<String>>,

  /// Maximum number of indexes per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// Token returned by a previous call; only that page is fetched
  #[arg(long)]
  pub next_token: Option<String>,
}

#[derive(Debug)]
pub struct ListIndexesContext {
  r#type: Option<String>,
  regions: Option<Vec<String>>,
  max_results: Option<i32>,
  next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIndexesRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub r#type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub regions: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_results: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIndexesResponse {
  pub indexes: Vec<Index>,
  pub next_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ListIndexesField {
  Indexes,
  NextToken,
}

/// `get-arex-index-list`
pub struct ListIndexes;

impl Operation for ListIndexes {
  const NAME: &'static str = "ListIndexes";
  const SERVICE: Service = Service::ResourceExplorer;
  const TOKEN: Option<&'static str> = Some("NextToken");

  type Client = Client;
  type Params = ListIndexesParams;
  type Context = ListIndexesContext;
  type Request = ListIndexesRequest;
  type Response = ListIndexesResponse;
  type Field = ListIndexesField;

  fn bind(params: &ListIndexesParams) -> Result<ListIndexesContext, ValidationError> {
    Ok(ListIndexesContext {
      r#type: params
        .r#type
        .as_deref()
        .map(|t| enum_value("type", t, IndexType::values()))
        .transpose()?,
      regions: params.regions.clone(),
      max_results: params.max_results,
      next_token: params.next_token.clone(),
    })
  }

  fn assemble(context: &ListIndexesContext) -> ListIndexesRequest {
    ListIndexesRequest {
      r#type: context.r#type.clone(),
      regions: context.regions.clone(),
      max_results: context.max_results,
      next_token: context.next_token.clone(),
    }
  }

  async fn invoke(client: &Client, request: &ListIndexesRequest) -> Result<ListIndexesResponse, InvokeFailure> {
    let output = client
      .list_indexes()
      .set_type(request.r#type.as_deref().map(IndexType::from))
      .set_regions(request.regions.clone())
      .set_max_results(request.max_results)
      .set_next_token(request.next_token.clone())
      .send()
      .await?;

    Ok(ListIndexesResponse {
      indexes: output
        .indexes()
        .iter()
        .map(|i| Index {
          region: i.region().map(str::to_owned),
          arn: i.arn().map(str::to_owned),
          r#type: i.r#type().map(|t| t.as_str().to_owned()),
        })
        .collect(),
      next_token: output.next_token().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<ListIndexesField> {
    Selection::Field(ListIndexesField::Indexes)
  }

  fn project(response: &ListIndexesResponse, field: ListIndexesField) -> serde_json::Result<Value> {
    match field {
      ListIndexesField::Indexes => serde_json::to_value(&response.indexes),
      ListIndexesField::NextToken => serde_json::to_value(&response.next_token),
    }
  }

  fn request_token(request: &ListIndexesRequest) -> Option<&str> {
    request.next_token.as_deref()
  }

  fn set_request_token(request: &mut ListIndexesRequest, token: Option<String>) {
    request.next_token = token;
  }

  fn response_token(response: &ListIndexesResponse) -> Option<&str> {
    response.next_token.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn it_requires_a_query_string() {
    assert_eq!(
      Search::bind(&SearchParams::default()).unwrap_err(),
      ValidationError::MissingRequired("query-string")
    );
  }

  #[test]
  fn it_omits_unbound_search_members() {
    let params = SearchParams {
      query_string: Some("service:ec2".to_string()),
      ..Default::default()
    };
    let context = Search::bind(&params).unwrap();

    assert_eq!(
      serde_json::to_value(Search::assemble(&context)).unwrap(),
      json!({"QueryString": "service:ec2"})
    );
    assert_eq!(Search::pass_thru(&context), Some(json!("service:ec2")));
  }

  #[test]
  fn it_projects_search_fields() {
    let response = SearchResponse {
      resources: vec![Resource {
        arn: Some("arn:aws:ec2:us-east-1:111122223333:instance/i-1".to_string()),
        ..Default::default()
      }],
      count: Some(ResourceCount {
        total_resources: Some(1),
        complete: Some(true),
      }),
      ..Default::default()
    };

    let resources = Search::project(&response, SearchField::Resources).unwrap();
    assert_eq!(resources[0]["Arn"], "arn:aws:ec2:us-east-1:111122223333:instance/i-1");
    assert_eq!(
      Search::project(&response, SearchField::Count).unwrap(),
      json!({"TotalResources": 1, "Complete": true})
    );
  }

  #[test]
  fn it_canonicalizes_index_types() {
    let params = ListIndexesParams {
      r#type: Some("aggregator".to_string()),
      regions: Some(vec!["us-east-1".to_string()]),
      ..Default::default()
    };
    let request = ListIndexes::assemble(&ListIndexes::bind(&params).unwrap());

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      json!({"Type": "AGGREGATOR", "Regions": ["us-east-1"]})
    );
  }

  #[test]
  fn it_rejects_unknown_index_types() {
    let params = ListIndexesParams {
      r#type: Some("global".to_string()),
      ..Default::default()
    };

    assert!(matches!(
      ListIndexes::bind(&params),
      Err(ValidationError::InvalidValue { param: "type", .. })
    ));
  }
}
