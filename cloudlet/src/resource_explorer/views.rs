use std::collections::{BTreeMap, HashMap};

use aws_sdk_resourceexplorer2::{types, Client};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  client::Service,
  dto::{required, timestamp, Group, KeyValue},
  error::{InvokeFailure, ValidationError},
  operation::{Operation, Selection},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct View {
  pub view_arn: Option<String>,
  pub owner: Option<String>,
  pub scope: Option<String>,
  pub last_updated_at: Option<String>,
  pub included_properties: Vec<String>,
  pub filters: Option<SearchFilter>,
}

impl From<&types::View> for View {
  fn from(view: &types::View) -> Self {
    Self {
      view_arn: view.view_arn().map(str::to_owned),
      owner: view.owner().map(str::to_owned),
      scope: view.scope().map(str::to_owned),
      last_updated_at: timestamp(view.last_updated_at()),
      included_properties: view.included_properties().iter().map(|p| p.name().to_owned()).collect(),
      filters: view.filters().map(|f| SearchFilter {
        filter_string: Some(f.filter_string().to_owned()),
      }),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchFilter {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filter_string: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IncludedProperty {
  pub name: String,
}

// ListViews

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListViewsParams {
  /// Maximum number of views per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// Token returned by a previous call; only that page is fetched
  #[arg(long)]
  pub next_token: Option<String>,
}

#[derive(Debug)]
pub struct ListViewsContext {
  max_results: Option<i32>,
  next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListViewsRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_results: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListViewsResponse {
  pub views: Vec<String>,
  pub next_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ListViewsField {
  Views,
  NextToken,
}

/// `get-arex-view-list`
pub struct ListViews;

impl Operation for ListViews {
  const NAME: &'static str = "ListViews";
  const SERVICE: Service = Service::ResourceExplorer;
  const TOKEN: Option<&'static str> = Some("NextToken");

  type Client = Client;
  type Params = ListViewsParams;
  type Context = ListViewsContext;
  type Request = ListViewsRequest;
  type Response = ListViewsResponse;
  type Field = ListViewsField;

  fn bind(params: &ListViewsParams) -> Result<ListViewsContext, ValidationError> {
    Ok(ListViewsContext {
      max_results: params.max_results,
      next_token: params.next_token.clone(),
    })
  }

  fn assemble(context: &ListViewsContext) -> ListViewsRequest {
    ListViewsRequest {
      max_results: context.max_results,
      next_token: context.next_token.clone(),
    }
  }

  async fn invoke(client: &Client, request: &ListViewsRequest) -> Result<ListViewsResponse, InvokeFailure> {
    let output = client
      .list_views()
      .set_max_results(request.max_results)
      .set_next_token(request.next_token.clone())
      .send()
      .await?;

    Ok(ListViewsResponse {
      views: output.views().to_vec(),
      next_token: output.next_token().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<ListViewsField> {
    Selection::Field(ListViewsField::Views)
  }

  fn project(response: &ListViewsResponse, field: ListViewsField) -> serde_json::Result<Value> {
    match field {
      ListViewsField::Views => serde_json::to_value(&response.views),
      ListViewsField::NextToken => serde_json::to_value(&response.next_token),
    }
  }

  fn request_token(request: &ListViewsRequest) -> Option<&str> {
    request.next_token.as_deref()
  }

  fn set_request_token(request: &mut ListViewsRequest, token: Option<String>) {
    request.next_token = token;
  }

  fn response_token(response: &ListViewsResponse) -> Option<&str> {
    response.next_token.as_deref()
  }
}

// CreateView

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateViewParams {
  /// Name of the view, unique within the region
  #[arg(value_name = "VIEW_NAME")]
  pub view_name: Option<String>,

  /// Query that every search through the view is combined with
  #[arg(long, alias = "filter-string")]
  pub filters_filter_string: Option<String>,

  /// Optional resource properties to include in results (e.g. tags)
  #[arg(long, alias = "included-properties", value_delimiter = ',')]
  pub included_property: Option<Vec<String>>,

  /// ARN of the root, organizational unit or account the view covers
  #[arg(long)]
  pub scope: Option<String>,

  /// Tag as Key=Value (repeatable)
  #[arg(long = "tag", alias = "tags")]
  pub tags: Option<Vec<KeyValue>>,

  /// Idempotency token for the request
  #[arg(long)]
  pub client_token: Option<String>,
}

#[derive(Debug)]
pub struct CreateViewContext {
  view_name: String,
  filter_string: Option<String>,
  included_properties: Option<Vec<String>>,
  scope: Option<String>,
  tags: Option<Vec<KeyValue>>,
  client_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateViewRequest {
  pub view_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filters: Option<SearchFilter>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub included_properties: Option<Vec<IncludedProperty>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scope: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags: Option<BTreeMap<String, String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub client_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateViewResponse {
  pub view: Option<View>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum CreateViewField {
  View,
}

/// `new-arex-view`
pub struct CreateView;

impl Operation for CreateView {
  const NAME: &'static str = "CreateView";
  const SERVICE: Service = Service::ResourceExplorer;
  const MUTATING: bool = true;
  const PASS_THRU: Option<&'static str> = Some("ViewName");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("view_name");

  type Client = Client;
  type Params = CreateViewParams;
  type Context = CreateViewContext;
  type Request = CreateViewRequest;
  type Response = CreateViewResponse;
  type Field = CreateViewField;

  fn bind(params: &CreateViewParams) -> Result<CreateViewContext, ValidationError> {
    Ok(CreateViewContext {
      view_name: required("view-name", &params.view_name)?,
      filter_string: params.filters_filter_string.clone(),
      included_properties: params.included_property.clone(),
      scope: params.scope.clone(),
      tags: params.tags.clone(),
      client_token: params.client_token.clone(),
    })
  }

  fn assemble(context: &CreateViewContext) -> CreateViewRequest {
    let mut filters = Group::default();
    let group = SearchFilter {
      filter_string: filters.member(&context.filter_string),
    };

    CreateViewRequest {
      view_name: context.view_name.clone(),
      filters: filters.finish(group),
      included_properties: context
        .included_properties
        .as_ref()
        .map(|names| names.iter().map(|name| IncludedProperty { name: name.clone() }).collect()),
      scope: context.scope.clone(),
      tags: context.tags.as_ref().map(|tags| {
        tags
          .iter()
          .map(|kv| (kv.key.clone(), kv.value.clone().unwrap_or_default()))
          .collect()
      }),
      client_token: context.client_token.clone(),
    }
  }

  async fn invoke(client: &Client, request: &CreateViewRequest) -> Result<CreateViewResponse, InvokeFailure> {
    let filters = request
      .filters
      .as_ref()
      .map(|f| {
        types::SearchFilter::builder()
          .set_filter_string(f.filter_string.clone())
          .build()
      })
      .transpose()?;
    let included_properties = request
      .included_properties
      .as_ref()
      .map(|props| {
        props
          .iter()
          .map(|p| types::IncludedProperty::builder().name(p.name.clone()).build())
          .collect::<Result<Vec<_>, _>>()
      })
      .transpose()?;
    let tags = request
      .tags
      .as_ref()
      .map(|tags| tags.clone().into_iter().collect::<HashMap<_, _>>());

    let output = client
      .create_view()
      .view_name(request.view_name.clone())
      .set_filters(filters)
      .set_included_properties(included_properties)
      .set_scope(request.scope.clone())
      .set_tags(tags)
      .set_client_token(request.client_token.clone())
      .send()
      .await?;

    Ok(CreateViewResponse {
      view: output.view().map(View::from),
    })
  }

  fn default_selection() -> Selection<CreateViewField> {
    Selection::Field(CreateViewField::View)
  }

  fn project(response: &CreateViewResponse, field: CreateViewField) -> serde_json::Result<Value> {
    match field {
      CreateViewField::View => serde_json::to_value(&response.view),
    }
  }

  fn pass_thru(context: &CreateViewContext) -> Option<Value> {
    Some(Value::String(context.view_name.clone()))
  }
}

// DeleteView

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeleteViewParams {
  /// ARN of the view to delete
  #[arg(value_name = "VIEW_ARN")]
  pub view_arn: Option<String>,
}

#[derive(Debug)]
pub struct DeleteViewContext {
  view_arn: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteViewRequest {
  pub view_arn: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteViewResponse {
  pub view_arn: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum DeleteViewField {
  ViewArn,
}

/// `remove-arex-view`
pub struct DeleteView;

impl Operation for DeleteView {
  const NAME: &'static str = "DeleteView";
  const SERVICE: Service = Service::ResourceExplorer;
  const MUTATING: bool = true;
  const PASS_THRU: Option<&'static str> = Some("ViewArn");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("view_arn");

  type Client = Client;
  type Params = DeleteViewParams;
  type Context = DeleteViewContext;
  type Request = DeleteViewRequest;
  type Response = DeleteViewResponse;
  type Field = DeleteViewField;

  fn bind(params: &DeleteViewParams) -> Result<DeleteViewContext, ValidationError> {
    Ok(DeleteViewContext {
      view_arn: required("view-arn", &params.view_arn)?,
    })
  }

  fn assemble(context: &DeleteViewContext) -> DeleteViewRequest {
    DeleteViewRequest {
      view_arn: context.view_arn.clone(),
    }
  }

  async fn invoke(client: &Client, request: &DeleteViewRequest) -> Result<DeleteViewResponse, InvokeFailure> {
    let output = client.delete_view().view_arn(request.view_arn.clone()).send().await?;

    Ok(DeleteViewResponse {
      view_arn: output.view_arn().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<DeleteViewField> {
    Selection::Field(DeleteViewField::ViewArn)
  }

  fn project(response: &DeleteViewResponse, field: DeleteViewField) -> serde_json::Result<Value> {
    match field {
      DeleteViewField::ViewArn => serde_json::to_value(&response.view_arn),
    }
  }

  fn pass_thru(context: &DeleteViewContext) -> Option<Value> {
    Some(Value::String(context.view_arn.clone()))
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;
  use serde_json::json;

  use super::*;

  fn params() -> CreateViewParams {
    CreateViewParams {
      view_name: Some("all-ec2".to_string()),
      ..Default::default()
    }
  }

  #[rstest]
  #[case::nothing_bound(params(), json!({"ViewName": "all-ec2"}))]
  #[case::empty_filter_string(
    CreateViewParams { filters_filter_string: Some(String::new()), ..params() },
    json!({"ViewName": "all-ec2", "Filters": {"FilterString": ""}})
  )]
  #[case::included_properties(
    CreateViewParams { included_property: Some(vec!["tags".to_string()]), ..params() },
    json!({"ViewName": "all-ec2", "IncludedProperties": [{"Name": "tags"}]})
  )]
  fn it_assembles_views(#[case] params: CreateViewParams, #[case] expected: Value) {
    let context = CreateView::bind(&params).unwrap();
    let request = CreateView::assemble(&context);

    assert_eq!(serde_json::to_value(&request).unwrap(), expected);
    assert_eq!(request, CreateView::assemble(&context));
  }

  #[test]
  fn it_maps_tags() {
    let params = CreateViewParams {
      tags: Some(vec!["team=search".parse().unwrap(), "adhoc".parse().unwrap()]),
      ..params()
    };
    let request = CreateView::assemble(&CreateView::bind(&params).unwrap());

    assert_eq!(
      serde_json::to_value(&request.tags).unwrap(),
      json!({"adhoc": "", "team": "search"})
    );
  }

  #[test]
  fn it_requires_a_view_name() {
    assert_eq!(
      CreateView::bind(&CreateViewParams::default()).unwrap_err(),
      ValidationError::MissingRequired("view-name")
    );
  }

  #[test]
  fn it_projects_the_deleted_view() {
    let context = DeleteView::bind(&DeleteViewParams {
      view_arn: Some("arn:aws:resource-explorer-2:us-east-1:111122223333:view/all-ec2/1".to_string()),
    })
    .unwrap();
    let response = DeleteViewResponse {
      view_arn: Some("arn:aws:resource-explorer-2:us-east-1:111122223333:view/all-ec2/1".to_string()),
    };

    assert_eq!(
      DeleteView::project(&response, DeleteViewField::ViewArn).unwrap(),
      json!("arn:aws:resource-explorer-2:us-east-1:111122223333:view/all-ec2/1")
    );
    assert_eq!(DeleteView::pass_thru(&context), Some(json!(response.view_arn.unwrap())));
  }

  #[test]
  fn it_pages_views() {
    let mut request = ListViews::assemble(&ListViews::bind(&ListViewsParams::default()).unwrap());
    assert_eq!(ListViews::request_token(&request), None);

    ListViews::set_request_token(&mut request, Some("t1".to_string()));
    assert_eq!(serde_json::to_value(&request).unwrap(), json!({"NextToken": "t1"}));
  }
}
