use aws_sdk_translate::{types, Client};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  client::Service,
  dto::{required, timestamp, Empty, NoField},
  error::{InvokeFailure, ValidationError},
  operation::{Operation, Selection},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TerminologyProperties {
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub arn: Option<String>,
  pub source_language_code: Option<String>,
  pub target_language_codes: Vec<String>,
  pub format: Option<String>,
  pub size_bytes: Option<i32>,
  pub term_count: Option<i32>,
  pub created_at: Option<String>,
  pub last_updated_at: Option<String>,
}

impl From<&types::TerminologyProperties> for TerminologyProperties {
  fn from(props: &types::TerminologyProperties) -> Self {
    Self {
      name: props.name().map(str::to_owned),
      description: props.description().map(str::to_owned),
      arn: props.arn().map(str::to_owned),
      source_language_code: props.source_language_code().map(str::to_owned),
      target_language_codes: props.target_language_codes().to_vec(),
      format: props.format().map(|f| f.as_str().to_owned()),
      size_bytes: props.size_bytes(),
      term_count: props.term_count(),
      created_at: timestamp(props.created_at()),
      last_updated_at: timestamp(props.last_updated_at()),
    }
  }
}

// ListTerminologies

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListTerminologiesParams {
  /// Maximum number of terminologies per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// Token returned by a previous call; only that page is fetched
  #[arg(long)]
  pub next_token: Option<String>,
}

#[derive(Debug)]
pub struct ListTerminologiesContext {
  max_results: Option<i32>,
  next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTerminologiesRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_results: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTerminologiesResponse {
  pub terminology_properties_list: Vec<TerminologyProperties>,
  pub next_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ListTerminologiesField {
  TerminologyPropertiesList,
  NextToken,
}

/// `get-trn-terminology-list`
pub struct ListTerminologies;

impl Operation for ListTerminologies {
  const NAME: &'static str = "ListTerminologies";
  const SERVICE: Service = Service::Translate;
  const TOKEN: Option<&'static str> = Some("NextToken");

  type Client = Client;
  type Params = ListTerminologiesParams;
  type Context = ListTerminologiesContext;
  type Request = ListTerminologiesRequest;
  type Response = ListTerminologiesResponse;
  type Field = ListTerminologiesField;

  fn bind(params: &ListTerminologiesParams) -> Result<ListTerminologiesContext, ValidationError> {
    Ok(ListTerminologiesContext {
      max_results: params.max_results,
      next_token: params.next_token.clone(),
    })
  }

  fn assemble(context: &ListTerminologiesContext) -> ListTerminologiesRequest {
    ListTerminologiesRequest {
      max_results: context.max_results,
      next_token: context.next_token.clone(),
    }
  }

  async fn invoke(
    client: &Client,
    request: &ListTerminologiesRequest,
  ) -> Result<ListTerminologiesResponse, InvokeFailure> {
    let output = client
      .list_terminologies()
      .set_max_results(request.max_results)
      .set_next_token(request.next_token.clone())
      .send()
      .await?;

    Ok(ListTerminologiesResponse {
      terminology_properties_list: output
        .terminology_properties_list()
        .iter()
        .map(TerminologyProperties::from)
        .collect(),
      next_token: output.next_token().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<ListTerminologiesField> {
    Selection::Field(ListTerminologiesField::TerminologyPropertiesList)
  }

  fn project(response: &ListTerminologiesResponse, field: ListTerminologiesField) -> serde_json::Result<Value> {
    match field {
      ListTerminologiesField::TerminologyPropertiesList => serde_json::to_value(&response.terminology_properties_list),
      ListTerminologiesField::NextToken => serde_json::to_value(&response.next_token),
    }
  }

  fn request_token(request: &ListTerminologiesRequest) -> Option<&str> {
    request.next_token.as_deref()
  }

  fn set_request_token(request: &mut ListTerminologiesRequest, token: Option<String>) {
    request.next_token = token;
  }

  fn response_token(response: &ListTerminologiesResponse) -> Option<&str> {
    response.next_token.as_deref()
  }
}

// DeleteTerminology

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeleteTerminologyParams {
  /// Name of the custom terminology to delete
  #[arg(value_name = "NAME")]
  pub name: Option<String>,
}

#[derive(Debug)]
pub struct DeleteTerminologyContext {
  name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTerminologyRequest {
  pub name: String,
}

/// `remove-trn-terminology`
pub struct DeleteTerminology;

impl Operation for DeleteTerminology {
  const NAME: &'static str = "DeleteTerminology";
  const SERVICE: Service = Service::Translate;
  const MUTATING: bool = true;
  const PASS_THRU: Option<&'static str> = Some("Name");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("name");

  type Client = Client;
  type Params = DeleteTerminologyParams;
  type Context = DeleteTerminologyContext;
  type Request = DeleteTerminologyRequest;
  type Response = Empty;
  type Field = NoField;

  fn bind(params: &DeleteTerminologyParams) -> Result<DeleteTerminologyContext, ValidationError> {
    Ok(DeleteTerminologyContext {
      name: required("name", &params.name)?,
    })
  }

  fn assemble(context: &DeleteTerminologyContext) -> DeleteTerminologyRequest {
    DeleteTerminologyRequest {
      name: context.name.clone(),
    }
  }

  async fn invoke(client: &Client, request: &DeleteTerminologyRequest) -> Result<Empty, InvokeFailure> {
    client.delete_terminology().name(request.name.clone()).send().await?;

    Ok(Empty {})
  }

  fn default_selection() -> Selection<NoField> {
    Selection::Nothing
  }

  fn project(_response: &Empty, field: NoField) -> serde_json::Result<Value> {
    match field {}
  }

  fn pass_thru(context: &DeleteTerminologyContext) -> Option<Value> {
    Some(Value::String(context.name.clone()))
  }
}
