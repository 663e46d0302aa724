use aws_sdk_translate::{
  types::{self, JobStatus},
  Client,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  client::Service,
  dto::{enum_value, timestamp, Group, Timestamp},
  error::{InvokeFailure, ValidationError},
  operation::{Operation, Selection},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextTranslationJobProperties {
  pub job_id: Option<String>,
  pub job_name: Option<String>,
  pub job_status: Option<String>,
  pub source_language_code: Option<String>,
  pub target_language_codes: Vec<String>,
  pub submitted_time: Option<String>,
  pub end_time: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl From<&types::TextTranslationJobProperties> for TextTranslationJobProperties {
  fn from(job: &types::TextTranslationJobProperties) -> Self {
    Self {
      job_id: job.job_id().map(str::to_owned),
      job_name: job.job_name().map(str::to_owned),
      job_status: job.job_status().map(|s| s.as_str().to_owned()),
      source_language_code: job.source_language_code().map(str::to_owned),
      target_language_codes: job.target_language_codes().to_vec(),
      submitted_time: timestamp(job.submitted_time()),
      end_time: timestamp(job.end_time()),
      message: job.message().map(str::to_owned),
    }
  }
}

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListTextTranslationJobsParams {
  /// Only jobs with this name
  #[arg(long)]
  pub filter_job_name: Option<String>,

  /// Only jobs in this state (e.g. IN_PROGRESS, COMPLETED)
  #[arg(long)]
  pub filter_job_status: Option<String>,

  /// Only jobs submitted after this time (RFC 3339 or epoch seconds)
  #[arg(long)]
  pub filter_submitted_after_time: Option<Timestamp>,

  /// Only jobs submitted before this time (RFC 3339 or epoch seconds)
  #[arg(long)]
  pub filter_submitted_before_time: Option<Timestamp>,

  /// Maximum number of jobs per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// Token returned by a previous call; only that page is fetched
  #[arg(long)]
  pub next_token: Option<String>,
}

#[derive(Debug)]
pub struct ListTextTranslationJobsContext {
  job_name: Option<String>,
  job_status: Option<String>,
  submitted_after_time: Option<Timestamp>,
  submitted_before_time: Option<Timestamp>,
  max_results: Option<i32>,
  next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextTranslationJobFilter {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_status: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub submitted_after_time: Option<Timestamp>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub submitted_before_time: Option<Timestamp>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTextTranslationJobsRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filter: Option<TextTranslationJobFilter>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_results: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTextTranslationJobsResponse {
  pub text_translation_job_properties_list: Vec<TextTranslationJobProperties>,
  pub next_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ListTextTranslationJobsField {
  TextTranslationJobPropertiesList,
  NextToken,
}

/// `get-trn-text-translation-job-list`
pub struct ListTextTranslationJobs;

impl Operation for ListTextTranslationJobs {
  const NAME: &'static str = "ListTextTranslationJobs";
  const SERVICE: Service = Service::Translate;
  const TOKEN: Option<&'static str> = Some("NextToken");

  type Client = Client;
  type Params = ListTextTranslationJobsParams;
  type Context = ListTextTranslationJobsContext;
  type Request = ListTextTranslationJobsRequest;
  type Response = ListTextTranslationJobsResponse;
  type Field = ListTextTranslationJobsField;

  fn bind(params: &ListTextTranslationJobsParams) -> Result<ListTextTranslationJobsContext, ValidationError> {
    Ok(ListTextTranslationJobsContext {
      job_name: params.filter_job_name.clone(),
      job_status: params
        .filter_job_status
        .as_deref()
        .map(|s| enum_value("filter-job-status", s, JobStatus::values()))
        .transpose()?,
      submitted_after_time: params.filter_submitted_after_time,
      submitted_before_time: params.filter_submitted_before_time,
      max_results: params.max_results,
      next_token: params.next_token.clone(),
    })
  }

  fn assemble(context: &ListTextTranslationJobsContext) -> ListTextTranslationJobsRequest {
    let mut filter = Group::default();
    let group = TextTranslationJobFilter {
      job_name: filter.member(&context.job_name),
      job_status: filter.member(&context.job_status),
      submitted_after_time: filter.member(&context.submitted_after_time),
      submitted_before_time: filter.member(&context.submitted_before_time),
    };

    ListTextTranslationJobsRequest {
      filter: filter.finish(group),
      max_results: context.max_results,
      next_token: context.next_token.clone(),
    }
  }

  async fn invoke(
    client: &Client,
    request: &ListTextTranslationJobsRequest,
  ) -> Result<ListTextTranslationJobsResponse, InvokeFailure> {
    let filter = request.filter.as_ref().map(|f| {
      types::TextTranslationJobFilter::builder()
        .set_job_name(f.job_name.clone())
        .set_job_status(f.job_status.as_deref().map(JobStatus::from))
        .set_submitted_after_time(f.submitted_after_time.map(Timestamp::into_inner))
        .set_submitted_before_time(f.submitted_before_time.map(Timestamp::into_inner))
        .build()
    });

    let output = client
      .list_text_translation_jobs()
      .set_filter(filter)
      .set_max_results(request.max_results)
      .set_next_token(request.next_token.clone())
      .send()
      .await?;

    Ok(ListTextTranslationJobsResponse {
      text_translation_job_properties_list: output
        .text_translation_job_properties_list()
        .iter()
        .map(TextTranslationJobProperties::from)
        .collect(),
      next_token: output.next_token().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<ListTextTranslationJobsField> {
    Selection::Field(ListTextTranslationJobsField::TextTranslationJobPropertiesList)
  }

  fn project(
    response: &ListTextTranslationJobsResponse,
    field: ListTextTranslationJobsField,
  ) -> serde_json::Result<Value> {
    match field {
      ListTextTranslationJobsField::TextTranslationJobPropertiesList => {
        serde_json::to_value(&response.text_translation_job_properties_list)
      }
      ListTextTranslationJobsField::NextToken => serde_json::to_value(&response.next_token),
    }
  }

  fn request_token(request: &ListTextTranslationJobsRequest) -> Option<&str> {
    request.next_token.as_deref()
  }

  fn set_request_token(request: &mut ListTextTranslationJobsRequest, token: Option<String>) {
    request.next_token = token;
  }

  fn response_token(response: &ListTextTranslationJobsResponse) -> Option<&str> {
    response.next_token.as_deref()
  }
}
