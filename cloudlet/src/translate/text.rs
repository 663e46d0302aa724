use aws_sdk_translate::{
  types::{self, Brevity, DisplayLanguageCode, Formality, Profanity},
  Client,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  client::Service,
  dto::{enum_value, required, Group},
  error::{InvokeFailure, ValidationError},
  operation::{Operation, Selection},
};

/// Source language code that asks the service to detect the language
const AUTO_DETECT: &str = "auto";

fn optional_enum(
  param: &'static str,
  value: &Option<String>,
  allowed: &[&str],
) -> Result<Option<String>, ValidationError> {
  value
    .as_deref()
    .map(|v| enum_value(param, v, allowed))
    .transpose()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranslationSettings {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub brevity: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub formality: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profanity: Option<String>,
}

impl From<&types::TranslationSettings> for TranslationSettings {
  fn from(settings: &types::TranslationSettings) -> Self {
    Self {
      brevity: settings.brevity().map(|b| b.as_str().to_owned()),
      formality: settings.formality().map(|f| f.as_str().to_owned()),
      profanity: settings.profanity().map(|p| p.as_str().to_owned()),
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppliedTerminology {
  pub name: Option<String>,
  pub terms: Vec<Term>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Term {
  pub source_text: Option<String>,
  pub target_text: Option<String>,
}

// TranslateText

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct TranslateTextParams {
  /// Text to translate
  #[arg(value_name = "TEXT")]
  pub text: Option<String>,

  /// Language of the text; `auto` lets the service detect it
  #[arg(long, default_value = AUTO_DETECT)]
  pub source_language_code: Option<String>,

  /// Language to translate into
  #[arg(long)]
  pub target_language_code: Option<String>,

  /// Custom terminologies to apply
  #[arg(long, alias = "terminology-name", value_delimiter = ',')]
  pub terminology_names: Option<Vec<String>>,

  /// Shorten the translation (ON)
  #[arg(long)]
  pub settings_brevity: Option<String>,

  /// Level of formality (FORMAL, INFORMAL)
  #[arg(long)]
  pub settings_formality: Option<String>,

  /// Mask profane words (MASK)
  #[arg(long)]
  pub settings_profanity: Option<String>,
}

#[derive(Debug)]
pub struct TranslateTextContext {
  text: String,
  source_language_code: String,
  target_language_code: String,
  terminology_names: Option<Vec<String>>,
  brevity: Option<String>,
  formality: Option<String>,
  profanity: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranslateTextRequest {
  pub text: String,
  pub source_language_code: String,
  pub target_language_code: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub terminology_names: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub settings: Option<TranslationSettings>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranslateTextResponse {
  pub translated_text: String,
  pub source_language_code: String,
  pub target_language_code: String,
  pub applied_terminologies: Vec<AppliedTerminology>,
  pub applied_settings: Option<TranslationSettings>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum TranslateTextField {
  TranslatedText,
  SourceLanguageCode,
  TargetLanguageCode,
  AppliedTerminologies,
  AppliedSettings,
}

/// `convert-trn-text`
pub struct TranslateText;

impl Operation for TranslateText {
  const NAME: &'static str = "TranslateText";
  const SERVICE: Service = Service::Translate;
  const PASS_THRU: Option<&'static str> = Some("Text");
  const PIPELINE_BY_VALUE: Option<&'static str> = Some("text");

  type Client = Client;
  type Params = TranslateTextParams;
  type Context = TranslateTextContext;
  type Request = TranslateTextRequest;
  type Response = TranslateTextResponse;
  type Field = TranslateTextField;

  fn bind(params: &TranslateTextParams) -> Result<TranslateTextContext, ValidationError> {
    Ok(TranslateTextContext {
      text: required("text", &params.text)?,
      source_language_code: required("source-language-code", &params.source_language_code)?,
      target_language_code: required("target-language-code", &params.target_language_code)?,
      terminology_names: params.terminology_names.clone(),
      brevity: optional_enum("settings-brevity", &params.settings_brevity, Brevity::values())?,
      formality: optional_enum("settings-formality", &params.settings_formality, Formality::values())?,
      profanity: optional_enum("settings-profanity", &params.settings_profanity, Profanity::values())?,
    })
  }

  fn assemble(context: &TranslateTextContext) -> TranslateTextRequest {
    let mut settings = Group::default();
    let group = TranslationSettings {
      brevity: settings.member(&context.brevity),
      formality: settings.member(&context.formality),
      profanity: settings.member(&context.profanity),
    };

    TranslateTextRequest {
      text: context.text.clone(),
      source_language_code: context.source_language_code.clone(),
      target_language_code: context.target_language_code.clone(),
      terminology_names: context.terminology_names.clone(),
      settings: settings.finish(group),
    }
  }

  async fn invoke(client: &Client, request: &TranslateTextRequest) -> Result<TranslateTextResponse, InvokeFailure> {
    let settings = request.settings.as_ref().map(|s| {
      types::TranslationSettings::builder()
        .set_brevity(s.brevity.as_deref().map(Brevity::from))
        .set_formality(s.formality.as_deref().map(Formality::from))
        .set_profanity(s.profanity.as_deref().map(Profanity::from))
        .build()
    });

    let output = client
      .translate_text()
      .text(request.text.clone())
      .source_language_code(request.source_language_code.clone())
      .target_language_code(request.target_language_code.clone())
      .set_terminology_names(request.terminology_names.clone())
      .set_settings(settings)
      .send()
      .await?;

    Ok(TranslateTextResponse {
      translated_text: output.translated_text().to_owned(),
      source_language_code: output.source_language_code().to_owned(),
      target_language_code: output.target_language_code().to_owned(),
      applied_terminologies: output
        .applied_terminologies()
        .iter()
        .map(|t| AppliedTerminology {
          name: t.name().map(str::to_owned),
          terms: t
            .terms()
            .iter()
            .map(|term| Term {
              source_text: term.source_text().map(str::to_owned),
              target_text: term.target_text().map(str::to_owned),
            })
            .collect(),
        })
        .collect(),
      applied_settings: output.applied_settings().map(TranslationSettings::from),
    })
  }

  fn default_selection() -> Selection<TranslateTextField> {
    Selection::Field(TranslateTextField::TranslatedText)
  }

  fn project(response: &TranslateTextResponse, field: TranslateTextField) -> serde_json::Result<Value> {
    match field {
      TranslateTextField::TranslatedText => serde_json::to_value(&response.translated_text),
      TranslateTextField::SourceLanguageCode => serde_json::to_value(&response.source_language_code),
      TranslateTextField::TargetLanguageCode => serde_json::to_value(&response.target_language_code),
      TranslateTextField::AppliedTerminologies => serde_json::to_value(&response.applied_terminologies),
      TranslateTextField::AppliedSettings => serde_json::to_value(&response.applied_settings),
    }
  }

  fn pass_thru(context: &TranslateTextContext) -> Option<Value> {
    Some(Value::String(context.text.clone()))
  }
}

// ListLanguages

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Language {
  pub language_name: String,
  pub language_code: String,
}

#[derive(Args, Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListLanguagesParams {
  /// Language in which the language names are returned (e.g. de, en, ja)
  #[arg(long)]
  pub display_language_code: Option<String>,

  /// Maximum number of languages per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// Token returned by a previous call; only that page is fetched
  #[arg(long)]
  pub next_token: Option<String>,
}

#[derive(Debug)]
pub struct ListLanguagesContext {
  display_language_code: Option<String>,
  max_results: Option<i32>,
  next_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListLanguagesRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub display_language_code: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_results: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListLanguagesResponse {
  pub languages: Vec<Language>,
  pub display_language_code: Option<String>,
  pub next_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ListLanguagesField {
  Languages,
  DisplayLanguageCode,
  NextToken,
}

/// `get-trn-language-list`
pub struct ListLanguages;

impl Operation for ListLanguages {
  const NAME: &'static str = "ListLanguages";
  const SERVICE: Service = Service::Translate;
  const TOKEN: Option<&'static str> = Some("NextToken");

  type Client = Client;
  type Params = ListLanguagesParams;
  type Context = ListLanguagesContext;
  type Request = ListLanguagesRequest;
  type Response = ListLanguagesResponse;
  type Field = ListLanguagesField;

  fn bind(params: &ListLanguagesParams) -> Result<ListLanguagesContext, ValidationError> {
    Ok(ListLanguagesContext {
      display_language_code: optional_enum(
        "display-language-code",
        &params.display_language_code,
        DisplayLanguageCode::values(),
      )?,
      max_results: params.max_results,
      next_token: params.next_token.clone(),
    })
  }

  fn assemble(context: &ListLanguagesContext) -> ListLanguagesRequest {
    ListLanguagesRequest {
      display_language_code: context.display_language_code.clone(),
      max_results: context.max_results,
      next_token: context.next_token.clone(),
    }
  }

  async fn invoke(client: &Client, request: &ListLanguagesRequest) -> Result<ListLanguagesResponse, InvokeFailure> {
    let output = client
      .list_languages()
      .set_display_language_code(request.display_language_code.as_deref().map(DisplayLanguageCode::from))
      .set_max_results(request.max_results)
      .set_next_token(request.next_token.clone())
      .send()
      .await?;

    Ok(ListLanguagesResponse {
      languages: output
        .languages()
        .iter()
        .map(|l| Language {
          language_name: l.language_name().to_owned(),
          language_code: l.language_code().to_owned(),
        })
        .collect(),
      display_language_code: output.display_language_code().map(|c| c.as_str().to_owned()),
      next_token: output.next_token().map(str::to_owned),
    })
  }

  fn default_selection() -> Selection<ListLanguagesField> {
    Selection::Field(ListLanguagesField::Languages)
  }

  fn project(response: &ListLanguagesResponse, field: ListLanguagesField) -> serde_json::Result<Value> {
    match field {
      ListLanguagesField::Languages => serde_json::to_value(&response.languages),
      ListLanguagesField::DisplayLanguageCode => serde_json::to_value(&response.display_language_code),
      ListLanguagesField::NextToken => serde_json::to_value(&response.next_token),
    }
  }

  fn request_token(request: &ListLanguagesRequest) -> Option<&str> {
    request.next_token.as_deref()
  }

  fn set_request_token(request: &mut ListLanguagesRequest, token: Option<String>) {
    request.next_token = token;
  }

  fn response_token(response: &ListLanguagesResponse) -> Option<&str> {
    response.next_token.as_deref()
  }
}
