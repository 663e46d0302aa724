//! Shared building blocks for request and response DTOs

use std::{fmt, str::FromStr};

use aws_smithy_types::{date_time::Format, DateTime};
use clap::{builder::PossibleValue, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tracks whether any member of a nested request group was supplied
///
/// Every member is routed through [`Group::member`]; [`Group::finish`] then yields the group only
/// when at least one member was present. Nested groups are passed back through `member` of their
/// parent, so absence cascades upward.
#[derive(Debug, Default)]
pub struct Group {
  populated: bool,
}

impl Group {
  pub fn member<T: Clone>(&mut self, value: &Option<T>) -> Option<T> {
    if value.is_some() {
      self.populated = true;
    }
    value.clone()
  }

  pub fn finish<T>(self, group: T) -> Option<T> {
    self.populated.then_some(group)
  }
}

/// Point in time accepted as RFC 3339 or as epoch seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timestamp(DateTime);

impl Timestamp {
  pub fn into_inner(self) -> DateTime {
    self.0
  }
}

impl FromStr for Timestamp {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if let Ok(secs) = s.parse::<i64>() {
      return Ok(Self(DateTime::from_secs(secs)));
    }

    DateTime::from_str(s, Format::DateTime)
      .map(Self)
      .map_err(|e| format!("expected an RFC 3339 timestamp or epoch seconds: {e}"))
  }
}

impl fmt::Display for Timestamp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0.fmt(Format::DateTime) {
      Ok(s) => f.write_str(&s),
      Err(_) => write!(f, "{}", self.0.secs()),
    }
  }
}

impl Serialize for Timestamp {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_string())
  }
}

impl<'de> Deserialize<'de> for Timestamp {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
  }
}

/// Format an SDK timestamp for output
pub fn timestamp(value: Option<&DateTime>) -> Option<String> {
  value.and_then(|dt| dt.fmt(Format::DateTime).ok())
}

/// `Key=Value` pair, value optional (`Key` alone)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyValue {
  pub key: String,
  pub value: Option<String>,
}

impl FromStr for KeyValue {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (key, value) = match s.split_once('=') {
      Some((key, value)) => (key, Some(value.to_owned())),
      None => (s, None),
    };
    if key.is_empty() {
      return Err(format!("'{s}' has an empty key; expected Key=Value"));
    }

    Ok(Self {
      key: key.to_owned(),
      value,
    })
  }
}

impl TryFrom<String> for KeyValue {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<KeyValue> for String {
  fn from(kv: KeyValue) -> Self {
    match kv.value {
      Some(value) => format!("{}={value}", kv.key),
      None => kv.key,
    }
  }
}

/// Check a value against the names an SDK enum accepts, returning the canonical spelling
///
/// Matching ignores case and treats `-` as `_` so `in-progress` binds to `IN_PROGRESS`.
pub fn enum_value(param: &'static str, value: &str, allowed: &[&str]) -> Result<String, ValidationError> {
  let wanted = value.replace('-', "_");
  allowed
    .iter()
    .find(|candidate| candidate.eq_ignore_ascii_case(&wanted))
    .map(|candidate| candidate.to_string())
    .ok_or_else(|| ValidationError::InvalidValue {
      param,
      value: value.to_owned(),
      reason: format!("expected one of: {}", allowed.join(", ")),
    })
}

/// Validate a list of enum values; `None` stays absent
pub fn enum_values(
  param: &'static str,
  values: &Option<Vec<String>>,
  allowed: &[&str],
) -> Result<Option<Vec<String>>, ValidationError> {
  values
    .as_ref()
    .map(|values| values.iter().map(|v| enum_value(param, v, allowed)).collect())
    .transpose()
}

/// Unwrap a required parameter
pub fn required<T: Clone>(param: &'static str, value: &Option<T>) -> Result<T, ValidationError> {
  value.clone().ok_or(ValidationError::MissingRequired(param))
}

/// Response with no members
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Empty {}

/// Field selector for responses that carry nothing to select
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoField {}

impl ValueEnum for NoField {
  fn value_variants<'a>() -> &'a [Self] {
    &[]
  }

  fn to_possible_value(&self) -> Option<PossibleValue> {
    match *self {}
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;

  #[derive(Clone, Debug, PartialEq)]
  struct Inner {
    a: Option<i32>,
    b: Option<String>,
  }

  #[derive(Clone, Debug, PartialEq)]
  struct Outer {
    c: Option<i32>,
    inner: Option<Inner>,
  }

  fn assemble(a: Option<i32>, b: Option<String>, c: Option<i32>) -> Option<Outer> {
    let mut inner = Group::default();
    let built = Inner {
      a: inner.member(&a),
      b: inner.member(&b),
    };
    let built = inner.finish(built);

    let mut outer = Group::default();
    let group = Outer {
      c: outer.member(&c),
      inner: outer.member(&built),
    };
    outer.finish(group)
  }

  #[test]
  fn it_omits_groups_without_members() {
    assert_eq!(assemble(None, None, None), None);
  }

  #[test]
  fn it_keeps_explicit_zero() {
    let expected = Outer {
      c: None,
      inner: Some(Inner { a: Some(0), b: None }),
    };
    assert_eq!(assemble(Some(0), None, None), Some(expected));
  }

  #[test]
  fn it_omits_empty_inner_group_only() {
    let expected = Outer { c: Some(5), inner: None };
    assert_eq!(assemble(None, None, Some(5)), Some(expected));
  }

  #[rstest]
  #[case("2023-01-15T10:00:00Z", 1673776800)]
  #[case("1673776800", 1673776800)]
  #[case("0", 0)]
  fn it_parses_timestamps(#[case] input: &str, #[case] secs: i64) {
    let ts: Timestamp = input.parse().unwrap();
    assert_eq!(ts.into_inner().secs(), secs);
  }

  #[test]
  fn it_rejects_bad_timestamps() {
    assert!("yesterday".parse::<Timestamp>().is_err());
  }

  #[rstest]
  #[case("env=prod", "env", Some("prod"))]
  #[case("team", "team", None)]
  #[case("expr=a=b", "expr", Some("a=b"))]
  #[case("empty=", "empty", Some(""))]
  fn it_parses_key_values(#[case] input: &str, #[case] key: &str, #[case] value: Option<&str>) {
    let kv: KeyValue = input.parse().unwrap();
    assert_eq!(kv.key, key);
    assert_eq!(kv.value.as_deref(), value);
  }

  #[test]
  fn it_rejects_empty_keys() {
    assert!("=value".parse::<KeyValue>().is_err());
  }

  #[rstest]
  #[case("running", "RUNNING")]
  #[case("TERMINATED_WITH_ERRORS", "TERMINATED_WITH_ERRORS")]
  #[case("terminated-with-errors", "TERMINATED_WITH_ERRORS")]
  fn it_canonicalizes_enum_values(#[case] input: &str, #[case] expected: &str) {
    let allowed = ["RUNNING", "TERMINATED_WITH_ERRORS"];
    assert_eq!(enum_value("cluster-states", input, &allowed).unwrap(), expected);
  }

  #[test]
  fn it_rejects_unknown_enum_values() {
    let err = enum_value("cluster-states", "sleeping", &["RUNNING"]).unwrap_err();
    assert_eq!(
      err,
      ValidationError::InvalidValue {
        param: "cluster-states",
        value: "sleeping".to_string(),
        reason: "expected one of: RUNNING".to_string(),
      }
    );
  }

  #[test]
  fn it_reports_missing_required() {
    let value: Option<String> = None;
    assert_eq!(
      required("cluster-id", &value).unwrap_err(),
      ValidationError::MissingRequired("cluster-id")
    );
  }
}
