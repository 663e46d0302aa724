//! Binding parameters from piped input, and the interactive confirmation prompt

use std::io::{self, BufRead, Write};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Convert `ClusterId` or `cluster-id` to `cluster_id`
fn snake_case(name: &str) -> String {
  let mut out = String::with_capacity(name.len() + 4);
  let mut prev_lower = false;
  for c in name.chars() {
    match c {
      '-' | ' ' => {
        out.push('_');
        prev_lower = false;
      }
      c if c.is_ascii_uppercase() => {
        if prev_lower {
          out.push('_');
        }
        out.push(c.to_ascii_lowercase());
        prev_lower = false;
      }
      c => {
        out.push(c);
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
      }
    }
  }
  out
}

fn invalid(line: &str, reason: impl ToString) -> ValidationError {
  ValidationError::InvalidValue {
    param: "pipeline",
    value: line.to_owned(),
    reason: reason.to_string(),
  }
}

/// Bind one line of pipeline input on top of the parameters given on the command line
///
/// A JSON object binds by property name (PascalCase, kebab-case or snake_case keys); anything else
/// binds by value to `by_value`, as a string or, for list parameters, a one element list.
pub fn bind_line<P>(base: &P, line: &str, by_value: Option<&str>) -> Result<P, ValidationError>
where
  P: Serialize + DeserializeOwned,
{
  let mut fields = match serde_json::to_value(base).map_err(|e| invalid(line, e))? {
    Value::Object(fields) => fields,
    _ => return Err(invalid(line, "parameters are not a record")),
  };

  let line = line.trim();
  if line.starts_with('{') {
    let input: Map<String, Value> = serde_json::from_str(line).map_err(|e| invalid(line, e))?;
    for (key, value) in input {
      let name = snake_case(&key);
      match fields.get_mut(&name) {
        Some(slot) => *slot = value,
        None => return Err(ValidationError::UnknownParameter(key)),
      }
    }
    return serde_json::from_value(Value::Object(fields)).map_err(|e| invalid(line, e));
  }

  let name = by_value.ok_or_else(|| invalid(line, "this command does not accept values from the pipeline"))?;
  let scalar = Value::String(line.to_owned());

  fields.insert(name.to_owned(), scalar.clone());
  match serde_json::from_value(Value::Object(fields.clone())) {
    Ok(params) => Ok(params),
    Err(_) => {
      fields.insert(name.to_owned(), Value::Array(vec![scalar]));
      serde_json::from_value(Value::Object(fields)).map_err(|e| invalid(line, e))
    }
  }
}

/// Read non-blank lines of pipeline input
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
  let mut lines = Vec::new();
  for line in reader.lines() {
    let line = line?;
    if !line.trim().is_empty() {
      lines.push(line);
    }
  }
  Ok(lines)
}

/// Ask before performing `action` on `target`; anything but yes declines
pub fn confirm<R: BufRead, W: Write>(action: &str, target: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
  write!(output, "Performing the operation \"{action}\" on target \"{target}\". Continue? [y/N] ")?;
  output.flush()?;

  let mut answer = String::new();
  input.read_line(&mut answer)?;

  Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
  use rstest::*;
  use serde::Deserialize;

  use super::*;

  #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
  struct Params {
    cluster_id: Option<String>,
    step_concurrency_level: Option<i32>,
    job_flow_ids: Option<Vec<String>>,
  }

  #[rstest]
  #[case("ClusterId", "cluster_id")]
  #[case("cluster-id", "cluster_id")]
  #[case("cluster_id", "cluster_id")]
  #[case("Ec2InstanceIdsToTerminate", "ec2_instance_ids_to_terminate")]
  #[case("StepConcurrencyLevel", "step_concurrency_level")]
  fn it_converts_names_to_snake_case(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(snake_case(input), expected);
  }

  #[test]
  fn it_binds_by_property_name() {
    let base = Params {
      step_concurrency_level: Some(2),
      ..Default::default()
    };

    let bound = bind_line(&base, r#"{"ClusterId": "j-1ABC", "StepConcurrencyLevel": 0}"#, None).unwrap();

    assert_eq!(
      bound,
      Params {
        cluster_id: Some("j-1ABC".to_string()),
        step_concurrency_level: Some(0),
        job_flow_ids: None,
      }
    );
  }

  #[test]
  fn it_binds_by_value() {
    let bound = bind_line(&Params::default(), "j-2DEF", Some("cluster_id")).unwrap();
    assert_eq!(bound.cluster_id.as_deref(), Some("j-2DEF"));
  }

  #[test]
  fn it_binds_list_parameters_by_value() {
    let bound = bind_line(&Params::default(), " j-3GHI ", Some("job_flow_ids")).unwrap();
    assert_eq!(bound.job_flow_ids, Some(vec!["j-3GHI".to_string()]));
  }

  #[test]
  fn it_rejects_unknown_properties() {
    let err = bind_line(&Params::default(), r#"{"Colour": "blue"}"#, None).unwrap_err();
    assert_eq!(err, ValidationError::UnknownParameter("Colour".to_string()));
  }

  #[test]
  fn it_rejects_values_without_a_pipeline_parameter() {
    assert!(bind_line(&Params::default(), "j-1ABC", None).is_err());
  }

  #[test]
  fn it_rejects_mistyped_properties() {
    let err = bind_line(&Params::default(), r#"{"StepConcurrencyLevel": "many"}"#, None).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { param: "pipeline", .. }));
  }

  #[test]
  fn it_reads_non_blank_lines() {
    let lines = read_lines("a\n\n  \nb\n".as_bytes()).unwrap();
    assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
  }

  #[rstest]
  #[case("y\n", true)]
  #[case("YES\n", true)]
  #[case("n\n", false)]
  #[case("\n", false)]
  #[case("", false)]
  fn it_confirms(#[case] answer: &str, #[case] expected: bool) {
    let mut output = Vec::new();
    let result = confirm("DeleteView", "arn:view", &mut answer.as_bytes(), &mut output).unwrap();

    assert_eq!(result, expected);
    assert_eq!(
      String::from_utf8(output).unwrap(),
      "Performing the operation \"DeleteView\" on target \"arn:view\". Continue? [y/N] "
    );
  }
}
