use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Expected structure of a JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    Number,
    Bool,
    /// Homogeneous list whose every element has the inner shape
    Array(Box<Shape>),
    /// Object with the listed fields; unlisted keys are ignored
    Object(Vec<Field>),
}

impl Shape {
    pub fn array(inner: Shape) -> Self {
        Self::Array(Box::new(inner))
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

/// One named field of an object shape
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    /// An optional field may be absent, but when present it must match
    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

/// What was wrong at the reported path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Unserializable(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "required field is missing"),
            Self::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            Self::Unserializable(reason) => write!(f, "record cannot be serialized: {}", reason),
        }
    }
}

/// First schema violation found in a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation at {path}: {violation}")]
pub struct ValidationError {
    /// Dotted field path, with `[i]` for list positions
    pub path: String,
    pub violation: Violation,
}

/// Validates `value` against `shape`, stopping at the first violation
///
/// # Example
///
/// ```
/// use canary::schema::{validate, Field, Shape};
/// use serde_json::json;
///
/// let shape = Shape::Object(vec![
///     Field::required("name", Shape::String),
///     Field::optional("about", Shape::String),
/// ]);
/// assert!(validate(&shape, &json!({"name": "Joe's"})).is_ok());
/// assert_eq!(validate(&shape, &json!({})).unwrap_err().path, "name");
/// ```
pub fn validate(shape: &Shape, value: &Value) -> Result<(), ValidationError> {
    check(shape, value, &mut String::new())
}

fn check(shape: &Shape, value: &Value, path: &mut String) -> Result<(), ValidationError> {
    match (shape, value) {
        (Shape::String, Value::String(_))
        | (Shape::Number, Value::Number(_))
        | (Shape::Bool, Value::Bool(_)) => Ok(()),

        (Shape::Array(inner), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let mark = path.len();
                path.push_str(&format!("[{}]", i));
                check(inner, item, path)?;
                path.truncate(mark);
            }
            Ok(())
        }

        (Shape::Object(fields), Value::Object(map)) => {
            for field in fields {
                let mark = path.len();
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(field.name);

                match map.get(field.name) {
                    Some(child) => check(&field.shape, child, path)?,
                    None if field.required => return Err(violation(path, Violation::Missing)),
                    None => {}
                }
                path.truncate(mark);
            }
            Ok(())
        }

        (expected, found) => Err(violation(
            path,
            Violation::WrongType {
                expected: expected.type_name(),
                found: json_type_name(found),
            },
        )),
    }
}

fn violation(path: &str, violation: Violation) -> ValidationError {
    ValidationError {
        path: if path.is_empty() {
            "$".to_string()
        } else {
            path.to_string()
        },
        violation,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
