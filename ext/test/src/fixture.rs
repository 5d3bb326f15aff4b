//! YAML/JSON fixture schema and runner.
//!
//! A fixture describes one accumulator configuration plus a scripted
//! sequence of lifecycle steps, with expected results and expected error
//! kinds inline. Fixtures are data, so the same file exercises the crate
//! from any driver.
//!
//! ```yaml
//! name: sum-of-ages
//! accumulator:
//!   function: sum
//!   source_variables: [age]
//! steps:
//!   - accumulate: { simple: 10 }
//!     handle: 1
//!   - accumulate: { simple: 20 }
//!     handle: 2
//!   - expect: 30
//! ```

use crate::{builtin_binding, builtin_function};
use accrete::{AccumulateError, Accumulator, Declaration, FactHandle, JoinedTuple, Tuple, Value};
use serde::Deserialize;

/// One conformance fixture: an accumulator plus scripted steps.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    /// Fixture name, reported on failure.
    pub name: String,
    /// Optional human description.
    #[serde(default)]
    pub description: String,
    /// The accumulator under test.
    pub accumulator: AccumulatorConfig,
    /// Steps, executed in order.
    pub steps: Vec<StepConfig>,
}

/// Accumulator configuration by builtin name.
#[derive(Debug, Deserialize)]
pub struct AccumulatorConfig {
    /// Builtin aggregate function name (see [`builtin_function`]).
    pub function: String,
    /// Source-variable names, in extraction order.
    pub source_variables: Vec<String>,
    /// Optional builtin binding name (see [`builtin_binding`]).
    #[serde(default)]
    pub binding: Option<String>,
}

/// One scripted step.
///
/// Untagged: variants are tried in declaration order, so the variants with
/// an `expect_error` field MUST come before their plain counterparts
/// (order matters!).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StepConfig {
    /// Accumulate a tuple and require a specific error kind.
    AccumulateError {
        accumulate: TupleConfig,
        handle: u64,
        expect_error: String,
    },
    /// Reverse a tuple and require a specific error kind.
    ReverseError {
        reverse: TupleConfig,
        handle: u64,
        expect_error: String,
    },
    /// Accumulate a tuple; must succeed.
    Accumulate { accumulate: TupleConfig, handle: u64 },
    /// Reverse a tuple; must succeed.
    Reverse { reverse: TupleConfig, handle: u64 },
    /// Require the current aggregate value; `null` means [`Value::None`].
    Expect { expect: Option<ValueConfig> },
}

/// A matched tuple: either a bare payload or an ordered list of
/// declarations from an inner sub-join.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TupleConfig {
    Joined { joined: Vec<JoinedEntry> },
    Simple { simple: ValueConfig },
}

/// One declaration in a joined tuple.
#[derive(Debug, Deserialize)]
pub struct JoinedEntry {
    pub var: String,
    pub value: ValueConfig,
}

/// A plain data value.
///
/// Untagged: `Int` before `Float` so `10` stays integral (order matters!).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValueConfig {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ValueConfig>),
}

impl ValueConfig {
    fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::Int(*i),
            Self::Float(f) => Value::Float(*f),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::List(items.iter().map(Self::to_value).collect()),
        }
    }
}

impl TupleConfig {
    fn to_tuple(&self) -> Tuple {
        match self {
            Self::Simple { simple } => Tuple::Simple(simple.to_value()),
            Self::Joined { joined } => Tuple::Joined(JoinedTuple::new(
                joined
                    .iter()
                    .map(|e| (Declaration::identity(&e.var), e.value.to_value()))
                    .collect(),
            )),
        }
    }
}

/// Stable fixture-facing name for each error variant.
#[must_use]
pub fn error_kind(error: &AccumulateError) -> &'static str {
    match error {
        AccumulateError::Init { .. } => "init",
        AccumulateError::Eval { .. } => "eval",
        AccumulateError::TypeMismatch { .. } => "type_mismatch",
        AccumulateError::UnknownVariable { .. } => "unknown_variable",
        AccumulateError::UnboundArity { .. } => "unbound_arity",
        AccumulateError::NoSourceVariables => "no_source_variables",
        AccumulateError::TooManySourceVariables { .. } => "too_many_source_variables",
        AccumulateError::ReverseUnsupported { .. } => "reverse_unsupported",
        AccumulateError::ForeignContext { .. } => "foreign_context",
        AccumulateError::DuplicateGroup { .. } => "duplicate_group",
    }
}

/// Outcome of one checked step.
#[derive(Debug)]
pub struct StepResult {
    /// Zero-based step index.
    pub step: usize,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

/// Outcome of running a whole fixture.
#[derive(Debug)]
pub struct FixtureOutcome {
    pub fixture_name: String,
    pub steps: Vec<StepResult>,
}

impl FixtureOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.passed)
    }
}

impl Fixture {
    /// Parse one fixture from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse every fixture from a multi-document YAML stream (`---`
    /// separated).
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for document in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(document)?);
        }
        Ok(fixtures)
    }

    /// Parse one fixture from a JSON document. Same schema as YAML.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Execute the fixture and collect per-step outcomes.
    ///
    /// Configuration problems (unknown builtin, failed validation) are
    /// reported as a single failing step rather than a panic, so a broken
    /// fixture file still produces a readable report.
    pub fn run(&self) -> FixtureOutcome {
        let mut steps = Vec::new();

        let Some(function) = builtin_function(&self.accumulator.function) else {
            steps.push(StepResult {
                step: 0,
                passed: false,
                expected: "a builtin aggregate function".to_string(),
                actual: format!("unknown function \"{}\"", self.accumulator.function),
            });
            return self.outcome(steps);
        };
        let binding = match &self.accumulator.binding {
            None => None,
            Some(name) => match builtin_binding(name) {
                Some(b) => Some(b),
                None => {
                    steps.push(StepResult {
                        step: 0,
                        passed: false,
                        expected: "a builtin binding".to_string(),
                        actual: format!("unknown binding \"{name}\""),
                    });
                    return self.outcome(steps);
                }
            },
        };

        let accumulator = Accumulator::new(
            function,
            self.accumulator.source_variables.clone(),
            binding,
        );
        if let Err(error) = accumulator.validate() {
            steps.push(StepResult {
                step: 0,
                passed: false,
                expected: "a valid accumulator configuration".to_string(),
                actual: error.to_string(),
            });
            return self.outcome(steps);
        }
        let mut context = match accumulator.create_context() {
            Ok(context) => context,
            Err(error) => {
                steps.push(StepResult {
                    step: 0,
                    passed: false,
                    expected: "context creation to succeed".to_string(),
                    actual: error.to_string(),
                });
                return self.outcome(steps);
            }
        };

        for (index, step) in self.steps.iter().enumerate() {
            match step {
                StepConfig::Accumulate { accumulate, handle } => {
                    if let Err(error) = accumulator.accumulate(
                        &accumulate.to_tuple(),
                        FactHandle::new(*handle),
                        context.as_mut(),
                    ) {
                        steps.push(StepResult {
                            step: index,
                            passed: false,
                            expected: "accumulate to succeed".to_string(),
                            actual: error.to_string(),
                        });
                    }
                }
                StepConfig::Reverse { reverse, handle } => {
                    if let Err(error) = accumulator.reverse(
                        &reverse.to_tuple(),
                        FactHandle::new(*handle),
                        context.as_mut(),
                    ) {
                        steps.push(StepResult {
                            step: index,
                            passed: false,
                            expected: "reverse to succeed".to_string(),
                            actual: error.to_string(),
                        });
                    }
                }
                StepConfig::AccumulateError {
                    accumulate,
                    handle,
                    expect_error,
                } => {
                    let result = accumulator.accumulate(
                        &accumulate.to_tuple(),
                        FactHandle::new(*handle),
                        context.as_mut(),
                    );
                    steps.push(Self::check_error(index, expect_error, result));
                }
                StepConfig::ReverseError {
                    reverse,
                    handle,
                    expect_error,
                } => {
                    let result = accumulator.reverse(
                        &reverse.to_tuple(),
                        FactHandle::new(*handle),
                        context.as_mut(),
                    );
                    steps.push(Self::check_error(index, expect_error, result));
                }
                StepConfig::Expect { expect } => {
                    let want = expect.as_ref().map_or(Value::None, ValueConfig::to_value);
                    let (passed, actual) = match accumulator.result(context.as_ref()) {
                        Ok(got) => (got == want, format!("{got:?}")),
                        Err(error) => (false, error.to_string()),
                    };
                    steps.push(StepResult {
                        step: index,
                        passed,
                        expected: format!("{want:?}"),
                        actual,
                    });
                }
            }
        }

        self.outcome(steps)
    }

    /// [`run`](Self::run), panicking with a readable message on the first
    /// failing step. For use inside `#[test]` functions.
    pub fn run_and_assert(&self) {
        let outcome = self.run();
        for step in &outcome.steps {
            assert!(
                step.passed,
                "fixture \"{}\" step {}: expected {}, got {}",
                outcome.fixture_name, step.step, step.expected, step.actual
            );
        }
    }

    fn outcome(&self, steps: Vec<StepResult>) -> FixtureOutcome {
        FixtureOutcome {
            fixture_name: self.name.clone(),
            steps,
        }
    }

    fn check_error(
        index: usize,
        expect_error: &str,
        result: Result<(), AccumulateError>,
    ) -> StepResult {
        match result {
            Ok(()) => StepResult {
                step: index,
                passed: false,
                expected: format!("error kind \"{expect_error}\""),
                actual: "success".to_string(),
            },
            Err(error) => StepResult {
                step: index,
                passed: error_kind(&error) == expect_error,
                expected: format!("error kind \"{expect_error}\""),
                actual: format!("error kind \"{}\" ({error})", error_kind(&error)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_fixture() {
        let fixture = Fixture::from_yaml(
            r#"
name: minimal
accumulator:
  function: count
  source_variables: [order]
steps:
  - accumulate: { simple: 1 }
    handle: 1
  - expect: 1
"#,
        )
        .unwrap();
        assert_eq!(fixture.name, "minimal");
        assert_eq!(fixture.steps.len(), 2);
        fixture.run_and_assert();
    }

    #[test]
    fn test_parse_multi_document_stream() {
        let fixtures = Fixture::from_yaml_multi(
            r#"
name: first
accumulator:
  function: count
  source_variables: [x]
steps:
  - expect: 0
---
name: second
accumulator:
  function: sum
  source_variables: [x]
steps:
  - expect: 0
"#,
        )
        .unwrap();
        assert_eq!(fixtures.len(), 2);
        for fixture in &fixtures {
            fixture.run_and_assert();
        }
    }

    #[test]
    fn test_json_fixture_same_schema() {
        let fixture = Fixture::from_json(
            r#"{
                "name": "json",
                "accumulator": { "function": "sum", "source_variables": ["age"] },
                "steps": [
                    { "accumulate": { "simple": 5 }, "handle": 1 },
                    { "expect": 5 }
                ]
            }"#,
        )
        .unwrap();
        fixture.run_and_assert();
    }

    #[test]
    fn test_int_stays_integral() {
        // Untagged ordering: 10 must parse as Int, not Float.
        let fixture = Fixture::from_yaml(
            r#"
name: integral
accumulator:
  function: sum
  source_variables: [n]
steps:
  - accumulate: { simple: 10 }
    handle: 1
  - expect: 10
"#,
        )
        .unwrap();
        assert!(fixture.run().passed());
    }

    #[test]
    fn test_joined_tuple_step() {
        let fixture = Fixture::from_yaml(
            r#"
name: joined
accumulator:
  function: sum
  source_variables: [age]
steps:
  - accumulate:
      joined:
        - { var: age, value: 30 }
        - { var: name, value: ann }
    handle: 1
  - expect: 30
"#,
        )
        .unwrap();
        fixture.run_and_assert();
    }

    #[test]
    fn test_expected_error_kind_step() {
        let fixture = Fixture::from_yaml(
            r#"
name: reverse-on-max
accumulator:
  function: max
  source_variables: [age]
steps:
  - accumulate: { simple: 30 }
    handle: 1
  - reverse: { simple: 30 }
    handle: 1
    expect_error: reverse_unsupported
  - expect: 30
"#,
        )
        .unwrap();
        fixture.run_and_assert();
    }

    #[test]
    fn test_wrong_expectation_reports_step() {
        let fixture = Fixture::from_yaml(
            r#"
name: wrong
accumulator:
  function: count
  source_variables: [x]
steps:
  - expect: 7
"#,
        )
        .unwrap();
        let outcome = fixture.run();
        assert!(!outcome.passed());
        assert_eq!(outcome.steps[0].step, 0);
    }

    #[test]
    fn test_unknown_function_is_reported_not_panicked() {
        let fixture = Fixture::from_yaml(
            r#"
name: unknown
accumulator:
  function: median
  source_variables: [x]
steps: []
"#,
        )
        .unwrap();
        let outcome = fixture.run();
        assert!(!outcome.passed());
        assert!(outcome.steps[0].actual.contains("median"));
    }

    #[test]
    fn test_error_kind_names_are_stable() {
        assert_eq!(
            error_kind(&AccumulateError::ReverseUnsupported {
                function: "Max".into()
            }),
            "reverse_unsupported"
        );
        assert_eq!(error_kind(&AccumulateError::NoSourceVariables), "no_source_variables");
    }
}
