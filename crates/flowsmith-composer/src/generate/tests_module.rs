//! Smoke-test module for enhanced and advanced scaffolds

use super::{ArtifactGenerator, CodeWriter, GenerationContext, TODO_MARKER};
use crate::contracts::SHARED_STATE;
use crate::generate::flow::INITIALIZER;
use crate::naming::python_text;
use flowsmith_artifact::{Artifact, ArtifactId, ArtifactRole};
use flowsmith_catalog::{Complexity, FieldType};

/// Path of the test module
pub const TESTS_PATH: &str = "tests/test_flow.py";

/// Renders `tests/test_flow.py`; nothing for simple scaffolds
#[derive(Debug, Clone, Copy, Default)]
pub struct TestsGenerator;

fn sample_value(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "\"example\"",
        FieldType::Integer => "0",
        FieldType::Float => "0.0",
        FieldType::Boolean => "False",
        FieldType::TextList => "[\"example\"]",
        FieldType::FloatList => "[0.0]",
        FieldType::Mapping => "{}",
        FieldType::Records => "[]",
        FieldType::Any => "None",
    }
}

impl ArtifactGenerator for TestsGenerator {
    fn role(&self) -> ArtifactRole {
        ArtifactRole::Tests
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Artifact> {
        if ctx.complexity == Complexity::Simple {
            return Vec::new();
        }
        let advanced = ctx.complexity == Complexity::Advanced;

        let mut w = CodeWriter::new();
        w.line(format!(
            "\"\"\"Smoke tests for {}\"\"\"",
            python_text(&ctx.project.name)
        ));
        w.blank();
        w.line(format!("from flow import {INITIALIZER}"));
        if advanced {
            w.line(format!("from schema import {SHARED_STATE}"));
        }
        w.blank().blank();

        w.line("def test_flow_builds():");
        w.indent();
        w.line(format!("# {TODO_MARKER}: assert on real behaviour once nodes are implemented"));
        w.line(format!("flow = {INITIALIZER}()"));
        w.line("assert flow is not None");
        w.dedent();

        if advanced {
            let arguments: Vec<String> = ctx
                .state_inputs
                .iter()
                .map(|i| format!("{}={}", i.name, sample_value(i.field_type)))
                .collect();
            w.blank().blank();
            w.line("def test_shared_state_accepts_inputs():");
            w.indent();
            w.line(format!("# {TODO_MARKER}: use representative input values"));
            w.line(format!("state = {SHARED_STATE}({})", arguments.join(", ")));
            if let Some(first) = ctx.state_inputs.first() {
                w.line(format!("assert state.{} is not None", first.name));
            } else {
                w.line("assert state is not None");
            }
            w.dedent();
        }

        vec![Artifact::python(ArtifactId::Tests, TESTS_PATH, w.finish())]
    }

    fn name(&self) -> &'static str {
        "tests"
    }
}
