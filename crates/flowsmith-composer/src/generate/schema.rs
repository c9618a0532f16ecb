//! Data-contract module

use super::{ArtifactGenerator, CodeWriter, GenerationContext, TODO_MARKER};
use crate::contracts::ContractField;
use crate::naming::python_text;
use flowsmith_artifact::{Artifact, ArtifactId, ArtifactRole};

/// Path of the schema module
pub const SCHEMA_PATH: &str = "schema.py";

/// Renders `schema.py`
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaGenerator;

impl ArtifactGenerator for SchemaGenerator {
    fn role(&self) -> ArtifactRole {
        ArtifactRole::Schema
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Artifact> {
        let mut w = CodeWriter::new();
        w.line(format!(
            "\"\"\"Data contracts for {}\"\"\"",
            python_text(&ctx.project.name)
        ));
        w.blank();
        w.line("from typing import Any, Dict, List, Optional");
        w.blank();
        w.line("from pydantic import BaseModel, Field");

        for (i, contract) in ctx.contracts.iter().enumerate() {
            w.blank().blank();
            w.line(format!("class {}(BaseModel):", contract.name));
            w.indent();
            w.line(format!("\"\"\"{}\"\"\"", python_text(&contract.description)));
            w.blank();
            if i == 0 {
                w.line(format!("# {TODO_MARKER}: tighten field types once the data shapes are known"));
            }
            for field in &contract.fields {
                w.line(field_line(field));
            }
            w.dedent();
        }

        vec![Artifact::python(ArtifactId::Schema, SCHEMA_PATH, w.finish())]
    }

    fn name(&self) -> &'static str {
        "schema"
    }
}

fn field_line(field: &ContractField) -> String {
    let description = python_text(&field.description);
    if field.required {
        format!(
            "{}: {} = Field(..., description=\"{description}\")",
            field.name,
            field.python_annotation()
        )
    } else {
        format!(
            "{}: {} = Field(None, description=\"{description}\")",
            field.name,
            field.python_annotation()
        )
    }
}
