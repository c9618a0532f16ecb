//! Utility stubs

use super::{ArtifactGenerator, CodeWriter, GenerationContext, TODO_MARKER};
use crate::naming::python_text;
use flowsmith_artifact::{Artifact, ArtifactId, ArtifactRole};
use flowsmith_catalog::UtilityTemplate;

/// Directory holding utility modules
pub const UTILS_DIR: &str = "utils";

/// Renders one `utils/<name>.py` per utility
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityGenerator;

impl UtilityGenerator {
    fn render(utility: &UtilityTemplate) -> String {
        let purpose = python_text(&utility.purpose);
        let mut w = CodeWriter::new();
        w.line(format!("\"\"\"{purpose}\"\"\""));
        w.blank();
        w.line("from typing import Any, Dict, List");
        w.blank().blank();
        w.line(format!(
            "def {}({}) -> {}:",
            utility.name, utility.input_signature, utility.output_signature
        ));
        w.indent();
        w.line(format!("\"\"\"{purpose}\"\"\""));
        w.line(format!("# {TODO_MARKER}: implement {}", utility.name));
        w.line("...");
        w.dedent();
        w.finish()
    }
}

impl ArtifactGenerator for UtilityGenerator {
    fn role(&self) -> ArtifactRole {
        ArtifactRole::Utility
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Artifact> {
        ctx.utilities
            .iter()
            .map(|utility| {
                Artifact::python(
                    ArtifactId::utility(&utility.name),
                    format!("{UTILS_DIR}/{}.py", utility.name),
                    Self::render(utility),
                )
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "utilities"
    }
}
