//! Design document

use super::{ArtifactGenerator, GenerationContext, TODO_MARKER};
use crate::diagram::render_mermaid;
use crate::naming::table_cell;
use flowsmith_artifact::{Artifact, ArtifactId, ArtifactRole};
use flowsmith_catalog::PatternType;
use std::fmt::Write;

/// Path of the design document
pub const DESIGN_DOC_PATH: &str = "docs/design.md";

/// Section headings, in order
pub const SECTIONS: [&str; 8] = [
    "Problem Statement",
    "Pattern",
    "Node Sequence",
    "Flow Diagram",
    "Data Contracts",
    "Utilities",
    "Dependencies",
    "Open Items",
];

/// Renders `docs/design.md`
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignDocGenerator;

impl ArtifactGenerator for DesignDocGenerator {
    fn role(&self) -> ArtifactRole {
        ArtifactRole::DesignDoc
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Artifact> {
        let mut doc = String::new();
        let _ = writeln!(doc, "# {} Design", ctx.project.name.trim());

        section(&mut doc, SECTIONS[0]);
        if ctx.project.description.trim().is_empty() {
            let _ = writeln!(doc, "{TODO_MARKER}: describe the problem this project solves.");
        } else {
            let _ = writeln!(doc, "{}", ctx.project.description.trim());
        }

        section(&mut doc, SECTIONS[1]);
        pattern_section(&mut doc, ctx);

        section(&mut doc, SECTIONS[2]);
        let _ = writeln!(doc, "| # | Node | Mode | Purpose |");
        let _ = writeln!(doc, "|---|------|------|---------|");
        for (i, node) in ctx.graph.nodes().iter().enumerate() {
            let _ = writeln!(
                doc,
                "| {} | {} | {} | {} |",
                i + 1,
                node.name,
                node.processing_mode,
                table_cell(&node.purpose)
            );
        }

        section(&mut doc, SECTIONS[3]);
        let _ = writeln!(doc, "```mermaid");
        doc.push_str(&render_mermaid(ctx.graph));
        let _ = writeln!(doc, "```");

        section(&mut doc, SECTIONS[4]);
        for (i, contract) in ctx.contracts.iter().enumerate() {
            if i > 0 {
                doc.push('\n');
            }
            let _ = writeln!(doc, "### {}\n", contract.name);
            let _ = writeln!(doc, "{}\n", table_cell(&contract.description));
            let _ = writeln!(doc, "| Field | Type | Required | Description |");
            let _ = writeln!(doc, "|-------|------|----------|-------------|");
            for field in &contract.fields {
                let _ = writeln!(
                    doc,
                    "| `{}` | `{}` | {} | {} |",
                    field.name,
                    field.python_annotation(),
                    if field.required { "yes" } else { "no" },
                    table_cell(&field.description)
                );
            }
        }

        section(&mut doc, SECTIONS[5]);
        let _ = writeln!(doc, "| Function | Signature | Purpose |");
        let _ = writeln!(doc, "|----------|-----------|---------|");
        for utility in ctx.utilities {
            let _ = writeln!(
                doc,
                "| `{}` | `{}({}) -> {}` | {} |",
                utility.name,
                utility.name,
                utility.input_signature,
                utility.output_signature,
                table_cell(&utility.purpose)
            );
        }

        section(&mut doc, SECTIONS[6]);
        for dependency in ctx.dependencies.iter() {
            match &dependency.version {
                Some(version) => {
                    let _ = writeln!(doc, "- {} {}", dependency.name, version);
                }
                None => {
                    let _ = writeln!(doc, "- {}", dependency.name);
                }
            }
        }

        section(&mut doc, SECTIONS[7]);
        let _ = writeln!(doc, "- {TODO_MARKER}: confirm each node's responsibility and inputs.");
        let _ = writeln!(doc, "- {TODO_MARKER}: replace utility stubs with real integrations.");
        if ctx.recommendation.is_ambiguous() {
            let _ = writeln!(
                doc,
                "- {TODO_MARKER}: the pattern choice was ambiguous; confirm it before building."
            );
        }

        vec![Artifact::markdown(ArtifactId::DesignDoc, DESIGN_DOC_PATH, doc)]
    }

    fn name(&self) -> &'static str {
        "design_doc"
    }
}

fn section(doc: &mut String, title: &str) {
    let _ = write!(doc, "\n## {title}\n\n");
}

fn pattern_section(doc: &mut String, ctx: &GenerationContext<'_>) {
    let rec = ctx.recommendation;
    let _ = writeln!(
        doc,
        "**{}** (confidence {:.2}, complexity {})",
        rec.primary(),
        rec.confidence(),
        ctx.complexity
    );
    if rec.primary() == PatternType::Hybrid || ctx.patterns.len() > 1 {
        let names: Vec<&str> = ctx.patterns.iter().map(PatternType::as_str).collect();
        let _ = writeln!(doc, "\nComponents: {}", names.join(", "));
    }
    if !rec.rationale().is_empty() {
        doc.push('\n');
        for line in rec.rationale() {
            let _ = writeln!(doc, "- {line}");
        }
    }
}
