//! Data contracts derived from a graph

use crate::graph::WorkflowGraph;
use crate::naming::result_key;
use flowsmith_catalog::{FieldType, StateInput};
use serde::{Deserialize, Serialize};

/// Name of the shared-store contract
pub const SHARED_STATE: &str = "SharedState";

/// One typed field of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractField {
    /// Field name
    pub name: String,
    /// Python annotation, without `Optional` for optional fields
    pub annotation: String,
    /// Whether the field must be supplied
    pub required: bool,
    /// Description
    pub description: String,
}

impl ContractField {
    fn required(name: impl Into<String>, annotation: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: annotation.into(),
            required: true,
            description: description.into(),
        }
    }

    fn optional(name: impl Into<String>, annotation: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, annotation, description)
        }
    }

    /// Full annotation as written in the schema
    #[must_use]
    pub fn python_annotation(&self) -> String {
        if self.required {
            self.annotation.clone()
        } else {
            format!("Optional[{}]", self.annotation)
        }
    }
}

/// A typed record exchanged between nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataContract {
    /// Class name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Fields in declaration order
    pub fields: Vec<ContractField>,
}

/// Contracts for a graph: the shared store first, then one item contract
/// per collection node
#[must_use]
pub fn derive_contracts(graph: &WorkflowGraph, inputs: &[StateInput]) -> Vec<DataContract> {
    let mut shared_fields: Vec<ContractField> = inputs
        .iter()
        .map(|input| {
            ContractField::required(
                &input.name,
                input.field_type.python_annotation(),
                &input.description,
            )
        })
        .collect();

    for node in graph.nodes() {
        let annotation = if node.processing_mode.is_collection() {
            FieldType::Records.python_annotation()
        } else {
            FieldType::Any.python_annotation()
        };
        shared_fields.push(ContractField::optional(
            result_key(&node.name),
            annotation,
            format!("Output of {}", node.name),
        ));
    }

    let mut contracts = vec![DataContract {
        name: SHARED_STATE.to_string(),
        description: "Shared store passed between nodes".to_string(),
        fields: shared_fields,
    }];

    for node in graph
        .nodes()
        .iter()
        .filter(|n| n.processing_mode.is_collection())
    {
        contracts.push(DataContract {
            name: item_contract_name(&node.name),
            description: format!("One element processed by {}", node.name),
            fields: vec![
                ContractField::required("item", "Any", "Input element"),
                ContractField::optional("result", "Any", "Processed value"),
            ],
        });
    }
    contracts
}

/// Class name of a collection node's item contract
#[must_use]
pub fn item_contract_name(node: &str) -> String {
    format!("{node}Item")
}

/// The state input a collection node at the start of the graph iterates
#[must_use]
pub fn first_collection_input(inputs: &[StateInput]) -> Option<&StateInput> {
    inputs.iter().find(|i| {
        matches!(
            i.field_type,
            FieldType::TextList | FieldType::FloatList | FieldType::Records
        )
    })
}
