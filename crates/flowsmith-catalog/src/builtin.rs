//! Built-in catalog data

use crate::catalog::{PatternCatalog, PatternEntry, CATALOG_VERSION};
use crate::pattern::PatternType;
use crate::template::{
    EdgeTemplate, FieldType, NodeTemplate, ProcessingMode, StateInput, UtilityTemplate,
};
use flowsmith_artifact::Dependency;

pub(crate) fn build() -> PatternCatalog {
    PatternCatalog::new(CATALOG_VERSION)
        .with_base_utility(UtilityTemplate::new(
            "call_llm",
            "Send a prompt to the language model and return its reply",
            "prompt: str",
            "str",
        ))
        .with_base_dependency(Dependency::new("pocketflow"))
        .with_base_dependency(Dependency::new("pydantic").with_version(">=2"))
        .with_entry(PatternType::Rag, rag())
        .with_entry(PatternType::Agent, agent())
        .with_entry(PatternType::Workflow, workflow())
        .with_entry(PatternType::Tool, tool())
        .with_entry(PatternType::MapReduce, map_reduce())
        .with_entry(PatternType::MultiAgent, multi_agent())
        .with_entry(PatternType::StructuredOutput, structured_output())
        .with_exclusion(
            PatternType::MapReduce,
            PatternType::Agent,
            "a map/reduce fan-out cannot share a graph with an agent's single decision loop",
        )
        .with_exclusion(
            PatternType::StructuredOutput,
            PatternType::MultiAgent,
            "several cooperating agents cannot be held to one strict output schema",
        )
}

fn rag() -> PatternEntry {
    PatternEntry::new(vec![
        NodeTemplate::new("ChunkDocuments", "Split each source document into retrievable chunks")
            .with_mode(ProcessingMode::Batch),
        NodeTemplate::new("EmbedDocuments", "Compute an embedding for every chunk")
            .with_mode(ProcessingMode::Batch),
        NodeTemplate::new("BuildIndex", "Store the chunk embeddings in a searchable index"),
        NodeTemplate::new("EmbedQuery", "Embed the user question"),
        NodeTemplate::new("RetrieveContext", "Fetch the chunks most relevant to the question"),
        NodeTemplate::new("GenerateAnswer", "Answer the question from the retrieved context"),
    ])
    .with_utility(UtilityTemplate::new(
        "get_embedding",
        "Return the embedding vector for a piece of text",
        "text: str",
        "List[float]",
    ))
    .with_utility(UtilityTemplate::new(
        "search_index",
        "Return the ids of the closest indexed chunks",
        "query_embedding: List[float], top_k: int",
        "List[str]",
    ))
    .with_state_input(StateInput::new("query", FieldType::Text, "User question"))
    .with_state_input(StateInput::new(
        "documents",
        FieldType::TextList,
        "Source documents to index",
    ))
    .with_dependency(Dependency::new("numpy"))
    .with_dependency(Dependency::new("faiss-cpu"))
}

fn agent() -> PatternEntry {
    PatternEntry::new(vec![
        NodeTemplate::new("DecideAction", "Choose the next action from the question and history"),
        NodeTemplate::new("ExecuteAction", "Carry out the chosen action"),
        NodeTemplate::new("ObserveResult", "Record what the action returned"),
        NodeTemplate::new("FinalAnswer", "Compose the final answer for the user"),
    ])
    .with_edge(EdgeTemplate::new("DecideAction", "FinalAnswer", "answer"))
    .with_edge(EdgeTemplate::new("ObserveResult", "DecideAction", "continue"))
    .with_utility(UtilityTemplate::new(
        "search_web",
        "Search the web and return a text digest of the results",
        "query: str",
        "str",
    ))
    .with_state_input(StateInput::new("question", FieldType::Text, "Question the agent works on"))
    .with_dependency(Dependency::new("pyyaml"))
}

fn workflow() -> PatternEntry {
    PatternEntry::new(vec![
        NodeTemplate::new("ValidateInput", "Check that the incoming request is well formed"),
        NodeTemplate::new("ProcessData", "Apply the core business logic to the validated request"),
        NodeTemplate::new("FormatOutput", "Shape the processed result into the response"),
    ])
    .with_state_input(StateInput::new("request", FieldType::Text, "Incoming request payload"))
}

fn tool() -> PatternEntry {
    PatternEntry::new(vec![
        NodeTemplate::new("PrepareToolCall", "Translate the request into tool arguments"),
        NodeTemplate::new("InvokeTool", "Call the external tool or API")
            .with_mode(ProcessingMode::Async),
        NodeTemplate::new("InterpretResult", "Turn the tool response into a user-facing result"),
    ])
    .with_utility(UtilityTemplate::new(
        "call_tool",
        "Invoke a named external tool and return its decoded response",
        "name: str, arguments: Dict[str, Any]",
        "Dict[str, Any]",
    ))
    .with_state_input(StateInput::new("request", FieldType::Text, "Incoming request payload"))
    .with_dependency(Dependency::new("requests"))
}

fn map_reduce() -> PatternEntry {
    PatternEntry::new(vec![
        NodeTemplate::new("SplitInput", "Split the input into independent chunks"),
        NodeTemplate::new("MapChunks", "Process each chunk independently")
            .with_mode(ProcessingMode::Batch),
        NodeTemplate::new("ReduceOutput", "Combine the mapped outputs into one result"),
    ])
    .with_state_input(StateInput::new("items", FieldType::TextList, "Input items to process"))
}

fn multi_agent() -> PatternEntry {
    PatternEntry::new(vec![
        NodeTemplate::new("Coordinator", "Break the task down and hand work to the specialists"),
        NodeTemplate::new("ResearchAgent", "Gather the facts the task needs")
            .with_mode(ProcessingMode::Async),
        NodeTemplate::new("WriterAgent", "Draft the deliverable from the research notes")
            .with_mode(ProcessingMode::Async),
        NodeTemplate::new("ReviewerAgent", "Check the draft and request a revision when needed"),
    ])
    .with_edge(EdgeTemplate::new("ReviewerAgent", "WriterAgent", "revise"))
    .with_state_input(StateInput::new("task", FieldType::Text, "Task handed to the team"))
    .with_dependency(Dependency::new("pyyaml"))
}

fn structured_output() -> PatternEntry {
    PatternEntry::new(vec![
        NodeTemplate::new("PrepareSchema", "Describe the target schema for the model"),
        NodeTemplate::new("GenerateStructured", "Ask the model for output matching the schema"),
        NodeTemplate::new("ValidateOutput", "Check the model output against the schema"),
    ])
    .with_edge(EdgeTemplate::new("ValidateOutput", "GenerateStructured", "retry"))
    .with_utility(UtilityTemplate::new(
        "parse_structured",
        "Parse model output into a dictionary",
        "text: str",
        "Dict[str, Any]",
    ))
    .with_state_input(StateInput::new("raw_text", FieldType::Text, "Unstructured source text"))
    .with_dependency(Dependency::new("pyyaml"))
}
