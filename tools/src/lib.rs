//! The `cascade_thinking` tool surface.
//!
//! - [`tool_definition`]: name, description and JSON schema advertised to clients
//! - [`validate_thought_args`]: raw arguments to a typed request
//! - [`render_thought`]: boxed text block for the thought log

mod render;
mod validate;

pub use render::{RenderContext, render_thought};
pub use validate::{ValidationError, validate_thought_args};

use serde_json::{Value, json};

use cascade_types::ToolDefinition;

pub const TOOL_NAME: &str = "cascade_thinking";

const DESCRIPTION: &str = include_str!("description.md");

const REFERENCE_PATTERN: &str = "^[AaSs][1-9][0-9]*$";

#[must_use]
pub fn tool_definition() -> ToolDefinition {
    ToolDefinition::new(TOOL_NAME, DESCRIPTION.trim_end(), input_schema())
}

fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "thought": {
                "type": "string",
                "minLength": 1,
                "description": "Your current thinking step"
            },
            "nextThoughtNeeded": {
                "type": "boolean",
                "description": "Whether another thought step is needed"
            },
            "thoughtNumber": {
                "type": "string",
                "pattern": "^[Ss][1-9][0-9]*$",
                "description": "Position in the current sequence (\"S1\", \"S2\", ...)"
            },
            "totalThoughts": {
                "type": "integer",
                "minimum": 1,
                "description": "Estimated total thoughts needed"
            },
            "isRevision": {
                "type": "boolean",
                "description": "Whether this revises previous thinking"
            },
            "revisesThought": {
                "type": "string",
                "pattern": REFERENCE_PATTERN,
                "description": "Thought being reconsidered (\"A7\" or \"S2\")"
            },
            "branchFromThought": {
                "type": "string",
                "pattern": REFERENCE_PATTERN,
                "description": "Branching point (\"A23\" or \"S2\")"
            },
            "branchId": {
                "type": "string",
                "description": "Branch identifier"
            },
            "branchDescription": {
                "type": "string",
                "description": "What this branch explores"
            },
            "needsMoreThoughts": {
                "type": "boolean",
                "description": "Expand totalThoughts when more analysis is needed"
            },
            "startNewSequence": {
                "type": "boolean",
                "description": "Begin a new sequence at S1"
            },
            "sequenceDescription": {
                "type": "string",
                "description": "What the new sequence explores"
            },
            "switchToBranch": {
                "type": "string",
                "description": "Branch id to resume, or \"main\""
            },
            "toolSource": {
                "type": "string",
                "description": "Identity of the calling tool (\"user\", \"agent:1\", \"task:auth\")"
            },
            "isolatedContext": {
                "type": "boolean",
                "description": "Keep a private history for this toolSource"
            },
            "recentThoughtsLimit": {
                "type": "integer",
                "minimum": 0,
                "maximum": 100,
                "description": "How many recent thoughts to include (default 5)"
            },
            "retrieveThoughts": {
                "type": "string",
                "description": "\"last:N\", \"A10-A15\", \"S3-S7\" or \"A3,A17,S5\""
            },
            "responseMode": {
                "type": "string",
                "enum": ["minimal", "standard", "verbose"],
                "description": "Response verbosity (default \"standard\")"
            }
        },
        "required": ["thought", "totalThoughts", "nextThoughtNeeded"]
    })
}
