//! Prompt templates for the ReAct loop

use crate::tool::entities::ToolDescriptor;
use crate::tool::schema::SchemaConverter;

/// Templates for generating ReAct prompts
pub struct ReactPromptTemplate;

impl ReactPromptTemplate {
    /// System prompt: format instructions plus the tool catalogue.
    pub fn system(tools: &[ToolDescriptor]) -> String {
        let tool_descriptions = if tools.is_empty() {
            "(no tools available)".to_string()
        } else {
            tools
                .iter()
                .map(Self::describe_tool)
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r#"You are a helpful AI assistant that uses the ReAct framework to solve problems.
You have access to the following tools:
{tool_descriptions}

Follow this format for each step:
Thought: [Your reasoning about what to do next]
Action: [tool_name]
Action Input: {{"parameter": "value"}}

After each action you will receive:
Observation: [the tool result]

When you have the final answer, use:
Thought: [Final reasoning]
Answer: [Your final answer]

Only call one tool per step and never write the Observation yourself.
"#
        )
    }

    /// One catalogue line per tool, with its parameters.
    pub fn describe_tool(tool: &ToolDescriptor) -> String {
        let required = SchemaConverter::required_names(&tool.parameters);
        let params = SchemaConverter::property_names(&tool.parameters)
            .into_iter()
            .map(|name| {
                let prop = &tool.parameters["properties"][name];
                let ty = prop["type"].as_str().unwrap_or("string");
                let marker = if required.contains(&name) { ", required" } else { "" };
                match prop["description"].as_str().filter(|d| !d.is_empty()) {
                    Some(desc) => format!("{} ({}{}): {}", name, ty, marker, desc),
                    None => format!("{} ({}{})", name, ty, marker),
                }
            })
            .collect::<Vec<_>>();

        if params.is_empty() {
            format!("- {}: {}", tool.name, tool.description)
        } else {
            format!(
                "- {}: {}\n    Parameters: {}",
                tool.name,
                tool.description,
                params.join("; ")
            )
        }
    }

    /// Test prompt used to check whether a backend can produce tool calls.
    pub fn probe() -> String {
        r#"You are testing function calling capabilities.
Available tools:
- test_tool: A test tool

Respond with:
Thought: Testing function calling
Action: test_tool
Action Input: {"param": "test"}"#
            .to_string()
    }
}
