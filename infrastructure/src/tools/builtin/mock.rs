//! `get_weather` and `search`: canned responses for exercising the loop
//! without external services.

use std::sync::Arc;

use serde_json::{Value, json};
use toolbox_domain::{
    SchemaConverter, SyncFnHandler, ToolArguments, ToolDefinition, ToolError, ToolParameter,
};

pub const GET_WEATHER: &str = "get_weather";
pub const SEARCH: &str = "search";

pub fn weather_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_WEATHER,
        "Get the current weather for a location",
        &SchemaConverter::from_parameters(&[ToolParameter::new(
            "location",
            "City or place name",
            true,
        )]),
        Arc::new(SyncFnHandler::new(|args: &ToolArguments| {
            let location = single_argument(args, "location")?;
            Ok(Value::String(format!("Weather in {}: Sunny, 72°F", location)))
        })),
    )
}

pub fn search_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH,
        "Search for information",
        &SchemaConverter::from_parameters(&[ToolParameter::new("query", "Search query", true)]),
        Arc::new(SyncFnHandler::new(|args: &ToolArguments| {
            let query = single_argument(args, "query")?;
            Ok(json!(format!(
                "Search results for '{}': [Sample result 1, Sample result 2]",
                query
            )))
        })),
    )
}

fn single_argument(args: &ToolArguments, key: &str) -> Result<String, ToolError> {
    args.get_str_or_first(key)
        .ok_or_else(|| ToolError::invalid_argument(format!("Missing required argument: {}", key)))
}
