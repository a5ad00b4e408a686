//! Built-in tools
//!
//! In-process tools that are always available when `tools.builtin` is on.
//!
//! | Tool | Parameter | Output |
//! |------|-----------|--------|
//! | `calculator` | `expression` | `Result: <value>` |
//! | `get_weather` | `location` | mock weather line |
//! | `search` | `query` | mock result list |

mod calculator;
mod mock;

pub use calculator::{CALCULATOR, CalcError, calculator_definition, evaluate};
pub use mock::{GET_WEATHER, SEARCH, search_definition, weather_definition};

use toolbox_domain::ToolDefinition;

/// All built-in tools, in registration order.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    vec![
        calculator_definition(),
        weather_definition(),
        search_definition(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let names: Vec<_> = builtin_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec![CALCULATOR, GET_WEATHER, SEARCH]);
    }
}
