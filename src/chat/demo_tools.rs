//! Built-in demonstration tools.
//!
//! Small canned-answer tools used by the `chat` command to exercise the
//! tool-calling loop without an external tool server.

use super::message::ToolArguments;
use super::registry::ToolRegistry;
use crate::error::Result;
use crate::stack::{ToolDef, ToolParamDefinition};

fn arg_str<'a>(args: &'a ToolArguments, name: &str) -> Option<&'a str> {
    args.get(name).and_then(|v| v.as_str())
}

fn favorite_color(args: &ToolArguments) -> Result<String> {
    let city = arg_str(args, "city");
    let country = arg_str(args, "country");

    Ok(match (city, country) {
        (Some("Ottawa"), Some("Canada")) => {
            "Favorite color for Ottawa, Canada is black.".to_string()
        }
        (Some("Montreal"), Some("Canada")) => {
            "Favorite color for Montreal, Canada is red.".to_string()
        }
        _ => "City or country not recognized. Assistant, please ask the user again.".to_string(),
    })
}

fn favorite_hockey_team(args: &ToolArguments) -> Result<String> {
    let city = arg_str(args, "city");
    let country = arg_str(args, "country");

    Ok(match (city, country) {
        (Some("Ottawa"), Some("Canada")) => {
            "Favorite hockey team for Ottawa, Canada is The Ottawa Senators.".to_string()
        }
        (Some("Montreal"), Some("Canada")) => {
            "Favorite hockey team for Montreal, Canada is The Montreal Canadiens.".to_string()
        }
        _ => "City or country not recognized. Assistant, please ask the user again.".to_string(),
    })
}

/// Registry holding the built-in demo tools.
pub fn demo_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_fn("favorite_color_tool", favorite_color);
    registry.register_fn("favorite_hockey_tool", favorite_hockey_team);
    registry
}

fn city_country_params() -> Vec<(String, ToolParamDefinition)> {
    vec![
        (
            "city".to_string(),
            ToolParamDefinition::required("string", "The person's city"),
        ),
        (
            "country".to_string(),
            ToolParamDefinition::required("string", "The person's country"),
        ),
    ]
}

/// Tool declarations for the demo tools, as passed to the inference API.
pub fn demo_tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "favorite_color_tool",
            "Returns the favorite color for a person given their city and country.",
            city_country_params(),
        ),
        ToolDef::new(
            "favorite_hockey_tool",
            "Returns the favorite hockey team for a person given their city and country.",
            city_country_params(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(city: &str, country: &str) -> ToolArguments {
        let mut map = ToolArguments::new();
        map.insert("city".into(), json!(city));
        map.insert("country".into(), json!(country));
        map
    }

    #[test]
    fn test_favorite_color_known_cities() {
        assert_eq!(
            favorite_color(&args("Ottawa", "Canada")).unwrap(),
            "Favorite color for Ottawa, Canada is black."
        );
        assert_eq!(
            favorite_color(&args("Montreal", "Canada")).unwrap(),
            "Favorite color for Montreal, Canada is red."
        );
    }

    #[test]
    fn test_favorite_color_unknown_city() {
        let answer = favorite_color(&args("Oslo", "Norway")).unwrap();
        assert!(answer.contains("not recognized"));
    }

    #[test]
    fn test_favorite_hockey_team() {
        assert_eq!(
            favorite_hockey_team(&args("Ottawa", "Canada")).unwrap(),
            "Favorite hockey team for Ottawa, Canada is The Ottawa Senators."
        );
    }

    #[test]
    fn test_demo_registry_contents() {
        let registry = demo_registry();
        assert!(registry.contains("favorite_color_tool"));
        assert!(registry.contains("favorite_hockey_tool"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_demo_tool_defs_wire_shape() {
        let defs = demo_tool_defs();
        assert_eq!(defs.len(), 2);

        let value = serde_json::to_value(&defs[0]).unwrap();
        assert_eq!(value["tool_name"], "favorite_color_tool");
        assert_eq!(value["parameters"]["city"]["param_type"], "string");
        assert_eq!(value["parameters"]["city"]["required"], true);
    }
}
