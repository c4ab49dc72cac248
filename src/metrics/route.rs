//! Mapping of route template parameters onto metric labels.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Publishes the value of a route parameter (e.g. `{tenant}` in
/// `/api/{tenant}/orders`) as a metric label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RouteParameterMapping {
    /// Name of the parameter in the route template.
    #[serde(rename = "parameter")]
    pub parameter_name: String,
    /// Name of the label the value is published under.
    #[serde(rename = "label")]
    pub label_name: String,
}

impl RouteParameterMapping {
    pub fn new(parameter_name: impl Into<String>, label_name: impl Into<String>) -> Self {
        RouteParameterMapping {
            parameter_name: parameter_name.into(),
            label_name: label_name.into(),
        }
    }
}

/// Uses the parameter name as the label name.
impl From<&str> for RouteParameterMapping {
    fn from(name: &str) -> Self {
        RouteParameterMapping::new(name, name)
    }
}

impl From<String> for RouteParameterMapping {
    fn from(name: String) -> Self {
        RouteParameterMapping {
            label_name: name.clone(),
            parameter_name: name,
        }
    }
}

impl From<(&str, &str)> for RouteParameterMapping {
    fn from((parameter_name, label_name): (&str, &str)) -> Self {
        RouteParameterMapping::new(parameter_name, label_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_name_maps_onto_itself() {
        let mapping = RouteParameterMapping::from("tenant");
        assert_eq!(mapping.parameter_name, "tenant");
        assert_eq!(mapping.label_name, "tenant");
        assert_eq!(mapping, RouteParameterMapping::from("tenant".to_string()));
    }

    #[test]
    fn pair_maps_parameter_to_label() {
        let mapping = RouteParameterMapping::from(("id", "order_id"));
        assert_eq!(mapping.parameter_name, "id");
        assert_eq!(mapping.label_name, "order_id");
    }
}
