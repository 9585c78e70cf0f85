use std::fmt;

use serde::Serialize;

/// The resolved value of an amount group
///
/// Serializes untagged: `null`, a number, or a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quantity {
    #[default]
    None,
    Numeric(f64),
    Literal(String),
}

impl Quantity {
    pub fn is_none(&self) -> bool {
        matches!(self, Quantity::None)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Quantity::Numeric(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::None => Ok(()),
            Quantity::Numeric(value) => write!(f, "{:.3}", value),
            Quantity::Literal(text) => f.write_str(text),
        }
    }
}

static NO_QUANTITY: Quantity = Quantity::None;

/// One unit of step content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Direction {
    Text {
        value: String,
    },
    Ingredient {
        name: String,
        quantity: Quantity,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    /// Cookware never carries a unit
    Cookware { name: String, quantity: Quantity },
    /// Has a name, a quantity, or both
    Timer {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        quantity: Quantity,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

impl Direction {
    pub fn name(&self) -> Option<&str> {
        match self {
            Direction::Text { .. } => None,
            Direction::Ingredient { name, .. } | Direction::Cookware { name, .. } => Some(name),
            Direction::Timer { name, .. } => name.as_deref(),
        }
    }

    pub fn quantity(&self) -> &Quantity {
        match self {
            Direction::Text { .. } => &NO_QUANTITY,
            Direction::Ingredient { quantity, .. }
            | Direction::Cookware { quantity, .. }
            | Direction::Timer { quantity, .. } => quantity,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            Direction::Ingredient { unit, .. } | Direction::Timer { unit, .. } => unit.as_deref(),
            Direction::Text { .. } | Direction::Cookware { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Direction::Text { .. } => "text",
            Direction::Ingredient { .. } => "ingredient",
            Direction::Cookware { .. } => "cookware",
            Direction::Timer { .. } => "timer",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Direction::Text { value } = self {
            return write!(f, "{{ type: \"text\", value: {:?} }}", value);
        }

        write!(f, "{{ type: \"{}\"", self.kind())?;
        if let Some(name) = self.name() {
            write!(f, ", name: {:?}", name)?;
        }
        match self.quantity() {
            Quantity::None => {}
            Quantity::Numeric(value) => write!(f, ", quantity: {:.3}", value)?,
            Quantity::Literal(text) => write!(f, ", quantity: {:?}", text)?,
        }
        if let Some(unit) = self.unit() {
            write!(f, ", units: {:?}", unit)?;
        }
        f.write_str(" }")
    }
}

/// An ordered, non-empty list of directions from one source line
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Step {
    pub directions: Vec<Direction>,
}

impl Step {
    pub fn directions(&self) -> impl Iterator<Item = &Direction> {
        self.directions.iter()
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &Direction> {
        self.directions
            .iter()
            .filter(|d| matches!(d, Direction::Ingredient { .. }))
    }

    pub fn cookware(&self) -> impl Iterator<Item = &Direction> {
        self.directions
            .iter()
            .filter(|d| matches!(d, Direction::Cookware { .. }))
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub identifier: String,
    pub content: String,
}

/// A parsed recipe
///
/// `ingredients` and `cookware` hold each name once, in order of first
/// appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recipe {
    pub metadata: Vec<Metadata>,
    pub steps: Vec<Step>,
    pub ingredients: Vec<String>,
    pub cookware: Vec<String>,
}

impl Recipe {
    /// Content of the first metadata entry with this identifier
    pub fn metadata_value(&self, identifier: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.identifier == identifier)
            .map(|m| m.content.as_str())
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn directions(&self) -> impl Iterator<Item = &Direction> {
        self.steps.iter().flat_map(|s| s.directions.iter())
    }

    pub(crate) fn push_step(&mut self, step: Step) {
        for direction in &step.directions {
            match direction {
                Direction::Ingredient { name, .. } => index_name(&mut self.ingredients, name),
                Direction::Cookware { name, .. } => index_name(&mut self.cookware, name),
                _ => {}
            }
        }
        self.steps.push(step);
    }
}

fn index_name(index: &mut Vec<String>, name: &str) {
    if !index.iter().any(|n| n == name) {
        index.push(name.to_string());
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for meta in &self.metadata {
            writeln!(f, ">> {}: {}", meta.identifier, meta.content)?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "Step {}:", i + 1)?;
            for direction in &step.directions {
                writeln!(f, "  {}", direction)?;
            }
        }
        if !self.ingredients.is_empty() {
            writeln!(f, "Ingredients: {}", self.ingredients.join(", "))?;
        }
        if !self.cookware.is_empty() {
            writeln!(f, "Cookware: {}", self.cookware.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, quantity: Quantity, unit: Option<&str>) -> Direction {
        Direction::Ingredient {
            name: name.to_string(),
            quantity,
            unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(Quantity::Numeric(3.0).to_string(), "3.000");
        assert_eq!(Quantity::Numeric(0.5).to_string(), "0.500");
        assert_eq!(Quantity::Literal("a pinch".into()).to_string(), "a pinch");
        assert_eq!(Quantity::None.to_string(), "");
    }

    #[test]
    fn test_direction_display() {
        let onions = ingredient("onions", Quantity::Numeric(3.0), Some("medium"));
        assert_eq!(
            onions.to_string(),
            r#"{ type: "ingredient", name: "onions", quantity: 3.000, units: "medium" }"#
        );

        let timer = Direction::Timer {
            name: None,
            quantity: Quantity::Literal("a while".into()),
            unit: None,
        };
        assert_eq!(timer.to_string(), r#"{ type: "timer", quantity: "a while" }"#);

        let text = Direction::Text {
            value: "Chop ".into(),
        };
        assert_eq!(text.to_string(), r#"{ type: "text", value: "Chop " }"#);
    }

    #[test]
    fn test_cookware_has_no_unit() {
        let pan = Direction::Cookware {
            name: "pan".into(),
            quantity: Quantity::Numeric(2.0),
        };
        assert_eq!(pan.unit(), None);
        assert_eq!(pan.name(), Some("pan"));
    }

    #[test]
    fn test_push_step_indexes_first_occurrence() {
        let mut recipe = Recipe::default();
        recipe.push_step(Step {
            directions: vec![
                ingredient("salt", Quantity::None, None),
                ingredient("pepper", Quantity::None, None),
            ],
        });
        recipe.push_step(Step {
            directions: vec![
                ingredient("salt", Quantity::Numeric(1.0), None),
                Direction::Cookware {
                    name: "pot".into(),
                    quantity: Quantity::None,
                },
            ],
        });

        assert_eq!(recipe.ingredients, vec!["salt", "pepper"]);
        assert_eq!(recipe.cookware, vec!["pot"]);
        assert_eq!(recipe.steps[1].ingredients().count(), 1);
        assert_eq!(recipe.directions().count(), 4);
    }

    #[test]
    fn test_serialize_direction() {
        let onions = ingredient("onions", Quantity::Numeric(3.0), Some("medium"));
        let json = serde_json::to_value(&onions).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "ingredient",
                "name": "onions",
                "quantity": 3.0,
                "unit": "medium"
            })
        );

        let pan = Direction::Cookware {
            name: "frying pan".into(),
            quantity: Quantity::None,
        };
        assert_eq!(
            serde_json::to_value(&pan).unwrap(),
            serde_json::json!({ "type": "cookware", "name": "frying pan", "quantity": null })
        );
    }

    #[test]
    fn test_metadata_lookup() {
        let recipe = Recipe {
            metadata: vec![Metadata {
                identifier: "servings".into(),
                content: "4".into(),
            }],
            ..Default::default()
        };
        assert_eq!(recipe.metadata_value("servings"), Some("4"));
        assert_eq!(recipe.metadata_value("source"), None);
    }
}
