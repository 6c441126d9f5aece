use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{HAZARD_CLASSES, IMPORTANT_CLASSES};

/// How the pipeline treats one detection class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassTraits {
    /// Worth announcing at all.
    pub important: bool,
    /// Raises the proximity alarm inside the critical distance.
    pub hazard: bool,
}

/// One configurable row of the class table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRule {
    pub name: String,
    #[serde(default = "default_true")]
    pub important: bool,
    #[serde(default)]
    pub hazard: bool,
}

fn default_true() -> bool {
    true
}

/// Declarative mapping from class label to [`ClassTraits`].
///
/// Labels are matched exactly. Unknown labels are neither important nor
/// hazardous. A hazard class is always important: the alarm can only fire
/// for objects that survive filtering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassTable {
    entries: HashMap<String, ClassTraits>,
}

impl ClassTable {
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a ClassRule>) -> Self {
        let mut entries = HashMap::new();
        for rule in rules {
            entries.insert(
                rule.name.clone(),
                ClassTraits {
                    important: rule.important || rule.hazard,
                    hazard: rule.hazard,
                },
            );
        }
        Self { entries }
    }

    /// Mobility-oriented defaults: everyday obstacles and landmarks are
    /// announced, people and wheeled traffic also alarm.
    pub fn mobility_defaults() -> Self {
        Self::from_rules(&default_rules())
    }

    pub fn traits(&self, class_name: &str) -> ClassTraits {
        self.entries.get(class_name).copied().unwrap_or_default()
    }

    pub fn is_important(&self, class_name: &str) -> bool {
        self.traits(class_name).important
    }

    pub fn is_hazard(&self, class_name: &str) -> bool {
        self.traits(class_name).hazard
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rules behind [`ClassTable::mobility_defaults`], also used as the config default.
pub fn default_rules() -> Vec<ClassRule> {
    IMPORTANT_CLASSES
        .iter()
        .map(|name| ClassRule {
            name: name.to_string(),
            important: true,
            hazard: HAZARD_CLASSES.contains(name),
        })
        .collect()
}
