//! Catalogue of engine models.

use serde::{Deserialize, Serialize};

/// Model used for new sessions when none is requested.
pub const DEFAULT_MODEL_ID: &str = "talkative-01";

/// Models reported by [`CreditsApi::models`](crate::api::CreditsApi::models), in display order.
pub const DEFAULT_MODEL_IDS: &[&str] = &[
    "thoughtful-01",
    "talkative-01",
    "creative-01",
    "gemini-pro",
    "next-gen",
    "ml-recommender-01",
];

/// Display name for models the catalogue does not know.
pub const UNKNOWN_MODEL_NAME: &str = "Unknown Model";

const KNOWN_MODELS: &[(&str, &str)] = &[
    ("thoughtful-01", "Thoughtful"),
    ("talkative-01", "Talkative"),
    ("talkative-02", "Talkative 2"),
    ("talkative-03", "Talkative 3"),
    ("creative-01", "Creative"),
    ("creative-02", "Creative 2"),
    ("creative-03", "Creative 3"),
    ("creative-04", "Creative 4"),
    ("gemini-pro", "Gemini Pro"),
    ("next-gen", "Next Generation"),
    ("ml-recommender-01", "ML Recommender"),
];

/// A model outside the built-in catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomModel {
    /// Model id understood by the service.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Anything that identifies a model: a catalogue id or a [`CustomModel`].
pub trait ModelRef {
    /// Id sent to the service.
    fn model_id(&self) -> &str;

    /// Human readable name.
    fn model_name(&self) -> &str;
}

impl ModelRef for str {
    fn model_id(&self) -> &str {
        self
    }

    fn model_name(&self) -> &str {
        model_name(self)
    }
}

impl ModelRef for String {
    fn model_id(&self) -> &str {
        self
    }

    fn model_name(&self) -> &str {
        model_name(self)
    }
}

impl ModelRef for CustomModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

/// Look up the display name of a catalogue model.
pub fn model_name(id: &str) -> &'static str {
    KNOWN_MODELS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_MODEL_NAME)
}

/// Whether the id belongs to the built-in catalogue.
pub fn is_known_model(id: &str) -> bool {
    KNOWN_MODELS.iter().any(|(known, _)| *known == id)
}
