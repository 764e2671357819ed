use serde::{Deserialize, Serialize};

/// Editable profile fields shared by registration and profile updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, alias = "activityLevel")]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
}

/// Partial profile update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub fields: ProfileFields,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        let f = &self.fields;
        self.email.is_none()
            && f.name.is_none()
            && f.gender.is_none()
            && f.age.is_none()
            && f.weight.is_none()
            && f.height.is_none()
            && f.activity_level.is_none()
            && f.goal.is_none()
    }
}

/// Body of the stateless target preview.
#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub gender: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    #[serde(alias = "activityLevel")]
    pub activity_level: String,
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct TargetResponse {
    pub calories: i32,
}
