//! Daily calorie target from body metrics (Mifflin-St Jeor).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PlannerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Light,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    fn bmr_offset(self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Low => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
        }
    }
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            Goal::Lose => 0.85,
            Goal::Maintain => 1.0,
            Goal::Gain => 1.15,
        }
    }
}

impl FromStr for Gender {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(PlannerError::invalid("gender", s)),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ActivityLevel::Low),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "high" => Ok(ActivityLevel::High),
            _ => Err(PlannerError::invalid("activity level", s)),
        }
    }
}

impl FromStr for Goal {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            _ => Err(PlannerError::invalid("goal", s)),
        }
    }
}

/// Validated physiological profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub gender: Gender,
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

impl Profile {
    /// Builds a profile from raw request/storage values.
    pub fn parse(
        gender: &str,
        age: i32,
        weight_kg: f64,
        height_cm: f64,
        activity: &str,
        goal: &str,
    ) -> Result<Self, PlannerError> {
        let profile = Self {
            gender: gender.parse()?,
            age,
            weight_kg,
            height_cm,
            activity: activity.parse()?,
            goal: goal.parse()?,
        };
        profile.check_metrics()?;
        Ok(profile)
    }

    fn check_metrics(&self) -> Result<(), PlannerError> {
        if self.age <= 0 {
            return Err(PlannerError::invalid("age", self.age));
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(PlannerError::invalid("weight", self.weight_kg));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(PlannerError::invalid("height", self.height_cm));
        }
        Ok(())
    }

    pub fn bmr(&self) -> f64 {
        10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * f64::from(self.age)
            + self.gender.bmr_offset()
    }
}

/// Daily calorie target in kcal, rounded to the nearest integer.
///
/// Metrics that are individually positive can still drive the BMR below zero;
/// such profiles are rejected rather than given a non-positive target.
pub fn compute_target(profile: &Profile) -> Result<i32, PlannerError> {
    profile.check_metrics()?;
    let kcal = (profile.bmr() * profile.activity.multiplier() * profile.goal.factor()).round();
    if kcal < 1.0 {
        return Err(PlannerError::invalid("target", kcal));
    }
    Ok(kcal as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(goal: &str) -> Profile {
        Profile::parse("male", 30, 80.0, 180.0, "moderate", goal).expect("valid profile")
    }

    #[test]
    fn reference_profile_maintain() {
        let p = reference("maintain");
        assert_eq!(p.bmr(), 1780.0);
        assert_eq!(compute_target(&p).unwrap(), 2759);
    }

    #[test]
    fn reference_profile_lose_and_gain() {
        assert_eq!(compute_target(&reference("lose")).unwrap(), 2345);
        assert_eq!(compute_target(&reference("gain")).unwrap(), 3173);
    }

    #[test]
    fn female_bmr_is_166_below_male() {
        for (age, w, h) in [(25, 60.0, 165.0), (41, 92.5, 188.0), (70, 55.0, 150.0)] {
            let male = Profile::parse("male", age, w, h, "low", "maintain").unwrap();
            let female = Profile {
                gender: Gender::Female,
                ..male
            };
            assert_eq!(male.bmr() - female.bmr(), 166.0);
            let a = compute_target(&male).unwrap();
            let b = compute_target(&female).unwrap();
            assert!(((a - b) as f64 - 166.0 * 1.2).abs() <= 1.0);
        }
    }

    #[test]
    fn valid_profiles_give_positive_targets() {
        for gender in ["male", "female"] {
            for activity in ["low", "light", "moderate", "high"] {
                for goal in ["lose", "maintain", "gain"] {
                    let p = Profile::parse(gender, 35, 70.0, 170.0, activity, goal).unwrap();
                    assert!(compute_target(&p).unwrap() > 0);
                }
            }
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(" Female ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("HIGH".parse::<ActivityLevel>().unwrap(), ActivityLevel::High);
        assert_eq!("Gain".parse::<Goal>().unwrap(), Goal::Gain);
    }

    #[test]
    fn unknown_values_are_invalid_input() {
        let err = Profile::parse("other", 30, 80.0, 180.0, "moderate", "maintain").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput { field: "gender", .. }));

        let err = Profile::parse("male", 30, 80.0, 180.0, "extreme", "maintain").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput { field: "activity level", .. }));

        let err = Profile::parse("male", 30, 80.0, 180.0, "moderate", "bulk").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput { field: "goal", .. }));
    }

    #[test]
    fn non_positive_metrics_are_invalid_input() {
        assert!(Profile::parse("male", 0, 80.0, 180.0, "low", "lose").is_err());
        assert!(Profile::parse("male", 30, -1.0, 180.0, "low", "lose").is_err());
        assert!(Profile::parse("male", 30, 80.0, 0.0, "low", "lose").is_err());
    }

    #[test]
    fn body_metrics_yielding_negative_bmr_are_rejected() {
        // 200 + 312.5 - 750 - 161 = -398.5 kcal BMR
        let p = Profile::parse("female", 150, 20.0, 50.0, "low", "lose").unwrap();
        assert!(p.bmr() < 0.0);
        let err = compute_target(&p).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput { field: "target", .. }));
    }
}
