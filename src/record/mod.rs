//! Feature record: the data model for a single prediction request

mod fields;

pub use fields::{
    Gender, Lunch, ParentalEducation, ParseCategoryError, RaceEthnicity, TestPreparation,
};

use serde::{Deserialize, Serialize};

use crate::error::{FieldViolation, Result, StudentPerfError};

/// Lower and upper bound for reading/writing scores
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// One prediction request's inputs.
///
/// Immutable once constructed; has no identity beyond its field values.
/// Categorical fields are closed vocabularies (see [`fields`]); numeric
/// scores must be finite and within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub gender: Gender,
    pub race_ethnicity: RaceEthnicity,
    pub parental_level_of_education: ParentalEducation,
    pub lunch: Lunch,
    pub test_preparation_course: TestPreparation,
    pub reading_score: f64,
    pub writing_score: f64,
}

fn check_score(field: &str, value: f64, violations: &mut Vec<FieldViolation>) {
    if !value.is_finite() {
        violations.push(FieldViolation::new(
            field,
            value.to_string(),
            "must be a finite number",
        ));
    } else if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        violations.push(FieldViolation::new(
            field,
            value.to_string(),
            format!("must be within [{}, {}]", SCORE_MIN, SCORE_MAX),
        ));
    }
}

impl FeatureRecord {
    /// Construct from already-typed fields. The result still needs
    /// [`validate`](Self::validate) before use: typed categoricals cannot be
    /// invalid, but scores can.
    pub fn new(
        gender: Gender,
        race_ethnicity: RaceEthnicity,
        parental_level_of_education: ParentalEducation,
        lunch: Lunch,
        test_preparation_course: TestPreparation,
        reading_score: f64,
        writing_score: f64,
    ) -> Self {
        Self {
            gender,
            race_ethnicity,
            parental_level_of_education,
            lunch,
            test_preparation_course,
            reading_score,
            writing_score,
        }
    }

    /// Construct from raw string/number inputs as the presentation layer
    /// hands them over. Collects every violation into one error rather than
    /// stopping at the first, so the caller can surface all problems at once.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        gender: &str,
        race_ethnicity: &str,
        parental_level_of_education: &str,
        lunch: &str,
        test_preparation_course: &str,
        reading_score: f64,
        writing_score: f64,
    ) -> Result<Self> {
        let mut violations = Vec::new();

        let gender = gender.parse::<Gender>();
        let race = race_ethnicity.parse::<RaceEthnicity>();
        let education = parental_level_of_education.parse::<ParentalEducation>();
        let lunch = lunch.parse::<Lunch>();
        let prep = test_preparation_course.parse::<TestPreparation>();

        for err in [
            gender.as_ref().err(),
            race.as_ref().err(),
            education.as_ref().err(),
            lunch.as_ref().err(),
            prep.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        {
            violations.push(FieldViolation::new(
                err.field,
                err.value.clone(),
                "not a member of the known category set",
            ));
        }

        check_score("reading_score", reading_score, &mut violations);
        check_score("writing_score", writing_score, &mut violations);

        if !violations.is_empty() {
            return Err(StudentPerfError::validation(violations));
        }

        // All parses succeeded if we got here
        Ok(Self {
            gender: gender.unwrap(),
            race_ethnicity: race.unwrap(),
            parental_level_of_education: education.unwrap(),
            lunch: lunch.unwrap(),
            test_preparation_course: prep.unwrap(),
            reading_score,
            writing_score,
        })
    }

    /// Check the numeric invariants. Reports every violated field.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();
        check_score("reading_score", self.reading_score, &mut violations);
        check_score("writing_score", self.writing_score, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(StudentPerfError::validation(violations))
        }
    }

    /// Look up a categorical field by its training-time column name
    pub fn categorical_value(&self, column: &str) -> Option<&'static str> {
        match column {
            Gender::FIELD => Some(self.gender.as_str()),
            RaceEthnicity::FIELD => Some(self.race_ethnicity.as_str()),
            ParentalEducation::FIELD => Some(self.parental_level_of_education.as_str()),
            Lunch::FIELD => Some(self.lunch.as_str()),
            TestPreparation::FIELD => Some(self.test_preparation_course.as_str()),
            _ => None,
        }
    }

    /// Look up a numeric field by its training-time column name
    pub fn numeric_value(&self, column: &str) -> Option<f64> {
        match column {
            "reading_score" => Some(self.reading_score),
            "writing_score" => Some(self.writing_score),
            _ => None,
        }
    }
}
