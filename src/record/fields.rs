//! Closed categorical vocabularies for the feature record
//!
//! Each enum mirrors exactly the category set present in the training data.
//! Parsing is strict and total: every canonical training-time string maps to
//! a variant, everything else is rejected. Case/whitespace normalization is
//! the presentation layer's job, not ours.

use serde::{Deserialize, Serialize};

/// Error raised when a raw string is not a member of a closed vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct ParseCategoryError {
    /// Field the value was destined for
    pub field: &'static str,
    /// The rejected value
    pub value: String,
}

impl std::fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} is not a valid {}", self.value, self.field)
    }
}

impl std::error::Error for ParseCategoryError {}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, {
            $($variant:ident => $repr:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $repr)]
                $variant,
            )+
        }

        impl $name {
            /// The canonical training-time string for this category
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $repr,)+
                }
            }

            /// Name of the training-time column this field feeds
            pub const FIELD: &'static str = $field;

            /// All members of the vocabulary, in training-data order
            pub const ALL: &'static [$name] = &[$(Self::$variant,)+];
        }

        impl std::str::FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($repr => Ok(Self::$variant),)+
                    _ => Err(ParseCategoryError {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical!(
    /// Student gender
    Gender, "gender", {
        Male => "male",
        Female => "female",
    }
);

categorical!(
    /// Race/ethnicity group (anonymized in the training data)
    RaceEthnicity, "race_ethnicity", {
        GroupA => "group A",
        GroupB => "group B",
        GroupC => "group C",
        GroupD => "group D",
        GroupE => "group E",
    }
);

categorical!(
    /// Highest education level attained by the student's parents
    ParentalEducation, "parental_level_of_education", {
        SomeHighSchool => "some high school",
        HighSchool => "high school",
        SomeCollege => "some college",
        AssociatesDegree => "associate's degree",
        BachelorsDegree => "bachelor's degree",
        MastersDegree => "master's degree",
    }
);

categorical!(
    /// Lunch type, a socioeconomic proxy in the training data
    Lunch, "lunch", {
        Standard => "standard",
        FreeReduced => "free/reduced",
    }
);

categorical!(
    /// Whether the student completed a test preparation course
    TestPreparation, "test_preparation_course", {
        None => "none",
        Completed => "completed",
    }
);
