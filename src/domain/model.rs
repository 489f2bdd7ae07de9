use crate::utils::error::{CoffeeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest farm elevation (metres) the form accepts.
pub const MIN_ALTITUDE: u32 = 600;

pub const EXCELLENT_MESSAGE: &str = "Wow, you've got some EXCELLENT specialty coffee right there!☕🎉";
pub const VERY_GOOD_MESSAGE: &str = "That's some VERY GOOD specialty coffee right there!☕";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Altitude(u32);

impl Altitude {
    pub fn new(metres: u32) -> Result<Self> {
        if metres < MIN_ALTITUDE {
            return Err(CoffeeError::validation(
                "altitude",
                format!("must be at least {} (got {})", MIN_ALTITUDE, metres),
            ));
        }
        Ok(Self(metres))
    }

    pub fn metres(self) -> u32 {
        self.0
    }
}

impl Default for Altitude {
    fn default() -> Self {
        Self(MIN_ALTITUDE)
    }
}

impl TryFrom<u32> for Altitude {
    type Error = CoffeeError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Altitude> for u32 {
    fn from(value: Altitude) -> Self {
        value.0
    }
}

impl FromStr for Altitude {
    type Err = CoffeeError;

    fn from_str(s: &str) -> Result<Self> {
        let metres = s
            .trim()
            .parse::<u32>()
            .map_err(|_| CoffeeError::validation("altitude", format!("'{}' is not a whole number", s.trim())))?;
        Self::new(metres)
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declares a closed set of categories whose wire form is the display label
/// the classifier was trained on.
macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const FIELD: &'static str = $field;
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoffeeError;

            fn from_str(s: &str) -> Result<Self> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str() == s)
                    .ok_or_else(|| CoffeeError::validation($field, format!("'{}' is not one of the listed options", s)))
            }
        }
    };
}

categorical!(
    /// Geographic origin of the beans.
    Region, "region" {
        NorthAmerica => "North America",
        CentralAmerica => "Central America",
        SouthAmerica => "South America",
        Brazil => "Brazil",
        Africa => "Africa",
        AsiaPacific => "Asia Pacific",
    }
);

categorical!(
    Processing, "processing" {
        Washed => "Washed / Wet",
        Natural => "Natural / Dry",
        Honey => "Semi-Washed / Honey",
        Other => "Other",
    }
);

categorical!(
    /// Genetic lineage of the arabica plant.
    Variety, "variety" {
        Ethiopian => "Ethiopian Varieties",
        Typica => "Typica",
        BourbonRelated => "Bourbon-Related (e.g., Bourbon, Caturra, SL28)",
        BourbonTypica => "Bourbon/Typica",
        Catimor => "Catimor",
        Others => "Others",
    }
);

/// One coffee sample as entered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoffeeQuery {
    pub altitude: Altitude,
    pub region: Region,
    pub processing: Processing,
    pub variety: Variety,
}

impl CoffeeQuery {
    pub fn new(altitude: Altitude, region: Region, processing: Processing, variety: Variety) -> Self {
        Self {
            altitude,
            region,
            processing,
            variety,
        }
    }

    /// Parses raw widget values, reporting the first field that fails.
    pub fn parse(altitude: &str, region: &str, processing: &str, variety: &str) -> Result<Self> {
        Ok(Self {
            altitude: altitude.parse()?,
            region: region.parse()?,
            processing: processing.parse()?,
            variety: variety.parse()?,
        })
    }

    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord::new(*self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Numeric(f64),
    Category(&'a str),
}

/// Single-row record handed to a classifier. Columns are addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRecord {
    query: CoffeeQuery,
}

impl FeatureRecord {
    pub const COLUMNS: [&'static str; 4] = ["altitude", Region::FIELD, Processing::FIELD, Variety::FIELD];

    pub fn new(query: CoffeeQuery) -> Self {
        Self { query }
    }

    pub fn get(&self, column: &str) -> Option<FeatureValue<'static>> {
        match column {
            "altitude" => Some(FeatureValue::Numeric(f64::from(self.query.altitude.metres()))),
            Region::FIELD => Some(FeatureValue::Category(self.query.region.as_str())),
            Processing::FIELD => Some(FeatureValue::Category(self.query.processing.as_str())),
            Variety::FIELD => Some(FeatureValue::Category(self.query.variety.as_str())),
            _ => None,
        }
    }

    /// Columns in record order: altitude, region, processing, variety.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, FeatureValue<'static>)> + '_ {
        Self::COLUMNS
            .into_iter()
            .filter_map(move |name| self.get(name).map(|value| (name, value)))
    }

    pub fn query(&self) -> &CoffeeQuery {
        &self.query
    }
}

/// Raw class emitted by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub i64);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Cupping score 80 to 84.99.
    VeryGood,
    /// Cupping score of 85 or more.
    Excellent,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::VeryGood => VERY_GOOD_MESSAGE,
            Verdict::Excellent => EXCELLENT_MESSAGE,
        }
    }

    pub fn label(self) -> Label {
        match self {
            Verdict::VeryGood => Label(0),
            Verdict::Excellent => Label(1),
        }
    }
}

impl TryFrom<Label> for Verdict {
    type Error = CoffeeError;

    fn try_from(label: Label) -> Result<Self> {
        match label.0 {
            0 => Ok(Verdict::VeryGood),
            1 => Ok(Verdict::Excellent),
            other => Err(CoffeeError::UnexpectedLabelError { label: other }),
        }
    }
}
