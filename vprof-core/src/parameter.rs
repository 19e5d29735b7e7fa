use crate::error::ParseError;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A measured parameter that can be plotted against depth.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Parameter {
    /// Water temperature
    #[default]
    Temp,
    Ph,
    /// Dissolved oxygen saturation (%)
    OdoPercent,
    /// Dissolved oxygen concentration
    OdoConc,
    Turbidity,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::Temp,
        Parameter::Ph,
        Parameter::OdoPercent,
        Parameter::OdoConc,
        Parameter::Turbidity,
    ];

    /// Column header of this parameter in the dataset
    pub fn column(&self) -> &'static str {
        match self {
            Parameter::Temp => "Temp",
            Parameter::Ph => "pH",
            Parameter::OdoPercent => "ODO%",
            Parameter::OdoConc => "ODO Conc",
            Parameter::Turbidity => "Turbidity",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Parameter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Parameter::ALL
            .into_iter()
            .find(|p| p.column().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_lowercase().as_str() {
                "odo-percent" | "odo_percent" | "odo" => Some(Parameter::OdoPercent),
                "odo-conc" | "odo_conc" => Some(Parameter::OdoConc),
                _ => None,
            })
            .ok_or_else(|| ParseError::UnknownParameter(s.to_string()))
    }
}

impl Serialize for Parameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

/// A depth-valued scalar drawn as a horizontal reference line.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum AnnotationKey {
    Thermocline,
    MaxChloro,
    /// Any other derived index stored as a numeric column
    Other(String),
}

impl AnnotationKey {
    pub fn column(&self) -> &str {
        match self {
            AnnotationKey::Thermocline => "Thermocline",
            AnnotationKey::MaxChloro => "Max Chloro",
            AnnotationKey::Other(name) => name,
        }
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for AnnotationKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Ok(match normalized.as_str() {
            "thermocline" => AnnotationKey::Thermocline,
            "maxchloro" => AnnotationKey::MaxChloro,
            _ => AnnotationKey::Other(s.trim().to_string()),
        })
    }
}

impl Serialize for AnnotationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_from_column_name() {
        assert_eq!("ODO%".parse::<Parameter>().unwrap(), Parameter::OdoPercent);
        assert_eq!("odo conc".parse::<Parameter>().unwrap(), Parameter::OdoConc);
        assert_eq!("PH".parse::<Parameter>().unwrap(), Parameter::Ph);
        assert_eq!(
            "Salinity".parse::<Parameter>(),
            Err(ParseError::UnknownParameter("Salinity".to_string()))
        );
    }

    #[test]
    fn test_annotation_keys() {
        assert_eq!("Max Chloro".parse::<AnnotationKey>().unwrap(), AnnotationKey::MaxChloro);
        assert_eq!("max-chloro".parse::<AnnotationKey>().unwrap(), AnnotationKey::MaxChloro);
        assert_eq!(
            "Schmidt Stability".parse::<AnnotationKey>().unwrap(),
            AnnotationKey::Other("Schmidt Stability".to_string())
        );
        assert_eq!(AnnotationKey::MaxChloro.column(), "Max Chloro");
    }
}
