use crate::sample::Sample;

/// Names of the numeric measure columns, in source order.
///
/// Parameters (Temp, pH, ...) and annotation scalars (Thermocline, Max
/// Chloro, ...) are both measure columns; the loader does not distinguish
/// them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    measures: Vec<String>,
}

impl Schema {
    pub fn new(measures: Vec<String>) -> Self {
        Self { measures }
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    /// Index of a measure column within [`Sample::measures`]
    pub fn measure_index(&self, column: &str) -> Option<usize> {
        self.measures.iter().position(|m| m == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.measure_index(column).is_some()
    }
}

/// The sanitised profile table. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    schema: Schema,
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(schema: Schema, samples: Vec<Sample>) -> Self {
        Self { schema, samples }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// All samples in source row order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples of one station, in source row order.
    pub fn station_samples(&self, station_id: &str) -> Vec<&Sample> {
        self.samples
            .iter()
            .filter(|s| s.station_id == station_id)
            .collect()
    }
}
