//! Time series primitive
//!
//! An owned vector of values with a best-effort parallel vector of date
//! labels. The value count defines the logical length; labels may be shorter
//! and missing labels read back as `None`.

use serde::Serialize;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    values: Vec<f64>,
    dates: Vec<String>,
}

impl TimeSeries {
    /// Series of `len` zeros with unset labels
    pub fn zeros(len: usize) -> Self {
        TimeSeries {
            values: vec![0.0; len],
            dates: vec![String::new(); len],
        }
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        TimeSeries {
            values,
            dates: Vec::new(),
        }
    }

    /// Build a labelled series. Labels beyond the value count are dropped.
    pub fn with_dates(values: Vec<f64>, mut dates: Vec<String>) -> Self {
        dates.truncate(values.len());
        TimeSeries { values, dates }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(EngineError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(EngineError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Date label at `index`, `None` when unset or past the label array
    pub fn date(&self, index: usize) -> Option<&str> {
        self.dates
            .get(index)
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }

    pub fn set_date(&mut self, index: usize, date: impl Into<String>) -> Result<()> {
        if index >= self.values.len() {
            return Err(EngineError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            });
        }
        if self.dates.len() <= index {
            self.dates.resize(index + 1, String::new());
        }
        self.dates[index] = date.into();
        Ok(())
    }

    /// Copy the label at `src_index` of `source` onto `index`, if present
    pub(crate) fn copy_date_from(
        &mut self,
        index: usize,
        source: &TimeSeries,
        src_index: usize,
    ) -> Result<()> {
        match source.date(src_index) {
            Some(d) => self.set_date(index, d),
            None => Ok(()),
        }
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_checked_access() {
        let mut s = TimeSeries::from_values(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.get(2), Ok(3.0));
        assert_eq!(
            s.get(3),
            Err(EngineError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert!(s.set(5, 1.0).is_err());
        s.set(0, 9.0).unwrap();
        assert_eq!(s.first(), Some(9.0));
    }

    #[test]
    fn test_short_label_array_reads_as_unset() {
        let s = TimeSeries::with_dates(
            vec![1.0, 2.0, 3.0],
            vec!["2020-01-01".to_string(), String::new()],
        );
        assert_eq!(s.date(0), Some("2020-01-01"));
        assert_eq!(s.date(1), None);
        assert_eq!(s.date(2), None);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_extra_labels_are_dropped() {
        let s = TimeSeries::with_dates(vec![1.0], vec!["a".to_string(), "b".to_string()]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.date(0), Some("a"));
        assert_eq!(s.date(1), None);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["dates"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_set_date_grows_labels() {
        let mut s = TimeSeries::from_values(vec![1.0, 2.0]);
        s.set_date(1, "2021-06-30").unwrap();
        assert_eq!(s.date(0), None);
        assert_eq!(s.date(1), Some("2021-06-30"));
        assert!(s.set_date(2, "x").is_err());
    }
}
