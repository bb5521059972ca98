//! Parameter grid: ordered candidate lists per parameter name.
//!
//! Iteration is odometer order over the declared dimensions, first
//! dimension outermost. That order is the tie-break order for the
//! optimizer, so it is part of the grid's contract.

use crate::domain::error::GridError;
use crate::domain::params::{ParamName, ParameterSet};

/// Parameters that must appear together.
const GROUPS: [(&str, &[ParamName]); 3] = [
    ("macd", &[ParamName::MacdFast, ParamName::MacdSlow]),
    (
        "rsi",
        &[
            ParamName::RsiPeriod,
            ParamName::RsiBuyThresh,
            ParamName::RsiSellThresh,
        ],
    ),
    ("adx", &[ParamName::AdxPeriod, ParamName::AdxThresh]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    dimensions: Vec<(ParamName, Vec<f64>)>,
    confirm_reversal: bool,
}

impl ParameterGrid {
    /// Reversal confirmation defaults to on.
    pub fn new(dimensions: Vec<(ParamName, Vec<f64>)>) -> Result<Self, GridError> {
        for (i, (name, values)) in dimensions.iter().enumerate() {
            if values.is_empty() {
                return Err(GridError::EmptyDimension(name.to_string()));
            }
            if dimensions[..i].iter().any(|(n, _)| n == name) {
                return Err(GridError::DuplicateDimension(name.to_string()));
            }
        }

        let declared = |name: ParamName| dimensions.iter().any(|(n, _)| *n == name);

        for required in [ParamName::EmaShort, ParamName::EmaLong] {
            if !declared(required) {
                return Err(GridError::MissingDimension(required.to_string()));
            }
        }

        for (group, members) in GROUPS {
            let present = members.iter().filter(|&&m| declared(m)).count();
            if present > 0 && present < members.len() {
                let missing = members
                    .iter()
                    .find(|&&m| !declared(m))
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                return Err(GridError::IncompleteGroup {
                    group: group.to_string(),
                    missing,
                });
            }
        }

        Ok(Self {
            dimensions,
            confirm_reversal: true,
        })
    }

    pub fn with_reversal_confirmation(mut self, confirm: bool) -> Self {
        self.confirm_reversal = confirm;
        self
    }

    pub fn confirm_reversal(&self) -> bool {
        self.confirm_reversal
    }

    pub fn dimensions(&self) -> &[(ParamName, Vec<f64>)] {
        &self.dimensions
    }

    /// Raw Cartesian size, before invariant filtering.
    pub fn len(&self) -> usize {
        self.dimensions.iter().map(|(_, v)| v.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every raw assignment in declared order, valid or not.
    pub fn assignments(&self) -> Assignments<'_> {
        Assignments {
            grid: self,
            cursor: Some(vec![0; self.dimensions.len()]),
        }
    }

    /// Valid parameter sets in declared order.
    pub fn combinations(&self) -> impl Iterator<Item = ParameterSet> + '_ {
        self.assignments()
            .filter_map(|values| ParameterSet::from_assignment(&values, self.confirm_reversal))
    }
}

/// Odometer over the grid's dimensions; the last dimension turns fastest.
pub struct Assignments<'a> {
    grid: &'a ParameterGrid,
    cursor: Option<Vec<usize>>,
}

impl Iterator for Assignments<'_> {
    type Item = Vec<(ParamName, f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        let dims = &self.grid.dimensions;

        let item = dims
            .iter()
            .zip(cursor.iter())
            .map(|((name, values), &i)| (*name, values[i]))
            .collect();

        let mut exhausted = true;
        for d in (0..dims.len()).rev() {
            cursor[d] += 1;
            if cursor[d] < dims[d].1.len() {
                exhausted = false;
                break;
            }
            cursor[d] = 0;
        }
        if exhausted {
            self.cursor = None;
        }

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ema_grid(short: &[f64], long: &[f64]) -> ParameterGrid {
        ParameterGrid::new(vec![
            (ParamName::EmaShort, short.to_vec()),
            (ParamName::EmaLong, long.to_vec()),
        ])
        .unwrap()
        .with_reversal_confirmation(false)
    }

    #[test]
    fn len_is_cartesian_product() {
        let grid = ema_grid(&[5.0, 10.0, 15.0], &[20.0, 30.0, 50.0]);
        assert_eq!(grid.len(), 9);
        assert_eq!(grid.assignments().count(), 9);
    }

    #[test]
    fn first_dimension_is_outermost() {
        let grid = ema_grid(&[1.0, 2.0], &[10.0, 20.0]);
        let order: Vec<(f64, f64)> = grid
            .assignments()
            .map(|a| (a[0].1, a[1].1))
            .collect();
        assert_eq!(
            order,
            vec![(1.0, 10.0), (1.0, 20.0), (2.0, 10.0), (2.0, 20.0)]
        );
    }

    #[test]
    fn declared_order_is_respected() {
        let grid = ParameterGrid::new(vec![
            (ParamName::EmaLong, vec![10.0, 20.0]),
            (ParamName::EmaShort, vec![1.0, 2.0]),
        ])
        .unwrap();
        let order: Vec<(usize, usize)> = grid
            .combinations()
            .map(|p| (p.ema_short, p.ema_long))
            .collect();
        assert_eq!(order, vec![(1, 10), (2, 10), (1, 20), (2, 20)]);
    }

    #[test]
    fn combinations_filter_invariants() {
        let grid = ema_grid(&[5.0, 10.0, 20.0], &[10.0, 20.0]);
        let pairs: Vec<(usize, usize)> = grid
            .combinations()
            .map(|p| (p.ema_short, p.ema_long))
            .collect();
        assert_eq!(pairs, vec![(5, 10), (5, 20), (10, 20)]);
    }

    #[test]
    fn combinations_carry_reversal_setting() {
        let grid = ema_grid(&[5.0], &[10.0]).with_reversal_confirmation(true);
        assert!(grid.combinations().all(|p| p.confirm_reversal));
    }

    #[test]
    fn empty_dimension_rejected() {
        let err = ParameterGrid::new(vec![
            (ParamName::EmaShort, vec![]),
            (ParamName::EmaLong, vec![10.0]),
        ])
        .unwrap_err();
        assert_eq!(err, GridError::EmptyDimension("ema_short".into()));
    }

    #[test]
    fn duplicate_dimension_rejected() {
        let err = ParameterGrid::new(vec![
            (ParamName::EmaShort, vec![1.0]),
            (ParamName::EmaLong, vec![10.0]),
            (ParamName::EmaShort, vec![2.0]),
        ])
        .unwrap_err();
        assert_eq!(err, GridError::DuplicateDimension("ema_short".into()));
    }

    #[test]
    fn missing_ema_rejected() {
        let err = ParameterGrid::new(vec![(ParamName::EmaShort, vec![1.0])]).unwrap_err();
        assert_eq!(err, GridError::MissingDimension("ema_long".into()));
    }

    #[test]
    fn partial_group_rejected() {
        let err = ParameterGrid::new(vec![
            (ParamName::EmaShort, vec![1.0]),
            (ParamName::EmaLong, vec![10.0]),
            (ParamName::RsiPeriod, vec![14.0]),
            (ParamName::RsiBuyThresh, vec![30.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            GridError::IncompleteGroup {
                group: "rsi".into(),
                missing: "rsi_sell_thresh".into()
            }
        );
    }

    #[test]
    fn full_grid_builds_complete_sets() {
        let grid = ParameterGrid::new(vec![
            (ParamName::EmaShort, vec![5.0]),
            (ParamName::EmaLong, vec![20.0]),
            (ParamName::MacdFast, vec![12.0]),
            (ParamName::MacdSlow, vec![26.0]),
            (ParamName::RsiPeriod, vec![14.0]),
            (ParamName::RsiBuyThresh, vec![30.0, 80.0]),
            (ParamName::RsiSellThresh, vec![70.0]),
            (ParamName::BbPeriod, vec![20.0]),
            (ParamName::AdxPeriod, vec![14.0]),
            (ParamName::AdxThresh, vec![25.0]),
        ])
        .unwrap();
        let sets: Vec<ParameterSet> = grid.combinations().collect();
        // rsi_buy_thresh 80 >= rsi_sell_thresh 70 is filtered
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].window_size(), 26);
        assert!(sets[0].confirm_reversal);
    }
}
