use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::ingest::{Experiment, GroupKey, natural_sorted, sort_congestion};

use super::selectors::{KeyOrder, PlotSelector};

/// Experiments sharing one value of the grouping attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentGroup<'a> {
    pub value: String,
    pub experiments: Vec<&'a Experiment>,
}

impl ExperimentGroup<'_> {
    /// Mean of `value` over the experiments that have one, 0 when none do.
    pub fn mean<F>(&self, value: F) -> f64
    where
        F: Fn(&Experiment) -> Option<f64>,
    {
        let (sum, count) = self
            .experiments
            .iter()
            .copied()
            .filter_map(value)
            .fold((0.0, 0_u32), |(sum, count), value| (sum + value, count + 1));
        if count == 0 {
            0.0
        } else {
            sum / f64::from(count)
        }
    }
}

/// Experiments of one plot, grouped and ordered along the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedExperiments<'a> {
    /// Selector after `1-7` is resolved.
    pub selector: PlotSelector,
    pub key: GroupKey,
    pub axis_title: &'static str,
    pub groups: Vec<ExperimentGroup<'a>>,
}

impl<'a> GroupedExperiments<'a> {
    /// Groups `experiments` by the attribute `selector` plots.
    ///
    /// # Errors
    ///
    /// Returns an error when `selector` is `1-7` and neither policing nor
    /// shaping varies.
    pub fn new(experiments: &'a [Experiment], selector: PlotSelector) -> Result<Self, ValidationError> {
        let selector = selector.resolve(experiments)?;
        let Some((key, axis_title)) = selector.grouping() else {
            return Err(ValidationError::AmbiguousQosSelector);
        };

        let mut by_value: BTreeMap<&str, Vec<&'a Experiment>> = BTreeMap::new();
        for experiment in experiments {
            by_value
                .entry(experiment.attributes.get(key))
                .or_default()
                .push(experiment);
        }

        let mut values = natural_sorted(&by_value.keys().copied().collect::<Vec<&str>>());
        match selector.key_order() {
            KeyOrder::Natural => {}
            KeyOrder::ReversedNatural => values.reverse(),
            KeyOrder::Congestion => sort_congestion(&mut values),
        }

        let groups = values
            .into_iter()
            .filter_map(|value| {
                let members = by_value.remove(value)?;
                Some(ExperimentGroup {
                    value: value.to_owned(),
                    experiments: members,
                })
            })
            .collect();
        Ok(Self {
            selector,
            key,
            axis_title,
            groups,
        })
    }

    pub fn experiments(&self) -> impl Iterator<Item = &'a Experiment> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.experiments.iter().copied())
    }

    /// Number of class 1 and class 2 paths, taken from the first plotted
    /// experiment.
    #[must_use]
    pub fn path_counts(&self) -> (usize, usize) {
        self.experiments().next().map_or((0, 0), |experiment| {
            (
                experiment.class1_per_path.len(),
                experiment.class2_per_path.len(),
            )
        })
    }
}
