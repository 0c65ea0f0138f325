use std::fmt;

use itertools::Itertools;

/// A named, ordered sequence of discrete values for one sweep dimension.
///
/// Axes are immutable once built; a sweep is defined by its axes and never
/// mutates them while running.
#[derive(Debug, Clone)]
pub struct Axis<T> {
    name: &'static str,
    values: Vec<T>,
}

impl<T: Copy> Axis<T> {
    pub fn new(name: &'static str, values: impl Into<Vec<T>>) -> Self {
        Self {
            name,
            values: values.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One concrete parameter combination to simulate.
///
/// Jobs are plain values; equality and ordering follow the field order
/// below, which is also the nesting order of the sweep loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Job {
    pub data_rate_mbps: u32,
    pub gbr_dl_bps: u64,
    pub cg_ue_count: u32,
    pub vr_ue_count: u32,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Mbps/{}bps GBR/{}CG/{}VR",
            self.data_rate_mbps, self.gbr_dl_bps, self.cg_ue_count, self.vr_ue_count
        )
    }
}

/// One of the two scheduler configurations run for every [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerVariant {
    Dpp,
    Qos,
}

impl SchedulerVariant {
    /// Execution order within a job: DPP always runs before QoS.
    pub const ALL: [SchedulerVariant; 2] = [SchedulerVariant::Dpp, SchedulerVariant::Qos];

    /// The value passed to the simulator's `schedulerType` flag.
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            SchedulerVariant::Dpp => "DPP",
            SchedulerVariant::Qos => "QoS",
        }
    }
}

impl fmt::Display for SchedulerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag_value())
    }
}

/// The four axes of a data-rate/GFBR sweep.
///
/// [`SweepGrid::jobs`] enumerates the full Cartesian product with the first
/// axis varying slowest and the last varying fastest. Downstream logging and
/// progress reporting rely on that order, so it is part of the contract.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    data_rates_mbps: Axis<u32>,
    gbr_dl_bps: Axis<u64>,
    cg_ue_counts: Axis<u32>,
    vr_ue_counts: Axis<u32>,
}

impl SweepGrid {
    pub fn new(
        data_rates_mbps: Axis<u32>,
        gbr_dl_bps: Axis<u64>,
        cg_ue_counts: Axis<u32>,
        vr_ue_counts: Axis<u32>,
    ) -> Self {
        Self {
            data_rates_mbps,
            gbr_dl_bps,
            cg_ue_counts,
            vr_ue_counts,
        }
    }

    /// Number of jobs the grid enumerates to.
    pub fn len(&self) -> usize {
        self.data_rates_mbps.len()
            * self.gbr_dl_bps.len()
            * self.cg_ue_counts.len()
            * self.vr_ue_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn jobs(&self) -> Vec<Job> {
        let lengths = [
            self.data_rates_mbps.len(),
            self.gbr_dl_bps.len(),
            self.cg_ue_counts.len(),
            self.vr_ue_counts.len(),
        ];
        cartesian_indices(&lengths)
            .map(|ix| Job {
                data_rate_mbps: self.data_rates_mbps.values()[ix[0]],
                gbr_dl_bps: self.gbr_dl_bps.values()[ix[1]],
                cg_ue_count: self.cg_ue_counts.values()[ix[2]],
                vr_ue_count: self.vr_ue_counts.values()[ix[3]],
            })
            .collect()
    }
}

/// Enumerate the index space of any number of axes in nested-loop order:
/// the first axis is the outer loop, the last axis the inner loop.
pub(crate) fn cartesian_indices(lengths: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    lengths.iter().map(|&n| 0..n).multi_cartesian_product()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn small_grid() -> SweepGrid {
        SweepGrid::new(
            Axis::new("Datarate", [1, 5]),
            Axis::new("CGgbrDL", [1_000_000]),
            Axis::new("cgUeNum", [1]),
            Axis::new("vrUeNum", [0]),
        )
    }

    #[test]
    fn grid_size_is_product_of_axis_lengths() {
        let grid = SweepGrid::new(
            Axis::new("Datarate", [1, 5, 10]),
            Axis::new("CGgbrDL", [1_000_000, 5_000_000]),
            Axis::new("cgUeNum", [1, 2, 3, 4]),
            Axis::new("vrUeNum", [0, 1, 2, 3, 4]),
        );
        assert_eq!(grid.len(), 3 * 2 * 4 * 5);
        assert_eq!(grid.jobs().len(), grid.len());
    }

    #[test]
    fn jobs_are_unique() {
        let grid = SweepGrid::new(
            Axis::new("Datarate", [1, 5, 10]),
            Axis::new("CGgbrDL", [1_000_000, 5_000_000]),
            Axis::new("cgUeNum", [1, 2]),
            Axis::new("vrUeNum", [0, 1]),
        );
        let jobs = grid.jobs();
        let unique: HashSet<_> = jobs.iter().copied().collect();
        assert_eq!(unique.len(), jobs.len());
    }

    #[test]
    fn last_axis_varies_fastest() {
        let grid = SweepGrid::new(
            Axis::new("Datarate", [1, 5]),
            Axis::new("CGgbrDL", [1_000_000]),
            Axis::new("cgUeNum", [1]),
            Axis::new("vrUeNum", [0, 4]),
        );
        let jobs = grid.jobs();
        assert_eq!(jobs[0].data_rate_mbps, 1);
        assert_eq!(jobs[0].vr_ue_count, 0);
        assert_eq!(jobs[1].data_rate_mbps, 1);
        assert_eq!(jobs[1].vr_ue_count, 4);
        assert_eq!(jobs[2].data_rate_mbps, 5);
        assert_eq!(jobs[2].vr_ue_count, 0);
    }

    #[test]
    fn two_axis_reference_example() {
        let jobs = small_grid().jobs();
        assert_eq!(
            jobs,
            vec![
                Job {
                    data_rate_mbps: 1,
                    gbr_dl_bps: 1_000_000,
                    cg_ue_count: 1,
                    vr_ue_count: 0,
                },
                Job {
                    data_rate_mbps: 5,
                    gbr_dl_bps: 1_000_000,
                    cg_ue_count: 1,
                    vr_ue_count: 0,
                },
            ]
        );
    }

    #[test]
    fn cartesian_indices_supports_arbitrary_axis_counts() {
        let ix: Vec<_> = cartesian_indices(&[2, 1, 3]).collect();
        assert_eq!(ix.len(), 6);
        assert_eq!(ix[0], vec![0, 0, 0]);
        assert_eq!(ix[1], vec![0, 0, 1]);
        assert_eq!(ix[2], vec![0, 0, 2]);
        assert_eq!(ix[3], vec![1, 0, 0]);
        assert_eq!(ix[5], vec![1, 0, 2]);
    }

    #[test]
    fn job_ordering_follows_field_order() {
        let a = Job {
            data_rate_mbps: 1,
            gbr_dl_bps: 40_000_000,
            cg_ue_count: 4,
            vr_ue_count: 4,
        };
        let b = Job {
            data_rate_mbps: 5,
            gbr_dl_bps: 1_000_000,
            cg_ue_count: 1,
            vr_ue_count: 0,
        };
        assert!(a < b);
    }
}
