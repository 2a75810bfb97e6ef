use super::EnsembleMember;
use crate::dataset::Float;

/// Fixed-size sequence of ensemble members
///
/// The ensemble is empty until the first chunk cycle populates it with exactly `capacity`
/// members. Afterwards members are only ever swapped in place, the length never changes.
#[derive(Debug, Clone)]
pub struct Ensemble<C, F> {
    members: Vec<EnsembleMember<C, F>>,
    capacity: usize,
}

impl<C, F: Float> Ensemble<C, F> {
    pub fn new(capacity: usize) -> Self {
        Ensemble {
            members: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn members(&self) -> &[EnsembleMember<C, F>] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut [EnsembleMember<C, F>] {
        &mut self.members
    }

    /// Fill an empty ensemble
    ///
    /// # Panics
    ///
    /// If the ensemble is already populated or the number of members is not `capacity`.
    pub(crate) fn populate(&mut self, members: Vec<EnsembleMember<C, F>>) {
        assert!(self.members.is_empty(), "ensemble is already populated");
        assert_eq!(members.len(), self.capacity);
        self.members = members;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn scores(&self) -> Vec<Option<F>> {
        self.members.iter().map(EnsembleMember::score).collect()
    }

    /// Number of members without a valid score
    pub fn abstentions(&self) -> usize {
        self.members.iter().filter(|m| m.is_abstaining()).count()
    }

    /// Index of the member with the lowest score
    ///
    /// Abstaining members rank below any valid score. Ties are broken by first occurrence.
    pub fn poorest(&self) -> Option<usize> {
        let mut poorest: Option<(usize, Option<F>)> = None;
        for (i, member) in self.members.iter().enumerate() {
            let score = member.score();
            let lower = match (poorest, score) {
                (None, _) => true,
                (Some((_, Some(_))), None) => true,
                (Some((_, Some(min))), Some(score)) => score < min,
                (Some((_, None)), _) => false,
            };
            if lower {
                poorest = Some((i, score));
            }
        }

        poorest.map(|(i, _)| i)
    }

    /// Replace the poorest member with `candidate` if the candidate outscores it
    ///
    /// Returns the replaced index, or `None` if the candidate was discarded.
    pub fn offer(&mut self, candidate: EnsembleMember<C, F>) -> Option<usize> {
        let poorest = self.poorest()?;
        if candidate.outscores(&self.members[poorest]) {
            self.members[poorest] = candidate;
            Some(poorest)
        } else {
            None
        }
    }
}
