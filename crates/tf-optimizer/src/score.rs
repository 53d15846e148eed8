//! Team quality scoring.

use tf_types::{ParticipantRequest, SpecialitySet};

/// Scores a candidate team. Higher is better.
pub trait TeamScore: Send + Sync {
    fn score(&self, members: &[&ParticipantRequest]) -> f64;

    /// Convenience for callers holding owned records.
    fn score_team(&self, members: &[ParticipantRequest]) -> f64 {
        let refs: Vec<&ParticipantRequest> = members.iter().collect();
        self.score(&refs)
    }
}

/// The default three-term score: experience homogeneity, speciality spread
/// and teammate requests.
#[derive(Debug, Clone, Default)]
pub struct WeightedScore {
    specialities: SpecialitySet,
}

impl WeightedScore {
    pub fn new(specialities: SpecialitySet) -> Self {
        Self { specialities }
    }

    pub fn specialities(&self) -> &SpecialitySet {
        &self.specialities
    }

    /// Rewards teams whose members share the same `noob` flag.
    pub fn homogeneity(members: &[&ParticipantRequest]) -> f64 {
        let size = members.len() as i64;
        let noobs = members.iter().filter(|m| m.noob).count() as i64;
        let veterans = size - noobs;
        ((noobs - veterans).abs() * size) as f64
    }

    /// Penalty for uneven speciality coverage. Members without any declared
    /// speciality damp the penalty by `1 - 1/size` each.
    pub fn diversity_penalty(&self, members: &[&ParticipantRequest]) -> f64 {
        if members.is_empty() || self.specialities.is_empty() {
            return 0.0;
        }
        let size = members.len() as f64;

        let mut weight = 1.0;
        let mut counts = vec![0usize; self.specialities.len()];
        for member in members {
            if member.specialities.is_empty() {
                weight *= 1.0 - (1.0 / size);
            }
            for (count, tag) in counts.iter_mut().zip(self.specialities.iter()) {
                if member.specialities.contains(tag) {
                    *count += 1;
                }
            }
        }

        let max = counts.iter().copied().max().unwrap_or(0);
        let min = counts.iter().copied().min().unwrap_or(0);
        (max - min) as f64 / self.specialities.len() as f64 * size * weight
    }

    /// Bonus for requested teammates, summed over ordered pairs. A mutual
    /// pair earns `size²` from each side; a one-way request earns `size`.
    pub fn request_bonus(members: &[&ParticipantRequest]) -> f64 {
        let size = members.len() as f64;
        let mut bonus = 0.0;
        for (i, a) in members.iter().enumerate() {
            for (j, b) in members.iter().enumerate() {
                if i == j {
                    continue;
                }
                if a.is_mutual_with(b) {
                    bonus += size * size;
                } else if a.requested(&b.username) {
                    bonus += size;
                }
            }
        }
        bonus
    }
}

impl TeamScore for WeightedScore {
    fn score(&self, members: &[&ParticipantRequest]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        Self::homogeneity(members) - self.diversity_penalty(members) + Self::request_bonus(members)
    }
}
