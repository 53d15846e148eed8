//! Randomized round-robin seeding of the search.

use rand::Rng;

/// Number of teams needed for `roster_len` participants at `team_size` each.
pub fn team_count(roster_len: usize, team_size: usize) -> usize {
    if roster_len == 0 {
        0
    } else if roster_len <= team_size {
        1
    } else {
        roster_len.div_ceil(team_size)
    }
}

/// Deals indices `0..roster_len` into `team_count` buckets.
///
/// Each step draws a uniformly random index from the undealt pool and hands it
/// to bucket `i % num_teams`, so bucket sizes differ by at most one. Rosters
/// no larger than `team_size` come back as a single bucket in input order.
pub fn initial_partition<R>(roster_len: usize, team_size: usize, rng: &mut R) -> Vec<Vec<usize>>
where
    R: Rng + ?Sized,
{
    let num_teams = team_count(roster_len, team_size);
    match num_teams {
        0 => return Vec::new(),
        1 => return vec![(0..roster_len).collect()],
        _ => {}
    }

    let mut buckets: Vec<Vec<usize>> = (0..num_teams)
        .map(|_| Vec::with_capacity(team_size + 1))
        .collect();
    let mut pool: Vec<usize> = (0..roster_len).collect();

    let mut i = 0;
    while !pool.is_empty() {
        let pick = rng.random_range(0..pool.len());
        let member = pool.swap_remove(pick);
        buckets[i % num_teams].push(member);
        i += 1;
    }

    buckets
}
