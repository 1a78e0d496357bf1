use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, StorageError};
use crate::models::Discipline;

/// One 1v1 pairing; `second` is `None` for the odd competitor out, who
/// races solo but is ranked against the full field by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DuelPair {
    pub first: i64,
    pub second: Option<i64>,
}

/// Initial start structure for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    /// Randomly paired duels (sprint, individual).
    Duels(Vec<DuelPair>),
    /// Mass-start list in selection order (pursuit, relay).
    MassStart(Vec<i64>),
}

/// Rejects a selection naming the same competitor twice. Every start
/// structure owes each competitor exactly one race per event, so
/// duplicates are refused before any pairing or persistence happens.
pub fn ensure_distinct(competitor_ids: &[i64]) -> Result<()> {
    let mut seen = HashSet::with_capacity(competitor_ids.len());
    for &id in competitor_ids {
        if !seen.insert(id) {
            return Err(StorageError::invalid_input(format!(
                "competitor {id} is selected more than once"
            )));
        }
    }
    Ok(())
}

/// Generates the start structure for the selected competitors using a
/// fresh shuffle. Each invocation reshuffles independently; once the
/// races are persisted the pairing is immutable.
pub fn generate_pairing(competitor_ids: &[i64], discipline: Discipline) -> Pairing {
    generate_pairing_with(competitor_ids, discipline, &mut rand::thread_rng())
}

pub fn generate_pairing_with<R: Rng + ?Sized>(
    competitor_ids: &[i64],
    discipline: Discipline,
    rng: &mut R,
) -> Pairing {
    if discipline.is_mass_start() {
        return Pairing::MassStart(competitor_ids.to_vec());
    }

    let mut shuffled = competitor_ids.to_vec();
    shuffled.shuffle(rng);

    let pairs = shuffled
        .chunks(2)
        .map(|chunk| DuelPair {
            first: chunk[0],
            second: chunk.get(1).copied(),
        })
        .collect();
    Pairing::Duels(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn five_competitors_give_two_pairs_and_a_solo() {
        let ids = [1, 2, 3, 4, 5];
        let Pairing::Duels(pairs) =
            generate_pairing_with(&ids, Discipline::Sprint, &mut StdRng::seed_from_u64(7))
        else {
            panic!("sprint must produce duels");
        };

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.iter().filter(|p| p.second.is_none()).count(), 1);

        let mut seen = HashSet::new();
        for pair in &pairs {
            assert!(seen.insert(pair.first));
            if let Some(second) = pair.second {
                assert!(seen.insert(second));
            }
        }
        assert_eq!(seen, ids.iter().copied().collect());
    }

    #[test]
    fn even_field_pairs_everyone() {
        let Pairing::Duels(pairs) =
            generate_pairing_with(&[1, 2, 3, 4], Discipline::Individual, &mut StdRng::seed_from_u64(1))
        else {
            panic!("individual must produce duels");
        };
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.second.is_some()));
    }

    #[test]
    fn mass_start_keeps_selection_order() {
        let pairing = generate_pairing_with(&[5, 3, 9], Discipline::Pursuit, &mut StdRng::seed_from_u64(1));
        assert_eq!(pairing, Pairing::MassStart(vec![5, 3, 9]));

        let pairing = generate_pairing_with(&[2, 1], Discipline::Relay, &mut StdRng::seed_from_u64(1));
        assert_eq!(pairing, Pairing::MassStart(vec![2, 1]));
    }

    #[test]
    fn duplicate_selections_are_refused() {
        assert!(ensure_distinct(&[1, 2, 3]).is_ok());
        assert!(ensure_distinct(&[]).is_ok());
        assert!(matches!(
            ensure_distinct(&[1, 2, 1]),
            Err(StorageError::InvalidInput(_))
        ));
    }

    #[test]
    fn regeneration_reshuffles_independently() {
        let ids: Vec<i64> = (1..=16).collect();
        let a = generate_pairing_with(&ids, Discipline::Sprint, &mut StdRng::seed_from_u64(1));
        let b = generate_pairing_with(&ids, Discipline::Sprint, &mut StdRng::seed_from_u64(2));
        assert_ne!(a, b);
    }
}
