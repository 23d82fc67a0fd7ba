use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::player::Entrant;

/// Источник перемешивания для жеребьёвки мест.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}

/// Системный RNG: каждая жеребьёвка своя.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut rand::thread_rng());
    }
}

/// Детерминированный RNG для тестов и реплея.
/// Один и тот же seed даёт одну и ту же рассадку.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

/// Жеребьёвка: перемешать участников до рассадки.
///
/// Сама рассадка остаётся круговой по индексу, поэтому
/// случайность целиком живёт здесь, а турнир детерминирован.
pub fn seat_draw(entrants: &[Entrant], rng: &mut impl RandomSource) -> Vec<Entrant> {
    let mut drawn = entrants.to_vec();
    rng.shuffle(&mut drawn);
    drawn
}
