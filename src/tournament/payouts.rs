use tracing::debug;

use crate::domain::tournament::TournamentState;

/// Проставить выплаты всем игрокам по их итоговым местам.
///
/// Призовой фонд = total_players * starting_stack.
/// Место без правила (или ещё не известное место) → 0.
/// Можно вызывать сколько угодно раз: результат зависит только от мест.
pub fn compute_payouts(state: &TournamentState) -> TournamentState {
    let mut next = state.clone();
    apply_payouts(&mut next);
    next
}

pub(crate) fn apply_payouts(state: &mut TournamentState) {
    let prize_pool = state.prize_pool();
    let payouts = &state.config.payouts;

    for player in state.players.values_mut() {
        let amount = player
            .finish_place
            .map(|place| payouts.amount_for(place, prize_pool))
            .unwrap_or_default();
        player.payout = Some(amount);
    }

    debug!(
        prize_pool = prize_pool.0,
        paid_places = payouts.len(),
        "payouts computed"
    );
}
