use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Доля призового фонда за конкретное место.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PayoutRule {
    /// Место (1 = победитель).
    pub place: u32,
    /// Процент от призового фонда (0..=100).
    pub percent: f64,
}

impl PayoutRule {
    pub fn new(place: u32, percent: f64) -> Self {
        Self { place, percent }
    }
}

/// Таблица выплат турнира.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PayoutStructure {
    pub rules: Vec<PayoutRule>,
}

const PERCENT_EPSILON: f64 = 1e-9;

impl PayoutStructure {
    pub fn new(rules: Vec<PayoutRule>) -> Self {
        Self { rules }
    }

    /// 50 / 30 / 20.
    pub fn top_three() -> Self {
        Self::new(vec![
            PayoutRule::new(1, 50.0),
            PayoutRule::new(2, 30.0),
            PayoutRule::new(3, 20.0),
        ])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Процент для места. При дублях побеждает последнее правило.
    pub fn percent_for(&self, place: u32) -> Option<f64> {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.place == place)
            .map(|rule| rule.percent)
    }

    /// Выплата за место из призового фонда `prize_pool`.
    /// Нет правила или процент <= 0 → 0.
    pub fn amount_for(&self, place: u32, prize_pool: Chips) -> Chips {
        match self.percent_for(place) {
            Some(percent) if percent.is_finite() && percent > 0.0 => {
                Chips((prize_pool.0 as f64 * percent / 100.0).floor() as u64)
            }
            _ => Chips::ZERO,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut total = 0.0;
        for rule in &self.rules {
            if rule.place == 0 {
                return Err("PayoutStructure: place must be 1-based".into());
            }
            if !rule.percent.is_finite() || !(0.0..=100.0).contains(&rule.percent) {
                return Err(format!(
                    "PayoutStructure: place {} has percent {} outside [0, 100]",
                    rule.place, rule.percent
                ));
            }
            total += rule.percent;
        }
        // Дробные проценты складываются с погрешностью.
        if total > 100.0 + PERCENT_EPSILON {
            return Err(format!("PayoutStructure: percents sum to {total} > 100"));
        }
        Ok(())
    }
}
