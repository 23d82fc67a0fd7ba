// src/domain/blinds.rs

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Один уровень блайндов.
///
/// Уровень длится не по времени, а по числу раздач:
/// каждый активный стол должен сыграть `hands_this_level` раздач,
/// прежде чем турнир перейдёт на следующий уровень.
/// Пример: level_index = 2, SB = 10, BB = 20, ante = 1, hands_this_level = 5.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlindLevel {
    /// Порядковый номер уровня (1, 2, 3, ...).
    pub level_index: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Размер анте в фишках (0, если нет).
    #[serde(default)]
    pub ante: Chips,
    /// Сколько раздач нужно сыграть на каждом активном столе.
    /// 0 = уровень не заканчивается никогда.
    #[serde(default)]
    pub hands_this_level: u32,
}

impl BlindLevel {
    pub fn new(
        level_index: u32,
        small_blind: Chips,
        big_blind: Chips,
        ante: Chips,
        hands_this_level: u32,
    ) -> Self {
        Self {
            level_index,
            small_blind,
            big_blind,
            ante,
            hands_this_level,
        }
    }

    /// Подпись для HUD: "Level 2  10/20 (Ante 1)".
    pub fn label(&self) -> String {
        format!(
            "Level {}  {}/{} (Ante {})",
            self.level_index, self.small_blind, self.big_blind, self.ante
        )
    }
}

/// Расписание уровней турнира (упорядоченный список).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BlindStructure {
    pub levels: Vec<BlindLevel>,
}

impl BlindStructure {
    pub fn new(levels: Vec<BlindLevel>) -> Self {
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Уровень по 0-based индексу. Индекс за пределами списка
    /// прижимается к последнему уровню.
    pub fn level_at(&self, index: usize) -> Option<&BlindLevel> {
        let last = self.levels.len().checked_sub(1)?;
        self.levels.get(index.min(last))
    }

    /// Следующий уровень после `index`, если он есть.
    pub fn next_after(&self, index: usize) -> Option<&BlindLevel> {
        self.levels.get(index.checked_add(1)?)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.levels.len()
    }

    pub fn level_by_number(&self, number: u32) -> Option<&BlindLevel> {
        self.levels.iter().find(|lvl| lvl.level_index == number)
    }

    /// Структура "магазинного" турнира из клиента.
    pub fn store_default() -> Self {
        let levels = vec![
            BlindLevel::new(1, Chips::new(5), Chips::new(10), Chips::ZERO, 5),
            BlindLevel::new(2, Chips::new(10), Chips::new(20), Chips::new(1), 5),
            BlindLevel::new(3, Chips::new(20), Chips::new(40), Chips::new(2), 999),
        ];

        BlindStructure { levels }
    }
}
