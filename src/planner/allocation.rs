use crate::error::{PlanError, Result};
use crate::models::{DailyTotals, Nutrient, Preset, Slot};
use crate::planner::apportion::apportion;
use crate::planner::placement::PlacedSlot;
use crate::planner::presets::{self, SlotContext, SlotWeights};

/// Assign kcal and macro grams to placed slots.
///
/// Each channel is weighted by the preset's curve and split with
/// largest-remainder apportionment, so every macro sums exactly to its
/// rounded total and energy sums exactly to the rounded kcal total.
pub fn allocate(
    placed: &[PlacedSlot],
    totals: &DailyTotals,
    preset: Preset,
    training_day: bool,
) -> Result<Vec<Slot>> {
    if placed.is_empty() {
        return Err(PlanError::InvalidInput(
            "cannot allocate across zero slots".to_string(),
        ));
    }
    totals.validate()?;

    let count = placed.len();
    let weights: Vec<SlotWeights> = placed
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            presets::weigh(
                preset,
                &SlotContext {
                    index,
                    count,
                    role: slot.role,
                    kind: slot.kind,
                    training_day,
                },
            )
        })
        .collect();

    let energy_weights: Vec<f64> = weights.iter().map(|w| w.energy).collect();
    let energy = apportion(&energy_weights, totals.energy_target())?;

    let split = |nutrient: Nutrient| {
        let channel: Vec<f64> = weights.iter().map(|w| w.nutrient(nutrient)).collect();
        apportion(&channel, totals.grams_target(nutrient))
    };
    let protein = split(Nutrient::Protein)?;
    let carbs = split(Nutrient::Carbs)?;
    let fat = split(Nutrient::Fat)?;

    tracing::debug!(%preset, count, ?energy, ?protein, ?carbs, ?fat, "allocated totals");

    Ok(placed
        .iter()
        .enumerate()
        .map(|(i, slot)| Slot {
            time: slot.time,
            role: slot.role,
            kind: slot.kind,
            fixed: slot.role.is_fixed(),
            energy_kcal: energy[i],
            protein_g: protein[i],
            carbs_g: carbs[i],
            fat_g: fat[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, SlotKind, SlotRole};

    fn placed(n: usize) -> Vec<PlacedSlot> {
        (0..n)
            .map(|i| PlacedSlot {
                time: ClockTime::from_minutes(480 + 180 * i as u32).unwrap(),
                role: if i == 0 {
                    SlotRole::Breakfast
                } else {
                    SlotRole::Free
                },
                kind: SlotKind::Meal,
            })
            .collect()
    }

    fn totals() -> DailyTotals {
        DailyTotals::new(2000.0, 150.0, 220.0, 60.0)
    }

    #[test]
    fn test_exact_sums_for_every_preset() {
        for preset in Preset::ALL {
            for n in 1..=6 {
                let slots = allocate(&placed(n), &totals(), preset, false).unwrap();
                assert_eq!(slots.iter().map(|s| s.protein_g).sum::<u32>(), 150);
                assert_eq!(slots.iter().map(|s| s.carbs_g).sum::<u32>(), 220);
                assert_eq!(slots.iter().map(|s| s.fat_g).sum::<u32>(), 60);
                assert_eq!(slots.iter().map(|s| s.energy_kcal).sum::<u32>(), 2000);
            }
        }
    }

    #[test]
    fn test_fractional_totals_round_first() {
        let odd = DailyTotals::new(1999.6, 150.4, 219.5, 60.49);
        let slots = allocate(&placed(3), &odd, Preset::Standard, false).unwrap();
        assert_eq!(slots.iter().map(|s| s.energy_kcal).sum::<u32>(), 2000);
        assert_eq!(slots.iter().map(|s| s.protein_g).sum::<u32>(), 150);
        assert_eq!(slots.iter().map(|s| s.carbs_g).sum::<u32>(), 220);
        assert_eq!(slots.iter().map(|s| s.fat_g).sum::<u32>(), 60);
    }

    #[test]
    fn test_zero_slots_fail_fast() {
        let err = allocate(&[], &totals(), Preset::Standard, false).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_total_fails_fast() {
        let mut bad = totals();
        bad.carbs_g = -5.0;
        let err = allocate(&placed(3), &bad, Preset::Standard, false).unwrap_err();
        assert!(err.to_string().contains("carbs"), "{}", err);
    }

    #[test]
    fn test_backload_feeds_later_slots() {
        let slots = allocate(&placed(4), &totals(), Preset::Backload, false).unwrap();
        assert!(slots[3].energy_kcal > slots[0].energy_kcal);
    }

    #[test]
    fn test_snack_smaller_than_meal() {
        let mut slots = placed(3);
        slots[1].kind = SlotKind::Snack;
        let out = allocate(&slots, &totals(), Preset::Standard, false).unwrap();
        assert!(out[1].energy_kcal < out[0].energy_kcal);
        // 1 : 0.5 : 1 split of 2000 kcal.
        assert_eq!(out[1].energy_kcal, 400);
    }

    #[test]
    fn test_fixed_flag_follows_role() {
        let out = allocate(&placed(3), &totals(), Preset::Standard, false).unwrap();
        assert!(out[0].fixed);
        assert!(!out[1].fixed);
    }

    #[test]
    fn test_repeatable() {
        let a = allocate(&placed(5), &totals(), Preset::AmCarbs, true).unwrap();
        let b = allocate(&placed(5), &totals(), Preset::AmCarbs, true).unwrap();
        assert_eq!(a, b);
    }
}
