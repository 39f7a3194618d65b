use super::SystemId;
use crate::model::{Phase, PhaseTiming};
use crate::model::Phase::{Evening, Morning, Night, Off};

// Lundi en tête pour la semaine fixe.
const STANDARD_WEEK: [Phase; 7] = [Morning, Morning, Morning, Morning, Morning, Off, Off];
const THREE_SHIFT_TWO_OFF: [Phase; 5] = [Morning, Evening, Night, Off, Off];
const FOUR_TEAM_THREE_SHIFT: [Phase; 8] =
    [Morning, Morning, Evening, Evening, Night, Night, Off, Off];
const TWELVE_THIRTY_SIX: [Phase; 4] = [Morning, Night, Off, Off];
const TWENTY_FOUR_FORTY_EIGHT: [Phase; 3] = [Morning, Off, Off];
const TWENTY_FOUR_SEVENTY_TWO: [Phase; 4] = [Morning, Off, Off, Off];

const EIGHT_HOUR_SHIFTS: [(Phase, PhaseTiming); 3] = [
    (Morning, PhaseTiming::new(0, 8)),
    (Evening, PhaseTiming::new(8, 8)),
    (Night, PhaseTiming::new(16, 8)),
];

/// Séquence ordonnée des phases d'un système.
pub fn phase_cycle(id: SystemId) -> &'static [Phase] {
    match id {
        SystemId::StandardWeek => &STANDARD_WEEK,
        SystemId::ThreeShiftTwoOff => &THREE_SHIFT_TWO_OFF,
        SystemId::FourTeamThreeShift => &FOUR_TEAM_THREE_SHIFT,
        SystemId::TwelveThirtySix => &TWELVE_THIRTY_SIX,
        SystemId::TwentyFourFortyEight => &TWENTY_FOUR_FORTY_EIGHT,
        SystemId::TwentyFourSeventyTwo => &TWENTY_FOUR_SEVENTY_TWO,
    }
}

/// Décalage/durée d'une phase ; (0h, 0h) pour le repos et les phases hors cycle.
pub fn time_logic(id: SystemId, phase: Phase) -> PhaseTiming {
    match (id, phase) {
        (_, Off) => PhaseTiming::NONE,
        (SystemId::StandardWeek, Morning) => PhaseTiming::new(0, 8),
        (SystemId::ThreeShiftTwoOff | SystemId::FourTeamThreeShift, _) => EIGHT_HOUR_SHIFTS
            .iter()
            .find(|(p, _)| *p == phase)
            .map_or(PhaseTiming::NONE, |(_, timing)| *timing),
        (SystemId::TwelveThirtySix, Morning) => PhaseTiming::new(0, 12),
        (SystemId::TwelveThirtySix, Night) => PhaseTiming::new(12, 12),
        (SystemId::TwentyFourFortyEight | SystemId::TwentyFourSeventyTwo, Morning) => {
            PhaseTiming::new(0, 24)
        }
        _ => PhaseTiming::NONE,
    }
}
