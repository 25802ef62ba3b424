use healthsync_core::models::directory::TimeSlot;

use crate::state::BookingState;

pub const AWAITING_DATE_TEXT: &str = "Select a date to view available slots.";
pub const NO_SLOTS_TEXT: &str = "No slots available for this date.";

/// One toggle in the slot picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotButton {
    pub index: usize,
    pub label: String,
    pub slot: TimeSlot,
    /// The stored slot has the same start time.
    pub active: bool,
    pub disabled: bool,
}

/// What the slot area shows for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotPanel {
    AwaitingDate,
    NoSlots,
    Slots(Vec<SlotButton>),
}

impl SlotPanel {
    pub fn build(state: &BookingState, slots: &[TimeSlot]) -> Self {
        if state.date().is_none() {
            return SlotPanel::AwaitingDate;
        }
        if slots.is_empty() {
            return SlotPanel::NoSlots;
        }

        let chosen = state.slot();
        let buttons = slots
            .iter()
            .enumerate()
            .map(|(index, slot)| SlotButton {
                index,
                label: slot.label(),
                slot: slot.clone(),
                active: chosen.is_some_and(|c| c.same_start(slot)),
                disabled: slot.is_booked,
            })
            .collect();
        SlotPanel::Slots(buttons)
    }

    /// The placeholder text, when no buttons are shown.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            SlotPanel::AwaitingDate => Some(AWAITING_DATE_TEXT),
            SlotPanel::NoSlots => Some(NO_SLOTS_TEXT),
            SlotPanel::Slots(_) => None,
        }
    }

    pub fn buttons(&self) -> &[SlotButton] {
        match self {
            SlotPanel::Slots(buttons) => buttons,
            _ => &[],
        }
    }

    pub fn active(&self) -> Option<&SlotButton> {
        self.buttons().iter().find(|b| b.active)
    }
}

pub fn find_slot<'a>(slots: &'a [TimeSlot], start_time: &str) -> Option<&'a TimeSlot> {
    slots.iter().find(|s| s.start_time == start_time)
}
