use std::time::Instant;

use tracing::info;

use crate::model::garage::{Collection, Garage};
use crate::model::reminder::Reminder;
use crate::model::store::StoreError;
use crate::ops::OpError;
use crate::ops::due::next_trigger;
use crate::ops::validate::ReminderForm;

/// New reminders start enabled.
pub fn add_reminder(garage: &mut Garage, form: &ReminderForm) -> Result<Reminder, OpError> {
    let draft = form.validate(garage)?;
    let reminder = draft.into_reminder(garage.reminders.next_id(), true);
    garage.reminders.insert(reminder.clone())?;
    garage.mark_mutated();
    info!(id = %reminder.id, title = %reminder.title, kind = reminder.trigger.kind().as_str(), "reminder added");
    Ok(reminder)
}

/// Replace a reminder's fields. The enabled flag is kept.
pub fn edit_reminder(garage: &mut Garage, id: &str, form: &ReminderForm) -> Result<Reminder, OpError> {
    let existing = garage
        .reminders
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let enabled = existing.enabled;
    let draft = form.validate_edit(garage, existing)?;
    let reminder = draft.into_reminder(id.to_string(), enabled);
    garage.reminders.update(reminder.clone())?;
    garage.mark_mutated();
    info!(id, "reminder updated");
    Ok(reminder)
}

pub fn delete_reminder(garage: &mut Garage, id: &str, now: Instant) -> Result<Reminder, OpError> {
    let reminder = garage.reminders.remove_at(id, now)?;
    garage.mark_deleted(Collection::Reminders);
    info!(id, title = %reminder.title, "reminder deleted");
    Ok(reminder)
}

pub fn set_enabled(garage: &mut Garage, id: &str, enabled: bool) -> Result<Reminder, OpError> {
    let reminder = garage
        .reminders
        .modify(id, |r| r.enabled = enabled)?
        .clone();
    garage.mark_mutated();
    info!(id, enabled, "reminder toggled");
    Ok(reminder)
}

/// Outcome of marking a reminder complete
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Recurring: the trigger moved forward one interval
    Rescheduled(Reminder),
    /// One-shot: the reminder was switched off
    Disabled(Reminder),
}

impl Completion {
    pub fn reminder(&self) -> &Reminder {
        match self {
            Completion::Rescheduled(r) | Completion::Disabled(r) => r,
        }
    }
}

pub fn complete_reminder(garage: &mut Garage, id: &str) -> Result<Completion, OpError> {
    let mut rescheduled = false;
    let reminder = garage
        .reminders
        .modify(id, |r| match next_trigger(&r.trigger) {
            Some(next) => {
                r.trigger = next;
                r.enabled = true;
                rescheduled = true;
            }
            None => r.enabled = false,
        })?
        .clone();
    garage.mark_mutated();
    info!(id, rescheduled, "reminder completed");
    Ok(if rescheduled {
        Completion::Rescheduled(reminder)
    } else {
        Completion::Disabled(reminder)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reminder::{Period, Trigger};
    use crate::model::seed::sample_data;
    use crate::ops::undo::undo_last;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn garage() -> Garage {
        Garage::from_data(sample_data(), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn add_non_recurring_mileage_reminder() {
        let mut g = garage();
        let form = ReminderForm {
            title: "Coolant Flush".into(),
            vehicle: "My Honda Civic".into(),
            mileage: "48000".into(),
            ..Default::default()
        };
        let reminder = add_reminder(&mut g, &form).unwrap();
        assert_eq!(reminder.id, "5");
        assert!(reminder.enabled);
        assert_eq!(reminder.vehicle_id.as_deref(), Some("1"));
        assert_eq!(
            reminder.trigger,
            Trigger::Mileage {
                at: 48000,
                every: None
            }
        );
    }

    #[test]
    fn edit_keeps_enabled_flag() {
        let mut g = garage();
        set_enabled(&mut g, "3", false).unwrap();
        let mut form = ReminderForm::from_reminder(g.reminders.get("3").unwrap());
        form.title = "State Inspection".into();
        let reminder = edit_reminder(&mut g, "3", &form).unwrap();
        assert_eq!(reminder.title, "State Inspection");
        assert!(!reminder.enabled);
    }

    #[test]
    fn edit_after_vehicle_delete() {
        let mut g = garage();
        crate::ops::vehicle_ops::delete_vehicle(&mut g, "1", Instant::now()).unwrap();
        let mut form = ReminderForm::from_reminder(g.reminders.get("2").unwrap());
        form.description = "Rotate and balance".into();
        let reminder = edit_reminder(&mut g, "2", &form).unwrap();
        assert_eq!(reminder.vehicle_id.as_deref(), Some("1"));
        assert_eq!(reminder.description, "Rotate and balance");
    }

    #[test]
    fn toggle_round_trip() {
        let mut g = garage();
        assert!(!set_enabled(&mut g, "1", false).unwrap().enabled);
        assert!(set_enabled(&mut g, "1", true).unwrap().enabled);
        assert!(set_enabled(&mut g, "9", true).is_err());
    }

    #[test]
    fn complete_recurring_rolls_forward() {
        let mut g = garage();
        let done = complete_reminder(&mut g, "4").unwrap();
        assert!(matches!(done, Completion::Rescheduled(_)));
        assert_eq!(
            done.reminder().trigger,
            Trigger::Date {
                on: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
                every: Some(Period::Year)
            }
        );
    }

    #[test]
    fn complete_one_shot_disables() {
        let mut g = garage();
        let form = ReminderForm {
            title: "Recall check".into(),
            kind: "date".into(),
            date: "2024-02-01".into(),
            ..Default::default()
        };
        let added = add_reminder(&mut g, &form).unwrap();
        let done = complete_reminder(&mut g, &added.id).unwrap();
        assert!(matches!(done, Completion::Disabled(ref r) if !r.enabled));
    }

    #[test]
    fn delete_then_undo_restores() {
        let mut g = garage();
        let before = g.to_data();
        let now = Instant::now();
        delete_reminder(&mut g, "2", now).unwrap();
        undo_last(&mut g, now).unwrap();
        assert_eq!(g.to_data(), before);
    }
}
