use crate::binding::{Binding, Subscription};
use crate::range::DateRange;
use std::rc::Rc;
use time::Date;

/// A change made to a [`Selection`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectionChange {
    Date(Option<Date>),
    Range(Option<DateRange>),
}

/// The selected date and date range shown by a calendar
pub trait Selection {
    fn current_date(&self) -> Option<Date>;

    fn current_range(&self) -> Option<DateRange>;

    /// Returns whether the stored date changed
    fn set_date(&self, date: Option<Date>) -> bool;

    /// Returns whether the stored range changed
    fn set_range(&self, range: Option<DateRange>) -> bool;

    /// Register `listener` to be told about every subsequent change
    fn subscribe(&self, listener: Rc<dyn Fn(SelectionChange)>) -> Subscription;
}

/// Selection stored in bindings owned by the caller
#[derive(Clone, Debug)]
pub struct ExternalSelection {
    date: Binding<Date>,
    range: Binding<Option<DateRange>>,
}

impl ExternalSelection {
    pub fn new(date: Binding<Date>, range: Binding<Option<DateRange>>) -> ExternalSelection {
        ExternalSelection { date, range }
    }
}

impl Selection for ExternalSelection {
    fn current_date(&self) -> Option<Date> {
        Some(self.date.get())
    }

    fn current_range(&self) -> Option<DateRange> {
        self.range.get()
    }

    fn set_date(&self, date: Option<Date>) -> bool {
        match date {
            Some(d) => self.date.set(d),
            None => {
                log::debug!("Ignoring request to clear a required date binding");
                false
            }
        }
    }

    fn set_range(&self, range: Option<DateRange>) -> bool {
        self.range.set(range)
    }

    fn subscribe(&self, listener: Rc<dyn Fn(SelectionChange)>) -> Subscription {
        let on_range = Rc::clone(&listener);
        self.date
            .subscribe(move |&d| listener(SelectionChange::Date(Some(d))))
            .join(
                self.range
                    .subscribe(move |&r| on_range(SelectionChange::Range(r))),
            )
    }
}

/// Selection owned by the calendar itself, in which either value may be
/// unset.
///
/// A caller-supplied binding, when given, is shared rather than copied: the
/// calendar's changes show up in it, and the caller's changes to it are
/// published to the calendar.  A value with no binding is stored privately.
#[derive(Clone, Debug, Default)]
pub struct OwnedSelection {
    date: Binding<Option<Date>>,
    range: Binding<Option<DateRange>>,
}

impl OwnedSelection {
    pub fn new(
        date: Option<Binding<Option<Date>>>,
        range: Option<Binding<Option<DateRange>>>,
    ) -> OwnedSelection {
        OwnedSelection {
            date: date.unwrap_or_default(),
            range: range.unwrap_or_default(),
        }
    }
}

impl Selection for OwnedSelection {
    fn current_date(&self) -> Option<Date> {
        self.date.get()
    }

    fn current_range(&self) -> Option<DateRange> {
        self.range.get()
    }

    fn set_date(&self, date: Option<Date>) -> bool {
        self.date.set(date)
    }

    fn set_range(&self, range: Option<DateRange>) -> bool {
        self.range.set(range)
    }

    fn subscribe(&self, listener: Rc<dyn Fn(SelectionChange)>) -> Subscription {
        let on_range = Rc::clone(&listener);
        self.date
            .subscribe(move |&d| listener(SelectionChange::Date(d)))
            .join(
                self.range
                    .subscribe(move |&r| on_range(SelectionChange::Range(r))),
            )
    }
}

/// The selection state of a calendar, owned either by the caller or by the
/// calendar
#[derive(Clone, Debug)]
pub enum SelectionState {
    External(ExternalSelection),
    Owned(OwnedSelection),
}

impl SelectionState {
    pub fn external(date: Binding<Date>, range: Binding<Option<DateRange>>) -> SelectionState {
        SelectionState::External(ExternalSelection::new(date, range))
    }

    pub fn owned(
        date: Option<Binding<Option<Date>>>,
        range: Option<Binding<Option<DateRange>>>,
    ) -> SelectionState {
        SelectionState::Owned(OwnedSelection::new(date, range))
    }

    fn inner(&self) -> &dyn Selection {
        match self {
            SelectionState::External(sel) => sel,
            SelectionState::Owned(sel) => sel,
        }
    }
}

impl Default for SelectionState {
    fn default() -> SelectionState {
        SelectionState::Owned(OwnedSelection::default())
    }
}

impl Selection for SelectionState {
    fn current_date(&self) -> Option<Date> {
        self.inner().current_date()
    }

    fn current_range(&self) -> Option<DateRange> {
        self.inner().current_range()
    }

    fn set_date(&self, date: Option<Date>) -> bool {
        self.inner().set_date(date)
    }

    fn set_range(&self, range: Option<DateRange>) -> bool {
        self.inner().set_range(range)
    }

    fn subscribe(&self, listener: Rc<dyn Fn(SelectionChange)>) -> Subscription {
        self.inner().subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use time::macros::date;

    fn recorder() -> (Rc<RefCell<Vec<SelectionChange>>>, Rc<dyn Fn(SelectionChange)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, Rc::new(move |c: SelectionChange| sink.borrow_mut().push(c)))
    }

    #[test]
    fn test_external_selection() {
        let date = Binding::new(date!(2024 - 03 - 15));
        let range = Binding::new(None);
        let sel = SelectionState::external(date.clone(), range.clone());
        let (log, listener) = recorder();
        let _sub = sel.subscribe(listener);
        assert_eq!(sel.current_date(), Some(date!(2024 - 03 - 15)));
        assert_eq!(sel.current_range(), None);
        assert!(sel.set_date(Some(date!(2024 - 07 - 04))));
        assert!(!sel.set_date(None));
        let r = DateRange::new(date!(2024 - 07 - 04));
        assert!(sel.set_range(Some(r)));
        assert_eq!(date.get(), date!(2024 - 07 - 04));
        assert_eq!(range.get(), Some(r));
        assert_eq!(
            *log.borrow(),
            [
                SelectionChange::Date(Some(date!(2024 - 07 - 04))),
                SelectionChange::Range(Some(r)),
            ]
        );
    }

    #[test]
    fn test_external_changes_by_caller_are_published() {
        let date = Binding::new(date!(2024 - 03 - 15));
        let sel = SelectionState::external(date.clone(), Binding::new(None));
        let (log, listener) = recorder();
        let _sub = sel.subscribe(listener);
        date.set(date!(2024 - 03 - 16));
        assert_eq!(
            *log.borrow(),
            [SelectionChange::Date(Some(date!(2024 - 03 - 16)))]
        );
    }

    #[test]
    fn test_owned_selection_without_bindings() {
        let sel = SelectionState::owned(None, None);
        assert_eq!(sel.current_date(), None);
        assert_eq!(sel.current_range(), None);
        let (log, listener) = recorder();
        let _sub = sel.subscribe(listener);
        assert!(!sel.set_date(None));
        assert!(sel.set_date(Some(date!(2024 - 01 - 02))));
        assert!(sel.set_date(None));
        assert_eq!(
            *log.borrow(),
            [
                SelectionChange::Date(Some(date!(2024 - 01 - 02))),
                SelectionChange::Date(None),
            ]
        );
    }

    #[test]
    fn test_owned_selection_writes_through() {
        let date = Binding::new(Some(date!(2024 - 03 - 15)));
        let range = Binding::new(Some(DateRange::new(date!(2024 - 03 - 15))));
        let sel = OwnedSelection::new(Some(date.clone()), Some(range.clone()));
        assert_eq!(sel.current_date(), Some(date!(2024 - 03 - 15)));
        assert_eq!(
            sel.current_range(),
            Some(DateRange::new(date!(2024 - 03 - 15)))
        );
        sel.set_date(Some(date!(2024 - 03 - 20)));
        sel.set_range(None);
        assert_eq!(date.get(), Some(date!(2024 - 03 - 20)));
        assert_eq!(range.get(), None);
    }

    #[test]
    fn test_owned_selection_follows_caller_changes() {
        let date = Binding::new(Some(date!(2024 - 03 - 15)));
        let sel = SelectionState::owned(Some(date.clone()), None);
        let (log, listener) = recorder();
        let sub = sel.subscribe(listener);
        assert_eq!(date.observer_count(), 1);
        date.set(Some(date!(2024 - 07 - 04)));
        assert_eq!(sel.current_date(), Some(date!(2024 - 07 - 04)));
        date.set(None);
        assert_eq!(sel.current_date(), None);
        assert_eq!(
            *log.borrow(),
            [
                SelectionChange::Date(Some(date!(2024 - 07 - 04))),
                SelectionChange::Date(None),
            ]
        );
        drop(sub);
        assert_eq!(date.observer_count(), 0);
    }

    #[test]
    fn test_owned_write_is_seen_by_caller_observers() {
        let date = Binding::new(None);
        let sel = OwnedSelection::new(Some(date.clone()), None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let sel = sel.clone();
            let seen = Rc::clone(&seen);
            date.subscribe(move |&d| seen.borrow_mut().push((d, sel.current_date())))
        };
        assert!(sel.set_date(Some(date!(2024 - 05 - 05))));
        assert_eq!(
            *seen.borrow(),
            [(Some(date!(2024 - 05 - 05)), Some(date!(2024 - 05 - 05)))]
        );
    }

    #[test]
    fn test_dropping_subscription_detaches() {
        let date = Binding::new(date!(2024 - 03 - 15));
        let range = Binding::new(None);
        let sel = SelectionState::external(date.clone(), range.clone());
        let (_, listener) = recorder();
        let sub = sel.subscribe(listener);
        assert_eq!(date.observer_count(), 1);
        assert_eq!(range.observer_count(), 1);
        drop(sub);
        assert_eq!(date.observer_count(), 0);
        assert_eq!(range.observer_count(), 0);
    }
}
