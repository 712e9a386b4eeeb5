use std::sync::{Arc, Mutex};

use super::common::*;
use crate::workflows::adoption::notifier::{
    AdopterObserver, ApplicationNotifier, ApplicationObserver, Inbox, ShelterObserver,
};

fn recording(
    label: &'static str,
    log: &Arc<Mutex<Vec<String>>>,
) -> Arc<dyn ApplicationObserver> {
    Arc::new(RecordingObserver {
        label,
        log: log.clone(),
    })
}

#[test]
fn notify_reaches_observers_in_attachment_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut notifier = ApplicationNotifier::new();
    notifier.attach(recording("first", &log));
    notifier.attach(recording("second", &log));

    notifier.notify("new application");

    let entries = log.lock().expect("log mutex").clone();
    assert_eq!(
        entries,
        vec!["first:new application", "second:new application"]
    );
}

#[test]
fn detached_observers_stop_receiving_messages() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let first = recording("first", &log);
    let second = recording("second", &log);
    let mut notifier = ApplicationNotifier::new();
    notifier.attach(first.clone());
    notifier.attach(second.clone());

    assert!(notifier.detach(&first));
    assert!(!notifier.detach(&first));
    assert_eq!(notifier.len(), 1);

    notifier.notify("approved");
    let entries = log.lock().expect("log mutex").clone();
    assert_eq!(entries, vec!["second:approved"]);
}

#[test]
fn notify_without_observers_is_a_no_op() {
    let notifier = ApplicationNotifier::new();
    assert!(notifier.is_empty());
    notifier.notify("nobody listening");
}

#[test]
fn role_observers_address_their_recipient() {
    let inbox = Inbox::default();
    let adopter = AdopterObserver::new(adopter_id("bob"), pet_id(), inbox.clone());
    let shelter = ShelterObserver::new(shelter_id(), pet_id(), inbox.clone());

    adopter.update("approved");
    shelter.update("@bob applied");

    let for_bob = inbox.for_recipient("bob");
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].message, "Your application to adopt rex: approved");

    let for_shelter = inbox.for_recipient(SHELTER);
    assert_eq!(for_shelter.len(), 1);
    assert_eq!(
        for_shelter[0].message,
        "New application to adopt rex: @bob applied"
    );
    assert_eq!(inbox.all().len(), 2);
}
