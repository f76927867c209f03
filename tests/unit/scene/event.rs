use super::*;
use std::cell::RefCell;

fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> Handler<u32> {
    let log = log.clone();
    let tag = tag.to_owned();
    Rc::new(move |v: &u32| log.borrow_mut().push(format!("{tag}:{v}")))
}

#[test]
fn duplicate_handler_is_ignored() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let h = recorder(&log, "a");
    let mut ev = Eventful::new();
    assert!(ev.on("click", h.clone(), None));
    assert!(!ev.on("click", h.clone(), None));
    ev.trigger("click", &1);
    assert_eq!(*log.borrow(), vec!["a:1"]);
    assert_eq!(ev.handler_count("click"), 1);
}

#[test]
fn one_shot_runs_once_without_skipping_neighbours() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut ev = Eventful::new();
    ev.one("x", recorder(&log, "once"), None);
    ev.on("x", recorder(&log, "always"), None);
    ev.one("x", recorder(&log, "once2"), None);

    ev.trigger("x", &1);
    ev.trigger("x", &2);
    assert_eq!(*log.borrow(), vec!["once:1", "always:1", "once2:1", "always:2"]);
    assert_eq!(ev.handler_count("x"), 1);
}

#[test]
fn off_removes_specific_or_all() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let a = recorder(&log, "a");
    let b = recorder(&log, "b");
    let mut ev = Eventful::new();
    ev.on("e", a.clone(), None);
    ev.on("e", b.clone(), None);

    ev.off("e", Some(&a));
    ev.trigger("e", &0);
    assert_eq!(*log.borrow(), vec!["b:0"]);

    ev.off("e", None);
    assert!(ev.is_silent("e"));
    ev.on("f", a, None);
    ev.off_all();
    assert!(ev.is_silent("f"));
}

struct OnlyTagged {
    after: Rc<Cell<u32>>,
}

impl EventProcessor for OnlyTagged {
    fn filter(&self, _event: &str, query: &Value) -> bool {
        query.get("tag").and_then(Value::as_str) == Some("yes")
    }

    fn after_trigger(&self, _event: &str) {
        self.after.set(self.after.get() + 1);
    }
}

#[test]
fn filtered_one_shot_stays_registered() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let after = Rc::new(Cell::new(0));
    let mut ev = Eventful::with_processor(Rc::new(OnlyTagged {
        after: after.clone(),
    }));
    ev.one("e", recorder(&log, "no"), Some(serde_json::json!({ "tag": "no" })));
    ev.one("e", recorder(&log, "yes"), Some(serde_json::json!({ "tag": "yes" })));
    ev.on("e", recorder(&log, "plain"), None);

    ev.trigger("e", &7);
    assert_eq!(*log.borrow(), vec!["yes:7", "plain:7"]);
    assert_eq!(ev.handler_count("e"), 2);
    assert_eq!(after.get(), 1);
}

#[test]
fn stop_propagation_is_shared_between_clones() {
    let e = SceneEvent::new("click", None, 1.0, 2.0);
    let copy = e.clone();
    copy.stop_propagation();
    assert!(e.is_propagation_stopped());
}
