use editor_ot::edit::get_at_path;
use editor_ot::{apply_edit, flat, sequential, Change, ChangeSet, Operation, Path};
use serde_json::Value;

/// One edit described every way this crate can express it.
pub struct Scenario {
    pub path: Path,
    pub before: Value,
    pub after: Value,
    pub changes: Vec<Change>,
    pub json0: Value,
    pub json1: Value,
}

impl Scenario {
    pub fn text(before: &str, after: &str, changes: Vec<Change>, json0: Value, json1: Value) -> Self {
        Self {
            path: Path::root(),
            before: Value::from(before),
            after: Value::from(after),
            changes,
            json0,
            json1,
        }
    }

    fn text_at(&self, doc: &Value) -> String {
        get_at_path(doc, &self.path)
            .and_then(Value::as_str)
            .expect("scenario path holds a string")
            .to_string()
    }

    fn change_set(&self) -> ChangeSet {
        ChangeSet::new(self.changes.clone()).expect("valid change set")
    }
}

/// Check both codecs in both directions, and that every op applies and
/// inverts cleanly.
pub fn verify(s: &Scenario) {
    let before = s.text_at(&s.before);
    let after = s.text_at(&s.after);
    let changes = s.change_set();

    assert_eq!(changes.apply(&before).unwrap(), after, "changes do not produce `after`");

    // json0
    let op0 = flat::encode(&s.path, &changes, &before).unwrap();
    assert_eq!(flat::to_json(&op0), s.json0, "json0 encoding");
    assert_eq!(flat::from_json(&s.json0).unwrap(), op0, "json0 wire parse");
    assert_eq!(flat::apply(&before, &op0).unwrap(), after, "json0 apply");
    assert_eq!(flat::apply(&after, &flat::invert(&op0)).unwrap(), before, "json0 invert");
    assert_eq!(flat::decode(&op0), s.changes, "json0 decode");

    // json1
    let op1 = sequential::encode(&s.path, &changes, &before).unwrap();
    let op1_json = op1.as_ref().map_or(Value::Null, |op| op.to_json());
    assert_eq!(op1_json, s.json1, "json1 encoding");
    let Some(op1) = op1 else {
        assert_eq!(before, after);
        return;
    };
    let mut doc = s.before.clone();
    apply_edit(&mut doc, &op1.to_operation()).unwrap();
    assert_eq!(doc, s.after, "json1 apply");
    let inverse = ot_text_unicode::invert(&op1.op).unwrap();
    assert_eq!(ot_text_unicode::apply(&after, &inverse).unwrap(), before, "json1 invert");
    let parsed = Operation::from_json(&s.json1).expect("json1 op parses");
    assert_eq!(sequential::decode(&parsed, &s.path, Some(&before)), s.changes, "json1 decode");
}
