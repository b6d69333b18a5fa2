//! Randomized checks that both codecs invert cleanly on arbitrary documents.

use editor_ot::position::utf16_len;
use editor_ot::{code_point_to_utf16, flat, sequential, utf16_to_code_point, Change, ChangeSet, Path};
use proptest::prelude::*;

fn arb_doc() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(vec!['a', 'b', ' ', '\n', 'é', '🚀', '🎉']), 0..24)
}

/// `(skip, delete, insert)` steps walked over the document. Consecutive
/// changes are kept at least one character apart so neither codec merges them.
fn arb_steps() -> impl Strategy<Value = Vec<(usize, usize, String)>> {
    prop::collection::vec((0usize..4, 0usize..4, "[xy\n🌍]{0,3}"), 0..6)
}

fn build(chars: &[char], steps: &[(usize, usize, String)]) -> Vec<Change> {
    let offset = |n: usize| chars[..n].iter().map(|c| c.len_utf16()).sum::<usize>();
    let mut changes = Vec::new();
    let mut cursor = 0;
    for (skip, delete, insert) in steps {
        let gap = usize::from(!changes.is_empty());
        let start = cursor + skip + gap;
        if start > chars.len() {
            break;
        }
        let end = (start + delete).min(chars.len());
        if start == end && insert.is_empty() {
            continue;
        }
        changes.push(Change::replace(offset(start), offset(end), insert.clone()));
        cursor = end;
    }
    changes
}

fn arb_case() -> impl Strategy<Value = (String, Vec<Change>)> {
    (arb_doc(), arb_steps()).prop_map(|(chars, steps)| {
        let changes = build(&chars, &steps);
        (chars.into_iter().collect(), changes)
    })
}

proptest! {
    #[test]
    fn flat_round_trip((doc, changes) in arb_case()) {
        let set = ChangeSet::new(changes.clone()).unwrap();
        let op = flat::encode(&Path::new(["doc"]), &set, &doc).unwrap();
        let after = set.apply(&doc).unwrap();
        prop_assert_eq!(flat::apply(&doc, &op).unwrap(), after.clone());
        prop_assert_eq!(flat::apply(&after, &flat::invert(&op)).unwrap(), doc);
        prop_assert_eq!(flat::decode(&op), changes);
    }

    #[test]
    fn sequential_round_trip((doc, changes) in arb_case()) {
        let path = Path::new(["doc"]);
        let set = ChangeSet::new(changes.clone()).unwrap();
        let encoded = sequential::encode(&path, &set, &doc).unwrap();
        let Some(op) = encoded else {
            prop_assert!(changes.is_empty());
            return Ok(());
        };
        prop_assert_eq!(ot_text_unicode::apply(&doc, &op.op).unwrap(), set.apply(&doc).unwrap());
        prop_assert_eq!(sequential::decode(&op.to_operation(), &path, Some(&doc)), changes);
    }

    #[test]
    fn positions_invert_on_boundaries(chars in arb_doc()) {
        let doc: String = chars.iter().collect();
        let mut boundary = 0;
        for (cp, c) in chars.iter().enumerate() {
            prop_assert_eq!(utf16_to_code_point(&doc, boundary), cp);
            prop_assert_eq!(code_point_to_utf16(&doc, cp), boundary);
            boundary += c.len_utf16();
        }
        prop_assert_eq!(boundary, utf16_len(&doc));
        prop_assert_eq!(utf16_to_code_point(&doc, boundary), chars.len());
    }
}
