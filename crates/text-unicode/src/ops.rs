use crate::{TextComponent, TextOp, TextOpError};

// ── Construction ──────────────────────────────────────────────────────────

/// Append a component, merging with the last component if same type.
fn append(op: &mut TextOp, comp: TextComponent) {
    if comp.is_empty() {
        return;
    }
    match (op.last_mut(), &comp) {
        (Some(TextComponent::Retain(n)), TextComponent::Retain(m)) => {
            *n += m;
            return;
        }
        (Some(TextComponent::Insert(s)), TextComponent::Insert(t)) => {
            s.push_str(t);
            return;
        }
        (Some(TextComponent::DeleteStr(s)), TextComponent::DeleteStr(t)) => {
            s.push_str(t);
            return;
        }
        (Some(last), _) if last.is_delete() && comp.is_delete() => {
            // Mixed delete forms collapse to the count form.
            *last = TextComponent::Delete(last.src_len() + comp.src_len());
            return;
        }
        _ => {}
    }
    op.push(comp);
}

/// Remove trailing retains; they are implicit.
pub fn trim(op: &mut TextOp) {
    while matches!(op.last(), Some(TextComponent::Retain(_))) {
        op.pop();
    }
}

/// Normalize: drop empty components, coalesce adjacent same-type components
/// and trim.
pub fn normalize(op: TextOp) -> TextOp {
    let mut result = TextOp::with_capacity(op.len());
    for comp in op {
        append(&mut result, comp);
    }
    trim(&mut result);
    result
}

/// Insert `text` at code point `pos`.
pub fn insert(pos: usize, text: &str) -> TextOp {
    normalize(vec![
        TextComponent::Retain(pos),
        TextComponent::Insert(text.to_string()),
    ])
}

/// Delete `text`, which starts at code point `pos`. The deleted text is kept
/// so the result can be inverted.
pub fn remove(pos: usize, text: &str) -> TextOp {
    normalize(vec![
        TextComponent::Retain(pos),
        TextComponent::DeleteStr(text.to_string()),
    ])
}

/// Delete `len` code points starting at `pos`.
pub fn remove_count(pos: usize, len: usize) -> TextOp {
    normalize(vec![TextComponent::Retain(pos), TextComponent::Delete(len)])
}

// ── Apply / invert ────────────────────────────────────────────────────────

/// Apply a `TextOp` to a string, returning the result.
pub fn apply(s: &str, op: &TextOp) -> Result<String, TextOpError> {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());
    let mut idx = 0usize;

    for comp in op {
        match comp {
            TextComponent::Retain(n) => {
                let end = idx + n;
                if end > chars.len() {
                    return Err(TextOpError::OutOfBounds);
                }
                result.extend(&chars[idx..end]);
                idx = end;
            }
            TextComponent::Insert(ins) => result.push_str(ins),
            TextComponent::Delete(n) => {
                if idx + n > chars.len() {
                    return Err(TextOpError::OutOfBounds);
                }
                idx += n;
            }
            TextComponent::DeleteStr(del) => {
                let end = idx + del.chars().count();
                if end > chars.len() {
                    return Err(TextOpError::OutOfBounds);
                }
                if !chars[idx..end].iter().copied().eq(del.chars()) {
                    return Err(TextOpError::DeleteMismatch);
                }
                idx = end;
            }
        }
    }
    result.extend(&chars[idx..]);
    Ok(result)
}

/// Invert an operation. Only reversible (text-carrying) deletes can be
/// inverted.
pub fn invert(op: &TextOp) -> Result<TextOp, TextOpError> {
    let mut result = TextOp::with_capacity(op.len());
    for comp in op {
        let inverted = match comp {
            TextComponent::Retain(n) => TextComponent::Retain(*n),
            TextComponent::Insert(s) => TextComponent::DeleteStr(s.clone()),
            TextComponent::DeleteStr(s) => TextComponent::Insert(s.clone()),
            TextComponent::Delete(_) => return Err(TextOpError::NotInvertible),
        };
        append(&mut result, inverted);
    }
    trim(&mut result);
    Ok(result)
}

// ── Compose ───────────────────────────────────────────────────────────────

fn char_slice(s: &str, from: usize, to: usize) -> String {
    s.chars().skip(from).take(to - from).collect()
}

/// Cursor over the first operand of [`compose`]. Deletes are indivisible:
/// they are always taken whole because they consume nothing on the
/// destination side.
struct Taker<'a> {
    op: &'a [TextComponent],
    idx: usize,
    offset: usize,
}

impl<'a> Taker<'a> {
    fn new(op: &'a [TextComponent]) -> Self {
        Self { op, idx: 0, offset: 0 }
    }

    /// Take up to `max` destination-side code points. `None` takes the whole
    /// remaining component and returns `None` once the op is exhausted.
    fn take(&mut self, max: Option<usize>) -> Option<TextComponent> {
        let Some(comp) = self.op.get(self.idx) else {
            // Past the end of op1 everything is implicitly retained.
            return max.map(TextComponent::Retain);
        };
        let part = match comp {
            TextComponent::Retain(n) => {
                let rest = n - self.offset;
                match max {
                    Some(max) if rest > max => {
                        self.offset += max;
                        return Some(TextComponent::Retain(max));
                    }
                    _ => TextComponent::Retain(rest),
                }
            }
            TextComponent::Insert(s) => {
                let len = s.chars().count();
                let rest = len - self.offset;
                match max {
                    Some(max) if rest > max => {
                        let part = char_slice(s, self.offset, self.offset + max);
                        self.offset += max;
                        return Some(TextComponent::Insert(part));
                    }
                    _ => TextComponent::Insert(char_slice(s, self.offset, len)),
                }
            }
            TextComponent::Delete(n) => TextComponent::Delete(n - self.offset),
            TextComponent::DeleteStr(s) => {
                TextComponent::DeleteStr(char_slice(s, self.offset, s.chars().count()))
            }
        };
        self.idx += 1;
        self.offset = 0;
        Some(part)
    }
}

/// Compose two sequential operations into one equivalent operation:
/// applying the result equals applying `op1` then `op2`.
pub fn compose(op1: &TextOp, op2: &TextOp) -> TextOp {
    let mut result = TextOp::new();
    let mut take = Taker::new(op1);

    for comp in op2 {
        match comp {
            TextComponent::Retain(n) => {
                let mut length = *n;
                while length > 0 {
                    let Some(chunk) = take.take(Some(length)) else {
                        break;
                    };
                    if !chunk.is_delete() {
                        length -= chunk.dst_len();
                    }
                    append(&mut result, chunk);
                }
            }
            TextComponent::Insert(s) => append(&mut result, TextComponent::Insert(s.clone())),
            TextComponent::Delete(_) | TextComponent::DeleteStr(_) => {
                let length = comp.src_len();
                let mut i = 0;
                while i < length {
                    let Some(chunk) = take.take(Some(length - i)) else {
                        break;
                    };
                    match chunk {
                        TextComponent::Retain(k) => {
                            let deleted = match comp {
                                TextComponent::DeleteStr(d) => {
                                    TextComponent::DeleteStr(char_slice(d, i, i + k))
                                }
                                _ => TextComponent::Delete(k),
                            };
                            append(&mut result, deleted);
                            i += k;
                        }
                        // op2 deletes text op1 inserted: both cancel out.
                        TextComponent::Insert(t) => i += t.chars().count(),
                        TextComponent::Delete(_) | TextComponent::DeleteStr(_) => {
                            append(&mut result, chunk)
                        }
                    }
                }
            }
        }
    }

    while let Some(chunk) = take.take(None) {
        append(&mut result, chunk);
    }
    trim(&mut result);
    result
}
