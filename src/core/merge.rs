//! Deep merge of translation catalogs.
//!
//! Catalogs extracted from templates are reconciled with catalogs loaded
//! from translation files. Nothing is ever dropped: named entries missing
//! from the base are added, nested maps are merged recursively, scalar
//! entries present on both sides take the later value, and list entries
//! are appended only when not already present.
//!
//! Translation files written by earlier tools may use integer-like keys as
//! list slots inside maps, so a map key that looks numeric is treated as a
//! list position rather than a name.

use crate::core::data::{CatalogValue, MessageCatalog, MessageMap, Scalar};

/// Merge `additions` into `base`, left to right.
///
/// A non-container `base` is first coerced to a list (empty for empty
/// scalars, one element otherwise); non-container additions become
/// one-element lists. The result is therefore always a list or a map.
pub fn deep_merge(
    base: CatalogValue,
    additions: impl IntoIterator<Item = CatalogValue>,
) -> CatalogValue {
    additions
        .into_iter()
        .fold(coerce_base(base), |merged, addition| {
            merge_pair(merged, coerce_addition(addition))
        })
}

/// Merge catalogs domain by domain. Later catalogs win for scalar entries.
///
/// Called with the template catalog as `base` and the persisted catalog as
/// the addition, existing translations replace generated placeholders while
/// new messages keep theirs.
pub fn merge_catalogs(
    base: MessageCatalog,
    additions: impl IntoIterator<Item = MessageCatalog>,
) -> MessageCatalog {
    let merged = deep_merge(
        base.into_value(),
        additions.into_iter().map(MessageCatalog::into_value),
    );
    MessageCatalog::from_value(merged)
}

fn coerce_base(value: CatalogValue) -> CatalogValue {
    match value {
        CatalogValue::Scalar(s) if s.is_empty() => CatalogValue::Sequence(Vec::new()),
        CatalogValue::Scalar(s) => CatalogValue::Sequence(vec![CatalogValue::Scalar(s)]),
        container => container,
    }
}

fn coerce_addition(value: CatalogValue) -> CatalogValue {
    match value {
        CatalogValue::Scalar(s) => CatalogValue::Sequence(vec![CatalogValue::Scalar(s)]),
        container => container,
    }
}

/// Merge two already-coerced containers.
///
/// Lists go through the keyed path too: a container at index `i` of the
/// addition lands on key `i` even when that leaves a gap.
fn merge_pair(base: CatalogValue, addition: CatalogValue) -> CatalogValue {
    match (base, addition) {
        (CatalogValue::Map(base), CatalogValue::Map(addition)) => {
            CatalogValue::Map(merge_maps(base, addition))
        }
        (base, addition) => {
            let merged = merge_maps(base.into_map(), addition.into_map());
            normalize_list(merged)
        }
    }
}

/// Merge a child value: both sides are coerced before merging.
fn merge_values(base: CatalogValue, addition: CatalogValue) -> CatalogValue {
    deep_merge(base, [addition])
}

fn merge_maps(mut base: MessageMap, addition: MessageMap) -> MessageMap {
    for (key, value) in addition {
        let numeric = is_numeric_key(&key);

        if !numeric && !base.contains_key(&key) {
            base.insert(key, value);
            continue;
        }

        let slot_is_container = base.get(&key).is_some_and(CatalogValue::is_container);
        if value.is_container() || slot_is_container {
            match base.get_mut(&key) {
                Some(slot) => {
                    let current = std::mem::replace(slot, CatalogValue::null());
                    *slot = merge_values(current, value);
                }
                None => {
                    base.insert(key, merge_values(CatalogValue::null(), value));
                }
            }
        } else if numeric {
            if !base.values().any(|existing| loosely_equal(existing, &value)) {
                let next = next_index(&base);
                base.insert(next, value);
            }
        } else {
            base.insert(key, value);
        }
    }
    base
}

/// Duplicate test for list appends, with PHP 8 loose (`==`) comparison:
/// `"1"` equals `1`, `null` equals `""`, booleans compare by truthiness.
fn loosely_equal(existing: &CatalogValue, value: &CatalogValue) -> bool {
    match (existing, value) {
        (CatalogValue::Scalar(a), CatalogValue::Scalar(b)) => loosely_equal_scalars(a, b),
        (CatalogValue::Scalar(s), container) | (container, CatalogValue::Scalar(s)) => {
            let non_empty = match container {
                CatalogValue::Sequence(items) => !items.is_empty(),
                CatalogValue::Map(map) => !map.is_empty(),
                CatalogValue::Scalar(_) => return false,
            };
            match s {
                Scalar::Null => !non_empty,
                Scalar::Bool(b) => *b == non_empty,
                _ => false,
            }
        }
        _ => existing == value,
    }
}

fn loosely_equal_scalars(a: &Scalar, b: &Scalar) -> bool {
    match (a, b) {
        (Scalar::Bool(x), other) | (other, Scalar::Bool(x)) => *x == !other.is_empty(),
        (Scalar::Null, Scalar::Null) => true,
        (Scalar::Null, Scalar::Str(s)) | (Scalar::Str(s), Scalar::Null) => s.is_empty(),
        (Scalar::Null, number) | (number, Scalar::Null) => number.is_empty(),
        (Scalar::Str(x), Scalar::Str(y)) => match (numeric_value(x), numeric_value(y)) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Scalar::Str(s), number) | (number, Scalar::Str(s)) => match numeric_value(s) {
            Some(parsed) => parsed == Numeric::of(number),
            None => *s == number.to_string(),
        },
        (x, y) => Numeric::of(x) == Numeric::of(y),
    }
}

#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn of(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Int(n) => Numeric::Int(*n),
            Scalar::Float(f) => Numeric::Float(*f),
            _ => Numeric::Int(0),
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Numeric::Int(a), Numeric::Int(b)) => a == b,
            (Numeric::Int(a), Numeric::Float(b)) | (Numeric::Float(b), Numeric::Int(a)) => {
                a as f64 == b
            }
            (Numeric::Float(a), Numeric::Float(b)) => a == b,
        }
    }
}

/// Value of a numeric string; integers stay exact.
fn numeric_value(s: &str) -> Option<Numeric> {
    if !is_numeric_key(s) {
        return None;
    }
    let trimmed = s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    match trimmed.parse::<i64>() {
        Ok(n) => Some(Numeric::Int(n)),
        Err(_) => trimmed.parse::<f64>().ok().map(Numeric::Float),
    }
}

/// Emit a map keyed exactly `0..n` (in order) as a list.
fn normalize_list(map: MessageMap) -> CatalogValue {
    let is_list = map
        .keys()
        .enumerate()
        .all(|(i, key)| key == &i.to_string());
    if is_list {
        CatalogValue::Sequence(map.into_values().collect())
    } else {
        CatalogValue::Map(map)
    }
}

/// Key for appending to a map: one past the largest integer key, or `0`.
fn next_index(map: &MessageMap) -> String {
    map.keys()
        .filter_map(|key| integer_key(key))
        .max()
        .map_or(0, |max| max + 1)
        .to_string()
}

/// Parse a key that is the canonical spelling of an integer.
pub(crate) fn integer_key(key: &str) -> Option<i64> {
    key.parse::<i64>()
        .ok()
        .filter(|n| n.to_string() == key)
}

/// Whether a key is a numeric string: optional surrounding whitespace,
/// an optional sign, digits with an optional fraction, and an optional
/// exponent.
pub fn is_numeric_key(key: &str) -> bool {
    let s = key.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (mantissa, None),
    };
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

    let mantissa_ok = all_digits(int_part)
        && frac_part.is_none_or(all_digits)
        && (!int_part.is_empty() || frac_part.is_some_and(|f| !f.is_empty()));
    if !mantissa_ok {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    }
}
