//! Schema domain checks
//!
//! Pure predicates used by [`Schema::validate`](crate::Schema::validate).
//! Bounds are inclusive on both ends.

/// Check that `value` lies within `[lower, upper]` when a range is declared
pub fn validate_range<T: PartialOrd + Copy>(value: T, range: Option<(T, T)>) -> bool {
    match range {
        Some((lower, upper)) => lower <= value && value <= upper,
        None => true,
    }
}

/// Check that `value` is reachable from `origin` in increments of `step`
pub fn validate_step(value: i64, origin: i64, step: Option<i64>) -> bool {
    match step {
        Some(step) if step != 0 => value
            .checked_sub(origin)
            // `MIN % -1` overflows; every integer is a multiple of -1
            .map(|offset| offset.checked_rem(step).map_or(true, |rest| rest == 0))
            .unwrap_or(false),
        _ => true,
    }
}

/// Check that `value` is a member of the declared domain
pub fn validate_domain<T: PartialEq>(value: &T, domain: Option<&[T]>) -> bool {
    match domain {
        Some(domain) => domain.contains(value),
        None => true,
    }
}
