/// Index after `index` in a ring of `len` items. `None` for an empty ring.
pub fn next_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((index + 1) % len)
}

/// Index before `index` in a ring of `len` items. `None` for an empty ring.
pub fn prev_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((index % len + len - 1) % len)
}
