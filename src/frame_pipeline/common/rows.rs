use rayon::prelude::*;

/// Fills `out` row by row, across the rayon pool when `parallel` is set.
pub(crate) fn fill_rows<T, F>(out: &mut [T], row_len: usize, parallel: bool, fill: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }
    if parallel {
        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    } else {
        out.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    }
}

/// Mirrors an out-of-range index back into `0..len` without repeating the
/// edge sample (`dcb|abcd|cba`).
#[inline]
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

#[inline]
pub(crate) fn replicate(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(-3, 4), 3);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(9, 4), 3);
        assert_eq!(reflect_101(-7, 1), 0);
    }

    #[test]
    fn test_fill_rows_sequential_and_parallel_match() {
        let mut a = vec![0u32; 12];
        let mut b = vec![0u32; 12];
        fill_rows(&mut a, 4, false, |y, row| row.iter_mut().for_each(|v| *v = y as u32));
        fill_rows(&mut b, 4, true, |y, row| row.iter_mut().for_each(|v| *v = y as u32));
        assert_eq!(a, b);
        assert_eq!(a[11], 2);
    }
}
