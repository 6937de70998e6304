/// Difference map: the bits to toggle to turn `previous` into `current`.
#[inline(always)]
pub fn xor_lines(current: &[u8], previous: &[u8], diff: &mut [u8]) {
    debug_assert_eq!(current.len(), previous.len());
    debug_assert_eq!(current.len(), diff.len());
    for ((d, c), p) in diff.iter_mut().zip(current).zip(previous) {
        *d = c ^ p;
    }
}
