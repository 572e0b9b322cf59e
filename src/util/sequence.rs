/// Move the element at `from` to `to`, shifting everything in between by one.
///
/// This is a move, not a swap. An out-of-range `from` leaves the sequence
/// unchanged; a `to` past the end lands the element in the last position.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if from >= out.len() || from == to {
        return out;
    }
    let item = out.remove(from);
    let to = to.min(out.len());
    out.insert(to, item);
    out
}
